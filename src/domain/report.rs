// ==========================================
// 零件文档有效期对账系统 - 派生实体
// ==========================================
// 职责: 匹配 → 修订 → 关联 → 状态 → 终表 各阶段的中间与最终结构
// 生命周期: 每次运行重新计算，输出文件整体覆盖
// ==========================================

use crate::domain::part::{CustomerLink, DocumentRecord, Quantity};
use crate::domain::types::ReportStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// MatchedDocument - 命中零件号的文档
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedDocument {
    pub record: DocumentRecord,
    pub item: String,
    pub parsed_date: Option<NaiveDateTime>,
}

// ==========================================
// MatchedRevision - 每个零件的最新修订
// ==========================================
// 不变量: 每个零件号恰好一行，取日期最大者（空日期排最后）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRevision {
    pub item: String,
    pub revision_date: Option<NaiveDateTime>,
    pub doc: Option<String>,
}

// ==========================================
// ResultRow - 对账结果行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub item: String,
    pub doc: Option<String>,
    pub revision_date: Option<NaiveDateTime>,
    pub expiration_date: Option<NaiveDateTime>,
    pub status: Option<ReportStatus>,
    pub supplier_name: Option<String>,
    pub supplier_number: Option<String>,
    pub engineer: Option<String>,
    pub quantity: Option<Quantity>,
    pub business_unit: Option<String>,
    pub customer: Option<String>,
    /// 与 ReconciliationReport::columns 中的 Extra 列对齐
    pub extra: Vec<Option<String>>,
}

// ==========================================
// OutputColumn - 终表列
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputColumn {
    Item,
    Doc,
    RevisionDate,
    ExpirationDate,
    Status,
    SupplierName,
    SupplierNumber,
    Engineer,
    Quantity,
    BusinessUnit,
    Customer,
    /// 按列名模式识别出的联系人类附加列（下标对应 ResultRow::extra）
    Extra { name: String, index: usize },
}

impl OutputColumn {
    /// 输出表头
    pub fn header<'a>(&'a self, names: &'a ColumnNames) -> &'a str {
        match self {
            OutputColumn::Item => "item",
            OutputColumn::Doc => "doc",
            OutputColumn::RevisionDate => "ultima actualizacion",
            OutputColumn::ExpirationDate => "fecha_expiracion",
            OutputColumn::Status => "estatus",
            OutputColumn::SupplierName => &names.supplier_name,
            OutputColumn::SupplierNumber => &names.supplier_number,
            OutputColumn::Engineer => &names.engineer,
            OutputColumn::Quantity => &names.quantity,
            OutputColumn::BusinessUnit => &names.business_unit,
            OutputColumn::Customer => &names.customer,
            OutputColumn::Extra { name, .. } => name,
        }
    }
}

/// 源列名（输出时沿用源表列名的固定列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub supplier_name: String,
    pub supplier_number: String,
    pub engineer: String,
    pub quantity: String,
    pub business_unit: String,
    pub customer: String,
}

// ==========================================
// ReconciliationReport - 对账终表
// ==========================================
// 不变量: 每个零件号至多一行
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub column_names: ColumnNames,
    pub columns: Vec<OutputColumn>,
    pub rows: Vec<ResultRow>,
}

impl ReconciliationReport {
    pub fn headers(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.header(&self.column_names))
            .collect()
    }

    pub fn find(&self, item: &str) -> Option<&ResultRow> {
        self.rows.iter().find(|r| r.item == item)
    }
}

// ==========================================
// StatusCounts - 状态计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub expired: usize,
    pub expiring_soon: usize,
    pub valid: usize,
    pub unknown: usize,
}

impl StatusCounts {
    pub fn tally<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a ReportStatus>>,
    {
        let mut counts = StatusCounts::default();
        for status in statuses {
            match status {
                Some(ReportStatus::Expired) => counts.expired += 1,
                Some(ReportStatus::ExpiringSoon) => counts.expiring_soon += 1,
                Some(ReportStatus::Valid) => counts.valid += 1,
                None => counts.unknown += 1,
            }
        }
        counts
    }
}

// ==========================================
// RunSummary - 单次运行汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub now: NaiveDateTime,
    pub total_documents: usize,
    pub matched_documents: usize,
    pub resolved_revisions: usize,
    pub customer_links: usize,
    pub joined_rows: usize,
    pub final_rows: usize,
    pub contact_join_applied: bool,
    pub status_counts: StatusCounts,
    pub output_path: String,
}

// ==========================================
// ReconciliationArtifacts - 单次对账的全部产出
// ==========================================
// 报告工作簿的四张表分别来自这里的四个部分
#[derive(Debug, Clone)]
pub struct ReconciliationArtifacts {
    /// 文档表原始表头（coincidencia_raw 沿用）
    pub document_headers: Vec<String>,
    pub matched_documents: Vec<MatchedDocument>,
    pub revisions: Vec<MatchedRevision>,
    pub customer_links: Vec<CustomerLink>,
    /// 关联后、去重前的行数
    pub joined_rows: usize,
    pub contact_join_applied: bool,
    pub report: ReconciliationReport,
}
