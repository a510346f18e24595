// ==========================================
// 零件文档有效期对账系统 - 看板跟踪表
// ==========================================
// 职责: 把读回的对账终表整理为看板行，并提供筛选/统计查询
// 表头规范化: TRIM → 小写 → 空格替换为下划线
// 跟踪状态按 30 天窗口独立计算，不读取报告中的 estatus 列
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::SourceColumns;
use crate::domain::types::TrackingStatus;
use crate::engine::date_parser::parse_revision_date;
use crate::engine::status_derivation::StatusDeriver;
use crate::importer::file_parser::RawSheet;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// 规范化后的固定列名
pub const ITEM_COLUMN: &str = "item";
pub const EXPIRATION_COLUMN: &str = "fecha_expiracion";
pub const REVISION_COLUMN: &str = "ultima_actualizacion";
/// 导出时追加的跟踪状态列
pub const STATUS_COLUMN: &str = "status";

pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

// ==========================================
// TrackingRow - 看板行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingRow {
    pub item: Option<String>,
    pub engineer: Option<String>,
    pub supplier: Option<String>,
    pub customer: Option<String>,
    pub expiration_date: Option<NaiveDateTime>,
    pub status: TrackingStatus,
    /// 与 TrackingTable::headers 对齐的原始单元格
    pub cells: Vec<Option<String>>,
}

/// 筛选条件（None 表示不限）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub engineer: Option<String>,
    pub supplier: Option<String>,
    pub customer: Option<String>,
    pub status: Option<TrackingStatus>,
}

/// 跟踪状态计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingCounts {
    pub vencido: usize,
    pub por_vencer: usize,
    pub vigente: usize,
}

impl TrackingCounts {
    pub fn get(&self, status: TrackingStatus) -> usize {
        match status {
            TrackingStatus::Vencido => self.vencido,
            TrackingStatus::PorVencer => self.por_vencer,
            TrackingStatus::Vigente => self.vigente,
        }
    }

    pub fn total(&self) -> usize {
        self.vencido + self.por_vencer + self.vigente
    }
}

/// 各列在表头中的位置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ColumnIndex {
    item: Option<usize>,
    engineer: Option<usize>,
    supplier: Option<usize>,
    customer: Option<usize>,
    expiration: Option<usize>,
}

// ==========================================
// TrackingTable - 看板数据集
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingTable {
    pub headers: Vec<String>,
    pub rows: Vec<TrackingRow>,
    engineer_column: String,
    supplier_column: String,
    customer_column: String,
    index: ColumnIndex,
}

impl TrackingTable {
    /// 由读回的终表构建
    pub fn from_raw_sheet(
        sheet: &RawSheet,
        columns: &SourceColumns,
        deriver: &StatusDeriver,
        now: NaiveDateTime,
    ) -> Self {
        let headers: Vec<String> = sheet.headers.iter().map(|h| normalize_header(h)).collect();
        let engineer_column = normalize_header(&columns.engineer);
        let supplier_column = normalize_header(&columns.supplier_name);
        let customer_column = normalize_header(&columns.customer);
        let position = |name: &str| headers.iter().position(|h| h == name);
        let index = ColumnIndex {
            item: position(ITEM_COLUMN),
            engineer: position(&engineer_column),
            supplier: position(&supplier_column),
            customer: position(&customer_column),
            expiration: position(EXPIRATION_COLUMN),
        };

        let rows = sheet
            .rows
            .iter()
            .map(|raw| {
                let get = |i: Option<usize>| -> Option<String> {
                    i.and_then(|i| raw.cells.get(i).cloned().flatten())
                        .filter(|v| !v.is_empty())
                };
                let expiration_date = parse_revision_date(get(index.expiration).as_deref());
                TrackingRow {
                    item: get(index.item),
                    engineer: get(index.engineer),
                    supplier: get(index.supplier),
                    customer: get(index.customer),
                    expiration_date,
                    status: deriver.tracking_status(expiration_date, now),
                    cells: raw.cells.clone(),
                }
            })
            .collect();

        Self {
            headers,
            rows,
            engineer_column,
            supplier_column,
            customer_column,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 以新的基准时间重算跟踪状态
    pub fn refresh_status(&mut self, deriver: &StatusDeriver, now: NaiveDateTime) {
        for row in &mut self.rows {
            row.status = deriver.tracking_status(row.expiration_date, now);
        }
    }

    fn require(&self, present: Option<usize>, column: &str) -> ApiResult<()> {
        match present {
            Some(_) => Ok(()),
            None => Err(ApiError::ColumnNotFound {
                column: column.to_string(),
                available: self.headers.clone(),
            }),
        }
    }

    /// 工程师列表（去空、去重、排序）
    pub fn engineers(&self) -> ApiResult<Vec<String>> {
        self.require(self.index.engineer, &self.engineer_column)?;
        let set: BTreeSet<&str> = self.rows.iter().filter_map(|r| r.engineer.as_deref()).collect();
        Ok(set.into_iter().map(|s| s.to_string()).collect())
    }

    /// 某工程师名下的供应商列表
    pub fn suppliers_for(&self, engineer: &str) -> ApiResult<Vec<String>> {
        self.require(self.index.engineer, &self.engineer_column)?;
        self.require(self.index.supplier, &self.supplier_column)?;
        let set: BTreeSet<&str> = self
            .rows
            .iter()
            .filter(|r| r.engineer.as_deref() == Some(engineer))
            .filter_map(|r| r.supplier.as_deref())
            .collect();
        Ok(set.into_iter().map(|s| s.to_string()).collect())
    }

    /// 按条件筛选（各条件为精确匹配，同时满足）
    pub fn filter(&self, criteria: &FilterCriteria) -> ApiResult<Vec<TrackingRow>> {
        if criteria.engineer.is_some() {
            self.require(self.index.engineer, &self.engineer_column)?;
        }
        if criteria.supplier.is_some() {
            self.require(self.index.supplier, &self.supplier_column)?;
        }
        if criteria.customer.is_some() {
            self.require(self.index.customer, &self.customer_column)?;
        }

        let matches = |want: &Option<String>, have: &Option<String>| match want {
            Some(w) => have.as_deref() == Some(w.as_str()),
            None => true,
        };

        Ok(self
            .rows
            .iter()
            .filter(|r| matches(&criteria.engineer, &r.engineer))
            .filter(|r| matches(&criteria.supplier, &r.supplier))
            .filter(|r| matches(&criteria.customer, &r.customer))
            .filter(|r| criteria.status.map(|s| r.status == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    /// 供应商为空的零件
    pub fn parts_without_supplier(&self) -> ApiResult<Vec<TrackingRow>> {
        self.require(self.index.supplier, &self.supplier_column)?;
        Ok(self
            .rows
            .iter()
            .filter(|r| r.supplier.is_none())
            .cloned()
            .collect())
    }

    /// 有供应商但工程师为空的零件
    pub fn parts_without_engineer(&self) -> ApiResult<Vec<TrackingRow>> {
        self.require(self.index.supplier, &self.supplier_column)?;
        self.require(self.index.engineer, &self.engineer_column)?;
        Ok(self
            .rows
            .iter()
            .filter(|r| r.supplier.is_some() && r.engineer.is_none())
            .cloned()
            .collect())
    }

    /// 零件号命中给定集合的行
    pub fn rows_with_items(&self, items: &HashSet<String>) -> ApiResult<Vec<TrackingRow>> {
        self.require(self.index.item, ITEM_COLUMN)?;
        Ok(self
            .rows
            .iter()
            .filter(|r| r.item.as_ref().map(|i| items.contains(i)).unwrap_or(false))
            .cloned()
            .collect())
    }
}

/// 状态计数
pub fn status_counts(rows: &[TrackingRow]) -> TrackingCounts {
    let mut counts = TrackingCounts::default();
    for row in rows {
        match row.status {
            TrackingStatus::Vencido => counts.vencido += 1,
            TrackingStatus::PorVencer => counts.por_vencer += 1,
            TrackingStatus::Vigente => counts.vigente += 1,
        }
    }
    counts
}

/// 状态分布（按数量降序，数量为 0 的状态不出现）
pub fn status_distribution(rows: &[TrackingRow]) -> Vec<(TrackingStatus, usize)> {
    let counts = status_counts(rows);
    let mut distribution: Vec<(TrackingStatus, usize)> = TrackingStatus::ALL
        .iter()
        .map(|s| (*s, counts.get(*s)))
        .filter(|(_, n)| *n > 0)
        .collect();
    distribution.sort_by(|a, b| b.1.cmp(&a.1));
    distribution
}
