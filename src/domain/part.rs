// ==========================================
// 零件文档有效期对账系统 - 源数据实体
// ==========================================
// 职责: 四张输入工作表对应的强类型记录
// 生命周期: 每次运行读取一次，除标识符 TRIM 外不再修改
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Part - 零件（items 表一行）
// ==========================================
// 源表中的重复零件号在匹配前不去重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub item: String,                    // 零件号（已 TRIM）
    pub supplier_name: Option<String>,   // 供应商名称
    pub supplier_number: Option<String>, // 供应商编号
    pub engineer: Option<String>,        // 负责工程师（SQE）
    pub quantity: Option<Quantity>,      // 汇总数量
    pub business_unit: Option<String>,   // 业务单元
    /// 固定列之外的其余列，按表头顺序
    pub extra: Vec<Option<String>>,
    pub row_number: usize,
}

/// 数量单元格：能解析为数字时按数字输出，否则原文照搬
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    Number(f64),
    Text(String),
}

// ==========================================
// DocumentRecord - 文档记录（document 表一行）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub description: String,
    pub number: Option<String>,
    pub raw_revision_date: Option<String>,
    /// 原始整行（按表头顺序），供 coincidencia_raw 输出
    pub raw: Vec<Option<String>>,
    pub row_number: usize,
}

// ==========================================
// CustomerLink - 零件 → 客户
// ==========================================
// 去重后不存在重复 (item, customer) 对；一个零件可对应多个客户
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerLink {
    pub item: String,
    pub customer: Option<String>,
}

// ==========================================
// ContactRecord - 工程师联系人（contacts 表一行）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub engineer: Option<String>,
    /// 除键列外的其余列，与 ContactTable::field_names 对齐
    pub fields: Vec<Option<String>>,
}

// ==========================================
// 关系表（带表头）
// ==========================================

#[derive(Debug, Clone, Default)]
pub struct PartTable {
    /// 是否存在各固定列（缺列时输出中省略该列）
    pub has_supplier_name: bool,
    pub has_supplier_number: bool,
    pub has_engineer: bool,
    pub has_quantity: bool,
    pub has_business_unit: bool,
    pub extra_names: Vec<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTable {
    pub headers: Vec<String>,
    pub has_number: bool,
    pub records: Vec<DocumentRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactTable {
    /// 工程师键列在源表中的实际列名（None 表示未找到）
    pub key_column: Option<String>,
    pub field_names: Vec<String>,
    pub records: Vec<ContactRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct BomTable {
    pub links: Vec<CustomerLink>,
}

/// 一次运行读取到的全部源数据
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub items: PartTable,
    pub documents: DocumentTable,
    pub contacts: ContactTable,
    pub bom: BomTable,
}
