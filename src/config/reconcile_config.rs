// ==========================================
// 零件文档有效期对账系统 - 对账配置项
// ==========================================
// 职责: 输入/输出路径、工作表别名、列名、状态窗口、联系人列模式
// 默认值与现场 Excel 模板一致
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ReconcileConfig - 对账配置（顶层）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// 源工作簿路径
    pub source_path: String,
    /// 报告输出路径
    pub output_path: String,
    pub sheets: SheetAliases,
    pub columns: SourceColumns,
    pub output_sheets: OutputSheets,
    pub windows: StatusWindows,
    /// 联系人类附加列的列名模式（不区分大小写的子串匹配）
    /// 工程师键列名（columns.engineer）始终作为附加模式参与匹配
    pub contact_column_patterns: Vec<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            source_path: "Hoja principal.xlsm".to_string(),
            output_path: "Resultados.xlsx".to_string(),
            sheets: SheetAliases::default(),
            columns: SourceColumns::default(),
            output_sheets: OutputSheets::default(),
            windows: StatusWindows::default(),
            contact_column_patterns: vec!["lider".to_string(), "email".to_string()],
        }
    }
}

impl ReconcileConfig {
    /// 列名是否命中联系人列模式（含工程师键列名）
    pub fn is_contact_column(&self, column: &str) -> bool {
        let lower = column.to_lowercase();
        self.contact_column_patterns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.columns.engineer.trim()))
            .any(|p| !p.is_empty() && lower.contains(&p.to_lowercase()))
    }
}

// ==========================================
// SheetAliases - 输入工作表名
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetAliases {
    pub items: String,
    pub documents: String,
    pub contacts: String,
    pub bom: String,
}

impl Default for SheetAliases {
    fn default() -> Self {
        Self {
            items: "Tabla items".to_string(),
            documents: "Tabla Doc".to_string(),
            contacts: "Tabla correos".to_string(),
            bom: "Tabla Bom".to_string(),
        }
    }
}

impl SheetAliases {
    /// 按加载顺序列出 (逻辑名, 工作表名)
    pub fn required(&self) -> [(&'static str, &str); 4] {
        [
            ("items", self.items.as_str()),
            ("doc", self.documents.as_str()),
            ("correos", self.contacts.as_str()),
            ("bom", self.bom.as_str()),
        ]
    }
}

// ==========================================
// SourceColumns - 源列名
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceColumns {
    pub item: String,
    pub description: String,
    pub document_number: String,
    pub revision_date: String,
    pub supplier_name: String,
    pub supplier_number: String,
    pub engineer: String,
    pub quantity: String,
    pub business_unit: String,
    pub customer: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            item: "Item".to_string(),
            description: "Description".to_string(),
            document_number: "Number".to_string(),
            revision_date: "Rev Release Date".to_string(),
            supplier_name: "Supplier Name".to_string(),
            supplier_number: "Supplier Number".to_string(),
            engineer: "SQE".to_string(),
            quantity: "sumatoria".to_string(),
            business_unit: "BU".to_string(),
            customer: "Customer".to_string(),
        }
    }
}

// ==========================================
// OutputSheets - 输出工作表名
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSheets {
    pub raw_matches: String,
    pub revisions: String,
    pub customers: String,
    pub result: String,
    /// 看板导出使用的工作表名
    pub filtered: String,
}

impl Default for OutputSheets {
    fn default() -> Self {
        Self {
            raw_matches: "coincidencia_raw".to_string(),
            revisions: "ultima_actualizacion".to_string(),
            customers: "bom_customers".to_string(),
            result: "resultado final".to_string(),
            filtered: "Datos Filtrados".to_string(),
        }
    }
}

// ==========================================
// StatusWindows - 状态窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusWindows {
    /// 文档有效期（自然月）
    pub validity_months: u32,
    /// 报告口径临期窗口（天）
    pub report_expiring_days: i64,
    /// 看板口径临期窗口（天）
    pub tracking_expiring_days: i64,
}

impl Default for StatusWindows {
    fn default() -> Self {
        Self {
            validity_months: 12,
            report_expiring_days: 90,
            tracking_expiring_days: 30,
        }
    }
}
