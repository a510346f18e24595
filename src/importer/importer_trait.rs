// ==========================================
// 零件文档有效期对账系统 - 导入 Trait
// ==========================================
// 职责: 定义导入阶段接口（不包含实现）
// 流程: 文件解析 → 字段映射（含清洗）→ 源数据表
// ==========================================

use crate::domain::part::{BomTable, ContactTable, DocumentTable, PartTable};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawSheet;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 单表文件解析（CSV / 工作簿首个工作表）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表（表头 + 行）
    ///
    /// # 返回
    /// - Ok(RawSheet): 已跳过完全空白的行
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 原始表 → 强类型关系表
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// items 表 → PartTable（零件号列必需）
    fn map_parts(&self, sheet: &RawSheet) -> ImportResult<PartTable>;

    /// document 表 → DocumentTable（描述列、修订日期列必需；文档号列可缺）
    fn map_documents(&self, sheet: &RawSheet) -> ImportResult<DocumentTable>;

    /// contacts 表 → ContactTable（键列缺失不报错，由关联阶段跳过）
    fn map_contacts(&self, sheet: &RawSheet) -> ImportResult<ContactTable>;

    /// BOM 表 → BomTable（零件号列、客户列必需）
    fn map_bom(&self, sheet: &RawSheet) -> ImportResult<BomTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 文本清洗
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 比较用标准化：小写、非字母数字连续段折叠为单个空格、去首尾空白
    fn normalize_text(&self, value: Option<&str>) -> String;
}
