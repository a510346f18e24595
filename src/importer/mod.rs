// ==========================================
// 零件文档有效期对账系统 - 导入层
// ==========================================
// 职责: 源工作簿读取 → 强类型关系表
// 支持: Excel 工作簿（多表）, CSV（单表，用于 BOM 核对）
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod source_loader;

// 重导出核心类型
pub use data_cleaner::{normalize_text, DataCleaner as DataCleanerImpl};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{
    CsvParser, ExcelParser, ExcelWorkbook, RawRow, RawSheet, UniversalFileParser,
};
pub use source_loader::SourceLoader;

// 重导出 Trait 接口
pub use importer_trait::{DataCleaner, FieldMapper, FileParser};
