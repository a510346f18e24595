// ==========================================
// 零件文档有效期对账系统 - 报告层
// ==========================================
// 职责: 报告工作簿的写出与读回
// ==========================================

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{ReportError, ReportResult};
pub use reader::read_report_sheet;
pub use writer::{render_workbook, write_atomic, CellValue, ReportWriter, SheetData};
