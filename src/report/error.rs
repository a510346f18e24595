// ==========================================
// 零件文档有效期对账系统 - 报告层错误类型
// ==========================================
// 职责: 报告写出/读回过程中的错误
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Excel 写出失败: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("报告文件写入失败: {path}: {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("报告文件读取失败: {0}")]
    ReadError(#[from] ImportError),

    #[error("报告结构不符: {0}")]
    MalformedReport(String),
}

impl ReportError {
    /// 报告文件或工作表不存在
    pub fn is_missing_report(&self) -> bool {
        match self {
            ReportError::ReadError(e) => e.is_missing_input(),
            _ => false,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
