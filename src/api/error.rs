// ==========================================
// 零件文档有效期对账系统 - API层错误类型
// ==========================================
// 职责: 看板/命令行边界上的错误，包装下层错误并给出可读原因
// ==========================================

use crate::engine::error::PipelineError;
use crate::importer::error::ImportError;
use crate::report::error::ReportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// 报告尚未生成或没有任何行
    #[error("暂无对账数据: {0}")]
    NoData(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("列不存在: {column}（现有列: {available:?}）")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    // ==========================================
    // 下层错误
    // ==========================================
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;
