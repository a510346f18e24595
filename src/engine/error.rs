// ==========================================
// 零件文档有效期对账系统 - 对账流程错误类型
// ==========================================
// 输入错误（文件/工作表/列缺失）在写出报告之前返回，旧报告不受影响
// ==========================================

use crate::importer::error::ImportError;
use crate::report::error::ReportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("源数据读取失败: {0}")]
    Import(#[from] ImportError),

    #[error("报告写出失败: {0}")]
    Report(#[from] ReportError),
}

impl PipelineError {
    /// 是否为输入缺失类错误（文件或工作表不存在）
    pub fn is_missing_input(&self) -> bool {
        match self {
            PipelineError::Import(e) => e.is_missing_input(),
            PipelineError::Report(_) => false,
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
