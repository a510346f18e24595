// ==========================================
// 零件文档有效期对账系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 致命错误（文件/工作表/必需列缺失）在任何输出之前中止运行；
// 日期解析失败、未命中零件号等行级异常不进入此类型
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构错误 =====
    #[error("未找到工作表 '{sheet}'，可用工作表: {available:?}")]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("工作表 '{sheet}' 缺少必需列 '{column}'，现有列: {available:?}")]
    MissingColumn {
        sheet: String,
        column: String,
        available: Vec<String>,
    },

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl ImportError {
    /// 是否为"输入缺失"类错误（文件或工作表不存在）
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_) | ImportError::MissingSheet { .. }
        )
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
