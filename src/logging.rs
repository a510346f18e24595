// ==========================================
// 日志系统初始化
// ==========================================
// tracing + tracing-subscriber；RUST_LOG 控制级别（默认 info）
// 批处理任务可切换为 JSON 行日志，便于收集
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读（带行号）
    #[default]
    Pretty,
    /// 每行一个 JSON 对象，包含当前 span（run_id 等字段）
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化日志系统
///
/// # 示例
/// ```no_run
/// use part_doc_tracker::logging::{self, LogFormat};
/// logging::init_with(LogFormat::Json);
/// ```
pub fn init_with(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter("info")).with_target(true);
    match format {
        LogFormat::Pretty => builder.with_line_number(true).init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

pub fn init() {
    init_with(LogFormat::Pretty);
}

pub fn init_json() {
    init_with(LogFormat::Json);
}

/// 测试用：debug 级别，输出交给测试框架捕获；重复调用无副作用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
