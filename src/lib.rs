// ==========================================
// 零件文档有效期对账系统 - 核心库
// ==========================================
// 输入: 主工作簿（零件 / 文档 / 联系人 / BOM 四张表）
// 输出: 对账报告工作簿（每个零件一行，带有效期状态）
// 看板: 读回报告，筛选、统计、核对 BOM、导出
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 对账配置
pub mod config;

// 导入层 - 源工作簿
pub mod importer;

// 引擎层 - 对账规则
pub mod engine;

// 报告层 - Excel 写出/读回
pub mod report;

// API 层 - 看板接口
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ReportStatus, TrackingStatus};

// 领域实体
pub use domain::{
    MatchedRevision, Part, ReconciliationArtifacts, ReconciliationReport, ResultRow, RunSummary,
    SourceTables,
};

// 配置
pub use config::{ConfigManager, ReconcileConfig};

// 引擎
pub use engine::{KeywordMatcher, PipelineError, ReconcilePipeline, RunOutput, StatusDeriver};

// API
pub use api::{ApiError, DashboardApi, FilterCriteria};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "零件文档有效期对账系统";
