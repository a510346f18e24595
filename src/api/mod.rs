// ==========================================
// 零件文档有效期对账系统 - API 层
// ==========================================
// 职责: 看板与命令行使用的业务接口
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod report_cache;
pub mod tracking;

// 重导出核心类型
pub use dashboard_api::{default_export_file_name, BomVerification, DashboardApi};
pub use error::{ApiError, ApiResult};
pub use report_cache::{content_digest, ReportCache};
pub use tracking::{
    normalize_header, status_counts, status_distribution, FilterCriteria, TrackingCounts,
    TrackingRow, TrackingTable,
};
