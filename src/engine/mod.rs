// ==========================================
// 零件文档有效期对账系统 - 引擎层
// ==========================================
// 职责: 对账规则（匹配 / 修订 / 关联 / 状态 / 终表）与编排
// 红线: 除编排器外不做文件读写
// ==========================================

pub mod date_parser;
pub mod error;
pub mod finalizer;
pub mod joiner;
pub mod keyword_matcher;
pub mod orchestrator;
pub mod revision_resolver;
pub mod status_derivation;

// 重导出核心类型
pub use date_parser::{parse_revision_date, strip_timezone_suffix};
pub use error::{PipelineError, PipelineResult};
pub use finalizer::Finalizer;
pub use joiner::{dedupe_customer_links, JoinOutcome, JoinedRow, Joiner};
pub use keyword_matcher::{KeywordMatch, KeywordMatcher};
pub use orchestrator::{ReconcilePipeline, RunOutput};
pub use revision_resolver::{compare_date_desc, RevisionResolver};
pub use status_derivation::StatusDeriver;
