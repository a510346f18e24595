// ==========================================
// 零件文档有效期对账系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含文件读写，不含对账逻辑
// ==========================================

pub mod part;
pub mod report;
pub mod types;

// 重导出核心类型
pub use part::{
    BomTable, ContactRecord, ContactTable, CustomerLink, DocumentRecord, DocumentTable, Part,
    PartTable, Quantity, SourceTables,
};
pub use report::{
    ColumnNames, MatchedDocument, MatchedRevision, OutputColumn, ReconciliationArtifacts,
    ReconciliationReport, ResultRow, RunSummary, StatusCounts,
};
pub use types::{ReportStatus, TrackingStatus};
