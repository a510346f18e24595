// ==========================================
// 零件文档有效期对账系统 - 配置层
// ==========================================
// 职责: 对账配置定义与加载
// 存储: 可选 JSON 文件 + 环境变量
// ==========================================

pub mod config_manager;
pub mod reconcile_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use reconcile_config::{
    OutputSheets, ReconcileConfig, SheetAliases, SourceColumns, StatusWindows,
};
