// ==========================================
// 零件文档有效期对账系统 - 配置管理器
// ==========================================
// 职责: 配置加载（JSON 文件 + 环境变量覆写）
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::reconcile_config::ReconcileConfig;
use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// 环境变量键
pub mod config_keys {
    pub const SOURCE_PATH: &str = "PART_DOC_TRACKER_SOURCE";
    pub const OUTPUT_PATH: &str = "PART_DOC_TRACKER_OUTPUT";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: ReconcileConfig,
}

impl ConfigManager {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    /// 加载配置
    ///
    /// # 参数
    /// - path: 可选 JSON 配置文件；None 时使用默认值
    ///
    /// # 返回
    /// - Err(ConfigReadError): 文件不存在或 JSON 格式错误
    pub fn load(path: Option<&Path>) -> ImportResult<Self> {
        let mut config = match path {
            Some(p) => Self::read_file(p)?,
            None => ReconcileConfig::default(),
        };
        Self::apply_env_overrides(&mut config);
        info!(
            source = %config.source_path,
            output = %config.output_path,
            "配置加载完成"
        );
        Ok(Self { config })
    }

    fn read_file(path: &Path) -> ImportResult<ReconcileConfig> {
        let raw = fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn apply_env_overrides(config: &mut ReconcileConfig) {
        if let Some(v) = env_value(config_keys::SOURCE_PATH) {
            debug!(key = config_keys::SOURCE_PATH, value = %v, "环境变量覆写");
            config.source_path = v;
        }
        if let Some(v) = env_value(config_keys::OUTPUT_PATH) {
            debug!(key = config_keys::OUTPUT_PATH, value = %v, "环境变量覆写");
            config.output_path = v;
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn into_config(self) -> ReconcileConfig {
        self.config
    }

    /// 配置快照（JSON），run 命令随运行汇总写入日志
    pub fn snapshot(&self) -> ImportResult<String> {
        serde_json::to_string(&self.config).map_err(|e| ImportError::Other(e.into()))
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "sheets": {{ "items": "Items" }}, "contact_column_patterns": ["correo"] }}"#
        )
        .unwrap();

        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.config().sheets.items, "Items");
        assert_eq!(manager.config().sheets.documents, "Tabla Doc");
        assert_eq!(manager.config().contact_column_patterns, vec!["correo"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigManager::load(Some(Path::new("no_such_config.json")));
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        let result = ConfigManager::load(Some(file.path()));
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }

    #[test]
    fn test_snapshot_is_json() {
        let manager = ConfigManager::default();
        let snapshot = manager.snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["output_path"], "Resultados.xlsx");
    }
}
