// ==========================================
// 零件文档有效期对账系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数量解析 / 比较用文本标准化
// ==========================================

use crate::domain::part::Quantity;
use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn normalize_text(&self, value: Option<&str>) -> String {
        normalize_text(value)
    }
}

impl DataCleaner {
    /// 清洗零件号：TRIM，空值视为空串（保留行，不丢弃）
    pub fn clean_identifier(&self, value: Option<&str>) -> String {
        value.map(|v| self.clean_text(v)).unwrap_or_default()
    }

    /// 零件号是否可作为匹配关键字（非空且不是 "nan"）
    pub fn is_indexable_identifier(&self, value: &str) -> bool {
        !value.is_empty() && value != "nan"
    }

    /// 解析数量列（去千分位逗号；无法解析时返回 None）
    pub fn parse_quantity(&self, value: Option<&str>) -> Option<f64> {
        value.and_then(|v| v.trim().replace(',', "").parse::<f64>().ok())
    }

    /// 数量单元格：数字优先，否则保留原文；空白 → None
    pub fn clean_quantity(&self, value: Option<&str>) -> Option<Quantity> {
        let text = self.normalize_null(value.map(str::to_string))?;
        Some(match self.parse_quantity(Some(&text)) {
            Some(n) => Quantity::Number(n),
            None => Quantity::Text(text),
        })
    }
}

/// 比较用文本标准化
///
/// 小写后把所有非 [a-z0-9] 的连续段折叠为单个空格，并去掉首尾空白；
/// None / 空串 → 空串
pub fn normalize_text(value: Option<&str>) -> String {
    let lower = match value {
        Some(v) if !v.is_empty() => v.to_lowercase(),
        _ => return String::new(),
    };

    let mut out = String::with_capacity(lower.len());
    let mut pending_space = false;
    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}
