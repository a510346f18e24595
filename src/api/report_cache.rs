// ==========================================
// 零件文档有效期对账系统 - 看板报告缓存
// ==========================================
// 缓存键: 报告文件内容的 SHA-256（十六进制）
// 文件内容变化即失效；上传新源文件时显式清空
// ==========================================

use crate::api::tracking::TrackingTable;
use sha2::{Digest, Sha256};
use tracing::debug;

/// 计算内容摘要
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Default)]
pub struct ReportCache {
    entry: Option<(String, TrackingTable)>,
    hits: u64,
    misses: u64,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 摘要一致则复用，否则调用 build 重建并替换
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        digest: &str,
        build: F,
    ) -> Result<&mut TrackingTable, E>
    where
        F: FnOnce() -> Result<TrackingTable, E>,
    {
        let entry = match self.entry.take() {
            Some((key, table)) if key == digest => {
                self.hits += 1;
                debug!(digest, "报告缓存命中");
                (key, table)
            }
            _ => {
                self.misses += 1;
                (digest.to_string(), build()?)
            }
        };
        let (_, table) = self.entry.insert(entry);
        Ok(table)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            debug!("报告缓存已清空");
        }
    }

    pub fn digest(&self) -> Option<&str> {
        self.entry.as_ref().map(|(k, _)| k.as_str())
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
