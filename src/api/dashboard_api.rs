// ==========================================
// 零件文档有效期对账系统 - 看板 API
// ==========================================
// 职责: 看板的数据边界（上传源文件 / 读取报告 / 筛选 / 统计 / BOM 核对 / 导出）
// 架构: API 层 → 报告读回 + 跟踪表查询；上传时调用对账编排器重跑
// 看板不修改报告，只读取并按需导出筛选结果
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::report_cache::{content_digest, ReportCache};
use crate::api::tracking::{
    self, FilterCriteria, TrackingCounts, TrackingRow, TrackingTable, EXPIRATION_COLUMN,
    REVISION_COLUMN, STATUS_COLUMN,
};
use crate::config::ReconcileConfig;
use crate::domain::report::RunSummary;
use crate::domain::types::TrackingStatus;
use crate::engine::date_parser::parse_revision_date;
use crate::engine::orchestrator::ReconcilePipeline;
use crate::engine::status_derivation::StatusDeriver;
use crate::importer::data_cleaner::normalize_text;
use crate::importer::file_parser::UniversalFileParser;
use crate::report::reader::read_report_sheet;
use crate::report::writer::{render_workbook, write_atomic, CellValue, SheetData};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};

/// BOM 核对结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomVerification {
    pub column: String,
    /// 所选列的去重非空值
    pub checked_values: Vec<String>,
    /// 终表中零件号命中的行
    pub matched: Vec<TrackingRow>,
    /// 终表中找不到的值
    pub unmatched_values: Vec<String>,
    /// 未命中值中，规范化后与某零件号一致者: (BOM 值, 零件号)
    pub normalized_hints: Vec<(String, String)>,
}

/// 导出文件默认名: seguimiento_{工程师}.xlsx
pub fn default_export_file_name(engineer: Option<&str>) -> String {
    let name = engineer.filter(|e| !e.trim().is_empty()).unwrap_or("todos");
    let safe: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    format!("seguimiento_{}.xlsx", safe)
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    config: ReconcileConfig,
    deriver: StatusDeriver,
    cache: ReportCache,
}

impl DashboardApi {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            deriver: StatusDeriver::new(config.windows),
            config,
            cache: ReportCache::new(),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    // ==========================================
    // 源文件上传
    // ==========================================

    /// 覆盖源工作簿并重跑对账
    ///
    /// # 返回
    /// - Ok(RunSummary): 新报告已写出，缓存已清空
    /// - Err(ApiError): 源文件已覆盖但对账失败时，旧报告保持原样
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn upload_source(&mut self, bytes: &[u8], now: NaiveDateTime) -> ApiResult<RunSummary> {
        if bytes.is_empty() {
            return Err(ApiError::InvalidInput("上传文件为空".to_string()));
        }
        write_atomic(Path::new(&self.config.source_path), bytes)?;
        self.cache.invalidate();
        info!(source = %self.config.source_path, "源文件已更新，重新对账");

        let output = ReconcilePipeline::new(self.config.clone()).run(now)?;
        Ok(output.summary)
    }

    // ==========================================
    // 报告读取
    // ==========================================

    /// 读取报告终表（内容未变化时复用缓存，跟踪状态按 now 重算）
    ///
    /// # 返回
    /// - Err(NoData): 报告文件不存在或终表为空
    pub fn load(&mut self, now: NaiveDateTime) -> ApiResult<&TrackingTable> {
        let output = Path::new(&self.config.output_path);
        if !output.exists() {
            warn!(path = %output.display(), "报告文件不存在");
            return Err(ApiError::NoData(format!(
                "{} 不存在，请先上传源文件",
                output.display()
            )));
        }

        let digest = content_digest(&fs::read(output)?);
        let config = &self.config;
        let deriver = &self.deriver;
        let table = self.cache.get_or_try_insert_with(&digest, || -> ApiResult<TrackingTable> {
            let sheet = read_report_sheet(output, &config.output_sheets.result).map_err(|e| {
                if e.is_missing_report() {
                    warn!(error = %e, "报告缺少终表");
                    ApiError::NoData(e.to_string())
                } else {
                    ApiError::from(e)
                }
            })?;
            let table = TrackingTable::from_raw_sheet(&sheet, &config.columns, deriver, now);
            info!(rows = table.rows.len(), digest = %digest, "报告已载入看板");
            Ok(table)
        })?;
        table.refresh_status(deriver, now);
        if table.is_empty() {
            return Err(ApiError::NoData("报告终表没有数据行".to_string()));
        }
        Ok(table)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn engineers(&mut self, now: NaiveDateTime) -> ApiResult<Vec<String>> {
        self.load(now)?.engineers()
    }

    pub fn suppliers_for(&mut self, engineer: &str, now: NaiveDateTime) -> ApiResult<Vec<String>> {
        self.load(now)?.suppliers_for(engineer)
    }

    pub fn filter(
        &mut self,
        criteria: &FilterCriteria,
        now: NaiveDateTime,
    ) -> ApiResult<Vec<TrackingRow>> {
        self.load(now)?.filter(criteria)
    }

    /// 筛选结果的状态计数
    pub fn status_counts(
        &mut self,
        criteria: &FilterCriteria,
        now: NaiveDateTime,
    ) -> ApiResult<TrackingCounts> {
        Ok(tracking::status_counts(&self.filter(criteria, now)?))
    }

    /// 全表状态分布
    pub fn status_distribution(
        &mut self,
        now: NaiveDateTime,
    ) -> ApiResult<Vec<(TrackingStatus, usize)>> {
        Ok(tracking::status_distribution(&self.load(now)?.rows))
    }

    pub fn parts_without_supplier(&mut self, now: NaiveDateTime) -> ApiResult<Vec<TrackingRow>> {
        self.load(now)?.parts_without_supplier()
    }

    pub fn parts_without_engineer(&mut self, now: NaiveDateTime) -> ApiResult<Vec<TrackingRow>> {
        self.load(now)?.parts_without_engineer()
    }

    /// BOM 核对：所选列的值是否出现在终表零件号中
    ///
    /// # 参数
    /// - bom_path: BOM 文件（xlsx 取第一张表，或 csv）
    /// - column: 零件号所在列名
    #[instrument(skip(self, bom_path, now), fields(path = %bom_path.display()))]
    pub fn verify_bom(
        &mut self,
        bom_path: &Path,
        column: &str,
        now: NaiveDateTime,
    ) -> ApiResult<BomVerification> {
        let sheet = UniversalFileParser.parse(bom_path)?;
        let index = sheet
            .column_index(column)
            .ok_or_else(|| ApiError::ColumnNotFound {
                column: column.to_string(),
                available: sheet.headers.clone(),
            })?;
        let checked_values = sheet.distinct_values(index);
        let wanted: HashSet<String> = checked_values.iter().cloned().collect();

        let table = self.load(now)?;
        let matched = table.rows_with_items(&wanted)?;
        let found: HashSet<&str> = matched.iter().filter_map(|r| r.item.as_deref()).collect();
        let unmatched_values: Vec<String> = checked_values
            .iter()
            .filter(|v| !found.contains(v.as_str()))
            .cloned()
            .collect();

        // 规范化提示（不影响命中结果）
        let mut normalized_items: HashMap<String, &str> = HashMap::new();
        for item in table.rows.iter().filter_map(|r| r.item.as_deref()) {
            normalized_items.entry(normalize_text(Some(item))).or_insert(item);
        }
        let normalized_hints: Vec<(String, String)> = unmatched_values
            .iter()
            .filter_map(|v| {
                let key = normalize_text(Some(v));
                if key.is_empty() {
                    return None;
                }
                normalized_items
                    .get(&key)
                    .map(|item| (v.clone(), item.to_string()))
            })
            .collect();

        info!(
            checked = checked_values.len(),
            matched = matched.len(),
            unmatched = unmatched_values.len(),
            hints = normalized_hints.len(),
            "BOM 核对完成"
        );

        Ok(BomVerification {
            column: column.to_string(),
            checked_values,
            matched,
            unmatched_values,
            normalized_hints,
        })
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出筛选结果（单表 Datos Filtrados，末列为跟踪状态）
    pub fn export_filtered(
        &mut self,
        rows: &[TrackingRow],
        path: &Path,
        now: NaiveDateTime,
    ) -> ApiResult<()> {
        let sheet_name = self.config.output_sheets.filtered.clone();
        let table = self.load(now)?;

        let mut headers = table.headers.clone();
        headers.push(STATUS_COLUMN.to_string());
        let date_columns: Vec<bool> = table
            .headers
            .iter()
            .map(|h| h == EXPIRATION_COLUMN || h == REVISION_COLUMN)
            .collect();

        let data_rows = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<CellValue> = table
                    .headers
                    .iter()
                    .enumerate()
                    .map(|(i, _)| {
                        let value = row.cells.get(i).and_then(|v| v.as_deref());
                        if date_columns[i] {
                            if let Some(dt) = parse_revision_date(value) {
                                return CellValue::DateTime(dt);
                            }
                        }
                        CellValue::text(value)
                    })
                    .collect();
                cells.push(CellValue::Text(row.status.label().to_string()));
                cells
            })
            .collect();

        let bytes = render_workbook(&[SheetData {
            name: sheet_name,
            headers,
            rows: data_rows,
        }])?;
        write_atomic(path, &bytes)?;
        info!(path = %path.display(), rows = rows.len(), "筛选结果已导出");
        Ok(())
    }
}
