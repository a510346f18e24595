// ==========================================
// 零件文档有效期对账系统 - 源工作簿加载器
// ==========================================
// 职责: 读取四张必需工作表 → SourceTables
// 红线: 任一工作表缺失立即失败，错误信息包含缺失表名与现有表名
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::part::SourceTables;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::ExcelWorkbook;
use crate::importer::importer_trait::FieldMapper as _;
use std::path::Path;
use tracing::{error, info, instrument};

pub struct SourceLoader<'a> {
    config: &'a ReconcileConfig,
    mapper: FieldMapper,
}

impl<'a> SourceLoader<'a> {
    pub fn new(config: &'a ReconcileConfig) -> Self {
        Self {
            config,
            mapper: FieldMapper::new(config.columns.clone()),
        }
    }

    /// 加载源工作簿
    ///
    /// # 返回
    /// - Err(FileNotFound): 文件不存在
    /// - Err(MissingSheet): 必需工作表缺失（在解析任何工作表之前检查）
    /// - Err(MissingColumn): 必需列缺失
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<SourceTables> {
        info!("校验源文件与工作表");
        let mut workbook = ExcelWorkbook::open(file_path.as_ref()).map_err(|e| {
            error!(error = %e, "源文件打开失败");
            e
        })?;

        let available = workbook.sheet_names();
        for (logical, sheet) in self.config.sheets.required() {
            if !available.iter().any(|s| s == sheet) {
                error!(logical, sheet, ?available, "缺少必需工作表");
                return Err(ImportError::MissingSheet {
                    sheet: sheet.to_string(),
                    available,
                });
            }
        }

        let sheets = &self.config.sheets;
        let items = self.mapper.map_parts(&workbook.read_sheet(&sheets.items)?)?;
        let documents = self
            .mapper
            .map_documents(&workbook.read_sheet(&sheets.documents)?)?;
        let contacts = self
            .mapper
            .map_contacts(&workbook.read_sheet(&sheets.contacts)?)?;
        let bom = self.mapper.map_bom(&workbook.read_sheet(&sheets.bom)?)?;

        info!(
            parts = items.parts.len(),
            documents = documents.records.len(),
            contacts = contacts.records.len(),
            bom_rows = bom.links.len(),
            "工作表加载完成"
        );

        Ok(SourceTables {
            items,
            documents,
            contacts,
            bom,
        })
    }
}
