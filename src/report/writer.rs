// ==========================================
// 零件文档有效期对账系统 - 报告写出
// ==========================================
// 职责: 把对账产出写成 Excel 工作簿
// 工作表: coincidencia_raw / ultima_actualizacion / bom_customers / resultado final
// 写出方式: 先在内存中生成完整工作簿，再写临时文件并原子替换，
//           任何一步失败都不会留下半成品，旧报告保持原样
// ==========================================

use crate::config::{OutputSheets, SourceColumns};
use crate::domain::part::Quantity;
use crate::domain::report::{OutputColumn, ReconciliationArtifacts, ResultRow};
use crate::domain::types::ReportStatus;
use crate::report::error::{ReportError, ReportResult};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// 匹配明细表追加的两列
pub const MATCHED_ITEM_HEADER: &str = "ItemEncontrado";
pub const PARSED_DATE_HEADER: &str = "Rev Release Date Parsed";
/// 修订表列名
pub const REVISION_DATE_HEADER: &str = "ultima_actualizacion_full";
pub const REVISION_DOC_HEADER: &str = "doc";

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

// ==========================================
// CellValue / SheetData - 待写出的表格
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    /// 带底色的状态单元格
    Status(ReportStatus),
}

impl CellValue {
    pub fn text(value: Option<&str>) -> Self {
        match value {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Empty,
        }
    }

    pub fn datetime(value: Option<NaiveDateTime>) -> Self {
        value.map(CellValue::DateTime).unwrap_or(CellValue::Empty)
    }

    pub fn quantity(value: Option<&Quantity>) -> Self {
        match value {
            Some(Quantity::Number(n)) => CellValue::Number(*n),
            Some(Quantity::Text(s)) => CellValue::Text(s.clone()),
            None => CellValue::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ==========================================
// 各工作表构建
// ==========================================

/// 匹配明细：文档表全部原始列 + 命中零件号 + 解析后日期
pub fn raw_matches_sheet(name: &str, artifacts: &ReconciliationArtifacts) -> SheetData {
    let mut headers = artifacts.document_headers.clone();
    headers.push(MATCHED_ITEM_HEADER.to_string());
    headers.push(PARSED_DATE_HEADER.to_string());

    let width = artifacts.document_headers.len();
    let rows = artifacts
        .matched_documents
        .iter()
        .map(|m| {
            let mut row: Vec<CellValue> = (0..width)
                .map(|i| CellValue::text(m.record.raw.get(i).and_then(|v| v.as_deref())))
                .collect();
            row.push(CellValue::Text(m.item.clone()));
            row.push(CellValue::datetime(m.parsed_date));
            row
        })
        .collect();

    SheetData {
        name: name.to_string(),
        headers,
        rows,
    }
}

/// 最新修订表
pub fn revisions_sheet(
    name: &str,
    columns: &SourceColumns,
    artifacts: &ReconciliationArtifacts,
) -> SheetData {
    SheetData {
        name: name.to_string(),
        headers: vec![
            columns.item.clone(),
            REVISION_DATE_HEADER.to_string(),
            REVISION_DOC_HEADER.to_string(),
        ],
        rows: artifacts
            .revisions
            .iter()
            .map(|r| {
                vec![
                    CellValue::Text(r.item.clone()),
                    CellValue::datetime(r.revision_date),
                    CellValue::text(r.doc.as_deref()),
                ]
            })
            .collect(),
    }
}

/// 零件-客户对
pub fn customers_sheet(
    name: &str,
    columns: &SourceColumns,
    artifacts: &ReconciliationArtifacts,
) -> SheetData {
    SheetData {
        name: name.to_string(),
        headers: vec![columns.item.clone(), columns.customer.clone()],
        rows: artifacts
            .customer_links
            .iter()
            .map(|l| {
                vec![
                    CellValue::Text(l.item.clone()),
                    CellValue::text(l.customer.as_deref()),
                ]
            })
            .collect(),
    }
}

fn result_cell(row: &ResultRow, column: &OutputColumn) -> CellValue {
    match column {
        OutputColumn::Item => CellValue::Text(row.item.clone()),
        OutputColumn::Doc => CellValue::text(row.doc.as_deref()),
        OutputColumn::RevisionDate => CellValue::datetime(row.revision_date),
        OutputColumn::ExpirationDate => CellValue::datetime(row.expiration_date),
        OutputColumn::Status => row.status.map(CellValue::Status).unwrap_or(CellValue::Empty),
        OutputColumn::SupplierName => CellValue::text(row.supplier_name.as_deref()),
        OutputColumn::SupplierNumber => CellValue::text(row.supplier_number.as_deref()),
        OutputColumn::Engineer => CellValue::text(row.engineer.as_deref()),
        OutputColumn::Quantity => CellValue::quantity(row.quantity.as_ref()),
        OutputColumn::BusinessUnit => CellValue::text(row.business_unit.as_deref()),
        OutputColumn::Customer => CellValue::text(row.customer.as_deref()),
        OutputColumn::Extra { index, .. } => {
            CellValue::text(row.extra.get(*index).and_then(|v| v.as_deref()))
        }
    }
}

/// 对账终表
pub fn result_sheet(name: &str, artifacts: &ReconciliationArtifacts) -> SheetData {
    let report = &artifacts.report;
    SheetData {
        name: name.to_string(),
        headers: report.headers().into_iter().map(|h| h.to_string()).collect(),
        rows: report
            .rows
            .iter()
            .map(|row| report.columns.iter().map(|c| result_cell(row, c)).collect())
            .collect(),
    }
}

// ==========================================
// 工作簿渲染
// ==========================================

fn status_format(status: ReportStatus) -> Format {
    Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(status.fill_rgb()))
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetData) -> ReportResult<()> {
    worksheet.set_name(&sheet.name)?;

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATETIME_FORMAT);

    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (r, row) in sheet.rows.iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let col = c as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(excel_row, col, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(excel_row, col, *n)?;
                }
                CellValue::DateTime(dt) => {
                    worksheet.write_datetime_with_format(excel_row, col, dt, &date_format)?;
                }
                CellValue::Status(status) => {
                    worksheet.write_string_with_format(
                        excel_row,
                        col,
                        status.label(),
                        &status_format(*status),
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// 在内存中生成工作簿
pub fn render_workbook(sheets: &[SheetData]) -> ReportResult<Vec<u8>> {
    if sheets.is_empty() {
        return Err(ReportError::MalformedReport("工作簿至少需要一张工作表".to_string()));
    }
    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet)?;
    }
    Ok(workbook.save_to_buffer()?)
}

/// 原子写入：同目录临时文件 + rename
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ReportResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ReportError::MalformedReport(format!("输出路径无文件名: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let io_err = |source: std::io::Error| ReportError::FileWriteError {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&tmp_path, bytes).map_err(io_err)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(io_err(e));
    }
    Ok(())
}

// ==========================================
// ReportWriter
// ==========================================
pub struct ReportWriter<'a> {
    sheets: &'a OutputSheets,
    columns: &'a SourceColumns,
}

impl<'a> ReportWriter<'a> {
    pub fn new(sheets: &'a OutputSheets, columns: &'a SourceColumns) -> Self {
        Self { sheets, columns }
    }

    /// 四张报告表（按输出顺序）
    pub fn build_sheets(&self, artifacts: &ReconciliationArtifacts) -> Vec<SheetData> {
        vec![
            raw_matches_sheet(&self.sheets.raw_matches, artifacts),
            revisions_sheet(&self.sheets.revisions, self.columns, artifacts),
            customers_sheet(&self.sheets.customers, self.columns, artifacts),
            result_sheet(&self.sheets.result, artifacts),
        ]
    }

    /// 写出报告工作簿（整体替换）
    #[instrument(skip(self, artifacts, path), fields(path = %path.display()))]
    pub fn write(&self, artifacts: &ReconciliationArtifacts, path: &Path) -> ReportResult<()> {
        let bytes = render_workbook(&self.build_sheets(artifacts))?;
        write_atomic(path, &bytes)?;
        info!(
            bytes = bytes.len(),
            rows = artifacts.report.rows.len(),
            "报告已写出"
        );
        Ok(())
    }
}
