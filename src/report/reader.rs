// ==========================================
// 零件文档有效期对账系统 - 报告读回
// ==========================================
// 职责: 看板从已写出的报告工作簿读取对账终表
// ==========================================

use crate::importer::file_parser::{ExcelWorkbook, RawSheet};
use crate::report::error::ReportResult;
use std::path::Path;
use tracing::debug;

/// 读取报告中的指定工作表
pub fn read_report_sheet(path: &Path, sheet: &str) -> ReportResult<RawSheet> {
    let mut workbook = ExcelWorkbook::open(path)?;
    let table = workbook.read_sheet(sheet)?;
    debug!(
        path = %path.display(),
        sheet,
        rows = table.rows.len(),
        "报告工作表已读取"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::writer::{render_workbook, write_atomic, CellValue, SheetData};
    use tempfile::tempdir;

    #[test]
    fn test_read_back_written_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.xlsx");
        let bytes = render_workbook(&[SheetData {
            name: "resultado final".to_string(),
            headers: vec!["item".to_string(), "estatus".to_string()],
            rows: vec![vec![
                CellValue::Text("A".to_string()),
                CellValue::Text("Vigente".to_string()),
            ]],
        }])
        .unwrap();
        write_atomic(&path, &bytes).unwrap();

        let sheet = read_report_sheet(&path, "resultado final").unwrap();
        assert_eq!(sheet.headers, vec!["item", "estatus"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.cell(&sheet.rows[0], 0), Some("A"));
    }

    #[test]
    fn test_missing_report_is_flagged() {
        let dir = tempdir().unwrap();
        let err = read_report_sheet(&dir.path().join("nope.xlsx"), "resultado final").unwrap_err();
        assert!(err.is_missing_report());
    }
}
