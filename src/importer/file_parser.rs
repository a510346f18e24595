// ==========================================
// 零件文档有效期对账系统 - 文件解析器实现
// ==========================================
// 支持: 工作簿 (.xlsx/.xlsm/.xls/.ods) 多表读取 / CSV 单表读取
// 约定: 首行为表头（TRIM）；完全空白的行跳过；单元格统一转为文本
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, DataType, Range, Reader, Sheets};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// ==========================================
// RawSheet - 原始表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 源文件中的行号（表头为第 1 行）
    pub row_number: usize,
    /// 与 headers 对齐，空单元格为 None
    pub cells: Vec<Option<String>>,
}

impl RawSheet {
    /// 由表头与行构造；重复表头追加 ".1"/".2" 后缀，空表头命名为 "Unnamed: i"
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers: dedupe_headers(headers),
            rows,
        }
    }

    /// 精确列名查找
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// 精确查找失败时，按 TRIM + 不区分大小写再查一次
    pub fn column_index_relaxed(&self, column: &str) -> Option<usize> {
        self.column_index(column).or_else(|| {
            let wanted = column.trim().to_lowercase();
            self.headers
                .iter()
                .position(|h| h.trim().to_lowercase() == wanted)
        })
    }

    /// 必需列查找
    pub fn require_column(&self, column: &str) -> ImportResult<usize> {
        self.column_index(column)
            .ok_or_else(|| ImportError::MissingColumn {
                sheet: self.name.clone(),
                column: column.to_string(),
                available: self.headers.clone(),
            })
    }

    pub fn cell<'a>(&self, row: &'a RawRow, index: usize) -> Option<&'a str> {
        row.cells.get(index).and_then(|c| c.as_deref())
    }

    /// 某列所有非空值（去重，保持首次出现顺序）
    pub fn distinct_values(&self, index: usize) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| self.cell(r, index))
            .filter(|v| seen.insert(v.to_string()))
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| {
            let base = if h.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h
            };
            let n = counts.entry(base.clone()).or_insert(0);
            let name = if *n == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, n)
            };
            *n += 1;
            name
        })
        .collect()
}

// ==========================================
// 单元格 → 文本
// ==========================================

/// 单元格转文本
///
/// - 整数值浮点数不带小数部分（123.0 → "123"）
/// - Excel 日期 → "YYYY-MM-DD HH:MM:SS"
/// - 空单元格、错误单元格、空白文本 → None
pub fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string().trim().to_string(),
        },
        Data::DurationIso(s) => s.trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Range → RawSheet（首行为表头）
pub fn range_to_raw_sheet(name: &str, range: &Range<Data>) -> RawSheet {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_to_string(cell).unwrap_or_default())
            .collect(),
        None => return RawSheet::new(name, Vec::new(), Vec::new()),
    };

    let first_row = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);
    let mut records = Vec::new();
    for (offset, data_row) in rows.enumerate() {
        let mut cells: Vec<Option<String>> = data_row.iter().map(cell_to_string).collect();
        cells.resize(headers.len(), None);

        // 跳过完全空白的行
        if cells.iter().all(Option::is_none) {
            continue;
        }

        records.push(RawRow {
            row_number: first_row + offset + 1,
            cells,
        });
    }

    RawSheet::new(name, headers, records)
}

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// ExcelWorkbook - 多表工作簿
// ==========================================
pub struct ExcelWorkbook {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// 打开工作簿（按扩展名自动识别格式）
    pub fn open<P: AsRef<Path>>(file_path: P) -> ImportResult<Self> {
        let path = file_path.as_ref();
        check_exists(path)?;

        let ext = extension_of(path);
        if !WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let workbook = open_workbook_auto(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// 读取指定工作表
    pub fn read_sheet(&mut self, sheet: &str) -> ImportResult<RawSheet> {
        let available = self.sheet_names();
        if !available.iter().any(|s| s == sheet) {
            return Err(ImportError::MissingSheet {
                sheet: sheet.to_string(),
                available,
            });
        }

        let range = self.workbook.worksheet_range(sheet)?;
        let raw = range_to_raw_sheet(sheet, &range);
        debug!(
            path = %self.path.display(),
            sheet = %sheet,
            columns = raw.headers.len(),
            rows = raw.rows.len(),
            "工作表读取完成"
        );
        Ok(raw)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        let path = file_path;

        // 检查文件存在
        check_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 CSV 文件
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        // 读取所有行
        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let mut cells: Vec<Option<String>> = record
                .iter()
                .map(|v| {
                    let t = v.trim();
                    (!t.is_empty()).then(|| t.to_string())
                })
                .collect();
            cells.resize(headers.len(), None);

            // 跳过完全空白的行
            if cells.iter().all(Option::is_none) {
                continue;
            }

            rows.push(RawRow {
                row_number: row_idx + 2,
                cells,
            });
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("csv")
            .to_string();
        Ok(RawSheet::new(name, headers, rows))
    }
}

// ==========================================
// Excel Parser 实现（读取首个工作表）
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_sheet(&self, file_path: &Path) -> ImportResult<RawSheet> {
        let mut workbook = ExcelWorkbook::open(file_path)?;

        let sheet_names = workbook.sheet_names();
        let first = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        workbook.read_sheet(&first)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawSheet> {
        let path = file_path.as_ref();
        let ext = extension_of(path);

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_sheet(path),
            e if WORKBOOK_EXTENSIONS.contains(&e) => ExcelParser.parse_to_raw_sheet(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
