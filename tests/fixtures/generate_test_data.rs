// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成对账用的源工作簿与 BOM 核对文件
// 输出: tests/fixtures/datasets/（可用第一个参数覆盖目录）
// ==========================================

use chrono::{Duration, Local, NaiveDate};
use csv::Writer;
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const ITEM_HEADER: &[&str] = &[
    "Item",
    "Supplier Name",
    "Supplier Number",
    "SQE",
    "sumatoria",
    "BU",
    "Lider Proyecto",
];
const DOC_HEADER: &[&str] = &["Number", "Description", "Rev Release Date", "Rev"];
const CONTACT_HEADER: &[&str] = &["SQE", "Email SQE", "Telefono"];
const BOM_HEADER: &[&str] = &["Item", "Customer"];

const ENGINEERS: &[&str] = &["ana", "luis", "marta", "pedro"];
const SUPPLIERS: &[(&str, &str)] = &[
    ("Acme", "1001"),
    ("Beta", "2002"),
    ("Gamma", "3003"),
    ("Delta", "4004"),
];
const CUSTOMERS: &[&str] = &["ACME Motors", "Zeta Corp", "Orion"];

// 零件数据集
struct SourceData {
    items: Vec<Vec<String>>,
    documents: Vec<Vec<String>>,
    contacts: Vec<Vec<String>>,
    bom: Vec<Vec<String>>,
}

fn item_id(index: usize) -> String {
    format!("PN-{:05}", index)
}

/// 修订日期分布: 已过期 / 90 天内到期 / 有效 / 无法解析，轮流出现
fn revision_date(index: usize, today: NaiveDate) -> String {
    match index % 5 {
        0 => (today - Duration::days(400)).format("%Y-%m-%d").to_string(),
        1 => (today - Duration::days(300)).format("%m/%d/%Y").to_string(),
        2 => format!("{} PST", (today - Duration::days(30)).format("%Y-%m-%d %H:%M:%S")),
        3 => (today - Duration::days(120)).format("%Y%m%d").to_string(),
        _ => "pendiente".to_string(),
    }
}

fn generate_source(count: usize, today: NaiveDate) -> SourceData {
    let mut items = Vec::with_capacity(count);
    let mut documents = Vec::with_capacity(count * 2);
    let mut bom = Vec::new();

    for i in 0..count {
        let id = item_id(i);
        let (supplier, number) = SUPPLIERS[i % SUPPLIERS.len()];
        // 每 7 个零件留空工程师，每 11 个零件留空供应商
        let engineer = if i % 7 == 6 { "" } else { ENGINEERS[i % ENGINEERS.len()] };
        let (supplier, number) = if i % 11 == 10 { ("", "") } else { (supplier, number) };
        items.push(vec![
            id.clone(),
            supplier.to_string(),
            number.to_string(),
            engineer.to_string(),
            ((i % 9) + 1).to_string(),
            format!("BU{}", i % 3 + 1),
            if i % 2 == 0 { "Pedro".to_string() } else { String::new() },
        ]);

        // 每 13 个零件没有文档
        if i % 13 == 12 {
            continue;
        }
        documents.push(vec![
            format!("D-{:05}-A", i),
            format!("Plano {} rev A", id),
            (today - Duration::days(800)).format("%Y-%m-%d").to_string(),
            "A".to_string(),
        ]);
        documents.push(vec![
            format!("D-{:05}-B", i),
            format!("Especificación {}", id.to_lowercase()),
            revision_date(i, today),
            "B".to_string(),
        ]);

        if i % 3 != 2 {
            bom.push(vec![id.clone(), CUSTOMERS[i % CUSTOMERS.len()].to_string()]);
        }
    }
    documents.push(vec![
        "D-GENERAL".to_string(),
        "Documento general sin pieza".to_string(),
        today.format("%Y-%m-%d").to_string(),
        "A".to_string(),
    ]);

    let contacts = ENGINEERS
        .iter()
        .enumerate()
        .map(|(i, e)| vec![e.to_string(), format!("{}@corp.com", e), format!("55{:02}", i)])
        .collect();

    SourceData {
        items,
        documents,
        contacts,
        bom,
    }
}

fn write_source(path: &Path, data: &SourceData, with_bom: bool) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let mut tables = vec![
        ("Tabla items", ITEM_HEADER, &data.items),
        ("Tabla Doc", DOC_HEADER, &data.documents),
        ("Tabla correos", CONTACT_HEADER, &data.contacts),
    ];
    if with_bom {
        tables.push(("Tabla Bom", BOM_HEADER, &data.bom));
    }

    for (name, header, rows) in tables {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        for (c, h) in header.iter().enumerate() {
            sheet.write_string(0, c as u16, *h)?;
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string((r + 1) as u32, c as u16, value)?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

fn write_bom_check(path: &Path, count: usize) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(path)?;
    wtr.write_record(["Pieza", "Cantidad"])?;
    for i in (0..count).step_by(4) {
        wtr.write_record([item_id(i), "1".to_string()])?;
    }
    // 不存在的零件 + 仅格式不同的零件
    wtr.write_record(["XX-99999", "2"])?;
    wtr.write_record([item_id(1).to_lowercase().replace('-', " "), "3".to_string()])?;
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/datasets"));
    fs::create_dir_all(&dir)?;
    let today = Local::now().date_naive();

    println!("开始生成测试数据集 → {}", dir.display());

    // 1. 标准源工作簿 (60 个零件)
    let standard = generate_source(60, today);
    write_source(&dir.join("01_standard_source.xlsx"), &standard, true)?;
    println!("✓ 生成 01_standard_source.xlsx ({}个零件)", standard.items.len());

    // 2. 大数据集 (5000 个零件)
    let large = generate_source(5000, today);
    write_source(&dir.join("02_large_source.xlsx"), &large, true)?;
    println!("✓ 生成 02_large_source.xlsx ({}个零件)", large.items.len());

    // 3. 缺少 BOM 工作表
    write_source(&dir.join("03_missing_bom_sheet.xlsx"), &standard, false)?;
    println!("✓ 生成 03_missing_bom_sheet.xlsx (缺少 Tabla Bom)");

    // 4. BOM 核对 CSV
    write_bom_check(&dir.join("04_bom_check.csv"), 60)?;
    println!("✓ 生成 04_bom_check.csv");

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}
