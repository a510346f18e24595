// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试目标: 读回报告 → 跟踪状态 / 筛选 / 统计 / BOM 核对 / 导出 / 上传重跑
// ==========================================


use part_doc_tracker::api::{default_export_file_name, ApiError, DashboardApi, FilterCriteria, TrackingRow};
use part_doc_tracker::{logging, ReconcileConfig, ReconcilePipeline, TrackingStatus};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use test_helpers::*;

/// 生成源文件并跑一次对账，返回可用的看板
fn prepared_api() -> (TempDir, DashboardApi) {
    logging::init_test();
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    write_standard_source(Path::new(&config.source_path)).unwrap();
    ReconcilePipeline::new(config.clone()).run(fixed_now()).unwrap();
    (dir, DashboardApi::new(config))
}

fn items_of(rows: &[TrackingRow]) -> Vec<String> {
    let mut items: Vec<String> = rows.iter().filter_map(|r| r.item.clone()).collect();
    items.sort();
    items
}

#[test]
fn test_load_derives_tracking_status() {
    let (_dir, mut api) = prepared_api();
    let table = api.load(fixed_now()).unwrap();

    assert!(table.headers.contains(&"ultima_actualizacion".to_string()));
    assert!(table.headers.contains(&"supplier_name".to_string()));

    let status = |item: &str| {
        table
            .rows
            .iter()
            .find(|r| r.item.as_deref() == Some(item))
            .map(|r| r.status)
            .unwrap()
    };
    assert_eq!(status("AB-1000"), TrackingStatus::Vencido);
    assert_eq!(status("IJ-500"), TrackingStatus::PorVencer);
    // 报告中为 "Por expirar"（90 天），看板 30 天窗口下仍为 VIGENTE
    assert_eq!(status("CD-200"), TrackingStatus::Vigente);
    // 无到期日
    assert_eq!(status("NO-DOC"), TrackingStatus::Vigente);
}

#[test]
fn test_engineers_and_filter() {
    let (_dir, mut api) = prepared_api();
    let now = fixed_now();

    assert_eq!(api.engineers(now).unwrap(), vec!["ana", "luis"]);
    assert_eq!(api.suppliers_for("luis", now).unwrap(), vec!["Beta", "Delta"]);

    let ana = api
        .filter(
            &FilterCriteria {
                engineer: Some("ana".to_string()),
                ..Default::default()
            },
            now,
        )
        .unwrap();
    assert_eq!(items_of(&ana), vec!["AB-100", "AB-1000", "GH-400"]);

    let expired_for_ana = api
        .filter(
            &FilterCriteria {
                engineer: Some("ana".to_string()),
                status: Some(TrackingStatus::Vencido),
                ..Default::default()
            },
            now,
        )
        .unwrap();
    assert_eq!(items_of(&expired_for_ana), vec!["AB-1000", "GH-400"]);

    let zeta = api
        .filter(
            &FilterCriteria {
                customer: Some("Zeta Corp".to_string()),
                ..Default::default()
            },
            now,
        )
        .unwrap();
    assert_eq!(items_of(&zeta), vec!["CD-200"]);
}

#[test]
fn test_status_counts_and_distribution() {
    let (_dir, mut api) = prepared_api();
    let now = fixed_now();

    let counts = api.status_counts(&FilterCriteria::default(), now).unwrap();
    assert_eq!(counts.vencido, 2);
    assert_eq!(counts.por_vencer, 1);
    assert_eq!(counts.vigente, 4);

    let distribution = api.status_distribution(now).unwrap();
    assert_eq!(distribution[0], (TrackingStatus::Vigente, 4));
    assert_eq!(distribution.iter().map(|(_, n)| n).sum::<usize>(), 7);
}

#[test]
fn test_parts_missing_supplier_or_engineer() {
    let (_dir, mut api) = prepared_api();
    let now = fixed_now();

    assert_eq!(items_of(&api.parts_without_supplier(now).unwrap()), vec!["GH-400"]);
    assert_eq!(items_of(&api.parts_without_engineer(now).unwrap()), vec!["EF-300"]);
}

#[test]
fn test_verify_bom_membership() {
    let (dir, mut api) = prepared_api();
    let bom_path = dir.path().join("bom.csv");
    fs::write(&bom_path, "Pieza,Cantidad\nAB-100,1\nXX-999,2\ncd 200,3\nAB-100,4\n").unwrap();

    let result = api.verify_bom(&bom_path, "Pieza", fixed_now()).unwrap();
    assert_eq!(result.checked_values, vec!["AB-100", "XX-999", "cd 200"]);
    assert_eq!(items_of(&result.matched), vec!["AB-100"]);
    assert_eq!(result.unmatched_values, vec!["XX-999", "cd 200"]);
    assert_eq!(
        result.normalized_hints,
        vec![("cd 200".to_string(), "CD-200".to_string())]
    );
}

#[test]
fn test_verify_bom_unknown_column() {
    let (dir, mut api) = prepared_api();
    let bom_path = dir.path().join("bom.xlsx");
    write_workbook(
        &bom_path,
        &[TableSpec::new("Hoja1", &["Parte"], &[&["AB-100"]])],
    )
    .unwrap();

    let err = api.verify_bom(&bom_path, "Pieza", fixed_now()).unwrap_err();
    match err {
        ApiError::ColumnNotFound { column, available } => {
            assert_eq!(column, "Pieza");
            assert_eq!(available, vec!["Parte"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_export_filtered() {
    let (dir, mut api) = prepared_api();
    let now = fixed_now();
    let criteria = FilterCriteria {
        engineer: Some("luis".to_string()),
        ..Default::default()
    };
    let rows = api.filter(&criteria, now).unwrap();
    let path = dir.path().join(default_export_file_name(Some("luis")));
    api.export_filtered(&rows, &path, now).unwrap();

    assert_eq!(sheet_names(&path).unwrap(), vec!["Datos Filtrados"]);
    let grid = read_sheet(&path, "Datos Filtrados").unwrap();
    assert_eq!(grid[0].first().map(|s| s.as_str()), Some("item"));
    assert_eq!(grid[0].last().map(|s| s.as_str()), Some("status"));
    assert_eq!(grid.len() - 1, rows.len());

    let ij = find_row(&grid, "IJ-500").unwrap();
    assert_eq!(column(&grid, ij, "status"), "POR VENCER");
    assert_eq!(column(&grid, ij, "fecha_expiracion"), "2024-09-20 00:00:00");
}

#[test]
fn test_cache_reused_until_report_changes() {
    let (dir, mut api) = prepared_api();
    let now = fixed_now();

    api.load(now).unwrap();
    api.load(now).unwrap();
    assert_eq!(api.cache().misses(), 1);
    assert_eq!(api.cache().hits(), 1);

    // 报告内容变化 → 摘要变化 → 重新读取
    let config = config_in(dir.path());
    let mut tables = standard_tables();
    tables[0].rows.push(vec!["ZZ-900".to_string()]);
    write_workbook(Path::new(&config.source_path), &tables).unwrap();
    ReconcilePipeline::new(config).run(now).unwrap();

    let table = api.load(now).unwrap();
    assert!(table.rows.iter().any(|r| r.item.as_deref() == Some("ZZ-900")));
    assert_eq!(api.cache().misses(), 2);
}

#[test]
fn test_upload_source_reruns_pipeline() {
    logging::init_test();
    let dir = tempdir().unwrap();
    let config = config_in(dir.path());
    let staging = dir.path().join("nueva.xlsx");
    write_standard_source(&staging).unwrap();

    let mut api = DashboardApi::new(config.clone());
    assert!(matches!(api.load(fixed_now()), Err(ApiError::NoData(_))));

    let summary = api
        .upload_source(&fs::read(&staging).unwrap(), fixed_now())
        .unwrap();
    assert_eq!(summary.final_rows, 7);
    assert!(Path::new(&config.source_path).exists());
    assert!(api.cache().digest().is_none());

    let table = api.load(fixed_now()).unwrap();
    assert_eq!(table.rows.len(), 7);
}

#[test]
fn test_upload_with_broken_source_keeps_report() {
    let (dir, mut api) = prepared_api();
    let config: ReconcileConfig = config_in(dir.path());
    let previous = fs::read(&config.output_path).unwrap();

    let broken = dir.path().join("rota.xlsx");
    write_workbook(&broken, &[items_table()]).unwrap();
    let err = api
        .upload_source(&fs::read(&broken).unwrap(), fixed_now())
        .unwrap_err();
    assert!(matches!(err, ApiError::Pipeline(ref e) if e.is_missing_input()));
    assert_eq!(fs::read(&config.output_path).unwrap(), previous);
}
