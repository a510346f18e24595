// ==========================================
// 零件文档有效期对账系统 - 命令行入口
// ==========================================
// 子命令: run / summary / export / verify-bom / upload
// 错误在此边界统一转为 anyhow
// ==========================================

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use part_doc_tracker::api::{
    default_export_file_name, status_counts, ApiError, DashboardApi, FilterCriteria,
};
use part_doc_tracker::engine::parse_revision_date;
use part_doc_tracker::i18n::{set_locale, t, t_with_args};
use part_doc_tracker::logging::{self, LogFormat};
use part_doc_tracker::{ConfigManager, ReconcilePipeline, TrackingStatus};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "part-doc-tracker")]
#[command(about = "零件文档有效期对账与跟踪")]
#[command(version)]
struct Cli {
    /// JSON 配置文件（缺省使用内置默认值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 界面语言: zh-CN / en / es
    #[arg(long, global = true, default_value = "zh-CN")]
    locale: String,

    /// 输出 JSON 格式日志
    #[arg(long, global = true)]
    json_log: bool,

    /// 状态判定基准时间（缺省为当前本地时间）
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行对账并写出报告
    Run {
        /// 源工作簿路径
        #[arg(long)]
        source: Option<PathBuf>,
        /// 报告输出路径
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 查看看板状态统计
    Summary {
        /// 只统计某个 SQE
        #[arg(long)]
        engineer: Option<String>,
    },
    /// 导出筛选结果
    Export {
        #[arg(long)]
        engineer: Option<String>,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        /// VENCIDO / POR VENCER / VIGENTE
        #[arg(long)]
        status: Option<String>,
        /// 输出文件（缺省 seguimiento_{SQE}.xlsx）
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// 用 BOM 文件核对零件号
    VerifyBom {
        #[arg(long)]
        file: PathBuf,
        /// 零件号所在列
        #[arg(long)]
        column: String,
    },
    /// 上传新的源工作簿并重新对账
    Upload {
        #[arg(long)]
        file: PathBuf,
    },
}

fn resolve_now(raw: Option<&str>) -> Result<NaiveDateTime> {
    match raw {
        Some(s) => parse_revision_date(Some(s)).with_context(|| format!("无法解析时间: {}", s)),
        None => Ok(Local::now().naive_local()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_with(LogFormat::from_flag(cli.json_log));
    set_locale(&cli.locale);

    let manager = ConfigManager::load(cli.config.as_deref()).context("配置加载失败")?;
    let config_snapshot = manager.snapshot().context("配置序列化失败")?;
    let mut config = manager.into_config();
    let now = resolve_now(cli.now.as_deref())?;

    info!(
        version = part_doc_tracker::VERSION,
        app = part_doc_tracker::APP_NAME,
        "启动"
    );

    match cli.command {
        Commands::Run { source, output } => {
            if let Some(source) = source {
                config.source_path = source.display().to_string();
            }
            if let Some(output) = output {
                config.output_path = output.display().to_string();
            }
            println!(
                "{}",
                t_with_args("cli.run_started", &[("source", config.source_path.as_str())])
            );

            let pipeline = ReconcilePipeline::new(config);
            let run = pipeline.run(now).map_err(|e| {
                if e.is_missing_input() {
                    error!(error = %e, "输入缺失");
                    eprintln!(
                        "{}",
                        t_with_args("error.missing_input", &[("detail", e.to_string().as_str())])
                    );
                }
                e
            })?;
            let s = &run.summary;
            println!(
                "{}",
                t_with_args(
                    "cli.run_counts",
                    &[
                        ("documents", s.total_documents.to_string().as_str()),
                        ("matched", s.matched_documents.to_string().as_str()),
                        ("rows", s.final_rows.to_string().as_str()),
                    ],
                )
            );
            println!(
                "{}",
                t_with_args(
                    "cli.status_line",
                    &[
                        ("expired", s.status_counts.expired.to_string().as_str()),
                        ("expiring", s.status_counts.expiring_soon.to_string().as_str()),
                        ("valid", s.status_counts.valid.to_string().as_str()),
                        ("unknown", s.status_counts.unknown.to_string().as_str()),
                    ],
                )
            );
            println!(
                "{}",
                t_with_args("cli.run_finished", &[("output", s.output_path.as_str())])
            );
            info!(
                run_id = %s.run_id,
                output = %s.output_path,
                final_rows = s.final_rows,
                config = %config_snapshot,
                "运行汇总"
            );
        }

        Commands::Summary { engineer } => {
            let mut api = DashboardApi::new(config);
            let criteria = FilterCriteria {
                engineer,
                ..Default::default()
            };
            let counts = match api.status_counts(&criteria, now) {
                Err(ApiError::NoData(detail)) => {
                    info!(%detail, "看板无数据");
                    println!("{}", t("cli.no_data"));
                    return Ok(());
                }
                other => other?,
            };
            println!(
                "{}",
                t_with_args(
                    "cli.tracking_line",
                    &[
                        ("vencido", counts.vencido.to_string().as_str()),
                        ("por_vencer", counts.por_vencer.to_string().as_str()),
                        ("vigente", counts.vigente.to_string().as_str()),
                    ],
                )
            );
            for (status, count) in api.status_distribution(now)? {
                println!("  {:<12} {}", status.label(), count);
            }
        }

        Commands::Export {
            engineer,
            supplier,
            customer,
            status,
            out,
        } => {
            let status = match status {
                Some(s) => Some(
                    TrackingStatus::from_label(&s)
                        .with_context(|| format!("未知状态: {}", s))?,
                ),
                None => None,
            };
            let path = out.unwrap_or_else(|| {
                PathBuf::from(default_export_file_name(engineer.as_deref()))
            });
            let criteria = FilterCriteria {
                engineer,
                supplier,
                customer,
                status,
            };

            let mut api = DashboardApi::new(config);
            let rows = api.filter(&criteria, now)?;
            api.export_filtered(&rows, &path, now)?;
            let counts = status_counts(&rows);
            info!(
                vencido = counts.vencido,
                por_vencer = counts.por_vencer,
                vigente = counts.vigente,
                "导出统计"
            );
            println!(
                "{}",
                t_with_args(
                    "cli.export_done",
                    &[
                        ("rows", rows.len().to_string().as_str()),
                        ("path", path.display().to_string().as_str()),
                    ],
                )
            );
        }

        Commands::VerifyBom { file, column } => {
            let mut api = DashboardApi::new(config);
            let result = api.verify_bom(&file, &column, now)?;
            for row in &result.matched {
                println!(
                    "  {:<20} {:<12} {}",
                    row.item.as_deref().unwrap_or(""),
                    row.status.label(),
                    row.engineer.as_deref().unwrap_or("")
                );
            }
            println!(
                "{}",
                t_with_args(
                    "cli.bom_result",
                    &[
                        ("checked", result.checked_values.len().to_string().as_str()),
                        ("matched", result.matched.len().to_string().as_str()),
                        ("unmatched", result.unmatched_values.len().to_string().as_str()),
                    ],
                )
            );
            for (value, item) in &result.normalized_hints {
                println!("  ? {} → {}", value, item);
            }
        }

        Commands::Upload { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("无法读取上传文件: {}", file.display()))?;
            let mut api = DashboardApi::new(config);
            let summary = api.upload_source(&bytes, now)?;
            println!(
                "{}",
                t_with_args("cli.upload_done", &[("run_id", summary.run_id.as_str())])
            );
        }
    }

    Ok(())
}
