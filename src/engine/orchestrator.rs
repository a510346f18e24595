// ==========================================
// 零件文档有效期对账系统 - 对账编排器
// ==========================================
// 主流程: 加载 → 匹配 → 最新修订 → 关联 → 状态 → 终表 → 写出
// 同一输入与同一 now 的结果确定
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::part::SourceTables;
use crate::domain::report::{ReconciliationArtifacts, RunSummary, StatusCounts};
use crate::engine::error::PipelineResult;
use crate::engine::finalizer::Finalizer;
use crate::engine::joiner::{dedupe_customer_links, Joiner};
use crate::engine::keyword_matcher::KeywordMatcher;
use crate::engine::revision_resolver::RevisionResolver;
use crate::importer::SourceLoader;
use crate::report::ReportWriter;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{info, instrument};
use uuid::Uuid;

// ==========================================
// RunOutput - 单次运行结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub artifacts: ReconciliationArtifacts,
}

// ==========================================
// ReconcilePipeline - 对账编排器
// ==========================================
pub struct ReconcilePipeline {
    config: ReconcileConfig,
}

impl ReconcilePipeline {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// 纯计算部分（不读写文件）
    ///
    /// # 参数
    /// - tables: 已加载的源数据
    /// - now: 状态判定基准时间
    pub fn reconcile(&self, tables: &SourceTables, now: NaiveDateTime) -> ReconciliationArtifacts {
        // === 步骤 1: 零件号索引 + 文档匹配 ===
        let matcher =
            KeywordMatcher::from_identifiers(tables.items.parts.iter().map(|p| p.item.as_str()));
        let mut matched_documents = matcher.match_documents(&tables.documents.records);

        // === 步骤 2: 最新修订 ===
        let resolver = RevisionResolver::new();
        resolver.annotate_dates(&mut matched_documents);
        let revisions = resolver.resolve(&matched_documents);

        // === 步骤 3: 三段左关联 ===
        let customer_links = dedupe_customer_links(&tables.bom.links);
        let joined = Joiner::new().join(
            &tables.items,
            &revisions,
            &customer_links,
            &tables.contacts,
        );
        let joined_rows = joined.rows.len();
        let contact_join_applied = joined.contact_join_applied;

        // === 步骤 4: 状态 + 终表 ===
        let report = Finalizer::new(&self.config).finalize(
            &tables.items,
            &tables.contacts,
            joined,
            now,
        );

        info!(
            keywords = matcher.len(),
            documents = tables.documents.records.len(),
            matched = matched_documents.len(),
            revisions = revisions.len(),
            joined_rows,
            final_rows = report.rows.len(),
            "对账计算完成"
        );

        ReconciliationArtifacts {
            document_headers: tables.documents.headers.clone(),
            matched_documents,
            revisions,
            customer_links,
            joined_rows,
            contact_join_applied,
            report,
        }
    }

    /// 完整运行：读取配置中的源文件，写出配置中的报告路径
    pub fn run(&self, now: NaiveDateTime) -> PipelineResult<RunOutput> {
        self.run_with_paths(
            Path::new(&self.config.source_path),
            Path::new(&self.config.output_path),
            now,
        )
    }

    /// 完整运行（显式路径）
    ///
    /// # 返回
    /// - Err(Import): 源文件/工作表/列缺失，报告文件未被触碰
    /// - Err(Report): 写出失败，旧报告保持原样
    #[instrument(skip(self, source, output), fields(run_id))]
    pub fn run_with_paths(
        &self,
        source: &Path,
        output: &Path,
        now: NaiveDateTime,
    ) -> PipelineResult<RunOutput> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(source = %source.display(), output = %output.display(), %now, "开始对账");

        let tables = SourceLoader::new(&self.config).load(source)?;
        let artifacts = self.reconcile(&tables, now);

        ReportWriter::new(&self.config.output_sheets, &self.config.columns)
            .write(&artifacts, output)?;

        let summary = RunSummary {
            run_id,
            now,
            total_documents: tables.documents.records.len(),
            matched_documents: artifacts.matched_documents.len(),
            resolved_revisions: artifacts.revisions.len(),
            customer_links: artifacts.customer_links.len(),
            joined_rows: artifacts.joined_rows,
            final_rows: artifacts.report.rows.len(),
            contact_join_applied: artifacts.contact_join_applied,
            status_counts: StatusCounts::tally(
                artifacts.report.rows.iter().map(|r| r.status.as_ref()),
            ),
            output_path: output.display().to_string(),
        };

        info!(
            final_rows = summary.final_rows,
            expired = summary.status_counts.expired,
            expiring_soon = summary.status_counts.expiring_soon,
            valid = summary.status_counts.valid,
            unknown = summary.status_counts.unknown,
            "对账完成"
        );

        Ok(RunOutput { summary, artifacts })
    }
}
