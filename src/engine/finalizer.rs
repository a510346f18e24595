// ==========================================
// 零件文档有效期对账系统 - 终表生成
// ==========================================
// 职责: 计算到期日与状态，确定输出列，排序并按零件号去重
// 规则:
// - 固定列: item, doc, ultima actualizacion, fecha_expiracion, estatus
// - 其后依次为源表中存在的 供应商名称/供应商编号/SQE/数量/BU 以及 Customer
// - 再追加列名命中联系人模式的附加列（零件表在前，联系人表在后，重名保留先出现者）
// - 按修订日期降序（空值最后）稳定排序后，每个零件号保留第一行
// ==========================================

use crate::config::ReconcileConfig;
use crate::domain::part::{ContactTable, PartTable};
use crate::domain::report::{ColumnNames, OutputColumn, ReconciliationReport, ResultRow};
use crate::engine::joiner::{JoinOutcome, JoinedRow};
use crate::engine::revision_resolver::compare_date_desc;
use crate::engine::status_derivation::StatusDeriver;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::debug;

/// 附加列来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtraSource {
    Part(usize),
    Contact(usize),
}

// ==========================================
// Finalizer
// ==========================================
pub struct Finalizer<'a> {
    config: &'a ReconcileConfig,
    deriver: StatusDeriver,
}

impl<'a> Finalizer<'a> {
    pub fn new(config: &'a ReconcileConfig) -> Self {
        Self {
            config,
            deriver: StatusDeriver::new(config.windows),
        }
    }

    pub fn column_names(&self) -> ColumnNames {
        let c = &self.config.columns;
        ColumnNames {
            supplier_name: c.supplier_name.clone(),
            supplier_number: c.supplier_number.clone(),
            engineer: c.engineer.clone(),
            quantity: c.quantity.clone(),
            business_unit: c.business_unit.clone(),
            customer: c.customer.clone(),
        }
    }

    /// 确定输出列与附加列来源
    fn resolve_columns(
        &self,
        items: &PartTable,
        contacts: &ContactTable,
        contact_join_applied: bool,
        names: &ColumnNames,
    ) -> (Vec<OutputColumn>, Vec<ExtraSource>) {
        let mut columns = vec![
            OutputColumn::Item,
            OutputColumn::Doc,
            OutputColumn::RevisionDate,
            OutputColumn::ExpirationDate,
            OutputColumn::Status,
        ];
        if items.has_supplier_name {
            columns.push(OutputColumn::SupplierName);
        }
        if items.has_supplier_number {
            columns.push(OutputColumn::SupplierNumber);
        }
        if items.has_engineer {
            columns.push(OutputColumn::Engineer);
        }
        if items.has_quantity {
            columns.push(OutputColumn::Quantity);
        }
        if items.has_business_unit {
            columns.push(OutputColumn::BusinessUnit);
        }
        columns.push(OutputColumn::Customer);

        let mut taken: HashSet<String> = columns
            .iter()
            .map(|c| c.header(names).to_string())
            .collect();

        let part_candidates = items
            .extra_names
            .iter()
            .enumerate()
            .map(|(i, n)| (n, ExtraSource::Part(i)));
        let contact_candidates = contacts
            .field_names
            .iter()
            .enumerate()
            .filter(|_| contact_join_applied)
            .map(|(j, n)| (n, ExtraSource::Contact(j)));

        let mut sources = Vec::new();
        for (name, source) in part_candidates.chain(contact_candidates) {
            if !self.config.is_contact_column(name) || taken.contains(name) {
                continue;
            }
            taken.insert(name.clone());
            columns.push(OutputColumn::Extra {
                name: name.clone(),
                index: sources.len(),
            });
            sources.push(source);
        }

        (columns, sources)
    }

    fn to_result_row(
        &self,
        row: JoinedRow,
        sources: &[ExtraSource],
        now: NaiveDateTime,
    ) -> ResultRow {
        let expiration_date = self.deriver.expiration_date(row.revision_date);
        let status = self.deriver.report_status(expiration_date, now);
        let extra = sources
            .iter()
            .map(|source| match source {
                ExtraSource::Part(i) => row.part.extra.get(*i).cloned().flatten(),
                ExtraSource::Contact(j) => row
                    .contact
                    .as_ref()
                    .and_then(|fields| fields.get(*j).cloned().flatten()),
            })
            .collect();

        let part = row.part;
        ResultRow {
            item: part.item,
            doc: row.doc,
            revision_date: row.revision_date,
            expiration_date,
            status,
            supplier_name: part.supplier_name,
            supplier_number: part.supplier_number,
            engineer: part.engineer,
            quantity: part.quantity,
            business_unit: part.business_unit,
            customer: row.customer,
            extra,
        }
    }

    /// 生成终表
    pub fn finalize(
        &self,
        items: &PartTable,
        contacts: &ContactTable,
        joined: JoinOutcome,
        now: NaiveDateTime,
    ) -> ReconciliationReport {
        let names = self.column_names();
        let (columns, sources) =
            self.resolve_columns(items, contacts, joined.contact_join_applied, &names);

        let mut rows: Vec<ResultRow> = joined
            .rows
            .into_iter()
            .map(|r| self.to_result_row(r, &sources, now))
            .collect();
        let joined_rows = rows.len();

        rows.sort_by(|a, b| compare_date_desc(&a.revision_date, &b.revision_date));

        let mut seen: HashSet<String> = HashSet::new();
        rows.retain(|r| seen.insert(r.item.clone()));

        debug!(
            joined_rows,
            final_rows = rows.len(),
            columns = columns.len(),
            "终表生成完成"
        );

        ReconciliationReport {
            column_names: names,
            columns,
            rows,
        }
    }
}
