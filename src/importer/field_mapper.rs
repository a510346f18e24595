// ==========================================
// 零件文档有效期对账系统 - 字段映射器实现
// ==========================================
// 职责: 源列 → 标准字段映射 + 清洗
// 必需列缺失 → MissingColumn（致命）；可选列缺失 → 字段为空并在终表中省略该列
// ==========================================

use crate::config::SourceColumns;
use crate::domain::part::{
    BomTable, ContactRecord, ContactTable, CustomerLink, DocumentRecord, DocumentTable, Part,
    PartTable, Quantity,
};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{RawRow, RawSheet};
use crate::importer::importer_trait::{DataCleaner as _, FieldMapper as FieldMapperTrait};
use tracing::{debug, warn};

pub struct FieldMapper {
    columns: SourceColumns,
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(columns: SourceColumns) -> Self {
        Self {
            columns,
            cleaner: DataCleaner,
        }
    }

    /// 提取可选字符串字段（TRIM，空 → None）
    fn get_string(&self, sheet: &RawSheet, row: &RawRow, index: Option<usize>) -> Option<String> {
        index.and_then(|i| {
            self.cleaner
                .normalize_null(sheet.cell(row, i).map(str::to_string))
        })
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_parts(&self, sheet: &RawSheet) -> ImportResult<PartTable> {
        let item_idx = sheet.require_column(&self.columns.item)?;
        let supplier_name_idx = sheet.column_index(&self.columns.supplier_name);
        let supplier_number_idx = sheet.column_index(&self.columns.supplier_number);
        let engineer_idx = sheet.column_index(&self.columns.engineer);
        let quantity_idx = sheet.column_index(&self.columns.quantity);
        let business_unit_idx = sheet.column_index(&self.columns.business_unit);

        let fixed = [
            Some(item_idx),
            supplier_name_idx,
            supplier_number_idx,
            engineer_idx,
            quantity_idx,
            business_unit_idx,
        ];
        let extra_indices: Vec<usize> = (0..sheet.headers.len())
            .filter(|i| !fixed.contains(&Some(*i)))
            .collect();

        let mut parts = Vec::with_capacity(sheet.rows.len());
        for row in &sheet.rows {
            let quantity = self
                .cleaner
                .clean_quantity(quantity_idx.and_then(|i| sheet.cell(row, i)));
            if let Some(Quantity::Text(value)) = &quantity {
                warn!(row_number = row.row_number, %value, "数量不是数字，保留原文");
            }

            parts.push(Part {
                item: self.cleaner.clean_identifier(sheet.cell(row, item_idx)),
                supplier_name: self.get_string(sheet, row, supplier_name_idx),
                supplier_number: self.get_string(sheet, row, supplier_number_idx),
                engineer: self.get_string(sheet, row, engineer_idx),
                quantity,
                business_unit: self.get_string(sheet, row, business_unit_idx),
                extra: extra_indices
                    .iter()
                    .map(|i| self.get_string(sheet, row, Some(*i)))
                    .collect(),
                row_number: row.row_number,
            });
        }

        debug!(parts = parts.len(), extra_columns = extra_indices.len(), "items 映射完成");
        Ok(PartTable {
            has_supplier_name: supplier_name_idx.is_some(),
            has_supplier_number: supplier_number_idx.is_some(),
            has_engineer: engineer_idx.is_some(),
            has_quantity: quantity_idx.is_some(),
            has_business_unit: business_unit_idx.is_some(),
            extra_names: extra_indices
                .iter()
                .map(|i| sheet.headers[*i].clone())
                .collect(),
            parts,
        })
    }

    fn map_documents(&self, sheet: &RawSheet) -> ImportResult<DocumentTable> {
        let description_idx = sheet.require_column(&self.columns.description)?;
        let date_idx = sheet.require_column(&self.columns.revision_date)?;
        let number_idx = sheet.column_index(&self.columns.document_number);

        let records: Vec<DocumentRecord> = sheet
            .rows
            .iter()
            .map(|row| DocumentRecord {
                description: sheet.cell(row, description_idx).unwrap_or_default().to_string(),
                number: self.get_string(sheet, row, number_idx),
                raw_revision_date: self.get_string(sheet, row, Some(date_idx)),
                raw: row.cells.clone(),
                row_number: row.row_number,
            })
            .collect();

        debug!(documents = records.len(), has_number = number_idx.is_some(), "document 映射完成");
        Ok(DocumentTable {
            headers: sheet.headers.clone(),
            has_number: number_idx.is_some(),
            records,
        })
    }

    fn map_contacts(&self, sheet: &RawSheet) -> ImportResult<ContactTable> {
        // 键列：精确匹配优先，其次 TRIM + 不区分大小写
        let key_idx = sheet.column_index_relaxed(&self.columns.engineer);
        if key_idx.is_none() {
            warn!(
                sheet = %sheet.name,
                key = %self.columns.engineer,
                "联系人表缺少工程师键列，将跳过联系人关联"
            );
        }

        let field_indices: Vec<usize> = (0..sheet.headers.len())
            .filter(|i| Some(*i) != key_idx)
            .collect();

        let records = sheet
            .rows
            .iter()
            .map(|row| ContactRecord {
                engineer: self.get_string(sheet, row, key_idx),
                fields: field_indices
                    .iter()
                    .map(|i| self.get_string(sheet, row, Some(*i)))
                    .collect(),
            })
            .collect();

        Ok(ContactTable {
            key_column: key_idx.map(|i| sheet.headers[i].clone()),
            field_names: field_indices
                .iter()
                .map(|i| sheet.headers[*i].clone())
                .collect(),
            records,
        })
    }

    fn map_bom(&self, sheet: &RawSheet) -> ImportResult<BomTable> {
        let item_idx = sheet.require_column(&self.columns.item)?;
        let customer_idx = sheet.require_column(&self.columns.customer)?;

        let links = sheet
            .rows
            .iter()
            .map(|row| CustomerLink {
                item: self.cleaner.clean_identifier(sheet.cell(row, item_idx)),
                customer: self.get_string(sheet, row, Some(customer_idx)),
            })
            .collect();

        Ok(BomTable { links })
    }
}
