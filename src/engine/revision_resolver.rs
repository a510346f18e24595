// ==========================================
// 零件文档有效期对账系统 - 最新修订解析
// ==========================================
// 职责: 在命中同一零件号的文档中选出修订日期最新的一条
// 规则:
// - 按 (零件号 升序, 修订日期 降序, 空日期最后) 稳定排序，取每组第一行
// - 日期并列时保留源表中靠前的文档
// - doc 取被选中那一行的文档编号（整行选取，不跨行拼接）
// ==========================================

use crate::domain::report::{MatchedDocument, MatchedRevision};
use crate::engine::date_parser::parse_revision_date;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use tracing::debug;

/// 日期降序，空值排最后
pub fn compare_date_desc(a: &Option<NaiveDateTime>, b: &Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ==========================================
// RevisionResolver
// ==========================================
#[derive(Debug, Default)]
pub struct RevisionResolver;

impl RevisionResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析每条命中文档的修订日期（写入 parsed_date）
    pub fn annotate_dates(&self, matched: &mut [MatchedDocument]) {
        let mut unparsed = 0usize;
        for doc in matched.iter_mut() {
            doc.parsed_date = parse_revision_date(doc.record.raw_revision_date.as_deref());
            if doc.parsed_date.is_none() {
                unparsed += 1;
            }
        }
        if unparsed > 0 {
            debug!(unparsed, "部分文档修订日期无法解析");
        }
    }

    /// 每个零件号选出最新修订（结果按零件号升序）
    pub fn resolve(&self, matched: &[MatchedDocument]) -> Vec<MatchedRevision> {
        let mut ordered: Vec<&MatchedDocument> = matched.iter().collect();
        ordered.sort_by(|a, b| {
            a.item
                .cmp(&b.item)
                .then_with(|| compare_date_desc(&a.parsed_date, &b.parsed_date))
        });

        let mut revisions: Vec<MatchedRevision> = Vec::new();
        for doc in ordered {
            if revisions.last().map(|r| r.item == doc.item).unwrap_or(false) {
                continue;
            }
            revisions.push(MatchedRevision {
                item: doc.item.clone(),
                revision_date: doc.parsed_date,
                doc: doc.record.number.clone(),
            });
        }

        debug!(
            matched = matched.len(),
            revisions = revisions.len(),
            "最新修订解析完成"
        );
        revisions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::part::DocumentRecord;
    use chrono::NaiveDate;

    fn matched(item: &str, number: &str, date: Option<&str>) -> MatchedDocument {
        MatchedDocument {
            record: DocumentRecord {
                description: format!("{} doc", item),
                number: Some(number.to_string()),
                raw_revision_date: date.map(|s| s.to_string()),
                raw: vec![],
                row_number: 0,
            },
            item: item.to_string(),
            parsed_date: None,
        }
    }

    fn resolve(mut docs: Vec<MatchedDocument>) -> Vec<MatchedRevision> {
        let resolver = RevisionResolver::new();
        resolver.annotate_dates(&mut docs);
        resolver.resolve(&docs)
    }

    #[test]
    fn test_latest_date_wins() {
        let revs = resolve(vec![
            matched("A", "D1", Some("2022-01-01")),
            matched("A", "D2", Some("2023-06-01")),
            matched("A", "D3", Some("2021-01-01")),
        ]);
        assert_eq!(revs.len(), 1);
        assert_eq!(revs[0].doc.as_deref(), Some("D2"));
        assert_eq!(
            revs[0].revision_date,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_null_dates_sort_last() {
        let revs = resolve(vec![
            matched("A", "D1", Some("n/a")),
            matched("A", "D2", Some("2020-01-01")),
        ]);
        assert_eq!(revs[0].doc.as_deref(), Some("D2"));

        let only_null = resolve(vec![matched("B", "D9", None)]);
        assert_eq!(only_null.len(), 1);
        assert_eq!(only_null[0].revision_date, None);
        assert_eq!(only_null[0].doc.as_deref(), Some("D9"));
    }

    #[test]
    fn test_two_digit_year_competes_as_full_year() {
        let revs = resolve(vec![
            matched("A", "D1", Some("2022-12-01")),
            matched("A", "D2", Some("06/20/23")),
        ]);
        assert_eq!(revs[0].doc.as_deref(), Some("D2"));
        assert_eq!(
            revs[0].revision_date,
            NaiveDate::from_ymd_opt(2023, 6, 20).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_tie_keeps_source_order() {
        let revs = resolve(vec![
            matched("A", "first", Some("2023-01-01")),
            matched("A", "second", Some("2023-01-01")),
        ]);
        assert_eq!(revs[0].doc.as_deref(), Some("first"));
    }

    #[test]
    fn test_one_row_per_item_sorted() {
        let revs = resolve(vec![
            matched("B", "D1", Some("2023-01-01")),
            matched("A", "D2", Some("2023-01-01")),
            matched("B", "D3", Some("2024-01-01")),
        ]);
        let items: Vec<&str> = revs.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["A", "B"]);
        assert_eq!(revs[1].doc.as_deref(), Some("D3"));
    }

    #[test]
    fn test_compare_date_desc() {
        let d1 = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0);
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0);
        assert_eq!(compare_date_desc(&d2, &d1), Ordering::Less);
        assert_eq!(compare_date_desc(&d1, &None), Ordering::Less);
        assert_eq!(compare_date_desc(&None, &d1), Ordering::Greater);
    }
}
