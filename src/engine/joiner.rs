// ==========================================
// 零件文档有效期对账系统 - 关联器
// ==========================================
// 职责: 以零件表为左表依次左关联 最新修订 / 客户 / 工程师联系人
// 规则:
// - 零件表每一行至少保留一行
// - 一个零件对应多个客户、或一个工程师对应多条联系人时行数扇出
// - 零件表无工程师列、或联系人表无工程师键列时跳过联系人关联（告警，不报错）
// - 空键不参与匹配
// ==========================================

use crate::domain::part::{ContactTable, CustomerLink, Part, PartTable};
use crate::domain::report::MatchedRevision;
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

// ==========================================
// JoinedRow - 关联后的一行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub part: Part,
    pub doc: Option<String>,
    pub revision_date: Option<NaiveDateTime>,
    pub customer: Option<String>,
    /// 联系人字段（与 ContactTable::field_names 对齐）
    /// - None: 未执行联系人关联
    /// - Some(全 None): 已执行但未匹配
    pub contact: Option<Vec<Option<String>>>,
}

/// 关联结果
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    pub rows: Vec<JoinedRow>,
    pub contact_join_applied: bool,
}

/// 客户对去重（保留首次出现顺序）
pub fn dedupe_customer_links(links: &[CustomerLink]) -> Vec<CustomerLink> {
    let mut seen: HashSet<&CustomerLink> = HashSet::new();
    let mut unique = Vec::new();
    for link in links {
        if seen.insert(link) {
            unique.push(link.clone());
        }
    }
    unique
}

/// 按键建立一对多索引（保留右表顺序，跳过空键）
fn index_by_key<'a, T, F>(rows: &'a [T], key: F) -> HashMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> Option<&'a str>,
{
    let mut index: HashMap<&str, Vec<&T>> = HashMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            if !k.is_empty() {
                index.entry(k).or_default().push(row);
            }
        }
    }
    index
}

// ==========================================
// Joiner
// ==========================================
#[derive(Debug, Default)]
pub struct Joiner;

impl Joiner {
    pub fn new() -> Self {
        Self
    }

    /// 执行三段左关联
    ///
    /// # 参数
    /// - items: 零件表
    /// - revisions: 每个零件的最新修订（每个零件号至多一行）
    /// - customer_links: 已去重的客户对
    /// - contacts: 工程师联系人表
    pub fn join(
        &self,
        items: &PartTable,
        revisions: &[MatchedRevision],
        customer_links: &[CustomerLink],
        contacts: &ContactTable,
    ) -> JoinOutcome {
        let revision_index: HashMap<&str, &MatchedRevision> = revisions
            .iter()
            .map(|r| (r.item.as_str(), r))
            .collect();
        let customer_index = index_by_key(customer_links, |l: &CustomerLink| Some(l.item.as_str()));

        let contact_join_applied = match (&contacts.key_column, items.has_engineer) {
            (Some(_), true) => true,
            (None, _) => {
                warn!("联系人表未找到工程师键列，跳过联系人关联");
                false
            }
            (Some(_), false) => {
                warn!("零件表缺少工程师列，跳过联系人关联");
                false
            }
        };
        let contact_index = index_by_key(&contacts.records, |c| c.engineer.as_deref());
        let empty_contact = vec![None; contacts.field_names.len()];

        let mut rows = Vec::with_capacity(items.parts.len());
        for part in &items.parts {
            let revision = revision_index.get(part.item.as_str());
            let doc = revision.and_then(|r| r.doc.clone());
            let revision_date = revision.and_then(|r| r.revision_date);

            // 客户扇出
            let customers: Vec<Option<String>> = match customer_index.get(part.item.as_str()) {
                Some(links) => links.iter().map(|l| l.customer.clone()).collect(),
                None => vec![None],
            };

            // 联系人扇出
            let contact_rows: Vec<Option<Vec<Option<String>>>> = if contact_join_applied {
                let matched = part
                    .engineer
                    .as_deref()
                    .filter(|e| !e.is_empty())
                    .and_then(|e| contact_index.get(e));
                match matched {
                    Some(records) => records.iter().map(|c| Some(c.fields.clone())).collect(),
                    None => vec![Some(empty_contact.clone())],
                }
            } else {
                vec![None]
            };

            for customer in &customers {
                for contact in &contact_rows {
                    rows.push(JoinedRow {
                        part: part.clone(),
                        doc: doc.clone(),
                        revision_date,
                        customer: customer.clone(),
                        contact: contact.clone(),
                    });
                }
            }
        }

        debug!(
            parts = items.parts.len(),
            joined = rows.len(),
            contact_join_applied,
            "关联完成"
        );

        JoinOutcome {
            rows,
            contact_join_applied,
        }
    }
}
