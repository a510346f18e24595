// ==========================================
// 零件文档有效期对账系统 - 关键字匹配器
// ==========================================
// 职责: 用全部零件号建立字典树，扫描文档描述找出其中包含的零件号
// 规则:
// - 不区分大小写；只在词边界上命中（词字符 = [A-Za-z0-9_]）
// - 同一起点取最长命中；从左到右扫描，取第一个命中
// - 一个零件号是另一个的子串、或描述中有多个零件号时，结果依赖扫描顺序
// ==========================================

use crate::domain::part::DocumentRecord;
use crate::domain::report::MatchedDocument;
use crate::importer::data_cleaner::DataCleaner;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// 在此结束的关键字（原始大小写）
    keyword: Option<String>,
}

/// 一次命中
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub keyword: String,
    /// 小写化后字符序列中的起止位置（左闭右开）
    pub start: usize,
    pub end: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ==========================================
// KeywordMatcher - 多模式关键字匹配
// ==========================================
#[derive(Debug, Default)]
pub struct KeywordMatcher {
    root: TrieNode,
    len: usize,
}

impl KeywordMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由零件号集合构建（跳过空串与 "nan"，TRIM 后去重）
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cleaner = DataCleaner;
        let mut matcher = Self::new();
        for id in identifiers {
            let id = id.as_ref().trim();
            if cleaner.is_indexable_identifier(id) {
                matcher.add_keyword(id);
            }
        }
        info!(keywords = matcher.len(), "关键字索引构建完成");
        matcher
    }

    /// 添加关键字；小写形式相同的关键字后加入者覆盖先加入者
    ///
    /// # 返回
    /// - true: 新关键字
    /// - false: 覆盖已有关键字
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        if keyword.is_empty() {
            return false;
        }
        let mut node = &mut self.root;
        for c in keyword.to_lowercase().chars() {
            node = node.children.entry(c).or_default();
        }
        let is_new = node.keyword.is_none();
        node.keyword = Some(keyword.to_string());
        if is_new {
            self.len += 1;
        }
        is_new
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 提取文本中的全部命中（按扫描顺序）
    pub fn extract_keywords(&self, text: &str) -> Vec<KeywordMatch> {
        let mut found = Vec::new();
        if text.is_empty() {
            return found;
        }

        let sentence: Vec<char> = text.to_lowercase().chars().collect();
        let len = sentence.len();
        let mut current = &self.root;
        let mut sequence_start = 0usize;
        let mut idx = 0usize;

        while idx < len {
            let ch = sentence[idx];
            let mut reset = false;

            if !is_word_char(ch) {
                // 词边界：结算当前路径，并尝试向后延伸更长的关键字
                if current.keyword.is_some() || current.children.contains_key(&ch) {
                    let mut longest = current.keyword.as_deref();
                    let mut sequence_end = idx;
                    let mut longer_found = false;

                    if let Some(next) = current.children.get(&ch) {
                        let mut continued = next;
                        let mut idy = idx + 1;
                        let mut exhausted = true;
                        while idy < len {
                            let inner = sentence[idy];
                            if !is_word_char(inner) && continued.keyword.is_some() {
                                longest = continued.keyword.as_deref();
                                sequence_end = idy;
                                longer_found = true;
                            }
                            match continued.children.get(&inner) {
                                Some(n) => continued = n,
                                None => {
                                    exhausted = false;
                                    break;
                                }
                            }
                            idy += 1;
                        }
                        // 扫到文本末尾
                        if exhausted && continued.keyword.is_some() {
                            longest = continued.keyword.as_deref();
                            sequence_end = idy;
                            longer_found = true;
                        }
                        if longer_found {
                            idx = sequence_end;
                        }
                    }

                    current = &self.root;
                    if let Some(k) = longest {
                        found.push(KeywordMatch {
                            keyword: k.to_string(),
                            start: sequence_start,
                            end: idx,
                        });
                    }
                } else {
                    current = &self.root;
                }
                reset = true;
            } else if let Some(next) = current.children.get(&ch) {
                current = next;
            } else {
                // 失配：跳到本词末尾
                current = &self.root;
                reset = true;
                let mut idy = idx + 1;
                while idy < len && is_word_char(sentence[idy]) {
                    idy += 1;
                }
                idx = idy;
            }

            if idx + 1 >= len {
                if let Some(k) = &current.keyword {
                    found.push(KeywordMatch {
                        keyword: k.clone(),
                        start: sequence_start,
                        end: len,
                    });
                }
            }

            idx += 1;
            if reset {
                sequence_start = idx;
            }
        }

        found
    }

    /// 文本中第一个命中的零件号
    pub fn find_first(&self, text: &str) -> Option<String> {
        self.extract_keywords(text)
            .into_iter()
            .next()
            .map(|m| m.keyword)
    }

    /// 为每条文档找零件号；未命中的文档不进入后续阶段
    pub fn match_documents(&self, documents: &[DocumentRecord]) -> Vec<MatchedDocument> {
        let matched: Vec<MatchedDocument> = documents
            .iter()
            .filter_map(|doc| {
                self.find_first(&doc.description).map(|item| MatchedDocument {
                    record: doc.clone(),
                    item,
                    parsed_date: None,
                })
            })
            .collect();

        debug!(
            documents = documents.len(),
            matched = matched.len(),
            unmatched = documents.len() - matched.len(),
            "文档匹配完成"
        );
        matched
    }
}
