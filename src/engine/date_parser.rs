// ==========================================
// 零件文档有效期对账系统 - 修订日期解析
// ==========================================
// 职责: 把文档表中的修订日期文本解析为时间点
// 规则:
// - 先剥离末尾的时区缩写（空白 + 2~5 个大写字母，如 " CST"）
// - 逐一尝试常见格式；斜杠日期按 月/日/年 优先
// - %Y 只接受四位年份；两位年份交给 %y 格式（"01/05/23" → 2023-01-05）
// - 无法解析 → None（该文档仍参与匹配，但排序时排在最后）
// ==========================================

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// 带时分秒的格式（按优先级）
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%b %d, %Y %H:%M:%S",
    "%b %d, %Y %I:%M:%S %p",
    "%b %d, %Y %I:%M %p",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
    "%d/%m/%y %H:%M:%S",
    "%d/%m/%y %H:%M",
];

/// 仅日期的格式（按优先级，时间取 00:00:00）
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

fn timezone_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 模式为常量，编译失败属于程序缺陷
    RE.get_or_init(|| Regex::new(r"\s+[A-Z]{2,5}$").expect("时区后缀正则非法"))
}

/// 剥离末尾时区缩写（AM/PM 不是时区，保留）
pub fn strip_timezone_suffix(raw: &str) -> &str {
    match timezone_suffix().find(raw) {
        Some(m) if !matches!(m.as_str().trim(), "AM" | "PM") => &raw[..m.start()],
        _ => raw,
    }
}

/// %Y 会接受 1~4 位数字，年份不足四位视为格式不符
fn has_full_year(fmt: &str, year: i32) -> bool {
    !fmt.contains("%Y") || year >= 1000
}

/// 解析修订日期
pub fn parse_revision_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let text = strip_timezone_suffix(trimmed).trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(text, fmt) {
            Ok(dt) if has_full_year(fmt, dt.year()) => return Some(dt),
            _ => {}
        }
    }

    for fmt in DATE_FORMATS {
        match NaiveDate::parse_from_str(text, fmt) {
            Ok(d) if has_full_year(fmt, d.year()) => return d.and_hms_opt(0, 0, 0),
            _ => {}
        }
    }

    // 紧凑格式 YYYYMMDD
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(text, "%Y%m%d") {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // 带偏移量的时间戳：保留本地墙上时间
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.naive_local());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_strip_timezone_suffix() {
        assert_eq!(strip_timezone_suffix("2023-01-05 10:00:00 CST"), "2023-01-05 10:00:00");
        assert_eq!(strip_timezone_suffix("2023-01-05 PDT"), "2023-01-05");
        // 小写或过长不剥离
        assert_eq!(strip_timezone_suffix("2023-01-05 cst"), "2023-01-05 cst");
        assert_eq!(strip_timezone_suffix("2023-01-05 ABCDEF"), "2023-01-05 ABCDEF");
        assert_eq!(strip_timezone_suffix("1/5/23 10:00 PM"), "1/5/23 10:00 PM");
    }

    #[test]
    fn test_iso_formats() {
        assert_eq!(
            parse_revision_date(Some("2023-01-05")),
            Some(dt(2023, 1, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("2023-01-05 13:45:10")),
            Some(dt(2023, 1, 5, 13, 45, 10))
        );
        assert_eq!(
            parse_revision_date(Some("2023-01-05T13:45:10")),
            Some(dt(2023, 1, 5, 13, 45, 10))
        );
    }

    #[test]
    fn test_timezone_suffix_is_ignored() {
        assert_eq!(
            parse_revision_date(Some("2023-01-05 13:45:10 CST")),
            Some(dt(2023, 1, 5, 13, 45, 10))
        );
        assert_eq!(
            parse_revision_date(Some("01/05/2023 01:45:10 PM EST")),
            Some(dt(2023, 1, 5, 13, 45, 10))
        );
    }

    #[test]
    fn test_slash_dates_month_first() {
        assert_eq!(
            parse_revision_date(Some("03/04/2023")),
            Some(dt(2023, 3, 4, 0, 0, 0))
        );
        // 月份不合法时回退为 日/月/年
        assert_eq!(
            parse_revision_date(Some("25/04/2023")),
            Some(dt(2023, 4, 25, 0, 0, 0))
        );
    }

    #[test]
    fn test_month_name_formats() {
        assert_eq!(
            parse_revision_date(Some("05-Jan-2023")),
            Some(dt(2023, 1, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("January 5, 2023")),
            Some(dt(2023, 1, 5, 0, 0, 0))
        );
    }

    #[test]
    fn test_compact_and_offset() {
        assert_eq!(
            parse_revision_date(Some("20230105")),
            Some(dt(2023, 1, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("2023-01-05T08:00:00+02:00")),
            Some(dt(2023, 1, 5, 8, 0, 0))
        );
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_revision_date(None), None);
        assert_eq!(parse_revision_date(Some("")), None);
        assert_eq!(parse_revision_date(Some("   ")), None);
        assert_eq!(parse_revision_date(Some("pendiente")), None);
        assert_eq!(parse_revision_date(Some("2023-13-45")), None);
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(
            parse_revision_date(Some("01/05/23")),
            Some(dt(2023, 1, 5, 0, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("05-Jan-23")),
            Some(dt(2023, 1, 5, 0, 0, 0))
        );
        // 月份不合法时回退为 日/月/年
        assert_eq!(
            parse_revision_date(Some("25/04/23")),
            Some(dt(2023, 4, 25, 0, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("1/5/23 10:00 AM")),
            Some(dt(2023, 1, 5, 10, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("1/5/23 10:00 PM")),
            Some(dt(2023, 1, 5, 22, 0, 0))
        );
        assert_eq!(
            parse_revision_date(Some("01/05/2023 01:45:10 PM")),
            Some(dt(2023, 1, 5, 13, 45, 10))
        );
    }

    #[test]
    fn test_short_year_never_lands_in_first_century() {
        // 只有 %Y 能匹配的短年份 → None，而不是公元 23 年
        assert_eq!(parse_revision_date(Some("23-01-05")), None);
        assert_eq!(
            parse_revision_date(Some("23/01/05 10:00:00 PST")),
            Some(dt(2005, 1, 23, 10, 0, 0))
        );
        for raw in ["01/05/23", "05-Jan-23", "25/04/23", "1/5/23 10:00 AM", "3/4/5"] {
            if let Some(d) = parse_revision_date(Some(raw)) {
                assert!(d.year() >= 1000, "{} → {}", raw, d);
            }
        }
    }
}
