// ==========================================
// 国际化 (i18n)
// ==========================================
// rust-i18n；rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 语言: zh-CN（默认）/ en / es（现场用户）
// 占位符格式: %{name}
// ==========================================

/// 支持的界面语言
pub const SUPPORTED_LOCALES: &[&str] = &["zh-CN", "en", "es"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换界面语言
///
/// 不支持的语言代码保持当前语言不变，返回 false
pub fn set_locale(locale: &str) -> bool {
    match SUPPORTED_LOCALES.iter().find(|l| l.eq_ignore_ascii_case(locale.trim())) {
        Some(l) => {
            rust_i18n::set_locale(l);
            true
        }
        None => {
            tracing::warn!(locale, supported = ?SUPPORTED_LOCALES, "不支持的语言，保持当前设置");
            false
        }
    }
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译并替换 %{name} 占位符
///
/// ```no_run
/// use part_doc_tracker::i18n::t_with_args;
/// let msg = t_with_args("cli.export_done", &[("rows", "3"), ("path", "out.xlsx")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |msg, (name, value)| {
        msg.replace(&format!("%{{{}}}", name), value)
    })
}
