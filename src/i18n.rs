// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持越南语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 统计标签使用显式 locale 的 t_in 系列函数,不依赖全局语言设置
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "vi";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"vi" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 是否为已提供翻译文件的语言
pub fn is_supported_locale(locale: &str) -> bool {
    rust_i18n::available_locales!().iter().any(|l| *l == locale)
}

/// 翻译消息（无参数，当前语言）
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数，当前语言）
///
/// # 示例
/// ```no_run
/// use metro_fare_revenue::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/tickets.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill_args(rust_i18n::t!(key).to_string(), args)
}

/// 翻译消息（指定语言）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（指定语言，带参数）
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill_args(t_in(locale, key), args)
}

/// 翻译消息（指定语言），缺失时返回 None
///
/// rust-i18n 在键缺失时回显键名，这里识别并转为 None
pub fn t_in_opt(locale: &str, key: &str) -> Option<String> {
    let value = t_in(locale, key);
    let prefixed = format!("{}.{}", locale, key);
    if value == key || value == prefixed {
        None
    } else {
        Some(value)
    }
}

fn fill_args(mut template: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        template = template.replace(&placeholder, v);
    }
    template
}
