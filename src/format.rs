use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Truncate to `width - 1` columns and pad with spaces to exactly `width`,
/// measuring display width rather than chars.
pub fn fit_column(s: &str, width: usize) -> String {
    let mut cell = truncate_unicode(s, width.saturating_sub(1));
    let used = cell.width();
    cell.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    cell
}

pub fn format_kb_as_mb(kb: u64) -> String {
    format!("{:.2} MB", kb as f64 / 1024.0)
}
