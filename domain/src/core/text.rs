//! Text helpers for displaying model output.

/// Shorten `s` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn preview(s: &str, max_chars: usize) -> String {
    let mut chars = s.char_indices();
    match chars.nth(max_chars) {
        None => s.to_string(),
        Some((end, _)) => format!("{}...", &s[..end]),
    }
}

/// Collapse all whitespace runs (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("hello", 10), "hello");
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn test_preview_cuts_long_text() {
        assert_eq!(preview("hello world", 5), "hello...");
    }

    #[test]
    fn test_preview_multibyte() {
        assert_eq!(preview("日本語テスト", 3), "日本語...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\n\n  b\tc "), "a b c");
    }
}
