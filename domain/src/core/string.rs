//! String utilities for the domain layer.

/// Build a single-line preview of `s` holding at most `max_chars` characters.
///
/// Runs of whitespace (including newlines) collapse into one space so that
/// multi-line payloads stay readable inside one log line. When the text is cut,
/// the last character slot is replaced by `…`.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_untouched() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(preview("{\n  \"who\": \"Coder\"\n}", 40), "{ \"who\": \"Coder\" }");
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        assert_eq!(preview("日本語テスト", 4), "日本語…");
        assert_eq!(preview("abcdef", 3), "ab…");
    }
}
