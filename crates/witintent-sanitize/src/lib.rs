//! Query-text sanitization for outbound classification requests.
//!
//! The service only looks at a bounded prefix of the message, so long input
//! is cut to [`MAX_QUERY_CHARS`] code points and marked with
//! [`TRUNCATION_MARKER`].

use std::borrow::Cow;

/// Maximum number of Unicode code points sent as the query.
pub const MAX_QUERY_CHARS: usize = 260;

/// Appended to a query that was cut.
pub const TRUNCATION_MARKER: &str = "...";

/// Truncate `input` to [`MAX_QUERY_CHARS`] code points, appending
/// [`TRUNCATION_MARKER`] when anything was dropped.
///
/// Input that already fits is borrowed unchanged.
pub fn truncate_query(input: &str) -> Cow<'_, str> {
    truncate_chars(input, MAX_QUERY_CHARS, TRUNCATION_MARKER)
}

/// Truncate `input` to at most `max` code points, appending `marker` if cut.
pub fn truncate_chars<'a>(input: &'a str, max: usize, marker: &str) -> Cow<'a, str> {
    match input.char_indices().nth(max) {
        None => Cow::Borrowed(input),
        Some((byte_idx, _)) => {
            let mut out = String::with_capacity(byte_idx + marker.len());
            out.push_str(&input[..byte_idx]);
            out.push_str(marker);
            Cow::Owned(out)
        }
    }
}

/// Whether [`truncate_query`] would cut `input`.
pub fn needs_truncation(input: &str) -> bool {
    input.chars().nth(MAX_QUERY_CHARS).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_borrowed() {
        let out = truncate_query("turn the lights on");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "turn the lights on");
    }

    #[test]
    fn empty_text_passes_through() {
        assert_eq!(truncate_query(""), "");
    }

    #[test]
    fn exact_limit_is_untouched() {
        let text = "a".repeat(MAX_QUERY_CHARS);
        assert_eq!(truncate_query(&text), text);
        assert!(!needs_truncation(&text));
    }

    #[test]
    fn one_over_limit_is_cut() {
        let text = "a".repeat(MAX_QUERY_CHARS + 1);
        let out = truncate_query(&text);
        assert_eq!(out.chars().count(), MAX_QUERY_CHARS + 3);
        assert!(out.ends_with("..."));
        assert!(needs_truncation(&text));
    }

    #[test]
    fn counts_code_points_not_bytes() {
        // 300 three-byte characters
        let text = "語".repeat(300);
        let out = truncate_query(&text);
        assert_eq!(out.chars().count(), 263);
        assert!(out.starts_with(&"語".repeat(260)));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn custom_limit_and_marker() {
        assert_eq!(truncate_chars("abcdef", 3, "~"), "abc~");
        assert_eq!(truncate_chars("abc", 3, "~"), "abc");
        assert_eq!(truncate_chars("abc", 0, "…"), "…");
    }
}
