//! Sanitizing of messages that end up in responses and logs.
//!
//! Scorer and loader errors can carry arbitrary text (file contents, URLs
//! supplied by the caller). Control characters are stripped and the length is
//! capped before a message leaves the process.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Removes control characters, keeping tab, newline and carriage return.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Returns at most `max` characters of `s`, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Sanitizes a message and truncates it to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncated messages end with a marker noting the original length.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let char_count = sanitized.chars().count();

    if char_count > MAX_ERROR_MESSAGE_LENGTH {
        // leave room for the marker
        let keep = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        format!(
            "{}... (truncated, original length: {} chars)",
            truncate_chars(&sanitized, keep),
            char_count
        )
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_control_chars() {
        let input = "Error\x00message\x01with\x7fcontrol";
        assert_eq!(sanitize_error_message(input), "Errormessagewithcontrol");
    }

    #[test]
    fn test_sanitize_keeps_whitespace_and_unicode() {
        let input = "line one\nline\ttwo\r 域名";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_truncate_short_message_unchanged() {
        assert_eq!(sanitize_and_truncate_error_message("short"), "short");
    }

    #[test]
    fn test_truncate_long_message() {
        let input = "x".repeat(MAX_ERROR_MESSAGE_LENGTH + 10);
        let output = sanitize_and_truncate_error_message(&input);
        assert!(output.contains("truncated"));
        assert!(output.contains(&format!("{}", MAX_ERROR_MESSAGE_LENGTH + 10)));
        assert!(output.chars().count() <= MAX_ERROR_MESSAGE_LENGTH);
    }

    #[test]
    fn test_truncate_multibyte_does_not_split() {
        let input = "é".repeat(MAX_ERROR_MESSAGE_LENGTH * 2);
        let output = sanitize_and_truncate_error_message(&input);
        assert!(output.starts_with('é'));
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }
}
