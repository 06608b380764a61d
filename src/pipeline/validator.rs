//! Syntactic URL validation and length enforcement.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::ErrorKind;

/// URL grammar: http(s) scheme; a dotted hostname ending in a valid top-level
/// label, `localhost`, or a dotted-quad IPv4 address; optional port; optional
/// path or query; one trailing newline is tolerated. Case-insensitive.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:http|https)://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)",
        r"|localhost",
        r"|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)\n?$",
    ))
    .expect("Failed to compile URL pattern - this is a bug")
});

/// Why a URL was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL exceeds the maximum length ({length} > {max} characters)")]
    TooLong { length: usize, max: usize },

    #[error("URL format is invalid")]
    Invalid,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::TooLong { .. } => ErrorKind::UrlTooLong,
            ValidationError::Invalid => ErrorKind::InvalidUrl,
        }
    }
}

/// Purely syntactic validator: no network access, no DNS.
#[derive(Debug, Clone, Copy)]
pub struct UrlValidator {
    max_len: usize,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self {
            max_len: MAX_URL_LENGTH,
        }
    }
}

impl UrlValidator {
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Length first (in characters), then grammar.
    pub fn validate(&self, url: &str) -> Result<(), ValidationError> {
        let length = url.chars().count();
        if length > self.max_len {
            return Err(ValidationError::TooLong {
                length,
                max: self.max_len,
            });
        }
        if !URL_PATTERN.is_match(url) {
            return Err(ValidationError::Invalid);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(url: &str) -> Result<(), ValidationError> {
        UrlValidator::default().validate(url)
    }

    #[test]
    fn test_accepts_common_urls() {
        for url in [
            "http://example.com",
            "https://example.com/",
            "https://oa.bistu.edu.cn/login",
            "http://verify123account.xyz",
            "HTTPS://EXAMPLE.COM/PATH",
            "https://sub.domain.example.co.uk/path?q=1&r=2",
            "http://example.com:8080/index.html",
            "http://example.com?query=1",
            "http://localhost",
            "http://localhost:5000/api/v1/predict",
            "http://192.168.0.1",
            "http://10.0.0.1:8080/admin",
            "http://xn--mnchen-3ya.de",
        ] {
            assert_eq!(validate(url), Ok(()), "{url} should be valid");
        }
    }

    #[test]
    fn test_rejects_bad_scheme_or_host() {
        for url in [
            "",
            "example.com",
            "ftp://example.com",
            "file:///etc/passwd",
            "http://",
            "http://example",
            "http://-example.com",
            "http://exa mple.com",
            "http://example.com/path with spaces",
            "https://[2001:db8::1]",
            "javascript:alert(1)",
        ] {
            assert_eq!(validate(url), Err(ValidationError::Invalid), "{url:?} should be invalid");
        }
    }

    #[test]
    fn test_single_trailing_newline() {
        assert_eq!(validate("http://example.com/\n"), Ok(()));
        assert_eq!(validate("https://example.com/login?next=1\n"), Ok(()));
        assert_eq!(validate("http://example.com/\n\n"), Err(ValidationError::Invalid));
        assert_eq!(validate("http://example.com/\nx"), Err(ValidationError::Invalid));
    }

    #[test]
    fn test_length_boundary() {
        let prefix = "http://example.com/";
        let at_limit = format!("{prefix}{}", "a".repeat(MAX_URL_LENGTH - prefix.len()));
        assert_eq!(at_limit.chars().count(), MAX_URL_LENGTH);
        assert_eq!(validate(&at_limit), Ok(()));

        let over = format!("{at_limit}a");
        assert_eq!(
            validate(&over),
            Err(ValidationError::TooLong {
                length: MAX_URL_LENGTH + 1,
                max: MAX_URL_LENGTH
            })
        );
    }

    #[test]
    fn test_length_checked_before_grammar() {
        let garbage = "x".repeat(MAX_URL_LENGTH + 10);
        assert_eq!(validate(&garbage).unwrap_err().kind(), ErrorKind::UrlTooLong);
    }

    #[test]
    fn test_length_counts_characters() {
        let prefix = "http://example.com/";
        let url = format!("{prefix}{}", "é".repeat(MAX_URL_LENGTH - prefix.len()));
        assert!(url.len() > MAX_URL_LENGTH);
        assert_eq!(validate(&url), Ok(()));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ValidationError::Invalid.kind(), ErrorKind::InvalidUrl);
        assert_eq!(
            ValidationError::TooLong { length: 1, max: 0 }.kind(),
            ErrorKind::UrlTooLong
        );
    }
}
