//! Trusted-domain allow list.

use std::path::Path;

use crate::config::DEFAULT_TRUSTED_DOMAINS;
use crate::error_handling::InitializationError;

/// Ordered set of trusted domain strings.
///
/// A URL is trusted when any entry occurs *anywhere* in it as a substring,
/// case-sensitively. This is looser than suffix matching: `gov.cn` also
/// matches `http://notgov.cn.example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustList {
    entries: Vec<String>,
}

impl TrustList {
    /// Builds a list from raw entries.
    ///
    /// Entries are trimmed; empty entries are dropped (an empty substring
    /// would trust every URL) and duplicates keep their first position.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            entries: Vec::new(),
        };
        list.extend(entries);
        list
    }

    /// Appends entries, with the same trimming and de-duplication as [`TrustList::new`].
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref().trim();
            if entry.is_empty() || self.entries.iter().any(|e| e == entry) {
                continue;
            }
            self.entries.push(entry.to_string());
        }
    }

    /// Parses a trust-list file: one domain per line, blank lines and `#`
    /// comments ignored.
    pub fn parse_lines(content: &str) -> Vec<&str> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Reads additional entries from a file and appends them.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, InitializationError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| InitializationError::TrustListError {
                path: path.to_path_buf(),
                source,
            })?;
        let before = self.entries.len();
        self.extend(Self::parse_lines(&content));
        Ok(self.entries.len() - before)
    }

    /// Whether any entry occurs in `url`.
    pub fn matches(&self, url: &str) -> bool {
        self.matching_entry(url).is_some()
    }

    /// First entry (in list order) that occurs in `url`.
    pub fn matching_entry(&self, url: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| url.contains(entry.as_str()))
            .map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TrustList {
    fn default() -> Self {
        Self::new(DEFAULT_TRUSTED_DOMAINS)
    }
}
