//! Character-to-code lookup table.

use std::collections::{BTreeSet, HashMap};

use crate::error_handling::CharIndexError;

/// Code assigned to characters absent from the table, and to padding.
pub const UNKNOWN_CODE: u32 = 0;

const ASCII_TABLE_SIZE: usize = 128;

/// Immutable mapping from characters to positive integer codes.
///
/// ASCII characters resolve through a dense array; everything else through a
/// map. Any character not in the table encodes to [`UNKNOWN_CODE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharIndex {
    ascii: [u32; ASCII_TABLE_SIZE],
    extended: HashMap<char, u32>,
    len: usize,
    max_code: u32,
}

impl CharIndex {
    /// Builds a table from `(character, code)` pairs.
    ///
    /// Codes must be positive; a later pair for the same character replaces an
    /// earlier one.
    pub fn from_entries<I>(entries: I) -> Result<Self, CharIndexError>
    where
        I: IntoIterator<Item = (char, u32)>,
    {
        let mut ascii = [UNKNOWN_CODE; ASCII_TABLE_SIZE];
        let mut extended = HashMap::new();
        for (c, code) in entries {
            if code == UNKNOWN_CODE {
                return Err(CharIndexError::ReservedCode { key: c });
            }
            if c.is_ascii() {
                ascii[c as usize] = code;
            } else {
                extended.insert(c, code);
            }
        }
        let ascii_len = ascii.iter().filter(|&&code| code != UNKNOWN_CODE).count();
        let max_code = ascii
            .iter()
            .chain(extended.values())
            .copied()
            .max()
            .unwrap_or(UNKNOWN_CODE);
        Ok(Self {
            ascii,
            len: ascii_len + extended.len(),
            extended,
            max_code,
        })
    }

    /// Parses the JSON table written at training time: `{"a": 1, "b": 2, ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, CharIndexError> {
        let raw: HashMap<String, u32> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (key, code) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => entries.push((c, code)),
                _ => return Err(CharIndexError::InvalidKey { key }),
            }
        }
        Self::from_entries(entries)
    }

    /// Rebuilds a table from a corpus the way training does: every distinct
    /// character, sorted, numbered from 1.
    pub fn from_corpus<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let chars: BTreeSet<char> = urls
            .into_iter()
            .flat_map(|u| u.as_ref().chars().collect::<Vec<_>>())
            .collect();
        let entries = chars.into_iter().zip(1u32..);
        // Codes start at 1, so the reserved-code check cannot fail.
        Self::from_entries(entries).unwrap_or_else(|_| Self::empty())
    }

    /// A table that maps every character to [`UNKNOWN_CODE`].
    pub fn empty() -> Self {
        Self {
            ascii: [UNKNOWN_CODE; ASCII_TABLE_SIZE],
            extended: HashMap::new(),
            len: 0,
            max_code: UNKNOWN_CODE,
        }
    }

    /// Code for a character, or [`UNKNOWN_CODE`] if absent.
    #[inline]
    pub fn code(&self, c: char) -> u32 {
        if c.is_ascii() {
            self.ascii[c as usize]
        } else {
            self.extended.get(&c).copied().unwrap_or(UNKNOWN_CODE)
        }
    }

    /// Number of characters in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest code in the table (0 when empty).
    pub fn max_code(&self) -> u32 {
        self.max_code
    }
}
