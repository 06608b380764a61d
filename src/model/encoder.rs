//! URL to fixed-length integer sequence encoding.

use crate::config::MAX_URL_LENGTH;

use super::char_index::{CharIndex, UNKNOWN_CODE};

/// Fixed-length integer sequence consumed by a [`Scorer`](super::Scorer).
///
/// The length is always exactly [`MAX_URL_LENGTH`]; positions past the end of
/// the (truncated) source string hold [`UNKNOWN_CODE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedSequence {
    codes: Box<[u32; MAX_URL_LENGTH]>,
    source_len: usize,
}

impl EncodedSequence {
    /// All codes, padding included.
    pub fn as_slice(&self) -> &[u32] {
        &self.codes[..]
    }

    /// Always [`MAX_URL_LENGTH`].
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of positions filled from the source string (before padding).
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Codes that came from the source string.
    pub fn content(&self) -> &[u32] {
        &self.codes[..self.source_len]
    }
}

/// Encodes a URL.
///
/// Takes the first [`MAX_URL_LENGTH`] characters, maps each through `index`
/// (unknown characters become 0) and zero-fills the rest. Never fails.
pub fn encode(url: &str, index: &CharIndex) -> EncodedSequence {
    let mut codes = Box::new([UNKNOWN_CODE; MAX_URL_LENGTH]);
    let mut source_len = 0;
    for (slot, c) in codes.iter_mut().zip(url.chars()) {
        *slot = index.code(c);
        source_len += 1;
    }
    EncodedSequence { codes, source_len }
}
