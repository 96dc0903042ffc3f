//! Validated short code value type.

use std::fmt;

/// Number of characters in every short code.
pub const CODE_LENGTH: usize = 7;

/// The 62-symbol alphabet short codes are drawn from.
pub const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A short code of exactly [`CODE_LENGTH`] alphanumeric ASCII characters.
///
/// Constructed only through [`ShortCode::parse`], so holding a `ShortCode`
/// means the value has the right shape. It says nothing about whether the
/// code exists in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShortCode(String);

impl ShortCode {
    /// Parses a raw string into a short code.
    ///
    /// Returns `None` if the length is wrong or any character falls outside
    /// [`ALPHABET`].
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() != CODE_LENGTH || !raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Builds a code from bytes already known to come from [`ALPHABET`].
    pub(crate) fn from_alphabet_bytes(bytes: [u8; CODE_LENGTH]) -> Self {
        Self(bytes.iter().map(|&b| b as char).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
