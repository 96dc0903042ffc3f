//! Absolute URL validation applied at the HTTP boundary.

use thiserror::Error;
use url::Url;

/// Reasons a URL is rejected before it reaches the coordinator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,
    #[error("URL is not an absolute URI: {0}")]
    NotAbsolute(String),
    #[error("URL contains a control character at byte {0}")]
    ControlCharacter(usize),
}

/// A URL that parsed as an absolute URI.
///
/// Keeps the caller's original spelling: resolving a code returns exactly the
/// string that was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(String);

impl ValidatedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Validates that `raw` is an absolute URI.
///
/// Leading and trailing whitespace is ignored; the trimmed input is what gets
/// stored.
///
/// # Errors
///
/// Returns [`UrlValidationError`] for empty input or anything `url::Url`
/// cannot parse without a base (relative references, bare hostnames).
/// Control characters other than tab are rejected as well: they cannot be
/// sent back in a `Location` header.
pub fn parse_absolute_url(raw: &str) -> Result<ValidatedUrl, UrlValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if let Some(pos) = trimmed
        .bytes()
        .position(|b| (b < 0x20 && b != b'\t') || b == 0x7f)
    {
        return Err(UrlValidationError::ControlCharacter(pos));
    }

    Url::parse(trimmed).map_err(|e| UrlValidationError::NotAbsolute(e.to_string()))?;

    Ok(ValidatedUrl(trimmed.to_string()))
}
