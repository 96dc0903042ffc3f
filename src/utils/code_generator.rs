//! Short code generation.
//!
//! Codes are [`CODE_LENGTH`] characters, each drawn independently and
//! uniformly from the 62-symbol [`ALPHABET`]. That gives 62^7 ≈ 3.5 × 10^12
//! possible codes; collisions stay rare while the store holds a small fraction
//! of that space, and the coordinator retries the few that happen.

use rand::Rng;

use crate::domain::short_code::{ALPHABET, CODE_LENGTH, ShortCode};

/// Source of candidate short codes.
///
/// No uniqueness guarantee: callers must handle collisions.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> ShortCode;
}

/// Generator drawing from the thread-local RNG.
///
/// Holds no state, so a single instance can be shared by every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ShortCode {
        generate_code()
    }
}

/// Generates a random short code.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.as_str().len(), 7);
/// ```
pub fn generate_code() -> ShortCode {
    let mut rng = rand::rng();
    let mut buffer = [0u8; CODE_LENGTH];

    for slot in buffer.iter_mut() {
        *slot = ALPHABET[rng.random_range(0..ALPHABET.len())];
    }

    ShortCode::from_alphabet_bytes(buffer)
}
