//! Error types for field element decoding.

use thiserror::Error;

/// Errors returned when decoding a field element from its canonical text form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ParseFieldError {
    #[error("empty field element")]
    Empty,
    /// Signs, whitespace, separators, non-digits and leading zeros are all rejected.
    #[error("field element is not a canonical decimal")]
    NonCanonical,
    #[error("field element is not reduced below the modulus")]
    OutOfRange,
}
