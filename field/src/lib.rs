//! Prime field arithmetic over the BN254 scalar field.
//!
//! This crate provides the field element type used by the commitment circuits:
//! Montgomery-form arithmetic, reduction of arbitrary-precision integers into
//! the field, and the canonical decimal and big-endian encodings that stored
//! and freshly computed commitments are compared over.

mod errors;
mod fr;
mod random;

pub use errors::ParseFieldError;
pub use fr::{Fr, FR_BYTES, FR_DECIMAL_DIGITS};
pub use num_bigint::{BigInt, BigUint};
pub use random::RandomField;
