//! Client secrets, reduced into the field at the boundary.

use core::fmt::{self, Debug, Formatter};
use core::str::FromStr;

use field::{BigInt, BigUint, Fr};

use crate::constants::DEFAULT_MAX_SECRET_DIGITS;
use crate::errors::InputError;

/// A user's secret, already reduced into the field.
///
/// The raw input is dropped as soon as it is parsed. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    value: Fr,
}

impl Secret {
    /// Parse an optionally signed decimal integer of at most `max_digits` digits.
    ///
    /// Negative values reduce to `p - (|s| mod p)`, values at or beyond the
    /// modulus wrap, so `s` and `s + p` are the same secret.
    pub fn parse(input: &str, max_digits: usize) -> Result<Self, InputError> {
        let (negative, digits) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            _ => (false, input),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InputError::MalformedSecret);
        }
        if digits.len() > max_digits {
            return Err(InputError::SecretTooLong { max_digits });
        }

        let magnitude =
            BigUint::parse_bytes(digits.as_bytes(), 10).ok_or(InputError::MalformedSecret)?;
        let value = Fr::from_biguint(&magnitude);
        Ok(Self {
            value: if negative { -value } else { value },
        })
    }

    pub fn from_field(value: Fr) -> Self {
        Self { value }
    }

    pub(crate) fn value(&self) -> Fr {
        self.value
    }
}

impl From<i64> for Secret {
    fn from(value: i64) -> Self {
        Self::from_field(Fr::from(value))
    }
}

impl From<&BigInt> for Secret {
    fn from(value: &BigInt) -> Self {
        Self::from_field(Fr::from_bigint(value))
    }
}

impl FromStr for Secret {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_MAX_SECRET_DIGITS)
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}
