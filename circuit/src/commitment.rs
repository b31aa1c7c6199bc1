//! Public projection of a witness and its canonical encodings.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use field::{Fr, FR_BYTES};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::compiler::ConstraintSystem;
use crate::errors::EncodingError;
use crate::witness::Witness;

/// Separator between elements in the textual encoding.
const SEPARATOR: char = ',';

/// The public-wire values of a witness, in declaration order.
///
/// Text form: canonical decimals joined by `,`.
/// Binary form: 32 big-endian bytes per element.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Commitment {
    values: Vec<Fr>,
}

impl Commitment {
    pub fn new(values: Vec<Fr>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Fr] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.values.len() * FR_BYTES);
        for value in &self.values {
            bytes.extend_from_slice(&value.to_bytes_be());
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        if bytes.is_empty() {
            return Err(EncodingError::Empty);
        }
        if bytes.len() % FR_BYTES != 0 {
            return Err(EncodingError::ByteLength {
                len: bytes.len(),
                element: FR_BYTES,
            });
        }

        let values = bytes
            .chunks_exact(FR_BYTES)
            .enumerate()
            .map(|(index, chunk)| {
                let mut word = [0u8; FR_BYTES];
                word.copy_from_slice(chunk);
                Fr::from_bytes_be(&word).ok_or(EncodingError::Element {
                    index,
                    source: field::ParseFieldError::OutOfRange,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }
}

/// Project `witness` onto the public wires of `system`.
///
/// The witness must have been produced for the same system.
pub fn extract_public(witness: &Witness, system: &ConstraintSystem) -> Commitment {
    let values = system
        .public_wires()
        .filter_map(|wire| witness.value(wire))
        .collect();
    Commitment { values }
}

impl Display for Commitment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl FromStr for Commitment {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(EncodingError::Empty);
        }

        let values = s
            .split(SEPARATOR)
            .enumerate()
            .map(|(index, part)| {
                part.parse::<Fr>()
                    .map_err(|source| EncodingError::Element { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { values })
    }
}

impl Serialize for Commitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Commitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
