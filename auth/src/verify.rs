//! Commitment comparison.

use circuit::Commitment;
use subtle::ConstantTimeEq;

use crate::errors::AuthError;

/// Result of comparing a fresh commitment against a stored one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    Accepted,
    Rejected,
}

impl VerifyOutcome {
    pub fn is_accepted(self) -> bool {
        self == VerifyOutcome::Accepted
    }

    /// `Ok(())` on acceptance, [`AuthError::Rejected`] otherwise.
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            VerifyOutcome::Accepted => Ok(()),
            VerifyOutcome::Rejected => Err(AuthError::Rejected),
        }
    }
}

/// Compare two commitments over their canonical binary encoding.
///
/// The byte comparison runs in constant time for equal lengths; a length
/// mismatch (a different relation) is rejected outright. The outcome carries
/// no information about where the encodings differ.
pub fn verify(candidate: &Commitment, stored: &Commitment) -> VerifyOutcome {
    let candidate = candidate.to_bytes();
    let stored = stored.to_bytes();

    if candidate.ct_eq(&stored).unwrap_u8() == 1 {
        VerifyOutcome::Accepted
    } else {
        VerifyOutcome::Rejected
    }
}
