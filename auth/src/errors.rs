//! Error types for enrollment and authentication.
//!
//! Messages never include the secret, a wire value, or a commitment.

use circuit::{CircuitError, WitnessError};
use thiserror::Error;

/// The secret supplied by a client could not be turned into a field element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The value is not an optionally signed decimal integer.
    #[error("secret is not a decimal integer")]
    MalformedSecret,

    #[error("secret exceeds {max_digits} digits")]
    SecretTooLong { max_digits: usize },

    /// The request body is not the expected JSON document.
    #[error("malformed request body")]
    MalformedRequest,
}

/// Errors reported by a [`CredentialStore`](crate::CredentialStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no commitment is enrolled for this user")]
    NotFound,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("credential store lock poisoned")]
    Poisoned,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Invalid service configuration. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("environment variable {name}: {reason}")]
    Env { name: &'static str, reason: String },
}

/// Everything that can end an enrollment or authentication request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The recomputed commitment does not match the stored one.
    ///
    /// An expected outcome, not a system failure.
    #[error("authentication rejected")]
    Rejected,

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("circuit error: {0}")]
    Circuit(#[from] CircuitError),

    #[error("witness error: {0}")]
    Witness(#[from] WitnessError),
}

impl AuthError {
    /// Transport status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::Input(_) | AuthError::Store(StoreError::EmptyUsername) => 400,
            AuthError::Rejected | AuthError::Store(StoreError::NotFound) => 401,
            AuthError::Store(_) | AuthError::Circuit(_) | AuthError::Witness(_) => 500,
        }
    }

    /// Whether the failure is internal and should be hidden from clients.
    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }
}
