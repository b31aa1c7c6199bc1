//! Zero-knowledge commitment authentication.
//!
//! A user's secret is bound to a public commitment through an arithmetic
//! circuit over the BN254 scalar field. Enrollment stores the commitment;
//! every login recomputes it from the presented secret and compares the two
//! over their canonical encoding.
//!
//! # Example
//!
//! ```
//! use auth::{CommitmentEngine, Secret, VerifyOutcome};
//!
//! let engine = CommitmentEngine::default();
//!
//! // Enrollment: the commitment is what gets stored.
//! let secret: Secret = "7".parse().expect("decimal secret");
//! let stored = engine.enroll(&secret).expect("enroll");
//! assert_eq!(stored.to_string(), "49");
//!
//! // Authentication recomputes from the presented secret.
//! let outcome = engine.authenticate(&secret, &stored).expect("authenticate");
//! assert_eq!(outcome, VerifyOutcome::Accepted);
//!
//! let wrong: Secret = "8".parse().expect("decimal secret");
//! let outcome = engine.authenticate(&wrong, &stored).expect("authenticate");
//! assert_eq!(outcome, VerifyOutcome::Rejected);
//! ```
//!
//! # Security Considerations
//!
//! - The commitment `s² mod p` hides nothing from an attacker who can guess
//!   small secrets; use high-entropy secrets or the quintic relation.
//! - `s` and `-s` share a square commitment.
//! - Rate-limiting and session management belong to the transport layer.

mod config;
mod constants;
mod engine;
mod errors;
mod secret;
mod service;
mod store;
mod verify;


pub use circuit::{Commitment, CommitmentRelation};
pub use config::AuthConfig;
pub use constants::{DEFAULT_MAX_SECRET_DIGITS, MAX_SECRET_DIGITS_ENV, RELATION_ENV};
pub use engine::CommitmentEngine;
pub use errors::{AuthError, ConfigError, InputError, StoreError};
pub use secret::Secret;
pub use service::{AuthService, CommitmentRequest, CredentialRequest, Response, Route, SecretField};
pub use store::{CredentialStore, MemoryStore};
pub use verify::{verify, VerifyOutcome};
