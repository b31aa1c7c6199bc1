//! Transport-neutral request handling.
//!
//! [`AuthService::handle`] takes a request path and a JSON body and returns a
//! status code with a JSON body, so any HTTP layer can sit in front of it.

use core::fmt::{self, Debug, Formatter};
use std::time::Instant;

use circuit::{CircuitError, Commitment};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::config::AuthConfig;
use crate::constants::{
    ENROLLED_MESSAGE, INTERNAL_MESSAGE, LOGIN_MESSAGE, NOT_FOUND_MESSAGE, UNAUTHORIZED_MESSAGE,
};
use crate::engine::CommitmentEngine;
use crate::errors::{AuthError, InputError, StoreError};
use crate::secret::Secret;
use crate::store::CredentialStore;
use crate::verify::verify;

/// A secret as it appears in a request: a JSON integer or a decimal string.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
pub enum SecretField {
    Integer(i64),
    Text(String),
}

impl SecretField {
    fn parse(&self, max_digits: usize) -> Result<Secret, InputError> {
        match self {
            SecretField::Integer(value) => Secret::parse(&value.to_string(), max_digits),
            SecretField::Text(text) => Secret::parse(text, max_digits),
        }
    }
}

impl Debug for SecretField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SecretField(<redacted>)")
    }
}

/// Body of a commitment-generation request.
#[derive(Clone, Debug, Deserialize)]
pub struct CommitmentRequest {
    pub user_secret: SecretField,
}

/// Body of an enrollment or authentication request.
#[derive(Clone, Debug, Deserialize)]
pub struct CredentialRequest {
    pub user_name: String,
    pub user_secret: SecretField,
}

/// Request routes, matched on the request path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Route {
    GenerateCommitment,
    Enroll,
    Authenticate,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/generateCommitment" => Some(Route::GenerateCommitment),
            "/enroll" => Some(Route::Enroll),
            "/authenticate" => Some(Route::Authenticate),
            _ => None,
        }
    }
}

/// Status code and JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            body: json!({ "error": NOT_FOUND_MESSAGE }),
        }
    }

    /// Client errors describe the input problem; rejections and internal
    /// failures carry a fixed message.
    fn from_error(err: &AuthError) -> Self {
        let message = match err {
            AuthError::Input(_) | AuthError::Store(StoreError::EmptyUsername) => err.to_string(),
            AuthError::Rejected | AuthError::Store(StoreError::NotFound) => {
                UNAUTHORIZED_MESSAGE.to_string()
            }
            _ => INTERNAL_MESSAGE.to_string(),
        };
        Self {
            status: err.status(),
            body: json!({ "error": message }),
        }
    }
}

/// Enrollment and authentication over a credential store.
pub struct AuthService<S> {
    engine: CommitmentEngine,
    store: S,
    config: AuthConfig,
}

impl<S: CredentialStore> AuthService<S> {
    /// Compile the configured relation. A failure here must stop startup.
    pub fn new(config: AuthConfig, store: S) -> Result<Self, CircuitError> {
        let engine = CommitmentEngine::from_relation(config.relation)?;
        Ok(Self::with_engine(engine, config, store))
    }

    pub fn with_engine(engine: CommitmentEngine, config: AuthConfig, store: S) -> Self {
        Self {
            engine,
            store,
            config,
        }
    }

    pub fn engine(&self) -> &CommitmentEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Commitment for a secret, without storing it.
    pub fn generate_commitment(&self, request: &CommitmentRequest) -> Result<Commitment, AuthError> {
        let secret = request.user_secret.parse(self.config.max_secret_digits)?;
        Ok(self.engine.commit(&secret)?)
    }

    /// Derive and store the commitment for a user, replacing any earlier one.
    pub fn enroll(&self, request: &CredentialRequest) -> Result<Commitment, AuthError> {
        if request.user_name.is_empty() {
            return Err(StoreError::EmptyUsername.into());
        }
        let secret = request.user_secret.parse(self.config.max_secret_digits)?;
        let commitment = self.engine.enroll(&secret)?;
        self.store.put(&request.user_name, commitment.clone())?;

        info!(user = %request.user_name, "commitment enrolled");
        Ok(commitment)
    }

    /// Recompute the user's commitment from the supplied secret and compare
    /// it with the enrolled one.
    ///
    /// The candidate is derived before the lookup, so unknown users cost the
    /// same witness computation as wrong secrets.
    pub fn authenticate(&self, request: &CredentialRequest) -> Result<(), AuthError> {
        let secret = request.user_secret.parse(self.config.max_secret_digits)?;
        let candidate = self.engine.commit(&secret)?;
        let stored = self.store.get(&request.user_name)?;
        let outcome = verify(&candidate, &stored);

        if outcome.is_accepted() {
            info!(user = %request.user_name, "authentication accepted");
        } else {
            warn!(user = %request.user_name, "authentication rejected");
        }
        outcome.into_result()
    }

    /// Dispatch a JSON request by path.
    pub fn handle(&self, path: &str, body: &[u8]) -> Response {
        let start = Instant::now();

        let response = match Route::from_path(path) {
            None => Response::not_found(),
            Some(route) => self.dispatch(route, body).unwrap_or_else(|err| {
                if err.is_internal() {
                    error!(path, error = %err, "request failed");
                }
                Response::from_error(&err)
            }),
        };

        debug!(
            path,
            status = response.status,
            elapsed_us = start.elapsed().as_micros() as u64,
            "request handled"
        );
        response
    }

    fn dispatch(&self, route: Route, body: &[u8]) -> Result<Response, AuthError> {
        match route {
            Route::GenerateCommitment => {
                let commitment = self.generate_commitment(&parse_body(body)?)?;
                Ok(Response::ok(json!({ "crypto_commitment": commitment })))
            }
            Route::Enroll => {
                let commitment = self.enroll(&parse_body(body)?)?;
                Ok(Response::ok(json!({
                    "message": ENROLLED_MESSAGE,
                    "crypto_commitment": commitment,
                })))
            }
            Route::Authenticate => {
                self.authenticate(&parse_body(body)?)?;
                Ok(Response::ok(json!({ "message": LOGIN_MESSAGE })))
            }
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, InputError> {
    serde_json::from_slice(body).map_err(|_| InputError::MalformedRequest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AuthService<MemoryStore> {
        AuthService::new(AuthConfig::default(), MemoryStore::new()).expect("service")
    }

    #[test]
    fn test_generate_commitment_route() {
        let response = service().handle("/generateCommitment", br#"{"user_secret": 7}"#);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ "crypto_commitment": "49" }));

        let response = service().handle("/generateCommitment", br#"{"user_secret": "-7"}"#);
        assert_eq!(response.body, json!({ "crypto_commitment": "49" }));
    }

    #[test]
    fn test_enroll_then_authenticate() {
        let service = service();
        let enrolled = service.handle("/enroll", br#"{"user_name": "alice", "user_secret": 7}"#);
        assert_eq!(enrolled.status, 200);
        assert_eq!(enrolled.body["crypto_commitment"], "49");
        assert_eq!(enrolled.body["message"], ENROLLED_MESSAGE);

        let ok = service.handle(
            "/authenticate",
            br#"{"user_name": "alice", "user_secret": "7"}"#,
        );
        assert_eq!(ok.status, 200);
        assert_eq!(ok.body, json!({ "message": LOGIN_MESSAGE }));

        let wrong = service.handle("/authenticate", br#"{"user_name": "alice", "user_secret": 8}"#);
        assert_eq!(wrong.status, 401);
        assert_eq!(wrong.body, json!({ "error": UNAUTHORIZED_MESSAGE }));
    }

    #[test]
    fn test_unknown_user_looks_like_rejection() {
        let service = service();
        let response = service.handle("/authenticate", br#"{"user_name": "nobody", "user_secret": 7}"#);
        assert_eq!(response.status, 401);
        assert_eq!(response.body, json!({ "error": UNAUTHORIZED_MESSAGE }));
    }

    #[test]
    fn test_reenrollment_overwrites() {
        let service = service();
        service.handle("/enroll", br#"{"user_name": "bob", "user_secret": 3}"#);
        service.handle("/enroll", br#"{"user_name": "bob", "user_secret": 4}"#);

        let old = service.handle("/authenticate", br#"{"user_name": "bob", "user_secret": 3}"#);
        assert_eq!(old.status, 401);
        let new = service.handle("/authenticate", br#"{"user_name": "bob", "user_secret": 4}"#);
        assert_eq!(new.status, 200);
    }

    #[test]
    fn test_malformed_input_is_client_error() {
        let service = service();
        let cases: [&[u8]; 5] = [
            br#"{"user_name": "alice", "user_secret": "seven"}"#,
            br#"{"user_name": "alice", "user_secret": 7.5}"#,
            br#"{"user_name": "alice"}"#,
            br#"{"user_name": "", "user_secret": 7}"#,
            b"not json",
        ];
        for body in cases {
            let response = service.handle("/enroll", body);
            assert_eq!(response.status, 400, "{}", String::from_utf8_lossy(body));
        }
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_error_bodies_do_not_echo_secret() {
        let service = service();
        let response = service.handle(
            "/enroll",
            br#"{"user_name": "alice", "user_secret": "123456789x"}"#,
        );
        assert_eq!(response.status, 400);
        assert!(!response.body.to_string().contains("123456789"));
    }

    #[test]
    fn test_unknown_route() {
        let response = service().handle("/verifyCommitment", b"{}");
        assert_eq!(response.status, 404);
    }

    #[test]
    fn test_secret_length_bound() {
        let config = AuthConfig {
            max_secret_digits: 4,
            ..AuthConfig::default()
        };
        let service = AuthService::new(config, MemoryStore::new()).expect("service");
        let response = service.handle("/generateCommitment", br#"{"user_secret": "12345"}"#);
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({ "error": "secret exceeds 4 digits" }));

        for body in [
            br#"{"user_secret": 123456789}"#.as_slice(),
            br#"{"user_secret": -12345}"#.as_slice(),
        ] {
            let response = service.handle("/generateCommitment", body);
            assert_eq!(response.status, 400, "{}", String::from_utf8_lossy(body));
            assert_eq!(response.body, json!({ "error": "secret exceeds 4 digits" }));
        }

        let enroll = service.handle("/enroll", br#"{"user_name": "dave", "user_secret": 123456789}"#);
        assert_eq!(enroll.status, 400);
        assert!(service.store().is_empty());

        let response = service.handle("/generateCommitment", br#"{"user_secret": -1234}"#);
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ "crypto_commitment": "1522756" }));
    }

    /// Counts store lookups.
    struct CountingStore {
        inner: MemoryStore,
        lookups: std::sync::atomic::AtomicUsize,
    }

    impl CredentialStore for CountingStore {
        fn put(&self, username: &str, commitment: Commitment) -> Result<(), StoreError> {
            self.inner.put(username, commitment)
        }

        fn get(&self, username: &str) -> Result<Commitment, StoreError> {
            self.lookups.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.get(username)
        }
    }

    #[test]
    fn test_unknown_user_reaches_lookup_only_after_valid_secret() {
        let store = CountingStore {
            inner: MemoryStore::new(),
            lookups: Default::default(),
        };
        let service = AuthService::new(AuthConfig::default(), store).expect("service");

        let request = CredentialRequest {
            user_name: "nobody".to_string(),
            user_secret: SecretField::Integer(7),
        };
        assert_eq!(service.authenticate(&request), Err(AuthError::Store(StoreError::NotFound)));
        assert_eq!(service.store().lookups.load(std::sync::atomic::Ordering::SeqCst), 1);

        let malformed = CredentialRequest {
            user_name: "nobody".to_string(),
            user_secret: SecretField::Text("7x".to_string()),
        };
        assert!(matches!(service.authenticate(&malformed), Err(AuthError::Input(_))));
        assert_eq!(service.store().lookups.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
