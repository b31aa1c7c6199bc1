//! Constants used by the authentication service.

/// Default bound on the number of decimal digits accepted for a secret.
///
/// Secrets are reduced into the field, so any bound above the 77 digits of
/// the modulus only limits parsing work per request.
pub const DEFAULT_MAX_SECRET_DIGITS: usize = 256;

/// Upper limit accepted for a configured digit bound.
pub(crate) const MAX_SECRET_DIGITS_LIMIT: usize = 4096;

/// Environment variable selecting the commitment relation.
pub const RELATION_ENV: &str = "ZKAUTH_RELATION";

/// Environment variable overriding the secret digit bound.
pub const MAX_SECRET_DIGITS_ENV: &str = "ZKAUTH_MAX_SECRET_DIGITS";

pub(crate) const ENROLLED_MESSAGE: &str = "Crypto commitment and username saved successfully!";
pub(crate) const LOGIN_MESSAGE: &str = "Login Successful";
pub(crate) const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub(crate) const INTERNAL_MESSAGE: &str = "Internal error";
pub(crate) const NOT_FOUND_MESSAGE: &str = "Not found";
