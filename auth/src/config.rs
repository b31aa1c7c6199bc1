//! Service configuration.

use circuit::CommitmentRelation;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_SECRET_DIGITS, MAX_SECRET_DIGITS_ENV, MAX_SECRET_DIGITS_LIMIT, RELATION_ENV,
};
use crate::errors::ConfigError;

/// Settings fixed at startup. Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Relation binding secrets to commitments.
    pub relation: CommitmentRelation,
    /// Longest accepted secret, in decimal digits (sign excluded).
    pub max_secret_digits: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            relation: CommitmentRelation::default(),
            max_secret_digits: DEFAULT_MAX_SECRET_DIGITS,
        }
    }
}

impl AuthConfig {
    /// Parse a JSON document; omitted fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(RELATION_ENV) {
            self.relation = value.trim().parse().map_err(|reason| ConfigError::Env {
                name: RELATION_ENV,
                reason,
            })?;
        }
        if let Some(value) = lookup(MAX_SECRET_DIGITS_ENV) {
            self.max_secret_digits =
                value
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::Env {
                        name: MAX_SECRET_DIGITS_ENV,
                        reason: e.to_string(),
                    })?;
        }
        self.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_secret_digits == 0 || self.max_secret_digits > MAX_SECRET_DIGITS_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_secret_digits must be in 1..={MAX_SECRET_DIGITS_LIMIT}, got {}",
                self.max_secret_digits
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::from_json("{}").expect("defaults");
        assert_eq!(config, AuthConfig::default());
        assert_eq!(config.relation, CommitmentRelation::Square);
        assert_eq!(config.max_secret_digits, DEFAULT_MAX_SECRET_DIGITS);
    }

    #[test]
    fn test_json_fields() {
        let config = AuthConfig::from_json(r#"{"relation": "quintic", "max_secret_digits": 32}"#)
            .expect("config");
        assert_eq!(config.relation, CommitmentRelation::Quintic);
        assert_eq!(config.max_secret_digits, 32);

        assert!(AuthConfig::from_json(r#"{"relation": "cubic"}"#).is_err());
        assert!(AuthConfig::from_json(r#"{"port": 8080}"#).is_err());
        assert!(AuthConfig::from_json(r#"{"max_secret_digits": 0}"#).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (RELATION_ENV, "quintic"),
            (MAX_SECRET_DIGITS_ENV, " 64 "),
        ]);
        let config = AuthConfig::default()
            .with_overrides(|name| env.get(name).map(|v| v.to_string()))
            .expect("config");
        assert_eq!(config.relation, CommitmentRelation::Quintic);
        assert_eq!(config.max_secret_digits, 64);

        let err = AuthConfig::default()
            .with_overrides(|name| (name == MAX_SECRET_DIGITS_ENV).then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: MAX_SECRET_DIGITS_ENV, .. }));
    }
}
