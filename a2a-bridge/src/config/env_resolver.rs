//! Environment variable resolution.
//!
//! Settings name the variables they read through [`EnvKey`]. Resolution goes
//! through `std::env` by default, or through an [`EnvResolverFn`] supplied by
//! the caller (a secret manager, or a fixed map in tests).

use crate::errors::BridgeError;
use std::fmt;
use std::sync::Arc;

/// The name of an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnvKey(String);

impl EnvKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    /// Reads the variable from the process environment.
    pub fn resolve(&self) -> Result<String, BridgeError> {
        default_env_resolver(&self.0)
    }

    /// Reads the variable with `resolver`, or from the process environment if `None`.
    pub fn resolve_with(&self, resolver: Option<&EnvResolverFn>) -> Result<String, BridgeError> {
        match resolver {
            Some(resolver) => resolver(self.key()),
            None => self.resolve(),
        }
    }

    /// Like [`EnvKey::resolve_with`], mapping a missing variable to `None`.
    pub fn resolve_optional_with(&self, resolver: Option<&EnvResolverFn>) -> Option<String> {
        self.resolve_with(resolver)
            .ok()
            .filter(|value| !value.trim().is_empty())
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EnvKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Custom lookup used in place of `std::env::var`.
pub type EnvResolverFn = Arc<dyn Fn(&str) -> Result<String, BridgeError> + Send + Sync>;

pub fn default_env_resolver(key: &str) -> Result<String, BridgeError> {
    std::env::var(key).map_err(|_| BridgeError::MissingConfiguration {
        field: key.to_string(),
    })
}
