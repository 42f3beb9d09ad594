//! Shared value types exchanged between the orchestrator and a [`crate::Stack`].
//!
//! Configuration flows in ([`ConfigMap`]), outputs flow out ([`OutputMap`]).
//! Neither map is interpreted by the orchestrator; they are passed through
//! verbatim.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ConfigKey;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Environment variable the engine's backend client reads its access token from.
pub const ACCESS_TOKEN_ENV_VAR: &str = "PULUMI_ACCESS_TOKEN";

/// Credential used to authenticate the engine session with its backend.
///
/// Distinct from the provider credentials carried in the [`ConfigMap`].
/// The `Debug` representation never contains the token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a new token, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw token. Callers must not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// A single configuration value applied to a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    /// The raw value.
    pub value: String,
    /// Whether the engine must encrypt the value at rest.
    pub secret: bool,
}

impl ConfigValue {
    /// A value stored in plain text.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            secret: false,
        }
    }

    /// A value the engine encrypts.
    pub fn secret(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            secret: true,
        }
    }
}

/// Configuration applied to a stack before any lifecycle operation runs.
///
/// Ordered so that the engine sees entries in a deterministic order.
pub type ConfigMap = BTreeMap<ConfigKey, ConfigValue>;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// A single stack output produced by a successful update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputValue {
    /// The output value as reported by the engine.
    pub value: serde_json::Value,
    /// Whether the engine marked the value as secret.
    pub secret: bool,
}

impl OutputValue {
    /// Creates a non-secret output.
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: value.into(),
            secret: false,
        }
    }
}

/// Stack outputs keyed by export name.
pub type OutputMap = BTreeMap<String, OutputValue>;

/// Result of a successful `up` operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpResult {
    /// Engine progress output captured during the update.
    pub stdout: String,
    /// Stack outputs after the update.
    pub outputs: OutputMap,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
