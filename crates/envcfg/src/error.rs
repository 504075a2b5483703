// crates/envcfg/src/error.rs
// ============================================================================
// Module: envcfg Errors
// Description: Error kinds surfaced by writes, structured decodes, and config.
// Purpose: Give callers stable variants for the few actionable failures.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Most accessor operations substitute zero values instead of failing. The
//! errors here cover the exceptions: writes that cannot be serialized or are
//! rejected by the environment, structured decodes, and invalid accessor
//! configuration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Accessor Errors
// ============================================================================

/// Errors returned by [`crate::EnvAccessor::try_put`] and the decode path.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Decode was called without a target to decode into.
    #[error("env binder is nil")]
    NilBinder,
    /// The key is unset or holds an empty value.
    #[error("env value missing for key: {key}")]
    NoValue {
        /// Fully prefixed key that was looked up.
        key: String,
    },
    /// The value could not be rendered as a string.
    #[error("env value serialization failed: {0}")]
    Serialization(String),
    /// The environment table rejected the write.
    #[error("env write rejected for key {key}: {reason}")]
    EnvWrite {
        /// Fully prefixed key that was written.
        key: String,
        /// Reason the write was rejected.
        reason: String,
    },
    /// The stored value is not valid JSON for the requested shape.
    #[error("env value decode failed for key {key}: {source}")]
    Decode {
        /// Fully prefixed key that was decoded.
        key: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Errors raised while validating an [`crate::EnvAccessorConfig`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The prefix cannot form part of an environment key.
    #[error("invalid env prefix: {0}")]
    InvalidPrefix(String),
    /// The interpolation delimiters are unusable.
    #[error("invalid interpolation delimiters: {0}")]
    InvalidDelimiters(String),
}
