// crates/envcfg/src/config.rs
// ============================================================================
// Module: Accessor Configuration
// Description: Declarative settings for building an `EnvAccessor`.
// Purpose: Validate prefix and delimiter settings before an accessor exists.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`EnvAccessorConfig`] mirrors the accessor's settings so they can be
//! embedded in a host application's own configuration model. Missing fields
//! take their defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::interpolate::Delimiters;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Settings for an [`crate::EnvAccessor`].
///
/// # Invariants
/// - `prefix` never contains `=` or NUL once validated.
/// - `delimiters` are non-empty and distinct once validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvAccessorConfig {
    /// Namespace prepended to every key.
    pub prefix: String,
    /// Resolve `${NAME}` references on read.
    pub interpolate: bool,
    /// Reference delimiters.
    pub delimiters: Delimiters,
}

impl EnvAccessorConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the prefix cannot be part of an
    /// environment key or the delimiters cannot be told apart.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.contains('=') || self.prefix.contains('\0') {
            return Err(ConfigError::InvalidPrefix(
                "prefix must not contain '=' or NUL".to_string(),
            ));
        }
        if self.delimiters.left() == self.delimiters.right() {
            return Err(ConfigError::InvalidDelimiters(
                "left and right delimiters must differ".to_string(),
            ));
        }
        Ok(())
    }
}
