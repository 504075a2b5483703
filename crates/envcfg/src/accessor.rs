// crates/envcfg/src/accessor.rs
// ============================================================================
// Module: Environment Accessor
// Description: Prefixed, interpolating, typed access to environment values.
// Purpose: Read and write configuration through an `EnvSource`.
// Dependencies: serde, serde_json, time, tracing
// ============================================================================

//! ## Overview
//! [`EnvAccessor`] is the single entry point of this crate. Every operation
//! applies the configured prefix to the key, then reads or writes through the
//! accessor's [`EnvSource`].
//!
//! Failure tiers:
//! - Typed getters substitute a zero value on absence or parse failure.
//! - [`EnvAccessor::try_put`] and the decode methods return [`EnvError`].
//!
//! The `*_of` getters fall back to a caller default when the converted value
//! equals the type's zero value. A stored zero is therefore indistinguishable
//! from an absent key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde_json::Value;
use time::Duration;
use time::OffsetDateTime;

use crate::config::EnvAccessorConfig;
use crate::convert;
use crate::error::ConfigError;
use crate::error::EnvError;
use crate::interpolate::Delimiters;
use crate::interpolate::interpolate;
use crate::source::EnvSource;
use crate::source::SystemEnv;
use crate::value::EnvValue;

// ============================================================================
// SECTION: Shared Instance
// ============================================================================

/// Process-wide default accessor.
static SHARED: OnceLock<EnvAccessor> = OnceLock::new();

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Environment-backed configuration accessor.
///
/// # Invariants
/// - Delimiters are never empty.
/// - Keys are prefixed at most once.
#[derive(Debug, Clone, Default)]
pub struct EnvAccessor<S = SystemEnv> {
    /// Namespace prepended to keys.
    prefix: String,
    /// Whether reads resolve references.
    interpolate: bool,
    /// Reference delimiters.
    delimiters: Delimiters,
    /// Backing environment table.
    source: S,
}

impl EnvAccessor<SystemEnv> {
    /// Creates an accessor over the process environment with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lazily created process-wide accessor.
    ///
    /// The shared accessor has no prefix and no interpolation. Build a
    /// dedicated accessor for anything else.
    #[must_use]
    pub fn shared() -> &'static Self {
        SHARED.get_or_init(Self::new)
    }
}

impl<S: EnvSource> EnvAccessor<S> {
    /// Creates an accessor with default settings over `source`.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        Self {
            prefix: String::new(),
            interpolate: false,
            delimiters: Delimiters::default(),
            source,
        }
    }

    /// Creates an accessor from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn from_config(config: EnvAccessorConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            prefix: config.prefix,
            interpolate: config.interpolate,
            delimiters: config.delimiters,
            source,
        })
    }

    /// Sets the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables or disables interpolation on read.
    #[must_use]
    pub fn with_interpolation(mut self, enabled: bool) -> Self {
        self.interpolate = enabled;
        self
    }

    /// Sets the reference delimiters; empty values select the defaults.
    #[must_use]
    pub fn with_delimiters(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.delimiters = Delimiters::new(left, right);
        self
    }

    /// Returns the key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true when reads resolve references.
    #[must_use]
    pub const fn interpolation_enabled(&self) -> bool {
        self.interpolate
    }

    /// Returns the reference delimiters.
    #[must_use]
    pub const fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Returns the backing environment table.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    // ------------------------------------------------------------------------
    // Key resolution
    // ------------------------------------------------------------------------

    /// Prepends the prefix unless `key` already starts with it.
    #[must_use]
    pub fn apply_prefix(&self, key: &str) -> String {
        if self.prefix.is_empty() || key.starts_with(&self.prefix) {
            key.to_string()
        } else {
            format!("{}{key}", self.prefix)
        }
    }

    // ------------------------------------------------------------------------
    // Read/write primitives
    // ------------------------------------------------------------------------

    /// Reads `key`, returning an empty string when it is unset.
    ///
    /// With interpolation enabled, references are resolved and a changed
    /// result is written back under the same key.
    #[must_use]
    pub fn get(&self, key: &str) -> String {
        let key = self.apply_prefix(key);
        let raw = self.source.read(&key).unwrap_or_default();
        if !self.interpolate || raw.is_empty() {
            return raw;
        }
        let resolved = interpolate(&raw, &self.source, &self.delimiters);
        if resolved != raw
            && let Err(err) = self.source.write(&key, &resolved)
        {
            tracing::debug!(key = %key, error = %err, "env write-back of resolved value failed");
        }
        resolved
    }

    /// Stores `value` under `key`, reporting success as a boolean.
    pub fn put<V: EnvValue + ?Sized>(&self, key: &str, value: &V) -> bool {
        self.try_put(key, value).is_ok()
    }

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Serialization`] when the value cannot be rendered
    /// and [`EnvError::EnvWrite`] when the environment rejects the write. The
    /// environment is untouched in both cases.
    pub fn try_put<V: EnvValue + ?Sized>(&self, key: &str, value: &V) -> Result<(), EnvError> {
        let rendered = value.to_env_string()?;
        let key = self.apply_prefix(key);
        self.source.write(&key, &rendered)
    }

    // ------------------------------------------------------------------------
    // Typed getters
    // ------------------------------------------------------------------------

    /// Reads `key` as an `i64`; 0 when absent or invalid.
    #[must_use]
    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).parse().unwrap_or(0)
    }

    /// Reads `key` as a bool; false when absent or invalid.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        convert::parse_bool(&self.get(key)).unwrap_or(false)
    }

    /// Reads `key` as an `f32`; 0.0 when absent or invalid.
    #[must_use]
    pub fn get_float(&self, key: &str) -> f32 {
        convert::parse_float(&self.get(key)).unwrap_or(0.0)
    }

    /// Reads `key` as a duration such as `1h30m`; zero when absent or invalid.
    #[must_use]
    pub fn get_duration(&self, key: &str) -> Duration {
        convert::parse_duration(&self.get(key)).unwrap_or(Duration::ZERO)
    }

    /// Reads `key` as a `YYYY-MM-DD HH:MM:SS` UTC timestamp.
    #[must_use]
    pub fn get_datetime(&self, key: &str) -> Option<OffsetDateTime> {
        convert::parse_datetime(&self.get(key))
    }

    /// Reads `key` as a JSON string array or comma-separated list.
    #[must_use]
    pub fn get_arr(&self, key: &str) -> Option<Vec<String>> {
        convert::parse_string_array(&self.get(key))
    }

    /// Reads `key` as a JSON integer array or comma-separated integers.
    #[must_use]
    pub fn get_int_arr(&self, key: &str) -> Option<Vec<i64>> {
        convert::parse_int_array(&self.get(key))
    }

    /// Decodes `key` as a JSON object; empty when absent or invalid.
    #[must_use]
    pub fn get_map(&self, key: &str) -> BTreeMap<String, Value> {
        self.decode_or_log(key, "env map decode failed")
    }

    /// Decodes `key` as a JSON object of strings; empty when absent or invalid.
    #[must_use]
    pub fn get_str_map(&self, key: &str) -> BTreeMap<String, String> {
        self.decode_or_log(key, "env string map decode failed")
    }

    // ------------------------------------------------------------------------
    // Getters with defaults
    // ------------------------------------------------------------------------

    /// Reads `key`, falling back to a non-empty `default` when the value is empty.
    #[must_use]
    pub fn get_of(&self, key: &str, default: Option<&str>) -> String {
        let value = self.get(key);
        match default {
            Some(default) if value.is_empty() && !default.is_empty() => default.to_string(),
            _ => value,
        }
    }

    /// Reads `key` as an `i64`, falling back to a non-zero `default` on 0.
    #[must_use]
    pub fn get_int_of(&self, key: &str, default: Option<i64>) -> i64 {
        let value = self.get_int(key);
        match default {
            Some(default) if value == 0 && default != 0 => default,
            _ => value,
        }
    }

    /// Reads `key` as an `f32`, falling back to a non-zero `default` on 0.0.
    #[must_use]
    #[allow(clippy::float_cmp, reason = "Zero is the absent marker, not a computed result.")]
    pub fn get_float_of(&self, key: &str, default: Option<f32>) -> f32 {
        let value = self.get_float(key);
        match default {
            Some(default) if value == 0.0 && default != 0.0 => default,
            _ => value,
        }
    }

    /// Reads `key` as a string array, falling back to `default` when absent.
    #[must_use]
    pub fn get_arr_of(&self, key: &str, default: Option<Vec<String>>) -> Option<Vec<String>> {
        self.get_arr(key).or(default)
    }

    // ------------------------------------------------------------------------
    // Structured decode
    // ------------------------------------------------------------------------

    /// Decodes the JSON value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NoValue`] when the key is unset or empty and
    /// [`EnvError::Decode`] when the value does not parse as `T`.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<T, EnvError> {
        let key = self.apply_prefix(key);
        let value = self.get(&key);
        if value.is_empty() {
            return Err(EnvError::NoValue {
                key,
            });
        }
        serde_json::from_str(&value).map_err(|source| EnvError::Decode {
            key,
            source,
        })
    }

    /// Decodes the JSON value stored under `key` into `binder`.
    ///
    /// `binder` is left untouched on failure.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NilBinder`] when `binder` is `None`, otherwise the
    /// same errors as [`EnvAccessor::decode`].
    pub fn decode_into<T: DeserializeOwned>(
        &self,
        key: &str,
        binder: Option<&mut T>,
    ) -> Result<(), EnvError> {
        let binder = binder.ok_or(EnvError::NilBinder)?;
        *binder = self.decode(key)?;
        Ok(())
    }

    /// Decodes `key`, logging and defaulting on any failure.
    fn decode_or_log<T: DeserializeOwned + Default>(&self, key: &str, message: &str) -> T {
        match self.decode(key) {
            Ok(value) => value,
            Err(err @ EnvError::NoValue { .. }) => {
                tracing::debug!(error = %err, "{message}");
                T::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "{message}");
                T::default()
            }
        }
    }
}

#[cfg(test)]
mod tests;
