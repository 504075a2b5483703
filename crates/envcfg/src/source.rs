// crates/envcfg/src/source.rs
// ============================================================================
// Module: Environment Sources
// Description: Read/write seam over the environment table.
// Purpose: Let the accessor target the process environment or an isolated map.
// Dependencies: std
// ============================================================================

//! ## Overview
//! [`EnvSource`] is the only path the accessor uses to touch environment
//! state. [`SystemEnv`] delegates to the process environment; [`InMemoryEnv`]
//! keeps values in a private map so tests and deterministic overrides never
//! mutate the global table.
//!
//! # Thread Safety
//!
//! [`EnvSource`] does **not** require `Send + Sync`. [`SystemEnv`] is
//! zero-sized and trivially `Send + Sync`; [`InMemoryEnv`] is backed by a
//! `RefCell` and is single-threaded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::EnvError;

// ============================================================================
// SECTION: Source Trait
// ============================================================================

/// Environment table addressed by the accessor.
pub trait EnvSource {
    /// Returns the raw value stored under `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::EnvWrite`] when the table rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), EnvError>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), EnvError> {
        (**self).write(key, value)
    }
}

// ============================================================================
// SECTION: Process Environment
// ============================================================================

/// Zero-sized type that delegates to `std::env`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemEnv;

impl EnvSource for SystemEnv {
    #[inline]
    fn read(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }

    #[allow(unsafe_code, reason = "std::env::set_var is unsafe as of edition 2024.")]
    fn write(&self, key: &str, value: &str) -> Result<(), EnvError> {
        check_writable(key, value)?;
        // SAFETY: the key and value were validated above, and the process
        // environment is documented as caller-synchronized for this crate.
        unsafe { std::env::set_var(key, value) };
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Environment
// ============================================================================

/// Won't touch the global process environment.
///
/// Applies the same key/value rules as [`SystemEnv`] so write failures behave
/// identically under test.
#[derive(Debug, Default)]
pub struct InMemoryEnv {
    /// Stored variables keyed by name.
    vars: RefCell<BTreeMap<String, String>>,
}

impl InMemoryEnv {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment seeded with `vars`.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: RefCell::new(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Inserts a value without key validation.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.borrow_mut().insert(key.into(), value.into());
    }

    /// Removes a value.
    pub fn remove(&self, key: &str) {
        self.vars.borrow_mut().remove(key);
    }

    /// Returns true when `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.borrow().contains_key(key)
    }

    /// Returns a copy of every stored variable.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars.borrow().clone()
    }
}

impl EnvSource for InMemoryEnv {
    fn read(&self, key: &str) -> Option<String> {
        self.vars.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), EnvError> {
        check_writable(key, value)?;
        self.vars.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects keys and values the platform environment cannot hold.
fn check_writable(key: &str, value: &str) -> Result<(), EnvError> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.contains('=') {
        "key contains '='"
    } else if key.contains('\0') {
        "key contains NUL"
    } else if value.contains('\0') {
        "value contains NUL"
    } else {
        return Ok(());
    };
    Err(EnvError::EnvWrite {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}
