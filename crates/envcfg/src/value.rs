// crates/envcfg/src/value.rs
// ============================================================================
// Module: Write Values
// Description: Serialization dispatch for values stored through `put`.
// Purpose: Render a closed set of value shapes into environment strings.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Values are rendered in priority order:
//! 1. Text (`str`, `String`, JSON string values) is stored verbatim.
//! 2. Formatted values (primitives and [`Formatted`]) use `Display`.
//! 3. Everything else is wrapped in [`Structured`] and stored as JSON.
//!
//! Only the structured tier can fail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use crate::error::EnvError;

// ============================================================================
// SECTION: Value Trait
// ============================================================================

/// A value that can be stored in the environment table.
pub trait EnvValue {
    /// Renders the value as an environment string.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Serialization`] when the value cannot be rendered.
    fn to_env_string(&self) -> Result<String, EnvError>;
}

impl<T: EnvValue + ?Sized> EnvValue for &T {
    fn to_env_string(&self) -> Result<String, EnvError> {
        (**self).to_env_string()
    }
}

impl EnvValue for str {
    fn to_env_string(&self) -> Result<String, EnvError> {
        Ok(self.to_string())
    }
}

impl EnvValue for String {
    fn to_env_string(&self) -> Result<String, EnvError> {
        Ok(self.clone())
    }
}

impl EnvValue for Value {
    fn to_env_string(&self) -> Result<String, EnvError> {
        match self {
            Self::String(text) => Ok(text.clone()),
            other => serde_json::to_string(other)
                .map_err(|err| EnvError::Serialization(err.to_string())),
        }
    }
}

/// Implements [`EnvValue`] through `Display` for primitive types.
macro_rules! display_env_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl EnvValue for $ty {
                fn to_env_string(&self) -> Result<String, EnvError> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

display_env_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

// ============================================================================
// SECTION: Wrappers
// ============================================================================

/// Stores any `Display` type through its formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatted<T>(pub T);

impl<T: Display> EnvValue for Formatted<T> {
    fn to_env_string(&self) -> Result<String, EnvError> {
        Ok(self.0.to_string())
    }
}

/// Stores any `Serialize` type as compact JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Structured<T>(pub T);

impl<T: Serialize> EnvValue for Structured<T> {
    fn to_env_string(&self) -> Result<String, EnvError> {
        serde_json::to_string(&self.0).map_err(|err| EnvError::Serialization(err.to_string()))
    }
}
