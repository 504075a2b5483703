// crates/envcfg/src/lib.rs
// ============================================================================
// Module: envcfg Library
// Description: Public API surface for the environment configuration accessor.
// Purpose: Expose the accessor, its environment sources, and conversion helpers.
// Dependencies: crate::{accessor, config, convert, error, interpolate, source, value}
// ============================================================================

//! ## Overview
//! `envcfg` reads, writes, and type-converts configuration stored in the
//! process environment. Keys may be namespaced with a prefix, and values may
//! reference other variables with `${NAME}` tokens that are resolved
//! recursively on read.
//!
//! Invariants:
//! - Typed getters never fail; absence or parse failure yields a zero value.
//! - Only [`EnvAccessor::try_put`] and [`EnvAccessor::decode`] surface errors.
//! - The environment table is reached exclusively through [`EnvSource`].
//!
//! ```
//! use envcfg::EnvAccessor;
//! use envcfg::InMemoryEnv;
//!
//! let env = EnvAccessor::with_source(InMemoryEnv::new()).with_interpolation(true);
//! assert!(env.put("name", "env"));
//! assert!(env.put("greeting", "hello ${name}"));
//! assert_eq!(env.get("greeting"), "hello env");
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod accessor;
pub mod config;
pub mod convert;
pub mod error;
pub mod interpolate;
pub mod source;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use accessor::EnvAccessor;
pub use config::EnvAccessorConfig;
pub use error::ConfigError;
pub use error::EnvError;
pub use interpolate::Delimiters;
pub use interpolate::MAX_INTERPOLATION_DEPTH;
pub use source::EnvSource;
pub use source::InMemoryEnv;
pub use source::SystemEnv;
pub use value::EnvValue;
pub use value::Formatted;
pub use value::Structured;
