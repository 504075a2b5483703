// crates/envcfg/src/interpolate.rs
// ============================================================================
// Module: Variable Interpolation
// Description: Recursive resolution of delimiter-wrapped variable references.
// Purpose: Expand `${NAME}` tokens against the raw environment table.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! A reference is `left + NAME + right` (default `${NAME}`). Each reference is
//! replaced with the raw value of `NAME`, which is itself resolved first so
//! reference chains expand fully. Names are looked up verbatim; the accessor
//! prefix does not apply to referenced names.
//!
//! A reference spans everything from its left delimiter up to the next left
//! delimiter (or the end of the value). The name is that span with every
//! right delimiter removed, and the whole span is replaced. Text after a
//! right delimiter therefore belongs to the reference: `${A}/x` looks up
//! `A/x`.
//!
//! - Unset names resolve to the empty string.
//! - A left delimiter with no matching right delimiter stays literal.
//! - A reference to a name that is already being resolved (a cycle) stays
//!   literal, as does anything nested deeper than [`MAX_INTERPOLATION_DEPTH`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::source::EnvSource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default left delimiter.
pub const DEFAULT_LEFT_DELIMITER: &str = "${";
/// Default right delimiter.
pub const DEFAULT_RIGHT_DELIMITER: &str = "}";
/// Maximum nesting of references resolved before giving up.
pub const MAX_INTERPOLATION_DEPTH: usize = 32;

// ============================================================================
// SECTION: Delimiters
// ============================================================================

/// Delimiter pair marking a variable reference.
///
/// # Invariants
/// - Neither delimiter is ever empty; empty inputs fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDelimiters", into = "RawDelimiters")]
pub struct Delimiters {
    /// Token that opens a reference.
    left: String,
    /// Token that closes a reference.
    right: String,
}

impl Delimiters {
    /// Builds a delimiter pair, substituting defaults for empty inputs.
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        let left = left.into();
        let right = right.into();
        Self {
            left: if left.is_empty() { DEFAULT_LEFT_DELIMITER.to_string() } else { left },
            right: if right.is_empty() { DEFAULT_RIGHT_DELIMITER.to_string() } else { right },
        }
    }

    /// Returns the opening token.
    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    /// Returns the closing token.
    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(DEFAULT_LEFT_DELIMITER, DEFAULT_RIGHT_DELIMITER)
    }
}

/// Serialized form of [`Delimiters`].
#[derive(Serialize, Deserialize)]
struct RawDelimiters {
    /// Opening token; empty selects the default.
    #[serde(default)]
    left: String,
    /// Closing token; empty selects the default.
    #[serde(default)]
    right: String,
}

impl From<RawDelimiters> for Delimiters {
    fn from(raw: RawDelimiters) -> Self {
        Self::new(raw.left, raw.right)
    }
}

impl From<Delimiters> for RawDelimiters {
    fn from(delimiters: Delimiters) -> Self {
        Self {
            left: delimiters.left,
            right: delimiters.right,
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves every reference in `value` against `source`.
#[must_use]
pub fn interpolate<S: EnvSource + ?Sized>(
    value: &str,
    source: &S,
    delimiters: &Delimiters,
) -> String {
    resolve(value, source, delimiters, &mut Vec::new())
}

/// Recursive worker for [`interpolate`]; `active` holds the names being resolved.
fn resolve<S: EnvSource + ?Sized>(
    value: &str,
    source: &S,
    delimiters: &Delimiters,
    active: &mut Vec<String>,
) -> String {
    let (left, right) = (delimiters.left(), delimiters.right());
    if !(value.contains(left) && value.contains(right)) {
        return value.to_string();
    }
    if active.len() >= MAX_INTERPOLATION_DEPTH {
        tracing::warn!(
            depth = active.len(),
            "interpolation depth limit reached; value left unresolved"
        );
        return value.to_string();
    }

    let mut resolved = value.to_string();
    let mut seen = BTreeSet::new();
    for fragment in value.split(left).skip(1) {
        if !fragment.contains(right) || !seen.insert(fragment) {
            continue;
        }
        let name = fragment.replace(right, "");
        if active.contains(&name) {
            tracing::warn!(name = %name, "cyclic interpolation reference left unresolved");
            continue;
        }
        let raw = source.read(&name).unwrap_or_default();
        active.push(name);
        let replacement = resolve(&raw, source, delimiters, active);
        active.pop();
        resolved = resolved.replace(&format!("{left}{fragment}"), &replacement);
    }
    resolved
}
