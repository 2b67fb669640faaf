//! Path-addressed snapshot updates.
//!
//! # Design
//! - `resolve` is the single entry point for string identifiers; `apply` is the
//!   same transition for callers that already hold a typed field.
//! - Both are pure: the input snapshot is borrowed and a new one is returned.

use crate::error::ConfigResult;
use crate::field::{ConfigField, FieldValue};
use crate::model::DesktopConfig;

/// Update applied to a single leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    /// Replace the leaf with an already-typed value.
    Set(FieldValue),
    /// Negate a boolean leaf.
    Toggle,
}

/// Produce the snapshot that results from applying `op` at `path`.
///
/// # Errors
///
/// Returns `InvalidPath` or `UnknownField` when `path` does not name a leaf,
/// and `TypeMismatch` when `op` does not fit the leaf's kind.
pub fn resolve(snapshot: &DesktopConfig, path: &str, op: FieldOp) -> ConfigResult<DesktopConfig> {
    let field = ConfigField::from_path(path)?;
    apply(snapshot, field, op)
}

/// Produce the snapshot that results from applying `op` to `field`.
///
/// # Errors
///
/// Returns `TypeMismatch` when `op` does not fit the leaf's kind.
pub fn apply(
    snapshot: &DesktopConfig,
    field: ConfigField,
    op: FieldOp,
) -> ConfigResult<DesktopConfig> {
    match op {
        FieldOp::Set(value) => field.set(snapshot, value),
        FieldOp::Toggle => field.toggle(snapshot),
    }
}
