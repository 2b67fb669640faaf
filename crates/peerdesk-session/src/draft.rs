//! Draft and initial snapshot holder.
//!
//! # Design
//! - The initial snapshot is fixed at construction and never handed out
//!   mutably.
//! - Every edit computes the next draft with the pure resolver and swaps it
//!   in only on success, so a failed edit leaves the draft as it was.

use peerdesk_config::{
    ConfigField, ConfigResult, DesktopConfig, FieldOp, FieldValue, apply, resolve,
};

/// Holds the draft being edited alongside the snapshot it started from.
#[derive(Debug, Clone)]
pub struct DraftStore {
    initial: DesktopConfig,
    draft: DesktopConfig,
}

impl DraftStore {
    /// Start a draft as a copy of `initial`.
    #[must_use]
    pub fn new(initial: DesktopConfig) -> Self {
        let draft = initial.clone();
        Self { initial, draft }
    }

    /// Replace the leaf at `path` with `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`peerdesk_config::ConfigError`] when `path` names no leaf or
    /// `value` does not fit it; the draft is unchanged.
    pub fn update_field(&mut self, path: &str, value: impl Into<FieldValue>) -> ConfigResult<()> {
        self.draft = resolve(&self.draft, path, FieldOp::Set(value.into()))?;
        Ok(())
    }

    /// Negate the boolean leaf at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`peerdesk_config::ConfigError`] when `path` names no leaf or
    /// the leaf is not boolean; the draft is unchanged.
    pub fn toggle_field(&mut self, path: &str) -> ConfigResult<()> {
        self.draft = resolve(&self.draft, path, FieldOp::Toggle)?;
        Ok(())
    }

    /// Apply `op` to an already-resolved field.
    ///
    /// # Errors
    ///
    /// Returns a [`peerdesk_config::ConfigError`] when `op` does not fit the
    /// leaf; the draft is unchanged.
    pub fn apply(&mut self, field: ConfigField, op: FieldOp) -> ConfigResult<()> {
        self.draft = apply(&self.draft, field, op)?;
        Ok(())
    }

    /// Discard all edits, starting over from a fresh copy of the initial snapshot.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
    }

    /// Current draft snapshot.
    #[must_use]
    pub const fn current_draft(&self) -> &DesktopConfig {
        &self.draft
    }

    /// Snapshot the store was created from.
    #[must_use]
    pub const fn initial(&self) -> &DesktopConfig {
        &self.initial
    }

    /// Whether the draft differs from the initial snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft != self.initial
    }

    /// Leaves whose draft value differs from the initial snapshot, in table order.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<ConfigField> {
        ConfigField::ALL
            .into_iter()
            .filter(|field| field.differs(&self.draft, &self.initial))
            .collect()
    }
}
