//! Seam for handing a configuration snapshot to the owning service.
//!
//! # Design
//! - One call per submit; retries and timeouts belong to the transport.
//! - Failures carry the service's error details unchanged so they can be
//!   shown to the user verbatim.

use async_trait::async_trait;
use peerdesk_config::DesktopConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport that applies a whole configuration snapshot remotely.
#[async_trait]
pub trait ConfigApplier: Send + Sync {
    /// Submit `config` for validation and application.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError`] when the service rejects the snapshot or the
    /// request cannot be delivered.
    async fn apply(&self, config: &DesktopConfig) -> Result<(), ApplyError>;
}

/// Error details reported by the configuration service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{text}")]
pub struct ApplyError {
    /// HTTP method (or RPC verb) of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request path of the failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Status code reported by the service, absent for transport failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Reason phrase paired with `status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Human-readable failure description.
    pub text: String,
}

impl ApplyError {
    /// Error with only a description, as produced by transport failures.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach the service's status code and reason phrase.
    #[must_use]
    pub fn with_status(mut self, status: u16, status_text: impl Into<String>) -> Self {
        self.status = Some(status);
        self.status_text = Some(status_text.into());
        self
    }

    /// Attach the method and path of the failed request.
    #[must_use]
    pub fn with_request(mut self, method: impl Into<String>, path: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self.path = Some(path.into());
        self
    }
}
