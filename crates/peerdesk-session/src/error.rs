//! Error types for editing session transitions.

use peerdesk_config::ConfigError;
use thiserror::Error;

/// Errors returned by `EditingSession` operations.
///
/// Remote apply failures are not represented here: they land in the
/// session's error slot and leave the session editable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Field identifier or value did not fit the configuration table.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A submit is already awaiting the service's response.
    #[error("a configuration submit is already in flight")]
    SubmitInFlight,
    /// The session has committed and no longer accepts operations.
    #[error("the editing session has already committed")]
    Committed,
    /// A submit outcome arrived that this session did not issue.
    #[error("submit outcome does not belong to the pending request")]
    UnexpectedOutcome,
}

/// Convenience alias for session results.
pub type SessionResult<T> = Result<T, SessionError>;
