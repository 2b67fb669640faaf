//! Draft/commit editing session.
//!
//! # Design
//! - Edits are synchronous `&mut self` transitions over the draft store.
//! - Submitting is split into `begin_submit` (copy the draft, mark in flight),
//!   `PendingSubmit::run` (the only await point, borrowing nothing from the
//!   session) and `complete_submit` (commit or record the failure).
//! - A second submit while one is in flight is rejected.
//! - A submit that never settles (a dropped `submit` future or an abandoned
//!   `PendingSubmit`) returns the session to `Editing`; the request may
//!   still have reached the service.
//! - The commit callback is consumed on success, so it runs at most once.

use std::fmt;
use std::sync::Arc;

use peerdesk_config::{ConfigField, ConfigResult, DesktopConfig, FieldOp, FieldValue};
use tracing::{debug, info, instrument, warn};

use crate::applier::{ApplyError, ConfigApplier};
use crate::draft::DraftStore;
use crate::error::{SessionError, SessionResult};

/// Message shown alongside the service's details when an apply fails.
pub const APPLY_FAILURE_TEXT: &str = "Error saving configuration";

type CommitFn = Box<dyn FnOnce(DesktopConfig) + Send>;

/// Lifecycle of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting edits; the error slot may hold the last apply failure.
    Editing,
    /// A snapshot has been handed to the applier and awaits its response.
    Submitting,
    /// The service accepted the snapshot; the session is inert.
    Committed,
}

/// Content of the error slot after a failed apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    /// Summary line for the user.
    pub text: &'static str,
    /// Details returned by the service, unmodified.
    pub details: ApplyError,
}

impl fmt::Display for ApplyFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.text, self.details)
    }
}

/// One row of the presentation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Leaf being described.
    pub field: ConfigField,
    /// Draft value of the leaf.
    pub value: FieldValue,
    /// Whether the form should accept input for the leaf.
    pub enabled: bool,
}

/// A submit that has been started but not yet sent.
///
/// Settle it with [`EditingSession::complete_submit`] or release it with
/// [`EditingSession::abandon_submit`]; until then the session stays in
/// `Submitting`.
#[must_use = "an unsettled submit keeps the session in Submitting"]
pub struct PendingSubmit {
    ticket: u64,
    snapshot: DesktopConfig,
    applier: Arc<dyn ConfigApplier>,
}

impl PendingSubmit {
    /// Identifier tying this submit to its session.
    #[must_use]
    pub const fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Snapshot that will be applied.
    #[must_use]
    pub const fn snapshot(&self) -> &DesktopConfig {
        &self.snapshot
    }

    /// Issue the single apply call for this submit.
    pub async fn run(self) -> SubmitOutcome {
        let result = self.applier.apply(&self.snapshot).await;
        SubmitOutcome {
            ticket: self.ticket,
            snapshot: self.snapshot,
            result,
        }
    }
}

impl fmt::Debug for PendingSubmit {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PendingSubmit")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Response of the applier for a `PendingSubmit`.
#[derive(Debug)]
pub struct SubmitOutcome {
    ticket: u64,
    snapshot: DesktopConfig,
    result: Result<(), ApplyError>,
}

impl SubmitOutcome {
    /// Whether the service accepted the snapshot.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Controller of a draft/commit editing flow.
pub struct EditingSession {
    store: DraftStore,
    applier: Arc<dyn ConfigApplier>,
    commit: Option<CommitFn>,
    state: SessionState,
    error: Option<ApplyFailure>,
    issued: u64,
}

impl EditingSession {
    /// Start editing a copy of `initial`. `commit` runs once, with the
    /// accepted snapshot, after a successful submit.
    pub fn new(
        initial: DesktopConfig,
        applier: Arc<dyn ConfigApplier>,
        commit: impl FnOnce(DesktopConfig) + Send + 'static,
    ) -> Self {
        Self {
            store: DraftStore::new(initial),
            applier,
            commit: Some(Box::new(commit)),
            state: SessionState::Editing,
            error: None,
            issued: 0,
        }
    }

    /// Current draft snapshot.
    #[must_use]
    pub const fn draft(&self) -> &DesktopConfig {
        self.store.current_draft()
    }

    /// Snapshot the session started from.
    #[must_use]
    pub const fn initial(&self) -> &DesktopConfig {
        self.store.initial()
    }

    /// Last apply failure, cleared when the next submit begins or on reset.
    #[must_use]
    pub const fn error(&self) -> Option<&ApplyFailure> {
        self.error.as_ref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Leaves whose draft value differs from the initial snapshot.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<ConfigField> {
        self.store.changed_fields()
    }

    /// Presentation rows for every leaf, in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldView> {
        let draft = self.draft();
        ConfigField::ALL
            .into_iter()
            .map(|field| FieldView {
                field,
                value: field.get(draft),
                enabled: field.is_enabled(draft),
            })
            .collect()
    }

    /// Replace the leaf at `path` with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Committed`] after commit, or
    /// [`SessionError::Config`] when the path or value does not fit the table.
    pub fn update_field(&mut self, path: &str, value: impl Into<FieldValue>) -> SessionResult<()> {
        self.ensure_open()?;
        let result = self.store.update_field(path, value);
        Self::log_edit(path, result)
    }

    /// Negate the boolean leaf at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Committed`] after commit, or
    /// [`SessionError::Config`] when the path names no boolean leaf.
    pub fn toggle_field(&mut self, path: &str) -> SessionResult<()> {
        self.ensure_open()?;
        let result = self.store.toggle_field(path);
        Self::log_edit(path, result)
    }

    /// Apply `op` to an already-resolved field.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Committed`] after commit, or
    /// [`SessionError::Config`] when `op` does not fit the leaf.
    pub fn apply(&mut self, field: ConfigField, op: FieldOp) -> SessionResult<()> {
        self.ensure_open()?;
        let result = self.store.apply(field, op);
        Self::log_edit(field.path(), result)
    }

    /// Discard all edits and clear the error slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Committed`] after commit and
    /// [`SessionError::SubmitInFlight`] while a submit awaits its response.
    pub fn reset(&mut self) -> SessionResult<()> {
        match self.state {
            SessionState::Committed => Err(SessionError::Committed),
            SessionState::Submitting => Err(SessionError::SubmitInFlight),
            SessionState::Editing => {
                self.store.reset();
                self.error = None;
                debug!("draft reset to initial configuration");
                Ok(())
            }
        }
    }

    /// Clear the error slot and capture the draft for submission.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SubmitInFlight`] while another submit awaits
    /// its response and [`SessionError::Committed`] after commit.
    pub fn begin_submit(&mut self) -> SessionResult<PendingSubmit> {
        match self.state {
            SessionState::Committed => return Err(SessionError::Committed),
            SessionState::Submitting => {
                warn!("submit rejected while a previous submit is in flight");
                return Err(SessionError::SubmitInFlight);
            }
            SessionState::Editing => {}
        }

        self.error = None;
        self.state = SessionState::Submitting;
        self.issued += 1;
        info!(
            ticket = self.issued,
            changed = self.store.changed_fields().len(),
            "submitting configuration"
        );

        Ok(PendingSubmit {
            ticket: self.issued,
            snapshot: self.draft().clone(),
            applier: Arc::clone(&self.applier),
        })
    }

    /// Settle the in-flight submit with the applier's response.
    ///
    /// On success the commit callback receives the submitted snapshot and the
    /// session becomes inert. On failure the error slot is filled and the
    /// draft is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnexpectedOutcome`] when `outcome` does not
    /// belong to the pending submit.
    pub fn complete_submit(&mut self, outcome: SubmitOutcome) -> SessionResult<SessionState> {
        if self.state != SessionState::Submitting || outcome.ticket != self.issued {
            return Err(SessionError::UnexpectedOutcome);
        }

        match outcome.result {
            Ok(()) => {
                self.state = SessionState::Committed;
                info!(ticket = outcome.ticket, "configuration committed");
                if let Some(commit) = self.commit.take() {
                    commit(outcome.snapshot);
                }
            }
            Err(details) => {
                warn!(
                    ticket = outcome.ticket,
                    status = details.status,
                    error = %details,
                    "configuration apply failed"
                );
                self.state = SessionState::Editing;
                self.error = Some(ApplyFailure {
                    text: APPLY_FAILURE_TEXT,
                    details,
                });
            }
        }
        Ok(self.state)
    }

    /// Return to `Editing` without an outcome for the submit `ticket`.
    ///
    /// The draft and the error slot are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnexpectedOutcome`] when `ticket` is not the
    /// pending submit.
    pub fn abandon_submit(&mut self, ticket: u64) -> SessionResult<()> {
        if self.release_in_flight(ticket) {
            Ok(())
        } else {
            Err(SessionError::UnexpectedOutcome)
        }
    }

    /// Submit the current draft and settle the response.
    ///
    /// Returns the resulting state: `Committed` on success, `Editing` with
    /// the error slot filled on failure. Dropping the future before it
    /// resolves returns the session to `Editing`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SubmitInFlight`] or [`SessionError::Committed`]
    /// when a submit cannot begin.
    #[instrument(name = "editing_session.submit", skip(self))]
    pub async fn submit(&mut self) -> SessionResult<SessionState> {
        let pending = self.begin_submit()?;
        let flight = InFlight {
            ticket: pending.ticket,
            session: self,
        };
        let outcome = pending.run().await;
        flight.session.complete_submit(outcome)
    }

    fn release_in_flight(&mut self, ticket: u64) -> bool {
        if self.state != SessionState::Submitting || ticket != self.issued {
            return false;
        }
        warn!(ticket, "submit abandoned before the service responded");
        self.state = SessionState::Editing;
        true
    }

    const fn ensure_open(&self) -> SessionResult<()> {
        match self.state {
            SessionState::Committed => Err(SessionError::Committed),
            SessionState::Editing | SessionState::Submitting => Ok(()),
        }
    }

    fn log_edit(path: &str, result: ConfigResult<()>) -> SessionResult<()> {
        match result {
            Ok(()) => {
                debug!(field = path, "draft field updated");
                Ok(())
            }
            Err(err) => {
                warn!(field = path, error = %err, "rejected draft field update");
                Err(err.into())
            }
        }
    }
}

/// Releases the session if a `submit` future is dropped mid-flight.
struct InFlight<'a> {
    ticket: u64,
    session: &'a mut EditingSession,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // No-op once `complete_submit` has moved the session out of `Submitting`.
        self.session.release_in_flight(self.ticket);
    }
}

impl fmt::Debug for EditingSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("EditingSession")
            .field("state", &self.state)
            .field("error", &self.error)
            .field("draft", self.draft())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubApplier {
        response: Result<(), ApplyError>,
    }

    #[async_trait]
    impl ConfigApplier for StubApplier {
        async fn apply(&self, _config: &DesktopConfig) -> Result<(), ApplyError> {
            self.response.clone()
        }
    }

    fn session_with(
        response: Result<(), ApplyError>,
    ) -> (EditingSession, Arc<Mutex<Vec<DesktopConfig>>>) {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&commits);
        let session = EditingSession::new(
            DesktopConfig::default(),
            Arc::new(StubApplier { response }),
            move |config| sink.lock().expect("commit sink").push(config),
        );
        (session, commits)
    }

    #[tokio::test]
    async fn successful_submit_commits_once_and_goes_inert() {
        let (mut session, commits) = session_with(Ok(()));
        session.toggle_field("dht.disable").expect("boolean leaf");

        let state = session.submit().await.expect("submit begins");
        assert_eq!(state, SessionState::Committed);
        assert_eq!(commits.lock().expect("commits").len(), 1);

        assert_eq!(
            session.toggle_field("dht.disable"),
            Err(SessionError::Committed)
        );
        assert_eq!(session.reset(), Err(SessionError::Committed));
        assert!(matches!(
            session.begin_submit(),
            Err(SessionError::Committed)
        ));
        assert_eq!(commits.lock().expect("commits").len(), 1);
    }

    #[tokio::test]
    async fn failed_submit_fills_error_slot_and_keeps_draft() {
        let details = ApplyError::new("port range is empty").with_status(400, "Bad Request");
        let (mut session, commits) = session_with(Err(details.clone()));
        session
            .update_field("tcp_listen.min_port", 9000_u16)
            .expect("integer leaf");
        let before = session.draft().clone();

        let state = session.submit().await.expect("submit begins");
        assert_eq!(state, SessionState::Editing);
        assert_eq!(session.draft(), &before);
        assert_eq!(
            session.error(),
            Some(&ApplyFailure {
                text: APPLY_FAILURE_TEXT,
                details,
            })
        );
        assert!(commits.lock().expect("commits").is_empty());
    }

    #[test]
    fn edits_do_not_clear_the_error_slot() {
        let (mut session, _) = session_with(Ok(()));
        let pending = session.begin_submit().expect("first submit");
        session
            .complete_submit(SubmitOutcome {
                ticket: pending.ticket,
                snapshot: pending.snapshot,
                result: Err(ApplyError::new("denied")),
            })
            .expect("outcome belongs to the session");
        assert!(session.error().is_some());

        session.toggle_field("upnp.disable").expect("boolean leaf");
        assert!(session.error().is_some());

        session.reset().expect("reset while editing");
        assert!(session.error().is_none());
    }

    #[test]
    fn second_submit_is_rejected_while_in_flight() {
        let (mut session, _) = session_with(Ok(()));
        let _pending = session.begin_submit().expect("first submit");
        assert_eq!(session.state(), SessionState::Submitting);
        assert!(matches!(
            session.begin_submit(),
            Err(SessionError::SubmitInFlight)
        ));
        assert_eq!(session.reset(), Err(SessionError::SubmitInFlight));
    }

    #[test]
    fn abandoned_submit_reopens_the_session() {
        let (mut session, commits) = session_with(Ok(()));
        session.toggle_field("dht.disable").expect("boolean leaf");
        let pending = session.begin_submit().expect("first submit");
        let ticket = pending.ticket();
        drop(pending);

        assert_eq!(
            session.abandon_submit(ticket + 1),
            Err(SessionError::UnexpectedOutcome)
        );
        assert_eq!(session.state(), SessionState::Submitting);
        assert_eq!(session.abandon_submit(ticket), Ok(()));
        assert_eq!(session.state(), SessionState::Editing);
        assert_eq!(session.changed_fields().len(), 1);
        assert_eq!(
            session.abandon_submit(ticket),
            Err(SessionError::UnexpectedOutcome)
        );

        let pending = session.begin_submit().expect("submit after abandon");
        assert!(pending.snapshot().dht.disable);
        assert!(commits.lock().expect("commits").is_empty());
    }

    #[test]
    fn stale_outcome_is_rejected() {
        let (mut session, _) = session_with(Ok(()));
        let stale = SubmitOutcome {
            ticket: 42,
            snapshot: DesktopConfig::default(),
            result: Ok(()),
        };
        assert_eq!(
            session.complete_submit(stale).map(|_| ()),
            Err(SessionError::UnexpectedOutcome)
        );
        assert_eq!(session.state(), SessionState::Editing);
    }

    #[test]
    fn fields_report_gating_from_the_draft() {
        let (mut session, _) = session_with(Ok(()));
        session.toggle_field("http_api.disable").expect("boolean leaf");
        let rows = session.fields();
        assert_eq!(rows.len(), ConfigField::ALL.len());

        let listen = rows
            .iter()
            .find(|row| row.field.path() == "http_api.listen_addr")
            .expect("listen_addr row");
        assert!(!listen.enabled);
        let switch = rows
            .iter()
            .find(|row| row.field.path() == "http_api.disable")
            .expect("disable row");
        assert!(switch.enabled);
        assert_eq!(switch.value, FieldValue::Bool(true));
    }
}
