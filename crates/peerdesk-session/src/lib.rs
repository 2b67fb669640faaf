#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Draft/commit editing of the desktop configuration.
//!
//! Layout: `draft.rs` (`DraftStore`), `applier.rs` (`ConfigApplier` seam and
//! `ApplyError`), `session.rs` (`EditingSession` state machine), `error.rs`
//! (`SessionError`).

pub mod applier;
pub mod draft;
pub mod error;
pub mod session;

pub use applier::{ApplyError, ConfigApplier};
pub use draft::DraftStore;
pub use error::{SessionError, SessionResult};
pub use session::{
    APPLY_FAILURE_TEXT, ApplyFailure, EditingSession, FieldView, PendingSubmit, SessionState,
    SubmitOutcome,
};
