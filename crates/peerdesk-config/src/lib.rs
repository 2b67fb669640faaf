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

//! Typed desktop configuration and path-addressed field updates.
//!
//! Layout: `model.rs` (the `DesktopConfig` snapshot), `defaults.rs` (literal
//! defaults), `field.rs` (closed leaf table and typed accessors),
//! `resolve.rs` (path resolver), `validate.rs` (input coercion for view
//! layers), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod field;
pub mod model;
pub mod resolve;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use field::{
    BoolField, ConfigField, ConfigSection, FieldKind, FieldValue, NumberField, TextField,
};
pub use model::{
    DesktopConfig, DhtConfig, HttpApiConfig, PeerOptsConfig, PersistenceConfig, TcpListenConfig,
    UpnpConfig,
};
pub use resolve::{FieldOp, apply, resolve};
pub use validate::parse_input;
