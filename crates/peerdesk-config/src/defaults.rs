//! Default values for a freshly provisioned desktop configuration.
//!
//! # Design
//! - Keep every literal default in one place so the model stays declarative.
//! - Resolve user directories lazily; fall back to relative paths when the
//!   platform reports none.

use std::path::PathBuf;

/// Lowest TCP port the engine listens on by default.
pub const DEFAULT_TCP_MIN_PORT: u16 = 4240;
/// Highest TCP port the engine listens on by default.
pub const DEFAULT_TCP_MAX_PORT: u16 = 4260;
/// Peer connect timeout, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 2;
/// Peer read/write timeout, in seconds.
pub const DEFAULT_READ_WRITE_TIMEOUT_SECS: u64 = 10;
/// Listen address of the embedded HTTP API.
pub const DEFAULT_HTTP_API_LISTEN_ADDR: &str = "127.0.0.1:3030";

const APP_CACHE_DIR: &str = "peerdesk";
const DHT_PERSISTENCE_FILE: &str = "dht.json";
const SESSION_PERSISTENCE_FILE: &str = "session.json";

pub(crate) fn download_location() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("downloads"))
}

pub(crate) fn dht_persistence_filename() -> PathBuf {
    cache_dir().join(DHT_PERSISTENCE_FILE)
}

pub(crate) fn session_persistence_filename() -> PathBuf {
    cache_dir().join(SESSION_PERSISTENCE_FILE)
}

fn cache_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(|| PathBuf::from(".cache"), |dir| dir.join(APP_CACHE_DIR))
}
