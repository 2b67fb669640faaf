//! Typed desktop configuration snapshot.
//!
//! # Design
//! - Pure data carriers; no behavior beyond defaults.
//! - Every section is total: members missing from a serialized document are
//!   filled from `Default`, so an in-memory snapshot is never partial.
//! - Snapshots are replaced wholesale; nothing here mutates in place.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Full runtime configuration of the desktop torrent engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Directory new torrents download into unless overridden.
    pub default_download_location: PathBuf,
    /// Distributed hash table settings.
    pub dht: DhtConfig,
    /// Inbound TCP listener settings.
    pub tcp_listen: TcpListenConfig,
    /// `UPnP` port advertisement settings.
    pub upnp: UpnpConfig,
    /// Session persistence settings.
    pub persistence: PersistenceConfig,
    /// Peer connection options.
    pub peer_opts: PeerOptsConfig,
    /// Embedded HTTP API settings.
    pub http_api: HttpApiConfig,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            default_download_location: defaults::download_location(),
            dht: DhtConfig::default(),
            tcp_listen: TcpListenConfig::default(),
            upnp: UpnpConfig::default(),
            persistence: PersistenceConfig::default(),
            peer_opts: PeerOptsConfig::default(),
            http_api: HttpApiConfig::default(),
        }
    }
}

/// DHT section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DhtConfig {
    /// Disable DHT peer discovery entirely.
    pub disable: bool,
    /// Skip writing the routing table to disk.
    pub disable_persistence: bool,
    /// File the routing table is persisted to.
    pub persistence_filename: PathBuf,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self {
            disable: false,
            disable_persistence: false,
            persistence_filename: defaults::dht_persistence_filename(),
        }
    }
}

/// TCP listener section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcpListenConfig {
    /// Do not accept inbound peer connections.
    pub disable: bool,
    /// Lowest port tried when binding the listener.
    pub min_port: u16,
    /// Highest port tried when binding the listener.
    pub max_port: u16,
}

impl Default for TcpListenConfig {
    fn default() -> Self {
        Self {
            disable: false,
            min_port: defaults::DEFAULT_TCP_MIN_PORT,
            max_port: defaults::DEFAULT_TCP_MAX_PORT,
        }
    }
}

/// `UPnP` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpnpConfig {
    /// Do not advertise the listen port over `UPnP`.
    pub disable: bool,
}

/// Session persistence section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Do not persist the torrent session between restarts.
    pub disable: bool,
    /// File the session is persisted to.
    pub filename: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            disable: false,
            filename: defaults::session_persistence_filename(),
        }
    }
}

/// Peer connection options. Timeouts are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerOptsConfig {
    /// Seconds to wait for a peer connection to establish.
    pub connect_timeout: u64,
    /// Seconds to wait on a stalled peer read or write.
    pub read_write_timeout: u64,
}

impl Default for PeerOptsConfig {
    fn default() -> Self {
        Self {
            connect_timeout: defaults::DEFAULT_CONNECT_TIMEOUT_SECS,
            read_write_timeout: defaults::DEFAULT_READ_WRITE_TIMEOUT_SECS,
        }
    }
}

/// Embedded HTTP API section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpApiConfig {
    /// Do not start the HTTP API.
    pub disable: bool,
    /// `host:port` the API binds to.
    pub listen_addr: String,
    /// Reject mutating API requests.
    pub read_only: bool,
}

impl Default for HttpApiConfig {
    fn default() -> Self {
        Self {
            disable: false,
            listen_addr: defaults::DEFAULT_HTTP_API_LISTEN_ADDR.to_string(),
            read_only: false,
        }
    }
}
