//! Deterministic configuration fixtures.
//!
//! `DesktopConfig::default()` depends on the host's user directories, so
//! tests that compare rendered output use these instead.

use std::path::PathBuf;

use peerdesk_config::{
    DesktopConfig, DhtConfig, HttpApiConfig, PeerOptsConfig, PersistenceConfig, TcpListenConfig,
    UpnpConfig,
};

/// A fully populated configuration with host-independent values.
#[must_use]
pub fn sample_config() -> DesktopConfig {
    DesktopConfig {
        default_download_location: PathBuf::from("/srv/torrents"),
        dht: DhtConfig {
            disable: false,
            disable_persistence: false,
            persistence_filename: PathBuf::from("/var/cache/peerdesk/dht.json"),
        },
        tcp_listen: TcpListenConfig {
            disable: false,
            min_port: 6881,
            max_port: 6999,
        },
        upnp: UpnpConfig { disable: false },
        persistence: PersistenceConfig {
            disable: false,
            filename: PathBuf::from("/var/cache/peerdesk/session.json"),
        },
        peer_opts: PeerOptsConfig {
            connect_timeout: 2,
            read_write_timeout: 10,
        },
        http_api: HttpApiConfig {
            disable: false,
            listen_addr: "127.0.0.1:3030".to_string(),
            read_only: false,
        },
    }
}

/// `sample_config` with every section switched off, as a user who disabled
/// all networking would have it.
#[must_use]
pub fn disabled_config() -> DesktopConfig {
    let mut config = sample_config();
    config.dht.disable = true;
    config.tcp_listen.disable = true;
    config.upnp.disable = true;
    config.persistence.disable = true;
    config.http_api.disable = true;
    config
}
