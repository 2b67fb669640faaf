//! Closed table of addressable configuration leaves.
//!
//! # Design
//! - Every leaf of `DesktopConfig` has exactly one variant, grouped by kind so
//!   boolean-only operations are checked at compile time.
//! - String identifiers (`field` or `section.field`) enter the system only
//!   through `ConfigField::from_path`.
//! - Setters are pure: they take a snapshot and return the next one.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::model::DesktopConfig;

/// Declared type of a configuration leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// `true`/`false` switch.
    Bool,
    /// Unsigned whole number.
    Integer,
    /// Free-form text, including filesystem paths.
    Text,
}

impl FieldKind {
    /// Lowercase name used in messages and listings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Text => "text",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Typed value read from or written to a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Boolean leaf value.
    Bool(bool),
    /// Integer leaf value.
    Integer(u64),
    /// Text leaf value.
    Text(String),
}

impl FieldValue {
    /// Kind of the carried value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Integer(_) => FieldKind::Integer,
            Self::Text(_) => FieldKind::Text,
        }
    }

    fn describe(&self) -> String {
        format!("{} value {self}", self.kind())
    }
}

impl Display for FieldValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        Self::Integer(u64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Top-level grouping of leaves, matching the tabs of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    /// Leaves stored directly on the root.
    Home,
    /// `dht.*`
    Dht,
    /// `tcp_listen.*`
    TcpListen,
    /// `upnp.*`
    Upnp,
    /// `persistence.*`
    Persistence,
    /// `peer_opts.*`
    PeerOpts,
    /// `http_api.*`
    HttpApi,
}

impl ConfigSection {
    /// Sections in display order.
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::Dht,
        Self::TcpListen,
        Self::Upnp,
        Self::Persistence,
        Self::PeerOpts,
        Self::HttpApi,
    ];

    /// Path prefix of the section, or `None` for root-level leaves.
    #[must_use]
    pub const fn key(self) -> Option<&'static str> {
        match self {
            Self::Home => None,
            Self::Dht => Some("dht"),
            Self::TcpListen => Some("tcp_listen"),
            Self::Upnp => Some("upnp"),
            Self::Persistence => Some("persistence"),
            Self::PeerOpts => Some("peer_opts"),
            Self::HttpApi => Some("http_api"),
        }
    }

    /// Human-readable tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Dht => "DHT",
            Self::TcpListen | Self::Upnp => "TCP",
            Self::Persistence => "Session",
            Self::PeerOpts => "Peer options",
            Self::HttpApi => "HTTP API",
        }
    }

    /// Leaves belonging to this section, in display order.
    pub fn fields(self) -> impl Iterator<Item = ConfigField> {
        ConfigField::ALL
            .into_iter()
            .filter(move |field| field.section() == self)
    }
}

/// Boolean leaves; the only leaves that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolField {
    /// `dht.disable`
    DhtDisable,
    /// `dht.disable_persistence`
    DhtDisablePersistence,
    /// `tcp_listen.disable`
    TcpListenDisable,
    /// `upnp.disable`
    UpnpDisable,
    /// `persistence.disable`
    PersistenceDisable,
    /// `http_api.disable`
    HttpApiDisable,
    /// `http_api.read_only`
    HttpApiReadOnly,
}

impl BoolField {
    /// Dotted path of the leaf.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::DhtDisable => "dht.disable",
            Self::DhtDisablePersistence => "dht.disable_persistence",
            Self::TcpListenDisable => "tcp_listen.disable",
            Self::UpnpDisable => "upnp.disable",
            Self::PersistenceDisable => "persistence.disable",
            Self::HttpApiDisable => "http_api.disable",
            Self::HttpApiReadOnly => "http_api.read_only",
        }
    }

    /// Current value of the leaf.
    #[must_use]
    pub const fn get(self, config: &DesktopConfig) -> bool {
        match self {
            Self::DhtDisable => config.dht.disable,
            Self::DhtDisablePersistence => config.dht.disable_persistence,
            Self::TcpListenDisable => config.tcp_listen.disable,
            Self::UpnpDisable => config.upnp.disable,
            Self::PersistenceDisable => config.persistence.disable,
            Self::HttpApiDisable => config.http_api.disable,
            Self::HttpApiReadOnly => config.http_api.read_only,
        }
    }

    /// Snapshot with the leaf replaced by `value`.
    #[must_use]
    pub fn set(self, config: &DesktopConfig, value: bool) -> DesktopConfig {
        let mut next = config.clone();
        *self.slot(&mut next) = value;
        next
    }

    /// Snapshot with the leaf negated.
    #[must_use]
    pub fn toggle(self, config: &DesktopConfig) -> DesktopConfig {
        self.set(config, !self.get(config))
    }

    const fn slot(self, config: &mut DesktopConfig) -> &mut bool {
        match self {
            Self::DhtDisable => &mut config.dht.disable,
            Self::DhtDisablePersistence => &mut config.dht.disable_persistence,
            Self::TcpListenDisable => &mut config.tcp_listen.disable,
            Self::UpnpDisable => &mut config.upnp.disable,
            Self::PersistenceDisable => &mut config.persistence.disable,
            Self::HttpApiDisable => &mut config.http_api.disable,
            Self::HttpApiReadOnly => &mut config.http_api.read_only,
        }
    }
}

/// Integer leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberField {
    /// `tcp_listen.min_port`
    TcpListenMinPort,
    /// `tcp_listen.max_port`
    TcpListenMaxPort,
    /// `peer_opts.connect_timeout`
    PeerConnectTimeout,
    /// `peer_opts.read_write_timeout`
    PeerReadWriteTimeout,
}

impl NumberField {
    /// Dotted path of the leaf.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::TcpListenMinPort => "tcp_listen.min_port",
            Self::TcpListenMaxPort => "tcp_listen.max_port",
            Self::PeerConnectTimeout => "peer_opts.connect_timeout",
            Self::PeerReadWriteTimeout => "peer_opts.read_write_timeout",
        }
    }

    /// Current value of the leaf.
    #[must_use]
    pub fn get(self, config: &DesktopConfig) -> u64 {
        match self {
            Self::TcpListenMinPort => u64::from(config.tcp_listen.min_port),
            Self::TcpListenMaxPort => u64::from(config.tcp_listen.max_port),
            Self::PeerConnectTimeout => config.peer_opts.connect_timeout,
            Self::PeerReadWriteTimeout => config.peer_opts.read_write_timeout,
        }
    }

    /// Snapshot with the leaf replaced by `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] when `value` does not fit the
    /// leaf's storage (ports are 16-bit).
    pub fn set(self, config: &DesktopConfig, value: u64) -> ConfigResult<DesktopConfig> {
        let mut next = config.clone();
        match self {
            Self::TcpListenMinPort => next.tcp_listen.min_port = self.port(value)?,
            Self::TcpListenMaxPort => next.tcp_listen.max_port = self.port(value)?,
            Self::PeerConnectTimeout => next.peer_opts.connect_timeout = value,
            Self::PeerReadWriteTimeout => next.peer_opts.read_write_timeout = value,
        }
        Ok(next)
    }

    fn port(self, value: u64) -> ConfigResult<u16> {
        u16::try_from(value).map_err(|_| ConfigError::TypeMismatch {
            path: self.path(),
            expected: FieldKind::Integer,
            found: format!("integer {value} outside the 16-bit port range"),
        })
    }
}

/// Text leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// `default_download_location`
    DefaultDownloadLocation,
    /// `dht.persistence_filename`
    DhtPersistenceFilename,
    /// `persistence.filename`
    PersistenceFilename,
    /// `http_api.listen_addr`
    HttpApiListenAddr,
}

impl TextField {
    /// Dotted path of the leaf.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::DefaultDownloadLocation => "default_download_location",
            Self::DhtPersistenceFilename => "dht.persistence_filename",
            Self::PersistenceFilename => "persistence.filename",
            Self::HttpApiListenAddr => "http_api.listen_addr",
        }
    }

    /// Current value of the leaf. Paths are rendered lossily.
    #[must_use]
    pub fn get(self, config: &DesktopConfig) -> String {
        match self {
            Self::DefaultDownloadLocation => {
                config.default_download_location.display().to_string()
            }
            Self::DhtPersistenceFilename => config.dht.persistence_filename.display().to_string(),
            Self::PersistenceFilename => config.persistence.filename.display().to_string(),
            Self::HttpApiListenAddr => config.http_api.listen_addr.clone(),
        }
    }

    /// Whether the leaf holds different values in `left` and `right`.
    ///
    /// Paths are compared as stored, not through their rendering.
    #[must_use]
    pub fn differs(self, left: &DesktopConfig, right: &DesktopConfig) -> bool {
        match self {
            Self::DefaultDownloadLocation => {
                left.default_download_location != right.default_download_location
            }
            Self::DhtPersistenceFilename => {
                left.dht.persistence_filename != right.dht.persistence_filename
            }
            Self::PersistenceFilename => left.persistence.filename != right.persistence.filename,
            Self::HttpApiListenAddr => left.http_api.listen_addr != right.http_api.listen_addr,
        }
    }

    /// Snapshot with the leaf replaced by `value`.
    #[must_use]
    pub fn set(self, config: &DesktopConfig, value: impl Into<String>) -> DesktopConfig {
        let value = value.into();
        let mut next = config.clone();
        match self {
            Self::DefaultDownloadLocation => next.default_download_location = PathBuf::from(value),
            Self::DhtPersistenceFilename => next.dht.persistence_filename = PathBuf::from(value),
            Self::PersistenceFilename => next.persistence.filename = PathBuf::from(value),
            Self::HttpApiListenAddr => next.http_api.listen_addr = value,
        }
        next
    }
}

/// Any addressable leaf of `DesktopConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// Boolean leaf.
    Bool(BoolField),
    /// Integer leaf.
    Number(NumberField),
    /// Text leaf.
    Text(TextField),
}

impl ConfigField {
    /// Every leaf, in form display order.
    pub const ALL: [Self; 15] = [
        Self::Text(TextField::DefaultDownloadLocation),
        Self::Bool(BoolField::DhtDisable),
        Self::Bool(BoolField::DhtDisablePersistence),
        Self::Text(TextField::DhtPersistenceFilename),
        Self::Bool(BoolField::TcpListenDisable),
        Self::Number(NumberField::TcpListenMinPort),
        Self::Number(NumberField::TcpListenMaxPort),
        Self::Bool(BoolField::UpnpDisable),
        Self::Bool(BoolField::PersistenceDisable),
        Self::Text(TextField::PersistenceFilename),
        Self::Number(NumberField::PeerConnectTimeout),
        Self::Number(NumberField::PeerReadWriteTimeout),
        Self::Bool(BoolField::HttpApiDisable),
        Self::Text(TextField::HttpApiListenAddr),
        Self::Bool(BoolField::HttpApiReadOnly),
    ];

    /// Resolve a `field` or `section.field` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPath`] when the identifier has an empty
    /// segment or more than two segments, and [`ConfigError::UnknownField`]
    /// when it is well-formed but not in the table.
    pub fn from_path(path: &str) -> ConfigResult<Self> {
        let well_formed = match path.split_once('.') {
            Some((section, leaf)) => {
                !section.is_empty() && !leaf.is_empty() && !leaf.contains('.')
            }
            None => !path.is_empty(),
        };
        if !well_formed {
            return Err(ConfigError::invalid_path(path));
        }

        Self::ALL
            .into_iter()
            .find(|field| field.path() == path)
            .ok_or_else(|| ConfigError::unknown_field(path))
    }

    /// Dotted path of the leaf.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Bool(field) => field.path(),
            Self::Number(field) => field.path(),
            Self::Text(field) => field.path(),
        }
    }

    /// Declared kind of the leaf.
    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Bool(_) => FieldKind::Bool,
            Self::Number(_) => FieldKind::Integer,
            Self::Text(_) => FieldKind::Text,
        }
    }

    /// Section the leaf belongs to.
    #[must_use]
    pub const fn section(self) -> ConfigSection {
        match self {
            Self::Text(TextField::DefaultDownloadLocation) => ConfigSection::Home,
            Self::Bool(BoolField::DhtDisable | BoolField::DhtDisablePersistence)
            | Self::Text(TextField::DhtPersistenceFilename) => ConfigSection::Dht,
            Self::Bool(BoolField::TcpListenDisable)
            | Self::Number(NumberField::TcpListenMinPort | NumberField::TcpListenMaxPort) => {
                ConfigSection::TcpListen
            }
            Self::Bool(BoolField::UpnpDisable) => ConfigSection::Upnp,
            Self::Bool(BoolField::PersistenceDisable)
            | Self::Text(TextField::PersistenceFilename) => ConfigSection::Persistence,
            Self::Number(NumberField::PeerConnectTimeout | NumberField::PeerReadWriteTimeout) => {
                ConfigSection::PeerOpts
            }
            Self::Bool(BoolField::HttpApiDisable | BoolField::HttpApiReadOnly)
            | Self::Text(TextField::HttpApiListenAddr) => ConfigSection::HttpApi,
        }
    }

    /// Form label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Text(TextField::DefaultDownloadLocation) => "Default download folder",
            Self::Bool(BoolField::DhtDisable) => "Disable DHT",
            Self::Bool(BoolField::DhtDisablePersistence) => "Disable DHT Persistence",
            Self::Text(TextField::DhtPersistenceFilename | TextField::PersistenceFilename) => {
                "Persistence Filename"
            }
            Self::Bool(BoolField::TcpListenDisable) => "Disable TCP Listen",
            Self::Number(NumberField::TcpListenMinPort) => "Min port",
            Self::Number(NumberField::TcpListenMaxPort) => "Max Port",
            Self::Bool(BoolField::UpnpDisable) => "Do not advertise TCP port over UPnP",
            Self::Bool(BoolField::PersistenceDisable) => "Disable Persistence",
            Self::Number(NumberField::PeerConnectTimeout) => "Connect timeout (seconds)",
            Self::Number(NumberField::PeerReadWriteTimeout) => "Read/write timeout (seconds)",
            Self::Bool(BoolField::HttpApiDisable) => "Disable HTTP API",
            Self::Text(TextField::HttpApiListenAddr) => "HTTP API Listen Address",
            Self::Bool(BoolField::HttpApiReadOnly) => "HTTP API Read Only",
        }
    }

    /// Switch that greys this field out in the form while it is `true`.
    ///
    /// Advisory only: gated fields still accept edits and keep their values.
    #[must_use]
    pub const fn gated_by(self) -> Option<BoolField> {
        match self {
            Self::Bool(BoolField::DhtDisablePersistence)
            | Self::Text(TextField::DhtPersistenceFilename) => Some(BoolField::DhtDisable),
            Self::Number(NumberField::TcpListenMinPort | NumberField::TcpListenMaxPort)
            | Self::Bool(BoolField::UpnpDisable) => Some(BoolField::TcpListenDisable),
            Self::Text(TextField::PersistenceFilename) => Some(BoolField::PersistenceDisable),
            Self::Text(TextField::HttpApiListenAddr) | Self::Bool(BoolField::HttpApiReadOnly) => {
                Some(BoolField::HttpApiDisable)
            }
            _ => None,
        }
    }

    /// Whether the form presents this field as editable for `config`.
    #[must_use]
    pub const fn is_enabled(self, config: &DesktopConfig) -> bool {
        !matches!(self.gated_by(), Some(switch) if switch.get(config))
    }

    /// Current value of the leaf.
    #[must_use]
    pub fn get(self, config: &DesktopConfig) -> FieldValue {
        match self {
            Self::Bool(field) => FieldValue::Bool(field.get(config)),
            Self::Number(field) => FieldValue::Integer(field.get(config)),
            Self::Text(field) => FieldValue::Text(field.get(config)),
        }
    }

    /// Whether the leaf holds different values in `left` and `right`.
    #[must_use]
    pub fn differs(self, left: &DesktopConfig, right: &DesktopConfig) -> bool {
        match self {
            Self::Bool(field) => field.get(left) != field.get(right),
            Self::Number(field) => field.get(left) != field.get(right),
            Self::Text(field) => field.differs(left, right),
        }
    }

    /// Snapshot with the leaf replaced by `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] when `value` is not of the leaf's
    /// kind or does not fit its storage.
    pub fn set(self, config: &DesktopConfig, value: FieldValue) -> ConfigResult<DesktopConfig> {
        match (self, value) {
            (Self::Bool(field), FieldValue::Bool(value)) => Ok(field.set(config, value)),
            (Self::Number(field), FieldValue::Integer(value)) => field.set(config, value),
            (Self::Text(field), FieldValue::Text(value)) => Ok(field.set(config, value)),
            (field, value) => Err(ConfigError::TypeMismatch {
                path: field.path(),
                expected: field.kind(),
                found: value.describe(),
            }),
        }
    }

    /// Snapshot with a boolean leaf negated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] when the leaf is not boolean.
    pub fn toggle(self, config: &DesktopConfig) -> ConfigResult<DesktopConfig> {
        match self {
            Self::Bool(field) => Ok(field.toggle(config)),
            other => Err(ConfigError::TypeMismatch {
                path: other.path(),
                expected: other.kind(),
                found: "toggle of a non-boolean leaf".to_string(),
            }),
        }
    }
}

impl Display for ConfigField {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}

impl FromStr for ConfigField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s)
    }
}

impl From<BoolField> for ConfigField {
    fn from(field: BoolField) -> Self {
        Self::Bool(field)
    }
}

impl From<NumberField> for ConfigField {
    fn from(field: NumberField) -> Self {
        Self::Number(field)
    }
}

impl From<TextField> for ConfigField {
    fn from(field: TextField) -> Self {
        Self::Text(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_path_round_trips_through_the_table() {
        for field in ConfigField::ALL {
            assert_eq!(ConfigField::from_path(field.path()), Ok(field));
        }
    }

    #[test]
    fn paths_are_unique_and_at_most_two_levels() {
        let paths: HashSet<_> = ConfigField::ALL.iter().map(|field| field.path()).collect();
        assert_eq!(paths.len(), ConfigField::ALL.len());
        for path in paths {
            assert!(path.matches('.').count() <= 1, "{path} nests too deep");
        }
    }

    #[test]
    fn section_prefix_matches_path() {
        for field in ConfigField::ALL {
            match field.section().key() {
                Some(prefix) => assert!(field.path().starts_with(&format!("{prefix}."))),
                None => assert!(!field.path().contains('.')),
            }
        }
    }

    #[test]
    fn three_segment_path_is_malformed() {
        assert!(matches!(
            ConfigField::from_path("a.b.c"),
            Err(ConfigError::InvalidPath { .. })
        ));
        assert!(matches!(
            ConfigField::from_path("dht.disable.extra"),
            Err(ConfigError::InvalidPath { .. })
        ));
    }

    #[test]
    fn empty_segments_are_malformed() {
        for path in ["", ".disable", "dht.", "."] {
            assert!(
                matches!(
                    ConfigField::from_path(path),
                    Err(ConfigError::InvalidPath { .. })
                ),
                "{path:?} should be malformed"
            );
        }
    }

    #[test]
    fn unknown_leaf_is_reported_separately() {
        assert_eq!(
            ConfigField::from_path("dht.bootstrap"),
            Err(ConfigError::UnknownField {
                path: "dht.bootstrap".to_string()
            })
        );
        assert!(matches!(
            "dht".parse::<ConfigField>(),
            Err(ConfigError::UnknownField { .. })
        ));
    }

    #[test]
    fn gating_follows_the_switch() {
        let config = DesktopConfig::default();
        let field = ConfigField::Text(TextField::DhtPersistenceFilename);
        assert!(field.is_enabled(&config));

        let disabled = BoolField::DhtDisable.toggle(&config);
        assert!(!field.is_enabled(&disabled));
        assert!(ConfigField::Bool(BoolField::DhtDisable).is_enabled(&disabled));
    }

    #[test]
    fn gating_switches_are_not_gated_themselves() {
        for field in ConfigField::ALL {
            if let Some(switch) = field.gated_by() {
                assert_eq!(ConfigField::Bool(switch).gated_by(), None, "{field}");
            }
        }
        assert_eq!(
            ConfigField::Bool(BoolField::UpnpDisable).gated_by(),
            Some(BoolField::TcpListenDisable)
        );
    }

    #[test]
    fn port_values_must_fit_sixteen_bits() {
        let config = DesktopConfig::default();
        let err = NumberField::TcpListenMaxPort
            .set(&config, 70_000)
            .expect_err("port above u16::MAX should be rejected");
        assert!(
            matches!(err, ConfigError::TypeMismatch { path, .. } if path == "tcp_listen.max_port")
        );

        let timeout = NumberField::PeerConnectTimeout
            .set(&config, 70_000)
            .expect("timeouts are 64-bit");
        assert_eq!(timeout.peer_opts.connect_timeout, 70_000);
    }

    #[test]
    fn mismatched_value_kind_is_rejected() {
        let config = DesktopConfig::default();
        let err = ConfigField::Bool(BoolField::UpnpDisable)
            .set(&config, FieldValue::from("yes"))
            .expect_err("text into a boolean leaf");
        assert!(matches!(
            err,
            ConfigError::TypeMismatch {
                expected: FieldKind::Bool,
                ..
            }
        ));
    }

    #[test]
    fn toggle_rejects_non_boolean_leaves() {
        let config = DesktopConfig::default();
        for field in ConfigField::ALL {
            let result = field.toggle(&config);
            assert_eq!(result.is_ok(), field.kind() == FieldKind::Bool, "{field}");
        }
    }

    #[test]
    fn section_fields_cover_the_table() {
        let total: usize = ConfigSection::ALL
            .into_iter()
            .map(|section| section.fields().count())
            .sum();
        assert_eq!(total, ConfigField::ALL.len());
    }

    #[cfg(unix)]
    #[test]
    fn path_leaves_compare_stored_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut left = DesktopConfig::default();
        left.persistence.filename = PathBuf::from(OsStr::from_bytes(b"/tmp/session-\xff.json"));
        let mut right = left.clone();
        right.persistence.filename = PathBuf::from(OsStr::from_bytes(b"/tmp/session-\xfe.json"));

        let field = ConfigField::Text(TextField::PersistenceFilename);
        assert_eq!(field.get(&left), field.get(&right));
        assert!(field.differs(&left, &right));
        assert!(!field.differs(&left, &left));
    }
}
