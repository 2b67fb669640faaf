use anyhow::Result;
use peerdesk_config::{
    BoolField, ConfigError, ConfigField, ConfigSection, DesktopConfig, FieldOp, FieldValue,
    NumberField, TextField, parse_input, resolve,
};
use peerdesk_test_support::assert::assert_only_changed;
use peerdesk_test_support::fixtures::{disabled_config, sample_config};

#[test]
fn nested_set_changes_only_the_addressed_leaf() -> Result<()> {
    let mut before = sample_config();
    before.tcp_listen.min_port = 6000;
    let after = resolve(
        &before,
        "tcp_listen.min_port",
        FieldOp::Set(FieldValue::Integer(6881)),
    )?;
    assert!(!after.tcp_listen.disable);
    assert_eq!(after.tcp_listen.min_port, 6881);
    assert_eq!(after.tcp_listen.max_port, 6999);
    assert_only_changed(
        &before,
        &after,
        &[ConfigField::Number(NumberField::TcpListenMinPort)],
    );

    let before = sample_config();
    let after = resolve(&before, "peer_opts.connect_timeout", FieldOp::Set(5_u64.into()))?;
    assert_only_changed(
        &before,
        &after,
        &[ConfigField::Number(NumberField::PeerConnectTimeout)],
    );
    Ok(())
}

#[test]
fn root_set_changes_only_the_root_leaf() -> Result<()> {
    let before = sample_config();
    let after = resolve(
        &before,
        "default_download_location",
        FieldOp::Set("/home/user/Torrents".into()),
    )?;
    assert_eq!(
        after.default_download_location.to_str(),
        Some("/home/user/Torrents")
    );
    assert_only_changed(
        &before,
        &after,
        &[ConfigField::Text(TextField::DefaultDownloadLocation)],
    );
    Ok(())
}

#[test]
fn toggling_dht_twice_restores_the_snapshot() -> Result<()> {
    let before = sample_config();
    let once = resolve(&before, "dht.disable", FieldOp::Toggle)?;
    assert!(once.dht.disable);
    assert_only_changed(&before, &once, &[ConfigField::Bool(BoolField::DhtDisable)]);

    let twice = resolve(&once, "dht.disable", FieldOp::Toggle)?;
    assert_eq!(twice, before);
    Ok(())
}

#[test]
fn every_leaf_resolves_from_its_own_path() -> Result<()> {
    for field in ConfigField::ALL {
        assert_eq!(ConfigField::from_path(field.path())?, field);
        assert_eq!(field.path().parse::<ConfigField>()?, field);
    }
    let sectioned: usize = ConfigSection::ALL
        .into_iter()
        .map(|section| section.fields().count())
        .sum();
    assert_eq!(sectioned, ConfigField::ALL.len());
    Ok(())
}

#[test]
fn malformed_paths_are_rejected_before_lookup() {
    let config = sample_config();
    for path in ["a.b.c", "", ".disable", "dht.", "dht..disable"] {
        assert_eq!(
            resolve(&config, path, FieldOp::Toggle),
            Err(ConfigError::InvalidPath {
                path: path.to_string(),
            }),
            "{path:?}"
        );
    }
    assert_eq!(
        resolve(&config, "dht.enabled", FieldOp::Toggle),
        Err(ConfigError::UnknownField {
            path: "dht.enabled".to_string(),
        })
    );
}

#[test]
fn view_input_flows_through_the_resolver() -> Result<()> {
    let before = sample_config();
    let field = ConfigField::from_path("tcp_listen.max_port")?;
    let value = parse_input(field, " 7100 ")?;
    let after = resolve(&before, field.path(), FieldOp::Set(value))?;
    assert_eq!(after.tcp_listen.max_port, 7100);

    let too_wide = parse_input(field, "70000")?;
    assert!(matches!(
        resolve(&before, field.path(), FieldOp::Set(too_wide)),
        Err(ConfigError::TypeMismatch { .. })
    ));
    assert!(matches!(
        parse_input(field, "lots"),
        Err(ConfigError::InvalidInput { .. })
    ));
    Ok(())
}

#[test]
fn gating_follows_the_draft_but_does_not_block_edits() -> Result<()> {
    let config = disabled_config();
    let listen = ConfigField::Text(TextField::HttpApiListenAddr);
    assert!(!listen.is_enabled(&config));
    assert!(ConfigField::Bool(BoolField::HttpApiDisable).is_enabled(&config));

    let after = resolve(&config, listen.path(), FieldOp::Set("0.0.0.0:9000".into()))?;
    assert_eq!(after.http_api.listen_addr, "0.0.0.0:9000");
    assert!(listen.is_enabled(&sample_config()));
    Ok(())
}

#[test]
fn snapshot_json_uses_section_keys_and_fills_missing_sections() -> Result<()> {
    let json = serde_json::to_value(sample_config())?;
    for section in ConfigSection::ALL {
        if let Some(key) = section.key() {
            assert!(json.get(key).is_some(), "{key} missing");
        }
    }
    assert_eq!(json["tcp_listen"]["max_port"], 6999);

    let partial: DesktopConfig = serde_json::from_value(serde_json::json!({
        "default_download_location": "/data",
        "tcp_listen": { "min_port": 7000 }
    }))?;
    let defaults = DesktopConfig::default();
    assert_eq!(partial.tcp_listen.min_port, 7000);
    assert_eq!(partial.tcp_listen.max_port, defaults.tcp_listen.max_port);
    assert_eq!(partial.http_api, defaults.http_api);
    Ok(())
}
