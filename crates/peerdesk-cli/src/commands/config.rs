use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::{Context, anyhow};
use peerdesk_config::{ConfigField, DesktopConfig, FieldOp, FieldValue, parse_input};
use peerdesk_session::{EditingSession, SessionState};
use tracing::info;

use crate::cli::{ConfigSetArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult, HttpConfigApplier};
use crate::output::{diff_lines, render_config, render_field_catalog};

pub(crate) async fn handle_config_show(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let config = HttpConfigApplier::new(ctx).fetch().await?;
    render_config(&config, format)
}

pub(crate) fn handle_config_fields(format: OutputFormat) -> CliResult<()> {
    render_field_catalog(format)
}

pub(crate) async fn handle_config_set(
    ctx: &AppContext,
    args: &ConfigSetArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let assignments = args
        .assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<CliResult<Vec<_>>>()?;
    if assignments.is_empty() && args.toggles.is_empty() {
        return Err(CliError::validation(
            "nothing to change: pass PATH=VALUE assignments or --toggle PATH",
        ));
    }

    let applier = Arc::new(HttpConfigApplier::new(ctx));
    let initial = match &args.from {
        Some(path) => load_config_file(path)?,
        None => applier.fetch().await?,
    };

    let (commits, accepted) = mpsc::channel();
    let mut session = EditingSession::new(initial, applier, move |config| {
        // The receiver outlives the session.
        let _ = commits.send(config);
    });
    for (field, value) in assignments {
        session.apply(field, FieldOp::Set(value))?;
    }
    for path in &args.toggles {
        session.toggle_field(path)?;
    }

    let changed = session.changed_fields();
    if args.dry_run {
        if format == OutputFormat::Table {
            println!("Draft with {} change(s), not submitted:", changed.len());
            for line in diff_lines(session.initial(), session.draft(), &changed) {
                println!("{line}");
            }
        }
        return render_config(session.draft(), format);
    }
    if changed.is_empty() {
        println!("No changes to apply.");
        return Ok(());
    }

    match session.submit().await? {
        SessionState::Committed => {
            let applied = accepted.try_recv().map_err(|_| {
                CliError::failure(anyhow!("configuration was accepted but not committed"))
            })?;
            info!(changed = changed.len(), "configuration applied");
            match format {
                OutputFormat::Json => render_config(&applied, format),
                OutputFormat::Table => {
                    println!("Applied {} change(s):", changed.len());
                    for line in diff_lines(session.initial(), &applied, &changed) {
                        println!("{line}");
                    }
                    Ok(())
                }
            }
        }
        SessionState::Editing | SessionState::Submitting => Err(session.error().map_or_else(
            || CliError::failure(anyhow!("configuration was not applied")),
            CliError::from,
        )),
    }
}

fn parse_assignment(raw: &str) -> CliResult<(ConfigField, FieldValue)> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::validation(format!("expected PATH=VALUE, got '{raw}'")))?;
    let field = ConfigField::from_path(path.trim())?;
    let value = parse_input(field, value)?;
    Ok((field, value))
}

fn load_config_file(path: &Path) -> CliResult<DesktopConfig> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;
    serde_json::from_str(&payload).map_err(|err| {
        CliError::failure(anyhow!(
            "{} is not a valid configuration file: {err}",
            path.display()
        ))
    })
}
