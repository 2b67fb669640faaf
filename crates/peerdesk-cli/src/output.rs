//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use peerdesk_config::{BoolField, ConfigField, ConfigSection, DesktopConfig};
use peerdesk_session::FieldView;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const PATH_WIDTH: usize = 28;

pub(crate) fn render_config(config: &DesktopConfig, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(config)?),
        OutputFormat::Table => {
            for line in config_lines(config) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_field_catalog(format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<CatalogRow> =
                ConfigField::ALL.into_iter().map(CatalogRow::from).collect();
            println!("{}", to_json(&rows)?);
        }
        OutputFormat::Table => {
            for line in catalog_lines() {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Draft values grouped under their section titles.
///
/// Adjacent sections sharing a tab title are printed under one header.
pub(crate) fn config_lines(config: &DesktopConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let mut title = None;
    for section in ConfigSection::ALL {
        if title != Some(section.title()) {
            title = Some(section.title());
            lines.push(format!("[{}]", section.title()));
        }
        for field in section.fields() {
            lines.push(format!(
                "  {:<PATH_WIDTH$} {}",
                field.path(),
                field.get(config)
            ));
        }
    }
    lines
}

pub(crate) fn catalog_lines() -> Vec<String> {
    let mut lines = vec![format!(
        "{:<PATH_WIDTH$} {:<8} {:<20} LABEL",
        "PATH", "KIND", "GATED BY"
    )];
    for field in ConfigField::ALL {
        lines.push(format!(
            "{:<PATH_WIDTH$} {:<8} {:<20} {}",
            field.path(),
            field.kind().as_str(),
            field.gated_by().map_or("-", BoolField::path),
            field.label()
        ));
    }
    lines
}

/// Presentation rows as the edit prompt shows them; disabled rows are marked.
pub(crate) fn field_view_lines(views: &[FieldView]) -> Vec<String> {
    views
        .iter()
        .map(|view| {
            let marker = if view.enabled { ' ' } else { '-' };
            format!(
                "{marker} {:<PATH_WIDTH$} {:<36} {}",
                view.field.path(),
                view.field.label(),
                view.value
            )
        })
        .collect()
}

/// One line per changed leaf: `path: before -> after`.
pub(crate) fn diff_lines(
    before: &DesktopConfig,
    after: &DesktopConfig,
    changed: &[ConfigField],
) -> Vec<String> {
    changed
        .iter()
        .map(|field| {
            format!(
                "  {}: {} -> {}",
                field.path(),
                field.get(before),
                field.get(after)
            )
        })
        .collect()
}

#[derive(Serialize)]
struct CatalogRow {
    path: &'static str,
    kind: &'static str,
    section: &'static str,
    label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    gated_by: Option<&'static str>,
}

impl From<ConfigField> for CatalogRow {
    fn from(field: ConfigField) -> Self {
        Self {
            path: field.path(),
            kind: field.kind().as_str(),
            section: field.section().title(),
            label: field.label(),
            gated_by: field.gated_by().map(BoolField::path),
        }
    }
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}
