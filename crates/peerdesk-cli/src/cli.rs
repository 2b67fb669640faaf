//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use peerdesk_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliResult, parse_url};
use crate::commands::config::{handle_config_fields, handle_config_set, handle_config_show};
use crate::commands::edit::handle_config_edit;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:3030";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        build_sha: option_env!("PEERDESK_BUILD_SHA").unwrap_or("dev"),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let result = dispatch(cli, &trace_id).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = AppContext::new(cli.api_url, cli.api_key, cli.timeout, trace_id)?;

    match cli.command {
        Command::Config(config) => match config {
            ConfigCommand::Show => handle_config_show(&ctx, cli.output).await,
            ConfigCommand::Fields => handle_config_fields(cli.output),
            ConfigCommand::Set(args) => handle_config_set(&ctx, &args, cli.output).await,
            ConfigCommand::Edit => handle_config_edit(&ctx).await,
        },
    }
}

#[derive(Parser)]
#[command(
    name = "peerdesk",
    about = "Inspect and edit the desktop configuration of a torrent service"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "PEERDESK_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(long, global = true, env = "PEERDESK_API_KEY")]
    api_key: Option<String>,
    #[arg(
        long,
        global = true,
        env = "PEERDESK_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "PEERDESK_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log level or filter directive; RUST_LOG takes precedence"
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "PEERDESK_LOG_FORMAT",
        value_parser = parse_log_format,
        help = "Log output format (json or pretty)"
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the configuration the service is running with.
    Show,
    /// List every editable field with its kind, label and gating switch.
    Fields,
    /// Edit fields non-interactively and submit the result.
    ///
    /// Nothing is sent when the edits leave the configuration unchanged.
    Set(ConfigSetArgs),
    /// Start an interactive editing session.
    Edit,
}

#[derive(Args)]
pub(crate) struct ConfigSetArgs {
    #[arg(value_name = "PATH=VALUE", help = "Field assignments, applied in order")]
    pub(crate) assignments: Vec<String>,
    #[arg(long = "toggle", value_name = "PATH", help = "Boolean fields to flip")]
    pub(crate) toggles: Vec<String>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Start from a JSON configuration file instead of the service"
    )]
    pub(crate) from: Option<PathBuf>,
    #[arg(long, help = "Print the resulting draft without submitting it")]
    pub(crate) dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse::<LogFormat>().map_err(|err| err.to_string())
}
