//! Line-oriented interactive editing session.
//!
//! # Design
//! - The loop is generic over its input and output so it runs against
//!   in-memory buffers in tests.
//! - Mistakes in a command are reported inline and never end the session;
//!   only `submit` success, `quit` or end of input do.

use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;

use anyhow::anyhow;
use peerdesk_config::{ConfigField, FieldOp, parse_input};
use peerdesk_session::{EditingSession, SessionState};

use crate::client::{AppContext, CliError, CliResult, HttpConfigApplier};
use crate::output::{config_lines, diff_lines, field_view_lines};

const PROMPT: &str = "peerdesk> ";
const HELP: &[&str] = &[
    "commands:",
    "  show               print the draft",
    "  fields             list fields with their draft values",
    "  set PATH VALUE     replace a field",
    "  toggle PATH        flip a boolean field",
    "  diff               list changes against the service configuration",
    "  reset              discard all changes",
    "  submit             apply the draft; skipped when nothing changed",
    "  quit               leave without submitting",
];

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditExit {
    Committed,
    Abandoned,
}

pub(crate) async fn handle_config_edit(ctx: &AppContext) -> CliResult<()> {
    let applier = Arc::new(HttpConfigApplier::new(ctx));
    let initial = applier.fetch().await?;
    let mut session = EditingSession::new(initial, applier, |_| {});

    let mut stdout = io::stdout();
    run_editor(&mut session, BufReader::new(io::stdin()), &mut stdout).await?;
    Ok(())
}

/// Drive `session` from `input` until it commits or the user leaves.
pub(crate) async fn run_editor<R: BufRead + Send, W: Write + Send>(
    session: &mut EditingSession,
    input: R,
    output: &mut W,
) -> CliResult<EditExit> {
    say(output, "type 'help' for commands")?;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}").map_err(write_failed)?;
        output.flush().map_err(write_failed)?;

        let Some(line) = lines.next() else {
            return leave(session, output);
        };
        let line = line.map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))?;
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "help" => {
                for line in HELP {
                    say(output, line)?;
                }
            }
            "show" => {
                for line in config_lines(session.draft()) {
                    say(output, &line)?;
                }
            }
            "fields" => {
                for line in field_view_lines(&session.fields()) {
                    say(output, &line)?;
                }
            }
            "set" => {
                let (path, raw) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let result = set_field(session, path, raw.trim());
                report(output, result)?;
            }
            "toggle" => {
                let result = session.toggle_field(rest).map_err(CliError::from);
                report(output, result)?;
            }
            "diff" => {
                let changed = session.changed_fields();
                if changed.is_empty() {
                    say(output, "no changes")?;
                }
                for line in diff_lines(session.initial(), session.draft(), &changed) {
                    say(output, &line)?;
                }
            }
            "reset" => {
                let result = session.reset().map_err(CliError::from);
                report(output, result)?;
            }
            "submit" => {
                if session.changed_fields().is_empty() {
                    say(output, "no changes to submit")?;
                    continue;
                }
                match session.submit().await? {
                    SessionState::Committed => {
                        say(output, "configuration applied")?;
                        return Ok(EditExit::Committed);
                    }
                    SessionState::Editing | SessionState::Submitting => {
                        if let Some(failure) = session.error() {
                            say(output, &format!("error: {failure}"))?;
                        }
                        say(output, "the draft is unchanged; fix it and submit again")?;
                    }
                }
            }
            "quit" | "exit" => return leave(session, output),
            other => say(output, &format!("unknown command '{other}'; type 'help'"))?,
        }
    }
}

fn set_field(session: &mut EditingSession, path: &str, raw: &str) -> CliResult<()> {
    let field = ConfigField::from_path(path)?;
    let value = parse_input(field, raw)?;
    session.apply(field, FieldOp::Set(value))?;
    Ok(())
}

fn leave<W: Write>(session: &EditingSession, output: &mut W) -> CliResult<EditExit> {
    let pending = session.changed_fields().len();
    if pending > 0 {
        say(output, &format!("discarding {pending} unsaved change(s)"))?;
    }
    Ok(EditExit::Abandoned)
}

fn report<W: Write>(output: &mut W, result: CliResult<()>) -> CliResult<()> {
    match result {
        Ok(()) => say(output, "ok"),
        Err(err) => say(output, &format!("error: {}", err.display_message())),
    }
}

fn say<W: Write>(output: &mut W, line: &str) -> CliResult<()> {
    writeln!(output, "{line}").map_err(write_failed)
}

fn write_failed(err: io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}
