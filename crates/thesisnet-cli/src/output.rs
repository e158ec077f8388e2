//! How command results reach the terminal.
//!
//! Handlers build one serializable payload and pass two human renderers
//! to [`render_mode`]. JSON goes straight through serde, so the payload
//! struct is the machine contract.
//!
//! Mode selection, first match wins: `--format`, then `--json`, then the
//! `FORMAT` env var, then pretty on a TTY and text on a pipe.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};
use thesisnet_core::error::ErrorCode;

const SECTION_RULE: usize = 60;

/// Heading plus a dashed rule, for pretty output.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}\n{:-<SECTION_RULE$}", "")
}

/// Aligned `Key:   value` line, for pretty output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    let label = format!("{key}:");
    writeln!(w, "{label:<14} {}", value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Sections and aligned columns.
    Pretty,
    /// Line-oriented output that `grep` and `cut` can handle.
    Text,
    /// Pretty-printed JSON on stdout; errors as JSON on stderr.
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    fn from_env_value(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn pick_mode(flag: Option<OutputMode>, json: bool, env: Option<&str>, tty: bool) -> OutputMode {
    flag.or_else(|| json.then_some(OutputMode::Json))
        .or_else(|| env.and_then(OutputMode::from_env_value))
        .unwrap_or(if tty { OutputMode::Pretty } else { OutputMode::Text })
}

/// Resolve the mode for this process from flags, `FORMAT` and stdout.
pub fn resolve_output_mode(flag: Option<OutputMode>, json: bool) -> OutputMode {
    let env = std::env::var("FORMAT").ok();
    pick_mode(flag, json, env.as_deref(), io::stdout().is_terminal())
}

/// Write `payload` to stdout in `mode`.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    payload: &T,
    text: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, payload)?;
            writeln!(out)?;
        }
        OutputMode::Text => text(payload, &mut out)?,
        OutputMode::Pretty => pretty(payload, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Error payload shown on stderr.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub error_code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code: code.code(),
            message: message.into(),
            suggestion: code.hint(),
        }
    }

    fn write_to(&self, mode: OutputMode, out: &mut dyn Write) -> io::Result<()> {
        if mode.is_json() {
            serde_json::to_writer_pretty(&mut *out, &serde_json::json!({ "error": self }))?;
            return writeln!(out);
        }
        writeln!(out, "error[{}]: {}", self.error_code, self.message)?;
        if let Some(hint) = self.suggestion {
            writeln!(out, "  suggestion: {hint}")?;
        }
        Ok(())
    }
}

/// Print a coded error to stderr and return it for `?` propagation.
///
/// The returned error makes `main` exit non-zero.
pub fn fail(mode: OutputMode, code: ErrorCode, message: impl Into<String>) -> anyhow::Error {
    fail_to(mode, code, message, &mut io::stderr().lock())
}

fn fail_to(
    mode: OutputMode,
    code: ErrorCode,
    message: impl Into<String>,
    out: &mut dyn Write,
) -> anyhow::Error {
    let error = CliError::new(code, message);
    error.write_to(mode, out).ok();
    anyhow::anyhow!("{code}: {}", error.message)
}
