//! `thesisnet clean` — normalize author names against the supervisor set.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use thesisnet_core::clean::CleanReport;
use thesisnet_core::store;

use super::{Context, InputArgs};
use crate::output::{fail, pretty_kv, pretty_section, render_mode};

/// Arguments for `thesisnet clean`.
#[derive(Args, Debug, Default)]
pub struct CleanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Persist the cleaned document to this path.
    #[arg(long, value_name = "PATH")]
    pub write: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CleanOutput {
    #[serde(flatten)]
    report: CleanReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<PathBuf>,
}

/// Execute `thesisnet clean`.
pub fn run_clean(args: &CleanArgs, ctx: &Context) -> anyhow::Result<()> {
    let (cleaned, report) = ctx.load_cleaned(&args.input)?;

    if let Some(path) = &args.write {
        store::save_collection(path, &cleaned)
            .map_err(|err| fail(ctx.output, err.code(), err.to_string()))?;
    }

    let payload = CleanOutput {
        report,
        written: args.write.clone(),
    };

    render_mode(ctx.output, &payload, render_text, render_pretty)
}

fn render_text(payload: &CleanOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let r = &payload.report;
    writeln!(w, "records: {}", r.records)?;
    writeln!(w, "supervisors: {}", r.supervisors)?;
    writeln!(w, "reordered: {}", r.reordered)?;
    writeln!(w, "unified: {}", r.unified)?;
    writeln!(w, "ambiguous: {}", r.ambiguous.join(" "))?;
    if let Some(path) = &payload.written {
        writeln!(w, "written: {}", path.display())?;
    }
    Ok(())
}

fn render_pretty(payload: &CleanOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let r = &payload.report;
    pretty_section(w, "Author cleaning")?;
    pretty_kv(w, "Records", r.records.to_string())?;
    pretty_kv(w, "Supervisors", r.supervisors.to_string())?;
    pretty_kv(w, "Reordered", r.reordered.to_string())?;
    pretty_kv(w, "Unified", r.unified.to_string())?;
    if r.ambiguous.is_empty() {
        pretty_kv(w, "Ambiguous", "none")?;
    } else {
        pretty_kv(w, "Ambiguous", r.ambiguous.join(", "))?;
    }
    if let Some(path) = &payload.written {
        pretty_kv(w, "Written", path.display().to_string())?;
    }
    Ok(())
}
