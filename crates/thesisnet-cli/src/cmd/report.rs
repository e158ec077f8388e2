//! `thesisnet report` — run the full pipeline and write every output file.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use thesisnet_graph::export::{Manifest, ReportPlan, ReportWriter};
use thesisnet_graph::graph::{build_directed, build_undirected};
use tracing::instrument;

use super::{Context, InputArgs};
use crate::output::{fail, pretty_kv, pretty_section, render_mode};

/// Arguments for `thesisnet report`.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output root (defaults to `[output].dir` in thesisnet.toml).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    out_dir: PathBuf,
    ambiguous_authors: usize,
    #[serde(flatten)]
    manifest: Manifest,
}

/// Execute `thesisnet report`.
#[instrument(skip_all)]
pub fn run_report(args: &ReportArgs, ctx: &Context) -> anyhow::Result<()> {
    // Validate the configured metric lists before any work or file output.
    let plan = ReportPlan::from_names(&ctx.config.metrics.undirected, &ctx.config.metrics.directed)
        .map_err(|err| fail(ctx.output, err.code(), err.to_string()))?;

    let (cleaned, clean_report) = ctx.load_cleaned(&args.input)?;
    let relations = thesisnet_core::extract_relations(&cleaned);
    let ug = build_undirected(&relations);
    let dg = build_directed(&relations);

    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| ctx.config.output.dir.clone());

    let manifest = ReportWriter::new(&out_dir)
        .write(&ug, &dg, &plan)
        .map_err(|err| fail(ctx.output, err.code(), err.to_string()))?;

    let payload = ReportOutput {
        out_dir,
        ambiguous_authors: clean_report.ambiguous.len(),
        manifest,
    };

    render_mode(ctx.output, &payload, render_text, render_pretty)
}

fn render_text(payload: &ReportOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for file in &payload.manifest.files {
        writeln!(w, "{}", payload.out_dir.join(file).display())?;
    }
    Ok(())
}

fn render_pretty(payload: &ReportOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let m = &payload.manifest;
    pretty_section(w, "Report")?;
    pretty_kv(w, "Output", payload.out_dir.display().to_string())?;
    pretty_kv(w, "People", m.undirected.node_count.to_string())?;
    pretty_kv(w, "Edges", format!("{} undirected, {} directed", m.undirected.edge_count, m.directed.edge_count))?;
    pretty_kv(w, "Communities", format!("{} (Q = {:.4})", m.community_count, m.modularity))?;
    pretty_kv(w, "Ambiguous", payload.ambiguous_authors.to_string())?;
    pretty_kv(w, "Files", m.files.len().to_string())?;
    for file in &m.files {
        writeln!(w, "  {file}")?;
    }
    Ok(())
}
