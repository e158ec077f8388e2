//! `thesisnet metric` — rank people by one centrality.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use thesisnet_graph::export::write_ranking;
use thesisnet_graph::graph::{build_directed, build_undirected};
use thesisnet_graph::metrics::{MetricKind, RankedScore, centrality};
use tracing::instrument;

use super::{Context, InputArgs, take_top};
use crate::output::{fail, pretty_section, render_mode};

/// Arguments for `thesisnet metric`.
#[derive(Args, Debug)]
pub struct MetricArgs {
    /// Metric name: degree, betweenness, closeness or in-degree.
    pub name: String,

    #[command(flatten)]
    pub input: InputArgs,

    /// Rank on the author → supervisor graph instead of the undirected one.
    #[arg(long)]
    pub directed: bool,

    /// Number of people to show (0 = everyone).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Debug, Serialize)]
struct MetricOutput {
    metric: MetricKind,
    directed: bool,
    total: usize,
    scores: Vec<RankedScore>,
}

/// Execute `thesisnet metric`.
#[instrument(skip_all, fields(metric = %args.name, directed = args.directed))]
pub fn run_metric(args: &MetricArgs, ctx: &Context) -> anyhow::Result<()> {
    // Reject unknown names before touching the input.
    let kind: MetricKind = args
        .name
        .parse()
        .map_err(|err: thesisnet_graph::MetricError| fail(ctx.output, err.code(), err.to_string()))?;

    let relations = ctx.load_relations(&args.input)?;
    let ranked = if args.directed {
        centrality(&build_directed(&relations), kind)
    } else {
        centrality(&build_undirected(&relations), kind)
    }
    .map_err(|err| fail(ctx.output, err.code(), err.to_string()))?;

    let top = ctx.top(args.top);
    let payload = MetricOutput {
        metric: kind,
        directed: args.directed,
        total: ranked.len(),
        scores: take_top(&ranked, top).to_vec(),
    };

    render_mode(ctx.output, &payload, render_text, render_pretty)
}

fn render_text(payload: &MetricOutput, w: &mut dyn Write) -> std::io::Result<()> {
    write_ranking(w, &payload.scores)
}

fn render_pretty(payload: &MetricOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let flavour = if payload.directed { "directed" } else { "undirected" };
    pretty_section(
        w,
        &format!(
            "{} centrality ({flavour}, top {} of {})",
            payload.metric,
            payload.scores.len(),
            payload.total
        ),
    )?;
    for (rank, entry) in payload.scores.iter().enumerate() {
        writeln!(w, "{:>3}. {:<36} {:.6}", rank + 1, entry.name, entry.score)?;
    }
    Ok(())
}
