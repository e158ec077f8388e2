//! `thesisnet stats` — size and shape of both people graphs.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use thesisnet_graph::graph::{GraphStats, build_directed, build_undirected};

use super::{Context, InputArgs};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `thesisnet stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Report payload for `thesisnet stats`.
#[derive(Debug, Serialize)]
pub struct PipelineStats {
    pub theses: usize,
    pub relations: usize,
    pub undirected: GraphStats,
    pub directed: GraphStats,
}

/// Execute `thesisnet stats`.
pub fn run_stats(args: &StatsArgs, ctx: &Context) -> anyhow::Result<()> {
    let (cleaned, _) = ctx.load_cleaned(&args.input)?;
    let relations = thesisnet_core::extract_relations(&cleaned);

    let payload = PipelineStats {
        theses: cleaned.len(),
        relations: relations.len(),
        undirected: GraphStats::from_graph(&build_undirected(&relations)),
        directed: GraphStats::from_graph(&build_directed(&relations)),
    };

    render_mode(ctx.output, &payload, render_text, render_pretty)
}

fn render_text(payload: &PipelineStats, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "theses: {}", payload.theses)?;
    writeln!(w, "relations: {}", payload.relations)?;
    for (prefix, stats) in [("undirected", &payload.undirected), ("directed", &payload.directed)] {
        writeln!(w, "{prefix}.nodes: {}", stats.node_count)?;
        writeln!(w, "{prefix}.edges: {}", stats.edge_count)?;
        writeln!(w, "{prefix}.density: {:?}", stats.density)?;
        writeln!(w, "{prefix}.components: {}", stats.component_count)?;
        writeln!(w, "{prefix}.isolated: {}", stats.isolated_count)?;
        writeln!(w, "{prefix}.self_loops: {}", stats.self_loop_count)?;
        writeln!(w, "{prefix}.hash: {}", stats.content_hash)?;
    }
    Ok(())
}

fn render_pretty(payload: &PipelineStats, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Input")?;
    pretty_kv(w, "Theses", payload.theses.to_string())?;
    pretty_kv(w, "Relations", payload.relations.to_string())?;

    for (heading, stats) in [
        ("Co-supervision graph", &payload.undirected),
        ("Author → supervisor graph", &payload.directed),
    ] {
        writeln!(w)?;
        pretty_section(w, heading)?;
        pretty_kv(w, "Nodes", stats.node_count.to_string())?;
        pretty_kv(w, "Edges", stats.edge_count.to_string())?;
        pretty_kv(w, "Density", format!("{:.4}", stats.density))?;
        pretty_kv(
            w,
            "Components",
            format!("{} (largest {})", stats.component_count, stats.component_sizes.first().copied().unwrap_or(0)),
        )?;
        pretty_kv(w, "Isolated", stats.isolated_count.to_string())?;
        pretty_kv(w, "Self-loops", stats.self_loop_count.to_string())?;
        pretty_kv(w, "Max degree", stats.max_degree.to_string())?;
        pretty_kv(w, "Fingerprint", &stats.content_hash)?;
    }
    Ok(())
}
