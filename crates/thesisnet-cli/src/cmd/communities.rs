//! `thesisnet communities` — Louvain partition of the co-supervision graph.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use thesisnet_graph::export::write_partition;
use thesisnet_graph::graph::build_undirected;
use thesisnet_graph::metrics::{Partition, communities};

use super::{Context, InputArgs, take_top};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `thesisnet communities`.
#[derive(Args, Debug, Default)]
pub struct CommunitiesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of communities to list, largest first (0 = all).
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct Community {
    label: usize,
    size: usize,
    members: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CommunitiesOutput {
    community_count: usize,
    modularity: f64,
    communities: Vec<Community>,
    #[serde(skip)]
    partition: Partition,
}

/// Execute `thesisnet communities`.
pub fn run_communities(args: &CommunitiesArgs, ctx: &Context) -> anyhow::Result<()> {
    let relations = ctx.load_relations(&args.input)?;
    let partition = communities(&build_undirected(&relations));

    let mut listed: Vec<Community> = partition
        .groups()
        .into_iter()
        .enumerate()
        .map(|(label, members)| Community {
            label,
            size: members.len(),
            members: members.into_iter().map(str::to_string).collect(),
        })
        .collect();
    // Largest first; equal sizes keep label order.
    listed.sort_by(|a, b| b.size.cmp(&a.size).then(a.label.cmp(&b.label)));
    let top = ctx.top(args.top);

    let payload = CommunitiesOutput {
        community_count: partition.community_count(),
        modularity: partition.modularity(),
        communities: take_top(&listed, top).to_vec(),
        partition,
    };

    render_mode(ctx.output, &payload, render_text, render_pretty)
}

fn render_text(payload: &CommunitiesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    write_partition(w, &payload.partition)
}

fn render_pretty(payload: &CommunitiesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Communities")?;
    pretty_kv(w, "Count", payload.community_count.to_string())?;
    pretty_kv(w, "Modularity", format!("{:.4}", payload.modularity))?;
    for community in &payload.communities {
        writeln!(w)?;
        writeln!(w, "#{} ({} people)", community.label, community.size)?;
        for member in &community.members {
            writeln!(w, "  {member}")?;
        }
    }
    Ok(())
}
