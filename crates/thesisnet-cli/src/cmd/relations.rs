//! `thesisnet relations` — list the deduplicated author → supervisor pairs.

use std::io::Write;

use clap::Args;
use thesisnet_core::relations::RelationSet;

use super::{Context, InputArgs};
use crate::output::{pretty_section, render_mode};

/// Arguments for `thesisnet relations`.
#[derive(Args, Debug, Default)]
pub struct RelationsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute `thesisnet relations`.
pub fn run_relations(args: &RelationsArgs, ctx: &Context) -> anyhow::Result<()> {
    let relations = ctx.load_relations(&args.input)?;
    render_mode(ctx.output, &relations, render_text, render_pretty)
}

fn render_text(relations: &RelationSet, w: &mut dyn Write) -> std::io::Result<()> {
    for r in relations {
        writeln!(w, "{}\t{}", r.author, r.supervisor)?;
    }
    Ok(())
}

fn render_pretty(relations: &RelationSet, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(
        w,
        &format!(
            "{} relations among {} people",
            relations.len(),
            relations.people().len()
        ),
    )?;
    for r in relations {
        writeln!(w, "{:<32} → {}", r.author, r.supervisor)?;
    }
    Ok(())
}
