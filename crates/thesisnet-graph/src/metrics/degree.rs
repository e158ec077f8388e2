//! Degree and in-degree centrality.
//!
//! Degree centrality is the fraction of other people a person is linked to:
//! `deg(v) / (n - 1)`. On a directed graph the degree is in + out. A
//! self-loop adds two to the degree of its node.
//!
//! In-degree centrality counts incoming edges only. In the author →
//! supervisor graph that is the number of distinct authors supervised.
//!
//! A one-node graph scores 1.0; an empty graph yields an empty map.

use std::collections::HashMap;

use petgraph::EdgeType;
use petgraph::visit::EdgeRef;
use tracing::instrument;

use crate::graph::build::{DirectedGraph, PersonGraph};

/// Degree centrality for every node.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count()))]
pub fn degree_centrality<Ty: EdgeType>(g: &PersonGraph<Ty>) -> HashMap<String, f64> {
    let mut counts = vec![0_usize; g.node_count()];
    for edge in g.graph.edge_references() {
        counts[edge.source().index()] += 1;
        counts[edge.target().index()] += 1;
    }
    scale(g, &counts)
}

/// In-degree centrality of a directed graph.
#[must_use]
pub fn in_degree_centrality(g: &DirectedGraph) -> HashMap<String, f64> {
    in_degree_scores(g)
}

/// In-degree counting over any edge type. Only meaningful when directed;
/// callers outside this module go through [`in_degree_centrality`].
pub(crate) fn in_degree_scores<Ty: EdgeType>(g: &PersonGraph<Ty>) -> HashMap<String, f64> {
    let mut counts = vec![0_usize; g.node_count()];
    for edge in g.graph.edge_references() {
        counts[edge.target().index()] += 1;
    }
    scale(g, &counts)
}

#[allow(clippy::cast_precision_loss)]
fn scale<Ty: EdgeType>(g: &PersonGraph<Ty>, counts: &[usize]) -> HashMap<String, f64> {
    let n = g.node_count();
    let factor = if n > 1 { 1.0 / (n - 1) as f64 } else { 1.0 };

    g.graph
        .node_indices()
        .map(|idx| {
            let score = if n == 1 {
                1.0
            } else {
                counts[idx.index()] as f64 * factor
            };
            (g.graph[idx].clone(), score)
        })
        .collect()
}
