//! Summary statistics for a people graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: after deduplication.
//! - **density**: `2E / (n(n-1))` undirected, `E / (n(n-1))` directed.
//!   Zero for graphs with fewer than two nodes.
//! - **component_sizes**: weakly connected components, largest first.
//! - **isolated_count**: people without any edge. Always zero for graphs
//!   built from relations; kept for hand-built graphs.
//! - **self_loop_count**: people recorded as their own supervisor.
//! - **max_degree**: highest number of incident edge endpoints.

use petgraph::EdgeType;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::graph::build::PersonGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for one graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub directed: bool,
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    /// Component sizes, sorted descending.
    pub component_sizes: Vec<usize>,
    pub isolated_count: usize,
    pub self_loop_count: usize,
    pub max_degree: usize,
    pub content_hash: String,
}

impl GraphStats {
    /// Compute statistics for `g`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_graph<Ty: EdgeType>(g: &PersonGraph<Ty>) -> Self {
        let n = g.node_count();
        let e = g.edge_count();

        let density = if n < 2 {
            0.0
        } else {
            let pairs = (n * (n - 1)) as f64;
            let factor = if g.is_directed() { 1.0 } else { 2.0 };
            factor * e as f64 / pairs
        };

        let component_sizes = component_sizes(g);
        let self_loop_count = g
            .graph
            .edge_references()
            .filter(|edge| edge.source() == edge.target())
            .count();

        let mut degree = vec![0usize; n];
        for edge in g.graph.edge_references() {
            degree[edge.source().index()] += 1;
            degree[edge.target().index()] += 1;
        }

        Self {
            directed: g.is_directed(),
            node_count: n,
            edge_count: e,
            density,
            component_count: component_sizes.len(),
            component_sizes,
            isolated_count: degree.iter().filter(|&&d| d == 0).count(),
            self_loop_count,
            max_degree: degree.into_iter().max().unwrap_or(0),
            content_hash: g.content_hash.clone(),
        }
    }
}

/// Weakly connected component sizes, largest first.
fn component_sizes<Ty: EdgeType>(g: &PersonGraph<Ty>) -> Vec<usize> {
    let n = g.node_count();
    let mut sets = UnionFind::<usize>::new(n);
    for edge in g.graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut counts = vec![0usize; n];
    for root in sets.into_labeling() {
        counts[root] += 1;
    }

    let mut sizes: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
