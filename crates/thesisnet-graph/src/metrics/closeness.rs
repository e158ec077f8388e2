//! Closeness centrality.
//!
//! Closeness of `u` is the inverse mean distance from the people who can
//! reach `u`. On a directed graph distances run along incoming edges, so a
//! supervisor's closeness reflects how near their authors are.
//!
//! Graphs with several components use the Wasserman–Faust scaling:
//!
//! ```text
//! C(u) = (r - 1) / sum(d(v, u)) * (r - 1) / (n - 1)
//! ```
//!
//! where `r` is the number of nodes that reach `u` (including `u`). A node
//! nobody reaches scores 0.

use std::collections::{HashMap, VecDeque};

use petgraph::{Direction, EdgeType};
use tracing::instrument;

use crate::graph::build::PersonGraph;

/// Closeness for every node.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn closeness_centrality<Ty: EdgeType>(g: &PersonGraph<Ty>) -> HashMap<String, f64> {
    let graph = &g.graph;
    let n = graph.node_count();
    let mut result = HashMap::with_capacity(n);
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    for u in graph.node_indices() {
        dist.fill(None);
        dist[u.index()] = Some(0);
        queue.push_back(u);

        let mut total = 0_usize;
        let mut reached = 1_usize;

        while let Some(v) = queue.pop_front() {
            let dv = dist[v.index()].unwrap_or(0);
            // Incoming on directed graphs; every neighbour otherwise.
            for w in graph.neighbors_directed(v, Direction::Incoming) {
                if dist[w.index()].is_none() {
                    dist[w.index()] = Some(dv + 1);
                    total += dv + 1;
                    reached += 1;
                    queue.push_back(w);
                }
            }
        }

        let score = if total > 0 && n > 1 {
            let r = (reached - 1) as f64;
            (r / total as f64) * (r / (n - 1) as f64)
        } else {
            0.0
        };
        result.insert(graph[u].clone(), score);
    }

    result
}
