//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness measures how often a person lies on shortest paths between
//! two other people. High-betweenness people bridge otherwise separate
//! groups of co-supervisors.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs:
//!
//! 1. For each source `s`, BFS to get shortest-path counts and distances.
//! 2. Accumulate dependencies in reverse BFS order.
//! 3. Sum dependencies across all sources.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! Scores are divided by `(n - 1)(n - 2)` when `n > 2`. Undirected graphs
//! visit every pair from both ends, so the same factor yields the usual
//! `2 / ((n - 1)(n - 2))` normalization there. Graphs with two nodes or
//! fewer are left unscaled (every score is zero anyway).

use std::collections::{HashMap, VecDeque};

use petgraph::EdgeType;
use petgraph::graph::NodeIndex;
use tracing::instrument;

use crate::graph::build::PersonGraph;

/// Normalized betweenness for every node.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality<Ty: EdgeType>(g: &PersonGraph<Ty>) -> HashMap<String, f64> {
    let graph = &g.graph;
    let n = graph.node_count();

    if n == 0 {
        return HashMap::new();
    }

    let mut cb: Vec<f64> = vec![0.0; n];

    for s in graph.node_indices() {
        let si = s.index();

        // Nodes in discovery order; popped farthest first.
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);

            // Outgoing when directed, all neighbours when undirected.
            for w in graph.neighbors(v) {
                let wi = w.index();

                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = w.index();

            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        1.0
    };

    graph
        .node_indices()
        .map(|idx| (graph[idx].clone(), cb[idx.index()] * scale))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::{DirectedGraph, UndirectedGraph};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn empty_graph_returns_empty() {
        let g = UndirectedGraph::from_edges(std::iter::empty());
        assert!(betweenness_centrality(&g).is_empty());
    }

    #[test]
    fn single_edge_is_zero() {
        let g = UndirectedGraph::from_edges([("A", "B")]);
        let bc = betweenness_centrality(&g);
        assert!(close(bc["A"], 0.0));
        assert!(close(bc["B"], 0.0));
    }

    #[test]
    fn undirected_path_middle_is_one() {
        // A - B - C: B is on the only A..C path, normalized to 1.0.
        let g = UndirectedGraph::from_edges([("A", "B"), ("B", "C")]);
        let bc = betweenness_centrality(&g);
        assert!(close(bc["A"], 0.0));
        assert!(close(bc["B"], 1.0), "got {}", bc["B"]);
        assert!(close(bc["C"], 0.0));
    }

    #[test]
    fn directed_path_middle_is_half() {
        // A → B → C: only A→C passes through B; 1 / ((3-1)(3-2)).
        let g = DirectedGraph::from_edges([("A", "B"), ("B", "C")]);
        let bc = betweenness_centrality(&g);
        assert!(close(bc["B"], 0.5), "got {}", bc["B"]);
    }

    #[test]
    fn star_center_bridges_every_pair() {
        let g = UndirectedGraph::from_edges([("A", "S"), ("B", "S"), ("C", "S"), ("D", "S")]);
        let bc = betweenness_centrality(&g);
        assert!(close(bc["S"], 1.0));
        for leaf in ["A", "B", "C", "D"] {
            assert!(close(bc[leaf], 0.0), "{leaf} = {}", bc[leaf]);
        }
    }

    #[test]
    fn directed_star_into_sink_is_zero() {
        // Every author points at one supervisor; no path passes through anyone.
        let g = DirectedGraph::from_edges([("A", "S"), ("B", "S"), ("C", "S")]);
        for score in betweenness_centrality(&g).values() {
            assert!(close(*score, 0.0));
        }
    }

    #[test]
    fn diamond_splits_between_parallel_paths() {
        // A - B - D and A - C - D: B and C each carry half of A..D.
        let g = UndirectedGraph::from_edges([("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let bc = betweenness_centrality(&g);
        assert!(close(bc["B"], bc["C"]));
        // raw(B) = 0.5 for A..D, counted from both ends, scaled by 1/6.
        assert!(close(bc["B"], 1.0 / 6.0), "got {}", bc["B"]);
    }

    #[test]
    fn disconnected_pairs_are_zero() {
        let g = UndirectedGraph::from_edges([("A", "B"), ("C", "D")]);
        for score in betweenness_centrality(&g).values() {
            assert!(close(*score, 0.0));
        }
    }
}
