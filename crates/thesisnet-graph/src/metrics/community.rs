//! Louvain community detection.
//!
//! # Algorithm
//!
//! Each pass has two phases:
//!
//! 1. **Local moves.** Every node starts in its own community. Nodes are
//!    visited in name order and moved to the neighbouring community with the
//!    largest modularity gain; ties keep the current community. Sweeps repeat
//!    until no node moves.
//! 2. **Aggregation.** Each community becomes one node; internal edges become
//!    a self-loop, inter-community edges are summed.
//!
//! Passes repeat until a local-move phase moves nothing.
//!
//! # Determinism
//!
//! There is no randomness: the visiting order is fixed and neighbour
//! communities are scanned in ascending id order. Labels are renumbered
//! `0..k` by first appearance in name order, so the same graph always yields
//! the same [`Partition`].

use std::collections::{BTreeMap, HashMap};

use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::build::{DirectedGraph, UndirectedGraph};

/// Smallest gain counted as an improvement.
const MIN_GAIN: f64 = 1e-12;

/// A community assignment for every node of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    /// Person name → community label.
    pub labels: BTreeMap<String, usize>,
    modularity: f64,
}

impl Partition {
    /// Modularity on the graph the partition was computed from.
    #[must_use]
    pub const fn modularity(&self) -> f64 {
        self.modularity
    }

    /// Label of `name`, if the person is in the graph.
    #[must_use]
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Number of communities.
    #[must_use]
    pub fn community_count(&self) -> usize {
        self.labels.values().max().map_or(0, |max| max + 1)
    }

    /// Number of labelled people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Members of each community, indexed by label, names sorted.
    #[must_use]
    pub fn groups(&self) -> Vec<Vec<&str>> {
        let mut groups = vec![Vec::new(); self.community_count()];
        for (name, &label) in &self.labels {
            groups[label].push(name.as_str());
        }
        groups
    }

    /// Carry the labels over to a directed graph on the same people.
    ///
    /// People missing from the partition get a fresh label each. The
    /// modularity stays the one measured on the undirected graph.
    #[must_use]
    pub fn project_onto(&self, g: &DirectedGraph) -> Self {
        let mut next = self.community_count();
        let labels = g
            .names()
            .into_iter()
            .map(|name| {
                let label = self.label(name).unwrap_or_else(|| {
                    next += 1;
                    next - 1
                });
                (name.to_string(), label)
            })
            .collect();
        Self {
            labels,
            modularity: self.modularity,
        }
    }
}

// ---------------------------------------------------------------------------
// Weighted working graph
// ---------------------------------------------------------------------------

/// Symmetric weighted adjacency used between aggregation passes.
#[derive(Debug)]
struct Level {
    /// Neighbours (excluding self) with edge weight, ascending by neighbour.
    adj: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight per node.
    loops: Vec<f64>,
}

impl Level {
    fn len(&self) -> usize {
        self.adj.len()
    }

    fn degree(&self, i: usize) -> f64 {
        self.adj[i].iter().map(|(_, w)| w).sum::<f64>() + 2.0 * self.loops[i]
    }

    /// Build from an undirected graph, nodes numbered in name order.
    fn from_graph(g: &UndirectedGraph, order: &HashMap<usize, usize>) -> Self {
        let n = order.len();
        let mut adj: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        let mut loops = vec![0.0; n];

        for edge in g.graph.edge_references() {
            let a = order[&edge.source().index()];
            let b = order[&edge.target().index()];
            if a == b {
                loops[a] += 1.0;
            } else {
                *adj[a].entry(b).or_insert(0.0) += 1.0;
                *adj[b].entry(a).or_insert(0.0) += 1.0;
            }
        }

        Self {
            adj: adj.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops,
        }
    }

    /// Collapse each community into one node.
    fn aggregate(&self, community: &[usize], count: usize) -> Self {
        let mut adj: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut loops = vec![0.0; count];

        for i in 0..self.len() {
            let ci = community[i];
            loops[ci] += self.loops[i];
            for &(j, w) in &self.adj[i] {
                let cj = community[j];
                if ci == cj {
                    // Seen once from each end.
                    loops[ci] += w / 2.0;
                } else {
                    *adj[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }

        Self {
            adj: adj.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops,
        }
    }
}

/// Local-move phase. Returns dense community ids and whether anything moved.
fn local_moves(level: &Level, m2: f64) -> (Vec<usize>, bool) {
    let n = level.len();
    let mut community: Vec<usize> = (0..n).collect();
    let k: Vec<f64> = (0..n).map(|i| level.degree(i)).collect();
    let mut tot = k.clone();
    let mut moved_any = false;

    loop {
        let mut moved = false;

        for i in 0..n {
            let current = community[i];

            let mut links: BTreeMap<usize, f64> = BTreeMap::new();
            for &(j, w) in &level.adj[i] {
                *links.entry(community[j]).or_insert(0.0) += w;
            }

            tot[current] -= k[i];

            let gain = |c: usize, w: f64| w - tot[c] * k[i] / m2;
            let mut best = current;
            let mut best_gain = gain(current, links.get(&current).copied().unwrap_or(0.0));

            for (&c, &w) in &links {
                let g = gain(c, w);
                if g > best_gain + MIN_GAIN {
                    best = c;
                    best_gain = g;
                }
            }

            tot[best] += k[i];
            if best != current {
                community[i] = best;
                moved = true;
                moved_any = true;
            }
        }

        if !moved {
            break;
        }
    }

    (renumber(&community), moved_any)
}

/// Relabel ids `0..k` by first appearance.
fn renumber(ids: &[usize]) -> Vec<usize> {
    let mut seen: HashMap<usize, usize> = HashMap::new();
    ids.iter()
        .map(|id| {
            let next = seen.len();
            *seen.entry(*id).or_insert(next)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Partition `g` into communities with the Louvain method.
///
/// A graph without edges puts every person in their own community.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
pub fn communities(g: &UndirectedGraph) -> Partition {
    let names = g.names();
    let order: HashMap<usize, usize> = names
        .iter()
        .enumerate()
        .filter_map(|(pos, name)| g.node_index(name).map(|idx| (idx.index(), pos)))
        .collect();

    let mut level = Level::from_graph(g, &order);
    let m2: f64 = (0..level.len()).map(|i| level.degree(i)).sum();

    // Original node (name order) → node of the current level.
    let mut membership: Vec<usize> = (0..names.len()).collect();

    if m2 > 0.0 {
        let mut passes = 0_usize;
        loop {
            let (community, moved) = local_moves(&level, m2);
            if !moved {
                break;
            }
            passes += 1;
            let count = community.iter().max().map_or(0, |max| max + 1);
            for node in &mut membership {
                *node = community[*node];
            }
            level = level.aggregate(&community, count);
        }
        debug!(passes, "louvain converged");
    }

    let membership = renumber(&membership);
    let labels: BTreeMap<String, usize> = names
        .iter()
        .zip(membership)
        .map(|(name, label)| ((*name).to_string(), label))
        .collect();

    let mut partition = Partition {
        labels,
        modularity: 0.0,
    };
    partition.modularity = modularity(g, &partition);
    partition
}

/// Newman modularity of `partition` on `g`.
///
/// Returns 0.0 for a graph without edges. People missing from the partition are
/// treated as singletons.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn modularity(g: &UndirectedGraph, partition: &Partition) -> f64 {
    if g.edge_count() == 0 {
        return 0.0;
    }
    let m = g.edge_count() as f64;

    let label_of = |idx: petgraph::graph::NodeIndex| -> Option<usize> {
        g.name(idx).and_then(|name| partition.label(name))
    };

    let mut internal: HashMap<usize, f64> = HashMap::new();
    let mut degree: HashMap<usize, f64> = HashMap::new();

    for edge in g.graph.edge_references() {
        let (a, b) = (label_of(edge.source()), label_of(edge.target()));
        if let Some(la) = a {
            *degree.entry(la).or_insert(0.0) += 1.0;
        }
        if let Some(lb) = b {
            *degree.entry(lb).or_insert(0.0) += 1.0;
        }
        if let (Some(la), Some(lb)) = (a, b) {
            if la == lb {
                *internal.entry(la).or_insert(0.0) += 1.0;
            }
        }
    }

    // Unlabelled endpoints are singletons: no internal edges, but their
    // degree still contributes to the expected term.
    let mut singleton_degree = vec![0.0; g.node_count()];
    for edge in g.graph.edge_references() {
        if label_of(edge.source()).is_none() {
            singleton_degree[edge.source().index()] += 1.0;
        }
        if label_of(edge.target()).is_none() {
            singleton_degree[edge.target().index()] += 1.0;
        }
    }

    let observed: f64 = internal.values().sum::<f64>() / m;
    let expected: f64 = degree
        .values()
        .chain(singleton_degree.iter())
        .map(|d| (d / (2.0 * m)).powi(2))
        .sum();

    observed - expected
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
