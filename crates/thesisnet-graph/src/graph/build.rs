//! Graph construction from a [`RelationSet`].
//!
//! # Overview
//!
//! Each relation `author → supervisor` becomes one edge. The node set is
//! the union of both sides; there are no isolated nodes and no weights.
//!
//! ## Edge Direction
//!
//! In a [`DirectedGraph`] an edge `A → B` means "A wrote a thesis
//! supervised by B", so in-degree counts supervised theses' authors.
//! [`UndirectedGraph`] keeps the same pairs without orientation.
//!
//! ## Multiplicity
//!
//! Repeated pairs collapse into a single edge. In the undirected graph
//! `(A, B)` and `(B, A)` are the same edge too. The relation is "has ever
//! supervised", not "supervised N times".
//!
//! ## Fingerprint
//!
//! [`PersonGraph::content_hash`] is a BLAKE3 hash of the sorted edge list,
//! recorded in run manifests so two runs can be compared cheaply.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, EdgeType, Undirected};
use thesisnet_core::relations::RelationSet;
use tracing::instrument;

// ---------------------------------------------------------------------------
// PersonGraph
// ---------------------------------------------------------------------------

/// A people graph: nodes are canonical names, edges are supervision links.
#[derive(Debug, Clone)]
pub struct PersonGraph<Ty: EdgeType> {
    /// petgraph storage: node weight = person name.
    pub graph: Graph<String, (), Ty>,
    /// Mapping from name to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the edge set.
    pub content_hash: String,
}

/// Co-supervision graph without orientation.
pub type UndirectedGraph = PersonGraph<Undirected>;

/// Author → supervisor graph.
pub type DirectedGraph = PersonGraph<Directed>;

impl<Ty: EdgeType> PersonGraph<Ty> {
    /// Build from `(source, target)` name pairs.
    ///
    /// Nodes are added in first-seen order, so sorted input yields a
    /// reproducible node numbering.
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = Graph::<String, (), Ty>::default();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut edge_list: Vec<(&str, &str)> = Vec::new();

        for (source, target) in edges {
            let a = intern(&mut graph, &mut node_map, source);
            let b = intern(&mut graph, &mut node_map, target);

            // petgraph allows parallel edges; the relation is a set.
            if graph.find_edge(a, b).is_none() {
                graph.add_edge(a, b, ());
                edge_list.push((source, target));
            }
        }

        let content_hash = compute_edge_hash(Ty::is_directed(), &mut edge_list);

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Whether edges are oriented.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a name.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Return the name label for a node.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// `true` if there is an edge `a → b` (either way when undirected).
    #[must_use]
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    /// All names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.graph.node_weights().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Build the undirected co-supervision graph.
#[must_use]
#[instrument(skip(relations), fields(relations = relations.len()))]
pub fn build_undirected(relations: &RelationSet) -> UndirectedGraph {
    PersonGraph::from_edges(
        relations
            .iter()
            .map(|r| (r.author.as_str(), r.supervisor.as_str())),
    )
}

/// Build the author → supervisor graph.
#[must_use]
#[instrument(skip(relations), fields(relations = relations.len()))]
pub fn build_directed(relations: &RelationSet) -> DirectedGraph {
    PersonGraph::from_edges(
        relations
            .iter()
            .map(|r| (r.author.as_str(), r.supervisor.as_str())),
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn intern<Ty: EdgeType>(
    graph: &mut Graph<String, (), Ty>,
    node_map: &mut HashMap<String, NodeIndex>,
    name: &str,
) -> NodeIndex {
    if let Some(&idx) = node_map.get(name) {
        return idx;
    }
    let idx = graph.add_node(name.to_string());
    node_map.insert(name.to_string(), idx);
    idx
}

/// BLAKE3 over the sorted edge list; undirected pairs are ordered first.
fn compute_edge_hash<'a>(directed: bool, edges: &mut [(&'a str, &'a str)]) -> String {
    if !directed {
        for edge in edges.iter_mut() {
            if edge.1 < edge.0 {
                *edge = (edge.1, edge.0);
            }
        }
    }
    edges.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    let flavour: &[u8] = if directed { b"directed" } else { b"undirected" };
    hasher.update(flavour);
    hasher.update(b"\x00");
    for (a, b) in edges.iter() {
        hasher.update(a.as_bytes());
        hasher.update(b"\x00");
        hasher.update(b.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
