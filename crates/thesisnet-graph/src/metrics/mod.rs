//! Centrality metrics and community detection for people graphs.
//!
//! # Overview
//!
//! Each metric answers a different question about a person's place in the
//! supervision network:
//!
//! - **Degree** (`degree`): how many people are they directly linked to?
//! - **Betweenness** (`betweenness`): how often do they sit on the shortest
//!   path between two other people?
//! - **Closeness** (`closeness`): how near are they to everyone who can
//!   reach them?
//! - **In-degree** (`degree::in_degree_centrality`): on the directed graph,
//!   how many authors did they supervise? Directed graphs only.
//! - **Communities** (`community`): Louvain modularity partition of the
//!   undirected graph.
//!
//! # Dispatch
//!
//! [`MetricKind`] is the closed set of centralities. Text names (CLI
//! arguments, config entries) go through [`MetricKind::from_str`], which is
//! the only place an unsupported name can appear.
//!
//! # Ranking
//!
//! [`centrality`] returns scores sorted descending, ties broken by name
//! ascending, so output files are reproducible.
//!
//! ```rust,ignore
//! use thesisnet_graph::metrics::{centrality, MetricKind};
//!
//! let ranked = centrality(&graph, "betweenness".parse()?)?;
//! for entry in ranked.iter().take(10) {
//!     println!("{}: {}", entry.name, entry.score);
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use petgraph::EdgeType;
use serde::{Serialize, Serializer};
use thesisnet_core::error::ErrorCode;
use tracing::instrument;

use crate::graph::build::PersonGraph;

pub mod betweenness;
pub mod closeness;
pub mod community;
pub mod degree;

pub use community::{Partition, communities, modularity};

/// The centralities the engine knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKind {
    Degree,
    Betweenness,
    Closeness,
    InDegree,
}

impl MetricKind {
    pub const ALL: [Self; 4] = [Self::Degree, Self::Betweenness, Self::Closeness, Self::InDegree];

    /// Canonical name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::InDegree => "in-degree",
        }
    }

    /// Whether the metric is only defined on directed graphs.
    #[must_use]
    pub const fn directed_only(self) -> bool {
        matches!(self, Self::InDegree)
    }

    /// Output file name for this metric on the given graph flavour.
    #[must_use]
    pub const fn file_name(self, directed: bool) -> &'static str {
        match (self, directed) {
            (Self::Degree, false) => "degree_centrality.txt",
            (Self::Degree, true) => "degree_centrality_digraph.txt",
            (Self::Betweenness, false) => "betweenness_centrality.txt",
            (Self::Betweenness, true) => "betweenness_centrality_digraph.txt",
            (Self::Closeness, false) => "closeness_centrality.txt",
            (Self::Closeness, true) => "closeness_centrality_digraph.txt",
            (Self::InDegree, _) => "in_degree_centrality.txt",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "betweenness" => Ok(Self::Betweenness),
            "closeness" => Ok(Self::Closeness),
            "in-degree" | "in_degree" | "indegree" => Ok(Self::InDegree),
            _ => Err(MetricError::UnsupportedMetric(s.to_string())),
        }
    }
}

impl Serialize for MetricKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Errors from the metrics engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    #[error("unsupported metric: {0}")]
    UnsupportedMetric(String),
    #[error("metric '{0}' is only defined on directed graphs")]
    DirectedOnly(MetricKind),
}

impl MetricError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedMetric(_) => ErrorCode::UnsupportedMetric,
            Self::DirectedOnly(_) => ErrorCode::DirectedOnlyMetric,
        }
    }
}

/// One person's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScore {
    pub name: String,
    pub score: f64,
}

/// Sort scores descending, ties by name ascending.
#[must_use]
pub fn rank(scores: HashMap<String, f64>) -> Vec<RankedScore> {
    let mut ranked: Vec<RankedScore> = scores
        .into_iter()
        .map(|(name, score)| RankedScore { name, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
    ranked
}

/// Compute `kind` on `g` and rank the result.
///
/// # Errors
///
/// Returns [`MetricError::DirectedOnly`] when an in-degree ranking is asked
/// of an undirected graph.
#[instrument(skip(g), fields(nodes = g.node_count(), directed = g.is_directed()))]
pub fn centrality<Ty: EdgeType>(
    g: &PersonGraph<Ty>,
    kind: MetricKind,
) -> Result<Vec<RankedScore>, MetricError> {
    if kind.directed_only() && !g.is_directed() {
        return Err(MetricError::DirectedOnly(kind));
    }

    let scores = match kind {
        MetricKind::Degree => degree::degree_centrality(g),
        MetricKind::Betweenness => betweenness::betweenness_centrality(g),
        MetricKind::Closeness => closeness::closeness_centrality(g),
        MetricKind::InDegree => degree::in_degree_scores(g),
    };

    Ok(rank(scores))
}

/// Parse `name` and compute it on `g`.
///
/// # Errors
///
/// Returns [`MetricError::UnsupportedMetric`] for unknown names and
/// [`MetricError::DirectedOnly`] as described in [`centrality`].
pub fn centrality_by_name<Ty: EdgeType>(
    g: &PersonGraph<Ty>,
    name: &str,
) -> Result<Vec<RankedScore>, MetricError> {
    centrality(g, name.parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::{DirectedGraph, UndirectedGraph};

    #[test]
    fn parses_known_names() {
        assert_eq!("degree".parse::<MetricKind>(), Ok(MetricKind::Degree));
        assert_eq!("Betweenness".parse::<MetricKind>(), Ok(MetricKind::Betweenness));
        assert_eq!("in_degree".parse::<MetricKind>(), Ok(MetricKind::InDegree));
        assert_eq!("in-degree".parse::<MetricKind>(), Ok(MetricKind::InDegree));
    }

    #[test]
    fn unknown_name_is_unsupported() {
        let err = "pagerank".parse::<MetricKind>().unwrap_err();
        assert_eq!(err, MetricError::UnsupportedMetric("pagerank".to_string()));
        assert_eq!(err.code(), ErrorCode::UnsupportedMetric);
        assert!(err.to_string().contains("pagerank"));
    }

    #[test]
    fn centrality_by_name_fails_instead_of_returning_empty() {
        let g = UndirectedGraph::from_edges([("A", "B")]);
        assert!(centrality_by_name(&g, "pagerank").is_err());
    }

    #[test]
    fn in_degree_on_undirected_is_rejected() {
        let g = UndirectedGraph::from_edges([("A", "B")]);
        assert_eq!(
            centrality(&g, MetricKind::InDegree),
            Err(MetricError::DirectedOnly(MetricKind::InDegree))
        );
    }

    #[test]
    fn in_degree_on_directed_is_ranked() {
        let g = DirectedGraph::from_edges([("A", "S"), ("B", "S"), ("C", "T")]);
        let ranked = centrality(&g, MetricKind::InDegree).unwrap();
        assert_eq!(ranked[0].name, "S");
        assert!((ranked[0].score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ties_break_by_name() {
        let scores: HashMap<String, f64> = [("b", 1.0), ("a", 1.0), ("c", 2.0)]
            .into_iter()
            .map(|(n, s)| (n.to_string(), s))
            .collect();
        let names: Vec<String> = rank(scores).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn file_names_follow_output_layout() {
        assert_eq!(MetricKind::Degree.file_name(false), "degree_centrality.txt");
        assert_eq!(
            MetricKind::Closeness.file_name(true),
            "closeness_centrality_digraph.txt"
        );
        assert_eq!(MetricKind::InDegree.file_name(true), "in_degree_centrality.txt");
    }

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>(), Ok(kind));
        }
    }
}
