//! Writing metric results and graphs to disk.
//!
//! # Layout
//!
//! [`ReportWriter`] produces:
//!
//! ```text
//! <root>/
//!   manifest.json
//!   static/                     undirected graph
//!     metrics/degree_centrality.txt
//!     metrics/betweenness_centrality.txt
//!     metrics/closeness_centrality.txt
//!     communities.txt
//!     graph.json  graph.dot
//!   interactive/                directed graph
//!     metrics/degree_centrality_digraph.txt
//!     metrics/betweenness_centrality_digraph.txt
//!     metrics/closeness_centrality_digraph.txt
//!     metrics/in_degree_centrality.txt
//!     communities.txt
//!     graph.json  graph.dot
//! ```
//!
//! Metric files hold one `"{name}: {value}"` line per person in ranking
//! order. Values use the shortest representation that reads back to the
//! same float, always with a decimal point (`1.0`, `0.5`).

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use petgraph::EdgeType;
use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use thesisnet_core::error::ErrorCode;
use tracing::{debug, info, instrument};

use crate::graph::build::{DirectedGraph, PersonGraph, UndirectedGraph};
use crate::graph::stats::GraphStats;
use crate::metrics::degree::degree_centrality;
use crate::metrics::{MetricError, MetricKind, Partition, RankedScore, centrality, communities};

/// Node size multiplier expected by the interactive renderer.
pub const NODE_SIZE_SCALE: f64 = 800.0;

const STATIC_DIR: &str = "static";
const INTERACTIVE_DIR: &str = "interactive";
const METRICS_DIR: &str = "metrics";
const COMMUNITIES_FILE: &str = "communities.txt";
const GRAPH_JSON_FILE: &str = "graph.json";
const GRAPH_DOT_FILE: &str = "graph.dot";
const MANIFEST_FILE: &str = "manifest.json";

/// Errors while producing report files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Metric(#[from] MetricError),
}

impl ExportError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Write { .. } | Self::Serialize { .. } => ErrorCode::OutputWriteFailed,
            Self::Metric(err) => err.code(),
        }
    }
}

// ---------------------------------------------------------------------------
// Line formats
// ---------------------------------------------------------------------------

/// Write `"{name}: {score}"` lines in ranking order.
///
/// # Errors
///
/// Propagates I/O errors from `w`.
pub fn write_ranking<W: Write + ?Sized>(w: &mut W, ranking: &[RankedScore]) -> io::Result<()> {
    for entry in ranking {
        writeln!(w, "{}: {:?}", entry.name, entry.score)?;
    }
    Ok(())
}

/// Write `"{name}: {label}"` lines sorted by name.
///
/// # Errors
///
/// Propagates I/O errors from `w`.
pub fn write_partition<W: Write + ?Sized>(w: &mut W, partition: &Partition) -> io::Result<()> {
    for (name, label) in &partition.labels {
        writeln!(w, "{name}: {label}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Graph documents
// ---------------------------------------------------------------------------

/// Node-link document consumed by the interactive renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLinkGraph {
    pub directed: bool,
    pub nodes: Vec<NodeLinkNode>,
    pub links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLinkNode {
    pub id: String,
    /// Degree centrality scaled by [`NODE_SIZE_SCALE`].
    pub size: f64,
    /// Community label; `None` if the person was not partitioned.
    pub group: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLinkEdge {
    pub source: String,
    pub target: String,
}

impl NodeLinkGraph {
    /// Nodes sorted by name, links sorted by `(source, target)`.
    #[must_use]
    pub fn from_graph<Ty: EdgeType>(g: &PersonGraph<Ty>, groups: &BTreeMap<String, usize>) -> Self {
        let degree = degree_centrality(g);

        let nodes = g
            .names()
            .into_iter()
            .map(|name| NodeLinkNode {
                id: name.to_string(),
                size: degree.get(name).copied().unwrap_or(0.0) * NODE_SIZE_SCALE,
                group: groups.get(name).copied(),
            })
            .collect();

        let mut links: Vec<NodeLinkEdge> = g
            .graph
            .edge_references()
            .map(|edge| NodeLinkEdge {
                source: g.graph[edge.source()].clone(),
                target: g.graph[edge.target()].clone(),
            })
            .collect();
        links.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));

        Self {
            directed: g.is_directed(),
            nodes,
            links,
        }
    }
}

/// Graphviz rendering of `g`, nodes labelled by name.
#[must_use]
pub fn to_dot<Ty: EdgeType>(g: &PersonGraph<Ty>) -> String {
    let labelled = g.graph.map(|_, name| name.as_str(), |_, _| "");
    format!("{}", Dot::with_config(&labelled, &[Config::EdgeNoLabel]))
}

// ---------------------------------------------------------------------------
// Full report
// ---------------------------------------------------------------------------

/// Which metrics to write for each graph flavour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub undirected: Vec<MetricKind>,
    pub directed: Vec<MetricKind>,
}

impl Default for ReportPlan {
    fn default() -> Self {
        Self {
            undirected: vec![
                MetricKind::Degree,
                MetricKind::Betweenness,
                MetricKind::Closeness,
            ],
            directed: MetricKind::ALL.to_vec(),
        }
    }
}

impl ReportPlan {
    /// Parse metric names, rejecting unknown ones and directed-only metrics
    /// in the undirected list. Nothing is written if this fails.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError`] for the first offending name.
    pub fn from_names<S: AsRef<str>>(undirected: &[S], directed: &[S]) -> Result<Self, MetricError> {
        let undirected = parse_all(undirected)?;
        if let Some(kind) = undirected.iter().find(|k| k.directed_only()) {
            return Err(MetricError::DirectedOnly(*kind));
        }
        Ok(Self {
            undirected,
            directed: parse_all(directed)?,
        })
    }
}

fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<MetricKind>, MetricError> {
    let mut kinds: Vec<MetricKind> = Vec::with_capacity(names.len());
    for name in names {
        let kind: MetricKind = name.as_ref().parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

/// Summary of one report run, written as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub version: String,
    pub undirected: GraphStats,
    pub directed: GraphStats,
    pub community_count: usize,
    pub modularity: f64,
    /// Paths relative to the report root, in write order.
    pub files: Vec<String>,
}

/// Writes the full set of report files under one root directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    root: PathBuf,
    files: Vec<String>,
}

impl ReportWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute every planned metric and the partition, then write them.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Metric`] for a plan that asks for a
    /// directed-only metric on the undirected graph, or a write error.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn write(
        mut self,
        ug: &UndirectedGraph,
        dg: &DirectedGraph,
        plan: &ReportPlan,
    ) -> Result<Manifest, ExportError> {
        let partition = communities(ug);
        let projected = partition.project_onto(dg);

        self.write_flavour(STATIC_DIR, ug, &plan.undirected, &partition)?;
        self.write_flavour(INTERACTIVE_DIR, dg, &plan.directed, &projected)?;

        let manifest = Manifest {
            version: env!("CARGO_PKG_VERSION").to_string(),
            undirected: GraphStats::from_graph(ug),
            directed: GraphStats::from_graph(dg),
            community_count: partition.community_count(),
            modularity: partition.modularity(),
            files: self.files.clone(),
        };

        let json = serde_json::to_string_pretty(&manifest).map_err(|source| {
            ExportError::Serialize {
                what: "manifest",
                source,
            }
        })?;
        self.write_file(MANIFEST_FILE, json.as_bytes())?;

        info!(
            files = self.files.len() + 1,
            communities = manifest.community_count,
            "report written"
        );
        Ok(Manifest {
            files: self.files,
            ..manifest
        })
    }

    fn write_flavour<Ty: EdgeType>(
        &mut self,
        dir: &str,
        g: &PersonGraph<Ty>,
        metrics: &[MetricKind],
        partition: &Partition,
    ) -> Result<(), ExportError> {
        for &kind in metrics {
            let ranking = centrality(g, kind)?;
            let mut buf = Vec::new();
            write_ranking(&mut buf, &ranking).map_err(|source| self.write_error(dir, source))?;
            let rel = format!("{dir}/{METRICS_DIR}/{}", kind.file_name(g.is_directed()));
            self.write_file(&rel, &buf)?;
        }

        let mut buf = Vec::new();
        write_partition(&mut buf, partition).map_err(|source| self.write_error(dir, source))?;
        self.write_file(&format!("{dir}/{COMMUNITIES_FILE}"), &buf)?;

        let doc = NodeLinkGraph::from_graph(g, &partition.labels);
        let json = serde_json::to_string_pretty(&doc).map_err(|source| ExportError::Serialize {
            what: "node-link graph",
            source,
        })?;
        self.write_file(&format!("{dir}/{GRAPH_JSON_FILE}"), json.as_bytes())?;
        self.write_file(&format!("{dir}/{GRAPH_DOT_FILE}"), to_dot(g).as_bytes())?;
        Ok(())
    }

    fn write_file(&mut self, rel: &str, contents: &[u8]) -> Result<(), ExportError> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, contents).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = contents.len(), "wrote");
        self.files.push(rel.to_string());
        Ok(())
    }

    fn write_error(&self, dir: &str, source: io::Error) -> ExportError {
        ExportError::Write {
            path: self.root.join(dir),
            source,
        }
    }
}

/// Convenience wrapper around [`ReportWriter`].
///
/// # Errors
///
/// See [`ReportWriter::write`].
pub fn write_report(
    root: &Path,
    ug: &UndirectedGraph,
    dg: &DirectedGraph,
    plan: &ReportPlan,
) -> Result<Manifest, ExportError> {
    ReportWriter::new(root).write(ug, dg, plan)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ranking(pairs: &[(&str, f64)]) -> Vec<RankedScore> {
        pairs
            .iter()
            .map(|(name, score)| RankedScore {
                name: (*name).to_string(),
                score: *score,
            })
            .collect()
    }

    #[test]
    fn ranking_lines_keep_decimal_point() {
        let mut buf = Vec::new();
        write_ranking(&mut buf, &ranking(&[("Jane Doe", 1.0), ("John Smith", 0.5)])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Jane Doe: 1.0\nJohn Smith: 0.5\n");
    }

    #[test]
    fn ranking_uses_shortest_round_trip_form() {
        let mut buf = Vec::new();
        write_ranking(&mut buf, &ranking(&[("A", 1.0 / 3.0)])).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "A: 0.3333333333333333\n");
    }

    #[test]
    fn partition_lines_sorted_by_name() {
        let g = UndirectedGraph::from_edges([("D", "C"), ("B", "A")]);
        let mut buf = Vec::new();
        write_partition(&mut buf, &communities(&g)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "A: 0\nB: 0\nC: 1\nD: 1\n");
    }

    #[test]
    fn node_link_scales_size_and_sorts() {
        let g = UndirectedGraph::from_edges([("S", "B"), ("S", "A")]);
        let groups: BTreeMap<String, usize> = [("A".to_string(), 0)].into_iter().collect();
        let doc = NodeLinkGraph::from_graph(&g, &groups);

        assert!(!doc.directed);
        let ids: Vec<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "S"]);
        assert!((doc.nodes[2].size - 800.0).abs() < 1e-9);
        assert!((doc.nodes[0].size - 400.0).abs() < 1e-9);
        assert_eq!(doc.nodes[0].group, Some(0));
        assert_eq!(doc.nodes[1].group, None);
        assert_eq!(doc.links.len(), 2);
        assert_eq!(doc.links[0].source, "S");
    }

    #[test]
    fn dot_output_names_people() {
        let g = DirectedGraph::from_edges([("John Smith", "Jane Doe")]);
        let dot = to_dot(&g);
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("John Smith"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn plan_rejects_unknown_metric() {
        let err = ReportPlan::from_names(&["degree", "pagerank"], &["degree"]).unwrap_err();
        assert_eq!(err, MetricError::UnsupportedMetric("pagerank".to_string()));
    }

    #[test]
    fn plan_rejects_in_degree_on_undirected() {
        let err = ReportPlan::from_names(&["in-degree"], &[]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DirectedOnlyMetric);
    }

    #[test]
    fn plan_deduplicates_aliases() {
        let plan = ReportPlan::from_names(&["degree"], &["in_degree", "in-degree"]).unwrap();
        assert_eq!(plan.directed, vec![MetricKind::InDegree]);
    }

    #[test]
    fn report_writes_expected_layout() {
        let dir = TempDir::new().unwrap();
        let ug = UndirectedGraph::from_edges([("John Smith", "Jane Doe")]);
        let dg = DirectedGraph::from_edges([("John Smith", "Jane Doe")]);

        let manifest = write_report(dir.path(), &ug, &dg, &ReportPlan::default()).unwrap();

        for rel in [
            "static/metrics/degree_centrality.txt",
            "static/metrics/betweenness_centrality.txt",
            "static/metrics/closeness_centrality.txt",
            "static/communities.txt",
            "static/graph.json",
            "static/graph.dot",
            "interactive/metrics/degree_centrality_digraph.txt",
            "interactive/metrics/betweenness_centrality_digraph.txt",
            "interactive/metrics/closeness_centrality_digraph.txt",
            "interactive/metrics/in_degree_centrality.txt",
            "interactive/communities.txt",
            "interactive/graph.json",
            "interactive/graph.dot",
            "manifest.json",
        ] {
            assert!(dir.path().join(rel).is_file(), "missing {rel}");
            assert!(manifest.files.iter().any(|f| f == rel), "{rel} not in manifest");
        }

        let degree =
            fs::read_to_string(dir.path().join("static/metrics/degree_centrality.txt")).unwrap();
        assert_eq!(degree, "Jane Doe: 1.0\nJohn Smith: 1.0\n");

        let in_degree =
            fs::read_to_string(dir.path().join("interactive/metrics/in_degree_centrality.txt"))
                .unwrap();
        assert_eq!(in_degree, "Jane Doe: 1.0\nJohn Smith: 0.0\n");

        assert_eq!(manifest.community_count, 1);
        assert_eq!(manifest.undirected.node_count, 2);
    }
}
