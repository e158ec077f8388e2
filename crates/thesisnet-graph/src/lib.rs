#![forbid(unsafe_code)]
//! thesisnet-graph library.
//!
//! People graphs built from author → supervisor relations, centrality
//! metrics, Louvain communities and report output.
//!
//! ```text
//! RelationSet (thesisnet-core)
//!        ↓  graph::build_undirected() / graph::build_directed()
//! UndirectedGraph / DirectedGraph
//!        ↓  metrics::centrality() / metrics::communities()
//! Vec<RankedScore> / Partition
//!        ↓  export::ReportWriter
//! outputs/{static,interactive}/…
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums carrying an [`ErrorCode`](thesisnet_core::error::ErrorCode).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod export;
pub mod graph;
pub mod metrics;

pub use export::{ExportError, Manifest, NodeLinkGraph, ReportPlan, ReportWriter, write_report};
pub use graph::{DirectedGraph, GraphStats, UndirectedGraph, build_directed, build_undirected};
pub use metrics::{MetricError, MetricKind, Partition, RankedScore, centrality, communities};
