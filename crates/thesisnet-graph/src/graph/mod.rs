//! People graph module.
//!
//! # Overview
//!
//! Builds petgraph graphs from the deduplicated relation set. Both flavours
//! are rebuilt from scratch every run; nothing is persisted.
//!
//! ## Pipeline
//!
//! ```text
//! RelationSet
//!        ↓  build::build_undirected() / build::build_directed()
//! UndirectedGraph / DirectedGraph (PersonGraph<Ty>)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, component count, self-loops, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use thesisnet_core::extract_relations;
//! use thesisnet_graph::graph::{build_undirected, GraphStats};
//!
//! let relations = extract_relations(&cleaned);
//! let graph = build_undirected(&relations);
//! let stats = GraphStats::from_graph(&graph);
//!
//! println!("nodes={} edges={} density={:.3}",
//!     stats.node_count, stats.edge_count, stats.density);
//! ```

pub mod build;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{DirectedGraph, PersonGraph, UndirectedGraph, build_directed, build_undirected};
pub use stats::GraphStats;
