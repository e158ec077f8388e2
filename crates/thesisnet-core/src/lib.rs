#![forbid(unsafe_code)]
//! thesisnet-core library.
//!
//! Thesis records, person-name normalization, author cleaning and
//! author → supervisor relation extraction.
//!
//! ```text
//! source / store ─→ ThesisCollection
//!        ↓  clean::Cleaner::clean()
//! ThesisCollection (authors canonical)
//!        ↓  relations::extract_relations()
//! RelationSet ─→ thesisnet-graph
//! ```
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per module; `anyhow::Result` for config glue.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod clean;
pub mod config;
pub mod error;
pub mod model;
pub mod names;
pub mod relations;
pub mod source;
pub mod store;

pub use clean::{AmbiguityPolicy, CleanError, CleanReport, Cleaner};
pub use model::{ThesisCollection, ThesisRecord};
pub use names::{MatchRule, unify};
pub use relations::{Relation, RelationSet, extract_relations};
