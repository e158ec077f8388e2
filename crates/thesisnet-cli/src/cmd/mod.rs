//! Subcommand handlers and the plumbing they share.

pub mod clean;
pub mod communities;
pub mod completions;
pub mod metric;
pub mod relations;
pub mod report;
pub mod stats;

use std::path::PathBuf;

use clap::Args;
use thesisnet_core::clean::CleanReport;
use thesisnet_core::config::ProjectConfig;
use thesisnet_core::model::ThesisCollection;
use thesisnet_core::relations::{RelationSet, extract_relations};
use thesisnet_core::source::{JsonFileSource, ThesisSource};
use tracing::{debug, info};

use crate::output::{OutputMode, fail};

/// Input selection shared by every pipeline subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Thesis JSON document (defaults to `[input].path` in thesisnet.toml).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

/// Resolved configuration and output mode for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: ProjectConfig,
    pub output: OutputMode,
}

impl Context {
    pub const fn new(config: ProjectConfig, output: OutputMode) -> Self {
        Self { config, output }
    }

    /// `--input` if given, the configured path otherwise.
    pub fn input_path(&self, args: &InputArgs) -> PathBuf {
        args.input
            .clone()
            .unwrap_or_else(|| self.config.input.path.clone())
    }

    /// Load the thesis document as stored.
    pub fn load_raw(&self, args: &InputArgs) -> anyhow::Result<ThesisCollection> {
        let path = self.input_path(args);
        debug!(path = %path.display(), "loading thesis document");
        JsonFileSource::new(path)
            .load()
            .map_err(|err| fail(self.output, err.code(), err.to_string()))
    }

    /// Load and clean with the configured match rule and ambiguity policy.
    pub fn load_cleaned(&self, args: &InputArgs) -> anyhow::Result<(ThesisCollection, CleanReport)> {
        let raw = self.load_raw(args)?;
        let cleaner = self.config.names.cleaner();
        let (cleaned, report) = cleaner
            .clean_with_report(raw)
            .map_err(|err| fail(self.output, err.code(), err.to_string()))?;
        info!(
            records = report.records,
            unified = report.unified,
            ambiguous = report.ambiguous.len(),
            "collection cleaned"
        );
        Ok((cleaned, report))
    }

    /// Load, clean and extract the relation set.
    pub fn load_relations(&self, args: &InputArgs) -> anyhow::Result<RelationSet> {
        let (cleaned, _) = self.load_cleaned(args)?;
        Ok(extract_relations(&cleaned))
    }

    /// `--top` if given, the configured default otherwise. Zero means all.
    pub fn top(&self, flag: Option<usize>) -> usize {
        flag.unwrap_or(self.config.output.top)
    }
}

/// The first `top` items, or all of them when `top` is zero.
pub fn take_top<T>(items: &[T], top: usize) -> &[T] {
    if top == 0 || top >= items.len() {
        items
    } else {
        &items[..top]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_flag_overrides_config() {
        let ctx = Context::new(ProjectConfig::default(), OutputMode::Text);
        let args = InputArgs {
            input: Some(PathBuf::from("other.json")),
        };
        assert_eq!(ctx.input_path(&args), PathBuf::from("other.json"));
        assert_eq!(
            ctx.input_path(&InputArgs::default()),
            PathBuf::from("data/thesis.json")
        );
    }

    #[test]
    fn load_raw_reads_the_input_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("theses.json");
        std::fs::write(
            &path,
            r#"{"2023": {"2023-1": {"title": "T", "author": "Bo Li", "directors": ["Ana Ruiz"]}}}"#,
        )
        .unwrap();

        let ctx = Context::new(ProjectConfig::default(), OutputMode::Json);
        let loaded = ctx.load_raw(&InputArgs { input: Some(path) }).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.get("2023", "2023-1").map(|r| r.author.as_str()),
            Some("Bo Li")
        );
    }

    #[test]
    fn load_raw_reports_missing_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let ctx = Context::new(ProjectConfig::default(), OutputMode::Json);
        let err = ctx
            .load_raw(&InputArgs {
                input: Some(dir.path().join("absent.json")),
            })
            .unwrap_err();
        assert!(err.to_string().starts_with("E1001"), "{err}");
    }

    #[test]
    fn take_top_zero_means_all() {
        let items = [1, 2, 3];
        assert_eq!(take_top(&items, 0), &[1, 2, 3]);
        assert_eq!(take_top(&items, 2), &[1, 2]);
        assert_eq!(take_top(&items, 9), &[1, 2, 3]);
    }

    #[test]
    fn top_defaults_to_config() {
        let ctx = Context::new(ProjectConfig::default(), OutputMode::Text);
        assert_eq!(ctx.top(None), 10);
        assert_eq!(ctx.top(Some(3)), 3);
    }
}
