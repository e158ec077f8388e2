#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, fail, resolve_output_mode};
use thesisnet_core::config::{CONFIG_FILE, ProjectConfig, load_config};
use thesisnet_core::error::ErrorCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "thesisnet: co-supervision networks from thesis portal records",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and the FORMAT env var).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Config file (defaults to ./thesisnet.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Pipeline",
        about = "Normalize author names",
        long_about = "Flip surname-first authors, strip accents and align authors with supervisor spellings.",
        after_help = "EXAMPLES:\n    # Show what cleaning would change\n    thesisnet clean --input data/thesis.json\n\n    # Persist the cleaned document\n    thesisnet clean --write data/thesis.clean.json"
    )]
    Clean(cmd::clean::CleanArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "List author → supervisor pairs",
        long_about = "List the deduplicated author → supervisor relations after cleaning.",
        after_help = "EXAMPLES:\n    # Tab-separated pairs\n    thesisnet relations --format text\n\n    # Emit machine-readable output\n    thesisnet relations --json"
    )]
    Relations(cmd::relations::RelationsArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Rank people by a centrality metric",
        long_about = "Rank people by degree, betweenness, closeness or in-degree centrality.",
        after_help = "EXAMPLES:\n    # Top 10 brokers in the co-supervision graph\n    thesisnet metric betweenness\n\n    # Most prolific supervisors\n    thesisnet metric in-degree --directed --top 5"
    )]
    Metric(cmd::metric::MetricArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Detect research communities",
        long_about = "Partition the co-supervision graph with the Louvain method.",
        after_help = "EXAMPLES:\n    # Largest three communities\n    thesisnet communities --top 3\n\n    # Every person with their label\n    thesisnet communities --format text"
    )]
    Communities(cmd::communities::CommunitiesArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Show graph statistics",
        long_about = "Show node, edge, density and component statistics for both graphs.",
        after_help = "EXAMPLES:\n    # Summary\n    thesisnet stats\n\n    # Emit machine-readable output\n    thesisnet stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Pipeline",
        about = "Write every metric and graph file",
        long_about = "Run the whole pipeline and write metrics, communities and graph files.",
        after_help = "EXAMPLES:\n    # Use [output].dir from thesisnet.toml\n    thesisnet report\n\n    # Write somewhere else\n    thesisnet report --out-dir /tmp/thesisnet"
    )]
    Report(cmd::report::ReportArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    thesisnet completions bash\n\n    # Generate zsh completions\n    thesisnet completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("THESISNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "thesisnet=debug,info"
        } else {
            "thesisnet=info,warn"
        })
    });

    let format = env::var("THESISNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn load_project_config(cli: &Cli, output: OutputMode) -> anyhow::Result<ProjectConfig> {
    let path = cli.config_path();
    if cli.config.is_some() && !path.exists() {
        return Err(fail(
            output,
            ErrorCode::ConfigParseError,
            format!("config file not found: {}", path.display()),
        ));
    }
    let config = load_config(&path)
        .map_err(|err| fail(output, ErrorCode::ConfigParseError, format!("{err:#}")))?;
    debug!(path = %path.display(), ?config, "config loaded");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let ctx = cmd::Context::new(load_project_config(&cli, output)?, output);

    match &cli.command {
        Commands::Clean(args) => cmd::clean::run_clean(args, &ctx),
        Commands::Relations(args) => cmd::relations::run_relations(args, &ctx),
        Commands::Metric(args) => cmd::metric::run_metric(args, &ctx),
        Commands::Communities(args) => cmd::communities::run_communities(args, &ctx),
        Commands::Stats(args) => cmd::stats::run_stats(args, &ctx),
        Commands::Report(args) => cmd::report::run_report(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}
