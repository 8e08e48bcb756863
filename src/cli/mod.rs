//! CLI implementation for tia

mod config;
mod display;

pub(crate) use config::apply_config_defaults;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use tia::{impact_to_json, runnable_command, Analyzer, CachedRevisions, Config, GitRepo};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Grouped, colored listing
    Text,
    /// Full result as pretty-printed JSON
    Json,
    /// Runner command for the impacted test files
    Command,
}

#[derive(Parser)]
#[command(name = "tia")]
#[command(about = "Find the tests impacted by changes between two git revisions")]
#[command(version)]
pub struct Cli {
    /// Base revision [default: main]
    pub base: Option<String>,

    /// Head revision [default: HEAD]
    pub head: Option<String>,

    /// Repository root (defaults to the enclosing git repository)
    #[arg(long, env = "TIA_REPO")]
    pub repo: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Test runner prefix for --format command [default: npx playwright test]
    #[arg(long)]
    pub runner: Option<String>,

    /// Only print impacted records, no header or summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Show debug info (sets RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn repo_root(&self) -> PathBuf {
        match &self.repo {
            Some(path) => path.clone(),
            None => config::find_repo_root(),
        }
    }
}

/// Run the analysis described by fully-defaulted arguments
pub fn run_with(cli: Cli, config: &Config, root: PathBuf) -> Result<()> {
    let base = cli.base.as_deref().unwrap_or(Config::DEFAULT_BASE);
    let head = cli.head.as_deref().unwrap_or(Config::DEFAULT_HEAD);
    let runner = cli.runner.as_deref().unwrap_or(Config::DEFAULT_RUNNER);

    let _span = tracing::info_span!("run", root = %root.display()).entered();

    let classifier = config
        .classifier()
        .context("Invalid config_files pattern in config")?;
    let repo = CachedRevisions::new(GitRepo::new(root));
    let analyzer = Analyzer::new(&repo)
        .with_extractor(config.extractor())
        .with_resolver(config.resolver())
        .with_classifier(classifier);

    let result = analyzer
        .analyze(base, head)
        .with_context(|| format!("Failed to analyze {}..{}", base, head))?;

    match cli.format {
        OutputFormat::Text => display::display_text(&result, cli.quiet),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&impact_to_json(&result))?);
        }
        OutputFormat::Command => {
            if let Some(command) = runnable_command(&result, runner) {
                println!("{}", command);
            }
        }
    }
    Ok(())
}
