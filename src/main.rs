use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter};

mod cli;

/// `-v` wins over RUST_LOG; `-q` only lowers the fallback
fn log_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        let fallback = if quiet { "error" } else { "warn" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }
}

fn main() -> Result<()> {
    let mut cli = cli::Cli::parse();

    // Log to stderr to keep stdout clean for JSON and command output.
    // Installed before config loading so config warnings are visible.
    let (filter, filter_handle) = reload::Layer::new(log_filter(cli.verbose, cli.quiet));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let root = cli.repo_root();
    let config = tia::Config::load(&root);
    let (verbose, quiet) = (cli.verbose, cli.quiet);
    cli::apply_config_defaults(&mut cli, &config);

    // Config may switch on -v / -q
    if (cli.verbose, cli.quiet) != (verbose, quiet) {
        if let Err(e) = filter_handle.reload(log_filter(cli.verbose, cli.quiet)) {
            tracing::warn!(error = %e, "Failed to apply config log level");
        }
    }

    cli::run_with(cli, &config, root)
}
