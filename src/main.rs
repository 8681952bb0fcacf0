//! yamlsite - A static site tool for YAML-style markup templates
//!
//! yamlsite provides:
//! - A markup parser with anchors, aliases and merge keys
//! - An HTML transpiler and serializer
//! - Template checking with per-line diagnostics
//! - Whole-site builds with static assets and a manifest
//! - Unified output format (jsonl/json/md/raw)

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod html;
mod markup;
mod site;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_tracing(cli.quiet, cli.verbose, cli.no_color);

    if let Err(err) = cli::run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over --quiet/--verbose
fn init_tracing(quiet: bool, verbose: bool, no_color: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}
