//! sheaf - incremental asset bundler CLI.

mod cli;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use sheaf::{Engine, SheafConfig, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = SheafConfig::load(&cwd, &cli.config)?;

    match &cli.command {
        Commands::Build { bundles, clean } => {
            let engine = Engine::from_config(&config)?;
            cli::build::run(&engine, bundles, *clean)
        }
        Commands::List {
            bundles,
            files,
            json,
        } => {
            let engine = Engine::from_config(&config)?;
            cli::list::run(&engine, bundles, *files, *json)
        }
        Commands::Watch { bundles } => cli::watch::run(&config, bundles),
    }
}
