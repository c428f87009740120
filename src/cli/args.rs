//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Incremental asset bundler
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = sheaf::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build bundles whose inputs changed (all bundles by default)
    #[command(visible_alias = "b")]
    Build {
        /// Bundle names
        #[arg(value_name = "BUNDLE")]
        bundles: Vec<String>,

        /// Remove existing artifacts first, forcing a full rebuild
        #[arg(short, long)]
        clean: bool,
    },

    /// Show what templates should reference for each bundle
    #[command(visible_alias = "l")]
    List {
        /// Bundle names
        #[arg(value_name = "BUNDLE")]
        bundles: Vec<String>,

        /// List constituent files regardless of `build.emit`
        #[arg(short, long)]
        files: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Build, then rebuild on every change under the source root
    #[command(visible_alias = "w")]
    Watch {
        /// Bundle names
        #[arg(value_name = "BUNDLE")]
        bundles: Vec<String>,
    },
}
