//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build and render the DrugCheck architecture diagram
#[derive(Parser, Debug)]
#[command(name = "drugcheck-arch")]
#[command(about = "Build and render the DrugCheck architecture diagram")]
#[command(version)]
pub struct Args {
    /// Config file path (defaults to ./drugcheck-arch.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Without a subcommand the diagram is rendered with the configured defaults
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the diagram with the layout engine
    Render {
        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format (png, svg, pdf, dot)
        #[arg(long)]
        format: Option<String>,

        /// Output resolution
        #[arg(long)]
        dpi: Option<u32>,

        /// Layout algorithm (dot, neato, fdp, sfdp, twopi, circo)
        #[arg(long)]
        layout: Option<String>,

        /// Keep the intermediate DOT source
        #[arg(long)]
        keep_source: bool,
    },

    /// Print the DOT description
    Dot {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify graph integrity and print per-tier counts
    Check,

    /// Print the graph model as JSON
    Describe,

    /// Show version information
    Version,
}
