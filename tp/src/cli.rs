//! CLI argument parsing for templatepromoter

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tp")]
#[command(
    author,
    version = env!("GIT_DESCRIBE"),
    about = "Promote versioned templates and publish them as build artifacts",
    long_about = None
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Template and version selection shared by the promoting subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateArgs {
    /// Template file (default: promotion.source from config)
    pub source: Option<PathBuf>,

    /// Project version substituted for <<version>>
    #[arg(short = 'p', long)]
    pub project_version: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy the template into the output directory with the version substituted
    Promote {
        #[command(flatten)]
        template: TemplateArgs,

        /// Output directory (default: reference)
        #[arg(short, long)]
        into: Option<PathBuf>,
    },

    /// Print the rendered template without writing it
    Render {
        #[command(flatten)]
        template: TemplateArgs,
    },

    /// Verify the promoted copy matches the template (exit 1 if not)
    Check {
        #[command(flatten)]
        template: TemplateArgs,

        /// Output directory (default: reference)
        #[arg(short, long)]
        into: Option<PathBuf>,
    },

    /// Promote the template and register it in the artifact manifest
    Publish {
        #[command(flatten)]
        template: TemplateArgs,

        /// Output directory (default: reference)
        #[arg(short, long)]
        into: Option<PathBuf>,

        /// Artifact category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Manifest file (default: build/artifacts.json)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },

    /// Print the path of the artifact published under a category
    Resolve {
        /// Artifact category
        #[arg(required = true)]
        category: String,

        /// Manifest file (default: build/artifacts.json)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
}
