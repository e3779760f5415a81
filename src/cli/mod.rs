//! Command-line interface for gitr
//!
//! Provides `clone`, `path`, the web page commands, `config` and
//! `completions`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::web::WebPage;

mod clone;
mod completions;
mod config;
mod path;
pub mod ui;
mod web;

/// Clone repositories to organized, deterministic paths
#[derive(Parser)]
#[command(name = "gitr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, visible_alias = "debug", global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.gitr.yaml
    #[arg(short, long, value_name = "FILE", env = "GITR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Show what would happen without cloning or writing anything
    #[arg(long, global = true)]
    pub dry: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository into its deterministic path
    Clone(clone::CloneArgs),

    /// Print the path a repository is (or would be) cloned to
    Path(path::PathArgs),

    /// Print the home page URL of the current repository
    Web,

    /// Print the branches page URL of the current repository
    Branches,

    /// Print the pull/merge requests page URL of the current repository
    Prs,

    /// Print the commits page URL of the current branch
    Commits,

    /// Print the issues page URL of the current repository
    Issues,

    /// Print the tags page URL of the current repository
    Tags,

    /// Print the releases page URL of the current repository
    Releases,

    /// Print the pipelines/actions page URL of the current repository
    #[command(alias = "pipe")]
    Pipelines,

    /// Print the tree URL of the current branch (the default branch if it was never pushed)
    Rem,

    /// Print the web URL of a file in the current repository
    WebUrl(web::WebUrlArgs),

    /// Inspect or initialize the gitr config file
    #[command(subcommand)]
    Config(config::ConfigCommand),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.global.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Clone(args) => clone::run(args, &cli.global),
        Commands::Path(args) => path::run(args, &cli.global),
        Commands::Web => web::run(WebPage::Home, &cli.global),
        Commands::Branches => web::run(WebPage::Branches, &cli.global),
        Commands::Prs => web::run(WebPage::Prs, &cli.global),
        Commands::Commits => web::run(WebPage::Commits, &cli.global),
        Commands::Issues => web::run(WebPage::Issues, &cli.global),
        Commands::Tags => web::run(WebPage::Tags, &cli.global),
        Commands::Releases => web::run(WebPage::Releases, &cli.global),
        Commands::Pipelines => web::run(WebPage::Pipelines, &cli.global),
        Commands::Rem => web::run(WebPage::Rem, &cli.global),
        Commands::WebUrl(args) => web::run_file(args, &cli.global),
        Commands::Config(command) => config::run(command, &cli.global),
        Commands::Completions(args) => completions::run(args),
    }
}
