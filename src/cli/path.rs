//! Path command implementation

use anyhow::Result;
use clap::Args;

use super::GlobalArgs;
use crate::config::load_config;

#[derive(Args)]
pub struct PathArgs {
    /// Repository URL
    #[arg(value_name = "URL")]
    pub url: String,

    /// Resolve as if the owner/repo directory hierarchy were enabled
    #[arg(long)]
    pub create_dir: bool,
}

/// Prints the bare path so it can be used as `cd "$(gitr path URL)"`.
pub fn run(args: PathArgs, global: &GlobalArgs) -> Result<()> {
    let loaded = load_config(global.config.as_deref())?;
    let cloner = super::clone::build_cloner(&loaded.config)?;
    let path = cloner.resolve_path(&args.url, args.create_dir)?;
    println!("{}", path.display());
    Ok(())
}
