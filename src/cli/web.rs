//! Web and web-url command implementations
//!
//! URLs are printed rather than opened, so they compose with `xdg-open`,
//! `open` or a clipboard tool.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::{ui, GlobalArgs};
use crate::config::load_config;
use crate::web::{self, LocalRepo, WebPage, WebRepo};

#[derive(Args)]
pub struct WebUrlArgs {
    /// File inside the current repository
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

fn discover(global: &GlobalArgs) -> Result<(LocalRepo, WebRepo, PathBuf)> {
    let loaded = load_config(global.config.as_deref())?;
    let registry = loaded.config.registry()?;
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    let (local, repo) = web::discover(&cwd, &registry)?;
    Ok((local, repo, cwd))
}

pub fn run(page: WebPage, global: &GlobalArgs) -> Result<()> {
    let (local, repo, _cwd) = discover(global)?;
    let branch = local.branch()?;

    if global.dry {
        ui::web_info(&repo, &branch);
        return Ok(());
    }

    let target = if page == WebPage::Rem { branch_to_open(&local, branch) } else { branch };
    println!("{}", repo.page_url(page, &target)?);
    Ok(())
}

/// The current branch, or the remote default when it was never pushed.
fn branch_to_open(local: &LocalRepo, branch: String) -> String {
    if local.branch_on_remote(&branch) {
        return branch;
    }
    match local.default_branch() {
        Some(default) => {
            tracing::warn!("branch '{branch}' is not on {}; using '{default}'", local.remote_name());
            default
        }
        None => {
            tracing::warn!("branch '{branch}' is not on {} and its default branch is unknown", local.remote_name());
            branch
        }
    }
}

pub fn run_file(args: WebUrlArgs, global: &GlobalArgs) -> Result<()> {
    let (local, repo, cwd) = discover(global)?;
    let branch = local.branch()?;
    let relative = local.relative_path(&cwd, &args.file)?;
    println!("{}", repo.file_url(&branch, &relative)?);
    Ok(())
}
