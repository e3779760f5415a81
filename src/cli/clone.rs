//! Clone command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{ui, GlobalArgs};
use crate::config::{load_config, Config};
use crate::fetch::{CloneOptions, CloneOutcome, Cloner, Credentials};

#[derive(Args)]
pub struct CloneArgs {
    /// Repository URL: git@host:owner/repo.git, https://host/owner/repo.git or a repository page
    #[arg(value_name = "URL")]
    pub url: String,

    /// Create the full owner/repo directory hierarchy even if the host is configured flat
    #[arg(long)]
    pub create_dir: bool,

    /// HTTPS personal access token
    #[arg(long, value_name = "TOKEN", env = "GITR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Cloner wired to the operator's home directory and working directory.
pub(super) fn build_cloner(config: &Config) -> Result<Cloner> {
    let home = dirs::home_dir().context("Could not determine the home directory")?;
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    Ok(Cloner::new(config, Credentials::from_home(&home), cwd)?)
}

/// First Ctrl-C cancels the clone in flight; a second one exits immediately.
fn install_interrupt_handler(cancel: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        if cancel.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
    });
    if let Err(e) = result {
        tracing::warn!("could not install Ctrl-C handler: {e}");
    }
}

pub fn run(args: CloneArgs, global: &GlobalArgs) -> Result<()> {
    let loaded = load_config(global.config.as_deref())?;
    let cancel = Arc::new(AtomicBool::new(false));
    let show_progress = loaded.config.clone.progress && console::Term::stderr().is_term();
    let cloner = build_cloner(&loaded.config)?
        .with_cancel(Arc::clone(&cancel))
        .with_progress(show_progress);

    let options = CloneOptions { create_dir: args.create_dir, token: args.token, dry_run: global.dry };
    if !options.dry_run {
        install_interrupt_handler(cancel);
        ui::info(&format!("Cloning {}", ui::path_style(&args.url)));
    }

    match cloner.run(&args.url, &options)? {
        CloneOutcome::Cloned { path, transport } => {
            let shown = ui::display_path(&path);
            ui::success(
                "Repository cloned successfully",
                &[
                    ui::path_style(&shown),
                    String::new(),
                    format!("Cloned over {transport}."),
                    format!("Run {} to navigate to the repo.", ui::cmd_style(&format!("cd {shown}"))),
                ],
            );
        }
        CloneOutcome::AlreadyExists { path } => {
            println!();
            ui::info(&format!(
                "Repository already exists at {}",
                ui::path_style(&ui::display_path(&path))
            ));
        }
        CloneOutcome::DryRun(report) => ui::dry_run(&report),
    }
    Ok(())
}
