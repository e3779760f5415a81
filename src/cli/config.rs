//! Config command implementation

use anyhow::{Context, Result};
use clap::Subcommand;

use super::{ui, GlobalArgs};
use crate::config::{default_config_path, init_config, load_config, ConfigFormat};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (defaults, file and environment merged)
    Show {
        /// Print as TOML instead of YAML
        #[arg(long)]
        toml: bool,
    },

    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file in use
    Path,
}

pub fn run(command: ConfigCommand, global: &GlobalArgs) -> Result<()> {
    match command {
        ConfigCommand::Show { toml } => {
            let loaded = load_config(global.config.as_deref())?;
            let format = if toml { ConfigFormat::Toml } else { ConfigFormat::Yaml };
            print!("{}", format.render(&loaded.config)?);
        }
        ConfigCommand::Init { force } => {
            let path = match &global.config {
                Some(path) => path.clone(),
                None => default_config_path().context("Could not determine the home directory")?,
            };
            let shown = ui::display_path(&path);
            if global.dry {
                ui::info(&format!("Would write the default config to {}", ui::path_style(&shown)));
            } else if init_config(&path, force)? {
                ui::success(
                    "Configuration initialized",
                    &[format!("Config file created at {}", ui::path_style(&shown))],
                );
            } else {
                ui::warn(
                    "Configuration already exists",
                    &format!("{shown} was left unchanged. Pass --force to overwrite it."),
                );
            }
        }
        ConfigCommand::Path => {
            let loaded = load_config(global.config.as_deref())?;
            match loaded.path {
                Some(path) => println!("{}", path.display()),
                None => {
                    let default = default_config_path()
                        .map_or_else(|| "~/.gitr.yaml".to_string(), |p| p.display().to_string());
                    println!("{default}");
                    tracing::info!("{default} does not exist; built-in defaults are in use");
                }
            }
        }
    }
    Ok(())
}
