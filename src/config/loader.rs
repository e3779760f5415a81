//! Config file discovery, layering, and `~` expansion

use super::Config;
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::fs;
use std::path::{Path, PathBuf};

const CANDIDATES: [&str; 3] = [".gitr.yaml", ".gitr.yml", ".gitr.toml"];

/// Effective configuration plus the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    pub fn render(self, config: &Config) -> Result<String> {
        match self {
            ConfigFormat::Yaml => serde_yaml::to_string(config).context("Failed serializing config as YAML"),
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).context("Failed serializing config as TOML")
            }
        }
    }
}

/// Where `gitr config init` writes, and the first discovery candidate.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CANDIDATES[0]))
}

/// Load configuration from `config_path`, or discover it in the user home.
///
/// An explicitly named file must exist and parse; a discovered file must
/// parse. With no file at all the built-in defaults apply.
pub fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_home(config_path, dirs::home_dir().as_deref())
}

pub(crate) fn load_config_with_home(
    config_path: Option<&Path>,
    home: Option<&Path>,
) -> Result<LoadedConfig> {
    let discovered = match config_path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => home.and_then(discover_config),
    };

    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(config_file) = &discovered {
        let content = fs::read_to_string(config_file)
            .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
        figment = match ConfigFormat::from_path(config_file) {
            Some(ConfigFormat::Yaml) => figment.merge(Yaml::string(&content)),
            Some(ConfigFormat::Toml) => figment.merge(Toml::string(&content)),
            None => anyhow::bail!(
                "Unsupported config extension for file {} (expected .yaml, .yml or .toml)",
                config_file.display()
            ),
        };
    }
    figment = figment.merge(Env::prefixed("GITR_").only(&["home_dir"]));

    let mut config: Config = figment.extract().with_context(|| match &discovered {
        Some(path) => format!("Invalid config: {}", path.display()),
        None => "Invalid config from environment".to_string(),
    })?;

    if let Some(home) = home {
        expand_config_paths(&mut config, home);
    }
    config.registry().context("Invalid host list in config")?;

    tracing::debug!(
        "loaded config from {} with {} host(s)",
        discovered.as_ref().map_or("defaults".to_string(), |p| p.display().to_string()),
        config.hosts.len()
    );
    Ok(LoadedConfig { config, path: discovered })
}

/// Write the default config to `path`. Returns `false` if it already existed
/// and `force` was not set.
pub fn init_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating directory: {}", parent.display()))?;
    }
    let format = ConfigFormat::from_path(path).unwrap_or(ConfigFormat::Yaml);
    let content = format.render(&Config::default())?;
    fs::write(path, content).with_context(|| format!("Failed writing config file: {}", path.display()))?;
    Ok(true)
}

fn discover_config(home: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|name| home.join(name)).find(|path| path.is_file())
}

fn expand_config_paths(config: &mut Config, home: &Path) {
    if let Some(dir) = config.home_dir.take() {
        config.home_dir = expand_home(&dir, home);
    }
    for host in &mut config.hosts {
        if let Some(dir) = host.home_dir.take() {
            host.home_dir = expand_home(&dir, home);
        }
    }
}

/// Expand a leading `~`. Empty paths mean "unset".
pub fn expand_home(path: &Path, home: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return None;
    }
    match path.strip_prefix("~") {
        Ok(rest) => Some(home.join(rest)),
        Err(_) => Some(path.to_path_buf()),
    }
}
