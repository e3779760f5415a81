//! SSH key and personal-access-token discovery

use crate::domain::{SshKey, Token};
use crate::error::{CloneError, Result};
use globset::GlobBuilder;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_KEYS: [&str; 3] = ["id_ed25519", "id_ecdsa", "id_rsa"];

/// Locations of the operator's SSH keys and token files.
#[derive(Debug, Clone)]
pub struct Credentials {
    ssh_dir: PathBuf,
    tokens_dir: PathBuf,
}

impl Credentials {
    pub fn new(ssh_dir: impl Into<PathBuf>, tokens_dir: impl Into<PathBuf>) -> Self {
        Self { ssh_dir: ssh_dir.into(), tokens_dir: tokens_dir.into() }
    }

    /// `~/.ssh` and `~/.personal_access_tokens` under `home`.
    pub fn from_home(home: &Path) -> Self {
        Self::new(home.join(".ssh"), home.join(".personal_access_tokens"))
    }

    /// Find the private key used for `hostname`.
    ///
    /// `IdentityFile` entries from matching `Host` blocks in `~/.ssh/config`
    /// come first, then the conventional default key names.
    pub fn ssh_key(&self, hostname: &str) -> Result<SshKey> {
        let mut candidates = self.configured_identity_files(hostname);
        candidates.extend(DEFAULT_KEYS.iter().map(|name| self.ssh_dir.join(name)));

        for path in &candidates {
            match fs::read(path) {
                Ok(bytes) if looks_like_private_key(&bytes) => {
                    tracing::debug!("using ssh key {} for {}", path.display(), hostname);
                    return Ok(SshKey { path: path.clone() });
                }
                Ok(_) => tracing::warn!("{} is not a private key, skipping", path.display()),
                Err(_) => tracing::debug!("{} file not found", path.display()),
            }
        }
        Err(CloneError::SshKeyNotFound { hostname: hostname.to_string(), searched: candidates })
    }

    /// Token stored at `~/.personal_access_tokens/<hostname>`, if any.
    pub fn token(&self, hostname: &str) -> Result<Option<Token>> {
        let path = self.tokens_dir.join(hostname);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .map_err(|e| CloneError::filesystem("failed to read", &path, e))?;
        Ok(Token::new(&raw))
    }

    fn configured_identity_files(&self, hostname: &str) -> Vec<PathBuf> {
        let Ok(content) = fs::read_to_string(self.ssh_dir.join("config")) else {
            return Vec::new();
        };
        let home = self.ssh_dir.parent().unwrap_or(&self.ssh_dir);
        identity_files(&content, hostname)
            .into_iter()
            .map(|file| match file.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => PathBuf::from(file),
            })
            .collect()
    }
}

/// `IdentityFile` values that apply to `hostname`, in file order.
fn identity_files(ssh_config: &str, hostname: &str) -> Vec<String> {
    let mut files = Vec::new();
    let mut in_matching_block = true; // lines before the first Host apply to all hosts
    for line in ssh_config.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (keyword, value) = match line.split_once(|c: char| c.is_whitespace() || c == '=') {
            Some((k, v)) => (k, v.trim_start_matches(|c: char| c.is_whitespace() || c == '=').trim()),
            None => continue,
        };
        if keyword.eq_ignore_ascii_case("host") {
            in_matching_block = host_block_matches(value, hostname);
        } else if keyword.eq_ignore_ascii_case("match") {
            in_matching_block = false;
        } else if in_matching_block && keyword.eq_ignore_ascii_case("identityfile") {
            files.push(value.trim_matches('"').to_string());
        }
    }
    files
}

fn host_block_matches(patterns: &str, hostname: &str) -> bool {
    let mut matched = false;
    for pattern in patterns.split_whitespace() {
        let (negated, pattern) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let Ok(glob) = GlobBuilder::new(pattern).case_insensitive(true).build() else {
            continue;
        };
        if glob.compile_matcher().is_match(hostname) {
            if negated {
                return false;
            }
            matched = true;
        }
    }
    matched
}

fn looks_like_private_key(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(bytes);
    text.contains("-----BEGIN") && text.contains("PRIVATE KEY-----")
}
