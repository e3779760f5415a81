//! Error taxonomy for resolving and cloning repositories

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = CloneError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CloneError {
    #[error("could not parse '{url}' as a repository URL: {reason}")]
    UnparsableUrl { url: String, reason: &'static str },

    #[error("the hostname {hostname} is not configured")]
    UnknownHost { hostname: String },

    #[error("browser URLs are not supported for {provider} ({url})")]
    UnsupportedBrowserUrl { provider: crate::domain::Provider, url: String },

    #[error("no ssh private key found for {hostname}")]
    SshKeyNotFound { hostname: String, searched: Vec<PathBuf> },

    #[error("repository not found: {url}: {}", .output.trim())]
    RepoNotFound { url: String, output: String },

    #[error("failed to clone {url} over {transport}: {output}")]
    CloneTransport { url: String, transport: crate::domain::TransportKind, output: String },

    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("hostname {hostname} is configured more than once")]
    DuplicateHost { hostname: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("clone of {url} was interrupted")]
    Interrupted { url: String },
}

impl CloneError {
    pub(crate) fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CloneError::Filesystem { action, path: path.into(), source }
    }

    /// Short headline for terminal reports.
    pub fn title(&self) -> &'static str {
        match self {
            CloneError::UnparsableUrl { .. } => "Invalid Repository URL",
            CloneError::UnknownHost { .. } => "Unknown SCM Host",
            CloneError::UnsupportedBrowserUrl { .. } => "Unsupported URL Format",
            CloneError::SshKeyNotFound { .. } => "SSH Key Not Found",
            CloneError::RepoNotFound { .. } => "Repository Not Found",
            CloneError::CloneTransport { .. } => "Clone Failed",
            CloneError::Filesystem { .. } => "Filesystem Error",
            CloneError::DuplicateHost { .. } | CloneError::InvalidConfig(_) => "Configuration Error",
            CloneError::Interrupted { .. } => "Clone Interrupted",
        }
    }

    /// Actionable hints for the operator.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            CloneError::UnparsableUrl { .. } => vec![
                "Use an SSH or HTTPS clone URL ending in .git, or a https:// repository page URL"
                    .to_string(),
                "Example: gitr clone https://github.com/owner/repo".to_string(),
            ],
            CloneError::UnknownHost { hostname } => vec![
                format!("Add an entry for {hostname} under `hosts` in your gitr config"),
                "Run `gitr config path` to see which file is in use".to_string(),
            ],
            CloneError::UnsupportedBrowserUrl { .. } => {
                vec!["Use the SSH or HTTPS clone URL shown on the repository page instead".to_string()]
            }
            CloneError::SshKeyNotFound { searched, .. } => {
                let mut hints = vec![
                    "Add an IdentityFile for this host to ~/.ssh/config, or use an HTTPS URL"
                        .to_string(),
                ];
                hints.extend(searched.iter().map(|p| format!("Checked: {}", p.display())));
                hints
            }
            CloneError::RepoNotFound { .. } => vec![
                "Verify the URL exists and that your account has access to it".to_string(),
            ],
            CloneError::CloneTransport { .. } => vec![
                "Check your network connection and repository URL".to_string(),
                "For private repos, pass --token or add a token file under ~/.personal_access_tokens"
                    .to_string(),
            ],
            CloneError::Filesystem { path, .. } => {
                vec![format!("Check permissions on {}", path.display())]
            }
            CloneError::DuplicateHost { .. } | CloneError::InvalidConfig(_) => {
                vec!["Fix the config file, or regenerate it with `gitr config init --force`".to_string()]
            }
            CloneError::Interrupted { .. } => {
                vec!["The partially cloned directory was removed; run the command again".to_string()]
            }
        }
    }
}
