//! Core domain types shared by the normalizer, resolver, and clone engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// SCM product behind a configured hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "github")]
    GitHub,
    #[serde(rename = "gitlab")]
    GitLab,
    #[serde(rename = "bitbucket-cloud", alias = "bitbucket.cloud", alias = "bitbucket")]
    BitBucketCloud,
    #[serde(rename = "bitbucket-datacenter", alias = "bitbucket.datacenter")]
    BitBucketDatacenter,
    #[serde(rename = "generic")]
    Generic,
}

impl Provider {
    pub fn is_bitbucket(self) -> bool {
        matches!(self, Provider::BitBucketCloud | Provider::BitBucketDatacenter)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::GitHub => "GitHub",
            Provider::GitLab => "GitLab",
            Provider::BitBucketCloud => "BitBucket Cloud",
            Provider::BitBucketDatacenter => "BitBucket Datacenter",
            Provider::Generic => "Generic",
        };
        f.write_str(name)
    }
}

/// Shape of the URL the operator supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// `git@host:owner/repo.git` or `ssh://host/owner/repo.git`
    SshGit,
    /// `https://[user@]host/owner/repo.git`
    HttpsGit,
    /// Any other `http(s)://host/...` page (tree, blob, pull, ...)
    BrowserPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// Canonical identity of a repository reference.
///
/// `repo_path` is `owner/repo` (or a nested group path) with no `.git`
/// suffix, no surrounding slashes, and no query or fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReference {
    pub hostname: String,
    pub repo_path: String,
    pub provider: Provider,
    pub url_kind: UrlKind,
    /// Input with query string and fragment removed.
    pub url: String,
}

impl RepoReference {
    pub fn repo_name(&self) -> &str {
        crate::url::repo_name(&self.repo_path)
    }
}

/// Per-host policy loaded from configuration. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPolicy {
    pub hostname: String,
    pub provider: Provider,
    #[serde(default)]
    pub scheme: Scheme,
    #[serde(default)]
    pub always_create_dir_hierarchy: bool,
    #[serde(default)]
    pub include_host_in_dir_hierarchy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,
}

impl HostPolicy {
    pub fn new(hostname: impl Into<String>, provider: Provider) -> Self {
        Self {
            hostname: hostname.into(),
            provider,
            scheme: Scheme::Https,
            always_create_dir_hierarchy: false,
            include_host_in_dir_hierarchy: false,
            home_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Ssh,
    HttpsToken,
    HttpsAnonymous,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Ssh => f.write_str("ssh"),
            TransportKind::HttpsToken => f.write_str("https (token)"),
            TransportKind::HttpsAnonymous => f.write_str("https"),
        }
    }
}

/// HTTPS personal access token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// A private key file that was found and looks like a private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshKey {
    pub path: PathBuf,
}

/// Everything needed to run one clone invocation. Built per call, never persisted.
#[derive(Debug, Clone)]
pub struct ClonePlan {
    pub local_path: PathBuf,
    pub ssh_url: String,
    pub https_url: String,
    pub transport: TransportKind,
    /// Transport to try when the first attempt fails with a retryable error.
    pub fallback: Option<TransportKind>,
    pub ssh_key: Option<SshKey>,
    pub token: Option<Token>,
}

impl ClonePlan {
    pub fn url_for(&self, transport: TransportKind) -> &str {
        match transport {
            TransportKind::Ssh => &self.ssh_url,
            TransportKind::HttpsToken | TransportKind::HttpsAnonymous => &self.https_url,
        }
    }
}
