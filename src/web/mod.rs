//! Browser URLs for a repository and its pages
//!
//! The repository is identified from the local checkout's remote, normalized
//! through the same URL layer and host registry as `clone`. Nothing here
//! talks to an SCM API; only URL shapes are used.

use crate::config::HostRegistry;
use crate::domain::{HostPolicy, Provider};
use crate::error::CloneError;
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub mod local;

pub use local::LocalRepo;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("{} is not inside a git repository", .0.display())]
    NotInGitRepo(std::path::PathBuf),

    #[error("the repository has no remotes")]
    NoRemote,

    #[error("HEAD is not on a branch")]
    NoBranch,

    #[error("{provider} has no {page} page")]
    UnsupportedPage { provider: Provider, page: WebPage },

    #[error("{} is not inside the repository working tree", .0.display())]
    OutsideWorkTree(std::path::PathBuf),

    #[error("{}: {source}", .path.display())]
    File {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Remote(#[from] CloneError),
}

impl WebError {
    pub fn title(&self) -> &'static str {
        match self {
            WebError::NotInGitRepo(_) => "Not in a Git Repository",
            WebError::NoRemote => "No Remotes Found",
            WebError::NoBranch => "Failed to Get Branch",
            WebError::UnsupportedPage { .. } => "Unsupported Page",
            WebError::OutsideWorkTree(_) | WebError::File { .. } => "Failed to Get Web URL",
            WebError::Remote(err) => err.title(),
        }
    }

    pub fn remediation(&self) -> Vec<String> {
        match self {
            WebError::NotInGitRepo(_) => vec!["Run this command from inside a cloned repository".to_string()],
            WebError::NoRemote => vec!["Add one with `git remote add origin <url>`".to_string()],
            WebError::NoBranch => vec!["Check out a branch with `git switch <branch>`".to_string()],
            WebError::UnsupportedPage { .. } => vec!["Run `gitr web` to get the repository home page".to_string()],
            WebError::OutsideWorkTree(_) | WebError::File { .. } => {
                vec!["Pass a path to a file inside the current repository".to_string()]
            }
            WebError::Remote(err) => err.remediation(),
        }
    }
}

/// Repository pages reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebPage {
    Home,
    Branches,
    Prs,
    Commits,
    Issues,
    Tags,
    Releases,
    Pipelines,
    /// Tree of the current branch.
    Rem,
}

impl fmt::Display for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WebPage::Home => "home",
            WebPage::Branches => "branches",
            WebPage::Prs => "pull requests",
            WebPage::Commits => "commits",
            WebPage::Issues => "issues",
            WebPage::Tags => "tags",
            WebPage::Releases => "releases",
            WebPage::Pipelines => "pipelines",
            WebPage::Rem => "branch tree",
        };
        f.write_str(name)
    }
}

/// A repository as seen from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRepo {
    pub provider: Provider,
    pub hostname: String,
    pub remote_url: String,
    pub repo_path: String,
    pub repo_name: String,
    /// Repository home page; every other page hangs off it.
    pub home_url: String,
}

impl WebRepo {
    pub fn from_remote(remote_url: &str, registry: &HostRegistry) -> Result<Self, WebError> {
        let reference = crate::url::normalize(remote_url, registry)?;
        let policy = registry.lookup(&reference.hostname)?;
        Ok(Self {
            provider: reference.provider,
            hostname: reference.hostname.clone(),
            remote_url: remote_url.to_string(),
            repo_name: reference.repo_name().to_string(),
            home_url: home_url(policy, &reference.repo_path),
            repo_path: reference.repo_path,
        })
    }

    /// URL of `page`; `branch` is used by the branch-scoped pages.
    pub fn page_url(&self, page: WebPage, branch: &str) -> Result<String, WebError> {
        page_suffix(self.provider, page, branch)
            .map(|suffix| format!("{}{suffix}", self.home_url))
            .ok_or(WebError::UnsupportedPage { provider: self.provider, page })
    }

    /// URL of a file at `branch`. `relative` uses `/` separators.
    pub fn file_url(&self, branch: &str, relative: &str) -> Result<String, WebError> {
        let base = &self.home_url;
        let url = match self.provider {
            Provider::GitHub => format!("{base}/blob/{branch}/{relative}"),
            Provider::GitLab => format!("{base}/-/blob/{branch}/{relative}"),
            Provider::BitBucketCloud => format!("{base}/src/{branch}/{relative}"),
            Provider::BitBucketDatacenter => {
                format!("{base}/browse/{relative}?at={}", encoded_head_ref(branch))
            }
            Provider::Generic => {
                return Err(WebError::UnsupportedPage { provider: self.provider, page: WebPage::Rem })
            }
        };
        Ok(url)
    }
}

/// `{scheme}://{host}/{repo_path}`; Datacenter repos live under
/// `projects/<P>/repos/<R>`.
pub fn home_url(policy: &HostPolicy, repo_path: &str) -> String {
    let base = format!("{}://{}", policy.scheme, policy.hostname);
    match (policy.provider, repo_path.split_once('/')) {
        (Provider::BitBucketDatacenter, Some((project, repo))) => {
            format!("{base}/projects/{project}/repos/{repo}")
        }
        _ => format!("{base}/{repo_path}"),
    }
}

fn page_suffix(provider: Provider, page: WebPage, branch: &str) -> Option<String> {
    use Provider::*;
    use WebPage::*;

    let suffix = match (provider, page) {
        (_, Home) => String::new(),

        (GitHub, Branches) => "/branches".into(),
        (GitHub, Prs) => "/pulls".into(),
        (GitHub, Commits) => format!("/commits/{branch}"),
        (GitHub, Issues) => "/issues".into(),
        (GitHub, Tags) => "/tags".into(),
        (GitHub, Releases) => "/releases".into(),
        (GitHub, Pipelines) => "/actions".into(),
        (GitHub, Rem) => format!("/tree/{branch}"),

        (GitLab, Branches) => "/-/branches".into(),
        (GitLab, Prs) => "/-/merge_requests".into(),
        (GitLab, Commits) => format!("/-/commits/{branch}"),
        (GitLab, Issues) => "/-/issues".into(),
        (GitLab, Tags) => "/-/tags".into(),
        (GitLab, Releases) => "/-/releases".into(),
        (GitLab, Pipelines) => "/-/pipelines".into(),
        (GitLab, Rem) => format!("/-/tree/{branch}"),

        (BitBucketCloud, Branches) => "/branches".into(),
        (BitBucketCloud, Prs) => "/pull-requests".into(),
        (BitBucketCloud, Commits) => format!("/commits/branch/{branch}"),
        (BitBucketCloud, Issues) => "/issues".into(),
        (BitBucketCloud, Tags) => "/downloads/?tab=tags".into(),
        (BitBucketCloud, Releases) => "/downloads".into(),
        (BitBucketCloud, Pipelines) => "/pipelines".into(),
        (BitBucketCloud, Rem) => format!("/src/{branch}"),

        (BitBucketDatacenter, Branches) => "/branches".into(),
        (BitBucketDatacenter, Prs) => "/pull-requests".into(),
        (BitBucketDatacenter, Commits) => format!("/commits?until={}", encoded_head_ref(branch)),
        (BitBucketDatacenter, Rem) => format!("/browse?at={}", encoded_head_ref(branch)),
        (BitBucketDatacenter, Issues | Tags | Releases | Pipelines) => return None,

        (Generic, _) => return None,
    };
    Some(suffix)
}

/// `refs/heads/<branch>` as a query value.
fn encoded_head_ref(branch: &str) -> String {
    format!("refs/heads/{branch}").replace('/', "%2F")
}

/// The checkout containing `dir` as a [`WebRepo`], plus its current branch.
pub fn discover(dir: &Path, registry: &HostRegistry) -> Result<(LocalRepo, WebRepo), WebError> {
    let local = LocalRepo::discover(dir)?;
    let remote = local.remote_url()?;
    tracing::debug!("remote {} is {remote}", local.remote_name());
    let web = WebRepo::from_remote(&remote, registry)?;
    Ok((local, web))
}
