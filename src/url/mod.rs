//! Repository URL normalization
//!
//! Turns SSH clone URLs, HTTPS clone URLs and browser page URLs
//! (`/tree/..`, `/blob/..`, `/pull/N`, ...) into a canonical
//! `(hostname, repo_path, provider)` triple.

use crate::config::HostRegistry;
use crate::domain::{RepoReference, UrlKind};
use crate::error::{CloneError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

mod repo_path;

pub use repo_path::repo_path_for;

/// `git@host:path` (scp-like). A leading slash on the path is tolerated.
static SCP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^git@([^:/@]+):/*(.*)$").expect("valid scp regex"));

/// `scheme://[user@]host[:port][/|:]path`. The `:` path separator covers
/// hand-written URLs such as `https://user@host:owner/repo.git`.
static SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(ssh|https?)://(?:([^@/]+)@)?([^/:@]+)(?::\d+)?(?:[/:](.*))?$")
        .expect("valid url regex")
});

/// Output of the grammar-level parse, before any provider knowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedUrl {
    pub hostname: String,
    pub segments: Vec<String>,
    pub kind: UrlKind,
}

/// Remove the query string and fragment (`?utm_source=..`, `#readme`).
pub fn strip_query_params(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    &raw[..end]
}

/// True when the URL ends with a literal `.git`.
pub fn is_git_url(url: &str) -> bool {
    url.ends_with(".git")
}

/// True for `.git` URLs that start with `git@` or `ssh://`.
pub fn is_git_ssh_url(url: &str) -> bool {
    is_git_url(url) && (url.starts_with("git@") || url.starts_with("ssh://"))
}

/// True when an http(s) URL carries a `user@` segment before the host.
pub fn is_git_http_url_has_username(url: &str) -> bool {
    http_username(url).is_some()
}

pub(crate) fn http_username(url: &str) -> Option<&str> {
    let lower = url.get(..8).map(str::to_ascii_lowercase).unwrap_or_default();
    let rest = if lower.starts_with("https://") {
        &url[8..]
    } else if lower.starts_with("http://") {
        &url[7..]
    } else {
        return None;
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    authority.split_once('@').map(|(user, _)| user).filter(|user| !user.is_empty())
}

/// Hostname of any supported URL shape, lowercased, without user or port.
pub fn hostname(raw: &str) -> Option<String> {
    let url = strip_query_params(raw.trim());
    if let Some(caps) = SCP_RE.captures(url) {
        return Some(caps[1].to_ascii_lowercase());
    }
    SCHEME_RE.captures(url).map(|caps| caps[3].to_ascii_lowercase())
}

/// Last segment of a repo path. Does not strip `.git`.
pub fn repo_name(repo_path: &str) -> &str {
    repo_path.rsplit('/').next().unwrap_or(repo_path)
}

pub(crate) fn parse(raw: &str) -> Result<ParsedUrl> {
    let url = strip_query_params(raw.trim());
    let unparsable =
        |reason: &'static str| CloneError::UnparsableUrl { url: raw.trim().to_string(), reason };

    let (hostname, path, scheme) = if let Some(caps) = SCP_RE.captures(url) {
        (caps[1].to_ascii_lowercase(), caps[2].to_string(), "ssh".to_string())
    } else if let Some(caps) = SCHEME_RE.captures(url) {
        let path = caps.get(4).map_or("", |m| m.as_str()).to_string();
        (caps[3].to_ascii_lowercase(), path, caps[1].to_ascii_lowercase())
    } else {
        return Err(unparsable("expected git@host:path, ssh://host/path or http(s)://host/path"));
    };

    let kind = if scheme == "ssh" {
        if !is_git_ssh_url(url) {
            return Err(unparsable("ssh clone URLs must end in .git"));
        }
        UrlKind::SshGit
    } else if is_git_url(url) {
        UrlKind::HttpsGit
    } else {
        UrlKind::BrowserPage
    };

    let segments: Vec<String> =
        path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect();
    if segments.is_empty() {
        return Err(unparsable("no repository path after the host"));
    }
    if segments.iter().any(|s| s == "." || s == "..") {
        return Err(unparsable("'.' and '..' are not allowed in the repository path"));
    }

    Ok(ParsedUrl { hostname, segments, kind })
}

/// Parse `raw` and resolve its provider through the host registry.
pub fn normalize(raw: &str, registry: &HostRegistry) -> Result<RepoReference> {
    let parsed = parse(raw)?;
    let policy = registry.lookup(&parsed.hostname)?;
    let repo_path = repo_path::extract(&parsed, policy.provider).ok_or_else(|| {
        CloneError::UnparsableUrl {
            url: raw.trim().to_string(),
            reason: "could not find owner/repo in the URL path",
        }
    })?;

    Ok(RepoReference {
        hostname: policy.hostname.clone(),
        repo_path,
        provider: policy.provider,
        url_kind: parsed.kind,
        url: strip_query_params(raw.trim()).to_string(),
    })
}
