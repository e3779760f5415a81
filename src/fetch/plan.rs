//! Transport selection and clone URL construction

use super::credentials::Credentials;
use crate::domain::{ClonePlan, HostPolicy, RepoReference, Scheme, Token, TransportKind, UrlKind};
use crate::error::{CloneError, Result};
use std::path::PathBuf;

pub fn ssh_clone_url(hostname: &str, repo_path: &str) -> String {
    format!("git@{hostname}:{repo_path}.git")
}

pub fn https_clone_url(scheme: Scheme, hostname: &str, repo_path: &str) -> String {
    format!("{scheme}://{hostname}/{repo_path}.git")
}

/// SSH and HTTPS clone URLs for `reference`. A clone URL given as input is
/// kept verbatim for its own transport.
pub fn candidate_urls(reference: &RepoReference, policy: &HostPolicy) -> (String, String) {
    let hostname = reference.hostname.as_str();
    let ssh_url = match reference.url_kind {
        UrlKind::SshGit => reference.url.clone(),
        _ => ssh_clone_url(hostname, &reference.repo_path),
    };
    let https_url = match reference.url_kind {
        UrlKind::HttpsGit => reference.url.clone(),
        _ => https_clone_url(policy.scheme, hostname, &reference.repo_path),
    };
    (ssh_url, https_url)
}

/// Decide how `reference` gets cloned into `local_path`.
///
/// - SSH clone URLs clone over SSH only. A missing key is not fatal here;
///   the git client may still authenticate through an agent.
/// - HTTPS clone URLs use a token when one is available (`--token` first,
///   then the token file), anonymous HTTPS otherwise.
/// - Browser URLs prefer SSH with HTTPS as fallback, or go straight to
///   HTTPS when no SSH key is found. BitBucket page paths do not map to
///   clone paths, so those are refused.
pub fn select_transport(
    reference: &RepoReference,
    policy: &HostPolicy,
    local_path: PathBuf,
    explicit_token: Option<&str>,
    credentials: &Credentials,
) -> Result<ClonePlan> {
    let hostname = reference.hostname.as_str();
    let (ssh_url, https_url) = candidate_urls(reference, policy);
    let mut plan = ClonePlan {
        local_path,
        ssh_url,
        https_url,
        transport: TransportKind::HttpsAnonymous,
        fallback: None,
        ssh_key: None,
        token: None,
    };

    match reference.url_kind {
        UrlKind::SshGit => {
            plan.transport = TransportKind::Ssh;
            plan.ssh_key = optional_ssh_key(credentials, hostname)?;
        }
        UrlKind::HttpsGit => {
            plan.token = resolve_token(explicit_token, credentials, hostname)?;
            plan.transport = https_transport(&plan.token);
        }
        UrlKind::BrowserPage => {
            if reference.provider.is_bitbucket() {
                return Err(CloneError::UnsupportedBrowserUrl {
                    provider: reference.provider,
                    url: reference.url.clone(),
                });
            }
            plan.token = resolve_token(explicit_token, credentials, hostname)?;
            let https = https_transport(&plan.token);
            plan.ssh_key = optional_ssh_key(credentials, hostname)?;
            if plan.ssh_key.is_some() {
                plan.transport = TransportKind::Ssh;
                plan.fallback = Some(https);
            } else {
                tracing::debug!("no ssh key for {hostname}; cloning over {https}");
                plan.transport = https;
            }
        }
    }
    Ok(plan)
}

fn https_transport(token: &Option<Token>) -> TransportKind {
    if token.is_some() {
        TransportKind::HttpsToken
    } else {
        TransportKind::HttpsAnonymous
    }
}

fn resolve_token(
    explicit: Option<&str>,
    credentials: &Credentials,
    hostname: &str,
) -> Result<Option<Token>> {
    match explicit.and_then(Token::new) {
        Some(token) => Ok(Some(token)),
        None => credentials.token(hostname),
    }
}

fn optional_ssh_key(
    credentials: &Credentials,
    hostname: &str,
) -> Result<Option<crate::domain::SshKey>> {
    match credentials.ssh_key(hostname) {
        Ok(key) => Ok(Some(key)),
        Err(err @ CloneError::SshKeyNotFound { .. }) => {
            tracing::debug!("{err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
