//! Deterministic clone locations

use crate::domain::{HostPolicy, RepoReference};
use crate::error::{CloneError, Result};
use std::path::{Component, Path, PathBuf};

/// Compute where `reference` is cloned.
///
/// Hierarchy mode yields `{home}/[{host}/]{repo_path}`; otherwise every repo
/// lands flat at `{home}/{repo_name}`. `home` is the first of the host's
/// override, the global override, and `cwd`.
///
/// The result is always strictly below `home`: a segment that is empty,
/// `.`, `..` or absolute is rejected.
pub fn resolve_clone_path(
    reference: &RepoReference,
    policy: &HostPolicy,
    force_create_dir_hierarchy: bool,
    global_home: Option<&Path>,
    cwd: &Path,
) -> Result<PathBuf> {
    let home = scm_home(policy, global_home, cwd);
    let mut path = home.to_path_buf();
    for segment in relative_clone_path(reference, policy, force_create_dir_hierarchy).split('/') {
        if !is_plain_component(segment) {
            return Err(CloneError::UnparsableUrl {
                url: reference.url.clone(),
                reason: "repository path would resolve outside the clone home",
            });
        }
        path.push(segment);
    }
    Ok(path)
}

fn is_plain_component(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(c)), None) if c == segment)
}

/// Whether the nested `owner/repo` layout applies.
pub fn uses_dir_hierarchy(policy: &HostPolicy, force_create_dir_hierarchy: bool) -> bool {
    force_create_dir_hierarchy || policy.always_create_dir_hierarchy
}

pub fn scm_home<'a>(
    policy: &'a HostPolicy,
    global_home: Option<&'a Path>,
    cwd: &'a Path,
) -> &'a Path {
    policy
        .home_dir
        .as_deref()
        .filter(|p| !p.as_os_str().is_empty())
        .or(global_home.filter(|p| !p.as_os_str().is_empty()))
        .unwrap_or(cwd)
}

fn relative_clone_path(
    reference: &RepoReference,
    policy: &HostPolicy,
    force_create_dir_hierarchy: bool,
) -> String {
    if !uses_dir_hierarchy(policy, force_create_dir_hierarchy) {
        return reference.repo_name().to_string();
    }
    if policy.include_host_in_dir_hierarchy {
        format!("{}/{}", reference.hostname, reference.repo_path)
    } else {
        reference.repo_path.clone()
    }
}
