//! Provider-aware repo path extraction

use super::{parse, ParsedUrl};
use crate::domain::{Provider, UrlKind};
use crate::error::{CloneError, Result};

/// Repo path of `raw` under the URL grammar of `provider`.
pub fn repo_path_for(raw: &str, provider: Provider) -> Result<String> {
    let parsed = parse(raw)?;
    extract(&parsed, provider).ok_or_else(|| CloneError::UnparsableUrl {
        url: raw.trim().to_string(),
        reason: "could not find owner/repo in the URL path",
    })
}

pub(super) fn extract(parsed: &ParsedUrl, provider: Provider) -> Option<String> {
    let segments: Vec<&str> = parsed.segments.iter().map(String::as_str).collect();
    let path = match parsed.kind {
        UrlKind::SshGit | UrlKind::HttpsGit => clone_url_path(&segments, provider, parsed.kind),
        UrlKind::BrowserPage => browser_path(&segments, provider)?,
    };
    let path = path.strip_suffix(".git").unwrap_or(&path);
    if path.contains(['?', '#']) || !path.split('/').all(is_path_segment) {
        return None;
    }
    Some(path.to_string())
}

fn is_path_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

/// Clone URLs name the repository with their whole path (nested GitLab
/// groups included). Datacenter HTTPS URLs carry a leading `scm/`.
fn clone_url_path(segments: &[&str], provider: Provider, kind: UrlKind) -> String {
    let segments = match (provider, kind, segments) {
        (Provider::BitBucketDatacenter, UrlKind::HttpsGit, ["scm", rest @ ..]) if !rest.is_empty() => {
            rest
        }
        _ => segments,
    };
    segments.join("/")
}

/// Browser pages: the repository is the first two segments; everything
/// after (`tree/<ref>`, `pull/<n>`, ...) is page navigation.
fn browser_path(segments: &[&str], provider: Provider) -> Option<String> {
    match provider {
        Provider::GitLab => {
            if let Some(sep) = segments.iter().position(|s| *s == "-") {
                return (sep >= 2).then(|| segments[..sep].join("/"));
            }
        }
        Provider::BitBucketDatacenter => {
            if let ["projects", project, "repos", repo, ..] = segments {
                return Some(format!("{project}/{repo}"));
            }
        }
        _ => {}
    }
    match segments {
        [owner, repo, ..] => Some(format!("{owner}/{repo}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_browser_urls() {
        let cases = [
            ("https://github.com/owner/repo", "owner/repo"),
            ("https://github.com/owner/repo.git", "owner/repo"),
            (
                "https://github.com/sarwarbeing-ai/Agentic_Design_Patterns/tree/main",
                "sarwarbeing-ai/Agentic_Design_Patterns",
            ),
            ("https://github.com/owner/repo/tree/feature-branch", "owner/repo"),
            ("https://github.com/owner/repo/tree/main/src/pkg", "owner/repo"),
            ("https://github.com/owner/repo/blob/main/README.md", "owner/repo"),
            ("https://github.com/owner/repo/blob/v1.0.0/file.go", "owner/repo"),
            ("https://github.com/owner/repo/commits/main", "owner/repo"),
            ("https://github.com/owner/repo/pull/123", "owner/repo"),
            ("https://github.com/owner/repo/issues/456", "owner/repo"),
            ("https://github.com/owner/repo/compare/main...feature", "owner/repo"),
        ];
        for (url, expected) in cases {
            assert_eq!(repo_path_for(url, Provider::GitHub).expect(url), expected, "{url}");
        }
    }

    #[test]
    fn ssh_and_https_clone_urls_keep_full_path() {
        assert_eq!(
            repo_path_for("git@github.com:swarupdonepudi/gitr.git", Provider::GitHub).expect("scp"),
            "swarupdonepudi/gitr"
        );
        assert_eq!(
            repo_path_for("https://gitlab.com/parent/sub/sub2/project-name.git", Provider::GitLab)
                .expect("nested"),
            "parent/sub/sub2/project-name"
        );
        assert_eq!(
            repo_path_for("https://swarup@github.com:swarupdonepudi/gitr.git", Provider::GitHub)
                .expect("user + colon"),
            "swarupdonepudi/gitr"
        );
    }

    #[test]
    fn gitlab_browser_urls_stop_at_dash_separator() {
        let cases = [
            ("https://gitlab.com/group/sub/project/-/tree/main", "group/sub/project"),
            ("https://gitlab.com/owner/repo/-/merge_requests/7", "owner/repo"),
            ("https://gitlab.com/owner/repo", "owner/repo"),
        ];
        for (url, expected) in cases {
            assert_eq!(repo_path_for(url, Provider::GitLab).expect(url), expected, "{url}");
        }
        assert!(repo_path_for("https://gitlab.com/owner/-/issues", Provider::GitLab).is_err());
    }

    #[test]
    fn bitbucket_datacenter_shapes() {
        let dc = Provider::BitBucketDatacenter;
        assert_eq!(
            repo_path_for("https://git.corp.example/scm/proj/repo.git", dc).expect("https"),
            "proj/repo"
        );
        assert_eq!(
            repo_path_for("ssh://git@git.corp.example:7999/proj/repo.git", dc).expect("ssh"),
            "proj/repo"
        );
        assert_eq!(
            repo_path_for("https://git.corp.example/projects/PROJ/repos/repo/browse", dc)
                .expect("browse"),
            "PROJ/repo"
        );
    }

    #[test]
    fn browser_url_needs_owner_and_repo() {
        assert!(repo_path_for("https://github.com/owner", Provider::GitHub).is_err());
    }

    #[test]
    fn dot_segments_are_rejected() {
        let cases = [
            ("https://github.com/owner/..", Provider::GitHub),
            ("https://github.com/owner/.", Provider::GitHub),
            ("git@github.com:../x.git", Provider::GitHub),
            ("https://github.com/a/../b.git", Provider::GitHub),
            ("https://gitlab.com/group/../-/tree/main", Provider::GitLab),
            ("https://github.com/owner/.git", Provider::GitHub),
        ];
        for (url, provider) in cases {
            assert!(
                matches!(repo_path_for(url, provider), Err(CloneError::UnparsableUrl { .. })),
                "{url} should not parse"
            );
        }
        assert_eq!(
            repo_path_for("https://github.com/owner/.github", Provider::GitHub).expect("dotfile repo"),
            "owner/.github"
        );
    }
}
