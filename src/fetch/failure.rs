//! Classification of failed transport attempts
//!
//! Only "repository not found" is terminal. Anything else (auth failures,
//! refused connections, host key problems) is retryable over the next
//! transport. Phrasings are matched as lowercase substrings.

/// Built-in not-found phrasings from GitHub, GitLab, BitBucket and git itself.
///
/// Keep these narrow: a bare "not found" would also match "host not found"
/// or "key not found", which must fall back to HTTPS.
pub const REPO_NOT_FOUND_PATTERNS: &[&str] = &[
    "repository not found",
    "repo not found",
    "remote: repository not found",
    "project not found",
    "the project you were looking for could not be found",
    "error: repository '",
    "fatal: repository '",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The remote says the repository does not exist (or is hidden from us).
    RepoNotFound,
    /// Auth, network or anything else; another transport may succeed.
    Retryable,
}

#[derive(Debug, Clone)]
pub struct FailureClassifier {
    not_found: Vec<String>,
}

impl Default for FailureClassifier {
    fn default() -> Self {
        Self::with_extra_patterns(&[])
    }
}

impl FailureClassifier {
    /// Built-in patterns plus operator-supplied ones.
    pub fn with_extra_patterns(extra: &[String]) -> Self {
        let not_found = REPO_NOT_FOUND_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().map(|p| p.trim().to_lowercase()).filter(|p| !p.is_empty()))
            .collect();
        Self { not_found }
    }

    pub fn classify(&self, output: &str) -> FailureClass {
        let lower = output.to_lowercase();
        if self.not_found.iter().any(|pattern| lower.contains(pattern.as_str())) {
            FailureClass::RepoNotFound
        } else {
            FailureClass::Retryable
        }
    }
}
