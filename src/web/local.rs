//! The git checkout the command runs in

use super::WebError;
use git2::Repository;
use std::fs;
use std::path::{Component, Path};

pub struct LocalRepo {
    repo: Repository,
    remote: String,
}

impl LocalRepo {
    /// Find the repository containing `dir`. `origin` is preferred; any
    /// other remote is used when there is no `origin`.
    pub fn discover(dir: &Path) -> Result<Self, WebError> {
        let repo = Repository::discover(dir).map_err(|_| WebError::NotInGitRepo(dir.to_path_buf()))?;
        let remote = match repo.find_remote("origin") {
            Ok(_) => "origin".to_string(),
            Err(_) => repo
                .remotes()
                .ok()
                .and_then(|names| names.iter().flatten().next().map(str::to_string))
                .ok_or(WebError::NoRemote)?,
        };
        Ok(Self { repo, remote })
    }

    pub fn remote_name(&self) -> &str {
        &self.remote
    }

    pub fn remote_url(&self) -> Result<String, WebError> {
        self.repo
            .find_remote(&self.remote)
            .ok()
            .and_then(|remote| remote.url().map(str::to_string))
            .ok_or(WebError::NoRemote)
    }

    /// Checked-out branch. An unborn branch (no commits yet) still counts.
    pub fn branch(&self) -> Result<String, WebError> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => head.shorthand().map(str::to_string).ok_or(WebError::NoBranch),
            Ok(_) => Err(WebError::NoBranch),
            Err(_) => self
                .repo
                .find_reference("HEAD")
                .ok()
                .and_then(|head| {
                    head.symbolic_target()
                        .and_then(|target| target.strip_prefix("refs/heads/"))
                        .map(str::to_string)
                })
                .ok_or(WebError::NoBranch),
        }
    }

    /// Whether the remote-tracking ref for `branch` exists.
    pub fn branch_on_remote(&self, branch: &str) -> bool {
        self.repo.find_reference(&format!("refs/remotes/{}/{branch}", self.remote)).is_ok()
    }

    /// The remote's default branch, from `refs/remotes/<remote>/HEAD`.
    pub fn default_branch(&self) -> Option<String> {
        let head = self.repo.find_reference(&format!("refs/remotes/{}/HEAD", self.remote)).ok()?;
        let prefix = format!("refs/remotes/{}/", self.remote);
        head.symbolic_target()?.strip_prefix(&prefix).map(str::to_string)
    }

    /// `file` (relative to `cwd` or absolute) as a `/`-separated path from
    /// the root of the working tree.
    pub fn relative_path(&self, cwd: &Path, file: &Path) -> Result<String, WebError> {
        let workdir = self.repo.workdir().ok_or_else(|| WebError::OutsideWorkTree(file.to_path_buf()))?;
        let workdir = fs::canonicalize(workdir)
            .map_err(|source| WebError::File { path: workdir.to_path_buf(), source })?;
        let target = cwd.join(file);
        let target =
            fs::canonicalize(&target).map_err(|source| WebError::File { path: target.clone(), source })?;
        let relative =
            target.strip_prefix(&workdir).map_err(|_| WebError::OutsideWorkTree(target.clone()))?;

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                _ => return Err(WebError::OutsideWorkTree(target.clone())),
            }
        }
        Ok(parts.join("/"))
    }
}
