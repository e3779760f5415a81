//! Clone transports
//!
//! SSH clones shell out to `git` so that `~/.ssh/config`, agents and known
//! hosts behave exactly as they do for the operator. HTTPS clones run
//! in-process through libgit2 with an optional token.

use crate::domain::{SshKey, Token};
use crate::progress::ProgressTracker;
use crate::utils::format_bytes;
use git2::{build::RepoBuilder, Cred, FetchOptions, RemoteCallbacks};
use std::cell::{Cell, RefCell};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Username paired with a token when the URL carries none.
pub const DEFAULT_TOKEN_USER: &str = "x-access-token";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One clone attempt.
pub struct CloneRequest<'a> {
    pub url: &'a str,
    pub dest: &'a Path,
    pub ssh_key: Option<&'a SshKey>,
    pub token: Option<&'a Token>,
    /// Set from the interrupt handler; transports abort when they see it.
    pub cancel: &'a AtomicBool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// Everything the remote and the git client said.
    pub output: String,
    pub interrupted: bool,
}

impl TransportFailure {
    pub fn failed(output: impl Into<String>) -> Self {
        Self { output: output.into(), interrupted: false }
    }

    pub fn interrupted(output: impl Into<String>) -> Self {
        Self { output: output.into(), interrupted: true }
    }
}

pub trait Transport: Send + Sync {
    /// Clone `request.url` into `request.dest`, feeding progress output to
    /// `progress` as it arrives.
    fn clone_repo(
        &self,
        request: &CloneRequest<'_>,
        progress: ProgressTracker,
    ) -> Result<(), TransportFailure>;
}

/// `git clone --progress` as a child process.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self { program: PathBuf::from("git") }
    }
}

impl GitCli {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn command(&self, request: &CloneRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("clone")
            .arg("--progress")
            .arg(request.url)
            .arg(request.dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.env("GIT_SSH_COMMAND", ssh_command(request.ssh_key.map(|key| key.path.as_path())));
        cmd
    }
}

impl Transport for GitCli {
    fn clone_repo(
        &self,
        request: &CloneRequest<'_>,
        mut progress: ProgressTracker,
    ) -> Result<(), TransportFailure> {
        tracing::debug!("running {} clone --progress {}", self.program.display(), request.url);
        let mut child = self
            .command(request)
            .spawn()
            .map_err(|e| TransportFailure::failed(format!("failed to run {}: {e}", self.program.display())))?;

        let stderr = child.stderr.take();
        let reader = thread::spawn(move || {
            let mut captured = Vec::new();
            if let Some(mut stderr) = stderr {
                let mut buf = [0u8; 4096];
                loop {
                    match stderr.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            progress.feed(&buf[..n]);
                            captured.extend_from_slice(&buf[..n]);
                        }
                    }
                }
            }
            progress.finish_pending();
            String::from_utf8_lossy(&captured).into_owned()
        });

        match wait_or_kill(&mut child, request.cancel) {
            // Grandchildren (ssh, remote helpers) may keep the pipe open after
            // a kill, so the reader is left to finish on its own.
            Wait::Killed => Err(TransportFailure::interrupted("interrupted")),
            Wait::Failed(err) => {
                Err(TransportFailure::failed(format!("failed waiting for git: {err}")))
            }
            Wait::Exited(status) => {
                let output = reader.join().unwrap_or_default();
                if status.success() {
                    Ok(())
                } else {
                    tracing::debug!("git exited with {status}");
                    Err(TransportFailure::failed(output.trim().to_string()))
                }
            }
        }
    }
}

enum Wait {
    Exited(ExitStatus),
    Killed,
    Failed(std::io::Error),
}

fn wait_or_kill(child: &mut Child, cancel: &AtomicBool) -> Wait {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Wait::Exited(status),
            Ok(None) => {
                if cancel.load(Ordering::SeqCst) {
                    stop(child);
                    return Wait::Killed;
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                stop(child);
                return Wait::Failed(err);
            }
        }
    }
}

/// Kill and reap; the child may already be gone.
fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Value for `GIT_SSH_COMMAND`. Prompts are always disabled; a key also
/// pins the identity.
fn ssh_command(key: Option<&Path>) -> String {
    match key {
        Some(key) => {
            let quoted = key.to_string_lossy().replace('\'', r"'\''");
            format!("ssh -i '{quoted}' -o IdentitiesOnly=yes -o BatchMode=yes")
        }
        None => "ssh -o BatchMode=yes".to_string(),
    }
}

/// In-process HTTPS clone through libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Libgit2;

impl Transport for Libgit2 {
    fn clone_repo(
        &self,
        request: &CloneRequest<'_>,
        progress: ProgressTracker,
    ) -> Result<(), TransportFailure> {
        let tracker = RefCell::new(progress);
        let remote_output = RefCell::new(Vec::<u8>::new());
        let offered_token = Cell::new(false);
        let cancel = request.cancel;

        let result = {
            let mut callbacks = RemoteCallbacks::new();
            callbacks.sideband_progress(|data| {
                tracker.borrow_mut().feed(data);
                remote_output.borrow_mut().extend_from_slice(data);
                !cancel.load(Ordering::SeqCst)
            });
            callbacks.transfer_progress(|stats| {
                if cancel.load(Ordering::SeqCst) {
                    return false;
                }
                let line = transfer_line(&TransferStats {
                    received_objects: stats.received_objects(),
                    total_objects: stats.total_objects(),
                    received_bytes: stats.received_bytes(),
                    indexed_deltas: stats.indexed_deltas(),
                    total_deltas: stats.total_deltas(),
                });
                tracker.borrow().apply_line(&line);
                true
            });
            if let Some(token) = request.token {
                let user = crate::url::http_username(request.url).unwrap_or(DEFAULT_TOKEN_USER);
                callbacks.credentials(move |_url, _user, _allowed| {
                    // libgit2 keeps asking while the server rejects us.
                    if offered_token.replace(true) {
                        return Err(git2::Error::from_str("token was rejected by the server"));
                    }
                    Cred::userpass_plaintext(user, token.expose())
                });
            }

            let mut fetch = FetchOptions::new();
            fetch.remote_callbacks(callbacks);
            let mut builder = RepoBuilder::new();
            builder.fetch_options(fetch);
            builder.clone(request.url, request.dest).map(drop)
        };
        tracker.into_inner().finish_pending();

        result.map_err(|err| {
            let remote = String::from_utf8_lossy(&remote_output.into_inner()).trim().to_string();
            let output = if remote.is_empty() {
                err.message().to_string()
            } else {
                format!("{remote}\n{}", err.message())
            };
            if cancel.load(Ordering::SeqCst) {
                TransportFailure::interrupted(output)
            } else {
                TransportFailure::failed(output)
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct TransferStats {
    received_objects: usize,
    total_objects: usize,
    received_bytes: usize,
    indexed_deltas: usize,
    total_deltas: usize,
}

/// Render libgit2 transfer stats the way `git clone --progress` prints them.
fn transfer_line(stats: &TransferStats) -> String {
    if stats.total_deltas > 0 && stats.received_objects == stats.total_objects {
        format!(
            "Resolving deltas: {}% ({}/{})",
            percent(stats.indexed_deltas, stats.total_deltas),
            stats.indexed_deltas,
            stats.total_deltas
        )
    } else {
        format!(
            "Receiving objects: {}% ({}/{}), {}",
            percent(stats.received_objects, stats.total_objects),
            stats.received_objects,
            stats.total_objects,
            format_bytes(stats.received_bytes as u64)
        )
    }
}

fn percent(done: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        done * 100 / total
    }
}
