//! Incremental parser for git's progress output
//!
//! ORDER MATTERS: measured patterns come before the `done.` marker (so that
//! `Resolving deltas: 100% (5/5), done.` still records 100%), and the bare
//! keyword fallbacks come last.

use super::state::{Phase, ProgressHandle, ProgressState};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::io;

#[derive(Debug, Clone, Copy)]
enum RuleAction {
    /// `P% (C/T)` with optional size and speed.
    Measured(Phase),
    /// `Enumerating objects: N`
    Counted(Phase),
    /// Recognized, no state change.
    Done,
    /// Keyword seen without numbers: phase change with zero progress.
    Keyword(Phase),
}

struct LineRule {
    pattern: Regex,
    action: RuleAction,
}

fn rule(pattern: &str, action: RuleAction) -> LineRule {
    LineRule { pattern: Regex::new(pattern).expect("valid progress regex"), action }
}

const MEASURE: &str = r":\s*(?P<pct>\d+)%\s*\((?P<cur>\d+)/(?P<total>\d+)\)";

static LINE_RULES: Lazy<Vec<LineRule>> = Lazy::new(|| {
    vec![
        rule(
            &format!(
                r"Receiving objects{MEASURE}(?:,\s*(?P<size>[0-9.]+\s*(?:[KMGT]iB|bytes)))?(?:\s*\|\s*(?P<speed>[0-9.]+\s*(?:[KMGT]iB|bytes)/s))?"
            ),
            RuleAction::Measured(Phase::Receiving),
        ),
        rule(&format!("Resolving deltas{MEASURE}"), RuleAction::Measured(Phase::Resolving)),
        rule(&format!("Compressing objects{MEASURE}"), RuleAction::Measured(Phase::Compressing)),
        rule(&format!("Counting objects{MEASURE}"), RuleAction::Measured(Phase::Counting)),
        rule(r"Enumerating objects:\s*(?P<total>\d+)", RuleAction::Counted(Phase::Enumerating)),
        rule(r"done\.?\s*$", RuleAction::Done),
        rule("Enumerating", RuleAction::Keyword(Phase::Enumerating)),
        rule("Counting", RuleAction::Keyword(Phase::Counting)),
        rule("Compressing", RuleAction::Keyword(Phase::Compressing)),
        rule("Receiving", RuleAction::Keyword(Phase::Receiving)),
        rule("Resolving", RuleAction::Keyword(Phase::Resolving)),
    ]
});

/// Single writer for a [`ProgressHandle`]. Accepts raw transport output via
/// [`io::Write`], splits it on `\n`/`\r` (treating `\r\n` as one break) and
/// applies each complete line in arrival order.
#[derive(Debug)]
pub struct ProgressTracker {
    handle: ProgressHandle,
    pending: Vec<u8>,
}

impl ProgressTracker {
    pub fn new(handle: ProgressHandle) -> Self {
        Self { handle, pending: Vec::with_capacity(4096) }
    }

    pub fn handle(&self) -> &ProgressHandle {
        &self.handle
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        let mut start = 0;
        let mut i = 0;
        while i < self.pending.len() {
            let b = self.pending[i];
            if b == b'\n' || b == b'\r' {
                let line = String::from_utf8_lossy(&self.pending[start..i]).into_owned();
                self.apply_line(&line);
                if b == b'\r' && self.pending.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            i += 1;
        }
        self.pending.drain(..start);
    }

    /// Apply whatever partial line is still buffered.
    pub fn finish_pending(&mut self) {
        if !self.pending.is_empty() {
            let line = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.apply_line(&line);
        }
    }

    pub fn apply_line(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        for rule in LINE_RULES.iter() {
            let Some(caps) = rule.pattern.captures(line) else {
                continue;
            };
            match rule.action {
                RuleAction::Measured(phase) => {
                    let speed = caps.name("speed").map_or_else(String::new, |m| m.as_str().to_string());
                    self.handle.set(ProgressState::new(
                        phase,
                        number(&caps, "pct"),
                        number(&caps, "cur"),
                        number(&caps, "total"),
                        speed,
                    ));
                }
                RuleAction::Counted(phase) => {
                    let total = number(&caps, "total");
                    self.handle.set(ProgressState::new(phase, 0, 0, total, String::new()));
                }
                RuleAction::Done => {}
                RuleAction::Keyword(phase) => {
                    self.handle.set(ProgressState::new(phase, 0, 0, 0, String::new()));
                }
            }
            return;
        }
    }
}

impl io::Write for ProgressTracker {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.feed(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.finish_pending();
        Ok(())
    }
}

fn number(caps: &Captures<'_>, name: &str) -> u64 {
    caps.name(name).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}
