//! Live terminal view of clone progress
//!
//! The render loop is the only writer to the terminal while a transport runs.
//! It polls the shared [`ProgressHandle`] on a fixed tick and may skip
//! intermediate states; it always draws the last state before it exits.

use super::state::{Phase, ProgressHandle, ProgressState};
use crate::utils::format_with_commas;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_millis(80);
const STOP_GRACE: Duration = Duration::from_millis(200);

/// Handle to a running render thread.
pub struct RenderLoop {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl RenderLoop {
    pub fn start(progress: ProgressHandle, cancel: Arc<AtomicBool>) -> Self {
        let (stop, stop_rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("gitr-progress".to_string())
            .spawn(move || {
                let mut view = ProgressView::new();
                loop {
                    match stop_rx.recv_timeout(TICK) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if cancel.load(Ordering::SeqCst) {
                        break;
                    }
                    view.draw(&progress.snapshot());
                }
                view.draw(&progress.snapshot());
                view.close();
            })
            .map_err(|e| tracing::warn!("progress display unavailable: {e}"))
            .ok();
        Self { stop, thread }
    }

    /// Signal the thread, wait a short grace period, then let it go.
    pub fn stop(mut self) {
        let _ = self.stop.send(());
        let Some(thread) = self.thread.take() else {
            return;
        };
        let deadline = Instant::now() + STOP_GRACE;
        while !thread.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        if thread.is_finished() {
            let _ = thread.join();
        } else {
            tracing::debug!("progress thread did not stop within {:?}; detaching", STOP_GRACE);
        }
    }
}

struct ProgressView {
    bar: ProgressBar,
    measured: ProgressStyle,
    waiting: ProgressStyle,
    last_phase: Phase,
}

impl ProgressView {
    fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stderr());
        let measured = ProgressStyle::with_template(
            "   {spinner:.blue} {msg:.dim} {bar:25.cyan/blue} {prefix}",
        )
        .expect("valid progress template")
        .progress_chars("█░");
        let waiting = ProgressStyle::with_template("   {spinner:.blue} {msg:.dim}...")
            .expect("valid progress template");
        bar.set_style(waiting.clone());
        bar.set_message(Phase::Starting.label());
        Self { bar, measured, waiting, last_phase: Phase::Starting }
    }

    fn draw(&mut self, state: &ProgressState) {
        if state.phase != self.last_phase {
            if self.last_phase.is_active() && state.phase > self.last_phase {
                self.bar.println(format!(
                    "   {} {}",
                    style("✓").green(),
                    style(format!("{}: done", self.last_phase.label())).dim()
                ));
            }
            self.last_phase = state.phase;
        }
        if state.phase == Phase::Done {
            return;
        }

        self.bar.set_message(state.phase.label());
        if state.total > 0 && state.percentage > 0 {
            self.bar.set_style(self.measured.clone());
            self.bar.set_position(u64::from(state.percentage));
            self.bar.set_prefix(stats(state));
        } else {
            self.bar.set_style(self.waiting.clone());
        }
        self.bar.tick();
    }

    fn close(self) {
        self.bar.finish_and_clear();
    }
}

/// `45% (450/1,000), 2.40 MiB/s`
fn stats(state: &ProgressState) -> String {
    let mut out = format!(
        "{}% ({}/{})",
        state.percentage,
        format_with_commas(state.current),
        format_with_commas(state.total)
    );
    if !state.speed.is_empty() {
        out.push_str(", ");
        out.push_str(&state.speed);
    }
    out
}
