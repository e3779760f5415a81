//! Shared clone progress state

use std::sync::{Arc, PoisonError, RwLock};

/// Phases of a git clone, in the order git reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Phase {
    #[default]
    Starting,
    Enumerating,
    Counting,
    Compressing,
    Receiving,
    Resolving,
    Done,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Starting => "Connecting",
            Phase::Enumerating => "Enumerating objects",
            Phase::Counting => "Counting objects",
            Phase::Compressing => "Compressing objects",
            Phase::Receiving => "Receiving objects",
            Phase::Resolving => "Resolving deltas",
            Phase::Done => "Done",
        }
    }

    /// Phases that carry work (not the start/end markers).
    pub fn is_active(self) -> bool {
        !matches!(self, Phase::Starting | Phase::Done)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub phase: Phase,
    /// 0..=100
    pub percentage: u8,
    pub current: u64,
    pub total: u64,
    pub speed: String,
}

impl ProgressState {
    pub fn new(phase: Phase, percentage: u64, current: u64, total: u64, speed: String) -> Self {
        Self { phase, percentage: percentage.min(100) as u8, current, total, speed }
    }
}

/// Lock-guarded progress shared by the tracker (writer) and renderer (reader).
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<RwLock<ProgressState>>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ProgressState {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, state: ProgressState) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Back to `Starting`; called before every transport attempt.
    pub fn reset(&self) {
        self.set(ProgressState::default());
    }

    pub fn finish(&self) {
        self.set(ProgressState::new(Phase::Done, 100, 0, 0, String::new()));
    }
}
