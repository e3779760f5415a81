//! Clone progress: shared state, output parser, and terminal renderer

pub mod render;
pub mod state;
pub mod tracker;

pub use render::RenderLoop;
pub use state::{Phase, ProgressHandle, ProgressState};
pub use tracker::ProgressTracker;
