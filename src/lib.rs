//! gitr: clone git repositories to organized, deterministic paths
//!
//! A repository URL (SSH, HTTPS or a browser page) is normalized into a host
//! and repository path, mapped to a local directory through per-host policy,
//! and cloned over SSH with HTTPS as the fallback.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod url;
pub mod utils;
pub mod web;
