// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually starting the apps that clients
//! invoke, using `tokio::process::Command`, and for draining their output
//! into the log while they run detached from the request path.
//!
//! - [`launcher`] owns the [`Launcher`] trait and the production
//!   [`ProcessLauncher`] implementation.

pub mod launcher;

pub use launcher::{Launcher, ProcessLauncher};
