// src/config/mod.rs

//! Configuration loading and snapshot management for wormhole.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load and validate a config file from disk (`loader.rs`).
//! - Publish the active snapshot and swap it atomically on reload
//!   (`store.rs`).

pub mod loader;
pub mod model;
pub mod store;

pub use loader::{default_config_path, default_log_path, load_from_path, parse};
pub use model::{AppSpec, DEFAULT_ADDR, MappingRule, RawConfig, WormholeConfig};
pub use store::ConfigStore;
