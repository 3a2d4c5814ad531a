// src/config/store.rs

//! Holder of the active configuration snapshot.
//!
//! The snapshot is published through an `ArcSwap`: a reload installs a
//! fully built replacement with a single pointer store, and concurrent
//! readers observe either the old or the new snapshot in full, never a
//! mix.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info};

use crate::config::loader;
use crate::config::model::WormholeConfig;
use crate::errors::Result;

pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwap<WormholeConfig>,
}

impl ConfigStore {
    /// Load the initial snapshot from `path`.
    ///
    /// A failure here is fatal to the caller; there is no previous snapshot
    /// to fall back to at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "parsing wormhole configuration");

        let config = loader::load_from_path(&path)?;
        debug!(?config, "configuration loaded");

        Ok(Self {
            path,
            current: ArcSwap::from_pointee(config),
        })
    }

    /// The latest successfully loaded snapshot.
    pub fn current(&self) -> Arc<WormholeConfig> {
        self.current.load_full()
    }

    /// Re-read the configuration file and swap the new snapshot in.
    ///
    /// On failure the previous snapshot stays active and the error goes
    /// back to the caller.
    pub fn reload(&self) -> Result<()> {
        let config = loader::load_from_path(&self.path)?;
        self.current.store(Arc::new(config));
        info!(path = %self.path.display(), "configuration reloaded");
        Ok(())
    }
}
