//! Persistent storage for the best network of the last completed epoch.
//!
//! The store is a single text file holding one serialized network. Writes
//! replace the whole file; a failed write leaves the previous champion intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use super::brain::Network;
use super::error::ChampionError;

/// File-backed holder of the champion network.
#[derive(Debug, Clone)]
pub struct ChampionStore {
    path: PathBuf,
}

impl ChampionStore {
    /// Creates a store backed by `path`; the file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the champion file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the champion as text, or `None` if no champion was stored yet.
    pub fn load_raw(&self) -> Result<Option<String>, ChampionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads and decodes the champion for `topology`.
    ///
    /// A missing file is `Ok(None)`; unreadable or malformed content is an error.
    pub fn load(&self, topology: &[usize]) -> Result<Option<Network>, ChampionError> {
        match self.load_raw()? {
            Some(text) => Ok(Some(Network::deserialize(&text, topology)?)),
            None => Ok(None),
        }
    }

    /// Overwrites the store with an already serialized network.
    pub fn save_raw(&self, serialized: &str) -> Result<(), ChampionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serialized)?;
        info!(path = %self.path.display(), "champion saved");
        Ok(())
    }

    /// Overwrites the store with `network`.
    pub fn save(&self, network: &Network) -> Result<(), ChampionError> {
        self.save_raw(&network.serialize())
    }
}
