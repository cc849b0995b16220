//! Per-epoch statistics.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::HistoryError;

/// Outcome of one completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochSummary {
    /// Zero-based epoch index.
    pub epoch: u32,
    /// Lowest cost among the agents alive at epoch end; `None` if none survived.
    pub best_cost: Option<f32>,
    /// Mean cost of the agents alive at epoch end; `None` if none survived.
    pub mean_cost: Option<f32>,
    /// Number of agents alive at epoch end.
    pub survivors: usize,
    /// Wall-clock start of the epoch.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the epoch.
    pub finished_at: DateTime<Utc>,
}

/// Ordered record of every completed epoch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpochHistory {
    /// Summaries in epoch order.
    pub epochs: Vec<EpochSummary>,
}

impl EpochHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a summary.
    pub fn record(&mut self, summary: EpochSummary) {
        self.epochs.push(summary);
    }

    /// Most recent summary.
    pub fn last(&self) -> Option<&EpochSummary> {
        self.epochs.last()
    }

    /// Best cost of each epoch, in order; `None` for epochs without survivors.
    pub fn best_costs(&self) -> Vec<Option<f32>> {
        self.epochs.iter().map(|e| e.best_cost).collect()
    }

    /// Saves the history to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a history from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
