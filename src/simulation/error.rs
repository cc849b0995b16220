//! Error types for network codecs, configuration, champion persistence and the
//! evolution loop.

use thiserror::Error;

/// Errors raised while building, evaluating or decoding a [`Network`](super::brain::Network).
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The topology has fewer than two layers.
    #[error("topology needs at least an input and an output layer")]
    EmptyTopology,
    /// A layer of the topology has no neurons.
    #[error("layer {0} of the topology has no neurons")]
    ZeroWidthLayer(usize),
    /// `forward` was called with an input vector of the wrong length.
    #[error("expected {expected} inputs, got {found}")]
    InputLength {
        /// Width of the input layer.
        expected: usize,
        /// Length of the vector that was passed.
        found: usize,
    },
    /// The serialized token stream does not match the topology size.
    #[error("expected {expected} serialized values, found {found}")]
    TokenCount {
        /// Number of values the topology requires.
        expected: usize,
        /// Number of values present in the stream.
        found: usize,
    },
    /// A token could not be parsed as a finite decimal number.
    #[error("value {index} is not a finite number: {token:?}")]
    InvalidToken {
        /// Zero-based position of the token in the stream.
        index: usize,
        /// The offending token.
        token: String,
    },
    /// Reading or writing a network file failed.
    #[error("network file i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading, saving or validating [`Params`](super::params::Params).
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The configuration file could not be read or written.
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid JSON for `Params`.
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration is internally inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while writing or reading the epoch history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The history file could not be read or written.
    #[error("history i/o: {0}")]
    Io(#[from] std::io::Error),
    /// The history file is not valid JSON.
    #[error("history json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the persistent champion store.
#[derive(Debug, Error)]
pub enum ChampionError {
    /// The champion file could not be read or written.
    #[error("champion i/o: {0}")]
    Io(#[from] std::io::Error),
    /// The champion file exists but does not decode into the configured topology.
    #[error("malformed champion: {0}")]
    Network(#[from] NetworkError),
}

/// Errors that abort the evolution loop.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A network contract was violated during a tick.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// The configuration was rejected.
    #[error(transparent)]
    Params(#[from] ParamsError),
}
