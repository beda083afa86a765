//! Error types for simulation construction and snapshot extraction.

use thiserror::Error;

/// A construction knob was rejected before any grid was allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("seed radius must be non-negative, got {0}")]
    NegativeSeedRadius(f64),
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("region [{min_i}, {max_i}) x [{min_j}, {max_j}) is outside a {n}x{n} grid")]
    RegionOutOfBounds {
        min_i: usize,
        min_j: usize,
        max_i: usize,
        max_j: usize,
        n: usize,
    },
}
