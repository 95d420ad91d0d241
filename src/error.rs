//! Error types.

/// Invalid solver configuration or degenerate input.
///
/// Raised before any generation runs; a correctly configured run has no
/// run-time failure modes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    EmptyPopulation,

    #[error("at least one city is required")]
    NoCities,

    #[error("{name} must be between 0.0 and 1.0, got: {value}")]
    RatioOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be positive, got: {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// Failure of a [`Solver`](crate::Solver) operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolverError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cities are fixed once the first generation has run; reset first")]
    RunInProgress,
}
