use thiserror::Error;

/// Why a tick produced no new state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("simulated {field} is not a finite number")]
    NonFinite { field: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tick interval must be at least one millisecond")]
    ZeroTickInterval,
    #[error("history capacity must hold at least one sample")]
    ZeroHistoryCapacity,
}
