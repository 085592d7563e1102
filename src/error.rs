use thiserror::Error;

/// Invalid configuration, rejected before the engine starts.
///
/// Nothing in this enum can occur during steady-state operation; every
/// variant is caught by `EngineConfig::validate` at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("frequency {0} Hz is outside the supported 0.008..=261.6 Hz range")]
    FrequencyOutOfRange(f64),
    #[error("buffer capacity must be at least 1")]
    ZeroCapacity,
    #[error("hold interval must be a positive number of seconds, got {0}")]
    InvalidHoldInterval(f64),
    #[error("viewport dimensions must be finite and positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}
