pub mod dsp;
pub mod engine; // Tick-driven sampling and geometry publication
pub mod scope; // Bounded buffering and path construction
pub mod telemetry;
pub mod tick; // Refresh-locked tick thread

mod error;

pub use error::ConfigError;

/// Lowest oscillator frequency the engine accepts, in Hz.
pub const MIN_FREQUENCY_HZ: f64 = 0.008;
/// Highest oscillator frequency the engine accepts, in Hz.
pub const MAX_FREQUENCY_HZ: f64 = 261.6;
/// Cadence assumed when the host cannot report its display refresh rate.
pub const NOMINAL_REFRESH_HZ: f64 = 60.0;
