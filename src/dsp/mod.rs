//! Deterministic periodic-function math used by the engine.
//!
//! These components are pure and allocation-free. They know nothing about
//! ticks, threads, or rendering; the engine drives them with elapsed time
//! and hands their output to the scope layer.

/// Phase-accumulator oscillator and waveform shapes.
pub mod oscillator;
/// Frequency to control-value and frequency to note conversions.
pub mod pitch;

pub use oscillator::{Oscillator, Waveform};
