//! tickscope - terminal scope for the oscillator and telemetry engine
//!
//! Run with: cargo run

mod app;
mod ui;

use app::ScopeApp;
use tickscope::dsp::oscillator::Waveform;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    ScopeApp::new()
        .frequency(1.0)
        .waveform(Waveform::Sine)
        .cadence(60.0)
        .capacity(480)
        .run()
}
