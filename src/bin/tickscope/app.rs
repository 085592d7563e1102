//! ScopeApp - builder and runner for the terminal scope

use color_eyre::eyre::Result as EyreResult;

use tickscope::dsp::oscillator::Waveform;
use tickscope::engine::{Engine, EngineConfig};

use super::ui::UiApp;

/// Application builder. Collects an engine configuration, then takes
/// over the terminal.
pub struct ScopeApp {
    config: EngineConfig,
}

impl ScopeApp {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Oscillator rate in Hz.
    pub fn frequency(mut self, hz: f64) -> Self {
        self.config.frequency_hz = hz;
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.config.waveform = waveform;
        self
    }

    /// Points kept on screen.
    pub fn capacity(mut self, points: usize) -> Self {
        self.config.buffer_capacity = points;
        self
    }

    /// Display refresh rate. Skipping this runs the engine on its
    /// interval fallback clock.
    pub fn cadence(mut self, hz: f64) -> Self {
        self.config.cadence_hz = Some(hz);
        self
    }

    /// Build the engine, start it, and run the UI until quit.
    pub fn run(self) -> EyreResult<()> {
        let (mut engine, handle) = Engine::new(self.config.clone())?;
        engine.start();

        let terminal = ratatui::init();
        let result = UiApp::new(engine, handle, &self.config).run(terminal);
        ratatui::restore();
        result
    }
}

impl Default for ScopeApp {
    fn default() -> Self {
        Self::new()
    }
}
