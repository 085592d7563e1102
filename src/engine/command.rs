use crate::dsp::oscillator::Waveform;
use crate::engine::Mode;

/// Control changes marshaled onto the tick thread.
///
/// Commands are drained at the start of every engine step, so a change
/// issued from any thread takes effect no later than the next tick.
#[derive(Debug, Clone, Copy)]
pub enum EngineCommand {
    SetFrequency(f64),
    SetWaveform(Waveform),
    SetMode(Mode),
    SetViewport { width: f64, height: f64 },
}
