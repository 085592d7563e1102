//! Engine controller: owns the oscillator, tick source, sample buffer,
//! and ingestion slot, and runs the per-tick sampling step.
//!
//! The step executes on the tick thread. The owner thread constructs the
//! engine, starts and stops it, and reads published geometry; control
//! changes from any thread travel through an SPSC command ring and are
//! drained at the start of each step. Shutdown is synchronous: `stop`
//! clears the live flag and joins the tick thread, so no step can run
//! once it returns.

/// Control messages marshaled onto the tick thread.
pub mod command;

pub use command::EngineCommand;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rtrb::{Consumer, Producer, PushError, RingBuffer};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::{Oscillator, Waveform};
use crate::error::ConfigError;
use crate::scope::buffer::{DataPoint, SampleBuffer};
use crate::scope::path::{self, Geometry};
use crate::telemetry::{normalize_controller, IngestionSlot};
use crate::tick::{Tick, TickSource, TickState};
use crate::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/// Command ring depth. Control changes are rare next to ticks; the ring
/// only needs to absorb a burst between two drains.
const COMMAND_QUEUE_CAPACITY: usize = 64;

/// What drives the plotted value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Values come from the internal oscillator.
    Oscillator,
    /// Values come from the ingestion slot, holding the previous value
    /// on ticks where no telemetry arrived.
    Telemetry,
}

/// Construction-time options. Validated before anything starts.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Oscillator rate in Hz, within 0.008..=261.6.
    pub frequency_hz: f64,
    pub waveform: Waveform,
    pub mode: Mode,
    /// Sliding-window size in points.
    pub buffer_capacity: usize,
    /// Sample & hold redraw span in seconds. `None` holds for one cycle.
    pub hold_interval: Option<f64>,
    /// Host display refresh rate. `None` selects the interval fallback
    /// clock at the nominal rate.
    pub cadence_hz: Option<f64>,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 1.0,
            waveform: Waveform::Sine,
            mode: Mode::Oscillator,
            buffer_capacity: 512,
            hold_interval: None,
            cadence_hz: None,
            viewport_width: 1.0,
            viewport_height: 1.0,
        }
    }
}

impl EngineConfig {
    /// Reject invalid options. Everything caught here is unreachable at
    /// tick time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frequency_hz.is_finite()
            || self.frequency_hz < MIN_FREQUENCY_HZ
            || self.frequency_hz > MAX_FREQUENCY_HZ
        {
            return Err(ConfigError::FrequencyOutOfRange(self.frequency_hz));
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if let Some(seconds) = self.hold_interval {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(ConfigError::InvalidHoldInterval(seconds));
            }
        }
        let (width, height) = (self.viewport_width, self.viewport_height);
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(ConfigError::InvalidViewport { width, height });
        }
        Ok(())
    }
}

/// Everything the tick step mutates. Shared with the tick closure behind
/// a mutex; the owner thread takes the lock only for setup, inspection,
/// and tests, never per tick.
struct EngineState {
    oscillator: Oscillator,
    mode: Mode,
    buffer: SampleBuffer,
    viewport: (f64, f64),
    last_value: f64,
    last_tick_at: Option<Instant>,
    seq: u64,
    /// Snapshot scratch; reused so the steady-state step allocates only
    /// the published geometry.
    window: Vec<DataPoint>,
    rx: Consumer<EngineCommand>,
    sink: Option<Box<dyn FnMut(&Arc<Geometry>) + Send>>,
}

/// The engine. Lifecycle is independent of any host view: construct it
/// anywhere, hand the [`EngineHandle`] to controls and transports, and
/// point a rendering surface at [`Engine::latest_geometry`] or a sink.
pub struct Engine {
    state: Arc<Mutex<EngineState>>,
    slot: Arc<IngestionSlot>,
    published: Arc<Mutex<Arc<Geometry>>>,
    live: Arc<AtomicBool>,
    tick: TickSource,
}

/// Control endpoint, usable from any thread. Commands are applied on the
/// tick thread no later than the next tick.
pub struct EngineHandle {
    tx: Producer<EngineCommand>,
    slot: Arc<IngestionSlot>,
}

impl Engine {
    /// Validate the configuration and build the engine plus its control
    /// handle. Nothing runs until [`Engine::start`].
    pub fn new(config: EngineConfig) -> Result<(Engine, EngineHandle), ConfigError> {
        config.validate()?;

        let (tx, rx) = RingBuffer::new(COMMAND_QUEUE_CAPACITY);
        let mut oscillator = Oscillator::new(config.frequency_hz, config.waveform);
        oscillator.set_hold_interval(config.hold_interval);

        let slot = Arc::new(IngestionSlot::new());
        let viewport = (config.viewport_width, config.viewport_height);
        let state = EngineState {
            oscillator,
            mode: config.mode,
            buffer: SampleBuffer::new(config.buffer_capacity),
            viewport,
            last_value: 0.0,
            last_tick_at: None,
            seq: 0,
            window: Vec::with_capacity(config.buffer_capacity),
            rx,
            sink: None,
        };
        let published = Arc::new(Mutex::new(Arc::new(path::build(
            &[],
            viewport.0,
            viewport.1,
        ))));

        let engine = Engine {
            state: Arc::new(Mutex::new(state)),
            slot: Arc::clone(&slot),
            published,
            live: Arc::new(AtomicBool::new(false)),
            tick: TickSource::new(config.cadence_hz),
        };
        Ok((engine, EngineHandle { tx, slot }))
    }

    /// Register the geometry consumer, replacing any previous one. The
    /// sink runs on the tick thread, once per tick, after publication.
    pub fn on_geometry(&self, sink: impl FnMut(&Arc<Geometry>) + Send + 'static) {
        self.state.lock().unwrap().sink = Some(Box::new(sink));
    }

    /// Spin up the tick thread. Starting a running engine is a no-op.
    pub fn start(&mut self) {
        self.live.store(true, Ordering::Release);
        let state = Arc::clone(&self.state);
        let slot = Arc::clone(&self.slot);
        let published = Arc::clone(&self.published);
        let live = Arc::clone(&self.live);
        self.tick
            .start(move |tick| step(&state, &slot, &published, &live, tick));
    }

    /// Shut down. Blocks until the tick thread has joined; after return
    /// no step is running and none can start.
    pub fn stop(&mut self) {
        self.live.store(false, Ordering::Release);
        self.tick.stop();
    }

    /// The most recently published geometry. Replaced atomically, once
    /// per tick.
    pub fn latest_geometry(&self) -> Arc<Geometry> {
        Arc::clone(&self.published.lock().unwrap())
    }

    /// True when the engine is being driven by the interval fallback
    /// instead of a display-locked clock.
    pub fn is_fallback_clock(&self) -> bool {
        self.tick.is_fallback()
    }

    pub fn tick_state(&self) -> TickState {
        self.tick.state()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl EngineHandle {
    /// Request a new oscillator rate; out-of-range values are clamped.
    pub fn set_frequency(&mut self, hz: f64) {
        self.send(EngineCommand::SetFrequency(hz));
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.send(EngineCommand::SetWaveform(waveform));
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.send(EngineCommand::SetMode(mode));
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.send(EngineCommand::SetViewport { width, height });
    }

    /// Normalize a raw controller value (0..=127) and offer it to the
    /// engine. Never blocks; between two ticks only the newest value
    /// survives.
    pub fn push_raw(&self, raw: f32) {
        self.slot.write(normalize_controller(raw));
    }

    fn send(&mut self, command: EngineCommand) {
        let mut pending = command;
        loop {
            match self.tx.push(pending) {
                Ok(()) => break,
                Err(PushError::Full(returned)) => {
                    if self.tx.is_abandoned() {
                        // Engine gone; nothing left to control.
                        break;
                    }
                    pending = returned;
                    thread::sleep(Duration::from_micros(200));
                }
            }
        }
    }
}

/// One tick of the engine: drain control, sample, publish.
fn step(
    state: &Mutex<EngineState>,
    slot: &IngestionSlot,
    published: &Mutex<Arc<Geometry>>,
    live: &AtomicBool,
    tick: &Tick,
) {
    // Guarded in addition to the tick source's own join: a step may
    // never observe an engine whose owner has already asked it to stop.
    if !live.load(Ordering::Acquire) {
        return;
    }
    let mut state = state.lock().unwrap();
    // Destructure so buffer, oscillator, and scratch can be borrowed at
    // the same time.
    let EngineState {
        oscillator,
        mode,
        buffer,
        viewport,
        last_value,
        last_tick_at,
        seq,
        window,
        rx,
        sink,
    } = &mut *state;

    while let Ok(command) = rx.pop() {
        match command {
            EngineCommand::SetFrequency(hz) => oscillator.set_frequency(hz),
            EngineCommand::SetWaveform(waveform) => oscillator.set_waveform(waveform),
            EngineCommand::SetMode(new_mode) => *mode = new_mode,
            EngineCommand::SetViewport { width, height } => {
                if width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0 {
                    *viewport = (width, height);
                }
            }
        }
    }

    // True elapsed time from the tick's own clock; the first tick has no
    // predecessor and records the initial value without advancing.
    let delta = last_tick_at
        .map(|previous| tick.now.duration_since(previous).as_secs_f64())
        .unwrap_or(0.0);
    *last_tick_at = Some(tick.now);

    let value = match mode {
        Mode::Oscillator => oscillator.advance(delta),
        Mode::Telemetry => slot.take().map(f64::from).unwrap_or(*last_value),
    };
    *last_value = value;

    buffer.push(DataPoint { seq: *seq, value });
    *seq += 1;

    buffer.snapshot_into(window);
    let geometry = Arc::new(path::build(window, viewport.0, viewport.1));
    *published.lock().unwrap() = Arc::clone(&geometry);
    if let Some(sink) = sink {
        sink(&geometry);
    }
}
