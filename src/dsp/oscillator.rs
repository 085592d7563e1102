use std::f64::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

/*
Phase-Accumulator Oscillator
============================

An oscillator is a position on a circle plus a speed. Everything else is
a function of that position.

Vocabulary
----------

  phase       Position within one cycle, in radians: 0 to 2π. The only
              piece of state the periodic math needs.

  progress    Phase normalized to 0..1. Most waveform shapes are easier
              to write in progress than in radians.

  accumulator The running phase variable. Each update adds the phase
              covered since the last update:

                  phase += 2π · frequency · elapsed_seconds
                  phase  = phase mod 2π

              The reduction happens on EVERY update. An accumulator that
              is allowed to grow and is only reduced occasionally loses
              precision once it gets large: at phase ≈ 10^9 an f64 has
              less than a microradian of resolution left, and a slow
              oscillator visibly stutters.

  elapsed     Real measured time between updates. The caller supplies it;
              nothing here assumes a fixed update rate, so the math stays
              correct when the drive cadence wobbles or changes.


Waveform Shapes
---------------

All shapes are pure in progress `p` and land in [-1, 1]:

  Sine         sin(2π·p)           smooth, the classic sweep
  Triangle     rise 0→1 over [0,.25)
               fall 1→-1 over [.25,.75)      constant-rate motion
               rise -1→0 over [.75,1)
  Sawtooth     2p - 1              gradual rise, instant reset
  Pulse        p < 0.5 ? 1 : -1    hard gating, fixed 50% duty
  S&H          random value held for a configurable span, then redrawn


Sample & Hold
-------------

Sample & hold is the one shape that is not pure in phase: it keeps a held
value and a countdown measured in radians of phase travel. When the
countdown crosses zero a fresh uniform value in [-1, 1] is drawn and the
countdown is re-armed. Measuring the span in phase travel (rather than
wall time) keeps the redraw rhythm proportional to the oscillator rate,
and a countdown longer than 2π simply spans several cycles.
*/

/// Waveform shapes the oscillator can produce.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Pulse,
    SampleAndHold,
}

impl Waveform {
    /// Human-readable name, for readouts.
    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Pulse => "pulse",
            Waveform::SampleAndHold => "s&h",
        }
    }

    /// The next shape in display order, wrapping at the end.
    pub fn next(self) -> Waveform {
        match self {
            Waveform::Sine => Waveform::Triangle,
            Waveform::Triangle => Waveform::Sawtooth,
            Waveform::Sawtooth => Waveform::Pulse,
            Waveform::Pulse => Waveform::SampleAndHold,
            Waveform::SampleAndHold => Waveform::Sine,
        }
    }
}

/// A low-frequency oscillator driven by measured elapsed time.
///
/// Advanced once per tick by the engine; never shared between threads.
pub struct Oscillator {
    phase: f64,
    frequency_hz: f64,
    waveform: Waveform,
    /// Sample & hold: the value currently held.
    held_value: f64,
    /// Sample & hold: radians of phase travel until the next redraw.
    next_change_phase: f64,
    /// Sample & hold redraw span in seconds. `None` holds for one cycle.
    hold_interval: Option<f64>,
    rng: StdRng,
}

impl Oscillator {
    /// Create an oscillator. Frequencies outside the supported range are
    /// clamped into it; validation with an error belongs to the engine
    /// configuration, before anything starts.
    pub fn new(frequency_hz: f64, waveform: Waveform) -> Self {
        Self::from_rng(frequency_hz, waveform, StdRng::from_entropy())
    }

    /// Same as [`Oscillator::new`], with a deterministic random sequence
    /// for the sample & hold shape.
    pub fn with_seed(frequency_hz: f64, waveform: Waveform, seed: u64) -> Self {
        Self::from_rng(frequency_hz, waveform, StdRng::seed_from_u64(seed))
    }

    fn from_rng(frequency_hz: f64, waveform: Waveform, rng: StdRng) -> Self {
        let mut oscillator = Self {
            phase: 0.0,
            frequency_hz: 1.0,
            waveform,
            held_value: 0.0,
            next_change_phase: 0.0,
            hold_interval: None,
            rng,
        };
        oscillator.set_frequency(frequency_hz);
        oscillator
    }

    /// Current phase in radians, always within `[0, 2π)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn frequency(&self) -> f64 {
        self.frequency_hz
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Change the rate, clamped to the supported range. Takes effect on
    /// the next [`advance`](Oscillator::advance); phase is preserved so a
    /// rate change never causes a jump in the output.
    pub fn set_frequency(&mut self, hz: f64) {
        let hz = if hz.is_finite() { hz } else { 1.0 };
        self.frequency_hz = hz.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ);
    }

    /// Switch the shape. Entering sample & hold re-arms the countdown so
    /// a fresh value is drawn on the next advance.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        if waveform == Waveform::SampleAndHold && self.waveform != Waveform::SampleAndHold {
            self.next_change_phase = 0.0;
        }
        self.waveform = waveform;
    }

    /// Set the sample & hold redraw span in seconds. `None` restores the
    /// default of one full cycle. Non-positive spans are ignored.
    pub fn set_hold_interval(&mut self, seconds: Option<f64>) {
        match seconds {
            Some(s) if s.is_finite() && s > 0.0 => self.hold_interval = Some(s),
            Some(_) => {}
            None => self.hold_interval = None,
        }
    }

    /// Return the phase to 0 and re-arm the sample & hold countdown.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.next_change_phase = 0.0;
    }

    /// Advance by measured elapsed time and produce the value at the new
    /// phase. Output is always within `[-1, 1]`.
    ///
    /// The phase is reduced modulo 2π on every call, so the accumulator
    /// never grows regardless of how long the oscillator runs.
    pub fn advance(&mut self, delta_seconds: f64) -> f64 {
        let delta_phase = TAU * self.frequency_hz * delta_seconds;
        self.phase = (self.phase + delta_phase).rem_euclid(TAU);

        let progress = self.phase / TAU;
        match self.waveform {
            Waveform::Sine => self.phase.sin(),
            Waveform::Triangle => triangle(progress),
            Waveform::Sawtooth => 2.0 * progress - 1.0,
            Waveform::Pulse => {
                if progress < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::SampleAndHold => self.sample_and_hold(delta_phase),
        }
    }

    fn sample_and_hold(&mut self, delta_phase: f64) -> f64 {
        self.next_change_phase -= delta_phase;
        let span = self.hold_phase_span();
        while self.next_change_phase <= 0.0 {
            self.held_value = self.rng.gen_range(-1.0..=1.0);
            self.next_change_phase += span;
        }
        self.held_value
    }

    /// Redraw span expressed in radians of phase travel.
    fn hold_phase_span(&self) -> f64 {
        match self.hold_interval {
            Some(seconds) => TAU * self.frequency_hz * seconds,
            None => TAU,
        }
    }
}

/// Piecewise-linear triangle over the four quarter-cycles of `p`.
#[inline]
fn triangle(p: f64) -> f64 {
    if p < 0.25 {
        4.0 * p
    } else if p < 0.75 {
        2.0 - 4.0 * p
    } else {
        4.0 * p - 4.0
    }
}
