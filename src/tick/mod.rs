//! Tick delivery locked to the host display cadence.
//!
//! A [`TickSource`] owns one dedicated thread that fires a callback at
//! the display refresh rate. Two scheduling backends exist:
//!
//! - **Frame-locked**: when the host reports its display cadence,
//!   deadlines are placed on the absolute grid `epoch + n * period`. A
//!   late wake-up does not push later deadlines back, so the cadence
//!   never drifts, and the predicted next fire is exact grid arithmetic.
//! - **Interval fallback**: when no cadence is available, a plain
//!   fixed-period sleep loop at the nominal refresh rate. Lower
//!   precision, not frame-locked; each sleep is relative, so lateness
//!   accumulates. Surfaced through [`TickSource::is_fallback`], never as
//!   an error.
//!
//! The shutdown contract is the load-bearing part: [`TickSource::stop`]
//! joins the tick thread before returning. The callback closure is owned
//! by that thread, so once `stop` returns there is no code path left
//! that could fire it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::NOMINAL_REFRESH_HZ;

/// One fire of the tick thread.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Monotonic tick counter, starting at 0 for each run.
    pub seq: u64,
    /// When this tick actually fired. Consumers derive elapsed time from
    /// this, never from the nominal period.
    pub now: Instant,
    /// Best-effort estimate of the next fire. Grid-exact under frame
    /// lock, extrapolated under the fallback timer.
    pub predicted_next: Option<Instant>,
}

/// Lifecycle states. The only legal path is
/// Stopped -> Starting -> Running -> Stopping -> Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TickState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl TickState {
    fn from_u8(raw: u8) -> TickState {
        match raw {
            1 => TickState::Starting,
            2 => TickState::Running,
            3 => TickState::Stopping,
            _ => TickState::Stopped,
        }
    }
}

/// How ticks are scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickDriver {
    /// Absolute-grid deadlines at the host display cadence.
    FrameLock { cadence_hz: f64 },
    /// Relative fixed-period sleeps at the nominal refresh rate.
    Interval { period: Duration },
}

/// Refresh-locked tick thread with a joining stop.
pub struct TickSource {
    state: Arc<AtomicU8>,
    driver: TickDriver,
    fallback: bool,
    thread: Option<JoinHandle<()>>,
}

impl TickSource {
    /// `cadence_hz` is the host display refresh rate, if the host can
    /// report one. `None`, or a cadence that is not finite and positive,
    /// selects the interval fallback.
    pub fn new(cadence_hz: Option<f64>) -> Self {
        let (driver, fallback) = match cadence_hz {
            Some(hz) if hz.is_finite() && hz > 0.0 => {
                (TickDriver::FrameLock { cadence_hz: hz }, false)
            }
            _ => (
                TickDriver::Interval {
                    period: Duration::from_secs_f64(1.0 / NOMINAL_REFRESH_HZ),
                },
                true,
            ),
        };
        Self {
            state: Arc::new(AtomicU8::new(TickState::Stopped as u8)),
            driver,
            fallback,
            thread: None,
        }
    }

    pub fn state(&self) -> TickState {
        TickState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// True when no display cadence was available and the lower-precision
    /// interval timer is driving ticks.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn driver(&self) -> TickDriver {
        self.driver
    }

    /// Spawn the tick thread. A source that is already starting or
    /// running is left untouched; the supplied callback is dropped.
    pub fn start<F>(&mut self, mut callback: F)
    where
        F: FnMut(&Tick) + Send + 'static,
    {
        if self.state() != TickState::Stopped {
            return;
        }
        self.state
            .store(TickState::Starting as u8, Ordering::Release);

        let state = Arc::clone(&self.state);
        let driver = self.driver;
        self.thread = Some(thread::spawn(move || {
            // Stop can be requested before the first tick; entering
            // Running must not overwrite it.
            if state
                .compare_exchange(
                    TickState::Starting as u8,
                    TickState::Running as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_err()
            {
                return;
            }
            match driver {
                TickDriver::FrameLock { cadence_hz } => {
                    run_frame_locked(&state, cadence_hz, &mut callback)
                }
                TickDriver::Interval { period } => run_interval(&state, period, &mut callback),
            }
        }));
    }

    /// Request shutdown and block until the tick thread has exited.
    ///
    /// This is a synchronization point, not best-effort: after `stop`
    /// returns, no callback is in flight and none can fire.
    pub fn stop(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };
        self.state
            .store(TickState::Stopping as u8, Ordering::Release);
        let _ = handle.join();
        self.state.store(TickState::Stopped as u8, Ordering::Release);
    }
}

impl Drop for TickSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleep until `deadline`, waking early if the source leaves Running.
/// Returns false when the loop should exit instead of firing.
fn keep_until(state: &AtomicU8, deadline: Instant) -> bool {
    // Sleep in short slices so a stop request is honored promptly even
    // at very low cadences.
    const SLICE: Duration = Duration::from_millis(4);
    loop {
        if state.load(Ordering::Acquire) != TickState::Running as u8 {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(SLICE));
    }
}

fn run_frame_locked(state: &AtomicU8, cadence_hz: f64, callback: &mut dyn FnMut(&Tick)) {
    let period = Duration::from_secs_f64(1.0 / cadence_hz);
    let epoch = Instant::now();
    let mut seq = 0u64;
    loop {
        // Deadlines come from the epoch, not the previous wake-up, so a
        // late tick does not shift the grid.
        let deadline = epoch + period.mul_f64((seq + 1) as f64);
        if !keep_until(state, deadline) {
            break;
        }
        let tick = Tick {
            seq,
            now: Instant::now(),
            predicted_next: Some(deadline + period),
        };
        callback(&tick);
        seq += 1;
    }
}

fn run_interval(state: &AtomicU8, period: Duration, callback: &mut dyn FnMut(&Tick)) {
    let mut seq = 0u64;
    loop {
        let wake = Instant::now() + period;
        if !keep_until(state, wake) {
            break;
        }
        let now = Instant::now();
        let tick = Tick {
            seq,
            now,
            predicted_next: Some(now + period),
        };
        callback(&tick);
        seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::sync::Mutex;

    #[test]
    fn missing_cadence_selects_the_fallback_timer() {
        assert!(TickSource::new(None).is_fallback());
        assert!(TickSource::new(Some(f64::NAN)).is_fallback());
        assert!(TickSource::new(Some(0.0)).is_fallback());
        assert!(TickSource::new(Some(-60.0)).is_fallback());
        assert!(!TickSource::new(Some(60.0)).is_fallback());
    }

    #[test]
    fn fresh_source_is_stopped() {
        assert_eq!(TickSource::new(Some(60.0)).state(), TickState::Stopped);
    }

    #[test]
    fn ticks_fire_while_running_and_freeze_after_stop() {
        let count = Arc::new(AtomicU64::new(0));
        let mut source = TickSource::new(Some(200.0));
        {
            let count = Arc::clone(&count);
            source.start(move |_| {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }
        thread::sleep(Duration::from_millis(100));
        source.stop();
        assert_eq!(source.state(), TickState::Stopped);

        let frozen = count.load(Ordering::Relaxed);
        assert!(frozen >= 2, "expected ticks in 100ms at 200 Hz, got {frozen}");
        thread::sleep(Duration::from_millis(50));
        assert_eq!(count.load(Ordering::Relaxed), frozen);
    }

    #[test]
    fn start_while_running_keeps_the_first_callback() {
        let count = Arc::new(AtomicU64::new(0));
        let mut source = TickSource::new(Some(200.0));
        {
            let count = Arc::clone(&count);
            source.start(move |_| {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }
        // Second start must be a no-op; its callback is dropped.
        source.start(|_| panic!("replacement callback must never fire"));
        thread::sleep(Duration::from_millis(60));
        source.stop();
        assert!(count.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn source_can_restart_after_a_stop() {
        let count = Arc::new(AtomicU64::new(0));
        let mut source = TickSource::new(Some(200.0));
        for _ in 0..2 {
            let count = Arc::clone(&count);
            source.start(move |_| {
                count.fetch_add(1, Ordering::Relaxed);
            });
            thread::sleep(Duration::from_millis(50));
            source.stop();
        }
        assert!(count.load(Ordering::Relaxed) >= 2);
    }

    #[test]
    fn ticks_are_ordered_and_predict_forward() {
        let seen: Arc<Mutex<Vec<Tick>>> = Arc::new(Mutex::new(Vec::new()));
        let mut source = TickSource::new(Some(200.0));
        {
            let seen = Arc::clone(&seen);
            source.start(move |tick| {
                seen.lock().unwrap().push(*tick);
            });
        }
        thread::sleep(Duration::from_millis(100));
        source.stop();

        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 2);
        for pair in seen.windows(2) {
            assert_eq!(pair[1].seq, pair[0].seq + 1);
            assert!(pair[1].now >= pair[0].now);
        }
        for tick in seen.iter() {
            // Both drivers supply a best-effort prediction. Under load a
            // tick can fire later than its own prediction, so only
            // presence is asserted here.
            assert!(tick.predicted_next.is_some());
        }
    }

    #[test]
    fn fallback_timer_also_delivers_ticks() {
        let count = Arc::new(AtomicU64::new(0));
        let mut source = TickSource::new(None);
        {
            let count = Arc::clone(&count);
            source.start(move |_| {
                count.fetch_add(1, Ordering::Relaxed);
            });
        }
        // Nominal 60 Hz: 200ms comfortably covers several periods.
        thread::sleep(Duration::from_millis(200));
        source.stop();
        assert!(count.load(Ordering::Relaxed) >= 2);
    }
}
