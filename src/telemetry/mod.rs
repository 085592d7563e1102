//! Ingestion of externally produced control values.
//!
//! Telemetry arrives on whatever thread the transport happens to use and
//! is sampled once per tick by the engine. The hand-off is a single
//! latest-value slot: a write replaces anything unread, a take clears the
//! slot. Values that arrive between two ticks are dropped by design; this
//! is a sampling surface, not an event log.

use std::sync::atomic::{AtomicU64, Ordering};

/// Bit set alongside the payload when the slot holds an unread value.
const PRESENT: u64 = 1 << 32;

/// A one-value cell with latest-write-wins semantics.
///
/// Payload and presence flag live in one `AtomicU64`, so both sides are
/// a single atomic operation: the writer can never be blocked by the
/// engine's cadence, and a take observes the value and clears the flag
/// indivisibly.
#[derive(Debug, Default)]
pub struct IngestionSlot {
    cell: AtomicU64,
}

impl IngestionSlot {
    pub const fn new() -> Self {
        Self {
            cell: AtomicU64::new(0),
        }
    }

    /// Store a value, replacing any unread one. Callable from any thread;
    /// never blocks, never fails.
    pub fn write(&self, value: f32) {
        self.cell
            .store(u64::from(value.to_bits()) | PRESENT, Ordering::Release);
    }

    /// Read and clear in one swap. `None` when nothing arrived since the
    /// previous take. Intended for the single consumer on the tick thread.
    pub fn take(&self) -> Option<f32> {
        let raw = self.cell.swap(0, Ordering::AcqRel);
        (raw & PRESENT != 0).then(|| f32::from_bits(raw as u32))
    }
}

/// Map a raw controller value onto the bipolar scale the scope plots.
///
/// The convention: raw telemetry is MIDI controller data, `0..=127`.
/// Input is clamped, then mapped linearly so 0 -> -1, 127 -> +1. This
/// puts telemetry on the same vertical axis as the oscillator output.
#[inline]
pub fn normalize_controller(raw: f32) -> f32 {
    raw.clamp(0.0, 127.0) / 127.0 * 2.0 - 1.0
}
