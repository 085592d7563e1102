//! Frequency conversions for control mapping and note display.
//!
//! Two small families of pure functions: a logarithmic control-value
//! mapping (so a linear slider sweeps octaves evenly across a range
//! spanning four orders of magnitude), and the frequency-to-MIDI-note
//! conversion used to label a rate with the nearest pitch.

/// Note names within one octave, sharps convention.
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Map a frequency in Hz onto the logarithmic control scale.
///
/// The control value is `log10(hz)`, so equal control steps are equal
/// frequency ratios. Inverse of [`frequency_from_control`].
///
/// # Example
/// ```
/// use tickscope::dsp::pitch::control_from_frequency;
/// assert!((control_from_frequency(100.0) - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn control_from_frequency(hz: f64) -> f64 {
    hz.log10()
}

/// Map a control value back onto a frequency in Hz.
#[inline]
pub fn frequency_from_control(control: f64) -> f64 {
    10f64.powf(control)
}

/// Convert a frequency to a fractional MIDI note number.
///
/// Reference pitch: A4 = 440 Hz = note 69.
///
/// # Example
/// ```
/// use tickscope::dsp::pitch::midi_note_from_frequency;
/// assert_eq!(midi_note_from_frequency(440.0), 69.0);
/// ```
#[inline]
pub fn midi_note_from_frequency(hz: f64) -> f64 {
    12.0 * (hz / 440.0).log2() + 69.0
}

/// Convert a fractional MIDI note number to a frequency in Hz.
#[inline]
pub fn frequency_from_midi_note(note: f64) -> f64 {
    440.0 * 2f64.powf((note - 69.0) / 12.0)
}

/// Round a frequency to the nearest MIDI note plus the cents offset.
///
/// Cents are signed: positive means sharp of the returned note.
pub fn note_and_cents(hz: f64) -> (i32, f64) {
    let note = midi_note_from_frequency(hz);
    let nearest = note.round();
    (nearest as i32, (note - nearest) * 100.0)
}

/// Format a MIDI note number as a name, e.g. `60` -> `"C4"`.
///
/// Octaves follow the middle-C-is-C4 convention, so note 0 is `"C-1"`.
pub fn note_name(note: i32) -> String {
    let semitone = note.rem_euclid(12) as usize;
    let octave = note.div_euclid(12) - 1;
    format!("{}{}", NOTE_NAMES[semitone], octave)
}
