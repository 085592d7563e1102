//! Status readout - frequency, nearest note, waveform, mode, and clock

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use tickscope::dsp::oscillator::Waveform;
use tickscope::dsp::pitch;
use tickscope::engine::Mode;

/// Everything the readout bar displays for one frame.
pub struct ReadoutState {
    pub frequency_hz: f64,
    pub waveform: Waveform,
    pub mode: Mode,
    pub fallback_clock: bool,
    pub controller_value: f32,
    pub points_on_screen: usize,
}

/// Render the readout bar
pub fn render_readout(frame: &mut Frame, area: Rect, state: &ReadoutState) {
    let block = Block::default().title(" tickscope ").borders(Borders::ALL);

    let (note, cents) = pitch::note_and_cents(state.frequency_hz);
    let note_label = pitch::note_name(note);

    let mode_label = match state.mode {
        Mode::Oscillator => "oscillator",
        Mode::Telemetry => "telemetry",
    };
    let clock_label = if state.fallback_clock {
        "interval (fallback)"
    } else {
        "frame-locked"
    };

    let mut spans = vec![
        Span::styled(
            format!(" {:.3} Hz  ", state.frequency_hz),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{note_label} {cents:+.0}¢  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{}  ", state.waveform.label()),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("{mode_label}  "),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("{clock_label}  "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} pts", state.points_on_screen),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if state.mode == Mode::Telemetry {
        spans.push(Span::styled(
            format!("  CC {:>3.0}", state.controller_value),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
