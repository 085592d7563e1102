//! TUI for tickscope
//!
//! A scrolling graph of the published geometry plus a status readout.
//! The engine runs on its own tick thread; this loop only polls the
//! latest geometry and forwards key presses as engine commands.

mod graph;
mod readout;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use tickscope::dsp::oscillator::Waveform;
use tickscope::dsp::pitch;
use tickscope::engine::{Engine, EngineConfig, EngineHandle, Mode};
use tickscope::scope::path::Geometry;
use tickscope::{MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ};

use graph::render_graph;
use readout::{render_readout, ReadoutState};

/// Step applied to the control value (log10 of Hz) per key press, so
/// each press is the same frequency ratio anywhere in the range.
const CONTROL_STEP: f64 = 0.05;
/// Simulated controller increment for the telemetry keys.
const CC_STEP: f32 = 8.0;

/// UI application state
pub struct UiApp {
    engine: Engine,
    handle: EngineHandle,
    // UI-side shadows of engine settings; the authoritative copies live
    // on the tick thread and follow commands one tick later.
    frequency_hz: f64,
    waveform: Waveform,
    mode: Mode,
    cc_value: f32,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: Engine, handle: EngineHandle, config: &EngineConfig) -> Self {
        Self {
            engine,
            handle,
            frequency_hz: config.frequency_hz,
            waveform: config.waveform,
            mode: config.mode,
            cc_value: 64.0,
            should_quit: false,
        }
    }

    /// Run the UI event loop, stopping the engine on exit.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            let geometry = self.engine.latest_geometry();
            terminal.draw(|frame| self.render(frame, &geometry))?;

            // Non-blocking input poll at roughly the display cadence.
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.stop();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.waveform = self.waveform.next();
                self.handle.set_waveform(self.waveform);
            }
            KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => {
                self.step_frequency(CONTROL_STEP);
            }
            KeyCode::Down | KeyCode::Char('-') => {
                self.step_frequency(-CONTROL_STEP);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.mode = match self.mode {
                    Mode::Oscillator => Mode::Telemetry,
                    Mode::Telemetry => Mode::Oscillator,
                };
                self.handle.set_mode(self.mode);
            }
            KeyCode::Char('k') | KeyCode::Char('K') => self.nudge_controller(CC_STEP),
            KeyCode::Char('j') | KeyCode::Char('J') => self.nudge_controller(-CC_STEP),
            _ => {}
        }
    }

    /// Move the frequency by a fixed ratio via the logarithmic control
    /// scale.
    fn step_frequency(&mut self, control_delta: f64) {
        let control = pitch::control_from_frequency(self.frequency_hz) + control_delta;
        self.frequency_hz =
            pitch::frequency_from_control(control).clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ);
        self.handle.set_frequency(self.frequency_hz);
    }

    /// Simulate an external controller feeding the telemetry slot.
    fn nudge_controller(&mut self, delta: f32) {
        self.cc_value = (self.cc_value + delta).clamp(0.0, 127.0);
        self.handle.push_raw(self.cc_value);
    }

    fn render(&self, frame: &mut Frame, geometry: &Geometry) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Readout bar
                Constraint::Min(8),    // Graph
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let readout = ReadoutState {
            frequency_hz: self.frequency_hz,
            waveform: self.waveform,
            mode: self.mode,
            fallback_clock: self.engine.is_fallback_clock(),
            controller_value: self.cc_value,
            points_on_screen: geometry.points.len(),
        };
        render_readout(frame, chunks[0], &readout);
        render_graph(frame, chunks[1], geometry);

        let help = Paragraph::new(
            " [Q] Quit  [W] Waveform  [↑/↓] Frequency  [M] Mode  [J/K] Controller",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}
