//! Scrolling graph widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use tickscope::scope::path::Geometry;

/// Render the published geometry. Geometry y grows downward while the
/// chart's y axis grows upward, so the vertical coordinate is flipped
/// here.
pub fn render_graph(frame: &mut Frame, area: Rect, geometry: &Geometry) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = geometry
        .points
        .iter()
        .map(|&(x, y)| (x, geometry.height - y))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, geometry.width])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, geometry.height])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
