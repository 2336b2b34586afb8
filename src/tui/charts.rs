use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::state::UiState;
use crate::model::{LatencyReport, Protocol};

/// Colour and point marker per protocol; TCP and UDP never share a marker.
pub fn protocol_style(protocol: Protocol) -> (Color, Marker) {
    match protocol {
        Protocol::Tcp => (Color::Green, Marker::Dot),
        Protocol::Quic => (Color::Magenta, Marker::Braille),
        Protocol::Udp => (Color::Cyan, Marker::Block),
    }
}

/// X bounds padded by half a step so edge points are not drawn on the axis.
pub fn x_bounds(client_counts: &[u32]) -> [f64; 2] {
    let (Some(first), Some(last)) = (client_counts.first(), client_counts.last()) else {
        return [0.0, 1.0];
    };
    let (first, last) = (*first as f64, *last as f64);
    let pad = if client_counts.len() > 1 {
        (last - first) / (client_counts.len() - 1) as f64 / 2.0
    } else {
        1.0
    };
    [first - pad, last + pad]
}

/// Y bounds from zero to 10% above the highest visible point.
pub fn y_bounds(points: &[Vec<(f64, f64)>]) -> [f64; 2] {
    let max = points
        .iter()
        .flatten()
        .map(|(_, y)| *y)
        .fold(0.0_f64, |a, b| a.max(b));
    if max > 0.0 {
        [0.0, max * 1.1]
    } else {
        [0.0, 1.0]
    }
}

fn labels(bounds: [f64; 2], precision: usize) -> Vec<Line<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| Line::from(format!("{:.*}", precision, v)))
        .collect()
}

pub fn draw_latency_chart(area: Rect, f: &mut Frame, report: &LatencyReport, state: &UiState) {
    let shown: Vec<Protocol> = Protocol::ALL
        .into_iter()
        .filter(|p| state.is_visible(*p))
        .filter(|p| report.series_for(*p).is_some())
        .collect();

    let title = Line::from(format!(
        "Average latency per client count ({})",
        report.base_dir.display()
    ));

    if shown.is_empty() {
        let empty = Paragraph::new("No series selected.")
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    // Points must outlive the datasets borrowing them.
    let points: Vec<Vec<(f64, f64)>> = shown
        .iter()
        .filter_map(|p| report.series_for(*p))
        .map(|s| s.points_ms())
        .collect();

    let datasets: Vec<Dataset> = shown
        .iter()
        .zip(points.iter())
        .map(|(protocol, data)| {
            let (color, marker) = protocol_style(*protocol);
            Dataset::default()
                .name(protocol.dir_name())
                .marker(marker)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let xb = x_bounds(&report.client_counts);
    let yb = y_bounds(&points);

    let x_axis = Axis::default()
        .title("Clients")
        .style(Style::default().fg(Color::Gray))
        .bounds(xb)
        .labels(labels(xb, 0));
    let y_axis = Axis::default()
        .title("Avg latency (ms)")
        .style(Style::default().fg(Color::Gray))
        .bounds(yb)
        .labels(labels(yb, 1));

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(x_axis)
        .y_axis(y_axis)
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(chart, area);
}
