mod charts;
mod help;
mod state;

use crate::model::{LatencyReport, Protocol};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use state::UiState;
use std::io;

/// Show the chart and block until the user closes it.
pub fn run(report: &LatencyReport) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let res = Terminal::new(backend)
        .context("create terminal")
        .and_then(|mut terminal| {
            terminal.clear().ok();
            let mut state = UiState::new(report);
            event_loop(&mut terminal, report, &mut state)
        });

    // Restore the terminal whether or not the loop failed.
    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    report: &LatencyReport,
    state: &mut UiState,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| draw(f.area(), f, report, state))
            .context("draw chart")?;

        // Nothing changes between key presses, so block on input; resizes redraw.
        match event::read().context("read terminal event")? {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                if handle_key(state, k) {
                    return Ok(());
                }
            }
            _ => {}
        }
    }
}

/// Apply a key press to the UI state. Returns true when the view should close.
fn handle_key(state: &mut UiState, k: KeyEvent) -> bool {
    match (k.modifiers, k.code) {
        (_, KeyCode::Char('q'))
        | (_, KeyCode::Esc)
        | (KeyModifiers::CONTROL, KeyCode::Char('c')) => return true,
        (_, KeyCode::Char('1')) => state.toggle(Protocol::Tcp),
        (_, KeyCode::Char('2')) => state.toggle(Protocol::Quic),
        (_, KeyCode::Char('3')) => state.toggle(Protocol::Udp),
        (_, KeyCode::Char('?')) => state.show_help = !state.show_help,
        _ => {}
    }
    false
}

fn draw(area: Rect, f: &mut ratatui::Frame, report: &LatencyReport, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(area);

    if state.show_help {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
            .split(rows[0]);
        charts::draw_latency_chart(cols[0], f, report, state);
        help::draw_help(cols[1], f);
    } else {
        charts::draw_latency_chart(rows[0], f, report, state);
    }

    let mut spans = vec![
        Span::styled("q", Style::default().fg(Color::Magenta)),
        Span::raw(" quit  "),
        Span::styled("1-3", Style::default().fg(Color::Magenta)),
        Span::raw(" toggle series  "),
        Span::styled("?", Style::default().fg(Color::Magenta)),
        Span::raw(" help"),
    ];
    if !state.info.is_empty() {
        spans.push(Span::raw("  | "));
        spans.push(Span::styled(
            state.info.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BucketAverage, ProtocolSeries, SampleUnit};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;
    use std::time::Duration;

    fn report() -> LatencyReport {
        let counts: Vec<u32> = (1..=10).map(|i| i * 20).collect();
        let series = [
            (Protocol::Tcp, 50),
            (Protocol::Quic, 65),
            (Protocol::Udp, 80),
        ]
        .into_iter()
        .map(|(protocol, ms)| ProtocolSeries {
            protocol,
            buckets: counts
                .iter()
                .map(|&client_count| BucketAverage {
                    client_count,
                    average: Duration::from_millis(ms),
                    samples: 1,
                })
                .collect(),
        })
        .collect();
        LatencyReport {
            generated_at_utc: "2024-01-01T00:00:00Z".into(),
            base_dir: PathBuf::from("data"),
            sample_unit: SampleUnit::Microseconds,
            client_counts: counts,
            series,
            plotted: vec![Protocol::Tcp, Protocol::Udp],
        }
    }

    fn render(report: &LatencyReport, state: &UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| draw(f.area(), f, report, state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn chart_shows_plotted_series_only() {
        let report = report();
        let state = UiState::new(&report);

        let screen = render(&report, &state);

        assert!(screen.contains("Average latency per client count"));
        assert!(screen.contains("TCP"));
        assert!(screen.contains("UDP"));
        assert!(!screen.contains("QUIC"));
    }

    #[test]
    fn toggling_quic_adds_it_to_the_chart() {
        let report = report();
        let mut state = UiState::new(&report);

        assert!(!handle_key(&mut state, press('2')));
        assert_eq!(state.visible, Protocol::ALL.to_vec());
        assert!(render(&report, &state).contains("QUIC"));
    }

    #[test]
    fn hiding_everything_shows_a_placeholder() {
        let report = report();
        let mut state = UiState::new(&report);
        handle_key(&mut state, press('1'));
        handle_key(&mut state, press('3'));

        assert!(state.visible.is_empty());
        assert!(render(&report, &state).contains("No series selected."));
    }

    #[test]
    fn quit_keys_close_the_view() {
        let report = report();
        let mut state = UiState::new(&report);
        assert!(handle_key(&mut state, press('q')));
        assert!(handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
        ));
        assert!(handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!handle_key(&mut state, press('?')));
        assert!(state.show_help);
    }
}
