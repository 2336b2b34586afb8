use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(key: &'static str, pad: usize, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(action),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        keybind("1", 11, "Toggle TCP"),
        keybind("2", 11, "Toggle QUIC"),
        keybind("3", 11, "Toggle UDP"),
        keybind("?", 11, "Show/hide this help"),
        Line::from(""),
        Line::from("Markers:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("TCP", Style::default().fg(Color::Green)),
            Span::raw("  dots"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("QUIC", Style::default().fg(Color::Magenta)),
            Span::raw(" braille"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("UDP", Style::default().fg(Color::Cyan)),
            Span::raw("  blocks"),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
