use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(f.size());

    let title = match app.entries().get(app.selected) {
        Some(entry) => format!("Mail · {entry}"),
        None => "Mail".to_string(),
    };

    let body = Paragraph::new(app.detail.as_str())
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.body_scroll, 0));

    f.render_widget(body, chunks[0]);

    let help = Paragraph::new(format!(
        "{}   {}",
        app.status,
        "j/k or ↑↓ scroll · Esc back · m layout · l load maildir · q quit"
    ));
    f.render_widget(help, chunks[1]);
}
