use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, RootField};

fn line(app: &App, field: RootField, label: &str, value: &str) -> String {
    let prefix = if app.root_edit.focus == field { "▶ " } else { "  " };
    format!("{prefix}{label:<8} {value}")
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(f.size());

    let mut s = String::new();

    s.push_str("MAILDIR\n");
    s.push_str(&line(app, RootField::Path, "root", &app.root_edit.path)); s.push('\n');

    s.push('\n');
    s.push_str("VIEW\n");
    s.push_str(&line(app, RootField::Layout, "layout", app.root_edit.layout.as_str())); s.push('\n');

    s.push('\n');
    s.push_str(&format!("config: {}\n", app.config_path.display()));

    let body = Paragraph::new(s)
        .block(Block::default().borders(Borders::ALL).title("Load Maildir"))
        .wrap(Wrap { trim: false });

    f.render_widget(body, chunks[0]);

    let help = Paragraph::new(format!(
        "{}   {}",
        app.status,
        "Tab switch field · Space toggle layout · Ctrl+S save & load · Ctrl+E editor · Esc back"
    ));
    f.render_widget(help, chunks[1]);
}
