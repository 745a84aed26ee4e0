use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    style::{Style, Modifier},
};

use crate::app::App;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(f.size());

    let entries = app.entries();
    let items = if app.pending_folder.is_some() {
        vec![ListItem::new("Loading...")]
    } else if entries.is_empty() {
        vec![ListItem::new("(empty folder)")]
    } else {
        entries.iter().map(|e| ListItem::new(e.as_str())).collect::<Vec<_>>()
    };

    let title = match (&app.pending_folder, app.current_folder()) {
        (Some(name), _) => name.clone(),
        (None, Some(folder)) => format!("{} · {}", folder.name, folder.path.display()),
        (None, None) => "Messages".to_string(),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if app.pending_folder.is_none() && !entries.is_empty() {
        state.select(Some(app.selected.min(entries.len() - 1)));
    }

    f.render_stateful_widget(list, chunks[0], &mut state);

    let help = Paragraph::new(format!(
        "{}   {}",
        app.status,
        "j/k or ↑↓ move · Enter open · Esc folders · o refresh · m layout · q quit"
    ))
        .wrap(Wrap { trim: true });

    f.render_widget(help, chunks[1]);
}
