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

    let items = if app.folders.is_empty() {
        vec![ListItem::new("No folders (press o to refresh, l to load another Maildir)")]
    } else {
        app.folders.iter().map(|folder| ListItem::new(folder.name.as_str())).collect::<Vec<_>>()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("Mail Folders · {}", app.root_display())))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !app.folders.is_empty() {
        state.select(Some(app.folder_selected.min(app.folders.len() - 1)));
    }

    f.render_stateful_widget(list, chunks[0], &mut state);

    let help = Paragraph::new(format!(
        "{}   {}",
        app.status,
        "j/k or ↑↓ move · Enter open · o refresh · l load maildir · m layout · q quit"
    ))
        .wrap(Wrap { trim: true });

    f.render_widget(help, chunks[1]);
}
