use ratatui::Frame;
use crate::app::{App, View};

mod folders;
mod list;
mod view;
mod root;

pub fn draw(f: &mut Frame, app: &App) {
    match app.view {
        View::Folders => folders::draw(f, app),
        View::Messages => list::draw(f, app),
        View::Mail => view::draw(f, app),
        View::Root => root::draw(f, app),
    }
}
