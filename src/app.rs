use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::{expand_home, Config};
use crate::mail::session::{folders_or_empty, render_detail};
use crate::mail::{DetailLayout, Folder, FolderSnapshot, MailError, Mailbox};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Folders,
    Messages,
    Mail,
    Root,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RootField {
    Path,
    Layout,
}

pub struct RootEditState {
    pub focus: RootField,
    pub path: String,
    pub layout: DetailLayout,
}

impl RootEditState {
    pub fn from_config(c: &Config) -> Self {
        Self {
            focus: RootField::Path,
            path: c.maildir.root.clone(),
            layout: c.view.layout,
        }
    }
}

pub struct App {
    pub view: View,
    pub return_view: View,

    pub mailbox: Option<Mailbox>,

    pub folders: Vec<Folder>,
    pub folder_selected: usize,
    pub pending_folder: Option<String>,

    pub selected: usize,

    pub detail: String,
    pub detail_ticket: u64,
    pub body_scroll: u16,

    pub layout: DetailLayout,

    pub root_edit: RootEditState,
    pub config_path: PathBuf,

    pub status: String,

    pub config: Config,
}

impl App {
    fn new(config: Config, config_path: PathBuf, layout: DetailLayout) -> Self {
        Self {
            view: View::Folders,
            return_view: View::Folders,

            mailbox: None,

            folders: vec![],
            folder_selected: 0,
            pending_folder: None,

            selected: 0,

            detail: String::new(),
            detail_ticket: 0,
            body_scroll: 0,

            layout,

            root_edit: RootEditState::from_config(&config),
            config_path,

            status: String::new(),

            config,
        }
    }

    /// Entries of the folder currently on screen.
    pub fn entries(&self) -> &[String] {
        self.mailbox
            .as_ref()
            .and_then(|m| m.snapshot())
            .map(|s| s.entries())
            .unwrap_or_default()
    }

    pub fn current_folder(&self) -> Option<&Folder> {
        self.mailbox
            .as_ref()
            .and_then(|m| m.snapshot())
            .map(|s| s.folder())
    }

    pub fn root_display(&self) -> String {
        self.mailbox
            .as_ref()
            .map(|m| m.root().display().to_string())
            .unwrap_or_else(|| "(no maildir)".to_string())
    }
}

enum AppMsg {
    Folders { root: PathBuf, folders: Vec<Folder> },
    Listing(FolderSnapshot),
    ListingFailed { generation: u64, error: MailError },
    Detail { ticket: u64, text: String },
}

fn clamp_dec(v: usize) -> usize {
    v.saturating_sub(1)
}

struct TuiGuard;
impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

pub async fn run(
    root: Option<PathBuf>,
    layout: Option<DetailLayout>,
    config: Option<PathBuf>,
) -> Result<()> {
    let (config, created, config_path) = match config {
        Some(path) => Config::load_or_create_at(path)?,
        None => Config::load_or_create()?,
    };
    let (tx, mut rx) = mpsc::unbounded_channel::<AppMsg>();

    let layout = layout.unwrap_or(config.view.layout);
    let mut app = App::new(config.clone(), config_path, layout);

    match root.or_else(|| config.root_path()) {
        Some(root) => open_root(&mut app, root, &tx),
        None => {
            app.view = View::Root;
            app.status = if created {
                "config.toml created. Enter a Maildir root and press Ctrl+S.".to_string()
            } else {
                "Enter a Maildir root and press Ctrl+S.".to_string()
            };
        }
    }

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, crossterm::cursor::Hide)?;
    let _guard = TuiGuard;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        while let Ok(msg) = rx.try_recv() {
            apply_msg(&mut app, msg);
        }

        terminal.draw(|f| crate::ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Resize(_, _) => {
                    terminal.clear()?;
                    continue;
                }
                Event::Key(k) => {
                    if k.kind != KeyEventKind::Press {
                        continue;
                    }

                    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
                        break;
                    }

                    if k.code == KeyCode::Char('q') && app.view != View::Root {
                        break;
                    }

                    if k.code == KeyCode::Char('l') && app.view != View::Root {
                        app.return_view = app.view;
                        app.root_edit = RootEditState::from_config(&app.config);
                        if let Some(mb) = &app.mailbox {
                            app.root_edit.path = mb.root().display().to_string();
                        }
                        app.root_edit.layout = app.layout;
                        app.view = View::Root;
                        app.status = "Load Maildir".to_string();
                        continue;
                    }

                    match app.view {
                        View::Folders => handle_folder_keys(&mut app, k.code, &tx),
                        View::Messages => handle_message_keys(&mut app, k.code, &tx),
                        View::Mail => handle_mail_keys(&mut app, k.code, &tx),
                        View::Root => handle_root_keys(&mut app, k.code, k.modifiers, &tx, &mut terminal),
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn apply_msg(app: &mut App, msg: AppMsg) {
    match msg {
        AppMsg::Folders { root, folders } => {
            if app.mailbox.as_ref().map(|m| m.root()) != Some(root.as_path()) {
                return;
            }
            app.folders = folders;
            app.folder_selected = app.folder_selected.min(app.folders.len().saturating_sub(1));
            app.status = if app.folders.is_empty() {
                "No folders found".to_string()
            } else {
                format!("{} folders", app.folders.len())
            };
        }
        AppMsg::Listing(snapshot) => {
            let Some(mb) = app.mailbox.as_mut() else { return };
            if !mb.install(snapshot) {
                return;
            }
            app.pending_folder = None;
            app.selected = 0;
            let n = app.entries().len();
            app.status = format!("Loaded {n} messages");
        }
        AppMsg::ListingFailed { generation, error } => {
            let current = app.mailbox.as_ref().map(|m| m.generation());
            if current == Some(generation) {
                app.pending_folder = None;
                app.status = format!("Folder error: {error}");
            }
        }
        AppMsg::Detail { ticket, text } => {
            if ticket != app.detail_ticket {
                return;
            }
            app.detail = text;
            app.body_scroll = 0;
            app.status = "Mail loaded".to_string();
        }
    }
}

fn open_root(app: &mut App, root: PathBuf, tx: &mpsc::UnboundedSender<AppMsg>) {
    log::info!("opening maildir {}", root.display());
    app.mailbox = Some(Mailbox::new(root.clone()));
    app.folders.clear();
    app.folder_selected = 0;
    app.pending_folder = None;
    app.selected = 0;
    app.detail.clear();
    app.view = View::Folders;
    spawn_list_folders(root, tx.clone());
}

fn spawn_list_folders(root: PathBuf, tx: mpsc::UnboundedSender<AppMsg>) {
    tokio::task::spawn_blocking(move || {
        let folders = folders_or_empty(&root);
        let _ = tx.send(AppMsg::Folders { root, folders });
    });
}

fn spawn_scan_folder(app: &mut App, name: String, tx: mpsc::UnboundedSender<AppMsg>) {
    let Some(mb) = app.mailbox.as_mut() else { return };
    let generation = mb.begin_scan();
    let root = mb.root().to_path_buf();

    app.status = format!("Reading {name}...");
    app.pending_folder = Some(name.clone());

    tokio::task::spawn_blocking(move || match FolderSnapshot::scan(&root, &name, generation) {
        Ok(snapshot) => {
            let _ = tx.send(AppMsg::Listing(snapshot));
        }
        Err(error) => {
            let _ = tx.send(AppMsg::ListingFailed { generation, error });
        }
    });
}

fn spawn_render_detail(app: &mut App, tx: mpsc::UnboundedSender<AppMsg>) {
    let Some(mb) = app.mailbox.as_ref() else { return };
    let Some(key) = mb.snapshot().map(|s| s.key(app.selected)) else { return };

    let path = match mb.message_ref(key) {
        Ok(r) => r.path.clone(),
        Err(e) => {
            app.status = e.to_string();
            return;
        }
    };

    app.detail_ticket += 1;
    let ticket = app.detail_ticket;
    let layout = app.layout;
    app.detail = "Loading...".to_string();
    app.body_scroll = 0;

    tokio::task::spawn_blocking(move || {
        let text = render_detail(&path, layout);
        let _ = tx.send(AppMsg::Detail { ticket, text });
    });
}

fn handle_folder_keys(app: &mut App, code: KeyCode, tx: &mpsc::UnboundedSender<AppMsg>) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if !app.folders.is_empty() {
                app.folder_selected = (app.folder_selected + 1).min(app.folders.len() - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.folder_selected = clamp_dec(app.folder_selected);
        }
        KeyCode::Enter => {
            if let Some(f) = app.folders.get(app.folder_selected).cloned() {
                app.view = View::Messages;
                spawn_scan_folder(app, f.name, tx.clone());
            }
        }
        KeyCode::Char('o') => {
            if let Some(root) = app.mailbox.as_ref().map(|m| m.root().to_path_buf()) {
                app.status = "Reading folders...".to_string();
                spawn_list_folders(root, tx.clone());
            }
        }
        KeyCode::Char('m') => toggle_layout(app, tx),
        _ => {}
    }
}

fn handle_message_keys(app: &mut App, code: KeyCode, tx: &mpsc::UnboundedSender<AppMsg>) {
    match code {
        KeyCode::Esc => {
            app.view = View::Folders;
            app.status = "Back".to_string();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            let n = app.entries().len();
            if n > 0 {
                app.selected = (app.selected + 1).min(n - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected = clamp_dec(app.selected);
        }
        KeyCode::Enter => {
            if app.pending_folder.is_none() && app.selected < app.entries().len() {
                app.view = View::Mail;
                spawn_render_detail(app, tx.clone());
            }
        }
        KeyCode::Char('o') => {
            if let Some(name) = app.current_folder().map(|f| f.name.clone()) {
                spawn_scan_folder(app, name, tx.clone());
            }
        }
        KeyCode::Char('m') => toggle_layout(app, tx),
        _ => {}
    }
}

fn handle_mail_keys(app: &mut App, code: KeyCode, tx: &mpsc::UnboundedSender<AppMsg>) {
    match code {
        KeyCode::Esc => {
            app.detail_ticket += 1;
            app.view = View::Messages;
            app.status = "Back".to_string();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.body_scroll = app.body_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.body_scroll = app.body_scroll.saturating_sub(1);
        }
        KeyCode::Char('m') => toggle_layout(app, tx),
        _ => {}
    }
}

fn toggle_layout(app: &mut App, tx: &mpsc::UnboundedSender<AppMsg>) {
    app.layout = app.layout.toggled();
    app.status = format!("Layout: {}", app.layout.as_str());
    if app.view == View::Mail {
        spawn_render_detail(app, tx.clone());
    }
}

fn next_field(f: RootField) -> RootField {
    match f {
        RootField::Path => RootField::Layout,
        RootField::Layout => RootField::Path,
    }
}

fn apply_root_edit(app: &mut App) -> Result<PathBuf> {
    let path = app.root_edit.path.trim();
    if path.is_empty() {
        return Err(anyhow!("root is empty"));
    }
    let root = expand_home(path);
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    app.config.maildir.root = path.to_string();
    app.config.view.layout = app.root_edit.layout;
    app.layout = app.root_edit.layout;
    Ok(root)
}

fn open_in_editor(path: &std::path::Path) -> Result<()> {
    use crossterm::cursor::{Hide, MoveTo, Show};
    use crossterm::terminal::{Clear, ClearType};

    disable_raw_mode()?;
    execute!(stdout(), Show, LeaveAlternateScreen)?;

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());

    let status = if editor.split_whitespace().count() > 1 {
        let cmd = format!("{} {}", editor, path.display());
        Command::new("sh").arg("-c").arg(cmd).status()?
    } else {
        Command::new(editor).arg(path).status()?
    };

    execute!(stdout(), EnterAlternateScreen)?;
    execute!(stdout(), Hide, Clear(ClearType::All), MoveTo(0, 0))?;
    enable_raw_mode()?;

    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    if !status.success() {
        return Err(anyhow!("editor exited with non-zero"));
    }
    Ok(())
}

fn reload_config_from_file(app: &mut App) -> Result<()> {
    let cfg = Config::load_from(&app.config_path)?;
    app.config = cfg.clone();
    app.root_edit = RootEditState::from_config(&cfg);
    app.layout = cfg.view.layout;
    Ok(())
}

fn handle_root_keys(
    app: &mut App,
    code: KeyCode,
    mods: KeyModifiers,
    tx: &mpsc::UnboundedSender<AppMsg>,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
) {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('s')) {
        match apply_root_edit(app) {
            Ok(root) => {
                if let Err(e) = app.config.save_to(&app.config_path) {
                    log::warn!("config save failed: {e}");
                    app.status = format!("Save error: {e}");
                }
                open_root(app, root, tx);
                app.status = "Reading folders...".to_string();
            }
            Err(e) => app.status = format!("Cannot load: {e}"),
        }
        return;
    }

    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('e')) {
        if let Err(e) = open_in_editor(&app.config_path) {
            app.status = format!("Editor error: {e}");
            return;
        }
        let _ = terminal.clear();

        match reload_config_from_file(app) {
            Ok(_) => match app.config.root_path() {
                Some(root) => {
                    open_root(app, root, tx);
                    app.status = "Reloaded config".to_string();
                }
                None => app.status = "Reloaded config (no root set)".to_string(),
            },
            Err(e) => app.status = format!("Reload failed: {e}"),
        }
        return;
    }

    match code {
        KeyCode::Esc => {
            if app.mailbox.is_some() {
                app.view = app.return_view;
                app.status = "Back".to_string();
            } else {
                app.status = "No Maildir loaded yet (Ctrl+C to quit)".to_string();
            }
        }
        KeyCode::Tab | KeyCode::BackTab => app.root_edit.focus = next_field(app.root_edit.focus),
        KeyCode::Char(' ') if app.root_edit.focus == RootField::Layout => {
            app.root_edit.layout = app.root_edit.layout.toggled();
        }
        KeyCode::Enter if app.root_edit.focus == RootField::Layout => {
            app.root_edit.layout = app.root_edit.layout.toggled();
        }
        KeyCode::Backspace => {
            if app.root_edit.focus == RootField::Path {
                app.root_edit.path.pop();
            }
        }
        KeyCode::Char(ch) => {
            if app.root_edit.focus == RootField::Path {
                app.root_edit.path.push(ch);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MAIL: &str = "Subject: Test\nDate: Tue, 01 Jan 2030 09:30:00 +0000\n\nHello";

    fn app_with_root(root: &std::path::Path) -> App {
        let mut app = App::new(Config::default(), root.join("config.toml"), DetailLayout::Rich);
        app.mailbox = Some(Mailbox::new(root));
        app
    }

    fn maildir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let cur = tmp.path().join("INBOX").join("cur");
        fs::create_dir_all(&cur).unwrap();
        fs::write(cur.join("1"), MAIL).unwrap();
        tmp
    }

    #[test]
    fn folders_for_another_root_are_ignored() {
        let tmp = maildir();
        let mut app = app_with_root(tmp.path());

        apply_msg(
            &mut app,
            AppMsg::Folders {
                root: PathBuf::from("/elsewhere"),
                folders: vec![Folder { name: "X".into(), path: "/elsewhere/X".into() }],
            },
        );
        assert!(app.folders.is_empty());

        let folders = folders_or_empty(tmp.path());
        apply_msg(&mut app, AppMsg::Folders { root: tmp.path().to_path_buf(), folders });
        assert_eq!(app.folders.len(), 1);
        assert_eq!(app.folders[0].name, "INBOX");
    }

    #[test]
    fn only_latest_listing_is_shown() {
        let tmp = maildir();
        let mut app = app_with_root(tmp.path());

        let mb = app.mailbox.as_mut().unwrap();
        let old = mb.begin_scan();
        let new = mb.begin_scan();
        let stale = FolderSnapshot::scan(tmp.path(), "INBOX", old).unwrap();
        let fresh = FolderSnapshot::scan(tmp.path(), "INBOX", new).unwrap();

        apply_msg(&mut app, AppMsg::Listing(stale));
        assert!(app.entries().is_empty());

        apply_msg(&mut app, AppMsg::Listing(fresh));
        assert_eq!(app.entries(), &["[2030-01-01 09:30] Test".to_string()]);
        assert_eq!(app.current_folder().map(|f| f.name.as_str()), Some("INBOX"));
    }

    #[test]
    fn superseded_detail_is_discarded() {
        let tmp = maildir();
        let mut app = app_with_root(tmp.path());
        app.detail_ticket = 2;

        apply_msg(&mut app, AppMsg::Detail { ticket: 1, text: "old".into() });
        assert!(app.detail.is_empty());

        apply_msg(&mut app, AppMsg::Detail { ticket: 2, text: "new".into() });
        assert_eq!(app.detail, "new");
    }

    #[test]
    fn root_edit_rejects_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_root(tmp.path());
        app.root_edit.path = tmp.path().join("nope").display().to_string();
        assert!(apply_root_edit(&mut app).is_err());

        app.root_edit.path = tmp.path().display().to_string();
        app.root_edit.layout = DetailLayout::Minimal;
        let root = apply_root_edit(&mut app).unwrap();
        assert_eq!(root, tmp.path());
        assert_eq!(app.layout, DetailLayout::Minimal);
        assert_eq!(app.config.view.layout, DetailLayout::Minimal);
    }
}
