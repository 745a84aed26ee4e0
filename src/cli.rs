use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::mail::{maildir, DetailLayout, Mailbox};
use crate::Command;

/// Resolves root and layout: flags first, then config.toml.
fn resolve(
    root: Option<PathBuf>,
    layout: Option<DetailLayout>,
    config: Option<PathBuf>,
) -> Result<(PathBuf, DetailLayout)> {
    let cfg = match config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load_or_create()?.0,
    };

    let root = root
        .or_else(|| cfg.root_path())
        .ok_or_else(|| anyhow!("no maildir root: pass --root or set [maildir] root in config.toml"))?;

    Ok((root, layout.unwrap_or(cfg.view.layout)))
}

pub fn run(
    command: Command,
    root: Option<PathBuf>,
    layout: Option<DetailLayout>,
    config: Option<PathBuf>,
) -> Result<()> {
    let (root, layout) = resolve(root, layout, config)?;

    match command {
        Command::Folders => {
            // a missing root is an error here, unlike in the TUI
            for f in maildir::list_folders(&root)? {
                println!("{}", f.name);
            }
        }
        Command::List { folder } => {
            let mut mailbox = Mailbox::new(root);
            for (i, entry) in mailbox.select_folder(&folder)?.iter().enumerate() {
                println!("{i}\t{entry}");
            }
        }
        Command::Show { folder, index } => {
            let mut mailbox = Mailbox::new(root);
            mailbox.select_folder(&folder)?;
            let key = mailbox
                .snapshot()
                .map(|s| s.key(index))
                .ok_or_else(|| anyhow!("folder {folder} could not be listed"))?;
            println!("{}", mailbox.select_message(key, layout)?);
        }
    }

    Ok(())
}
