use std::fs;
use std::path::{Path, PathBuf};

use crate::mail::{MailError, Result};

/// Subdirectories scanned for messages, in scan order. `tmp` holds
/// deliveries in progress and is never read.
pub const MESSAGE_DIRS: [&str; 2] = ["cur", "new"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub path: PathBuf,
}

/// Top-level folders of a Maildir root, in directory listing order.
pub fn list_folders(root: &Path) -> Result<Vec<Folder>> {
    let unavailable = |source: std::io::Error| MailError::RootUnavailable {
        path: root.to_path_buf(),
        source,
    };

    let mut out = Vec::new();
    for entry in fs::read_dir(root).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        out.push(Folder { name, path });
    }

    Ok(out)
}

/// Every entry of `cur` then `new` under `root/folder`. Missing
/// subdirectories are skipped.
pub fn list_messages(root: &Path, folder: &str) -> Result<Vec<MessageRef>> {
    let folder_path = root.join(folder);
    let mut out = Vec::new();

    for sub in MESSAGE_DIRS {
        let dir = folder_path.join(sub);
        if !dir.exists() {
            continue;
        }

        let unavailable = |source: std::io::Error| MailError::FolderUnavailable {
            path: dir.clone(),
            source,
        };
        for entry in fs::read_dir(&dir).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            out.push(MessageRef { path: entry.path() });
        }
    }

    Ok(out)
}
