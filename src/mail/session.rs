//! Folder selection state shared with the presentation layer.
//!
//! A folder selection produces an immutable [`FolderSnapshot`]: the message
//! paths and their display entries, aligned index for index. Entries are
//! addressed through an [`EntryKey`] that remembers which snapshot it came
//! from, so a key taken before the user switched folders is rejected
//! instead of silently pointing into the new listing.

use std::path::{Path, PathBuf};

use crate::mail::format::{self, DetailLayout};
use crate::mail::maildir::{self, Folder, MessageRef};
use crate::mail::message::ParsedMessage;
use crate::mail::{MailError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryKey {
    pub generation: u64,
    pub index: usize,
}

#[derive(Clone, Debug)]
pub struct FolderSnapshot {
    generation: u64,
    folder: Folder,
    refs: Vec<MessageRef>,
    entries: Vec<String>,
}

impl FolderSnapshot {
    /// Lists and parses every message of `root/name`. Messages that fail to
    /// parse are logged and left out of both `refs` and `entries`.
    pub fn scan(root: &Path, name: &str, generation: u64) -> Result<Self> {
        let candidates = maildir::list_messages(root, name)?;

        let mut refs = Vec::with_capacity(candidates.len());
        let mut entries = Vec::with_capacity(candidates.len());
        for r in candidates {
            match ParsedMessage::parse(&r.path) {
                Ok(msg) => {
                    entries.push(format::summary(&msg));
                    refs.push(r);
                }
                Err(e) => log::warn!("skipping message: {e}"),
            }
        }

        log::info!("{name}: {} messages listed", entries.len());

        Ok(Self {
            generation,
            folder: Folder {
                name: name.to_string(),
                path: root.join(name),
            },
            refs,
            entries,
        })
    }

    pub fn folder(&self) -> &Folder {
        &self.folder
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn key(&self, index: usize) -> EntryKey {
        EntryKey {
            generation: self.generation,
            index,
        }
    }

    pub fn message_ref(&self, key: EntryKey) -> Result<&MessageRef> {
        if key.generation != self.generation {
            return Err(MailError::StaleSelection {
                key: key.generation,
                current: self.generation,
            });
        }
        self.refs.get(key.index).ok_or(MailError::IndexOutOfRange {
            index: key.index,
            len: self.refs.len(),
        })
    }
}

/// Detail text for one message file. Parse failures become the text
/// itself so the viewer always has something to show.
pub fn render_detail(path: &Path, layout: DetailLayout) -> String {
    match ParsedMessage::parse(path) {
        Ok(msg) => format::detail(&msg, layout),
        Err(e) => {
            log::warn!("detail view: {e}");
            format!("Error reading email: {e}")
        }
    }
}

pub struct Mailbox {
    root: PathBuf,
    generation: u64,
    snapshot: Option<FolderSnapshot>,
}

impl Mailbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            generation: 0,
            snapshot: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Option<&FolderSnapshot> {
        self.snapshot.as_ref()
    }

    /// Starts a new folder selection and returns its generation. Any
    /// snapshot from an earlier generation is discarded from now on.
    pub fn begin_scan(&mut self) -> u64 {
        self.generation += 1;
        self.snapshot = None;
        self.generation
    }

    /// Applies a scanned snapshot if it still belongs to the latest
    /// selection. Returns false when it was superseded.
    pub fn install(&mut self, snapshot: FolderSnapshot) -> bool {
        if snapshot.generation != self.generation {
            log::debug!(
                "dropping listing #{} (current #{})",
                snapshot.generation,
                self.generation
            );
            return false;
        }
        self.snapshot = Some(snapshot);
        true
    }

    pub fn select_folder(&mut self, name: &str) -> Result<&[String]> {
        let generation = self.begin_scan();
        let snapshot = FolderSnapshot::scan(&self.root, name, generation)?;
        self.install(snapshot);
        Ok(self.snapshot.as_ref().map(|s| s.entries()).unwrap_or_default())
    }

    pub fn message_ref(&self, key: EntryKey) -> Result<&MessageRef> {
        match &self.snapshot {
            Some(s) => s.message_ref(key),
            None => Err(MailError::StaleSelection {
                key: key.generation,
                current: self.generation,
            }),
        }
    }

    pub fn select_message(&self, key: EntryKey, layout: DetailLayout) -> Result<String> {
        let r = self.message_ref(key)?;
        Ok(render_detail(&r.path, layout))
    }
}

/// Folders under `root`; an unreadable root yields none.
pub fn folders_or_empty(root: &Path) -> Vec<Folder> {
    match maildir::list_folders(root) {
        Ok(folders) => {
            log::info!("{}: {} folders", root.display(), folders.len());
            folders
        }
        Err(e) => {
            log::warn!("{e}");
            Vec::new()
        }
    }
}
