pub mod body;
pub mod date;
pub mod format;
pub mod maildir;
pub mod message;
pub mod session;

use std::path::PathBuf;
use thiserror::Error;

pub use format::DetailLayout;
pub use maildir::Folder;
pub use session::{FolderSnapshot, Mailbox};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("cannot read maildir root {}: {source}", .path.display())]
    RootUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read folder directory {}: {source}", .path.display())]
    FolderUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: mailparse::MailParseError,
    },
    #[error("{} has no header block", .0.display())]
    NotAMessage(PathBuf),
    #[error("message index {index} out of range ({len} messages)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("selection from listing #{key} is stale (current listing is #{current})")]
    StaleSelection { key: u64, current: u64 },
}

pub type Result<T> = std::result::Result<T, MailError>;
