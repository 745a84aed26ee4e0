use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;

mod app;
mod cli;
mod config;
mod ui;
mod mail;

use crate::mail::DetailLayout;

#[derive(Parser, Debug)]
#[command(name = "doveview", version, about = "Read-only viewer for Maildir mailboxes")]
pub struct Cli {
    /// Maildir root to open, overrides config.toml
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Layout of the message detail view
    #[arg(short, long, value_enum)]
    pub layout: Option<DetailLayout>,

    /// Use this config file instead of the default one
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the folders of the Maildir root
    Folders,
    /// Print the message list of a folder
    List { folder: String },
    /// Print one message of a folder, by list index
    Show { folder: String, index: usize },
}

fn init_logging(tui: bool) {
    let default_level = if tui { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    // stderr would draw over the alternate screen
    if tui {
        match log_file() {
            Some(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            None => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}

fn log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("doveview");
    std::fs::create_dir_all(&dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("doveview.log"))
        .ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging(args.command.is_none());

    match args.command {
        Some(command) => cli::run(command, args.root, args.layout, args.config),
        None => app::run(args.root, args.layout, args.config).await,
    }
}
