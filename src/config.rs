use serde::{Deserialize, Serialize};
use anyhow::Result;
use std::{fs, path::{Path, PathBuf}};

use crate::mail::DetailLayout;

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub maildir: MaildirConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MaildirConfig {
    /// Empty means "ask at startup".
    #[serde(default)]
    pub root: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct ViewConfig {
    #[serde(default)]
    pub layout: DetailLayout,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
        Ok(dir.join("doveview").join("config.toml"))
    }

    pub fn load_or_create() -> Result<(Self, bool, PathBuf)> {
        Self::load_or_create_at(Self::path()?)
    }

    pub fn load_or_create_at(path: PathBuf) -> Result<(Self, bool, PathBuf)> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, DEFAULT_CONFIG)?;
            let cfg: Self = toml::from_str(DEFAULT_CONFIG)?;
            return Ok((cfg, true, path));
        }

        let cfg = Self::load_from(&path)?;
        Ok((cfg, false, path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let cfg = toml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        fs::write(path, toml)?;
        Ok(())
    }

    /// Configured root with `~/` expanded, or `None` when unset.
    pub fn root_path(&self) -> Option<PathBuf> {
        let root = self.maildir.root.trim();
        if root.is_empty() {
            None
        } else {
            Some(expand_home(root))
        }
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

const DEFAULT_CONFIG: &str = r#"
[maildir]
# Maildir root to open at startup, e.g. "~/Maildir". Leave empty to be asked.
root = ""

[view]
# "rich" shows every header; "minimal" shows From/To/Subject only.
layout = "rich"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_load_writes_default_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let (cfg, created, got) = Config::load_or_create_at(path.clone()).unwrap();
        assert!(created);
        assert_eq!(got, path);
        assert!(path.exists());
        assert!(cfg.root_path().is_none());
        assert_eq!(cfg.view.layout, DetailLayout::Rich);

        let (_, created_again, _) = Config::load_or_create_at(path).unwrap();
        assert!(!created_again);
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.maildir.root = "/var/mail/alice".to_string();
        cfg.view.layout = DetailLayout::Minimal;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.root_path(), Some(PathBuf::from("/var/mail/alice")));
        assert_eq!(loaded.view.layout, DetailLayout::Minimal);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: Config = toml::from_str("[maildir]\nroot = \"/m\"\n").unwrap();
        assert_eq!(cfg.view.layout, DetailLayout::Rich);
    }

    #[test]
    fn unknown_layout_is_rejected() {
        assert!(toml::from_str::<Config>("[view]\nlayout = \"fancy\"\n").is_err());
    }

    #[test]
    fn tilde_is_expanded() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/Maildir"), home.join("Maildir"));
        }
        assert_eq!(expand_home("/abs/Maildir"), PathBuf::from("/abs/Maildir"));
    }
}
