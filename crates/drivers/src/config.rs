use std::path::PathBuf;

use cbzz_domain::DEFAULT_AUTOPLAY_INTERVAL_MS;
use log::warn;

pub const CATALOG_ENV: &str = "CBZZ_CATALOG";
pub const BACKUP_DIR_ENV: &str = "CBZZ_BACKUP_DIR";
pub const AUTOPLAY_ENV: &str = "CBZZ_AUTOPLAY_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub backup_dir: PathBuf,
    pub autoplay_interval_ms: u64,
    pub window_width: usize,
    pub window_height: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("cbzz.sqlite3"),
            backup_dir: PathBuf::from("."),
            autoplay_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            window_width: 1120,
            window_height: 760,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup(CATALOG_ENV).filter(|value| !value.trim().is_empty()) {
            self.catalog_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(BACKUP_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.backup_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(AUTOPLAY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(interval) if interval > 0 => self.autoplay_interval_ms = interval,
                _ => warn!("ignoring {AUTOPLAY_ENV}={raw}: expected a positive number of milliseconds"),
            }
        }
        self
    }

    pub fn with_catalog(mut self, catalog: Option<PathBuf>) -> Self {
        if let Some(path) = catalog {
            self.catalog_path = path;
        }
        self
    }
}
