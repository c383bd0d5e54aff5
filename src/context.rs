use crate::branding::{APP_DIR_NAME, STARTUP_ENTRY_NAME};
use crate::config::SettingsStore;
use crate::error::{AppError, Result};
use std::path::{Path, PathBuf};

/// Every filesystem location the application touches.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub backup_file: PathBuf,
    pub log_dir: PathBuf,
    pub startup_shortcut: PathBuf,
}

impl AppPaths {
    /// Resolves the per-user locations and creates the config directory.
    pub fn resolve() -> Result<Self> {
        let base = directories::BaseDirs::new().ok_or(AppError::NoConfigDir)?;
        let mut paths = Self::at(&base.config_dir().join(APP_DIR_NAME));
        paths.startup_shortcut = startup_entry_path(base.config_dir());
        std::fs::create_dir_all(&paths.config_dir)?;
        Ok(paths)
    }

    /// Same layout rooted at `config_dir`; the startup entry lands beside it.
    pub fn at(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            config_file: config_dir.join("config.json"),
            backup_file: config_dir.join("config_backup.json"),
            log_dir: config_dir.join("logs"),
            startup_shortcut: startup_entry_path(config_dir),
        }
    }
}

#[cfg(windows)]
fn startup_entry_path(roaming_dir: &Path) -> PathBuf {
    roaming_dir
        .join(r"Microsoft\Windows\Start Menu\Programs\Startup")
        .join(format!("{STARTUP_ENTRY_NAME}.lnk"))
}

#[cfg(not(windows))]
fn startup_entry_path(config_dir: &Path) -> PathBuf {
    config_dir
        .join("autostart")
        .join(format!("{}.desktop", STARTUP_ENTRY_NAME.to_ascii_lowercase()))
}

/// Process-wide state built once in `main` and handed to the panel.
pub struct AppContext {
    pub paths: AppPaths,
    pub store: SettingsStore,
}

impl AppContext {
    pub fn resolve() -> Result<Self> {
        Ok(Self::new(AppPaths::resolve()?))
    }

    pub fn new(paths: AppPaths) -> Self {
        let store = SettingsStore::new(&paths);
        Self { paths, store }
    }
}
