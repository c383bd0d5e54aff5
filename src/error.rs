use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not determine the user's application-data directory")]
    NoConfigDir,

    #[error("no configuration file found to back up at {}", .0.display())]
    NoConfigFile(PathBuf),

    #[error("no backup file found at {}", .0.display())]
    NoBackupFile(PathBuf),

    #[error("favicon request for {domain} failed: {reason}")]
    FaviconFetch { domain: String, reason: String },

    #[error("favicon could not be decoded: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("startup shortcut could not be created: {0}")]
    Shortcut(String),

    #[error("tray icon could not be created: {0}")]
    Tray(String),

    #[error("settings could not be serialized: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ui error: {0}")]
    Ui(#[from] eframe::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
