use crate::context::AppPaths;
use crate::error::{AppError, Result};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const MIN_ICON_SIZE: u32 = 12;
pub const MAX_ICON_SIZE: u32 = 64;
pub const MIN_WINDOW_WIDTH: u32 = 100;
pub const MIN_WINDOW_HEIGHT: u32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub name: String,
}

impl Link {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapPosition {
    #[default]
    Top,
    Left,
    Right,
}

impl SnapPosition {
    pub fn label(self) -> &'static str {
        match self {
            SnapPosition::Top => "top",
            SnapPosition::Left => "left",
            SnapPosition::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub links: Vec<Link>,
    pub snap_position: SnapPosition,
    pub monitor_index: usize,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub icon_size: u32,
}

fn default_icon_size() -> u32 {
    24
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            links: Vec::new(),
            snap_position: SnapPosition::Top,
            monitor_index: 0,
            window_width: None,
            window_height: None,
            icon_size: default_icon_size(),
        }
    }
}

impl Settings {
    /// Parses a settings document, taking the default for every key that is
    /// missing or malformed instead of rejecting the whole file.
    pub fn from_json(text: &str) -> Self {
        let map = match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Config is not a JSON object, using defaults");
                return Self::default();
            }
            Err(err) => {
                warn!("Failed to parse config ({err}), using defaults");
                return Self::default();
            }
        };

        let defaults = Self::default();
        let links = field::<Vec<Value>>(&map, "links")
            .map(|raw| {
                raw.into_iter()
                    .filter_map(|item| serde_json::from_value::<Link>(item).ok())
                    .collect()
            })
            .unwrap_or(defaults.links);

        Self {
            links,
            snap_position: field(&map, "snap_position").unwrap_or(defaults.snap_position),
            monitor_index: field(&map, "monitor_index").unwrap_or(defaults.monitor_index),
            window_width: field::<Option<u32>>(&map, "window_width")
                .flatten()
                .filter(|w| *w > 0),
            window_height: field::<Option<u32>>(&map, "window_height")
                .flatten()
                .filter(|h| *h > 0),
            icon_size: field::<u32>(&map, "icon_size")
                .map(|size| size.clamp(MIN_ICON_SIZE, MAX_ICON_SIZE))
                .unwrap_or(defaults.icon_size),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Width and height entered by the user, if both are set.
    pub fn explicit_size(&self) -> Option<(u32, u32)> {
        match (self.window_width, self.window_height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }

    pub fn add_link(&mut self, link: Link) {
        self.links.push(link);
    }

    /// Replaces the fields given as `Some`. Returns `false` and leaves the
    /// list untouched when `index` is out of range.
    pub fn edit_link(&mut self, index: usize, url: Option<String>, name: Option<String>) -> bool {
        let Some(link) = self.links.get_mut(index) else {
            return false;
        };
        if let Some(url) = url {
            link.url = url;
        }
        if let Some(name) = name {
            link.name = name;
        }
        true
    }

    pub fn delete_link(&mut self, index: usize) -> Option<Link> {
        (index < self.links.len()).then(|| self.links.remove(index))
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

/// Reads and writes the settings document and its backup copy.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config_file: PathBuf,
    backup_file: PathBuf,
}

impl SettingsStore {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            config_file: paths.config_file.clone(),
            backup_file: paths.backup_file.clone(),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn backup_file(&self) -> &Path {
        &self.backup_file
    }

    pub fn load(&self) -> Settings {
        match std::fs::read_to_string(&self.config_file) {
            Ok(text) => Settings::from_json(&text),
            Err(err) => {
                if self.config_file.exists() {
                    warn!("Failed to read config ({err}), using defaults");
                }
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(dir) = self.config_file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.config_file, settings.to_json()?)?;
        Ok(())
    }

    pub fn backup_exists(&self) -> bool {
        self.backup_file.is_file()
    }

    /// Copies the current config file to the backup location.
    pub fn backup(&self) -> Result<&Path> {
        if !self.config_file.is_file() {
            return Err(AppError::NoConfigFile(self.config_file.clone()));
        }
        std::fs::copy(&self.config_file, &self.backup_file)?;
        info!("Backed up settings to {}", self.backup_file.display());
        Ok(&self.backup_file)
    }

    /// Copies the backup over the config file and returns the reloaded settings.
    pub fn restore(&self) -> Result<Settings> {
        if !self.backup_exists() {
            return Err(AppError::NoBackupFile(self.backup_file.clone()));
        }
        std::fs::copy(&self.backup_file, &self.config_file)?;
        info!("Restored settings from {}", self.backup_file.display());
        Ok(self.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(&AppPaths::at(dir.path()))
    }

    fn sample() -> Settings {
        Settings {
            links: vec![
                Link::new("https://example.com", "Ex"),
                Link::new("https://example.com", "Ex again"),
            ],
            snap_position: SnapPosition::Right,
            monitor_index: 1,
            window_width: Some(640),
            window_height: Some(48),
            icon_size: 32,
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).load(), Settings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let settings = sample();
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);

        let no_explicit_size = Settings {
            window_width: None,
            window_height: None,
            ..sample()
        };
        store.save(&no_explicit_size).unwrap();
        assert_eq!(store.load(), no_explicit_size);
    }

    #[test]
    fn saved_document_uses_plain_keys() {
        let json = Settings::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["snap_position"], "top");
        assert_eq!(value["icon_size"], 24);
        assert!(value["window_width"].is_null());
        assert!(value["links"].as_array().unwrap().is_empty());
    }

    #[test]
    fn malformed_fields_fall_back_individually() {
        let text = r#"{
            "links": [{"url": "https://a.test", "name": "A"}, {"url": 5}],
            "snap_position": "bottom",
            "monitor_index": -3,
            "window_width": "wide",
            "window_height": 40,
            "icon_size": 500
        }"#;
        let settings = Settings::from_json(text);
        assert_eq!(settings.links, vec![Link::new("https://a.test", "A")]);
        assert_eq!(settings.snap_position, SnapPosition::Top);
        assert_eq!(settings.monitor_index, 0);
        assert_eq!(settings.window_width, None);
        assert_eq!(settings.window_height, Some(40));
        assert_eq!(settings.icon_size, MAX_ICON_SIZE);
        assert_eq!(settings.explicit_size(), None);
    }

    #[test]
    fn garbage_file_loads_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
        assert_eq!(Settings::from_json("[1, 2]"), Settings::default());
    }

    #[test]
    fn edit_out_of_range_changes_nothing() {
        let mut settings = sample();
        let before = settings.links.clone();
        assert!(!settings.edit_link(2, Some("https://x.test".into()), None));
        assert_eq!(settings.links, before);

        assert!(settings.edit_link(0, None, Some("Renamed".into())));
        assert_eq!(settings.links[0].url, "https://example.com");
        assert_eq!(settings.links[0].name, "Renamed");
    }

    #[test]
    fn delete_out_of_range_is_none() {
        let mut settings = sample();
        assert_eq!(settings.delete_link(5), None);
        assert_eq!(settings.links.len(), 2);
        assert_eq!(settings.delete_link(1).map(|l| l.name), Some("Ex again".into()));
    }

    #[test]
    fn backup_requires_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(matches!(store.backup(), Err(AppError::NoConfigFile(_))));
        assert!(!store.backup_exists());
    }

    #[test]
    fn restore_requires_backup_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&sample()).unwrap();
        assert!(matches!(store.restore(), Err(AppError::NoBackupFile(_))));
        assert_eq!(store.load(), sample());
    }

    #[test]
    fn backup_mutate_restore_returns_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let snapshot = sample();
        store.save(&snapshot).unwrap();
        store.backup().unwrap();

        let backup_bytes = std::fs::read(store.backup_file()).unwrap();
        assert_eq!(backup_bytes, std::fs::read(store.config_file()).unwrap());

        let mut mutated = snapshot.clone();
        mutated.add_link(Link::new("https://other.test", "Other"));
        mutated.snap_position = SnapPosition::Left;
        store.save(&mutated).unwrap();
        assert_eq!(store.load(), mutated);

        let restored = store.restore().unwrap();
        assert_eq!(restored, snapshot);
        assert_eq!(store.load(), snapshot);
    }
}
