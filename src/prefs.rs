//! Durable key/value preferences.
//!
//! The record is a flat JSON object holding the six settings that survive a
//! restart. Loading is forgiving: a missing file is the normal first-run case,
//! and any key that is absent or malformed falls back to its default on its own
//! without discarding the rest of the record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::error::StoreError;

const APP_DIR: &str = "pomobar";
const FILE_NAME: &str = "preferences.json";

const WORK_KEY: &str = "workMinutes";
const BREAK_KEY: &str = "breakMinutes";
const DISPLAY_KEY: &str = "displayMode";
const NOTIFY_KEY: &str = "notificationsEnabled";
const WARNING_KEY: &str = "oneMinuteWarningEnabled";
const PAUSED_KEY: &str = "pausedState";

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Longest duration whose length in seconds still fits a `u32`.
pub const MAX_MINUTES: u32 = u32::MAX / 60;

/// Coerces a requested duration into `1..=MAX_MINUTES`.
pub fn clamp_minutes(minutes: i64) -> u32 {
    minutes.clamp(1, MAX_MINUTES as i64) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Time,
    Progress,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Progress => "Progress",
        }
    }

    /// Cycles through the modes; wraps around.
    pub fn next(self) -> Self {
        match self {
            Self::Time => Self::Progress,
            Self::Progress => Self::Time,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Time => Self::Progress,
            Self::Progress => Self::Time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub work_minutes: u32,
    pub break_minutes: u32,
    pub display_mode: DisplayMode,
    pub notifications_enabled: bool,
    pub one_minute_warning_enabled: bool,
    #[serde(rename = "pausedState")]
    pub paused: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            display_mode: DisplayMode::Time,
            notifications_enabled: true,
            one_minute_warning_enabled: true,
            paused: true,
        }
    }
}

impl Preferences {
    fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            work_minutes: minutes(map, WORK_KEY).unwrap_or(defaults.work_minutes),
            break_minutes: minutes(map, BREAK_KEY).unwrap_or(defaults.break_minutes),
            display_mode: field(map, DISPLAY_KEY).unwrap_or(defaults.display_mode),
            notifications_enabled: field(map, NOTIFY_KEY).unwrap_or(defaults.notifications_enabled),
            one_minute_warning_enabled: field(map, WARNING_KEY)
                .unwrap_or(defaults.one_minute_warning_enabled),
            paused: field(map, PAUSED_KEY).unwrap_or(defaults.paused),
        }
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    let value = map.get(key)?;
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed preference");
            None
        }
    }
}

/// Minutes are stored as plain integers and coerced into the usable range.
fn minutes(map: &Map<String, Value>, key: &str) -> Option<u32> {
    let raw: i64 = field(map, key)?;
    Some(clamp_minutes(raw))
}

/// File-backed preference record.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store living in `dir/preferences.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(FILE_NAME))
    }

    /// Per-user config directory, or `./pomobar` when the platform has none.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record. Never fails; see the module docs for the fallbacks.
    pub fn load(&self) -> Preferences {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no preferences yet, using defaults");
                return Preferences::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable preferences, using defaults");
                return Preferences::default();
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Preferences::from_map(&map),
            Ok(_) => {
                warn!(path = %self.path.display(), "preferences are not a JSON object, using defaults");
                Preferences::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt preferences, using defaults");
                Preferences::default()
            }
        }
    }

    /// Writes the whole record. The file is replaced by rename, so a reader
    /// sees either the old or the new record.
    pub fn save(&self, prefs: &Preferences) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(prefs)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, PreferenceStore) {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::in_dir(dir.path());
        (dir, store)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, store) = store();
        let prefs = store.load();
        assert_eq!(prefs, Preferences::default());
        assert_eq!(prefs.work_minutes, 25);
        assert_eq!(prefs.break_minutes, 5);
        assert_eq!(prefs.display_mode, DisplayMode::Time);
        assert!(prefs.notifications_enabled);
        assert!(prefs.one_minute_warning_enabled);
        assert!(prefs.paused);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let prefs = Preferences {
            work_minutes: 50,
            break_minutes: 10,
            display_mode: DisplayMode::Progress,
            notifications_enabled: false,
            one_minute_warning_enabled: false,
            paused: false,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn saved_file_uses_documented_keys() {
        let (_dir, store) = store();
        store.save(&Preferences::default()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["workMinutes"], 25);
        assert_eq!(value["breakMinutes"], 5);
        assert_eq!(value["displayMode"], "time");
        assert_eq!(value["notificationsEnabled"], true);
        assert_eq!(value["oneMinuteWarningEnabled"], true);
        assert_eq!(value["pausedState"], true);
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        let (_dir, store) = store();
        fs::write(store.path(), r#"{"workMinutes": 40, "displayMode": "progress"}"#).unwrap();

        let prefs = store.load();
        assert_eq!(prefs.work_minutes, 40);
        assert_eq!(prefs.display_mode, DisplayMode::Progress);
        assert_eq!(prefs.break_minutes, 5);
        assert!(prefs.notifications_enabled);
        assert!(prefs.paused);
    }

    #[test]
    fn malformed_values_fall_back_individually() {
        let (_dir, store) = store();
        fs::write(
            store.path(),
            r#"{"workMinutes": "lots", "breakMinutes": 7, "displayMode": "bars", "pausedState": false}"#,
        )
        .unwrap();

        let prefs = store.load();
        assert_eq!(prefs.work_minutes, 25);
        assert_eq!(prefs.break_minutes, 7);
        assert_eq!(prefs.display_mode, DisplayMode::Time);
        assert!(!prefs.paused);
    }

    #[test]
    fn non_positive_minutes_are_clamped() {
        let (_dir, store) = store();
        fs::write(store.path(), r#"{"workMinutes": 0, "breakMinutes": -3}"#).unwrap();

        let prefs = store.load();
        assert_eq!(prefs.work_minutes, 1);
        assert_eq!(prefs.break_minutes, 1);
    }

    #[test]
    fn oversized_minutes_clamp_to_representable_range() {
        let (_dir, store) = store();
        fs::write(store.path(), r#"{"workMinutes": 100000000}"#).unwrap();
        assert_eq!(store.load().work_minutes, MAX_MINUTES);
        assert_eq!(MAX_MINUTES as u64 * 60, (u32::MAX - u32::MAX % 60) as u64);
    }

    #[test]
    fn corrupt_file_yields_defaults() {
        let (_dir, store) = store();
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Preferences::default());

        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = PreferenceStore::in_dir(&dir.path().join("nested").join("pomobar"));
        store.save(&Preferences::default()).unwrap();
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn display_mode_cycles() {
        assert_eq!(DisplayMode::Time.next(), DisplayMode::Progress);
        assert_eq!(DisplayMode::Progress.next(), DisplayMode::Time);
        assert_eq!(DisplayMode::Time.prev(), DisplayMode::Progress);
    }
}
