use super::files::default_sound_file;
use crate::domain::TimerConfig;
use crate::error::ValidationError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_REST_MINUTES: u32 = 10;

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub focus_minutes: u32,
    pub rest_minutes: u32,
    pub muted: bool,
    /// Sound played when focus ends (defaults to alert.mp3 in the data directory)
    pub sound_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            rest_minutes: DEFAULT_REST_MINUTES,
            muted: false,
            sound_file: None,
        }
    }
}

impl Settings {
    /// Snapshot the settings into a config for one timer run
    pub fn timer_config(&self) -> Result<TimerConfig, ValidationError> {
        TimerConfig::from_minutes(self.focus_minutes, self.rest_minutes, self.muted)
    }

    pub fn sound_path(&self, data_dir: &Path) -> PathBuf {
        self.sound_file
            .clone()
            .unwrap_or_else(|| default_sound_file(data_dir))
    }
}

/// Load settings from settings.json, falling back to defaults if it doesn't exist
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.focus_minutes, 25);
        assert_eq!(settings.rest_minutes, 10);
        assert!(!settings.muted);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = Settings {
            focus_minutes: 50,
            rest_minutes: 5,
            muted: true,
            sound_file: Some(PathBuf::from("/sounds/bell.wav")),
        };
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "muted": true }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.focus_minutes, DEFAULT_FOCUS_MINUTES);
        assert_eq!(settings.sound_file, None);
    }

    #[test]
    fn test_corrupt_settings_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn test_timer_config_snapshot() {
        let settings = Settings {
            focus_minutes: 1,
            rest_minutes: 2,
            muted: true,
            sound_file: None,
        };
        let config = settings.timer_config().unwrap();
        assert_eq!(config, TimerConfig::new(60, 120, true).unwrap());

        let zero = Settings {
            focus_minutes: 0,
            ..Settings::default()
        };
        assert!(zero.timer_config().is_err());
    }

    #[test]
    fn test_sound_path() {
        let dir = Path::new("/data");
        assert_eq!(Settings::default().sound_path(dir), PathBuf::from("/data/alert.mp3"));

        let custom = Settings {
            sound_file: Some(PathBuf::from("/sounds/bell.wav")),
            ..Settings::default()
        };
        assert_eq!(custom.sound_path(dir), PathBuf::from("/sounds/bell.wav"));
    }
}
