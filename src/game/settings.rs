use crate::game::grid_engine::DEFAULT_TWO_PROBABILITY;
use crate::input::DEFAULT_SWIPE_THRESHOLD;
use crate::model::{GameMode, SettingsChange, TIME_MODE_LIMIT_SECS};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub game_mode: GameMode,

    #[serde(default = "default_two_probability")]
    pub two_probability: f64,

    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold: f32,

    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u32,

    #[serde(default)]
    pub player: Option<String>,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_two_probability() -> f64 {
    DEFAULT_TWO_PROBABILITY
}
fn default_swipe_threshold() -> f32 {
    DEFAULT_SWIPE_THRESHOLD
}
fn default_time_limit_secs() -> u32 {
    TIME_MODE_LIMIT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            game_mode: GameMode::default(),
            two_probability: DEFAULT_TWO_PROBABILITY,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            time_limit_secs: TIME_MODE_LIMIT_SECS,
            player: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    settings.sanitize();
                    return settings;
                }
                Err(err) => warn!("Ignoring unreadable settings at {}: {}", path.display(), err),
            }
        }
        Settings::default()
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    pub fn settings_path() -> PathBuf {
        let data_dir = std::env::var_os("CELO2048_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".celo2048"));
        data_dir.join("settings.json")
    }

    pub fn apply(&mut self, change: &SettingsChange) {
        if let Some(game_mode) = change.game_mode {
            self.game_mode = game_mode;
        }
        if let Some(two_probability) = change.two_probability {
            self.two_probability = two_probability;
        }
        if let Some(swipe_threshold) = change.swipe_threshold {
            self.swipe_threshold = swipe_threshold;
        }
        if let Some(time_limit_secs) = change.time_limit_secs {
            self.time_limit_secs = time_limit_secs;
        }
        self.sanitize();
    }

    fn migrate(&mut self) {
        match self.version {
            0 | 1 => {
                // version 1 stored no spawn odds
                self.two_probability = DEFAULT_TWO_PROBABILITY;
                self.version = 2;
            }
            _ => (),
        }
    }

    fn sanitize(&mut self) {
        if !(0.0..=1.0).contains(&self.two_probability) {
            warn!("Spawn probability {} out of range, using default", self.two_probability);
            self.two_probability = DEFAULT_TWO_PROBABILITY;
        }
        if self.time_limit_secs == 0 {
            self.time_limit_secs = TIME_MODE_LIMIT_SECS;
        }
        if self.swipe_threshold.is_nan() || self.swipe_threshold < 0.0 {
            self.swipe_threshold = DEFAULT_SWIPE_THRESHOLD;
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("celo2048-{}-{}", name, uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_settings_path("roundtrip");
        let settings = Settings {
            game_mode: GameMode::Time,
            time_limit_secs: 90,
            player: Some("0xabc".to_string()),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_or_corrupt_file_falls_back_to_defaults() {
        let path = temp_settings_path("corrupt");
        assert_eq!(Settings::load_from(&path), Settings::default());

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_migrates_version_one() {
        let path = temp_settings_path("migrate");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"version": 1, "game_mode": "large", "two_probability": 0.2}"#)
            .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.game_mode, GameMode::Large);
        assert_eq!(settings.two_probability, DEFAULT_TWO_PROBABILITY);
        assert_eq!(settings.version, 2);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_apply_change_sanitizes() {
        let mut settings = Settings::default();
        settings.apply(&SettingsChange {
            two_probability: Some(1.5),
            time_limit_secs: Some(30),
            ..Default::default()
        });
        assert_eq!(settings.two_probability, DEFAULT_TWO_PROBABILITY);
        assert_eq!(settings.time_limit_secs, 30);
    }

    #[test]
    #[serial]
    fn test_seed_from_env() {
        std::env::set_var("SEED", "42");
        assert_eq!(Settings::seed_from_env(), Some(42));
        std::env::set_var("SEED", "not-a-number");
        assert_eq!(Settings::seed_from_env(), None);
        std::env::remove_var("SEED");
        assert_eq!(Settings::seed_from_env(), None);
    }

    #[test]
    #[serial]
    fn test_settings_path_honours_home() {
        std::env::set_var("CELO2048_HOME", "/tmp/celo2048-home");
        assert_eq!(
            Settings::settings_path(),
            PathBuf::from("/tmp/celo2048-home/settings.json")
        );
        std::env::remove_var("CELO2048_HOME");
        assert_eq!(
            Settings::settings_path(),
            PathBuf::from(".celo2048/settings.json")
        );
    }
}
