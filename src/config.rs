use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::PlaybackRate;
use crate::session::{DictationMode, PracticeTiming};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f32,
    #[serde(default = "default_autoplay_delay_ms")]
    pub autoplay_delay_ms: u64,
    #[serde(default = "default_stop_guard_ms")]
    pub stop_guard_ms: u64,
    #[serde(default = "default_word_advance_delay_ms")]
    pub word_advance_delay_ms: u64,
    #[serde(default = "default_missing_word_advance_delay_ms")]
    pub missing_word_advance_delay_ms: u64,
    #[serde(default = "default_missing_word_auto_advance")]
    pub missing_word_auto_advance: bool,
    #[serde(default = "default_dictation_mode")]
    pub default_dictation_mode: DictationMode,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Player program plus fixed arguments; start offset, speed and the file
    /// are appended per cue.
    #[serde(default = "default_player_command")]
    pub player_command: String,
    /// Speech-to-text program. Empty disables recognition.
    #[serde(default)]
    pub recognizer_command: String,
    /// Raw recorder program writing audio to stdout. Empty disables capture.
    #[serde(default)]
    pub recorder_command: String,
    #[serde(default = "default_recording_mime")]
    pub recording_mime: String,
    #[serde(default = "default_recognition_language")]
    pub recognition_language: String,
}

fn default_playback_rate() -> f32 {
    1.0
}
fn default_autoplay_delay_ms() -> u64 {
    100
}
fn default_stop_guard_ms() -> u64 {
    200
}
fn default_word_advance_delay_ms() -> u64 {
    1500
}
fn default_missing_word_advance_delay_ms() -> u64 {
    1500
}
fn default_missing_word_auto_advance() -> bool {
    true
}
fn default_dictation_mode() -> DictationMode {
    DictationMode::MissingWord
}
fn default_theme() -> String {
    "snowfall".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_player_command() -> String {
    "mpv --no-video --really-quiet".to_string()
}
fn default_recording_mime() -> String {
    "audio/wav".to_string()
}
fn default_recognition_language() -> String {
    "en-US".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback_rate: default_playback_rate(),
            autoplay_delay_ms: default_autoplay_delay_ms(),
            stop_guard_ms: default_stop_guard_ms(),
            word_advance_delay_ms: default_word_advance_delay_ms(),
            missing_word_advance_delay_ms: default_missing_word_advance_delay_ms(),
            missing_word_auto_advance: default_missing_word_auto_advance(),
            default_dictation_mode: default_dictation_mode(),
            theme: default_theme(),
            locale: default_locale(),
            log_level: default_log_level(),
            player_command: default_player_command(),
            recognizer_command: String::new(),
            recorder_command: String::new(),
            recording_mime: default_recording_mime(),
            recognition_language: default_recognition_language(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let mut config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            config.normalize_playback_rate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dictr")
            .join("config.toml")
    }

    /// Snap a hand-edited rate onto the nearest selectable step.
    pub fn normalize_playback_rate(&mut self) {
        self.playback_rate = PlaybackRate::nearest(self.playback_rate).value();
    }

    pub fn timing(&self) -> PracticeTiming {
        PracticeTiming {
            word_advance_delay: Duration::from_millis(self.word_advance_delay_ms),
            missing_word_delay: Duration::from_millis(self.missing_word_advance_delay_ms),
            missing_word_auto_advance: self.missing_word_auto_advance,
        }
    }

    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }

    pub fn stop_guard(&self) -> Duration {
        Duration::from_millis(self.stop_guard_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.playback_rate, 1.0);
        assert_eq!(config.autoplay_delay_ms, 100);
        assert_eq!(config.stop_guard_ms, 200);
        assert_eq!(config.word_advance_delay_ms, 1500);
        assert!(config.missing_word_auto_advance);
        assert_eq!(config.default_dictation_mode, DictationMode::MissingWord);
        assert!(config.recognizer_command.is_empty());
        assert_eq!(config.recognition_language, "en-US");
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
playback_rate = 0.75
default_dictation_mode = "sequential"
missing_word_auto_advance = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.playback_rate, 0.75);
        assert_eq!(config.default_dictation_mode, DictationMode::Sequential);
        assert!(!config.missing_word_auto_advance);
        assert_eq!(config.player_command, "mpv --no-video --really-quiet");
        assert!(!config.timing().missing_word_auto_advance);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.locale = "zh-CN".to_string();
        config.word_advance_delay_ms = 900;
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.locale, "zh-CN");
        assert_eq!(loaded.timing().word_advance_delay, Duration::from_millis(900));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.theme, "snowfall");
    }

    #[test]
    fn test_odd_playback_rate_snaps_to_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "playback_rate = 1.3\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.playback_rate, 1.25);
    }
}
