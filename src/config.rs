use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::keys::{KEY_VOLUME_DOWN, KEY_VOLUME_UP, KeyCode, KeyMap};
use crate::speech::CommandSpeech;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

// ============================================================================
// Endpoint Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for the single reply read.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    5555
}

fn default_read_timeout() -> u64 {
    120
}

// ============================================================================
// Input Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Hold duration in milliseconds at or past which a press is long.
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    /// Raw code of the commit/decode key.
    #[serde(default = "default_input_key")]
    pub input_key: KeyCode,
    /// Raw code of the symbol key.
    #[serde(default = "default_control_key")]
    pub control_key: KeyCode,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            long_press_ms: default_long_press_ms(),
            input_key: default_input_key(),
            control_key: default_control_key(),
        }
    }
}

fn default_long_press_ms() -> u64 {
    180
}

fn default_input_key() -> KeyCode {
    KEY_VOLUME_UP
}

fn default_control_key() -> KeyCode {
    KEY_VOLUME_DOWN
}

// ============================================================================
// Speech Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,
    /// TTS command to spawn with the reply as its argument.
    #[serde(default = "default_speech_command")]
    pub command: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            command: default_speech_command(),
        }
    }
}

fn default_speech_enabled() -> bool {
    true
}

fn default_speech_command() -> String {
    CommandSpeech::default_command().into()
}

impl Config {
    /// Load from the given path, or `config.toml` in the working directory.
    /// A missing file means defaults; a malformed one is reported and
    /// replaced with defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new("config.toml"));
        if !path.exists() {
            return Config::default();
        }

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
                return Config::default();
            }
        };
        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config invalid, using defaults");
                Config::default()
            }
        }
    }

    pub fn keymap(&self) -> KeyMap {
        KeyMap {
            control: self.input.control_key,
            input: self.input.input_key,
        }
    }
}
