//! Readline configuration.
//!
//! Loaded once at startup from `~/.config/<app>/config.toml`; absence or a
//! parse failure falls back to defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadlineConfig {
    /// Auto-insert matching closers and collapse empty pairs on backspace.
    #[serde(default = "default_true")]
    pub electric_pairs: bool,

    #[serde(default = "default_max_history")]
    pub max_history_size: usize,

    #[serde(default = "default_true")]
    pub enable_completion: bool,

    /// Color the command token by PATH validity while typing.
    #[serde(default = "default_true")]
    pub enable_highlighting: bool,

    #[serde(default)]
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorConfig {
    #[serde(default = "default_green")]
    pub valid_command: String,

    #[serde(default = "default_red")]
    pub invalid_command: String,
}

impl Default for ReadlineConfig {
    fn default() -> Self {
        Self {
            electric_pairs: true,
            max_history_size: default_max_history(),
            enable_completion: true,
            enable_highlighting: true,
            colors: ColorConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            valid_command: default_green(),
            invalid_command: default_red(),
        }
    }
}

impl ReadlineConfig {
    /// Load `~/.config/<app>/config.toml`, defaulting on any failure.
    pub fn load(app: &str) -> Self {
        let path = dirs::config_dir()
            .map(|d| d.join(app).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        if let Ok(content) = std::fs::read_to_string(&path) {
            if let Ok(file) = toml::from_str::<ConfigFile>(&content) {
                return file.readline;
            }
        }

        Self::default()
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default)]
    readline: ReadlineConfig,
}

impl ColorConfig {
    pub fn valid_ansi(&self) -> &'static str {
        Self::to_ansi(&self.valid_command)
    }

    pub fn invalid_ansi(&self) -> &'static str {
        Self::to_ansi(&self.invalid_command)
    }

    /// Map a color name to its ANSI SGR code.
    pub fn to_ansi(name: &str) -> &'static str {
        match name {
            "black" => "\x1b[30m",
            "red" => "\x1b[31m",
            "green" => "\x1b[32m",
            "yellow" => "\x1b[33m",
            "blue" => "\x1b[34m",
            "magenta" => "\x1b[35m",
            "cyan" => "\x1b[36m",
            "white" => "\x1b[37m",
            "gray" | "grey" => "\x1b[90m",
            _ => "\x1b[0m",
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_history() -> usize {
    1000
}

fn default_green() -> String {
    "green".to_string()
}

fn default_red() -> String {
    "red".to_string()
}
