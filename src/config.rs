//! Static configuration, read from an optional TOML file. Every field has a
//! default, so a partial file only overrides what it names.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub button: ButtonConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

/// Engine instance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub gravity_y: f32,
    pub fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 1280,
            gravity_y: 300.0,
            fps: 30,
        }
    }
}

impl GameConfig {
    /// Seconds per frame.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Widest padding accepted either side of the start label.
pub const MAX_BUTTON_PADDING: u16 = 32;
/// Longest start label, in characters.
pub const MAX_BUTTON_TEXT: usize = 64;

/// Text and colours of the start control. Colours are `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub text: String,
    pub fg: String,
    pub bg: String,
    /// Blank columns either side of the label.
    pub padding: u16,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            text: "Start Game".to_string(),
            fg: "#ffffff".to_string(),
            bg: "#4caf50".to_string(),
            padding: 2,
        }
    }
}

/// Pixel size of one terminal cell, used to turn the terminal into a pixel
/// viewport for the 9:16 fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(raw)?;
        if config.display.cell_width == 0 || config.display.cell_height == 0 {
            anyhow::bail!("display cell size must be non-zero");
        }
        if config.game.fps == 0 {
            anyhow::bail!("game fps must be non-zero");
        }
        if config.button.padding > MAX_BUTTON_PADDING {
            anyhow::bail!("button padding must be at most {MAX_BUTTON_PADDING}");
        }
        if config.button.text.chars().count() > MAX_BUTTON_TEXT {
            anyhow::bail!("button text must be at most {MAX_BUTTON_TEXT} characters");
        }
        Ok(config)
    }
}

/// Load `path`, or the defaults when no path is given. A missing file is an
/// error only when the path was asked for explicitly.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    Config::from_toml_str(&raw).with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(hex, 16).ok()?;
    Some(((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#4caf50"), Some((0x4c, 0xaf, 0x50)));
        assert_eq!(parse_hex_color("ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }
}
