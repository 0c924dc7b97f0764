// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Console settings: colors, fonts, and the script execution delay.
//!
//! The file keeps the shape the GUI settings pane always wrote — top-level
//! `"Log colors"` / `"Help colors"` groups with `0xAABBGGRR` hex strings —
//! so existing settings files keep loading. Every field falls back to its
//! default individually; a missing group is not an error.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default scheduled-command delay in milliseconds.
pub const DEFAULT_EXECUTION_DELAY: u32 = 100;
/// Bounds the settings pane enforces on the delay slider.
pub const EXECUTION_DELAY_RANGE: (u32, u32) = (50, 60_000);

const fn rgba(r: u32, g: u32, b: u32, a: u32) -> u32 {
    (a << 24) | (b << 16) | (g << 8) | r
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "Log colors")]
    pub log_colors: LogColors,
    #[serde(rename = "Help colors")]
    pub help_colors: HelpColors,
    #[serde(rename = "GUI font")]
    pub gui_font: FontSettings,
    #[serde(rename = "Log font")]
    pub log_font: FontSettings,
    #[serde(rename = "Execution delay")]
    pub execution_delay: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_colors: LogColors::default(),
            help_colors: HelpColors::default(),
            gui_font: FontSettings::default(),
            log_font: FontSettings::default(),
            execution_delay: DEFAULT_EXECUTION_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogColors {
    #[serde(with = "hex_color")]
    pub prompt: u32,
    #[serde(with = "hex_color")]
    pub out: u32,
    #[serde(rename = "in", with = "hex_color")]
    pub incoming: u32,
}

impl Default for LogColors {
    fn default() -> Self {
        Self {
            prompt: rgba(0, 192, 0, 255),
            out: rgba(192, 192, 192, 255),
            incoming: rgba(192, 192, 192, 255),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpColors {
    #[serde(with = "hex_color")]
    pub names: u32,
    #[serde(with = "hex_color")]
    pub params: u32,
    #[serde(with = "hex_color")]
    pub brief: u32,
    #[serde(with = "hex_color")]
    pub details: u32,
}

impl Default for HelpColors {
    fn default() -> Self {
        Self {
            names: rgba(255, 255, 255, 255),
            params: rgba(128, 128, 128, 255),
            brief: rgba(192, 192, 192, 255),
            details: rgba(128, 128, 128, 255),
        }
    }
}

/// Font description handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub name: String,
    pub size: f32,
    pub scale: f32,
    #[serde(with = "hex_color")]
    pub color: u32,
    pub file: String,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            size: 32.0,
            scale: 1.0,
            color: rgba(255, 255, 255, 255),
            file: String::new(),
        }
    }
}

impl Settings {
    /// Read settings, clamping the delay into its legal range.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).inspect_err(|e| {
            log::error!("unable to load settings file {}: {}", path.display(), e);
        })?;
        let mut settings: Settings = serde_json::from_reader(BufReader::new(file))?;
        let (lo, hi) = EXECUTION_DELAY_RANGE;
        settings.execution_delay = settings.execution_delay.clamp(lo, hi);
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).inspect_err(|e| {
            log::error!("unable to save settings file {}: {}", path.display(), e);
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Colors persist as `0x`-prefixed hex strings; plain decimal strings from
/// hand-edited files parse too.
mod hex_color {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{value:08X}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let text = String::deserialize(deserializer)?;
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
