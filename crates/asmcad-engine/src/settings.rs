//! Editor settings
//!
//! Settings are stored in `{config_dir}/asmcad/settings.json`. Every field
//! has a default, so a partial file is fine.

use anyhow::{Context, Result, bail};
use asmcad_scene::Metrics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window
    pub window_width: i32,
    pub window_height: i32,

    // Blocks
    /// Side of a palette block in pixels
    pub item_size: i32,
    /// Height of one numeric input field
    pub field_height: i32,
    /// Pixels scrolled per wheel tick
    pub scroll_step: i32,
    /// Width of the module gallery on the right of the canvas
    pub gallery_width: i32,

    // Files
    /// Where the generated OpenSCAD program is written
    pub output: PathBuf,
    /// Directory the block pictures are loaded from
    pub asset_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 800,

            item_size: 100,
            field_height: 20,
            scroll_step: 20,
            gallery_width: 200,

            output: PathBuf::from("out.scad"),
            asset_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Scene metrics derived from these settings
    pub fn metrics(&self) -> Metrics {
        Metrics {
            item_width: self.item_size,
            item_height: self.item_size,
            field_height: self.field_height,
            scroll_step: self.scroll_step,
        }
    }
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("asmcad").join("settings.json"))
}

/// Load settings from disk, returning defaults if the file doesn't exist or
/// is invalid
pub fn load_settings() -> Settings {
    settings_path().map_or_else(Settings::default, |path| load_settings_from(&path))
}

/// Load settings from a specific file, falling back to defaults
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid settings in {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to disk
pub fn save_settings(settings: &Settings) -> Result<()> {
    let Some(path) = settings_path() else {
        bail!("Could not determine config directory");
    };
    save_settings_to(settings, &path)
}

/// Save settings to a specific file, creating its directory
pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, json).context("Failed to write settings file")
}
