// Engine settings
// Loaded from a host-supplied settings.json

use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Pointer travel (px) before a pointer-down becomes a drag.
    #[serde(rename = "drag.moveThreshold")]
    pub drag_move_threshold: f32,

    /// Whether the virtual append row below the data is reachable.
    #[serde(rename = "grid.ghostRow")]
    pub ghost_row: bool,

    /// Default width for columns without explicit metadata.
    #[serde(rename = "grid.defaultColumnWidth")]
    pub default_column_width: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            drag_move_threshold: 4.0,
            ghost_row: true,
            default_column_width: 80,
        }
    }
}

impl EngineSettings {
    /// Load settings from disk, falling back to defaults on a missing file
    /// or unparseable contents.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        warn!("error parsing {}: {}; using defaults", path.display(), e);
                        Self::default()
                    }
                }
            }
            Err(e) => {
                warn!("error reading {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }
}
