use aceview_editor::{HighlightMode, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings, persisted to `~/.config/aceview/settings.json`.
///
/// `#[serde(default)]` fills any field missing from an older settings file
/// with its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Window ───────────────────────────────────────────────────────────
    pub window_width: i32,
    pub window_height: i32,

    // ── Editor ───────────────────────────────────────────────────────────
    pub theme: Theme,
    pub highlight_mode: HighlightMode,
    pub read_only: bool,
    /// Directory holding the Ace build. Empty means `<data_dir>/aceview/ace`.
    pub ace_dir: String,

    // ── Debugging ────────────────────────────────────────────────────────
    pub developer_extras: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            window_width: 900,
            window_height: 640,

            theme: Theme::Monokai,
            highlight_mode: HighlightMode::Cpp,
            read_only: false,
            ace_dir: String::new(),

            developer_extras: false,
        }
    }
}

fn settings_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let aceview_dir = config_dir.join("aceview");
    let _ = std::fs::create_dir_all(&aceview_dir);
    aceview_dir.join("settings.json")
}

pub fn load() -> Settings {
    load_from(&settings_path())
}

pub fn save(settings: &Settings) {
    save_to(settings, &settings_path());
}

pub fn load_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings {:?}: {}", path, e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

pub fn save_to(settings: &Settings, path: &Path) {
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                log::warn!("Failed to save settings to {:?}: {}", path, e);
            }
        }
        Err(e) => log::warn!("Failed to serialize settings: {}", e),
    }
}
