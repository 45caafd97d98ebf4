//! Game settings and preferences
//!
//! Read once at startup. The game never writes them back.

use serde::Deserialize;

use crate::consts::{
    DEFAULT_MAX_ENEMIES, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MAX_MAX_ENEMIES,
    MIN_MAX_ENEMIES,
};
use crate::error::Result;
use crate::ui::palette::{DEFAULT_BACKGROUND_INDEX, PALETTE};

/// Environment variable naming the settings file on native builds
pub const SETTINGS_ENV_VAR: &str = "GOBO_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "gobo.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enemies alive at once (1..=20)
    pub max_enemies: u32,
    /// Index into the background palette
    pub background: usize,
    pub music: bool,
    pub sound_effects: bool,

    // === Window ===
    pub window_width: f32,
    pub window_height: f32,

    /// Fixed RNG seed; random per run when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_enemies: DEFAULT_MAX_ENEMIES,
            background: DEFAULT_BACKGROUND_INDEX,
            music: true,
            sound_effects: true,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings, pulling out-of-range values back into range
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn sanitize(&mut self) {
        self.max_enemies = self.max_enemies.clamp(MIN_MAX_ENEMIES, MAX_MAX_ENEMIES);
        if self.background >= PALETTE.len() {
            log::warn!(
                "Background index {} out of range, using default",
                self.background
            );
            self.background = DEFAULT_BACKGROUND_INDEX;
        }
        if !(self.window_width > 0.0 && self.window_height > 0.0) {
            self.window_width = DEFAULT_WINDOW_WIDTH;
            self.window_height = DEFAULT_WINDOW_HEIGHT;
        }
    }

    /// Read a settings file; a missing file means defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from `$GOBO_SETTINGS` or `gobo.json`, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = std::env::var(SETTINGS_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());
        match Self::load_from(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Settings loaded from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        log::info!("Using default settings");
        Self::default()
    }
}
