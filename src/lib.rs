//! Play as Gobo - a small side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic world simulation (bodies, ground, enemies, explosions)
//! - `ui`: Screen state machine wrapping the play loop (menus, options, exit)
//! - `renderer`: WebGPU rendering pipeline and scene building
//! - `settings`: Player-facing configuration
//! - `audio`: Procedural Web Audio sound effects (wasm only)

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use error::GameError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default window size
    pub const DEFAULT_WINDOW_WIDTH: f32 = 854.0;
    pub const DEFAULT_WINDOW_HEIGHT: f32 = 480.0;
    /// The map is this much wider/taller than the window
    pub const MAP_SCALE: f32 = 1.5;

    /// Downward acceleration (pixels/s², y grows downward)
    pub const GRAVITY: f32 = 900.0;
    /// Jump impulse
    pub const JUMP_FORCE: f32 = -550.0;

    /// Sprite tile size; also the player radius at which the game is lost
    pub const TEXTURE_RESOLUTION: f32 = 16.0;
    /// Initial player scale and initial enemy scale
    pub const START_TEXTURE_SCALE: f32 = 2.0;
    /// Entities stop growing past this scale
    pub const MAX_ENTITY_SCALE: f32 = 4.0;

    /// Finish line width in tiles
    pub const FINISH_LINE_TILES: f32 = 7.0;

    /// Hardness weights the vertical term when classifying a player/enemy hit
    pub const INITIAL_GAME_HARDNESS: f32 = 0.5;
    pub const MAX_GAME_HARDNESS: f32 = 1.0;

    /// Enemy spawning
    pub const INITIAL_SPAWN_INTERVAL: f32 = 4.0;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.75;
    /// Difficulty buff period
    pub const BUFF_INTERVAL: f32 = 5.0;
    pub const BUFF_FACTOR: f32 = 1.1;

    /// Max enemies alive at once
    pub const DEFAULT_MAX_ENEMIES: u32 = 5;
    pub const MIN_MAX_ENEMIES: u32 = 1;
    pub const MAX_MAX_ENEMIES: u32 = 20;
}

/// Linear interpolation from `a` toward `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp where the lower bound wins when the range is inverted
#[inline]
pub fn clamp_min_first(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max.max(min)
    } else {
        value
    }
}
