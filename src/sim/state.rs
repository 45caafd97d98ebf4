//! World state and core simulation types
//!
//! Everything the play loop needs lives here so a seed plus an input stream
//! reproduces a run exactly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::enemy::Enemy;
use super::explosion::ExplosionManager;
use super::finish_line::{FinishLine, finish_line_bounds};
use super::geom::Rect;
use super::ground::{Ground, ground_bounds};
use super::player::Player;
use crate::consts::*;
use crate::error::Result;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Player shrank to the base sprite size
    Lost,
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnemySpawned { x: f32 },
    Explosion { pos: Vec2 },
    /// Enemy knocked off sideways or caught in a blast
    EnemyKilled { by_explosion: bool },
    PlayerGrew,
    GainedBomb,
    PlayerHit,
    EnemyFinished,
    Footstep,
    GameOver { kills: u32 },
}

/// 2D camera: `target` in world space maps to `offset` on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub target: Vec2,
    pub offset: Vec2,
}

impl Camera {
    pub fn for_window(window: Vec2) -> Self {
        let offset = window / 2.0;
        Self {
            target: Vec2::new(offset.x, window.y - offset.y),
            offset,
        }
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.target + self.offset
    }
}

/// RNG seed wrapper
#[derive(Debug, Clone)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete world state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng_state: RngState,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Window size in pixels
    pub window: Vec2,
    pub map_size: Vec2,
    pub grounds: Vec<Ground>,
    pub finish_line: FinishLine,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub explosions: ExplosionManager,
    pub max_enemies: u32,
    /// Radius multiplier for newly spawned enemies
    pub enemy_scale: f32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub buff_timer: f32,
    pub hardness: f32,
    pub camera: Camera,
    /// Seconds since the run started
    pub time: f32,
    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
}

/// Where a fresh player appears for a given window
pub fn player_start(window: Vec2, ground_top: f32) -> Vec2 {
    Vec2::new(window.x / 2.0, ground_top - TEXTURE_RESOLUTION - 50.0)
}

/// Fails when a world could not be laid out in `window`
pub fn check_window(window: Vec2) -> Result<()> {
    let ground = Ground::for_viewport(window, window.x * MAP_SCALE)?;
    FinishLine::on_ground(window.x, ground.bounds().y)?;
    Ok(())
}

impl GameState {
    pub fn new(seed: u64, window: Vec2, max_enemies: u32) -> Result<Self> {
        let map_size = window * MAP_SCALE;
        let ground = Ground::for_viewport(window, map_size.x)?;
        let ground_top = ground.bounds().y;
        let finish_line = FinishLine::on_ground(window.x, ground_top)?;
        let player = Player::spawn(player_start(window, ground_top))?;
        let rng_state = RngState::new(seed);

        let mut camera = Camera::for_window(window);
        camera.target.x = player.body.x();

        log::info!("New world: seed {}, window {}x{}", seed, window.x, window.y);

        Ok(Self {
            rng: rng_state.to_rng(),
            rng_state,
            phase: GamePhase::Playing,
            window,
            map_size,
            grounds: vec![ground],
            finish_line,
            player,
            enemies: Vec::new(),
            explosions: ExplosionManager::default(),
            max_enemies: max_enemies.clamp(MIN_MAX_ENEMIES, MAX_MAX_ENEMIES),
            enemy_scale: START_TEXTURE_SCALE,
            spawn_timer: 0.0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            buff_timer: 0.0,
            hardness: INITIAL_GAME_HARDNESS,
            camera,
            time: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    /// Start over in the same window, keeping the RNG stream going
    pub fn restart(&mut self) -> Result<()> {
        let ground = Ground::for_viewport(self.window, self.map_size.x)?;
        let ground_top = ground.bounds().y;
        self.finish_line = FinishLine::on_ground(self.window.x, ground_top)?;
        self.player = Player::spawn(player_start(self.window, ground_top))?;
        self.grounds = vec![ground];
        self.enemies.clear();
        self.explosions.clear();
        self.enemy_scale = START_TEXTURE_SCALE;
        self.spawn_timer = 0.0;
        self.spawn_interval = INITIAL_SPAWN_INTERVAL;
        self.buff_timer = 0.0;
        self.hardness = INITIAL_GAME_HARDNESS;
        self.phase = GamePhase::Playing;
        self.time = 0.0;
        self.time_ticks = 0;
        self.events.clear();
        self.camera = Camera::for_window(self.window);
        self.camera.target.x = self.player.body.x();
        log::info!("World restarted");
        Ok(())
    }

    /// Follow a window resize, rebuilding the level geometry
    ///
    /// Nothing changes when the new geometry is out of range.
    pub fn resize(&mut self, window: Vec2) -> Result<()> {
        let map_size = window * MAP_SCALE;
        let mut grounds = self.grounds.clone();
        let mut finish_line = self.finish_line.clone();
        if let Some(ground) = grounds.first_mut() {
            ground.set_bounds(ground_bounds(window, map_size.x))?;
            finish_line.set_bounds(finish_line_bounds(window.x, ground.bounds().y))?;
        }

        self.window = window;
        self.map_size = map_size;
        self.grounds = grounds;
        self.finish_line = finish_line;
        self.camera.offset = window / 2.0;
        self.camera.target.y = window.y - self.camera.offset.y;
        Ok(())
    }

    pub fn ground_rect(&self) -> Option<Rect> {
        self.grounds.first().map(|g| *g.bounds())
    }

    /// Middle of the finish line; enemies steer toward it
    pub fn finish_x(&self) -> f32 {
        self.finish_line.bounds().center().x
    }

    pub fn is_lost(&self) -> bool {
        self.player.radius() <= TEXTURE_RESOLUTION
    }

    pub fn kills(&self) -> u32 {
        self.player.kills
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
