//! The player character
//!
//! Gobo grows by knocking enemies off sideways, shrinks when enemies land on
//! it or reach the finish line, and can trade size for a bomb.

use glam::Vec2;

use super::body::Body;
use super::geom::Rect;
use crate::consts::{START_TEXTURE_SCALE, TEXTURE_RESOLUTION};
use crate::error::{GameError, Result};

pub const DEFAULT_PLAYER_SPEED: f32 = 200.0;
const MIN_SPEED: f32 = 1.0;
const MAX_SPEED: f32 = 2000.0;

const MIN_CONSTRUCT_SCALE: f32 = 0.1;
const MAX_CONSTRUCT_SCALE: f32 = 10.0;
/// Bounds enforced by growth/damage/shrink
pub const MIN_PLAYER_SCALE: f32 = 0.1;
pub const MAX_PLAYER_SCALE: f32 = 5.0;

const DAMAGE_FACTOR: f32 = 0.75;
const GROWTH_FACTOR: f32 = 1.2;
const SHRINK_FACTOR: f32 = 1.1;
const BOMB_RADIUS_FACTOR: f32 = 0.75;

const ANIMATION_INTERVAL: f32 = 0.2;
/// Seconds between footstep cues while walking
const STEP_INTERVAL: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerFrame {
    Standing,
    Walking,
    Idle,
}

/// Horizontal movement requested for this tick
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    speed: f32,
    original_radius: f32,
    scale: f32,
    pub kills: u32,
    pub can_use_bomb: bool,
    frame: PlayerFrame,
    anim_timer: f32,
    moving: bool,
    step_timer: f32,
}

impl Player {
    pub fn new(center: Vec2, base_radius: f32, scale: f32) -> Result<Self> {
        if !(MIN_CONSTRUCT_SCALE..=MAX_CONSTRUCT_SCALE).contains(&scale) {
            return Err(GameError::InvalidScale(scale));
        }
        let body = Body::new(center, base_radius * scale)?;
        Ok(Self {
            body,
            speed: DEFAULT_PLAYER_SPEED,
            original_radius: base_radius,
            scale,
            kills: 0,
            can_use_bomb: false,
            frame: PlayerFrame::Standing,
            anim_timer: 0.0,
            moving: false,
            step_timer: 0.0,
        })
    }

    /// Fresh player at the default size
    pub fn spawn(center: Vec2) -> Result<Self> {
        Self::new(center, TEXTURE_RESOLUTION, START_TEXTURE_SCALE)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(GameError::InvalidSpeed {
                what: "player",
                speed,
                max: MAX_SPEED,
            });
        }
        self.speed = speed;
        Ok(())
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn radius(&self) -> f32 {
        self.body.radius()
    }

    pub fn original_radius(&self) -> f32 {
        self.original_radius
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn frame(&self) -> PlayerFrame {
        self.frame
    }

    /// Enemy landed on us
    pub fn take_damage(&mut self) {
        self.scale = (self.scale * DAMAGE_FACTOR).max(MIN_PLAYER_SCALE);
        self.update_radius();
    }

    pub fn grow(&mut self) {
        self.scale = (self.scale * GROWTH_FACTOR).min(MAX_PLAYER_SCALE);
        self.update_radius();
    }

    /// An enemy reached the finish line
    pub fn shrink(&mut self) {
        self.scale = (self.scale / SHRINK_FACTOR).max(MIN_PLAYER_SCALE);
        self.update_radius();
    }

    pub fn reset_to_original_size(&mut self) {
        self.scale = 1.0;
        self.update_radius();
    }

    fn update_radius(&mut self) {
        if let Err(e) = self.body.set_radius(self.original_radius * self.scale) {
            log::warn!("Keeping player radius {}: {}", self.body.radius(), e);
        }
    }

    /// Walk within the ground's horizontal extent; right wins when both are held
    ///
    /// Returns true when a footstep cue is due.
    pub fn update_movement(&mut self, intent: MoveIntent, ground: &Rect, dt: f32) -> bool {
        if dt <= 0.0 {
            return false;
        }
        self.moving = false;
        let r = self.radius();

        if intent.right && self.body.x() + r < ground.right() {
            self.body.translate_x(self.speed * dt);
            self.moving = true;
        } else if intent.left && self.body.x() - r > ground.x {
            self.body.translate_x(-self.speed * dt);
            self.moving = true;
        }

        if self.moving && self.body.on_ground {
            self.step_timer -= dt;
            if self.step_timer <= 0.0 {
                self.step_timer = STEP_INTERVAL;
                return true;
            }
        } else {
            self.step_timer = 0.0;
        }
        false
    }

    /// Spend the bomb, paying a quarter of our radius down to the original size
    ///
    /// Returns where the explosion goes off.
    pub fn drop_bomb(&mut self) -> Option<Vec2> {
        if !self.can_use_bomb {
            return None;
        }
        let at = Vec2::new(self.body.x(), self.body.y() - self.radius());

        let new_radius = self.radius() * BOMB_RADIUS_FACTOR;
        if new_radius > self.original_radius {
            self.scale = new_radius / self.original_radius;
        } else {
            self.scale = 1.0;
        }
        self.update_radius();
        self.can_use_bomb = false;
        Some(at)
    }

    pub fn update_animation(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.anim_timer += dt;
        if self.anim_timer >= ANIMATION_INTERVAL {
            self.frame = match (self.moving, self.frame) {
                (true, PlayerFrame::Standing) => PlayerFrame::Walking,
                (true, _) => PlayerFrame::Standing,
                (false, PlayerFrame::Standing) => PlayerFrame::Idle,
                (false, _) => PlayerFrame::Standing,
            };
            self.anim_timer = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::spawn(Vec2::new(427.0, 318.0)).unwrap()
    }

    fn ground() -> Rect {
        Rect::new(0.0, 400.0, 1000.0, 80.0)
    }

    #[test]
    fn test_spawn_size() {
        let p = player();
        assert_eq!(p.radius(), 32.0);
        assert_eq!(p.original_radius(), 16.0);
        assert_eq!(p.scale(), 2.0);
        assert!(!p.can_use_bomb);
    }

    #[test]
    fn test_construction_validation() {
        assert!(Player::new(Vec2::ZERO, 16.0, 0.05).is_err());
        assert!(Player::new(Vec2::ZERO, 16.0, 11.0).is_err());
        let mut p = player();
        assert!(p.set_speed(0.5).is_err());
        assert!(p.set_speed(2001.0).is_err());
        p.set_speed(300.0).unwrap();
        assert_eq!(p.speed(), 300.0);
    }

    #[test]
    fn test_damage_sequence_reaches_game_over_size() {
        let mut p = player();
        p.take_damage();
        assert!((p.radius() - 24.0).abs() < 1e-4);
        p.take_damage();
        assert!((p.radius() - 18.0).abs() < 1e-4);
        p.take_damage();
        assert!(p.radius() <= TEXTURE_RESOLUTION);
    }

    #[test]
    fn test_growth_is_capped() {
        let mut p = player();
        for _ in 0..20 {
            p.grow();
        }
        assert_eq!(p.scale(), MAX_PLAYER_SCALE);
        assert_eq!(p.radius(), 80.0);
        p.reset_to_original_size();
        assert_eq!(p.radius(), 16.0);
    }

    #[test]
    fn test_movement_prefers_right_and_respects_edges() {
        let mut p = player();
        let both = MoveIntent {
            left: true,
            right: true,
        };
        p.update_movement(both, &ground(), 0.5);
        assert_eq!(p.body.x(), 527.0);
        assert!(p.is_moving());

        // Pinned against the right edge: right blocked, falls through to left
        p.body.set_x(970.0);
        p.update_movement(both, &ground(), 0.1);
        assert_eq!(p.body.x(), 950.0);

        // Nothing held
        p.update_movement(MoveIntent::default(), &ground(), 0.1);
        assert!(!p.is_moving());
        assert_eq!(p.body.x(), 950.0);
    }

    #[test]
    fn test_footsteps_only_on_ground() {
        let mut p = player();
        let right = MoveIntent {
            left: false,
            right: true,
        };
        assert!(!p.update_movement(right, &ground(), 0.15));
        p.body.on_ground = true;
        assert!(p.update_movement(right, &ground(), 0.15));
        assert!(!p.update_movement(right, &ground(), 0.15));
        assert!(p.update_movement(right, &ground(), 0.15));
    }

    #[test]
    fn test_bomb_costs_size_down_to_original() {
        let mut p = player();
        assert!(p.drop_bomb().is_none());

        p.can_use_bomb = true;
        let at = p.drop_bomb().unwrap();
        assert_eq!(at, Vec2::new(427.0, 318.0 - 32.0));
        assert!((p.radius() - 24.0).abs() < 1e-4);
        assert!((p.scale() - 1.5).abs() < 1e-4);
        assert!(!p.can_use_bomb);

        // Small player: floored at the original radius
        p.reset_to_original_size();
        p.can_use_bomb = true;
        p.drop_bomb().unwrap();
        assert_eq!(p.radius(), 16.0);
        assert_eq!(p.scale(), 1.0);
    }

    #[test]
    fn test_animation_cycles() {
        let mut p = player();
        p.update_animation(0.2);
        assert_eq!(p.frame(), PlayerFrame::Idle);
        p.update_animation(0.2);
        assert_eq!(p.frame(), PlayerFrame::Standing);

        p.update_movement(
            MoveIntent {
                left: false,
                right: true,
            },
            &ground(),
            0.01,
        );
        p.update_animation(0.2);
        assert_eq!(p.frame(), PlayerFrame::Walking);
        p.update_animation(0.1);
        assert_eq!(p.frame(), PlayerFrame::Walking);
        p.update_animation(0.0);
        assert_eq!(p.frame(), PlayerFrame::Walking);
    }

    proptest! {
        #[test]
        fn prop_scale_stays_in_bounds(ops in proptest::collection::vec(0u8..4, 0..60)) {
            let mut p = player();
            for op in ops {
                match op {
                    0 => p.take_damage(),
                    1 => p.grow(),
                    2 => p.shrink(),
                    _ => {
                        p.can_use_bomb = true;
                        p.drop_bomb();
                    }
                }
                prop_assert!(p.scale() >= MIN_PLAYER_SCALE - 1e-6);
                prop_assert!(p.scale() <= MAX_PLAYER_SCALE + 1e-6);
                prop_assert!((p.radius() - p.original_radius() * p.scale()).abs() < 1e-3);
            }
        }
    }
}
