//! Enemies racing toward the finish line

use glam::Vec2;

use super::body::Body;
use crate::error::{GameError, Result};

pub const DEFAULT_ENEMY_SPEED: f32 = 200.0;
const MIN_SPEED: f32 = 1.0;
const MAX_SPEED: f32 = 1000.0;
const ANIMATION_INTERVAL: f32 = 0.1;
/// How far ahead an enemy notices the player and jumps at it
pub const PLAYER_DETECTION_RANGE: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyFrame {
    Idle,
    Running1,
    Running2,
    Running3,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    speed: f32,
    pub direction: Direction,
    moving: bool,
    frame: EnemyFrame,
    anim_timer: f32,
}

impl Enemy {
    pub fn new(center: Vec2, radius: f32, speed: f32, direction: Direction) -> Result<Self> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(GameError::InvalidSpeed {
                what: "enemy",
                speed,
                max: MAX_SPEED,
            });
        }
        Ok(Self {
            body: Body::new(center, radius)?,
            speed,
            direction,
            moving: false,
            frame: EnemyFrame::Idle,
            anim_timer: 0.0,
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn frame(&self) -> EnemyFrame {
        self.frame
    }

    /// Head for the finish line, jumping at a player standing in the way
    pub fn update_ai(&mut self, player_x: f32, finish_x: f32, map_width: f32, dt: f32) {
        if dt <= 0.0 {
            log::warn!("Enemy AI skipped for non-positive dt {}", dt);
            return;
        }
        self.update_movement(finish_x, map_width, dt);
        if self.body.on_ground && self.player_in_jump_range(player_x) {
            self.body.jump();
        }
    }

    fn update_movement(&mut self, finish_x: f32, map_width: f32, dt: f32) {
        self.moving = false;
        let x = self.body.x();
        let r = self.body.radius();

        if x < finish_x && x + r < map_width {
            self.direction = Direction::Right;
            self.body.translate_x(self.speed * dt);
            self.moving = true;
        } else if x > finish_x && x - r > 0.0 {
            self.direction = Direction::Left;
            self.body.translate_x(-self.speed * dt);
            self.moving = true;
        }
    }

    /// Player ahead of us, within detection range
    pub fn player_in_jump_range(&self, player_x: f32) -> bool {
        let x = self.body.x();
        match self.direction {
            Direction::Right => player_x >= x && player_x <= x + PLAYER_DETECTION_RANGE,
            Direction::Left => player_x <= x && player_x >= x - PLAYER_DETECTION_RANGE,
        }
    }

    pub fn update_animation(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        if !self.body.on_ground {
            self.frame = EnemyFrame::Running1;
            self.anim_timer = 0.0;
        } else if self.moving {
            self.anim_timer += dt;
            if self.anim_timer >= ANIMATION_INTERVAL {
                self.frame = match self.frame {
                    EnemyFrame::Running1 => EnemyFrame::Running2,
                    EnemyFrame::Running2 => EnemyFrame::Running3,
                    EnemyFrame::Running3 | EnemyFrame::Idle => EnemyFrame::Running1,
                };
                self.anim_timer = 0.0;
            }
        } else {
            self.frame = EnemyFrame::Idle;
            self.anim_timer = 0.0;
        }
    }
}
