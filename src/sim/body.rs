//! Shared physical state for the player and enemies

use glam::Vec2;

use super::geom::Circle;
use crate::consts::{GRAVITY, JUMP_FORCE};
use crate::error::{GameError, Result};

pub const MIN_BODY_RADIUS: f32 = 1.0;
pub const MAX_BODY_RADIUS: f32 = 1000.0;

/// A circular body affected by gravity
#[derive(Debug, Clone)]
pub struct Body {
    bounds: Circle,
    /// Vertical velocity (positive = falling)
    pub velocity_y: f32,
    pub on_ground: bool,
    /// Phasing bodies pass through the ground
    pub can_phase: bool,
}

fn check_radius(radius: f32) -> Result<()> {
    if (MIN_BODY_RADIUS..=MAX_BODY_RADIUS).contains(&radius) {
        Ok(())
    } else {
        Err(GameError::InvalidRadius(radius))
    }
}

impl Body {
    pub fn new(center: Vec2, radius: f32) -> Result<Self> {
        check_radius(radius)?;
        Ok(Self {
            bounds: Circle::new(center, radius),
            velocity_y: 0.0,
            on_ground: false,
            can_phase: false,
        })
    }

    pub fn bounds(&self) -> &Circle {
        &self.bounds
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center
    }

    pub fn x(&self) -> f32 {
        self.bounds.center.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.center.y
    }

    pub fn radius(&self) -> f32 {
        self.bounds.radius
    }

    pub fn set_x(&mut self, x: f32) {
        self.bounds.center.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.bounds.center.y = y;
    }

    pub fn translate_x(&mut self, dx: f32) {
        self.bounds.center.x += dx;
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        check_radius(radius)?;
        self.bounds.radius = radius;
        Ok(())
    }

    pub fn jump(&mut self) {
        self.velocity_y = JUMP_FORCE;
        self.on_ground = false;
    }

    /// Semi-implicit Euler fall step
    pub fn apply_gravity(&mut self, dt: f32) {
        self.velocity_y += GRAVITY * dt;
        self.bounds.center.y += self.velocity_y * dt;
    }
}
