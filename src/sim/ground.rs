//! Static level geometry

use glam::Vec2;

use super::geom::{Circle, Rect};
use crate::error::{GameError, Result};

const MIN_DIMENSION: f32 = 1.0;
const MAX_DIMENSION: f32 = 10000.0;

/// Grass green
pub const DEFAULT_GROUND_TINT: [f32; 4] = [0.0, 0.89, 0.19, 1.0];

fn check_dimensions(what: &'static str, width: f32, height: f32, max: f32) -> Result<()> {
    let ok = |v: f32| (MIN_DIMENSION..=max).contains(&v);
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(GameError::InvalidDimensions {
            what,
            width,
            height,
            max,
        })
    }
}

/// A solid rectangle bodies stand on
#[derive(Debug, Clone)]
pub struct Ground {
    bounds: Rect,
    pub tint: [f32; 4],
}

impl Ground {
    pub fn new(bounds: Rect) -> Result<Self> {
        check_dimensions("ground", bounds.width, bounds.height, MAX_DIMENSION)?;
        Ok(Self {
            bounds,
            tint: DEFAULT_GROUND_TINT,
        })
    }

    /// Ground strip along the bottom of the window, spanning the whole map
    pub fn for_viewport(window: Vec2, map_width: f32) -> Result<Self> {
        Self::new(ground_bounds(window, map_width))
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> Result<()> {
        check_dimensions("ground", bounds.width, bounds.height, MAX_DIMENSION)?;
        self.bounds = bounds;
        Ok(())
    }

    pub fn collides_with(&self, circle: &Circle) -> bool {
        circle.overlaps_rect(&self.bounds)
    }
}

/// Height of the ground strip for a window height
pub fn ground_height(window_height: f32) -> f32 {
    crate::clamp_min_first(window_height * 0.2, 60.0, window_height * 0.3)
}

/// Bounds of the ground strip for the given window and map width
pub fn ground_bounds(window: Vec2, map_width: f32) -> Rect {
    let height = ground_height(window.y);
    Rect::new(
        (window.x - map_width) / 2.0,
        window.y - height,
        map_width,
        height,
    )
}
