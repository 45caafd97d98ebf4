//! The strip enemies are racing toward

use super::geom::Rect;
use crate::consts::{FINISH_LINE_TILES, TEXTURE_RESOLUTION};
use crate::error::{GameError, Result};

const MAX_DIMENSION: f32 = 5000.0;
const PULSE_SPEED: f32 = 3.0;
const OPACITY_MIN: f32 = 0.6;
const OPACITY_MAX: f32 = 1.0;

/// Yellow
pub const DEFAULT_FINISH_TINT: [f32; 4] = [0.99, 0.98, 0.0, 1.0];
/// Gray, shown while inactive
pub const INACTIVE_FINISH_TINT: [f32; 4] = [0.51, 0.51, 0.51, 1.0];

#[derive(Debug, Clone)]
pub struct FinishLine {
    bounds: Rect,
    pub tint: [f32; 4],
    active: bool,
}

fn check(bounds: &Rect) -> Result<()> {
    let ok = |v: f32| (1.0..=MAX_DIMENSION).contains(&v);
    if ok(bounds.width) && ok(bounds.height) {
        Ok(())
    } else {
        Err(GameError::InvalidDimensions {
            what: "finish line",
            width: bounds.width,
            height: bounds.height,
            max: MAX_DIMENSION,
        })
    }
}

impl FinishLine {
    pub fn new(bounds: Rect) -> Result<Self> {
        check(&bounds)?;
        Ok(Self {
            bounds,
            tint: DEFAULT_FINISH_TINT,
            active: true,
        })
    }

    /// Finish line centered horizontally in the window, sitting on the ground
    pub fn on_ground(window_width: f32, ground_top: f32) -> Result<Self> {
        Self::new(finish_line_bounds(window_width, ground_top))
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> Result<()> {
        check(&bounds)?;
        self.bounds = bounds;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Only changes the tint; enemies finish on an inactive line too
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Pulsing opacity for the given animation time
    pub fn pulse_alpha(&self, time: f32) -> f32 {
        let wave = ((time * PULSE_SPEED).sin() + 1.0) / 2.0;
        (OPACITY_MIN + (OPACITY_MAX - OPACITY_MIN) * wave).clamp(OPACITY_MIN, OPACITY_MAX)
    }

    /// Tint to draw with: gray while inactive
    pub fn current_tint(&self) -> [f32; 4] {
        if self.active {
            self.tint
        } else {
            INACTIVE_FINISH_TINT
        }
    }
}

pub fn finish_line_bounds(window_width: f32, ground_top: f32) -> Rect {
    let width = TEXTURE_RESOLUTION * FINISH_LINE_TILES;
    let height = TEXTURE_RESOLUTION;
    Rect::new(
        window_width / 2.0 - width / 2.0,
        ground_top - height,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> FinishLine {
        FinishLine::on_ground(854.0, 384.0).unwrap()
    }

    #[test]
    fn test_layout() {
        let f = line();
        assert_eq!(f.bounds().width, 112.0);
        assert_eq!(f.bounds().height, 16.0);
        assert_eq!(f.bounds().x, 371.0);
        assert_eq!(f.bounds().bottom(), 384.0);
    }

    #[test]
    fn test_inactive_line_is_gray() {
        let mut f = line();
        assert_eq!(f.current_tint(), DEFAULT_FINISH_TINT);
        f.set_active(false);
        assert!(!f.is_active());
        assert_eq!(f.current_tint(), INACTIVE_FINISH_TINT);
    }

    #[test]
    fn test_pulse_alpha_bounds() {
        let f = line();
        for i in 0..100 {
            let a = f.pulse_alpha(i as f32 * 0.07);
            assert!((0.6..=1.0).contains(&a));
        }
    }

    #[test]
    fn test_max_dimension() {
        assert!(FinishLine::new(Rect::new(0.0, 0.0, 5001.0, 16.0)).is_err());
        let mut f = line();
        assert!(f.set_bounds(Rect::new(0.0, 0.0, 0.5, 16.0)).is_err());
        assert_eq!(f.bounds().width, 112.0);
    }
}
