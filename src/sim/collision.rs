//! Collision detection and response between bodies and level geometry
//!
//! The heart of the game: deciding which side of the ground a body touched,
//! pushing it back out, and deciding how a player/enemy contact resolves.

use super::body::Body;
use super::geom::{Circle, Rect};
use super::ground::Ground;

/// Which side of the other object was touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSide {
    None,
    Left,
    Right,
    Top,
    Bottom,
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Side of the obstacle that was touched
    pub side: CollisionSide,
    /// Penetration depth along the resolved axis
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            side: CollisionSide::None,
            penetration: 0.0,
        }
    }
}

/// Classify a circle/rectangle contact by the axis of least overlap
pub fn circle_rect_collision(circle: &Circle, rect: &Rect) -> CollisionResult {
    if !circle.overlaps_rect(rect) {
        return CollisionResult::miss();
    }

    let overlap_left = circle.right() - rect.x;
    let overlap_right = rect.right() - circle.left();
    let overlap_top = circle.bottom() - rect.y;
    let overlap_bottom = rect.bottom() - circle.top();

    let min_x = overlap_left.min(overlap_right);
    let min_y = overlap_top.min(overlap_bottom);

    let (side, penetration) = if min_x < min_y {
        if overlap_left < overlap_right {
            (CollisionSide::Left, overlap_left)
        } else {
            (CollisionSide::Right, overlap_right)
        }
    } else if overlap_top < overlap_bottom {
        (CollisionSide::Top, overlap_top)
    } else {
        (CollisionSide::Bottom, overlap_bottom)
    };

    CollisionResult {
        hit: true,
        side,
        penetration,
    }
}

/// First ground the circle touches
pub fn ground_collision(circle: &Circle, grounds: &[Ground]) -> Option<(usize, CollisionResult)> {
    grounds
        .iter()
        .enumerate()
        .find(|(_, g)| g.collides_with(circle))
        .map(|(i, g)| (i, circle_rect_collision(circle, g.bounds())))
}

/// Which ground a body touched, and on which side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundContact {
    pub ground: usize,
    pub side: CollisionSide,
}

/// Push a body out of the ground and update its grounded state
///
/// Returns the contact that was resolved, `None` when airborne or phasing.
pub fn resolve_ground_collision(body: &mut Body, grounds: &[Ground]) -> Option<GroundContact> {
    if body.can_phase {
        return None;
    }

    let Some((index, result)) = ground_collision(body.bounds(), grounds) else {
        body.on_ground = false;
        return None;
    };
    let rect = *grounds[index].bounds();
    let r = body.radius();

    match result.side {
        CollisionSide::Top => {
            if body.velocity_y > 0.0 {
                body.on_ground = true;
                body.velocity_y = 0.0;
                body.set_y(rect.y - r);
            }
        }
        CollisionSide::Left => body.set_x(rect.x - r),
        CollisionSide::Right => body.set_x(rect.right() + r),
        CollisionSide::Bottom => {
            if body.velocity_y < 0.0 {
                body.velocity_y = 0.0;
                body.set_y(rect.bottom() + r);
            }
        }
        CollisionSide::None => {}
    }

    Some(GroundContact {
        ground: index,
        side: result.side,
    })
}

/// Put a body whose bottom sank below the ground's surface back on top of it
pub fn snap_to_surface(body: &mut Body, ground: &Ground) {
    let top = ground.bounds().y;
    if body.bounds().bottom() > top {
        body.set_y(top - body.radius());
        body.velocity_y = 0.0;
        body.on_ground = true;
    }
}

/// Where `other` touched `subject`, with the vertical offset weighted by `hardness`
///
/// Horizontal contacts win unless the vertical offset, scaled by hardness,
/// dominates. Bottom means `other` is below `subject`.
pub fn contact_side(subject: &Circle, other: &Circle, hardness: f32) -> CollisionSide {
    if !subject.overlaps(other) {
        return CollisionSide::None;
    }
    let dx = other.center.x - subject.center.x;
    let dy = other.center.y - subject.center.y;

    if dx.abs() > dy.abs() * hardness {
        if dx > 0.0 {
            CollisionSide::Right
        } else {
            CollisionSide::Left
        }
    } else if dy > 0.0 {
        CollisionSide::Bottom
    } else {
        CollisionSide::Top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn floor() -> Vec<Ground> {
        vec![Ground::new(Rect::new(0.0, 400.0, 1000.0, 80.0)).unwrap()]
    }

    #[test]
    fn test_landing_on_top() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(500.0, 395.0), 16.0).unwrap();
        body.velocity_y = 120.0;

        let contact = resolve_ground_collision(&mut body, &grounds).unwrap();
        assert_eq!(contact.side, CollisionSide::Top);
        assert_eq!(contact.ground, 0);
        assert!(body.on_ground);
        assert_eq!(body.velocity_y, 0.0);
        assert_eq!(body.y(), 384.0);
    }

    #[test]
    fn test_rising_through_top_is_not_a_landing() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(500.0, 395.0), 16.0).unwrap();
        body.velocity_y = -100.0;

        let contact = resolve_ground_collision(&mut body, &grounds).unwrap();
        assert_eq!(contact.side, CollisionSide::Top);
        assert!(!body.on_ground);
        assert_eq!(body.y(), 395.0);
    }

    #[test]
    fn test_side_pushback() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(-10.0, 440.0), 16.0).unwrap();
        let side = resolve_ground_collision(&mut body, &grounds).map(|c| c.side);
        assert_eq!(side, Some(CollisionSide::Left));
        assert_eq!(body.x(), -16.0);

        let mut body = Body::new(Vec2::new(1010.0, 440.0), 16.0).unwrap();
        let side = resolve_ground_collision(&mut body, &grounds).map(|c| c.side);
        assert_eq!(side, Some(CollisionSide::Right));
        assert_eq!(body.x(), 1016.0);
    }

    #[test]
    fn test_bottom_bump() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(500.0, 490.0), 16.0).unwrap();
        body.velocity_y = -300.0;
        let side = resolve_ground_collision(&mut body, &grounds).map(|c| c.side);
        assert_eq!(side, Some(CollisionSide::Bottom));
        assert_eq!(body.velocity_y, 0.0);
        assert_eq!(body.y(), 496.0);
    }

    #[test]
    fn test_airborne_leaves_ground() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(500.0, 100.0), 16.0).unwrap();
        body.on_ground = true;
        assert!(resolve_ground_collision(&mut body, &grounds).is_none());
        assert!(!body.on_ground);
    }

    #[test]
    fn test_phasing_body_ignores_ground() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(500.0, 410.0), 16.0).unwrap();
        body.can_phase = true;
        body.velocity_y = 50.0;
        assert!(resolve_ground_collision(&mut body, &grounds).is_none());
        assert_eq!(body.y(), 410.0);
    }

    #[test]
    fn test_snap_to_surface() {
        let grounds = floor();
        let mut body = Body::new(Vec2::new(500.0, 390.0), 16.0).unwrap();
        snap_to_surface(&mut body, &grounds[0]);
        assert_eq!(body.y(), 384.0);
        assert!(body.on_ground);
    }

    #[test]
    fn test_contact_side_hardness() {
        let player = Circle::new(Vec2::new(0.0, 0.0), 32.0);
        // Enemy up and to the right: 20 across, 30 up
        let enemy = Circle::new(Vec2::new(20.0, -30.0), 32.0);
        // Soft game: horizontal wins (20 > 30 * 0.5)
        assert_eq!(contact_side(&player, &enemy, 0.5), CollisionSide::Right);
        // Hard game: vertical wins, enemy lands on the player
        assert_eq!(contact_side(&player, &enemy, 1.0), CollisionSide::Top);

        let below = Circle::new(Vec2::new(-5.0, 40.0), 32.0);
        assert_eq!(contact_side(&player, &below, 1.0), CollisionSide::Bottom);

        let far = Circle::new(Vec2::new(100.0, 0.0), 32.0);
        assert_eq!(contact_side(&player, &far, 1.0), CollisionSide::None);
    }

    proptest! {
        #[test]
        fn prop_falling_body_never_ends_inside_ground(
            x in 50.0f32..950.0,
            depth in 0.0f32..15.0,
            vy in 1.0f32..600.0,
        ) {
            let grounds = floor();
            let mut body = Body::new(Vec2::new(x, 384.0 + depth), 16.0).unwrap();
            body.velocity_y = vy;
            resolve_ground_collision(&mut body, &grounds);
            prop_assert!(body.bounds().bottom() <= 400.0 + 1e-3);
            prop_assert!(body.on_ground);
        }

        #[test]
        fn prop_contact_side_is_mirrored(
            dx in -60.0f32..60.0,
            dy in -60.0f32..60.0,
            hardness in 0.5f32..1.0,
        ) {
            prop_assume!(dx != 0.0 && dy != 0.0);
            let a = Circle::new(Vec2::ZERO, 32.0);
            let b = Circle::new(Vec2::new(dx, dy), 32.0);
            let forward = contact_side(&a, &b, hardness);
            let backward = contact_side(&b, &a, hardness);
            let mirrored = match forward {
                CollisionSide::Left => CollisionSide::Right,
                CollisionSide::Right => CollisionSide::Left,
                CollisionSide::Top => CollisionSide::Bottom,
                CollisionSide::Bottom => CollisionSide::Top,
                CollisionSide::None => CollisionSide::None,
            };
            prop_assert_eq!(backward, mirrored);
        }
    }
}
