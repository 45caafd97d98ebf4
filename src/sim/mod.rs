//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod enemy;
pub mod explosion;
pub mod finish_line;
pub mod geom;
pub mod ground;
pub mod player;
pub mod state;
pub mod tick;

pub use body::Body;
pub use collision::{
    CollisionResult, CollisionSide, GroundContact, circle_rect_collision, contact_side,
    ground_collision, resolve_ground_collision, snap_to_surface,
};
pub use enemy::{Direction, Enemy, EnemyFrame};
pub use explosion::{Explosion, ExplosionManager, Particle, particle_color};
pub use finish_line::FinishLine;
pub use geom::{Circle, Rect};
pub use ground::Ground;
pub use player::{MoveIntent, Player, PlayerFrame};
pub use state::{Camera, GameEvent, GamePhase, GameState, RngState, check_window};
pub use tick::{TickInput, tick};
