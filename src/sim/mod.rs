//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or I/O dependencies

pub mod enemy;
pub mod geom;
pub mod player;
pub mod state;
pub mod tick;

pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use geom::{circles_overlap, distance, is_below_screen, is_off_screen};
pub use player::Player;
pub use state::{
    Airplane, BallKind, Bullet, Direction, GameEvent, GamePhase, GameState, InputState, LifeState,
    MysteryBall, Owner, Sprite, SpriteKind,
};
pub use tick::tick;
