//! Skystrike - a vertical-scrolling arcade airplane shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `config`: Playfield/tuning constants with fail-fast validation
//! - `highscores`: Flat CSV leaderboard
//!
//! Rendering, keyboard capture and audio playback are external
//! collaborators: they feed latched input flags into the core and consume
//! the per-tick render snapshot and event stream.

pub mod config;
pub mod highscores;
pub mod sim;

pub use config::SimConfig;
pub use highscores::Leaderboard;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (centered rectangle)
    pub const SCREEN_WIDTH: f32 = 600.0;
    pub const SCREEN_HEIGHT: f32 = 820.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: i32 = 3;
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Base shot cooldown, and the longer cooldown while tri-shot is active
    pub const PLAYER_COOLDOWN_SECS: f32 = 0.2;
    pub const PLAYER_TRI_COOLDOWN_SECS: f32 = 0.5;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 15.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 3.0;
    pub const ENEMY_ATTACK_SPEED: f32 = 6.0;
    pub const ENEMY_HEALTH: i32 = 10;
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ATTACK_DISTANCE: f32 = 300.0;
    pub const ENEMY_COOLDOWN_SECS: f32 = 1.0;
    pub const ENEMY_FAST_COOLDOWN_SECS: f32 = 0.4;
    /// Cooldown floor while in Attack state
    pub const ATTACK_COOLDOWN_FLOOR_SECS: f32 = 0.5;
    /// Bullet vertical speed multiplier while attacking
    pub const ATTACK_BULLET_BOOST: f32 = 1.8;
    /// Concurrent-bullet cap for the Capped enemy kind
    pub const CAPPED_MAX_BULLETS: usize = 3;

    /// Damage policy: intentionally asymmetric (enemies die to one hit,
    /// the player has a small multi-hit pool)
    pub const PLAYER_BULLET_DAMAGE: i32 = 10;
    pub const ENEMY_BULLET_DAMAGE: i32 = 1;

    /// Explosion animation
    pub const EXPLOSION_FRAMES: u32 = 4;
    pub const EXPLOSION_FRAME_DELAY_SECS: f32 = 0.2;

    /// Power-ups
    pub const ABILITY_LIFETIME_SECS: f32 = 5.0;
    pub const MYSTERY_BALL_FALL_SPEED: f32 = 5.0;
    pub const MYSTERY_BALL_SIZE: f32 = 20.0;
    /// A mystery ball drops at every nonzero multiple of this score
    pub const BALL_SPAWN_SCORE_INTERVAL: u64 = 5;

    /// Enemy wave size bounds (inclusive)
    pub const WAVE_MIN_ENEMIES: u32 = 1;
    pub const WAVE_MAX_ENEMIES: u32 = 4;

    /// Inset from the playfield edges used when placing spawned
    /// entities (and the player's start position)
    pub const SPAWN_MARGIN: f32 = 50.0;
}
