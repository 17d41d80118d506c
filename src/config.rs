//! Simulation configuration
//!
//! Every tuning constant the orchestrator needs, supplied once at
//! simulation start. Invalid values are rejected at construction rather
//! than silently clamped.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Configuration error raised at simulation construction
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("playfield dimensions must be positive (got {width} x {height})")]
    BadDimensions { width: f32, height: f32 },
    #[error("playfield too small for the {margin} spawn margin (got {width} x {height})")]
    TooSmall {
        width: f32,
        height: f32,
        margin: f32,
    },
    #[error("wave_min_enemies must not exceed wave_max_enemies (got {min}..{max})")]
    BadWaveBounds { min: u32, max: u32 },
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("explosion must have at least one frame")]
    NoExplosionFrames,
    #[error("max health must be at least 1 (got {0})")]
    BadMaxHealth(i32),
}

/// Playfield and tuning constants for one simulation run.
///
/// All time-denominated fields are in seconds; the simulation converts
/// them to tick counts against `tick_rate` so the core never touches a
/// wall clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks per second
    pub tick_rate: f32,
    pub screen_width: f32,
    pub screen_height: f32,

    pub player_speed: f32,
    pub player_max_health: i32,
    pub player_size: f32,
    pub player_cooldown_secs: f32,
    pub player_tri_cooldown_secs: f32,

    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub enemy_bullet_speed: f32,

    pub enemy_speed: f32,
    pub enemy_attack_speed: f32,
    pub enemy_health: i32,
    pub enemy_size: f32,
    pub attack_distance: f32,
    pub enemy_cooldown_secs: f32,
    pub enemy_fast_cooldown_secs: f32,
    pub attack_cooldown_floor_secs: f32,
    pub attack_bullet_boost: f32,
    pub capped_max_bullets: usize,

    pub player_bullet_damage: i32,
    pub enemy_bullet_damage: i32,

    pub explosion_frames: u32,
    pub explosion_frame_delay_secs: f32,

    pub ability_lifetime_secs: f32,
    pub ball_fall_speed: f32,
    pub ball_size: f32,
    pub ball_spawn_score_interval: u64,

    pub wave_min_enemies: u32,
    pub wave_max_enemies: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 1.0 / SIM_DT,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_max_health: PLAYER_MAX_HEALTH,
            player_size: PLAYER_SIZE,
            player_cooldown_secs: PLAYER_COOLDOWN_SECS,
            player_tri_cooldown_secs: PLAYER_TRI_COOLDOWN_SECS,
            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            enemy_speed: ENEMY_SPEED,
            enemy_attack_speed: ENEMY_ATTACK_SPEED,
            enemy_health: ENEMY_HEALTH,
            enemy_size: ENEMY_SIZE,
            attack_distance: ATTACK_DISTANCE,
            enemy_cooldown_secs: ENEMY_COOLDOWN_SECS,
            enemy_fast_cooldown_secs: ENEMY_FAST_COOLDOWN_SECS,
            attack_cooldown_floor_secs: ATTACK_COOLDOWN_FLOOR_SECS,
            attack_bullet_boost: ATTACK_BULLET_BOOST,
            capped_max_bullets: CAPPED_MAX_BULLETS,
            player_bullet_damage: PLAYER_BULLET_DAMAGE,
            enemy_bullet_damage: ENEMY_BULLET_DAMAGE,
            explosion_frames: EXPLOSION_FRAMES,
            explosion_frame_delay_secs: EXPLOSION_FRAME_DELAY_SECS,
            ability_lifetime_secs: ABILITY_LIFETIME_SECS,
            ball_fall_speed: MYSTERY_BALL_FALL_SPEED,
            ball_size: MYSTERY_BALL_SIZE,
            ball_spawn_score_interval: BALL_SPAWN_SCORE_INTERVAL,
            wave_min_enemies: WAVE_MIN_ENEMIES,
            wave_max_enemies: WAVE_MAX_ENEMIES,
        }
    }
}

impl SimConfig {
    /// Validate the configuration, failing fast on nonsense values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(ConfigError::BadDimensions {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        // Spawn columns are sampled inside the margin-inset field; the
        // inset range must be non-empty
        if self.half_width() <= SPAWN_MARGIN || self.half_height() <= SPAWN_MARGIN {
            return Err(ConfigError::TooSmall {
                width: self.screen_width,
                height: self.screen_height,
                margin: SPAWN_MARGIN,
            });
        }
        if self.wave_min_enemies > self.wave_max_enemies {
            return Err(ConfigError::BadWaveBounds {
                min: self.wave_min_enemies,
                max: self.wave_max_enemies,
            });
        }
        for (name, value) in [
            ("tick_rate", self.tick_rate),
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_radius", self.bullet_radius),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("enemy_speed", self.enemy_speed),
            ("enemy_attack_speed", self.enemy_attack_speed),
            ("attack_distance", self.attack_distance),
            ("player_cooldown_secs", self.player_cooldown_secs),
            ("enemy_cooldown_secs", self.enemy_cooldown_secs),
            ("explosion_frame_delay_secs", self.explosion_frame_delay_secs),
            ("ability_lifetime_secs", self.ability_lifetime_secs),
            ("ball_fall_speed", self.ball_fall_speed),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.explosion_frames == 0 {
            return Err(ConfigError::NoExplosionFrames);
        }
        if self.player_max_health < 1 {
            return Err(ConfigError::BadMaxHealth(self.player_max_health));
        }
        Ok(())
    }

    /// Convert a seconds-denominated duration to whole ticks (at least 1).
    pub fn secs_to_ticks(&self, secs: f32) -> u64 {
        ((secs * self.tick_rate).round() as u64).max(1)
    }

    /// Ticks each explosion frame stays on screen
    pub fn explosion_frame_ticks(&self) -> u64 {
        self.secs_to_ticks(self.explosion_frame_delay_secs)
    }

    /// Ticks an ability stays active after pickup
    pub fn ability_lifetime_ticks(&self) -> u64 {
        self.secs_to_ticks(self.ability_lifetime_secs)
    }

    /// Horizontal playfield half-extent
    pub fn half_width(&self) -> f32 {
        self.screen_width / 2.0
    }

    /// Vertical playfield half-extent
    pub fn half_height(&self) -> f32 {
        self.screen_height / 2.0
    }
}
