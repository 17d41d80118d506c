//! Player airplane: input-driven movement, cooldown-gated shooting and
//! timed abilities.

use glam::Vec2;

use super::state::{Airplane, Bullet, InputState, Owner};
use crate::config::SimConfig;

/// The player's airplane (singleton, owned by the orchestrator)
#[derive(Debug, Clone)]
pub struct Player {
    pub plane: Airplane,
    /// Monotonically non-decreasing
    pub score: u64,
    pub speed_multiplier: f32,
    pub tri_shot: bool,
    /// Tick at which the current ability was activated. Both abilities
    /// share this one expiry timer.
    pub ability_since: Option<u64>,
    pub last_shot_tick: Option<u64>,
}

impl Player {
    pub fn new(pos: Vec2, config: &SimConfig) -> Self {
        Self {
            plane: Airplane::new(pos, config.player_max_health, config.player_size),
            score: 0,
            speed_multiplier: 1.0,
            tri_shot: false,
            ability_since: None,
            last_shot_tick: None,
        }
    }

    /// Move according to the held direction flags. Each axis of the
    /// proposed move is accepted independently only if it stays within
    /// the playfield (inset by the airplane's size).
    pub fn apply_movement(&mut self, input: &InputState, config: &SimConfig) {
        let step = config.player_speed * self.speed_multiplier;
        let mut dx = 0.0;
        let mut dy = 0.0;
        if input.up {
            dy += step;
        }
        if input.down {
            dy -= step;
        }
        if input.left {
            dx -= step;
        }
        if input.right {
            dx += step;
        }

        let size = self.plane.size;
        let x_max = config.half_width() - size;
        let y_max = config.half_height() - size;

        let new_x = self.plane.pos.x + dx;
        let new_y = self.plane.pos.y + dy;
        if -x_max < new_x && new_x < x_max {
            self.plane.pos.x = new_x;
        }
        if -y_max < new_y && new_y < y_max {
            self.plane.pos.y = new_y;
        }
    }

    /// Shot cooldown in ticks; longer while the tri-shot spread is active
    fn cooldown_ticks(&self, config: &SimConfig) -> u64 {
        let secs = if self.tri_shot {
            config.player_tri_cooldown_secs
        } else {
            config.player_cooldown_secs
        };
        config.secs_to_ticks(secs)
    }

    /// Fire if the cooldown has elapsed. Returns true if bullets were
    /// created this tick.
    pub fn try_shoot(&mut self, now: u64, config: &SimConfig) -> bool {
        if self.plane.is_destroyed() {
            return false;
        }
        if let Some(last) = self.last_shot_tick {
            if now - last < self.cooldown_ticks(config) {
                return false;
            }
        }
        self.last_shot_tick = Some(now);

        let muzzle = self.plane.pos + Vec2::new(0.0, self.plane.size + 5.0);
        let speed = config.bullet_speed;
        if self.tri_shot {
            // Three simultaneous shots at 60, 90 and 120 degrees from
            // horizontal, equal speed magnitude
            for angle_deg in [60.0f32, 90.0, 120.0] {
                let angle = angle_deg.to_radians();
                let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                self.plane
                    .bullets
                    .push(Bullet::new(muzzle, vel, config.bullet_radius, Owner::Player));
            }
        } else {
            self.plane.bullets.push(Bullet::new(
                muzzle,
                Vec2::new(0.0, speed),
                config.bullet_radius,
                Owner::Player,
            ));
        }
        true
    }

    pub fn activate_tri_shot(&mut self, now: u64) {
        self.tri_shot = true;
        self.ability_since = Some(now);
        log::debug!("tri-shot active at tick {now}");
    }

    pub fn double_speed(&mut self, now: u64) {
        self.speed_multiplier = 2.0;
        self.ability_since = Some(now);
        log::debug!("speed boost active at tick {now}");
    }

    pub fn increase_health(&mut self, config: &SimConfig) {
        self.plane.health = (self.plane.health + 1).min(config.player_max_health);
    }

    /// Revert both abilities to their defaults
    pub fn deactivate_ability(&mut self) {
        self.tri_shot = false;
        self.speed_multiplier = 1.0;
        self.ability_since = None;
    }

    /// Auto-revert abilities once the shared lifetime has elapsed
    pub fn update_abilities(&mut self, now: u64, config: &SimConfig) {
        if let Some(since) = self.ability_since {
            if now.saturating_sub(since) >= config.ability_lifetime_ticks() {
                self.deactivate_ability();
                log::debug!("ability expired at tick {now}");
            }
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }
}
