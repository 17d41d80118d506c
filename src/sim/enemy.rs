//! Enemy airplanes: the Patrol/Attack state machine and the kind-keyed
//! firing patterns.

use glam::Vec2;

use super::geom;
use super::state::{Airplane, Bullet, Owner};
use crate::config::SimConfig;

/// Visual kind of an enemy; also selects its firing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Single downward bullet, cooldown-gated
    Normal,
    /// Three angled bullets on a shared cooldown
    Tri,
    /// Normal pattern with a concurrent-bullet cap; the oldest active
    /// bullet is evicted to make room once the cap is reached
    Capped,
    /// Normal pattern, shorter cooldown
    Fast,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Normal,
        EnemyKind::Tri,
        EnemyKind::Capped,
        EnemyKind::Fast,
    ];
}

/// Behavioral state, re-evaluated every tick while alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// Horizontal back-and-forth with a slow downward drift
    Patrol,
    /// Straight dive at the player
    Attack,
}

/// Half-width of the patrol sweep around the spawn position
const PATROL_HALF_RANGE: f32 = 80.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub plane: Airplane,
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
    pub patrol_right: bool,
    pub last_shot_tick: Option<u64>,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, kind: EnemyKind, config: &SimConfig) -> Self {
        let x_limit = config.half_width() - config.enemy_size;
        Self {
            id,
            plane: Airplane::new(pos, config.enemy_health, config.enemy_size),
            kind,
            state: EnemyState::Patrol,
            patrol_min_x: (pos.x - PATROL_HALF_RANGE).max(-x_limit),
            patrol_max_x: (pos.x + PATROL_HALF_RANGE).min(x_limit),
            patrol_right: true,
            last_shot_tick: None,
        }
    }

    /// Re-evaluate Patrol vs Attack. Attack requires being vertically
    /// above the target AND inside the trigger distance; anything else
    /// is Patrol. No transitions once destroyed.
    pub fn update_state(&mut self, target_pos: Vec2, config: &SimConfig) {
        if self.plane.is_destroyed() {
            return;
        }
        let above = self.plane.pos.y > target_pos.y;
        let close = geom::distance(self.plane.pos, target_pos) < config.attack_distance;
        let next = if above && close {
            EnemyState::Attack
        } else {
            EnemyState::Patrol
        };
        if next != self.state {
            log::debug!("enemy {} -> {:?}", self.id, next);
            self.state = next;
        }
    }

    /// One tick of movement for the current state
    pub fn apply_movement(&mut self, config: &SimConfig) {
        match self.state {
            EnemyState::Patrol => {
                let dir = if self.patrol_right { 1.0 } else { -1.0 };
                let mut x = self.plane.pos.x + dir * config.enemy_speed;
                if x >= self.patrol_max_x {
                    x = self.patrol_max_x;
                    self.patrol_right = false;
                } else if x <= self.patrol_min_x {
                    x = self.patrol_min_x;
                    self.patrol_right = true;
                }
                self.plane.pos.x = x;
                self.plane.pos.y -= config.enemy_speed;
            }
            EnemyState::Attack => {
                self.plane.pos.y -= config.enemy_attack_speed;
            }
        }
    }

    /// Fallen past the bottom edge: the forced-loss condition
    pub fn breached_bottom(&self, config: &SimConfig) -> bool {
        geom::is_below_screen(self.plane.pos, config.screen_height)
    }

    /// Effective cooldown in ticks. Attacking halves it, floored at the
    /// configured minimum.
    fn cooldown_ticks(&self, config: &SimConfig) -> u64 {
        let base = match self.kind {
            EnemyKind::Fast => config.enemy_fast_cooldown_secs,
            _ => config.enemy_cooldown_secs,
        };
        let secs = match self.state {
            EnemyState::Attack => (base / 2.0).max(config.attack_cooldown_floor_secs),
            EnemyState::Patrol => base,
        };
        config.secs_to_ticks(secs)
    }

    /// Fire if the cooldown has elapsed, dispatching on kind. Returns
    /// true if bullets were created this tick.
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

        let muzzle = self.plane.pos - Vec2::new(0.0, self.plane.size + 5.0);
        let speed = config.enemy_bullet_speed;
        let boost = match self.state {
            EnemyState::Attack => config.attack_bullet_boost,
            EnemyState::Patrol => 1.0,
        };

        match self.kind {
            EnemyKind::Normal | EnemyKind::Fast => {
                self.push_bullet(muzzle, Vec2::new(0.0, -speed * boost), config);
            }
            EnemyKind::Capped => {
                // Evict the oldest active bullet once the cap is reached
                while self.plane.bullets.len() >= config.capped_max_bullets {
                    self.plane.bullets.remove(0);
                }
                self.push_bullet(muzzle, Vec2::new(0.0, -speed * boost), config);
            }
            EnemyKind::Tri => {
                // Downward mirror of the player's spread
                for angle_deg in [-60.0f32, -90.0, -120.0] {
                    let angle = angle_deg.to_radians();
                    let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed * boost);
                    self.push_bullet(muzzle, vel, config);
                }
            }
        }
        true
    }

    fn push_bullet(&mut self, pos: Vec2, vel: Vec2, config: &SimConfig) {
        self.plane
            .bullets
            .push(Bullet::new(pos, vel, config.bullet_radius, Owner::Enemy));
    }
}
