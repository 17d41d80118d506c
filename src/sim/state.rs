//! Game state and core simulation types
//!
//! Everything the orchestrator mutates per tick lives here: the common
//! airplane struct, bullets, falling power-ups, the latched input flags
//! and the top-level `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::enemy::{Enemy, EnemyKind};
use super::geom;
use super::player::Player;
use crate::config::{ConfigError, SimConfig};

/// Which side fired a projectile. Determines valid collision targets and
/// damage magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// Power-up kinds carried by falling mystery balls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallKind {
    TriShot,
    HealthUp,
    SpeedUp,
}

/// Lifecycle of an airplane: alive, playing its explosion animation, or
/// fully inert and ready for removal. `Inert` never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Exploding { frame: u32, ticks_in_frame: u64 },
    Inert,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Terminal state: the simulation is frozen apart from explosion
    /// animations running to completion.
    GameOver,
}

/// Fire-and-forget notifications for the audio/persistence collaborators.
/// The core never waits on these; the driver drains them after each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    ShotFired { owner: Owner },
    ExplosionStarted { pos: Vec2 },
    PickupCollected { kind: BallKind },
    EnemyDowned,
    /// Terminal hand-off to the persistence collaborator: the
    /// leaderboard record is carried whole, `(name, score)`.
    GameOver { name: String, score: u64 },
}

/// Movement directions reported by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Latched keyboard flags, written by the input collaborator via the
/// press/release methods and sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl InputState {
    pub fn press_direction(&mut self, dir: Direction) {
        self.set_direction(dir, true);
    }

    pub fn release_direction(&mut self, dir: Direction) {
        self.set_direction(dir, false);
    }

    pub fn press_fire(&mut self) {
        self.fire = true;
    }

    pub fn release_fire(&mut self) {
        self.fire = false;
    }

    fn set_direction(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }
}

/// A single fired shot, owned exclusively by the firing airplane
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub owner: Owner,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, owner: Owner) -> Self {
        Self {
            pos,
            vel,
            radius,
            owner,
        }
    }

    /// One tick of constant-velocity Euler integration
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        geom::is_off_screen(self.pos, width, height)
    }
}

/// Common state for any flying combatant. Player- and enemy-specific
/// fields live on the wrapping structs; shared damage/lifecycle behavior
/// lives here.
#[derive(Debug, Clone)]
pub struct Airplane {
    pub pos: Vec2,
    pub health: i32,
    pub size: f32,
    pub life: LifeState,
    pub bullets: Vec<Bullet>,
}

impl Airplane {
    pub fn new(pos: Vec2, health: i32, size: f32) -> Self {
        Self {
            pos,
            health,
            size,
            life: LifeState::Alive,
            bullets: Vec::new(),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        !matches!(self.life, LifeState::Alive)
    }

    /// Explosion finished (or never needed); safe to drop from the
    /// active set.
    pub fn is_inert(&self) -> bool {
        matches!(self.life, LifeState::Inert)
    }

    /// Apply damage, clamping health at zero. Idempotent once destroyed:
    /// the snapshot-iterate pattern can legitimately deliver a second hit
    /// in the same tick, which must be a no-op.
    ///
    /// Returns true if this call triggered destruction.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_destroyed() {
            return false;
        }
        self.health = (self.health - amount).max(0);
        if self.health == 0 {
            self.destroy();
            return true;
        }
        false
    }

    /// Begin the explosion sequence. Owned bullets disappear with their
    /// owner; health is forced to zero regardless of how we got here.
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.health = 0;
        self.bullets.clear();
        self.life = LifeState::Exploding {
            frame: 0,
            ticks_in_frame: 0,
        };
    }

    /// Advance the explosion animation by one tick. Each of
    /// `frame_count` frames holds for `frame_ticks` ticks, after which
    /// the airplane becomes inert. Runs concurrently with the rest of
    /// the simulation and is never cancelled externally.
    pub fn advance_explosion(&mut self, frame_ticks: u64, frame_count: u32) {
        if let LifeState::Exploding {
            frame,
            ticks_in_frame,
        } = &mut self.life
        {
            *ticks_in_frame += 1;
            if *ticks_in_frame >= frame_ticks {
                *ticks_in_frame = 0;
                *frame += 1;
                if *frame >= frame_count {
                    self.life = LifeState::Inert;
                }
            }
        }
    }
}

/// A falling power-up, consumed on proximity contact with the player
#[derive(Debug, Clone)]
pub struct MysteryBall {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub kind: BallKind,
    pub collected_tick: Option<u64>,
}

impl MysteryBall {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn is_off_screen(&self, height: f32) -> bool {
        geom::is_below_screen(self.pos, height)
    }

    pub fn is_collected(&self) -> bool {
        self.collected_tick.is_some()
    }
}

/// Sprite tags for the render collaborator. The core never touches
/// pixels; the render layer maps tags to sprites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy(EnemyKind),
    Bullet(Owner),
    Ball(BallKind),
    Explosion { frame: u32 },
}

/// One drawable item in the render snapshot
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub pos: Vec2,
    pub kind: SpriteKind,
    pub visible: bool,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: SimConfig,
    /// Display name for the leaderboard record emitted on game over
    pub pilot: String,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Active pickups (sorted by id for determinism)
    pub balls: Vec<MysteryBall>,
    /// Events accumulated since the last drain
    pub events: Vec<GameEvent>,
    /// Last score multiple that already spawned a mystery ball
    pub last_ball_spawn_score: u64,
    next_id: u32,
}

impl GameState {
    /// Create a new run. Fails fast on invalid configuration.
    pub fn new(config: SimConfig, seed: u64, pilot: impl Into<String>) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn = Vec2::new(0.0, -config.half_height() + crate::consts::SPAWN_MARGIN);
        let player = Player::new(spawn, &config);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            pilot: pilot.into(),
            time_ticks: 0,
            phase: GamePhase::Playing,
            player,
            enemies: Vec::new(),
            balls: Vec::new(),
            events: Vec::new(),
            last_ball_spawn_score: 0,
            next_id: 1,
        };
        state.events.push(GameEvent::Started);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Hand accumulated events to a collaborator
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entity vectors are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.balls.sort_by_key(|b| b.id);
    }

    /// Positions, kind tags and visibility flags for the render layer
    pub fn render_snapshot(&self) -> Vec<Sprite> {
        let mut sprites = Vec::new();
        push_plane(&mut sprites, &self.player.plane, SpriteKind::Player);
        for bullet in &self.player.plane.bullets {
            sprites.push(Sprite {
                pos: bullet.pos,
                kind: SpriteKind::Bullet(Owner::Player),
                visible: true,
            });
        }
        for enemy in &self.enemies {
            push_plane(&mut sprites, &enemy.plane, SpriteKind::Enemy(enemy.kind));
            for bullet in &enemy.plane.bullets {
                sprites.push(Sprite {
                    pos: bullet.pos,
                    kind: SpriteKind::Bullet(Owner::Enemy),
                    visible: true,
                });
            }
        }
        for ball in &self.balls {
            sprites.push(Sprite {
                pos: ball.pos,
                kind: SpriteKind::Ball(ball.kind),
                visible: !ball.is_collected(),
            });
        }
        sprites
    }
}

fn push_plane(sprites: &mut Vec<Sprite>, plane: &Airplane, kind: SpriteKind) {
    match plane.life {
        LifeState::Alive => sprites.push(Sprite {
            pos: plane.pos,
            kind,
            visible: true,
        }),
        LifeState::Exploding { frame, .. } => sprites.push(Sprite {
            pos: plane.pos,
            kind: SpriteKind::Explosion { frame },
            visible: true,
        }),
        LifeState::Inert => sprites.push(Sprite {
            pos: plane.pos,
            kind,
            visible: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut plane = Airplane::new(Vec2::ZERO, 3, 40.0);
        plane.take_damage(5);
        assert_eq!(plane.health, 0);
        assert!(plane.is_destroyed());
    }

    #[test]
    fn test_damage_idempotent_after_destruction() {
        let mut plane = Airplane::new(Vec2::ZERO, 1, 40.0);
        assert!(plane.take_damage(1));
        let life_before = plane.life;
        // A second hit in the same tick must be a complete no-op
        assert!(!plane.take_damage(1));
        assert_eq!(plane.health, 0);
        assert_eq!(plane.life, life_before);
    }

    #[test]
    fn test_one_player_bullet_hit_costs_ten() {
        let config = SimConfig::default();
        let mut enemy = Airplane::new(Vec2::ZERO, config.enemy_health, config.enemy_size);
        enemy.take_damage(config.player_bullet_damage);
        assert_eq!(
            enemy.health,
            (config.enemy_health - config.player_bullet_damage).max(0)
        );
        // With the default constants one hit is lethal
        assert!(enemy.is_destroyed());
    }

    #[test]
    fn test_one_enemy_bullet_hit_costs_one() {
        let config = SimConfig::default();
        let mut player = Airplane::new(Vec2::ZERO, config.player_max_health, config.player_size);
        player.take_damage(config.enemy_bullet_damage);
        assert_eq!(player.health, config.player_max_health - 1);
        assert!(!player.is_destroyed());
    }

    #[test]
    fn test_destroy_clears_bullets() {
        let mut plane = Airplane::new(Vec2::ZERO, 3, 40.0);
        plane
            .bullets
            .push(Bullet::new(Vec2::ZERO, Vec2::Y, 5.0, Owner::Enemy));
        plane.destroy();
        assert!(plane.bullets.is_empty());
        assert!(plane.is_destroyed());
    }

    #[test]
    fn test_explosion_sequence() {
        let mut plane = Airplane::new(Vec2::ZERO, 1, 40.0);
        plane.take_damage(1);
        // 4 frames x 12 ticks each
        for _ in 0..47 {
            plane.advance_explosion(12, 4);
        }
        assert!(!plane.is_inert());
        plane.advance_explosion(12, 4);
        assert!(plane.is_inert());
        // Terminal state never reverts
        plane.advance_explosion(12, 4);
        assert!(plane.is_inert());
    }

    #[test]
    fn test_bullet_advance_and_off_screen() {
        let mut bullet = Bullet::new(Vec2::new(0.0, 400.0), Vec2::new(0.0, 15.0), 5.0, Owner::Player);
        assert!(!bullet.is_off_screen(600.0, 820.0));
        bullet.advance();
        assert_eq!(bullet.pos.y, 415.0);
        assert!(bullet.is_off_screen(600.0, 820.0));
    }

    #[test]
    fn test_input_latching() {
        let mut input = InputState::default();
        input.press_direction(Direction::Left);
        input.press_fire();
        assert!(input.left && input.fire);
        input.release_direction(Direction::Left);
        input.release_fire();
        assert!(!input.left && !input.fire);
    }

    proptest! {
        /// Health stays in [0, start] under any damage sequence
        #[test]
        fn prop_health_clamp(start in 1i32..100, hits in proptest::collection::vec(1i32..50, 0..20)) {
            let mut plane = Airplane::new(Vec2::ZERO, start, 40.0);
            for hit in hits {
                plane.take_damage(hit);
                prop_assert!(plane.health >= 0);
                prop_assert!(plane.health <= start);
            }
        }

        /// A bullet moving toward a boundary leaves within a bounded
        /// number of ticks and never comes back inside.
        #[test]
        fn prop_bullet_exits_and_stays_out(
            x in -290.0f32..290.0,
            y in -400.0f32..400.0,
            vy in 1.0f32..20.0,
        ) {
            let mut bullet = Bullet::new(Vec2::new(x, y), Vec2::new(0.0, vy), 5.0, Owner::Player);
            let mut exited_at = None;
            for tick in 0..2000u32 {
                bullet.advance();
                if bullet.is_off_screen(600.0, 820.0) {
                    exited_at = Some(tick);
                    break;
                }
            }
            prop_assert!(exited_at.is_some());
            // No bounce: it must stay off-screen forever after
            for _ in 0..50 {
                bullet.advance();
                prop_assert!(bullet.is_off_screen(600.0, 820.0));
            }
        }
    }
}
