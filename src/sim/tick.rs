//! Fixed timestep simulation tick
//!
//! One call advances the whole simulation by one step. Ordering within a
//! tick is fixed: player first, then every enemy, then pickups, then the
//! spawn policy — so newly spawned entities never act in the tick that
//! created them.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyKind};
use super::geom;
use super::state::{BallKind, GameEvent, GamePhase, GameState, InputState, MysteryBall, Owner};
use crate::consts::SPAWN_MARGIN;

/// Advance the game state by one fixed timestep.
pub fn tick(state: &mut GameState, input: &InputState) {
    state.time_ticks += 1;
    let now = state.time_ticks;

    if state.is_game_over() {
        // The simulation is frozen, but explosion animations still run
        // to their terminal frame.
        advance_explosions(state);
        return;
    }

    // 1. Player: ability expiry, movement, firing, own bullets vs enemies
    state.player.update_abilities(now, &state.config);
    state.player.apply_movement(input, &state.config);
    if input.fire && state.player.try_shoot(now, &state.config) {
        state.events.push(GameEvent::ShotFired {
            owner: Owner::Player,
        });
    }
    update_player_bullets(state);

    // 2. Enemies: state machine, movement, breach check, bullets, firing
    update_enemies(state, now);

    // Explosion animations tick concurrently with everything else
    advance_explosions(state);

    // 3. Drop enemies whose explosion finished; each one scores a point
    remove_finished_enemies(state);

    // 4. Pickups: fall, collect, expire
    update_mystery_balls(state, now);

    // 5. Spawn policy runs last
    if state.enemies.is_empty() {
        spawn_wave(state);
    }
    maybe_spawn_mystery_ball(state);

    // 6. Terminal check
    if state.player.plane.is_destroyed() && !state.is_game_over() {
        state.phase = GamePhase::GameOver;
        let score = state.player.score;
        log::info!("game over: {} scored {}", state.pilot, score);
        state.events.push(GameEvent::GameOver {
            name: state.pilot.clone(),
            score,
        });
    }

    state.normalize_order();
}

/// Advance player bullets and resolve hits against enemies. A bullet can
/// hit at most one enemy per tick (first match in iteration order wins)
/// and is removed on hit or on leaving the playfield.
fn update_player_bullets(state: &mut GameState) {
    let GameState {
        player,
        enemies,
        events,
        config,
        ..
    } = state;

    let mut i = 0;
    while i < player.plane.bullets.len() {
        player.plane.bullets[i].advance();
        let bullet = &player.plane.bullets[i];

        let mut hit = false;
        for enemy in enemies.iter_mut() {
            if enemy.plane.is_destroyed() {
                continue;
            }
            if geom::circles_overlap(bullet.pos, bullet.radius, enemy.plane.pos, enemy.plane.size)
            {
                if enemy.plane.take_damage(config.player_bullet_damage) {
                    events.push(GameEvent::ExplosionStarted {
                        pos: enemy.plane.pos,
                    });
                }
                hit = true;
                break;
            }
        }

        if hit
            || player.plane.bullets[i].is_off_screen(config.screen_width, config.screen_height)
        {
            player.plane.bullets.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Per-enemy update in a fixed order: state machine, movement,
/// boundary breach, bullet advance + collision against the player, then
/// firing.
fn update_enemies(state: &mut GameState, now: u64) {
    let GameState {
        player,
        enemies,
        events,
        config,
        ..
    } = state;

    for enemy in enemies.iter_mut() {
        if enemy.plane.is_destroyed() {
            // Destruction already cleared its bullets; nothing moves.
            continue;
        }

        enemy.update_state(player.plane.pos, config);
        enemy.apply_movement(config);

        if enemy.breached_bottom(config) {
            // Forced-loss condition: the breach costs the player a point
            // of health and the enemy is gone regardless of its own
            // remaining health.
            log::debug!("enemy {} breached the bottom edge", enemy.id);
            if player.plane.take_damage(1) {
                events.push(GameEvent::ExplosionStarted {
                    pos: player.plane.pos,
                });
            }
            enemy.plane.destroy();
            events.push(GameEvent::ExplosionStarted {
                pos: enemy.plane.pos,
            });
            continue;
        }

        let mut i = 0;
        while i < enemy.plane.bullets.len() {
            enemy.plane.bullets[i].advance();
            let bullet = &enemy.plane.bullets[i];

            let hit = geom::circles_overlap(
                bullet.pos,
                bullet.radius,
                player.plane.pos,
                player.plane.size,
            );
            if hit {
                if player.plane.take_damage(config.enemy_bullet_damage) {
                    events.push(GameEvent::ExplosionStarted {
                        pos: player.plane.pos,
                    });
                }
                enemy.plane.bullets.remove(i);
            } else if bullet.is_off_screen(config.screen_width, config.screen_height) {
                enemy.plane.bullets.remove(i);
            } else {
                i += 1;
            }
        }

        if enemy.try_shoot(now, config) {
            events.push(GameEvent::ShotFired {
                owner: Owner::Enemy,
            });
        }
    }
}

fn advance_explosions(state: &mut GameState) {
    let frame_ticks = state.config.explosion_frame_ticks();
    let frames = state.config.explosion_frames;
    state.player.plane.advance_explosion(frame_ticks, frames);
    for enemy in &mut state.enemies {
        enemy.plane.advance_explosion(frame_ticks, frames);
    }
}

fn remove_finished_enemies(state: &mut GameState) {
    let before = state.enemies.len();
    state.enemies.retain(|e| !e.plane.is_inert());
    let downed = before - state.enemies.len();
    for _ in 0..downed {
        state.player.add_score(1);
        state.events.push(GameEvent::EnemyDowned);
    }
    if downed > 0 {
        log::debug!("{} enemy(ies) removed, score {}", downed, state.player.score);
    }
}

/// Advance falling balls, resolve pickups against the player, drop the
/// rest once they exit the bottom of the field.
fn update_mystery_balls(state: &mut GameState, now: u64) {
    let GameState {
        player,
        balls,
        events,
        config,
        ..
    } = state;

    let mut i = 0;
    while i < balls.len() {
        balls[i].advance();
        let ball = &mut balls[i];

        let picked = !player.plane.is_destroyed()
            && geom::distance(player.plane.pos, ball.pos) < player.plane.size + ball.size;
        if picked {
            ball.collected_tick = Some(now);
            match ball.kind {
                BallKind::TriShot => player.activate_tri_shot(now),
                BallKind::HealthUp => player.increase_health(config),
                BallKind::SpeedUp => player.double_speed(now),
            }
            log::info!("pickup collected: {:?}", ball.kind);
            events.push(GameEvent::PickupCollected { kind: ball.kind });
            balls.remove(i);
        } else if balls[i].is_off_screen(config.screen_height) {
            balls.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Spawn a fresh wave of 1-4 enemies at non-overlapping top-of-field
/// positions with random kinds.
fn spawn_wave(state: &mut GameState) {
    let count = state
        .rng
        .random_range(state.config.wave_min_enemies..=state.config.wave_max_enemies);
    let y = state.config.half_height() - SPAWN_MARGIN;
    let x_range = state.config.half_width() - SPAWN_MARGIN;
    let min_gap = state.config.enemy_size * 2.0;

    let mut placed: Vec<f32> = Vec::with_capacity(count as usize);
    for _ in 0..count {
        // Rejection-sample a spawn column clear of the others; bounded
        // attempts, and a slot that cannot be cleared is skipped rather
        // than spawning overlapped
        let x = (0..32)
            .map(|_| state.rng.random_range(-x_range..=x_range))
            .find(|&x| placed.iter().all(|&px| (px - x).abs() >= min_gap));
        let Some(x) = x else {
            log::debug!("no clear spawn column found, shrinking wave");
            continue;
        };
        placed.push(x);

        let kind = EnemyKind::ALL[state.rng.random_range(0..EnemyKind::ALL.len())];
        let id = state.next_entity_id();
        let enemy = Enemy::new(id, Vec2::new(x, y), kind, &state.config);
        state.enemies.push(enemy);
    }
    log::info!("spawned wave of {} enemies", placed.len());
}

/// Drop one mystery ball whenever the score reaches a fresh nonzero
/// multiple of the spawn interval.
fn maybe_spawn_mystery_ball(state: &mut GameState) {
    let score = state.player.score;
    let interval = state.config.ball_spawn_score_interval;
    if score == 0 || score % interval != 0 || score == state.last_ball_spawn_score {
        return;
    }
    state.last_ball_spawn_score = score;

    let kind = match state.rng.random_range(0..3) {
        0 => BallKind::TriShot,
        1 => BallKind::HealthUp,
        _ => BallKind::SpeedUp,
    };
    let x_range = state.config.half_width() - SPAWN_MARGIN;
    let x = state.rng.random_range(-x_range..=x_range);
    let id = state.next_entity_id();
    state.balls.push(MysteryBall {
        id,
        pos: Vec2::new(x, state.config.half_height() - SPAWN_MARGIN),
        vel: Vec2::new(0.0, -state.config.ball_fall_speed),
        size: state.config.ball_size,
        kind,
        collected_tick: None,
    });
    log::info!("mystery ball spawned: {:?} at score {}", kind, score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::enemy::EnemyState;
    use crate::sim::state::{Bullet, LifeState};

    fn new_state() -> GameState {
        GameState::new(SimConfig::default(), 12345, "test").unwrap()
    }

    /// Build a state with no enemies/balls and the spawn policy unable
    /// to interfere (one parked enemy far away keeps waves from
    /// spawning).
    fn state_with_sentinel() -> GameState {
        let mut state = new_state();
        let id = state.next_entity_id();
        let sentinel = Enemy::new(
            id,
            Vec2::new(-200.0, 300.0),
            EnemyKind::Normal,
            &state.config,
        );
        state.enemies.push(sentinel);
        state
    }

    #[test]
    fn test_first_tick_spawns_wave() {
        let mut state = new_state();
        tick(&mut state, &InputState::default());
        let n = state.enemies.len() as u32;
        assert!(n >= 1 && n <= state.config.wave_max_enemies);
        // Spawn policy runs last: fresh enemies have not moved or fired
        for enemy in &state.enemies {
            assert_eq!(enemy.plane.pos.y, state.config.half_height() - 50.0);
            assert!(enemy.plane.bullets.is_empty());
        }
    }

    #[test]
    fn test_narrow_playfield_fails_at_construction() {
        // Too narrow for any spawn column; must be rejected up front
        // rather than panicking once the first wave is placed
        let mut cfg = SimConfig::default();
        cfg.screen_width = 90.0;
        assert!(GameState::new(cfg, 1, "test").is_err());
    }

    #[test]
    fn test_wave_spawns_non_overlapping() {
        let mut state = new_state();
        for _ in 0..20 {
            state.enemies.clear();
            tick(&mut state, &InputState::default());
            for (i, a) in state.enemies.iter().enumerate() {
                for b in state.enemies.iter().skip(i + 1) {
                    assert!(
                        (a.plane.pos.x - b.plane.pos.x).abs() >= state.config.enemy_size * 2.0
                    );
                }
            }
        }
    }

    #[test]
    fn test_enemy_above_player_attacks_and_dives() {
        // Scenario: one enemy directly above the player at distance 50
        let mut state = new_state();
        let player_pos = state.player.plane.pos;
        let id = state.next_entity_id();
        let enemy = Enemy::new(
            id,
            player_pos + Vec2::new(0.0, 50.0),
            EnemyKind::Normal,
            &state.config,
        );
        state.enemies.push(enemy);

        tick(&mut state, &InputState::default());

        let enemy = &state.enemies[0];
        assert_eq!(enemy.state, EnemyState::Attack);
        assert_eq!(
            enemy.plane.pos.y,
            player_pos.y + 50.0 - state.config.enemy_attack_speed
        );
    }

    #[test]
    fn test_player_bullet_downs_enemy_and_scores() {
        let mut state = state_with_sentinel();
        // Put an enemy right in the path of a bullet
        let target_pos = state.player.plane.pos + Vec2::new(0.0, 200.0);
        let id = state.next_entity_id();
        let enemy = Enemy::new(id, target_pos, EnemyKind::Normal, &state.config);
        state.enemies.push(enemy);
        state.player.plane.bullets.push(Bullet::new(
            target_pos - Vec2::new(0.0, state.config.bullet_speed + 10.0),
            Vec2::new(0.0, state.config.bullet_speed),
            state.config.bullet_radius,
            Owner::Player,
        ));

        tick(&mut state, &InputState::default());

        // One 10-damage hit destroys a 10-health enemy
        let enemy = state.enemies.iter().find(|e| e.id == id).unwrap();
        assert!(enemy.plane.is_destroyed());
        assert!(state.player.plane.bullets.is_empty());

        // Run out the explosion; the enemy is then removed and scored
        let explosion_ticks =
            state.config.explosion_frame_ticks() * state.config.explosion_frames as u64 + 1;
        for _ in 0..explosion_ticks {
            tick(&mut state, &InputState::default());
        }
        assert!(state.enemies.iter().all(|e| e.id != id));
        assert_eq!(state.player.score, 1);
        assert!(state
            .drain_events()
            .iter()
            .any(|e| *e == GameEvent::EnemyDowned));
    }

    #[test]
    fn test_enemy_bullet_damage_asymmetry() {
        let mut state = state_with_sentinel();
        let player_pos = state.player.plane.pos;
        let health_before = state.player.plane.health;
        // Keep the sentinel's own gun on cooldown for this tick
        state.enemies[0].last_shot_tick = Some(0);
        // Drop an enemy bullet straight onto the player
        state.enemies[0].plane.bullets.push(Bullet::new(
            player_pos + Vec2::new(0.0, 10.0),
            Vec2::new(0.0, -1.0),
            state.config.bullet_radius,
            Owner::Enemy,
        ));

        tick(&mut state, &InputState::default());

        assert_eq!(state.player.plane.health, health_before - 1);
        assert!(state.enemies[0].plane.bullets.is_empty());
    }

    #[test]
    fn test_player_death_ends_game_and_explosion_completes() {
        // Scenario: player at health 1 takes one more point of damage
        let mut state = state_with_sentinel();
        state.player.plane.health = 1;
        let player_pos = state.player.plane.pos;
        state.enemies[0].plane.bullets.push(Bullet::new(
            player_pos + Vec2::new(0.0, 10.0),
            Vec2::new(0.0, -1.0),
            state.config.bullet_radius,
            Owner::Enemy,
        ));

        tick(&mut state, &InputState::default());

        assert!(state.player.plane.is_destroyed());
        assert_eq!(state.player.plane.health, 0);
        assert!(state.is_game_over());
        let events = state.drain_events();
        // The terminal event carries the whole leaderboard record
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver { name, score: 0 } if name == "test"
        )));

        // 4 frames x 200ms elapse across subsequent (frozen) ticks
        let explosion_ticks =
            state.config.explosion_frame_ticks() * state.config.explosion_frames as u64;
        for _ in 0..explosion_ticks {
            tick(&mut state, &InputState::default());
        }
        assert!(state.player.plane.is_inert());
    }

    #[test]
    fn test_game_over_freezes_simulation() {
        let mut state = state_with_sentinel();
        state.phase = GamePhase::GameOver;
        let enemy_pos = state.enemies[0].plane.pos;
        let mut input = InputState::default();
        input.fire = true;
        input.left = true;
        let player_pos = state.player.plane.pos;

        tick(&mut state, &input);

        assert_eq!(state.enemies[0].plane.pos, enemy_pos);
        assert_eq!(state.player.plane.pos, player_pos);
        assert!(state.player.plane.bullets.is_empty());
    }

    #[test]
    fn test_healthup_pickup_caps_at_max() {
        // Scenario: HealthUp picked up at health 2 (max 3), twice
        let mut state = state_with_sentinel();
        state.player.plane.health = 2;
        for _ in 0..2 {
            let id = state.next_entity_id();
            let pos = state.player.plane.pos;
            state.balls.push(MysteryBall {
                id,
                pos,
                vel: Vec2::ZERO,
                size: state.config.ball_size,
                kind: BallKind::HealthUp,
                collected_tick: None,
            });
            tick(&mut state, &InputState::default());
            assert_eq!(state.player.plane.health, 3);
        }
        assert!(state.balls.is_empty());
        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::PickupCollected { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_ball_spawns_at_score_interval_once() {
        let mut state = state_with_sentinel();
        state.player.score = state.config.ball_spawn_score_interval;
        tick(&mut state, &InputState::default());
        assert_eq!(state.balls.len(), 1);
        // Same multiple never triggers twice
        tick(&mut state, &InputState::default());
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_ball_removed_off_screen() {
        let mut state = state_with_sentinel();
        let id = state.next_entity_id();
        // Off to the side so the falling ball exits without being collected
        state.balls.push(MysteryBall {
            id,
            pos: Vec2::new(250.0, -state.config.half_height() + 1.0),
            vel: Vec2::new(0.0, -state.config.ball_fall_speed),
            size: state.config.ball_size,
            kind: BallKind::SpeedUp,
            collected_tick: None,
        });
        tick(&mut state, &InputState::default());
        assert!(state.balls.is_empty());
    }

    #[test]
    fn test_breach_damages_player_and_removes_enemy() {
        let mut state = state_with_sentinel();
        let health_before = state.player.plane.health;
        // Enemy below the player, one patrol drift step above the bottom
        // edge; its next move crosses it
        let id = state.next_entity_id();
        let enemy = Enemy::new(
            id,
            Vec2::new(
                0.0,
                -state.config.half_height() + state.config.enemy_speed - 1.0,
            ),
            EnemyKind::Normal,
            &state.config,
        );
        state.enemies.push(enemy);

        tick(&mut state, &InputState::default());

        assert_eq!(state.player.plane.health, health_before - 1);
        let enemy = state.enemies.iter().find(|e| e.id == id).unwrap();
        assert!(enemy.plane.is_destroyed());
        assert_eq!(enemy.plane.life, LifeState::Exploding { frame: 0, ticks_in_frame: 1 });
    }

    #[test]
    fn test_held_fire_emits_shot_events() {
        let mut state = state_with_sentinel();
        let mut input = InputState::default();
        input.fire = true;
        tick(&mut state, &input);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShotFired {
            owner: Owner::Player
        }));
        assert_eq!(state.player.plane.bullets.len(), 1);
    }

    #[test]
    fn test_determinism_same_seed_same_run() {
        let mut a = GameState::new(SimConfig::default(), 777, "a").unwrap();
        let mut b = GameState::new(SimConfig::default(), 777, "b").unwrap();
        let mut input = InputState::default();
        input.fire = true;
        input.right = true;
        for _ in 0..300 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.id, eb.id);
            assert_eq!(ea.plane.pos, eb.plane.pos);
        }
        assert_eq!(a.player.plane.pos, b.player.plane.pos);
        assert_eq!(a.player.score, b.player.score);
    }

    #[test]
    fn test_snapshot_reports_explosion_frames() {
        let mut state = state_with_sentinel();
        state.enemies[0].plane.destroy();
        let sprites = state.render_snapshot();
        assert!(sprites
            .iter()
            .any(|s| matches!(s.kind, crate::sim::state::SpriteKind::Explosion { frame: 0 })));
    }
}
