//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: camera, spawning, enemy AI, player
//! input, difficulty, physics and every entity interaction.

use glam::Vec2;
use rand::Rng;

use super::collision::{CollisionSide, contact_side, resolve_ground_collision, snap_to_surface};
use super::enemy::{DEFAULT_ENEMY_SPEED, Direction, Enemy};
use super::player::MoveIntent;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::lerp;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Drop a bomb (one-shot)
    pub bomb: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::Lost || dt <= 0.0 {
        return;
    }

    state.time_ticks += 1;
    state.time += dt;

    update_camera(state);
    spawn_enemies(state, dt);

    let player_x = state.player.body.x();
    let finish_x = state.finish_x();
    let map_width = state.map_size.x;
    for enemy in &mut state.enemies {
        enemy.update_ai(player_x, finish_x, map_width, dt);
    }

    update_world(state, input, dt);
    if state.phase == GamePhase::Lost {
        return;
    }

    state.player.update_animation(dt);
    if state.player.body.y() > state.window.y {
        state.player.body.set_y(state.window.y / 2.0);
    }

    for enemy in &mut state.enemies {
        enemy.update_animation(dt);
    }
}

/// Ease the camera toward the player, keeping the view over the ground
fn update_camera(state: &mut GameState) {
    let Some(ground) = state.ground_rect() else {
        return;
    };
    let half_width = state.window.x / 2.0;
    let mut target_x = state.player.body.x();
    if ground.width >= state.window.x {
        target_x = target_x.clamp(ground.x + half_width, ground.right() - half_width);
    }
    state.camera.target.x = lerp(state.camera.target.x, target_x, 0.1);
    state.camera.target.y = state.window.y - state.camera.offset.y;
}

/// Drop a new enemy just outside the view once the spawn timer fires
fn spawn_enemies(state: &mut GameState, dt: f32) {
    if state.enemies.len() >= state.max_enemies as usize {
        return;
    }
    state.spawn_timer += dt;
    if state.spawn_timer < state.spawn_interval {
        return;
    }

    let radius = TEXTURE_RESOLUTION * state.enemy_scale;
    let from_left = state.rng.random_range(0..=1) == 0;
    let height_divisor = state.rng.random_range(2..=4) as f32;

    let edge = state.window.x / 2.0 + 10.0;
    let (x, direction) = if from_left {
        (state.camera.target.x - edge, Direction::Right)
    } else {
        (state.camera.target.x + edge, Direction::Left)
    };
    let y = state.window.y / height_divisor;

    match Enemy::new(Vec2::new(x, y), radius, DEFAULT_ENEMY_SPEED, direction) {
        Ok(enemy) => {
            log::debug!("Spawned enemy at ({:.0}, {:.0}) radius {:.1}", x, y, radius);
            state.enemies.push(enemy);
            state.events.push(GameEvent::EnemySpawned { x });
        }
        Err(e) => log::warn!("Enemy spawn failed: {}", e),
    }

    state.spawn_timer = 0.0;
    state.spawn_interval *= SPAWN_INTERVAL_DECAY;
}

/// Grow enemies until they hit the size cap, then make side kills harder
fn apply_difficulty(state: &mut GameState, dt: f32) {
    state.buff_timer += dt;
    if state.buff_timer < BUFF_INTERVAL {
        return;
    }
    if state.enemy_scale < MAX_ENTITY_SCALE {
        state.enemy_scale *= BUFF_FACTOR;
    } else if state.hardness < MAX_GAME_HARDNESS {
        state.hardness *= BUFF_FACTOR;
    }
    state.buff_timer = 0.0;
}

fn update_world(state: &mut GameState, input: &TickInput, dt: f32) {
    let Some(ground) = state.ground_rect() else {
        return;
    };

    let intent = MoveIntent {
        left: input.left,
        right: input.right,
    };
    if state.player.update_movement(intent, &ground, dt) {
        state.events.push(GameEvent::Footstep);
    }
    if input.bomb
        && let Some(at) = state.player.drop_bomb()
        && state.explosions.create(at, &mut state.rng)
    {
        state.events.push(GameEvent::Explosion { pos: at });
    }

    apply_difficulty(state, dt);

    state.player.body.apply_gravity(dt);
    if let Some(contact) = resolve_ground_collision(&mut state.player.body, &state.grounds) {
        snap_to_surface(&mut state.player.body, &state.grounds[contact.ground]);
    }

    state.explosions.update(dt);

    if state.is_lost() {
        let kills = state.player.kills;
        log::info!("Game over with {} kills", kills);
        state.phase = GamePhase::Lost;
        state.events.push(GameEvent::GameOver { kills });
        return;
    }

    update_enemies(state, dt);
}

/// Physics and interactions for every enemy, dropping the ones that are done
fn update_enemies(state: &mut GameState, dt: f32) {
    let GameState {
        enemies,
        player,
        explosions,
        grounds,
        finish_line,
        events,
        hardness,
        window,
        ..
    } = state;

    enemies.retain_mut(|enemy| {
        if explosions.check_damage(enemy.body.center(), enemy.body.radius()) {
            player.kills += 1;
            events.push(GameEvent::EnemyKilled { by_explosion: true });
            return false;
        }

        enemy.body.apply_gravity(dt);
        resolve_ground_collision(&mut enemy.body, grounds);

        match contact_side(player.body.bounds(), enemy.body.bounds(), *hardness) {
            CollisionSide::Left | CollisionSide::Right => {
                player.kills += 1;
                events.push(GameEvent::EnemyKilled {
                    by_explosion: false,
                });
                if player.scale() < MAX_ENTITY_SCALE {
                    player.grow();
                    events.push(GameEvent::PlayerGrew);
                } else if !player.can_use_bomb {
                    player.can_use_bomb = true;
                    events.push(GameEvent::GainedBomb);
                }
                return false;
            }
            CollisionSide::Top => {
                player.take_damage();
                enemy.body.jump();
                events.push(GameEvent::PlayerHit);
            }
            CollisionSide::Bottom | CollisionSide::None => {}
        }

        // Enemies reach the finish line whether or not it is lit up
        if enemy.body.bounds().overlaps_rect(finish_line.bounds()) {
            player.shrink();
            events.push(GameEvent::EnemyFinished);
            return false;
        }

        enemy.body.y() <= window.y
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::{MAX_PLAYER_SCALE, Player};

    fn new_state(seed: u64) -> GameState {
        GameState::new(
            seed,
            Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            DEFAULT_MAX_ENEMIES,
        )
        .unwrap()
    }

    /// Let the player drop onto the ground
    fn settled(seed: u64) -> GameState {
        let mut state = new_state(seed);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        state.drain_events();
        state
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        let mut e =
            Enemy::new(Vec2::new(x, y), 32.0, DEFAULT_ENEMY_SPEED, Direction::Left).unwrap();
        e.body.on_ground = true;
        e
    }

    #[test]
    fn test_player_settles_on_ground() {
        let state = settled(1);
        assert!(state.player.body.on_ground);
        assert_eq!(state.player.body.y(), 384.0 - 32.0);
        assert_eq!(state.player.body.velocity_y, 0.0);
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let mut a = new_state(42);
        let mut b = new_state(42);
        for i in 0..1200 {
            let input = TickInput {
                left: i % 300 < 100,
                right: i % 300 > 200,
                bomb: false,
            };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.player.body.center(), b.player.body.center());
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.body.center(), eb.body.center());
        }
        assert_eq!(a.kills(), b.kills());
        assert_eq!(a.spawn_interval, b.spawn_interval);
    }

    #[test]
    fn test_first_spawn_after_interval() {
        let mut state = new_state(3);
        for _ in 0..250 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let spawns: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .collect();
        assert_eq!(spawns.len(), 1);
        assert_eq!(state.spawn_interval, INITIAL_SPAWN_INTERVAL * SPAWN_INTERVAL_DECAY);

        // Spawned just outside the view, facing inward
        let enemy = &state.enemies[0];
        let edge = DEFAULT_WINDOW_WIDTH / 2.0 + 10.0;
        let offset = (enemy.body.x() - state.camera.target.x).abs();
        assert!(offset > edge - 60.0, "offset {}", offset);
        assert_eq!(enemy.body.radius(), 32.0);
    }

    #[test]
    fn test_no_spawn_at_capacity() {
        let mut state = settled(5);
        state.max_enemies = 1;
        state.enemies.push(enemy_at(-100.0, 352.0));
        state.enemies[0].body.can_phase = true;
        state.enemies[0].body.set_y(-100_000.0);
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(
            !state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::EnemySpawned { .. }))
        );
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn test_side_contact_kills_and_grows() {
        let mut state = settled(1);
        let p = state.player.body.center();
        state.enemies.push(enemy_at(p.x + 50.0, p.y));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.kills(), 1);
        assert!((state.player.scale() - 2.4).abs() < 1e-4);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::EnemyKilled {
            by_explosion: false
        }));
        assert!(events.contains(&GameEvent::PlayerGrew));
    }

    #[test]
    fn test_side_contact_at_max_size_grants_bomb() {
        let mut state = settled(1);
        for _ in 0..10 {
            state.player.grow();
        }
        assert_eq!(state.player.scale(), MAX_PLAYER_SCALE);
        let r = state.player.radius();
        state.player.body.set_y(384.0 - r);
        let p = state.player.body.center();
        state.enemies.push(enemy_at(p.x - r - 20.0, 352.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert!(state.player.can_use_bomb);
        assert_eq!(state.player.scale(), MAX_PLAYER_SCALE);
    }

    #[test]
    fn test_enemy_landing_on_player_hurts() {
        let mut state = settled(1);
        let p = state.player.body.center();
        let mut enemy = enemy_at(p.x, p.y - 50.0);
        enemy.body.on_ground = false;
        state.enemies.push(enemy);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.enemies.len(), 1);
        assert!((state.player.radius() - 24.0).abs() < 1e-4);
        assert_eq!(state.enemies[0].body.velocity_y, JUMP_FORCE);
        assert_eq!(state.kills(), 0);
    }

    #[test]
    fn test_enemy_reaching_finish_shrinks_player() {
        let mut state = settled(1);
        state.player.body.set_x(900.0);
        state.enemies.push(enemy_at(400.0, 352.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert!((state.player.scale() - 2.0 / 1.1).abs() < 1e-4);
        assert!(state.drain_events().contains(&GameEvent::EnemyFinished));
    }

    #[test]
    fn test_inactive_finish_line_still_counts() {
        let mut state = settled(1);
        state.finish_line.set_active(false);
        state.player.body.set_x(900.0);
        state.enemies.push(enemy_at(400.0, 352.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_bomb_spends_size_and_explodes() {
        let mut state = settled(1);
        state.player.can_use_bomb = true;
        let input = TickInput {
            bomb: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(!state.player.can_use_bomb);
        assert!((state.player.radius() - 24.0).abs() < 1e-4);
        assert_eq!(state.explosions.active_count(), 1);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Explosion { .. }))
        );
    }

    #[test]
    fn test_explosion_kills_enemy() {
        let mut state = settled(1);
        state.player.body.set_x(900.0);
        let pos = Vec2::new(100.0, 352.0);
        state.enemies.push(enemy_at(pos.x, pos.y));
        state.explosions.create(pos, &mut state.rng);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.kills(), 1);
        assert!(state.drain_events().contains(&GameEvent::EnemyKilled {
            by_explosion: true
        }));
    }

    #[test]
    fn test_enemy_below_window_is_removed() {
        let mut state = settled(1);
        let mut enemy = enemy_at(-150.0, 600.0);
        enemy.body.can_phase = true;
        state.enemies.push(enemy);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.kills(), 0);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut state = settled(1);
        for _ in 0..3 {
            state.player.take_damage();
        }
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { kills: 0 }))
        );
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    fn bomb_tick(state: &mut GameState) {
        state.player.can_use_bomb = true;
        let input = TickInput {
            bomb: true,
            ..Default::default()
        };
        tick(state, &input, SIM_DT);
    }

    #[test]
    fn test_bomb_down_to_base_size_ends_game() {
        let mut state = settled(1);
        state.player.take_damage();
        state.player.take_damage();
        assert!((state.player.radius() - 18.0).abs() < 1e-4);
        bomb_tick(&mut state);
        assert_eq!(state.player.radius(), TEXTURE_RESOLUTION);
        assert_eq!(state.phase, GamePhase::Lost);
    }

    #[test]
    fn test_bomb_just_above_base_size_keeps_playing() {
        let mut state = settled(1);
        let center = state.player.body.center();
        state.player = Player::new(center, TEXTURE_RESOLUTION, 1.375).unwrap();
        bomb_tick(&mut state);
        assert_eq!(state.player.radius(), 16.5);
        assert_eq!(state.phase, GamePhase::Playing);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_difficulty_buffs() {
        let mut state = settled(1);
        state.max_enemies = 1;
        state.enemies.push(enemy_at(-100.0, -10_000.0));
        state.enemies[0].body.can_phase = true;
        state.buff_timer = BUFF_INTERVAL - SIM_DT / 2.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!((state.enemy_scale - 2.2).abs() < 1e-4);
        assert_eq!(state.buff_timer, 0.0);

        state.enemy_scale = MAX_ENTITY_SCALE;
        state.buff_timer = BUFF_INTERVAL;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!((state.hardness - 0.55).abs() < 1e-4);
    }

    #[test]
    fn test_camera_clamped_to_ground() {
        let mut state = settled(1);
        state.camera.target.x = 640.0;
        state.player.body.set_x(1050.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        // Ground spans [-213.5, 1067.5]; the view may not pass 1067.5 - 427
        assert!((state.camera.target.x - 640.05).abs() < 1e-2);
        assert_eq!(state.camera.target.y, 240.0);
    }

    #[test]
    fn test_player_falling_out_is_put_back() {
        let mut state = settled(1);
        state.player.body.can_phase = true;
        state.player.body.set_y(470.0);
        state.player.body.velocity_y = 900.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.body.y(), 240.0);
    }

    #[test]
    fn test_walking_player_emits_footsteps() {
        let mut state = settled(1);
        state.player.body.set_x(600.0);
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let mut steps = 0;
        for _ in 0..60 {
            tick(&mut state, &input, SIM_DT);
            steps += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Footstep))
                .count();
        }
        assert!((3..=5).contains(&steps), "steps {}", steps);
        assert!(state.player.body.x() > 790.0);
    }
}
