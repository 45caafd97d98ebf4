//! Scene building: turns the app state into triangles and text labels
//!
//! Pure and platform-free so the web front end only has to upload the
//! vertices and place the labels.

use glam::Vec2;

use super::shapes::{self, segments_for};
use super::vertex::Vertex;
use crate::sim::explosion::FLASH_DURATION;
use crate::sim::{
    Camera, Direction, Enemy, EnemyFrame, FinishLine, GameState, Ground, Player, PlayerFrame,
    Rect, particle_color,
};
use crate::ui::layout::{self, BOMB_HINT, BOMB_HINT_SIZE, Label, PanelStyle, ScreenLayout};
use crate::ui::palette::{self, MAROON, WHITE, sprite};
use crate::ui::{App, Screen};

const GRASS_DEPTH: f32 = 12.0;
const FINISH_SQUARE: f32 = 8.0;
const BOMB_HINT_OFFSET_Y: f32 = 100.0;
const BOMB_GLOW_PULSE_SPEED: f32 = 4.0;
const BOMB_GLOW_OPACITY: f32 = 0.8;
const BUTTON_ROUNDNESS: f32 = 0.3;

/// One frame ready for the GPU and the DOM
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub clear: [f32; 4],
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
}

/// Build the frame for `app`; `time` drives the purely visual animations
pub fn build(app: &App, time: f32) -> Frame {
    let mut frame = Frame {
        clear: app.background(),
        ..Default::default()
    };

    if matches!(app.screen(), Screen::Playing | Screen::GameOver) {
        if let Some(game) = app.game() {
            draw_world(&mut frame, game, time);
            frame.labels.push(layout::hud(app.window(), game.kills()));
        }
    }

    if let Some(layout) = app.layout() {
        draw_layout(&mut frame, layout);
    }
    frame
}

fn draw_world(frame: &mut Frame, game: &GameState, time: f32) {
    let cam = &game.camera;
    for ground in &game.grounds {
        draw_ground(&mut frame.vertices, cam, ground);
    }
    draw_player(frame, cam, &game.player, game.window, time);
    draw_finish_line(&mut frame.vertices, cam, &game.finish_line, time);
    for enemy in &game.enemies {
        draw_enemy(&mut frame.vertices, cam, enemy);
    }
    draw_explosions(&mut frame.vertices, cam, game);
}

fn screen_rect(cam: &Camera, r: &Rect) -> Rect {
    let p = cam.world_to_screen(Vec2::new(r.x, r.y));
    Rect::new(p.x, p.y, r.width, r.height)
}

fn draw_ground(v: &mut Vec<Vertex>, cam: &Camera, ground: &Ground) {
    let r = screen_rect(cam, ground.bounds());
    let grass = GRASS_DEPTH.min(r.height);
    v.extend(shapes::rect(
        &Rect::new(r.x, r.y + grass, r.width, r.height - grass),
        sprite::DIRT,
    ));
    v.extend(shapes::rect(&Rect::new(r.x, r.y, r.width, grass), ground.tint));
}

fn draw_player(frame: &mut Frame, cam: &Camera, player: &Player, window: Vec2, time: f32) {
    let r = player.radius();
    let mut c = cam.world_to_screen(player.body.center());
    if player.frame() == PlayerFrame::Walking {
        c.y -= r * 0.06;
    }
    let segments = segments_for(r);
    let v = &mut frame.vertices;

    v.extend(shapes::circle(c, r, sprite::GOBO, segments));
    v.extend(shapes::circle(
        c + Vec2::new(0.0, r * 0.3),
        r * 0.5,
        sprite::GOBO_BELLY,
        segments,
    ));
    for side in [-1.0, 1.0] {
        let eye = c + Vec2::new(side * r * 0.35, -r * 0.25);
        if player.frame() == PlayerFrame::Idle {
            // Blinking
            v.extend(shapes::rect(
                &Rect::new(eye.x - r * 0.2, eye.y, r * 0.4, (r * 0.06).max(1.0)),
                sprite::PUPIL,
            ));
        } else {
            v.extend(shapes::circle(eye, r * 0.22, sprite::EYE_WHITE, 12));
            v.extend(shapes::circle(eye, r * 0.1, sprite::PUPIL, 8));
        }
    }

    if player.can_use_bomb {
        let alpha = ((time * BOMB_GLOW_PULSE_SPEED).sin() + 1.0) / 2.0 * BOMB_GLOW_OPACITY;
        let glow = c - Vec2::new(0.0, r * 0.75);
        v.extend(shapes::circle_gradient(
            glow,
            r * 0.5,
            palette::fade(sprite::BOMB_GLOW, alpha),
            palette::TRANSPARENT,
            segments,
        ));

        let hint_y = cam.world_to_screen(Vec2::new(0.0, window.y / 2.0 - BOMB_HINT_OFFSET_Y)).y;
        frame
            .labels
            .push(Label::centered(BOMB_HINT, c.x, hint_y, BOMB_HINT_SIZE, MAROON));
    }
}

fn draw_finish_line(v: &mut Vec<Vertex>, cam: &Camera, finish: &FinishLine, time: f32) {
    let r = screen_rect(cam, finish.bounds());
    let alpha = finish.pulse_alpha(time);
    let light = palette::fade(finish.current_tint(), alpha);
    let dark = palette::fade(sprite::FINISH_DARK, alpha);

    let cols = (r.width / FINISH_SQUARE).ceil() as usize;
    let rows = (r.height / FINISH_SQUARE).ceil() as usize;
    for row in 0..rows {
        for col in 0..cols {
            let x = r.x + col as f32 * FINISH_SQUARE;
            let y = r.y + row as f32 * FINISH_SQUARE;
            // Clip the last squares to the line's bounds
            let square = Rect::new(
                x,
                y,
                FINISH_SQUARE.min(r.right() - x),
                FINISH_SQUARE.min(r.bottom() - y),
            );
            let color = if (row + col) % 2 == 0 { light } else { dark };
            v.extend(shapes::rect(&square, color));
        }
    }
}

fn draw_enemy(v: &mut Vec<Vertex>, cam: &Camera, enemy: &Enemy) {
    let r = enemy.body.radius();
    let c = cam.world_to_screen(enemy.body.center());
    let facing = match enemy.direction {
        Direction::Right => 1.0,
        Direction::Left => -1.0,
    };
    let stride = match enemy.frame() {
        EnemyFrame::Idle | EnemyFrame::Running2 => 0.0,
        EnemyFrame::Running1 => 0.25,
        EnemyFrame::Running3 => -0.25,
    };
    let segments = segments_for(r);

    for (side, phase) in [(-1.0, 1.0), (1.0, -1.0)] {
        let foot = c + Vec2::new(side * r * 0.35 + phase * stride * r, r * 0.85);
        v.extend(shapes::circle(foot, r * 0.22, sprite::ENEMY_FEET, 10));
    }
    v.extend(shapes::circle(c, r, sprite::ENEMY, segments));

    let eye = c + Vec2::new(facing * r * 0.4, -r * 0.3);
    v.extend(shapes::circle(eye, r * 0.25, sprite::EYE_WHITE, 12));
    v.extend(shapes::circle(
        eye + Vec2::new(facing * r * 0.08, 0.0),
        r * 0.11,
        sprite::PUPIL,
        8,
    ));
}

fn draw_explosions(v: &mut Vec<Vertex>, cam: &Camera, game: &GameState) {
    for explosion in game.explosions.iter().filter(|e| e.is_active()) {
        let c = cam.world_to_screen(explosion.pos);
        let radius = explosion.radius();
        let fade = 1.0 - explosion.progress();
        v.extend(shapes::circle(
            c,
            radius,
            palette::fade(sprite::FIREBALL, fade),
            segments_for(radius),
        ));

        if explosion.timer() < FLASH_DURATION {
            let flash = 1.0 - explosion.timer() / FLASH_DURATION;
            v.extend(shapes::circle(
                c,
                radius * 0.5,
                palette::fade(WHITE, flash),
                segments_for(radius * 0.5),
            ));
        }

        for particle in explosion.particles().iter().filter(|p| p.is_alive()) {
            v.extend(shapes::circle(
                cam.world_to_screen(particle.pos),
                particle.size,
                particle_color(particle.life_ratio()),
                8,
            ));
        }
    }
}

fn draw_layout(frame: &mut Frame, layout: ScreenLayout) {
    for panel in &layout.panels {
        let vertices = match panel.style {
            PanelStyle::Fill => shapes::rect(&panel.rect, panel.color),
            PanelStyle::Rounded => {
                shapes::rounded_rect(&panel.rect, BUTTON_ROUNDNESS, panel.color, 6)
            }
            PanelStyle::Outline => shapes::rect_outline(&panel.rect, panel.color, 1.0),
        };
        frame.vertices.extend(vertices);
    }
    frame.labels.extend(layout.labels);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::ui::FrameInput;
    use crate::ui::menu::Key;

    fn playing() -> App {
        let mut app = App::new(Settings::default(), 5);
        let mut input = FrameInput::default();
        input.menu.press(Key::Enter);
        app.update(&input, SIM_DT);
        assert_eq!(app.screen(), Screen::Playing);
        app
    }

    fn has_label(frame: &Frame, text: &str) -> bool {
        frame.labels.iter().any(|l| l.text == text)
    }

    #[test]
    fn test_main_menu_frame() {
        let app = App::new(Settings::default(), 5);
        let frame = build(&app, 0.0);
        assert_eq!(frame.clear, app.background());
        assert!(has_label(&frame, "PLAY AS GOBO"));
        assert!(has_label(&frame, "START GAME"));
        assert!(!has_label(&frame, "Kills: 0"));
        assert_eq!(frame.vertices.len() % 3, 0);
    }

    #[test]
    fn test_playing_frame_draws_world_and_hud() {
        let app = playing();
        let frame = build(&app, 0.0);
        assert!(has_label(&frame, "Kills: 0"));
        assert!(!has_label(&frame, BOMB_HINT));
        // Ground, player and finish line at least
        assert!(frame.vertices.len() > 100);
        assert_eq!(frame.vertices.len() % 3, 0);
    }

    #[test]
    fn test_bomb_hint_follows_player() {
        let mut app = playing();
        app.game_mut().unwrap().player.can_use_bomb = true;
        let frame = build(&app, 0.0);
        let hint = frame.labels.iter().find(|l| l.text == BOMB_HINT).unwrap();
        let game = app.game().unwrap();
        let player_x = game.camera.world_to_screen(game.player.body.center()).x;
        assert!((hint.pos.x + hint.width() / 2.0 - player_x).abs() < 1e-3);
        assert_eq!(hint.pos.y, 480.0 / 2.0 - 100.0);
    }

    #[test]
    fn test_ground_drawn_in_screen_space() {
        let app = playing();
        let game = app.game().unwrap();
        let mut v = Vec::new();
        draw_ground(&mut v, &game.camera, &game.grounds[0]);
        let top = v.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        assert_eq!(top, 384.0);
    }

    #[test]
    fn test_finish_line_checker_fills_bounds() {
        let app = playing();
        let game = app.game().unwrap();
        let mut v = Vec::new();
        draw_finish_line(&mut v, &game.camera, &game.finish_line, 0.0);
        // 112 x 16 in 8 px squares
        assert_eq!(v.len(), 14 * 2 * 6);
    }

    #[test]
    fn test_game_over_frame_keeps_world() {
        let mut app = playing();
        for _ in 0..3 {
            app.game_mut().unwrap().player.take_damage();
        }
        app.update(&FrameInput::default(), SIM_DT);
        assert_eq!(app.screen(), Screen::GameOver);
        let frame = build(&app, 1.0);
        assert!(has_label(&frame, "GAME OVER"));
        assert!(has_label(&frame, "Kills: 0"));
        assert!(has_label(&frame, "PLAY AGAIN"));
    }
}
