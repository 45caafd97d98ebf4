//! Play as Gobo entry point
//!
//! The web build draws to a canvas and runs the frame loop from
//! `requestAnimationFrame`. The native build has no window: it drives the
//! app headlessly with scripted input and logs how the run went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use play_as_gobo::audio::AudioManager;
    use play_as_gobo::consts::SIM_DT;
    use play_as_gobo::renderer::{self, RenderState};
    use play_as_gobo::settings::Settings;
    use play_as_gobo::ui::layout::Label;
    use play_as_gobo::ui::menu::Key;
    use play_as_gobo::ui::palette;
    use play_as_gobo::ui::{App, FrameInput};

    /// Movement keys currently held down
    #[derive(Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
    }

    /// Game instance holding all state
    struct Game {
        app: App,
        render_state: Option<RenderState>,
        audio: AudioManager,
        /// One-shot input gathered since the last frame
        input: FrameInput,
        held: HeldKeys,
        last_time: f64,
        /// Labels currently in the DOM
        labels: Vec<Label>,
        label_root: Option<Element>,
    }

    impl Game {
        fn new(app: App, label_root: Option<Element>) -> Self {
            Self {
                app,
                render_state: None,
                audio: AudioManager::new(),
                input: FrameInput::default(),
                held: HeldKeys::default(),
                last_time: 0.0,
                labels: Vec::new(),
                label_root,
            }
        }

        fn key_down(&mut self, key: Key) {
            self.audio.resume();
            match key {
                Key::Left => self.held.left = true,
                Key::Right => self.held.right = true,
                Key::Space => self.input.play.bomb = true,
                _ => {}
            }
            self.input.menu.press(key);
        }

        fn key_up(&mut self, key: Key) {
            match key {
                Key::Left => self.held.left = false,
                Key::Right => self.held.right = false,
                _ => {}
            }
        }

        fn pointer_down(&mut self, pos: Vec2) {
            self.audio.resume();
            self.input.menu.tap(pos);
        }

        fn resize(&mut self, css: Vec2, physical: (u32, u32), dpr: f32) {
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.set_scale_factor(dpr);
                render_state.resize(physical.0, physical.1);
            }
            self.app.resize(css);
        }

        /// Advance the app by one rendered frame
        fn update(&mut self, dt: f32) {
            self.input.play.left = self.held.left;
            self.input.play.right = self.held.right;
            self.app.update(&self.input, dt);
            self.input = FrameInput::default();

            for cue in self.app.drain_cues() {
                self.audio.play(cue);
            }
            self.audio.set_music_volume(self.app.music_volume());
            self.audio.update_music();
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let frame = renderer::build(&self.app, (time / 1000.0) as f32);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&frame.vertices, frame.clear) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            self.update_labels(frame.labels);
        }

        /// Rebuild the DOM text only when it changed
        fn update_labels(&mut self, labels: Vec<Label>) {
            if labels == self.labels {
                return;
            }
            if let Some(root) = &self.label_root {
                if let Err(e) = sync_labels(root, &labels) {
                    log::warn!("Failed to update labels: {:?}", e);
                }
            }
            self.labels = labels;
        }
    }

    fn sync_labels(root: &Element, labels: &[Label]) -> Result<(), JsValue> {
        let document = root.owner_document().ok_or("label root has no document")?;
        root.set_inner_html("");
        for label in labels {
            let el = document.create_element("div")?;
            el.set_text_content(Some(&label.text));
            el.set_attribute(
                "style",
                &format!(
                    "left:{:.1}px;top:{:.1}px;font-size:{:.1}px;color:{}",
                    label.pos.x,
                    label.pos.y,
                    label.size,
                    palette::css(label.color)
                ),
            )?;
            root.append_child(&el)?;
        }
        Ok(())
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// CSS size, physical size and pixel ratio of the canvas
    fn canvas_size(canvas: &HtmlCanvasElement) -> (Vec2, (u32, u32), f32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let physical = (
            (client_w as f64 * dpr) as u32,
            (client_h as f64 * dpr) as u32,
        );
        (
            Vec2::new(client_w as f32, client_h as f32),
            physical,
            dpr as f32,
        )
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Play as Gobo starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (css, physical, dpr) = canvas_size(&canvas);
        canvas.set_width(physical.0);
        canvas.set_height(physical.1);

        let seed = js_sys::Date::now() as u64;
        let mut app = App::new(Settings::load(), seed);
        app.resize(css);
        let game = Rc::new(RefCell::new(Game::new(
            app,
            document.get_element_by_id("labels"),
        )));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, physical.0, physical.1)
            .await
            .map_err(js_err)?;
        render_state.set_scale_factor(dpr);
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_resize(&canvas, game.clone())?;

        request_animation_frame(game);

        log::info!("Play as Gobo running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Mouse move (hover)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.menu.point(pos);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse down (click)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().pointer_down(pos);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start (tap)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer_down(Vec2::new(x, y));
                }
            });
            canvas.add_event_listener_with_callback(
                "touchstart",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Touch move (hover)
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().input.menu.point(Vec2::new(x, y));
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.code()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                if !event.repeat() {
                    game.borrow_mut().key_down(key);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (css, physical, dpr) = canvas_size(&canvas);
            canvas.set_width(physical.0);
            canvas.set_height(physical.1);
            game.borrow_mut().resize(css, physical, dpr);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let exiting = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.app.should_exit()
        };

        if exiting {
            shut_down(&game);
        } else {
            request_animation_frame(game);
        }
    }

    /// Stop the loop and try to close the tab
    fn shut_down(game: &Rc<RefCell<Game>>) {
        log::info!("Exiting");
        let mut g = game.borrow_mut();
        g.update_labels(Vec::new());
        g.audio.set_music_volume(0.0);
        if let Some(window) = web_sys::window() {
            // Browsers ignore this for tabs the user opened
            let _ = window.close();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use play_as_gobo::consts::SIM_DT;
    use play_as_gobo::settings::Settings;
    use play_as_gobo::ui::menu::Key;
    use play_as_gobo::ui::{App, FrameInput, Screen};

    /// Seconds spent walking each way before turning around
    const TURN_PERIOD: f32 = 2.0;
    /// Extra frames allowed for menus and the exit cue
    const MENU_FRAMES: u32 = 600;

    /// What happened during an autoplay session
    #[derive(Debug, Clone, PartialEq)]
    pub struct Summary {
        pub frames: u32,
        pub played_seconds: f32,
        pub kills: u32,
        pub player_radius: f32,
        pub lost: bool,
        pub cues: usize,
        pub exited: bool,
    }

    /// Start a game from the main menu, play for up to `play_seconds`, then
    /// leave through the menus and confirm the exit
    pub fn run(settings: Settings, entropy: u64, play_seconds: f32) -> Summary {
        let mut app = App::new(settings, entropy);
        let max_frames = (play_seconds / SIM_DT) as u32 + MENU_FRAMES;

        let mut summary = Summary {
            frames: 0,
            played_seconds: 0.0,
            kills: 0,
            player_radius: 0.0,
            lost: false,
            cues: 0,
            exited: false,
        };
        let mut done_playing = false;
        let mut asked_exit = false;

        while !app.should_exit() && summary.frames < max_frames {
            let mut input = FrameInput::default();
            match app.screen() {
                Screen::MainMenu if !done_playing => input.menu.press(Key::Enter),
                Screen::MainMenu | Screen::Controls | Screen::Options => {
                    input.menu.press(Key::Escape)
                }
                Screen::Playing => {
                    summary.played_seconds += SIM_DT;
                    if summary.played_seconds >= play_seconds {
                        done_playing = true;
                        input.menu.press(Key::Escape);
                    } else if let Some(game) = app.game() {
                        let phase = (summary.played_seconds / TURN_PERIOD) as u32;
                        input.play.right = phase % 2 == 0;
                        input.play.left = !input.play.right;
                        input.play.bomb = game.player.can_use_bomb;
                    }
                }
                Screen::GameOver => {
                    summary.lost = true;
                    done_playing = true;
                    input.menu.press(Key::Escape);
                }
                Screen::AskExit => {
                    if !asked_exit {
                        asked_exit = true;
                        input.menu.press(Key::Enter);
                    }
                }
                Screen::Exit => {}
            }

            app.update(&input, SIM_DT);
            summary.cues += app.drain_cues().len();
            summary.frames += 1;
            if let Some(game) = app.game() {
                summary.kills = game.kills();
                summary.player_radius = game.player.radius();
            }
        }

        summary.exited = app.should_exit();
        summary
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autoplay_plays_and_exits() {
            let settings = Settings {
                seed: Some(3),
                ..Default::default()
            };
            let summary = run(settings, 0, 10.0);
            assert!(summary.exited);
            assert!(summary.played_seconds > 0.0);
            assert!(summary.player_radius > 0.0);
            assert!(summary.cues > 0);
        }

        #[test]
        fn test_autoplay_is_deterministic_with_a_seed() {
            let settings = Settings {
                seed: Some(9),
                ..Default::default()
            };
            assert_eq!(run(settings.clone(), 1, 8.0), run(settings, 2, 8.0));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Play as Gobo (native) starting...");
    log::info!("No native window - running a headless autoplay session");

    let settings = play_as_gobo::Settings::load();
    let entropy = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64);

    let summary = headless::run(settings, entropy, 60.0);
    log::info!(
        "Autoplay: {:.1}s played over {} frames, {} kills, player radius {:.1}, {}",
        summary.played_seconds,
        summary.frames,
        summary.kills,
        summary.player_radius,
        if summary.lost { "lost" } else { "survived" }
    );
    log::info!("{} sound cues, exited cleanly: {}", summary.cues, summary.exited);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
