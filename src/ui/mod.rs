//! Screens wrapped around the play loop
//!
//! `App` owns the current screen, the menu selections, the settings the
//! options screen edits, and the world while a run is in progress. It is
//! platform-free: the web and native front ends feed it input once per frame
//! and drain the sound cues it produces.

pub mod layout;
pub mod menu;
pub mod palette;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use self::layout::{HitTarget, OptionValues, ScreenLayout};
use self::menu::{Menu, MenuInput};
use crate::consts::*;
use crate::lerp;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, check_window, tick};

/// How long the "disappointing" cue plays before the app closes
pub const EXIT_CUE_DURATION: f32 = 0.9;
const MENU_MUSIC_VOLUME: f32 = 1.0;
const PLAY_MUSIC_VOLUME: f32 = 0.25;
const MUSIC_EASE: f32 = 0.25;
/// Longest frame the simulation will catch up on
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Controls,
    Options,
    Playing,
    GameOver,
    AskExit,
    Exit,
}

/// Sound effects requested by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Explosion,
    Lose,
    HoverButton,
    OpenButton,
    BackButton,
    ExitNo,
    ExitDisappointing,
    Footstep,
}

/// Input gathered by the front end for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub menu: MenuInput,
    /// Held movement keys and the one-shot bomb press
    pub play: TickInput,
}

pub struct App {
    screen: Screen,
    pub settings: Settings,
    game: Option<GameState>,
    window: Vec2,
    main_menu: Menu,
    options_menu: Menu,
    game_over_menu: Menu,
    exit_menu: Menu,
    music_volume: f32,
    /// Drop the world the next time the main menu updates
    pending_reset: bool,
    exit_timer: Option<f32>,
    accumulator: f32,
    pending_bomb: bool,
    seeds: Pcg32,
    cues: Vec<SoundCue>,
}

impl App {
    /// `entropy` seeds the runs unless the settings pin a seed
    pub fn new(settings: Settings, entropy: u64) -> Self {
        let window = Vec2::new(settings.window_width, settings.window_height);
        let seeds = Pcg32::seed_from_u64(settings.seed.unwrap_or(entropy));
        Self {
            screen: Screen::MainMenu,
            settings,
            game: None,
            window,
            main_menu: Menu::new(layout::MAIN_MENU_ITEMS.len()),
            options_menu: Menu::new(layout::OPTION_NAMES.len()),
            game_over_menu: Menu::new(layout::GAME_OVER_ITEMS.len()),
            exit_menu: Menu::new(layout::EXIT_ITEMS.len()),
            music_volume: 0.0,
            pending_reset: false,
            exit_timer: None,
            accumulator: 0.0,
            pending_bomb: false,
            seeds,
            cues: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn window(&self) -> Vec2 {
        self.window
    }

    pub fn should_exit(&self) -> bool {
        self.screen == Screen::Exit
    }

    /// Music gain after easing; zero while music is switched off
    pub fn music_volume(&self) -> f32 {
        if self.settings.music {
            self.music_volume
        } else {
            0.0
        }
    }

    pub fn background(&self) -> [f32; 4] {
        palette::background(self.settings.background).rgba()
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// Layout of the menu drawn over the current screen, if any
    pub fn layout(&self) -> Option<ScreenLayout> {
        let w = self.window;
        match self.screen {
            Screen::MainMenu => Some(layout::main_menu(w, self.main_menu.selected())),
            Screen::Controls => Some(layout::controls(w)),
            Screen::Options => Some(layout::options(
                w,
                self.options_menu.selected(),
                &self.option_values(),
            )),
            Screen::GameOver => Some(layout::game_over(
                w,
                self.game_over_menu.selected(),
                self.game.as_ref().map_or(0, |g| g.kills()),
            )),
            Screen::AskExit => Some(layout::exit_confirm(w, self.exit_menu.selected())),
            Screen::Playing | Screen::Exit => None,
        }
    }

    pub fn option_values(&self) -> OptionValues {
        OptionValues {
            max_enemies: self.settings.max_enemies,
            background: self.settings.background,
            music: self.settings.music,
            sound_effects: self.settings.sound_effects,
        }
    }

    pub fn resize(&mut self, window: Vec2) {
        if !(window.x > 0.0 && window.y > 0.0) || window == self.window {
            return;
        }
        let fits = match self.game.as_mut() {
            Some(game) => game.resize(window),
            None => check_window(window),
        };
        match fits {
            Ok(()) => {
                log::info!("Resized to {}x{}", window.x, window.y);
                self.window = window;
            }
            Err(e) => log::warn!("Keeping {}x{}: {}", self.window.x, self.window.y, e),
        }
    }

    /// Advance one rendered frame
    pub fn update(&mut self, input: &FrameInput, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        match self.screen {
            Screen::MainMenu => {
                if self.pending_reset {
                    self.game = None;
                    self.pending_reset = false;
                }
                self.ease_music(MENU_MUSIC_VOLUME);
                self.main_menu_input(&input.menu);
            }
            Screen::Controls => self.controls_input(&input.menu),
            Screen::Options => self.options_input(&input.menu),
            Screen::Playing => self.update_playing(input, dt),
            Screen::GameOver => {
                self.music_volume = 0.0;
                self.game_over_input(&input.menu);
            }
            Screen::AskExit => {
                self.music_volume = 0.0;
                self.exit_input(&input.menu);
                match self.exit_timer {
                    Some(remaining) if remaining <= 0.0 => self.set_screen(Screen::Exit),
                    Some(remaining) => self.exit_timer = Some(remaining - dt),
                    None => {}
                }
            }
            Screen::Exit => {}
        }
    }

    fn cue(&mut self, cue: SoundCue) {
        if self.settings.sound_effects {
            self.cues.push(cue);
        }
    }

    fn ease_music(&mut self, target: f32) {
        self.music_volume = lerp(self.music_volume, target, MUSIC_EASE);
    }

    fn set_screen(&mut self, screen: Screen) {
        if screen != self.screen {
            log::info!("Screen {:?} -> {:?}", self.screen, screen);
            self.screen = screen;
        }
    }

    /// Pointer target on the current screen
    fn pointed(&self, input: &MenuInput) -> Option<HitTarget> {
        let pos = input.pointer?;
        self.layout()?.hit(pos)
    }

    /// Keyboard and pointer navigation shared by the button menus
    ///
    /// Returns true when the selected button was activated.
    fn navigate(&mut self, which: Screen, input: &MenuInput, hover_cue: bool) -> bool {
        let target = self.pointed(input);
        let menu = match which {
            Screen::MainMenu => &mut self.main_menu,
            Screen::GameOver => &mut self.game_over_menu,
            _ => &mut self.exit_menu,
        };
        let mut moved = false;
        if input.up {
            menu.up();
            moved = true;
        }
        if input.down {
            menu.down();
            moved = true;
        }
        let mut clicked = false;
        if let Some(HitTarget::Button(i)) = target {
            moved |= menu.select(i);
            clicked = input.click;
        }
        if moved && hover_cue {
            self.cue(SoundCue::HoverButton);
        }
        input.confirm || clicked
    }

    fn main_menu_input(&mut self, input: &MenuInput) {
        if self.navigate(Screen::MainMenu, input, true) {
            self.cue(SoundCue::OpenButton);
            match self.main_menu.selected() {
                0 => self.start_game(),
                1 => self.set_screen(Screen::Controls),
                2 => self.set_screen(Screen::Options),
                _ => {
                    self.cue(SoundCue::ExitNo);
                    self.set_screen(Screen::AskExit);
                }
            }
        }
        if input.back && self.screen == Screen::MainMenu {
            self.cue(SoundCue::ExitNo);
            self.set_screen(Screen::AskExit);
        }
    }

    fn controls_input(&mut self, input: &MenuInput) {
        if input.back || input.confirm || input.click {
            self.cue(SoundCue::BackButton);
            self.set_screen(Screen::MainMenu);
        }
    }

    fn options_input(&mut self, input: &MenuInput) {
        let target = self.pointed(input);
        if input.up || input.down {
            self.cue(SoundCue::HoverButton);
            if input.up {
                self.options_menu.up();
            }
            if input.down {
                self.options_menu.down();
            }
        }

        let mut step = None;
        match target {
            Some(HitTarget::Button(i)) => {
                if self.options_menu.select(i) {
                    self.cue(SoundCue::HoverButton);
                }
            }
            Some(HitTarget::Decrease(i)) | Some(HitTarget::Increase(i)) => {
                if self.options_menu.select(i) {
                    self.cue(SoundCue::HoverButton);
                }
                if input.click {
                    step = Some(matches!(target, Some(HitTarget::Increase(_))));
                }
            }
            None => {}
        }
        if input.left {
            step = Some(false);
        }
        if input.right {
            step = Some(true);
        }
        if let Some(increase) = step {
            self.cue(SoundCue::OpenButton);
            self.change_option(self.options_menu.selected(), increase);
        }

        if input.back {
            self.cue(SoundCue::BackButton);
            self.set_screen(Screen::MainMenu);
        }
    }

    fn change_option(&mut self, row: usize, increase: bool) {
        let s = &mut self.settings;
        match row {
            0 => {
                if increase && s.max_enemies < MAX_MAX_ENEMIES {
                    s.max_enemies += 1;
                } else if !increase && s.max_enemies > MIN_MAX_ENEMIES {
                    s.max_enemies -= 1;
                }
            }
            1 => {
                s.background = if increase {
                    palette::next_index(s.background)
                } else {
                    palette::prev_index(s.background)
                };
            }
            2 => s.music = !s.music,
            _ => s.sound_effects = !s.sound_effects,
        }
    }

    fn game_over_input(&mut self, input: &MenuInput) {
        if self.navigate(Screen::GameOver, input, true) {
            self.cue(SoundCue::OpenButton);
            if self.game_over_menu.selected() == 0 {
                self.restart_game();
            } else {
                self.return_to_menu();
            }
        } else if input.back {
            self.return_to_menu();
        }
    }

    fn exit_input(&mut self, input: &MenuInput) {
        if self.navigate(Screen::AskExit, input, false) {
            if self.exit_menu.selected() == 0 {
                self.confirm_exit();
            } else {
                self.exit_timer = None;
                self.cue(SoundCue::BackButton);
                self.set_screen(Screen::MainMenu);
            }
        } else if input.back {
            self.confirm_exit();
        }
    }

    fn confirm_exit(&mut self) {
        self.cue(SoundCue::ExitDisappointing);
        if self.exit_timer.is_none() {
            let wait = if self.settings.sound_effects {
                EXIT_CUE_DURATION
            } else {
                0.0
            };
            self.exit_timer = Some(wait);
        }
    }

    fn return_to_menu(&mut self) {
        self.cue(SoundCue::BackButton);
        self.game = None;
        self.set_screen(Screen::MainMenu);
    }

    fn start_game(&mut self) {
        let seed: u64 = self.seeds.random();
        match GameState::new(seed, self.window, self.settings.max_enemies) {
            Ok(game) => {
                self.game = Some(game);
                self.accumulator = 0.0;
                self.pending_bomb = false;
                self.set_screen(Screen::Playing);
            }
            Err(e) => log::error!("Could not start a game: {}", e),
        }
    }

    fn restart_game(&mut self) {
        let Some(game) = self.game.as_mut() else {
            self.start_game();
            return;
        };
        match game.restart() {
            Ok(()) => {
                self.accumulator = 0.0;
                self.pending_bomb = false;
                self.set_screen(Screen::Playing);
            }
            Err(e) => log::error!("Could not restart: {}", e),
        }
    }

    fn update_playing(&mut self, input: &FrameInput, dt: f32) {
        if input.menu.back {
            self.cue(SoundCue::BackButton);
            self.pending_reset = true;
            self.set_screen(Screen::MainMenu);
            return;
        }
        self.ease_music(PLAY_MUSIC_VOLUME);

        let Some(game) = self.game.as_mut() else {
            self.set_screen(Screen::MainMenu);
            return;
        };

        self.pending_bomb |= input.play.bomb;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let tick_input = TickInput {
                bomb: self.pending_bomb,
                ..input.play.clone()
            };
            tick(game, &tick_input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending_bomb = false;
        }

        for event in game.drain_events() {
            match event {
                GameEvent::Explosion { .. } => self.cue(SoundCue::Explosion),
                GameEvent::Footstep => self.cue(SoundCue::Footstep),
                GameEvent::GameOver { .. } => {
                    self.cue(SoundCue::Lose);
                    self.game_over_menu.reset();
                    self.set_screen(Screen::GameOver);
                }
                _ => {}
            }
        }
    }
}
