//! Responsive screen layouts
//!
//! Every menu is laid out from the window size alone, so a resize simply
//! produces a new layout on the next frame. Text widths use a monospace
//! estimate that matches the font the DOM labels are drawn with.

use glam::Vec2;

use super::palette::{
    self, BLACK, DARKGRAY, DARKGREEN, GOLD, GRAY, GREEN, LIME, MAROON, RED, WHITE, YELLOW,
};
use crate::sim::Rect;

/// Horizontal advance of one glyph, as a fraction of the font size
pub const GLYPH_ADVANCE: f32 = 0.6;
const MIN_MARGIN: f32 = 20.0;

pub const MAIN_MENU_ITEMS: [&str; 4] = ["START GAME", "CONTROLS", "OPTIONS", "EXIT"];
pub const GAME_OVER_ITEMS: [&str; 2] = ["PLAY AGAIN", "MAIN MENU"];
pub const EXIT_ITEMS: [&str; 2] = ["Yes!?", "No!"];
pub const OPTION_NAMES: [&str; 4] = [
    "Max Enemies:",
    "Background Color:",
    "Music:",
    "Sound Effects:",
];
pub const CONTROL_LINES: [&str; 3] = [
    "Movement: Arrow Keys and W,A,S,D",
    "Bomb: Space",
    "End Game: Escape Key",
];
const BACK_TEXT: &str = "Press Escape Key to Main Menu";
const OPTIONS_HELP: &str = "Use UP/DOWN to navigate, LEFT/RIGHT to change values";
pub const BOMB_HINT: &str = "Space to Bomb!";
pub const BOMB_HINT_SIZE: f32 = 30.0;

/// Width of `text` drawn at `size` px
pub fn measure_text(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_ADVANCE
}

/// Shrink a font size until the text fits `available` px
pub fn fit_font(text: &str, size: f32, available: f32) -> f32 {
    let width = measure_text(text, size);
    if width > available && width > 0.0 {
        (size * available / width).floor()
    } else {
        size
    }
}

/// A line of text, positioned by its top-left corner in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub color: [f32; 4],
}

impl Label {
    pub fn new(text: impl Into<String>, pos: Vec2, size: f32, color: [f32; 4]) -> Self {
        Self {
            text: text.into(),
            pos,
            size,
            color,
        }
    }

    /// Horizontally centred on `center_x`
    pub fn centered(
        text: impl Into<String>,
        center_x: f32,
        y: f32,
        size: f32,
        color: [f32; 4],
    ) -> Self {
        let text = text.into();
        let x = center_x - measure_text(&text, size) / 2.0;
        Self::new(text, Vec2::new(x, y), size, color)
    }

    pub fn width(&self) -> f32 {
        measure_text(&self.text, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStyle {
    Fill,
    Rounded,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub rect: Rect,
    pub color: [f32; 4],
    pub style: PanelStyle,
}

impl Panel {
    pub fn fill(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            rect,
            color,
            style: PanelStyle::Fill,
        }
    }

    pub fn rounded(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            rect,
            color,
            style: PanelStyle::Rounded,
        }
    }

    pub fn outline(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            rect,
            color,
            style: PanelStyle::Outline,
        }
    }
}

/// What a pointer over a region refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Button(usize),
    Decrease(usize),
    Increase(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Everything a screen draws, plus its pointer targets
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub panels: Vec<Panel>,
    pub labels: Vec<Label>,
    pub hit_boxes: Vec<HitBox>,
}

impl ScreenLayout {
    /// First target under `p`
    pub fn hit(&self, p: Vec2) -> Option<HitTarget> {
        self.hit_boxes
            .iter()
            .find(|h| h.rect.contains_point(p))
            .map(|h| h.target)
    }

    fn overlay(window: Vec2, alpha: f32) -> Self {
        Self {
            panels: vec![Panel::fill(
                Rect::new(0.0, 0.0, window.x, window.y),
                palette::fade(BLACK, alpha),
            )],
            ..Default::default()
        }
    }

    fn button(&mut self, index: usize, rect: Rect, selected: bool, label: Label) {
        let color = if selected { LIME } else { DARKGRAY };
        self.panels.push(Panel::rounded(rect, color));
        self.labels.push(label);
        self.hit_boxes.push(HitBox {
            rect,
            target: HitTarget::Button(index),
        });
    }
}

/// Current option values for the options screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionValues {
    pub max_enemies: u32,
    pub background: usize,
    pub music: bool,
    pub sound_effects: bool,
}

fn start_y(center_y: f32, total_height: f32) -> f32 {
    (center_y - total_height / 2.0).max(MIN_MARGIN)
}

pub fn main_menu(window: Vec2, selected: usize) -> ScreenLayout {
    let mut layout = ScreenLayout::overlay(window, 0.8);
    let center = window / 2.0;
    let available = window.x - MIN_MARGIN * 2.0;

    let title = "PLAY AS GOBO";
    let subtitle = "By Almohtady Bellah";
    let title_size = fit_font(title, (window.x / 15.0).floor().clamp(24.0, 80.0), available);
    let subtitle_size = fit_font(subtitle, (window.x / 60.0).floor().clamp(12.0, 24.0), available);

    let button_h = (window.y / 15.0).clamp(35.0, 60.0);
    let spacing = (window.y / 40.0).clamp(10.0, 25.0);
    let title_spacing = (window.y / 30.0).clamp(15.0, 40.0);
    let total = title_size + subtitle_size + title_spacing + 4.0 * button_h + 3.0 * spacing;

    let mut top = start_y(center.y, total);
    if top + total > window.y - MIN_MARGIN {
        top = window.y - MIN_MARGIN - total;
    }

    layout.labels.push(Label::centered(title, center.x, top, title_size, GOLD));
    layout.labels.push(Label::centered(
        subtitle,
        center.x,
        top + title_size + title_spacing / 2.0,
        subtitle_size,
        YELLOW,
    ));

    let button_w = (window.x / 4.0).clamp(150.0, 300.0);
    let buttons_top = top + title_size + subtitle_size + title_spacing;
    let text_size = (button_h * 0.75).floor();
    for (i, text) in MAIN_MENU_ITEMS.iter().enumerate() {
        let rect = Rect::new(
            center.x - button_w / 2.0,
            buttons_top + i as f32 * (button_h + spacing),
            button_w,
            button_h,
        );
        let label = Label::centered(
            *text,
            center.x,
            rect.y + (button_h - text_size) / 2.0,
            text_size,
            WHITE,
        );
        layout.button(i, rect, i == selected, label);
    }
    layout
}

pub fn controls(window: Vec2) -> ScreenLayout {
    let mut layout = ScreenLayout::overlay(window, 0.8);
    let center = window / 2.0;
    let available = window.x - MIN_MARGIN * 2.0;

    let title = "Controls";
    let title_size = fit_font(title, (window.x / 15.0).floor().clamp(24.0, 60.0), available);
    let line_size = (window.x / 25.0).floor().clamp(16.0, 28.0);
    let back_size = fit_font(BACK_TEXT, (window.x / 35.0).floor().clamp(12.0, 18.0), available);

    let total = title_size + line_size * 4.0 + back_size + 80.0;
    let top = start_y(center.y, total);
    layout.labels.push(Label::centered(title, center.x, top, title_size, RED));

    let lines_top = top + title_size + 40.0;
    let line_spacing = line_size + 10.0;
    for (i, line) in CONTROL_LINES.iter().enumerate() {
        let size = fit_font(line, line_size, available);
        layout.labels.push(Label::centered(
            *line,
            center.x,
            lines_top + i as f32 * line_spacing,
            size,
            DARKGREEN,
        ));
    }
    layout.labels.push(Label::centered(
        BACK_TEXT,
        center.x,
        lines_top + 3.0 * line_spacing + 40.0,
        back_size,
        GRAY,
    ));
    layout
}

pub fn options(window: Vec2, selected: usize, values: &OptionValues) -> ScreenLayout {
    let mut layout = ScreenLayout::overlay(window, 0.8);
    let center = window / 2.0;
    let available_w = window.x - MIN_MARGIN * 2.0;
    let available_h = window.y - MIN_MARGIN * 2.0;

    let scaled = |wdiv: f32, hdiv: f32, lo: f32, hi: f32| {
        (window.x / wdiv).floor().min((window.y / hdiv).floor()).clamp(lo, hi)
    };
    let title = "Options";
    let title_size = fit_font(title, scaled(15.0, 20.0, 18.0, 60.0), available_w);
    let option_size = scaled(25.0, 35.0, 12.0, 32.0);
    let value_size = scaled(30.0, 40.0, 10.0, 24.0);
    let help_size = scaled(40.0, 50.0, 10.0, 20.0);

    let table_w = (available_w * 0.8).clamp(300.0, 600.0);
    let left_col = table_w * 0.45;
    let right_col = table_w * 0.55;
    let table_x = center.x - table_w / 2.0;

    let button = (option_size * 1.2).clamp(20.0, 35.0);
    let button_font = (button * 0.6).floor().clamp(10.0, 18.0);
    let row_h = option_size.max(button);

    let mut row_spacing = (available_h / 25.0).clamp(15.0, 40.0);
    let total = title_size + 4.0 * row_h + 5.0 * row_spacing + help_size + 60.0;
    if total > available_h {
        row_spacing = ((available_h - title_size - 4.0 * row_h - help_size - 60.0) / 5.0).max(8.0);
    }

    let top = start_y(center.y, total);
    layout.labels.push(Label::centered(title, center.x, top, title_size, RED));

    let mut y = top + title_size + row_spacing;
    layout.panels.push(Panel::fill(
        Rect::new(
            table_x - 10.0,
            y - 10.0,
            table_w + 20.0,
            4.0 * row_h + 3.0 * row_spacing + 40.0,
        ),
        palette::fade(DARKGRAY, 0.2),
    ));

    for (i, name) in OPTION_NAMES.iter().enumerate() {
        let is_selected = i == selected;
        let text_color = if is_selected { LIME } else { WHITE };
        let button_color = if is_selected { LIME } else { DARKGRAY };

        let name_size = fit_font(name, option_size, left_col - 10.0);
        layout.labels.push(Label::new(
            *name,
            Vec2::new(table_x, y + (button - name_size) / 2.0),
            name_size,
            text_color,
        ));

        let right_x = table_x + left_col;
        let mut gap = 5.0;
        let controls_w = button + gap + 60.0 + gap + button;
        let mut controls_x = right_x + (right_col - controls_w) / 2.0;
        if controls_w > right_col {
            controls_x = right_x;
            gap = 2.0;
        }

        let dec = Rect::new(controls_x, y, button, button);
        let inc_x = controls_x + button + gap + 60.0 + gap;
        let inc = Rect::new(inc_x, y, button, button);
        for (rect, glyph, target) in [
            (dec, "<", HitTarget::Decrease(i)),
            (inc, ">", HitTarget::Increase(i)),
        ] {
            layout.panels.push(Panel::rounded(rect, button_color));
            layout.labels.push(Label::centered(
                glyph,
                rect.center().x,
                y + (button - button_font) / 2.0,
                button_font,
                WHITE,
            ));
            layout.hit_boxes.push(HitBox { rect, target });
        }
        layout.hit_boxes.push(HitBox {
            rect: Rect::new(table_x, y, table_w, button),
            target: HitTarget::Button(i),
        });

        let value_center = controls_x + button + gap + 30.0;
        let value_y = y + (button - value_size) / 2.0;
        match i {
            0 => layout.labels.push(Label::centered(
                values.max_enemies.to_string(),
                value_center,
                value_y,
                value_size,
                text_color,
            )),
            1 => {
                let preview = (button * 0.6).clamp(15.0, 20.0);
                let swatch = Rect::new(
                    right_x + (right_col - preview) / 2.0,
                    y + (button - preview) / 2.0,
                    preview,
                    preview,
                );
                let bg = palette::background(values.background);
                layout.panels.push(Panel::fill(swatch, bg.rgba()));
                layout.panels.push(Panel::outline(swatch, WHITE));

                let name_len = bg.name.chars().count().max(1) as f32;
                let size = (value_size - 2.0).min((right_col / name_len * 1.2).floor());
                if size > 8.0 {
                    layout.labels.push(Label::centered(
                        bg.name,
                        right_x + right_col / 2.0,
                        y + button + 3.0,
                        size,
                        text_color,
                    ));
                }
            }
            _ => {
                let on = if i == 2 { values.music } else { values.sound_effects };
                layout.labels.push(Label::centered(
                    if on { "ON" } else { "OFF" },
                    value_center,
                    value_y,
                    value_size,
                    if on { GREEN } else { RED },
                ));
            }
        }

        // The colour row leaves room for the colour name
        let height = if i == 1 { row_h + 15.0 } else { row_h };
        y += height + row_spacing;
    }
    y += row_spacing;

    let help_size = fit_font(OPTIONS_HELP, help_size, available_w);
    layout
        .labels
        .push(Label::centered(OPTIONS_HELP, center.x, y, help_size, GRAY));
    let back_size = fit_font(BACK_TEXT, scaled(35.0, 50.0, 10.0, 18.0), available_w);
    layout.labels.push(Label::centered(
        BACK_TEXT,
        center.x,
        y + help_size + 15.0,
        back_size,
        GRAY,
    ));
    layout
}

pub fn game_over(window: Vec2, selected: usize, kills: u32) -> ScreenLayout {
    let mut layout = ScreenLayout::overlay(window, 0.7);
    let center = window / 2.0;
    let available = window.x - MIN_MARGIN * 2.0;

    let title = "GAME OVER";
    let title_size = fit_font(title, (window.x / 12.0).floor().clamp(30.0, 80.0), available);
    let stats_size = (window.x / 20.0).floor().clamp(20.0, 40.0);
    let button_font = (window.x / 25.0).floor().clamp(16.0, 32.0);
    let button_w = (window.x / 3.0).clamp(200.0, 400.0);
    let button_h = (window.y / 15.0).clamp(35.0, 60.0);

    let total = title_size + stats_size + 2.0 * button_h + 120.0;
    let top = start_y(center.y, total);
    layout.labels.push(Label::centered(title, center.x, top, title_size, RED));
    layout.labels.push(Label::centered(
        format!("Kills: {}", kills),
        center.x,
        top + title_size + 30.0,
        stats_size,
        DARKGREEN,
    ));

    let buttons_top = top + title_size + stats_size + 70.0;
    for (i, text) in GAME_OVER_ITEMS.iter().enumerate() {
        let rect = Rect::new(
            center.x - button_w / 2.0,
            buttons_top + i as f32 * (button_h + 20.0),
            button_w,
            button_h,
        );
        let color = if i == selected { BLACK } else { WHITE };
        let label = Label::centered(
            *text,
            center.x,
            rect.y + (button_h - button_font) / 2.0,
            button_font,
            color,
        );
        layout.button(i, rect, i == selected, label);
    }
    layout
}

pub fn exit_confirm(window: Vec2, selected: usize) -> ScreenLayout {
    let mut layout = ScreenLayout::overlay(window, 0.8);
    let center = window / 2.0;
    let available = window.x - MIN_MARGIN * 2.0;

    let title = "Do you want to exit?";
    let title_size = fit_font(title, (window.x / 12.0).floor().clamp(30.0, 80.0), available);
    let button_w = (window.x / 4.0).clamp(120.0, 200.0);
    let button_h = (window.y / 12.0).clamp(40.0, 70.0);

    let total = title_size + 2.0 * button_h + 80.0;
    let top = start_y(center.y, total);
    layout.labels.push(Label::centered(title, center.x, top, title_size, RED));

    let buttons_top = top + title_size + 40.0;
    let text_size = (button_h * 0.75).floor();
    for (i, text) in EXIT_ITEMS.iter().enumerate() {
        let rect = Rect::new(
            center.x - button_w / 2.0,
            buttons_top + i as f32 * (button_h + 30.0),
            button_w,
            button_h,
        );
        let color = if i == selected { BLACK } else { WHITE };
        let label = Label::centered(
            *text,
            center.x,
            rect.y + (button_h - text_size) / 2.0,
            text_size,
            color,
        );
        layout.button(i, rect, i == selected, label);
    }
    layout
}

/// Kill counter in the top-left corner, shrunk to a third of the width
pub fn hud(window: Vec2, kills: u32) -> Label {
    let text = format!("Kills: {}", kills);
    let size = fit_font(&text, 40.0, window.x / 3.0);
    Label::new(text, Vec2::new(20.0, 20.0), size, MAROON)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Vec2 {
        Vec2::new(854.0, 480.0)
    }

    fn buttons(layout: &ScreenLayout) -> Vec<Rect> {
        layout
            .hit_boxes
            .iter()
            .filter(|h| matches!(h.target, HitTarget::Button(_)))
            .map(|h| h.rect)
            .collect()
    }

    #[test]
    fn test_measure_and_fit() {
        assert_eq!(measure_text("ABCDE", 20.0), 60.0);
        assert_eq!(fit_font("ABCDE", 20.0, 100.0), 20.0);
        assert_eq!(fit_font("ABCDE", 20.0, 30.0), 10.0);
    }

    #[test]
    fn test_main_menu_buttons() {
        let layout = main_menu(window(), 1);
        let rects = buttons(&layout);
        assert_eq!(rects.len(), 4);
        // width clamp(854/4, 150, 300), height clamp(480/15, 35, 60)
        assert_eq!(rects[0].width, 213.5);
        assert_eq!(rects[0].height, 35.0);
        assert_eq!(rects[0].center().x, 427.0);
        // spacing clamp(480/40, 10, 25)
        assert_eq!(rects[1].y - rects[0].y, 35.0 + 12.0);
        assert!(layout.panels.iter().any(|p| p.rect == rects[1] && p.color == LIME));
        assert!(layout.labels.iter().any(|l| l.text == "PLAY AS GOBO" && l.color == GOLD));
    }

    #[test]
    fn test_hit_testing() {
        let layout = main_menu(window(), 0);
        let rects = buttons(&layout);
        assert_eq!(layout.hit(rects[2].center()), Some(HitTarget::Button(2)));
        assert_eq!(layout.hit(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_options_arrows_take_priority() {
        let values = OptionValues {
            max_enemies: 7,
            background: 0,
            music: true,
            sound_effects: false,
        };
        let layout = options(window(), 0, &values);
        let dec = layout
            .hit_boxes
            .iter()
            .find(|h| h.target == HitTarget::Decrease(2))
            .unwrap();
        assert_eq!(layout.hit(dec.rect.center()), Some(HitTarget::Decrease(2)));
        assert!(layout.labels.iter().any(|l| l.text == "7"));
        assert!(layout.labels.iter().any(|l| l.text == "OFF" && l.color == RED));
        assert!(layout.labels.iter().any(|l| l.text == "Sky Blue (Default)"));
    }

    #[test]
    fn test_small_window_keeps_margin() {
        let layout = game_over(Vec2::new(320.0, 240.0), 0, 3);
        let title = &layout.labels[0];
        assert_eq!(title.text, "GAME OVER");
        assert!(title.pos.y >= MIN_MARGIN);
        assert!(title.width() <= 320.0 - 2.0 * MIN_MARGIN + 1.0);
        assert!(layout.labels.iter().any(|l| l.text == "Kills: 3"));
    }

    #[test]
    fn test_exit_menu_has_two_buttons() {
        let layout = exit_confirm(window(), 1);
        assert_eq!(buttons(&layout).len(), 2);
        let no = layout.labels.iter().find(|l| l.text == "No!").unwrap();
        assert_eq!(no.color, BLACK);
    }

    #[test]
    fn test_hud_shrinks_long_counts() {
        assert_eq!(hud(window(), 5).size, 40.0);
        let label = hud(Vec2::new(300.0, 200.0), 123_456);
        assert!(label.width() <= 100.0 + 1e-3);
    }
}
