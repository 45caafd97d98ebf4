//! Named colours: the background choices and the fixed UI colours

/// A background choice shown in the options menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub color: [u8; 3],
}

const fn named(name: &'static str, r: u8, g: u8, b: u8) -> NamedColor {
    NamedColor {
        name,
        color: [r, g, b],
    }
}

/// Background colours in cycling order
pub const PALETTE: [NamedColor; 24] = [
    named("Sky Blue (Default)", 0, 169, 212),
    named("Black", 0, 0, 0),
    named("White", 255, 255, 255),
    named("Green", 0, 228, 48),
    named("Blue", 0, 121, 241),
    named("Yellow", 253, 249, 0),
    named("Orange", 255, 161, 0),
    named("Purple", 200, 122, 255),
    named("Brown", 127, 106, 79),
    named("Dark Gray", 80, 80, 80),
    named("Gray", 130, 130, 130),
    named("Light Gray", 200, 200, 200),
    named("Pink", 255, 109, 194),
    named("Magenta", 255, 0, 255),
    named("Dark Green", 0, 117, 44),
    named("Dark Blue", 0, 82, 172),
    named("Dark Purple", 112, 31, 126),
    named("Dark Brown", 76, 63, 47),
    named("Ray White", 245, 245, 245),
    named("Gold", 255, 203, 0),
    named("Lime", 0, 158, 47),
    named("Beige", 211, 176, 131),
    named("Sky Blue", 102, 191, 255),
    named("Violet", 135, 60, 190),
];

pub const DEFAULT_BACKGROUND_INDEX: usize = 0;

impl NamedColor {
    pub fn rgba(&self) -> [f32; 4] {
        rgb(self.color[0], self.color[1], self.color[2])
    }
}

pub fn next_index(index: usize) -> usize {
    (index + 1) % PALETTE.len()
}

pub fn prev_index(index: usize) -> usize {
    (index + PALETTE.len() - 1) % PALETTE.len()
}

/// Palette entry, falling back to the default for a bad index
pub fn background(index: usize) -> &'static NamedColor {
    PALETTE
        .get(index)
        .unwrap_or(&PALETTE[DEFAULT_BACKGROUND_INDEX])
}

const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Same colour with its alpha scaled
pub fn fade(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for DOM text
pub fn css(color: [f32; 4]) -> String {
    format!(
        "rgba({}, {}, {}, {:.3})",
        (color[0] * 255.0).round() as u8,
        (color[1] * 255.0).round() as u8,
        (color[2] * 255.0).round() as u8,
        color[3]
    )
}

pub const BLACK: [f32; 4] = rgb(0, 0, 0);
pub const WHITE: [f32; 4] = rgb(255, 255, 255);
pub const GRAY: [f32; 4] = rgb(130, 130, 130);
pub const DARKGRAY: [f32; 4] = rgb(80, 80, 80);
pub const LIME: [f32; 4] = rgb(0, 158, 47);
pub const GREEN: [f32; 4] = rgb(0, 228, 48);
pub const DARKGREEN: [f32; 4] = rgb(0, 117, 44);
pub const RED: [f32; 4] = rgb(230, 41, 55);
pub const MAROON: [f32; 4] = rgb(190, 33, 55);
pub const GOLD: [f32; 4] = rgb(255, 203, 0);
pub const YELLOW: [f32; 4] = rgb(253, 249, 0);
pub const ORANGE: [f32; 4] = rgb(255, 161, 0);
pub const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Colours of the procedurally drawn sprites
pub mod sprite {
    pub const DIRT: [f32; 4] = [0.5, 0.35, 0.2, 1.0];
    pub const GOBO: [f32; 4] = [0.35, 0.75, 0.3, 1.0];
    pub const GOBO_BELLY: [f32; 4] = [0.75, 0.9, 0.55, 1.0];
    pub const ENEMY: [f32; 4] = [0.55, 0.2, 0.6, 1.0];
    pub const ENEMY_FEET: [f32; 4] = [0.3, 0.1, 0.35, 1.0];
    pub const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PUPIL: [f32; 4] = [0.05, 0.05, 0.1, 1.0];
    pub const FINISH_DARK: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    pub const FIREBALL: [f32; 4] = [1.0, 0.39, 0.0, 1.0];
    pub const BOMB_GLOW: [f32; 4] = [0.9, 0.16, 0.22, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(next_index(23), 0);
        assert_eq!(prev_index(0), 23);
        let mut i = DEFAULT_BACKGROUND_INDEX;
        for _ in 0..PALETTE.len() {
            i = next_index(i);
        }
        assert_eq!(i, DEFAULT_BACKGROUND_INDEX);
    }

    #[test]
    fn test_default_is_sky_blue() {
        let c = background(DEFAULT_BACKGROUND_INDEX);
        assert_eq!(c.name, "Sky Blue (Default)");
        assert_eq!(background(999), c);
    }

    #[test]
    fn test_css_and_fade() {
        assert_eq!(css(fade(WHITE, 0.5)), "rgba(255, 255, 255, 0.500)");
        assert_eq!(fade(RED, 2.0)[3], 1.0);
    }
}
