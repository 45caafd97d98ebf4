//! Menu input and selection

use glam::Vec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "KeyW" => Some(Key::Up),
            "ArrowDown" | "KeyS" => Some(Key::Down),
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "Enter" | "NumpadEnter" => Some(Key::Enter),
            "Space" => Some(Key::Space),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// One frame of menu input (all one-shot except the pointer position)
#[derive(Debug, Clone, Default)]
pub struct MenuInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub back: bool,
    /// Pointer position in screen pixels, if it moved this frame
    pub pointer: Option<Vec2>,
    /// Click or tap at `pointer`
    pub click: bool,
}

impl MenuInput {
    pub fn press(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Enter | Key::Space => self.confirm = true,
            Key::Escape => self.back = true,
        }
    }

    pub fn point(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn tap(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
        self.click = true;
    }

    /// Forget the one-shot presses once a frame consumed them
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Wrap-around selection over a fixed number of entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    selected: usize,
    len: usize,
}

impl Menu {
    pub const fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn up(&mut self) {
        if self.len > 0 {
            self.selected = (self.selected + self.len - 1) % self.len;
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 {
            self.selected = (self.selected + 1) % self.len;
        }
    }

    /// Select an entry directly; returns true when the selection changed
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("KeyW"), Some(Key::Up));
        assert_eq!(Key::from_code("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_code("NumpadEnter"), Some(Key::Enter));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_space_and_enter_confirm() {
        let mut input = MenuInput::default();
        input.press(Key::Space);
        assert!(input.confirm);
        input.clear();
        assert!(!input.confirm);
        input.press(Key::Enter);
        input.press(Key::Escape);
        assert!(input.confirm && input.back);
    }

    #[test]
    fn test_menu_wraps() {
        let mut m = Menu::new(4);
        m.up();
        assert_eq!(m.selected(), 3);
        m.down();
        assert_eq!(m.selected(), 0);
        m.down();
        m.down();
        assert_eq!(m.selected(), 2);
    }

    #[test]
    fn test_select() {
        let mut m = Menu::new(2);
        assert!(!m.select(0));
        assert!(m.select(1));
        assert!(!m.select(5));
        assert_eq!(m.selected(), 1);
        m.reset();
        assert_eq!(m.selected(), 0);
    }
}
