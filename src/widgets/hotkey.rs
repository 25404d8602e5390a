use std::fmt::Display;

use crossterm::event::KeyCode;

#[derive(Debug, Clone)]
pub struct Hotkey<'a> {
    pub keycode: KeyCode,
    pub description: &'a str,
}

impl Hotkey<'_> {
    /// Width of the rendered `<key> description` cell
    #[must_use]
    pub fn width(&self) -> usize {
        self.to_string().chars().count() + self.description.chars().count() + 3
    }
}

impl Display for Hotkey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.keycode {
            KeyCode::Char(' ') => write!(f, "Space"),
            keycode => write!(f, "{keycode}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_is_spelled_out() {
        let hotkey = Hotkey {
            keycode: KeyCode::Char(' '),
            description: "Select row",
        };
        assert_eq!(hotkey.to_string(), "Space");
        assert_eq!(hotkey.width(), "Space".len() + "Select row".len() + 3);
    }
}
