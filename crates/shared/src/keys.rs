//! Key events as delivered by the global keyboard hook.
//!
//! Names follow the hook's scheme: printable keys carry their text
//! (`"a"`, `"H"`, `" "`), everything else an upper-case descriptive
//! name such as `"LEFT CTRL"`, `"MOUSE LEFT"` or `"RETURN"`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyTransition {
    Down,
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub name: String,
    pub transition: KeyTransition,
}

impl KeyEvent {
    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transition: KeyTransition::Down,
        }
    }

    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transition: KeyTransition::Up,
        }
    }

    pub fn is_down(&self) -> bool {
        self.transition == KeyTransition::Down
    }

    fn name_contains(&self, needle: &str) -> bool {
        self.name.to_ascii_uppercase().contains(needle)
    }

    /// Mouse buttons reported through the same hook
    pub fn is_pointer(&self) -> bool {
        self.name_contains("MOUSE")
    }

    pub fn is_alt(&self) -> bool {
        self.name_contains("ALT")
    }

    pub fn is_modifier(&self) -> bool {
        ["CTRL", "SHIFT", "ALT", "META"]
            .iter()
            .any(|m| self.name_contains(m))
    }

    /// Content-producing keystroke: counts as activity for idle detection.
    pub fn is_content(&self) -> bool {
        !self.name.is_empty() && !self.is_pointer() && !self.is_modifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(KeyEvent::down("a").is_content());
        assert!(KeyEvent::down(" ").is_content());
        assert!(KeyEvent::down("RETURN").is_content());

        let shift = KeyEvent::down("LEFT SHIFT");
        assert!(shift.is_modifier());
        assert!(!shift.is_content());
        assert!(!shift.is_alt());

        let alt = KeyEvent::down("LEFT ALT");
        assert!(alt.is_alt());
        assert!(alt.is_modifier());

        let click = KeyEvent::down("MOUSE LEFT");
        assert!(click.is_pointer());
        assert!(!click.is_content());

        assert!(!KeyEvent::down("").is_content());
    }

    #[test]
    fn test_classification_ignores_case() {
        assert!(KeyEvent::down("Left Meta").is_modifier());
        assert!(KeyEvent::down("mouse right").is_pointer());
    }
}
