//! Input vocabulary shared by the interaction controller and its host.

use crate::block::BlockId;
use serde::{Deserialize, Serialize};

/// What a pointer-down landed on, as resolved by the host's hit test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum PointerTarget {
    /// Empty canvas (page margins, grid, or outside the page).
    Background,
    /// The body of a block.
    BlockBody(BlockId),
    /// The resize grip of a selected block.
    ResizeHandle(BlockId),
    /// The delete button of a selected block.
    DeleteControl(BlockId),
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    Other(String),
}

impl Key {
    /// Map a key name as reported by the platform (`"Space"`, `" "`).
    pub fn from_name(name: &str) -> Self {
        match name {
            "Space" | " " | "space" => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Cursor the host should show for the current interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorIcon {
    #[default]
    Default,
    /// Space is held and the canvas can be grabbed.
    Grab,
    /// A block or the canvas is being dragged.
    Grabbing,
    /// A block is being resized from its bottom-right corner.
    SeResize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Space"), Key::Space);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_command_modifier() {
        assert!(!Modifiers::default().command());
        let mods = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(mods.command());
    }

    #[test]
    fn test_target_json() {
        let target: PointerTarget =
            serde_json::from_str(r#"{"kind":"resize-handle","id":"b1"}"#).unwrap();
        assert_eq!(target, PointerTarget::ResizeHandle("b1".to_string()));
        let background: PointerTarget = serde_json::from_str(r#"{"kind":"background"}"#).unwrap();
        assert_eq!(background, PointerTarget::Background);
    }
}
