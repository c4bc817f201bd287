//! Canvas input bindings and their documentation.

/// An input binding.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub input: &'static str,
    pub ctrl: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(input: &'static str, ctrl: bool, description: &'static str) -> Self {
        Self {
            input,
            ctrl,
            description,
        }
    }

    /// Format the binding for display (e.g., "Ctrl+Wheel").
    pub fn format(&self) -> String {
        if self.ctrl {
            format!("Ctrl+{}", self.input)
        } else {
            self.input.to_string()
        }
    }
}

/// Registry of all canvas bindings.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Drag block", false, "Move the block in whole grid cells"),
            Shortcut::new("Drag corner", false, "Resize the selected block"),
            Shortcut::new("Click ×", false, "Delete the selected block"),
            Shortcut::new("Click background", false, "Clear the selection"),
            Shortcut::new("Space+Drag", false, "Pan the canvas"),
            Shortcut::new("Wheel", true, "Zoom in or out by 10%"),
            Shortcut::new("Drop template", false, "Place a new block at the drop cell"),
        ]
    }

    /// Render all bindings as an aligned table.
    pub fn table() -> String {
        Self::all()
            .iter()
            .map(|shortcut| format!("  {:20} {}", shortcut.format(), shortcut.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
