//! Keyboard shortcut registry.

use crate::input::KeyEvent;
use serde::{Deserialize, Serialize};

/// Editor operations reachable from any trigger (key, button, menu).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorAction {
    Undo,
    Redo,
    Delete,
    PlaceTop,
    PlaceBottom,
    SelectAll,
    ClearSelection,
    TogglePreview,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: EditorAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: EditorAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, event: &KeyEvent) -> bool {
        self.key.eq_ignore_ascii_case(&event.key)
            && self.ctrl == event.modifiers.command()
            && self.shift == event.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use EditorAction::*;
        vec![
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("Delete", false, false, Delete, "Delete selected blocks"),
            Shortcut::new("Backspace", false, false, Delete, "Delete selected blocks"),
            Shortcut::new("]", true, false, PlaceTop, "Bring selected blocks to the top"),
            Shortcut::new("[", true, false, PlaceBottom, "Send selected blocks to the bottom"),
            Shortcut::new("A", true, false, SelectAll, "Select all blocks"),
            Shortcut::new("Escape", false, false, ClearSelection, "Clear selection"),
            Shortcut::new("P", true, false, TogglePreview, "Toggle preview mode"),
        ]
    }

    /// Find the action bound to a key event.
    pub fn lookup(event: &KeyEvent) -> Option<EditorAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(event))
            .map(|shortcut| shortcut.action)
    }
}
