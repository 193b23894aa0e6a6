//! Editor behaviour settings.

use crate::snap::SNAP_TOLERANCE;
use serde::{Deserialize, Serialize};

/// Tunable editor behaviour. Missing fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap dragged blocks to sibling edges.
    pub snap_enabled: bool,
    /// Snap distance in container pixels.
    pub snap_tolerance: f64,
    /// Treat the container's own edges and center as a snap reference.
    pub snap_to_container: bool,
    /// Maximum number of undo steps kept (None = unbounded).
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            snap_tolerance: SNAP_TOLERANCE,
            snap_to_container: true,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
