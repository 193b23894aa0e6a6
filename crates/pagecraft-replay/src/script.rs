//! Recorded editing sessions and their playback against an [`Editor`].

use kurbo::Point;
use pagecraft_core::{
    Block, BlockId, ComponentDescriptor, DocumentError, Editor, EditorAction, EditorError,
    EditorMode, KeyEvent, Modifiers, PointerEvent,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Replay errors
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[source] serde_json::Error),
    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),
    #[error("Invalid config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("Export failed: {0}")]
    Export(#[source] serde_json::Error),
    #[error("Step {index} failed: {source}")]
    Editor {
        index: usize,
        #[source]
        source: EditorError,
    },
}

/// Result type for replay operations
pub type ReplayResult<T> = Result<T, ReplayError>;

/// One recorded input or operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum Step {
    /// Pointer input in container coordinates.
    Pointer { event: PointerEvent },
    /// Key press, resolved through the shortcut table.
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// An editor action, as a toolbar button would trigger it.
    Action { action: EditorAction },
    /// Replace the whole document.
    Import { document: Value },
    /// Property panel edit of one block.
    UpdateBlock { id: BlockId, block: Block },
    /// Paste a block in the interchange format over an existing one.
    ImportBlock { id: BlockId, block: Value },
    /// Renderer size report for a block.
    Resize { id: BlockId, width: f64, height: f64 },
    /// Palette drop of a component.
    Drop {
        component: String,
        position: Point,
        #[serde(default)]
        props: Map<String, Value>,
    },
    /// Switch editor mode.
    Mode { mode: EditorMode },
}

/// Parse a script from JSON text.
pub fn parse_script(json: &str) -> ReplayResult<Vec<Step>> {
    serde_json::from_str(json).map_err(ReplayError::Script)
}

/// Read a whole file, attaching the path to any I/O error.
pub fn read_file(path: &Path) -> ReplayResult<String> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Play every step in order. Stops at the first step the editor rejects.
pub fn run_script(editor: &mut Editor, steps: &[Step]) -> ReplayResult<()> {
    for (index, step) in steps.iter().enumerate() {
        log::debug!("step {}: {:?}", index, step);
        apply_step(editor, step).map_err(|source| ReplayError::Editor { index, source })?;
    }
    log::info!(
        "replayed {} step(s), history: {:?}",
        steps.len(),
        editor.history().undo_names()
    );
    Ok(())
}

fn apply_step(editor: &mut Editor, step: &Step) -> Result<(), EditorError> {
    match step {
        Step::Pointer { event } => editor.handle_pointer_event(event),
        Step::Key { key, modifiers } => {
            let event = KeyEvent::new(key.clone(), *modifiers);
            if editor.handle_key_event(&event).is_none() {
                log::warn!("no shortcut bound to {:?}", event);
            }
        }
        Step::Action { action } => {
            editor.perform(*action);
        }
        Step::Import { document } => {
            editor.import_json(&document.to_string())?;
        }
        Step::UpdateBlock { id, block } => {
            editor.update_block(block.clone(), *id)?;
        }
        Step::ImportBlock { id, block } => {
            editor.import_block_json(&block.to_string(), *id)?;
        }
        Step::Resize { id, width, height } => {
            editor.set_block_size(*id, *width, *height);
        }
        Step::Drop { component, position, props } => {
            let mut descriptor = ComponentDescriptor::new(component.clone(), component.clone());
            descriptor.default_props = props.clone();
            editor.drop_component(&descriptor, *position, None)?;
        }
        Step::Mode { mode } => editor.set_mode(*mode),
    }
    Ok(())
}
