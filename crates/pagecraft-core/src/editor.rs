//! Canvas controller: routes pointer and keyboard input to the focus
//! manager, the drag engine and the history, and owns the live document.

use crate::command::Command;
use crate::config::EditorConfig;
use crate::document::{Block, BlockId, Document, DocumentError};
use crate::drag::{DragCommit, DragEngine};
use crate::focus::FocusManager;
use crate::history::History;
use crate::input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::registry::ComponentDescriptor;
use crate::shortcuts::{EditorAction, ShortcutRegistry};
use crate::snap::SnapLines;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Editor errors surfaced to callers.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Import rejected: {0}")]
    Import(DocumentError),
    #[error("Invalid document: {0}")]
    Invalid(#[from] DocumentError),
}

impl EditorError {
    /// Report a validation failure of imported content as a rejected import.
    fn into_import(self) -> Self {
        match self {
            EditorError::Invalid(e) => EditorError::Import(e),
            other => other,
        }
    }
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Receives an independent copy of the document after every committed change.
pub type ChangeListener = Box<dyn FnMut(Document)>;

/// Interaction mode of the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Normal editing.
    #[default]
    Editing,
    /// Rendered as the end user would see it; no selection or dragging.
    Preview,
    /// Editing surface closed; only the rendered page remains.
    Closed,
}

impl EditorMode {
    pub fn is_read_only(self) -> bool {
        self != EditorMode::Editing
    }
}

/// The editing engine behind the canvas.
pub struct Editor {
    /// Live document. Replaced wholesale by history; mutated in place only
    /// by drag previews, focus flags and size reports.
    document: Arc<Document>,
    focus: FocusManager,
    drag: DragEngine,
    history: History,
    config: EditorConfig,
    mode: EditorMode,
    /// Last size the renderer reported per block. Reapplied whenever history
    /// swaps in a snapshot taken before the report.
    measured: HashMap<BlockId, Size>,
    listener: Option<ChangeListener>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("document", &self.document)
            .field("focus", &self.focus)
            .field("drag", &self.drag)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("measured", &self.measured)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

impl Editor {
    /// Create an editor over an initial document with default settings.
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        Self {
            document: Arc::new(document),
            focus: FocusManager::new(),
            drag: DragEngine::new(),
            history: History::with_limit(config.history_limit),
            config,
            mode: EditorMode::Editing,
            measured: HashMap::new(),
            listener: None,
        }
    }

    /// Register the listener that receives the document after each
    /// committed mutation, undo and redo.
    pub fn on_change(&mut self, listener: impl FnMut(Document) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Modes
    // ─────────────────────────────────────────────────────────────────────

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode.is_read_only()
    }

    /// Switch mode. Any drag is committed and the selection cleared.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        self.finish_drag();
        self.focus.clear_all(Arc::make_mut(&mut self.document));
        log::info!("editor mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Flip between editing and preview.
    pub fn toggle_preview(&mut self) {
        let next = match self.mode {
            EditorMode::Editing => EditorMode::Preview,
            EditorMode::Preview | EditorMode::Closed => EditorMode::Editing,
        };
        self.set_mode(next);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    pub fn selected_ids(&self) -> Vec<BlockId> {
        self.focus.selected_ids(&self.document)
    }

    pub fn is_selected(&self, id: BlockId) -> bool {
        self.focus.is_selected(&self.document, id)
    }

    /// The single block property panels should show, if any.
    pub fn last_selected_block(&self) -> Option<&Block> {
        self.focus.last_selected_block(&self.document)
    }

    pub fn select(&mut self, id: BlockId) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.focus.select_one(Arc::make_mut(&mut self.document), id)
    }

    pub fn toggle_selection(&mut self, id: BlockId) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.focus.toggle_add(Arc::make_mut(&mut self.document), id)
    }

    pub fn select_all(&mut self) -> bool {
        if self.is_read_only() || self.document.is_empty() {
            return false;
        }
        self.focus.select_all(Arc::make_mut(&mut self.document));
        true
    }

    /// Returns false if nothing was selected.
    pub fn clear_selection(&mut self) -> bool {
        if !self.document.blocks.iter().any(|b| b.focus) {
            return false;
        }
        self.focus.clear_all(Arc::make_mut(&mut self.document));
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer input
    // ─────────────────────────────────────────────────────────────────────

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Guides to draw for the current drag tick.
    pub fn snap_lines(&self) -> SnapLines {
        self.drag.snap_lines()
    }

    /// Dispatch a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button, modifiers } => {
                self.pointer_down_with(position, button, modifiers)
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, .. } => self.pointer_up(position),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Primary-button press on the canvas.
    pub fn pointer_down(&mut self, point: Point, modifiers: Modifiers) {
        self.pointer_down_with(point, MouseButton::Left, modifiers);
    }

    fn pointer_down_with(&mut self, point: Point, button: MouseButton, modifiers: Modifiers) {
        if self.is_read_only() {
            return;
        }
        self.finish_drag();

        let Some(id) = self.document.block_at_point(point) else {
            self.clear_selection();
            return;
        };

        let doc = Arc::make_mut(&mut self.document);
        if modifiers.extends_selection() {
            self.focus.toggle_add(doc, id);
        } else if self.focus.is_selected(doc, id) {
            // Keep a multi-selection intact so it can be dragged together.
            self.focus.set_last(doc, id);
        } else {
            self.focus.select_one(doc, id);
        }

        if button == MouseButton::Left {
            let primary = self.focus.last_selected_id(&self.document);
            self.drag
                .begin_drag(point, &self.document, primary, false, &self.config);
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.drag.is_dragging() {
            self.drag.on_drag_move(point, &mut self.document, &self.config);
        }
    }

    /// Release ends the gesture, committing the move if anything moved.
    pub fn pointer_up(&mut self, point: Point) {
        let moved = self
            .drag
            .state()
            .is_some_and(|state| state.current_point != point);
        if moved {
            self.pointer_move(point);
        }
        self.finish_drag();
    }

    /// Pointer left the canvas (or the window blurred) mid-gesture: end the
    /// drag at the last known position.
    pub fn pointer_leave(&mut self) {
        self.finish_drag();
    }

    fn finish_drag(&mut self) -> bool {
        match self.drag.end_drag() {
            Some(commit) => {
                self.commit_drag(commit);
                true
            }
            None => false,
        }
    }

    fn commit_drag(&mut self, commit: DragCommit) {
        let entry = commit.into_entry(Arc::clone(&self.document));
        self.history.record(entry);
        self.notify();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Keyboard and menu actions
    // ─────────────────────────────────────────────────────────────────────

    /// Run the action bound to a key, if any.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<EditorAction> {
        let action = ShortcutRegistry::lookup(event)?;
        self.perform(action);
        Some(action)
    }

    /// Run an action regardless of how it was triggered.
    /// Returns whether anything changed.
    pub fn perform(&mut self, action: EditorAction) -> bool {
        match action {
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::Delete => self.delete(),
            EditorAction::PlaceTop => self.place_top(),
            EditorAction::PlaceBottom => self.place_bottom(),
            EditorAction::SelectAll => self.select_all(),
            EditorAction::ClearSelection => self.clear_selection(),
            EditorAction::TogglePreview => {
                self.toggle_preview();
                true
            }
        }
    }

    /// Delete the selected blocks.
    pub fn delete(&mut self) -> bool {
        let ids = self.selected_ids();
        !ids.is_empty() && matches!(self.execute(Command::Delete { ids }), Ok(true))
    }

    /// Raise the selected blocks above all others.
    pub fn place_top(&mut self) -> bool {
        let ids = self.selected_ids();
        !ids.is_empty() && matches!(self.execute(Command::PlaceTop { ids }), Ok(true))
    }

    /// Lower the selected blocks beneath all others.
    pub fn place_bottom(&mut self) -> bool {
        let ids = self.selected_ids();
        !ids.is_empty() && matches!(self.execute(Command::PlaceBottom { ids }), Ok(true))
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.finish_drag();
        if !self.history.undo(&mut self.document) {
            return false;
        }
        self.apply_measured_sizes();
        self.focus.prune(&self.document);
        self.notify();
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.finish_drag();
        if !self.history.redo(&mut self.document) {
            return false;
        }
        self.apply_measured_sizes();
        self.focus.prune(&self.document);
        self.notify();
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation entry points
    // ─────────────────────────────────────────────────────────────────────

    /// Run a command through history. `Ok(false)` means it changed nothing.
    pub fn execute(&mut self, command: Command) -> EditorResult<bool> {
        self.finish_drag();

        if !self.history.execute(command, &mut self.document)? {
            return Ok(false);
        }
        self.focus.prune(&self.document);
        self.notify();
        Ok(true)
    }

    /// Offset blocks by a delta as one undoable step.
    pub fn move_blocks(&mut self, ids: Vec<BlockId>, delta: Vec2) -> EditorResult<bool> {
        self.execute(Command::Move { ids, dx: delta.x, dy: delta.y })
    }

    /// Replace the fields of the block `target` with those of `block`.
    pub fn update_block(&mut self, block: Block, target: BlockId) -> EditorResult<bool> {
        self.execute(Command::UpdateBlock { id: target, block })
    }

    /// Replace the whole document as one undoable step.
    pub fn update_container(&mut self, document: Document) -> EditorResult<bool> {
        document.validate()?;
        self.execute(Command::UpdateContainer { document })
    }

    /// Parse a document from the interchange format and apply it.
    /// On failure the document and history are left untouched.
    pub fn import_json(&mut self, json: &str) -> EditorResult<bool> {
        let document = Document::from_json(json)
            .inspect_err(|e| log::warn!("document import rejected: {}", e))
            .map_err(EditorError::Import)?;
        log::info!("importing document with {} block(s)", document.len());
        self.update_container(document).map_err(EditorError::into_import)
    }

    /// Parse a single block and apply it over `target`.
    pub fn import_block_json(&mut self, json: &str, target: BlockId) -> EditorResult<bool> {
        let block: Block = serde_json::from_str(json)
            .map_err(DocumentError::from)
            .inspect_err(|e| log::warn!("block import rejected: {}", e))
            .map_err(EditorError::Import)?;
        self.update_block(block, target).map_err(EditorError::into_import)
    }

    /// Serialize the live document for export.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.document.to_json()
    }

    /// Serialize one block for inspection.
    pub fn block_json(&self, id: BlockId) -> Option<Result<String, serde_json::Error>> {
        self.document.block(id).map(Block::to_json)
    }

    /// Insert a palette component dropped at `point`.
    pub fn drop_component(
        &mut self,
        descriptor: &ComponentDescriptor,
        point: Point,
        size: Option<Size>,
    ) -> EditorResult<Option<BlockId>> {
        let block = descriptor.instantiate(point, size);
        let id = block.id;
        let inserted = self.execute(Command::Insert { block })?;
        Ok(inserted.then_some(id))
    }

    /// Record the rendered size of a block.
    ///
    /// Size reports come from the renderer and are not history entries; the
    /// size is kept outside the snapshots and survives undo and redo. A
    /// block dropped with `align_center` is re-centred on its drop point the
    /// first time its size is known.
    pub fn set_block_size(&mut self, id: BlockId, width: f64, height: f64) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        self.measured.insert(id, Size::new(width, height));
        self.apply_measured_sizes()
    }

    /// Bring the live document in line with the reported sizes.
    /// Returns whether any block changed.
    fn apply_measured_sizes(&mut self) -> bool {
        let stale = self.document.blocks.iter().any(|block| {
            self.measured
                .get(&block.id)
                .is_some_and(|size| needs_size(block, *size))
        });
        if !stale {
            return false;
        }

        let doc = Arc::make_mut(&mut self.document);
        for block in &mut doc.blocks {
            if let Some(size) = self.measured.get(&block.id) {
                apply_size(block, *size);
            }
        }
        true
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(self.document.as_ref().clone());
        }
    }
}

fn needs_size(block: &Block, size: Size) -> bool {
    block.width != size.width || block.height != size.height || block.align_center
}

fn apply_size(block: &mut Block, size: Size) {
    block.width = size.width;
    block.height = size.height;
    if block.align_center {
        block.left = (block.left - size.width / 2.0).max(0.0);
        block.top = (block.top - size.height / 2.0).max(0.0);
        block.align_center = false;
    }
}
