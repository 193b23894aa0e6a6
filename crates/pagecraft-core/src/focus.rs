//! Focus/selection tracking for blocks.
//!
//! Selection lives on the blocks themselves as the `focus` flag, so that
//! history snapshots capture it together with the blocks. The manager keeps
//! the one piece of state that is not derivable from the flags: which block
//! was selected most recently.

use crate::document::{Block, BlockId, Document};

/// Tracks which blocks are selected and which one was selected last.
#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    last_selected: Option<BlockId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a single block, clearing every other selection.
    /// Returns false if the block is not in the document.
    pub fn select_one(&mut self, doc: &mut Document, id: BlockId) -> bool {
        if !doc.contains(id) {
            return false;
        }
        for block in &mut doc.blocks {
            block.focus = block.id == id;
        }
        self.last_selected = Some(id);
        true
    }

    /// Add a block to the selection, or remove it if it is already selected.
    /// Returns false if the block is not in the document.
    pub fn toggle_add(&mut self, doc: &mut Document, id: BlockId) -> bool {
        let Some(block) = doc.block_mut(id) else {
            return false;
        };
        block.focus = !block.focus;
        if block.focus {
            self.last_selected = Some(id);
        } else if self.last_selected == Some(id) {
            self.last_selected = None;
        }
        true
    }

    /// Mark an already selected block as the most recent one, without
    /// touching the rest of the selection.
    pub fn set_last(&mut self, doc: &Document, id: BlockId) -> bool {
        if !self.is_selected(doc, id) {
            return false;
        }
        self.last_selected = Some(id);
        true
    }

    /// Deselect every block.
    pub fn clear_all(&mut self, doc: &mut Document) {
        for block in &mut doc.blocks {
            block.focus = false;
        }
        self.last_selected = None;
    }

    /// Select every block. There is no single "last" block afterwards.
    pub fn select_all(&mut self, doc: &mut Document) {
        for block in &mut doc.blocks {
            block.focus = true;
        }
        self.last_selected = None;
    }

    /// Ids of the selected blocks, in document order.
    pub fn selected_ids(&self, doc: &Document) -> Vec<BlockId> {
        doc.focused_ids()
    }

    pub fn is_selected(&self, doc: &Document, id: BlockId) -> bool {
        doc.block(id).is_some_and(|b| b.focus)
    }

    /// The block property panels should edit: the most recently selected
    /// block while it is still selected, otherwise the sole selected block.
    pub fn last_selected_id(&self, doc: &Document) -> Option<BlockId> {
        if let Some(id) = self.last_selected {
            if self.is_selected(doc, id) {
                return Some(id);
            }
        }
        match doc.focused_ids().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn last_selected_block<'a>(&self, doc: &'a Document) -> Option<&'a Block> {
        self.last_selected_id(doc).and_then(|id| doc.block(id))
    }

    /// Drop the last-selected pointer if it no longer refers to a selected block.
    pub fn prune(&mut self, doc: &Document) {
        if let Some(id) = self.last_selected {
            if !self.is_selected(doc, id) {
                self.last_selected = None;
            }
        }
    }
}
