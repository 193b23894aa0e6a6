//! Named document mutations.
//!
//! Every change that goes through history is a [`Command`]: a tagged value
//! whose [`Command::apply`] is a pure function from one document to the
//! next. Commands that only reference blocks missing from the document
//! produce no new document.

use crate::document::{Block, BlockId, Document};
use serde::{Deserialize, Serialize};

/// A reversible document mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Command {
    /// Offset blocks by a delta.
    Move { ids: Vec<BlockId>, dx: f64, dy: f64 },
    /// Remove blocks.
    Delete { ids: Vec<BlockId> },
    /// Raise blocks above every other block.
    PlaceTop { ids: Vec<BlockId> },
    /// Lower blocks beneath every other block.
    PlaceBottom { ids: Vec<BlockId> },
    /// Replace one block's fields, keeping its id.
    UpdateBlock { id: BlockId, block: Block },
    /// Replace the whole document.
    UpdateContainer { document: Document },
    /// Append a new block.
    Insert { block: Block },
}

impl Command {
    /// Label recorded in history.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Move { .. } => "move",
            Command::Delete { .. } => "delete",
            Command::PlaceTop { .. } => "placeTop",
            Command::PlaceBottom { .. } => "placeBottom",
            Command::UpdateBlock { .. } => "updateBlock",
            Command::UpdateContainer { .. } => "updateContainer",
            Command::Insert { .. } => "insert",
        }
    }

    /// Build the document that results from applying this command.
    /// Returns `None` when the command would change nothing.
    pub fn apply(&self, doc: &Document) -> Option<Document> {
        match self {
            Command::Move { ids, dx, dy } => move_blocks(doc, ids, *dx, *dy),
            Command::Delete { ids } => delete_blocks(doc, ids),
            Command::PlaceTop { ids } => restack(doc, ids, Stack::Top),
            Command::PlaceBottom { ids } => restack(doc, ids, Stack::Bottom),
            Command::UpdateBlock { id, block } => update_block(doc, *id, block),
            Command::UpdateContainer { document } => {
                (document != doc).then(|| document.clone())
            }
            Command::Insert { block } => {
                if doc.contains(block.id) {
                    return None;
                }
                let mut next = doc.clone();
                next.blocks.push(block.clone());
                Some(next)
            }
        }
    }
}

fn move_blocks(doc: &Document, ids: &[BlockId], dx: f64, dy: f64) -> Option<Document> {
    let mut next = doc.clone();
    let mut changed = false;
    for &id in ids {
        if let Some(block) = next.block_mut(id) {
            let left = (block.left + dx).max(0.0);
            let top = (block.top + dy).max(0.0);
            if left != block.left || top != block.top {
                block.left = left;
                block.top = top;
                changed = true;
            }
        }
    }
    changed.then_some(next)
}

fn delete_blocks(doc: &Document, ids: &[BlockId]) -> Option<Document> {
    let mut next = doc.clone();
    next.blocks.retain(|b| !ids.contains(&b.id));
    (next.len() != doc.len()).then_some(next)
}

#[derive(Debug, Clone, Copy)]
enum Stack {
    Top,
    Bottom,
}

/// Move the selected blocks to one end of the stacking order, keeping their
/// relative order: the selection is ranked by `(z_index, sequence index)`.
fn restack(doc: &Document, ids: &[BlockId], to: Stack) -> Option<Document> {
    let mut selected: Vec<usize> = doc
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| ids.contains(&b.id))
        .map(|(index, _)| index)
        .collect();
    if selected.is_empty() {
        return None;
    }
    selected.sort_by_key(|&index| (doc.blocks[index].z_index, index));

    let count = selected.len() as i64;
    let mut next = doc.clone();
    let base = match stack_base(&next, count, to) {
        Some(base) => base,
        None => {
            // The z range is exhausted at that end; compact it and retry.
            log::debug!("z-index overflow, renumbering {} block(s)", next.len());
            renumber(&mut next);
            selected.sort_by_key(|&index| (next.blocks[index].z_index, index));
            stack_base(&next, count, to)?
        }
    };

    for (rank, index) in selected.into_iter().enumerate() {
        next.blocks[index].z_index = base + rank as i64;
    }
    Some(next)
}

/// First z-index for `count` blocks placed at one end, if it fits in `i64`.
fn stack_base(doc: &Document, count: i64, to: Stack) -> Option<i64> {
    match to {
        Stack::Top => {
            let max = doc.max_z_index()?;
            max.checked_add(count)?;
            Some(max + 1)
        }
        Stack::Bottom => doc.min_z_index()?.checked_sub(count),
    }
}

/// Reassign z-indices `1..=n` in paint order.
fn renumber(doc: &mut Document) {
    let mut order: Vec<usize> = (0..doc.blocks.len()).collect();
    order.sort_by_key(|&index| (doc.blocks[index].z_index, index));
    for (rank, index) in order.into_iter().enumerate() {
        doc.blocks[index].z_index = rank as i64 + 1;
    }
}

fn update_block(doc: &Document, id: BlockId, block: &Block) -> Option<Document> {
    let index = doc.index_of(id)?;
    let current = &doc.blocks[index];

    let mut replacement = block.clone();
    replacement.id = id;
    replacement.focus = current.focus;
    if replacement == *current {
        return None;
    }

    let mut next = doc.clone();
    next.blocks[index] = replacement;
    Some(next)
}
