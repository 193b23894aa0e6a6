//! Page document: the container and the blocks placed on it.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a block.
pub type BlockId = Uuid;

/// Default container size for a fresh document.
pub const DEFAULT_CONTAINER_WIDTH: f64 = 800.0;
pub const DEFAULT_CONTAINER_HEIGHT: f64 = 600.0;

/// Errors produced while parsing or validating a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),
    #[error("Block {id} has an invalid position ({left}, {top})")]
    InvalidPosition { id: BlockId, left: f64, top: f64 },
    #[error("Invalid container size {width}x{height}")]
    InvalidContainer { width: f64, height: f64 },
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            width: DEFAULT_CONTAINER_WIDTH,
            height: DEFAULT_CONTAINER_HEIGHT,
        }
    }
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The container as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// A positioned component instance on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Unique within the document, never reused.
    #[serde(default = "Uuid::new_v4")]
    pub id: BlockId,
    /// Registered component type that renders this block.
    pub key: String,
    /// Offset from the container's left edge.
    #[serde(default)]
    pub left: f64,
    /// Offset from the container's top edge.
    #[serde(default)]
    pub top: f64,
    /// Stacking order among siblings. Not required to be contiguous.
    #[serde(default)]
    pub z_index: i64,
    /// Rendered width as reported by the renderer.
    #[serde(default)]
    pub width: f64,
    /// Rendered height as reported by the renderer.
    #[serde(default)]
    pub height: f64,
    /// Centre the block on its drop point once its size is known.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub align_center: bool,
    /// Selection state. Owned by the focus manager and never exported.
    #[serde(skip)]
    pub focus: bool,
    /// Component-specific configuration.
    #[serde(default)]
    pub props: Map<String, Value>,
    /// Bindings from component properties to external form fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub model: BTreeMap<String, String>,
}

impl Block {
    /// Create a block of the given component type at a position.
    pub fn new(key: impl Into<String>, left: f64, top: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            left,
            top,
            z_index: 1,
            width: 0.0,
            height: 0.0,
            align_center: false,
            focus: false,
            props: Map::new(),
            model: BTreeMap::new(),
        }
    }

    /// Set the rendered size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Bounding rectangle in container coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    /// Serialize this block alone, for inspecting a single block.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn has_valid_position(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.left >= 0.0 && self.top >= 0.0
    }
}

/// The container and its ordered blocks. Sequence order is the paint baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub container: Container,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document with the given container.
    pub fn new(container: Container) -> Self {
        Self {
            container,
            blocks: Vec::new(),
        }
    }

    /// Builder-style block append, used when assembling initial state.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.iter().any(|b| b.id == id)
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Ids of focused blocks in sequence order.
    pub fn focused_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().filter(|b| b.focus).map(|b| b.id).collect()
    }

    pub fn max_z_index(&self) -> Option<i64> {
        self.blocks.iter().map(|b| b.z_index).max()
    }

    pub fn min_z_index(&self) -> Option<i64> {
        self.blocks.iter().map(|b| b.z_index).min()
    }

    /// Blocks back to front: by z-index, ties broken by sequence order.
    pub fn blocks_painted(&self) -> Vec<&Block> {
        let mut ordered: Vec<(usize, &Block)> = self.blocks.iter().enumerate().collect();
        ordered.sort_by_key(|(index, block)| (block.z_index, *index));
        ordered.into_iter().map(|(_, block)| block).collect()
    }

    /// Topmost block whose bounds contain the point.
    pub fn block_at_point(&self, point: Point) -> Option<BlockId> {
        self.blocks_painted()
            .into_iter()
            .rev()
            .find(|b| b.bounds().contains(point))
            .map(|b| b.id)
    }

    /// Check the document invariants: unique ids and finite, non-negative positions.
    pub fn validate(&self) -> DocumentResult<()> {
        let Container { width, height } = self.container;
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(DocumentError::InvalidContainer { width, height });
        }

        let mut seen = HashSet::with_capacity(self.blocks.len());
        for block in &self.blocks {
            if !seen.insert(block.id) {
                return Err(DocumentError::DuplicateId(block.id));
            }
            if !block.has_valid_position() {
                return Err(DocumentError::InvalidPosition {
                    id: block.id,
                    left: block.left,
                    top: block.top,
                });
            }
        }
        Ok(())
    }

    /// Serialize the document to the interchange format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a document from the interchange format.
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }
}
