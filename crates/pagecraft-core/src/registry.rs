//! Registered component types that the palette can place on the canvas.

use crate::document::Block;
use kurbo::{Point, Size};
use serde_json::{Map, Value};

/// A component type offered by the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDescriptor {
    /// Block `key` for instances of this component.
    pub key: String,
    /// Human-readable palette label.
    pub label: String,
    /// Props a freshly dropped block starts with.
    pub default_props: Map<String, Value>,
}

impl ComponentDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default_props: Map::new(),
        }
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_props.insert(name.into(), value.into());
        self
    }

    /// A new block for this component dropped at `point`.
    ///
    /// The block is flagged to centre itself on the drop point once the
    /// renderer reports its size.
    pub fn instantiate(&self, point: Point, size: Option<Size>) -> Block {
        let mut block = Block::new(self.key.clone(), point.x.max(0.0), point.y.max(0.0));
        block.props = self.default_props.clone();
        block.align_center = true;
        if let Some(size) = size {
            block.width = size.width;
            block.height = size.height;
        }
        block
    }
}

/// Ordered collection of component descriptors, keyed by `key`.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: Vec<ComponentDescriptor>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component, replacing any earlier one with the same key.
    pub fn register(&mut self, descriptor: ComponentDescriptor) {
        match self.components.iter_mut().find(|c| c.key == descriptor.key) {
            Some(existing) => *existing = descriptor,
            None => self.components.push(descriptor),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ComponentDescriptor> {
        self.components.iter().find(|c| c.key == key)
    }

    /// Components in palette order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
