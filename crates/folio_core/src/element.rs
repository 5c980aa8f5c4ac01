//! Host-owned elements
//!
//! Elements are the visual objects a page hands to the sequencer and the
//! triggers. The core only knows their identity, a layout rect and a bag of
//! animatable properties; what "x" or "opacity" means on screen is up to the
//! renderer.
//!
//! The sequencer talks to elements through [`ElementHost`] and the viewport
//! trigger reads geometry through [`BoundsSource`], so either can be driven
//! by something other than [`ElementStore`].

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::{HostError, Result};
use crate::geometry::Rect;
use crate::value::AnimValue;

new_key_type! {
    /// Handle to a host-owned element
    pub struct ElementId;
}

impl ElementId {
    /// Convert to raw u64 for logging or external maps
    pub fn to_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }
}

/// Read/write access to element properties
pub trait ElementHost {
    /// Whether the element still exists
    fn is_alive(&self, id: ElementId) -> bool;

    /// Current value of a property, if the element has it
    fn read(&self, id: ElementId, property: &str) -> Option<AnimValue>;

    /// Write a property value
    ///
    /// Fails with [`HostError::TargetGone`] when the element was torn down.
    fn write(&mut self, id: ElementId, property: &str, value: AnimValue) -> Result<()>;
}

/// Geometry lookup for intersection tests
pub trait BoundsSource {
    /// Visual bounds of the element, or `None` when it no longer exists
    fn bounds(&self, id: ElementId) -> Option<Rect>;
}

/// A single element: label, layout rect and animated properties
#[derive(Clone, Debug, Default)]
pub struct ElementNode {
    label: String,
    bounds: Rect,
    properties: FxHashMap<String, AnimValue>,
}

impl ElementNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Layout rect, before any "x"/"y" translation
    pub fn layout_bounds(&self) -> Rect {
        self.bounds
    }

    /// Layout rect moved by the element's "x"/"y" properties
    pub fn visual_bounds(&self) -> Rect {
        let dx = self.float("x").unwrap_or(0.0);
        let dy = self.float("y").unwrap_or(0.0);
        self.bounds.translate(dx, dy)
    }

    pub fn get(&self, property: &str) -> Option<AnimValue> {
        self.properties.get(property).copied()
    }

    pub fn float(&self, property: &str) -> Option<f32> {
        self.get(property).and_then(|v| v.as_float())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &AnimValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Slot-map backed element store
///
/// This is the reference host: pages create their elements here on mount
/// and remove them on unmount.
#[derive(Debug, Default)]
pub struct ElementStore {
    nodes: SlotMap<ElementId, ElementNode>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element with a label and layout rect
    pub fn create(&mut self, label: impl Into<String>, bounds: Rect) -> ElementId {
        self.nodes.insert(ElementNode {
            label: label.into(),
            bounds,
            properties: FxHashMap::default(),
        })
    }

    /// Tear an element down
    pub fn remove(&mut self, id: ElementId) -> Option<ElementNode> {
        self.nodes.remove(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn node(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.nodes.keys()
    }

    /// First element with the given label
    pub fn find(&self, label: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.label == label)
            .map(|(id, _)| id)
    }

    pub fn label(&self, id: ElementId) -> Option<&str> {
        self.nodes.get(id).map(|n| n.label.as_str())
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.bounds = bounds;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ElementId, property: &str) -> Option<AnimValue> {
        self.nodes.get(id).and_then(|n| n.get(property))
    }

    pub fn get_float(&self, id: ElementId, property: &str) -> Option<f32> {
        self.nodes.get(id).and_then(|n| n.float(property))
    }

    /// Set a property directly, returning false if the element is gone
    pub fn set(&mut self, id: ElementId, property: &str, value: impl Into<AnimValue>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.properties.insert(property.to_string(), value.into());
                true
            }
            None => {
                tracing::debug!("Ignoring '{}' set on removed element {:?}", property, id);
                false
            }
        }
    }
}

impl ElementHost for ElementStore {
    fn is_alive(&self, id: ElementId) -> bool {
        self.contains(id)
    }

    fn read(&self, id: ElementId, property: &str) -> Option<AnimValue> {
        self.get(id, property)
    }

    fn write(&mut self, id: ElementId, property: &str, value: AnimValue) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(HostError::TargetGone(id))?;
        match node.properties.get_mut(property) {
            Some(slot) => *slot = value,
            None => {
                node.properties.insert(property.to_string(), value);
            }
        }
        Ok(())
    }
}

impl BoundsSource for ElementStore {
    fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.visual_bounds())
    }
}
