//! In-memory host without a rendering engine.
//!
//! `HeadlessHost` keeps a flat list of elements with their computed styles,
//! sizes and boxes, and records every style write in order. Writes land in the
//! computed style immediately, as if every transition finished instantly.
//! It backs the test suite and the demo binary.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::host::{Host, Measured, Rect, Size};

/// Handle to an element owned by a [`HeadlessHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// One recorded `set_style` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleWrite {
    pub node: NodeId,
    pub name: String,
    pub value: String,
    pub priority: String,
}

#[derive(Debug, Default)]
struct Node {
    id: String,
    selectors: Vec<String>,
    computed: HashMap<String, String>,
    size: Size,
    bounds: Option<Rect>,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    nodes: RefCell<Vec<Node>>,
    writes: RefCell<Vec<StyleWrite>>,
    document: Cell<Size>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose document measures `size`.
    pub fn with_document(size: Size) -> Self {
        let host = Self::default();
        host.document.set(size);
        host
    }

    /// Add an element resolvable as `id` or `#id`.
    pub fn add_element(&self, id: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            id: id.to_string(),
            ..Node::default()
        });
        NodeId(nodes.len() - 1)
    }

    /// Make `node` resolvable through an additional selector (e.g. `.card`).
    pub fn add_selector(&self, node: NodeId, selector: &str) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node.0) {
            n.selectors.push(selector.to_string());
        }
    }

    pub fn set_computed(&self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node.0) {
            n.computed.insert(property.to_string(), value.to_string());
        }
    }

    pub fn set_size(&self, node: NodeId, size: Size) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node.0) {
            n.size = size;
        }
    }

    pub fn set_bounds(&self, node: NodeId, bounds: Rect) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(node.0) {
            n.bounds = Some(bounds);
        }
    }

    /// Last value written to `name` on `node`, if any.
    pub fn style_of(&self, node: NodeId, name: &str) -> Option<String> {
        self.writes
            .borrow()
            .iter()
            .rev()
            .find(|w| w.node == node && w.name == name)
            .map(|w| w.value.clone())
    }

    /// Every style write so far, oldest first.
    pub fn applied(&self) -> Vec<StyleWrite> {
        self.writes.borrow().clone()
    }

    pub fn clear_applied(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl Host for HeadlessHost {
    type Element = NodeId;

    fn resolve(&self, selector: &str) -> Option<NodeId> {
        let by_id = selector.strip_prefix('#').unwrap_or(selector);
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .position(|n| n.id == by_id)
            .or_else(|| nodes.iter().position(|n| n.selectors.iter().any(|s| s == selector)))
            .map(NodeId)
    }

    fn computed_style(&self, element: &NodeId, property: &str) -> String {
        self.nodes
            .borrow()
            .get(element.0)
            .and_then(|n| n.computed.get(property).cloned())
            .unwrap_or_default()
    }

    fn set_style(&self, element: &NodeId, name: &str, value: &str, priority: &str) {
        trace!(node = element.0, name, value, "set_style");
        if let Some(n) = self.nodes.borrow_mut().get_mut(element.0) {
            n.computed.insert(name.to_string(), value.to_string());
        }
        self.writes.borrow_mut().push(StyleWrite {
            node: *element,
            name: name.to_string(),
            value: value.to_string(),
            priority: priority.to_string(),
        });
    }

    fn measure(&self, target: Measured<'_, NodeId>) -> Size {
        match target {
            Measured::Document => self.document.get(),
            Measured::Element(node) => self
                .nodes
                .borrow()
                .get(node.0)
                .map(|n| n.size)
                .unwrap_or_default(),
        }
    }

    fn bounds(&self, element: &NodeId) -> Option<Rect> {
        self.nodes.borrow().get(element.0).and_then(|n| n.bounds)
    }
}
