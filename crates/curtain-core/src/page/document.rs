//! In-memory page tree
//!
//! Stands in for the host document: a node tree with classes, attributes
//! and vertical geometry, plus a scrollable viewport. All queries run in
//! document order (depth-first, preorder).

use std::collections::HashMap;

use crate::error::{Error, Result};

use super::models::{Element, ElementDef, NodeId, PageDef, Rect};

struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    viewport_height: f64,
    scroll_y: f64,
}

impl Document {
    /// Create an empty document with only a root node
    pub fn new(viewport_height: f64) -> Self {
        let root = NodeId::new(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                element: Element {
                    id: None,
                    classes: Default::default(),
                    attrs: Default::default(),
                    rect: Rect::new(0.0, 0.0),
                },
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
            viewport_height,
            scroll_y: 0.0,
        }
    }

    /// Build a document from a declarative page description
    pub fn from_def(def: &PageDef) -> Result<Self> {
        if def.viewport_height <= 0.0 {
            return Err(Error::Page(format!(
                "viewport_height must be positive, got {}",
                def.viewport_height
            )));
        }
        let mut doc = Self::new(def.viewport_height);
        for element in &def.elements {
            doc.insert(doc.root, element)?;
        }
        Ok(doc)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(&id).map(|n| &n.element)
    }

    /// Insert a subtree under `parent`; returns the new ids in document order
    pub fn insert(&mut self, parent: NodeId, def: &ElementDef) -> Result<Vec<NodeId>> {
        if !self.nodes.contains_key(&parent) {
            return Err(Error::UnknownNode(parent.to_string()));
        }
        let mut inserted = Vec::new();
        self.insert_rec(parent, def, &mut inserted);
        Ok(inserted)
    }

    fn insert_rec(&mut self, parent: NodeId, def: &ElementDef, out: &mut Vec<NodeId>) {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                element: def.to_element(),
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        out.push(id);
        for child in &def.children {
            self.insert_rec(id, child, out);
        }
    }

    /// Detach a subtree; returns every removed id in document order
    pub fn detach(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if id == self.root {
            return Err(Error::Page("cannot detach the document root".to_string()));
        }
        let parent = self
            .nodes
            .get(&id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))?
            .parent;
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != id);
        }
        let removed = self.subtree(id);
        for r in &removed {
            self.nodes.remove(r);
        }
        Ok(removed)
    }

    /// Collect a subtree (root included) in document order
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            if let Some(node) = self.nodes.get(&n) {
                for child in node.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// First node carrying the given element id, in document order
    pub fn by_element_id(&self, element_id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|n| self.element(*n).and_then(Element::id) == Some(element_id))
    }

    /// All nodes carrying the given class, in document order
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// Descendants of `id` (excluding `id` itself) carrying the given class
    pub fn descendants_with_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        let mut subtree = self.subtree(id);
        if subtree.is_empty() {
            return subtree;
        }
        subtree.remove(0);
        subtree.retain(|n| self.has_class(*n, class));
        subtree
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Add a class; returns true if it was newly added
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get_mut(&id)
            .is_some_and(|n| n.element.classes.insert(class.to_string()))
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        self.nodes
            .get_mut(&id)
            .is_some_and(|n| n.element.classes.remove(class))
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(key))
    }

    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.element.attrs.insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, key: &str) {
        if let Some(n) = self.nodes.get_mut(&id) {
            n.element.attrs.remove(key);
        }
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.element(id).map(Element::rect)
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Set the scroll offset, clamped to the scrollable range
    pub fn set_scroll(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// Bottom of the lowest element, never negative
    pub fn content_height(&self) -> f64 {
        self.nodes
            .values()
            .map(|n| n.element.rect.bottom())
            .fold(0.0, f64::max)
    }

    pub fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    /// All nodes in document order, root excluded
    fn walk(&self) -> Vec<NodeId> {
        let mut subtree = self.subtree(self.root);
        subtree.remove(0);
        subtree
    }
}
