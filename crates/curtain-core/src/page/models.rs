use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle for a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Vertical extent of an element in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A single element in the page tree
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) id: Option<String>,
    pub(crate) classes: BTreeSet<String>,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) rect: Rect,
}

impl Element {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// Declarative element description (page files, insertion commands)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub children: Vec<ElementDef>,
}

impl ElementDef {
    pub(crate) fn to_element(&self) -> Element {
        Element {
            id: self.id.clone(),
            classes: self.classes.iter().cloned().collect(),
            attrs: self.attrs.clone(),
            rect: Rect::new(self.top, self.height),
        }
    }
}

/// Declarative page description (the markup contract)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDef {
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default, rename = "element")]
    pub elements: Vec<ElementDef>,
}

fn default_viewport_height() -> f64 {
    800.0
}
