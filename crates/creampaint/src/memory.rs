//! In-memory document.
//!
//! [`MemoryDocument`] is a small arena-backed tree that implements
//! [`Document`]. It stands in for a browser: resolved style values and boxes
//! are supplied up front (by code or from a [`PageSnapshot`] file) and every
//! forced write is recorded, so a whole repaint session can run headless.
//!
//! The cascade is reduced to one rule: a property written with forced
//! priority resolves to the written value; anything else resolves to the value
//! stored with [`MemoryDocument::set_computed`].
//!
//! # Snapshots
//!
//! ```yaml
//! tag: html
//! style:
//!   background-color: rgb(255, 255, 255)
//! children:
//!   - tag: body
//!     width: 1280
//!     height: 2000
//!     style:
//!       color: rgb(33, 33, 33)
//!     children:
//!       - text: "hello"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dom::{Document, NodeId, Rect};
use crate::error::SnapshotError;

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Element { tag: String },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq)]
struct InlineDeclaration {
    value: String,
    important: bool,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    computed: HashMap<String, String>,
    inline: BTreeMap<String, InlineDeclaration>,
    rect: Rect,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            computed: HashMap::new(),
            inline: BTreeMap::new(),
            rect: Rect::default(),
        }
    }
}

/// One forced-priority write, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleWrite {
    pub node: NodeId,
    pub tag: String,
    pub property: String,
    pub value: String,
}

/// An arena-backed document tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    writes: Vec<StyleWrite>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_string(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text {
            text: text.to_string(),
        })
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    pub fn set_document_element(&mut self, node: NodeId) {
        self.root = Some(node);
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    ///
    /// Returns `false` and leaves the tree untouched when `child` is `parent`
    /// itself or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.contains(child, parent) {
            tracing::warn!(
                parent = parent.0,
                child = child.0,
                "refusing append that would create a cycle"
            );
            return false;
        }
        self.detach(child);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child.0) {
            c.parent = Some(parent);
        }
        true
    }

    /// Whether `node` is `ancestor` or lies somewhere in its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Removes `node` from its parent. The node and its subtree stay in the
    /// arena, so their handles remain valid.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = None;
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Text { text } => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Sets the resolved value the page's own styles produce for `property`.
    pub fn set_computed(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.computed.insert(property.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.rect = rect;
        }
    }

    /// The inline declaration for `property`, if one was written.
    pub fn inline_value(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(node.0)?
            .inline
            .get(&property.to_ascii_lowercase())
            .map(|d| d.value.as_str())
    }

    /// Whether the inline declaration for `property` carries forced priority.
    pub fn is_important(&self, node: NodeId, property: &str) -> bool {
        self.nodes
            .get(node.0)
            .and_then(|n| n.inline.get(&property.to_ascii_lowercase()))
            .is_some_and(|d| d.important)
    }

    /// Every forced write, oldest first.
    pub fn writes(&self) -> &[StyleWrite] {
        &self.writes
    }

    pub fn take_writes(&mut self) -> Vec<StyleWrite> {
        std::mem::take(&mut self.writes)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds a document from a snapshot tree; the snapshot root becomes the
    /// document element.
    pub fn from_snapshot(snapshot: &PageSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.root.tag.is_none() {
            return Err(SnapshotError::TextRoot);
        }
        let mut doc = Self::new();
        let root = doc.insert_snapshot(&snapshot.root);
        doc.set_document_element(root);
        Ok(doc)
    }

    fn insert_snapshot(&mut self, node: &NodeSnapshot) -> NodeId {
        let id = match &node.tag {
            Some(tag) => self.create_element(tag),
            None => self.create_text(node.text.as_deref().unwrap_or_default()),
        };
        for (property, value) in &node.style {
            self.set_computed(id, property, value);
        }
        self.set_rect(id, Rect::new(node.width, node.height));
        for child in &node.children {
            let child_id = self.insert_snapshot(child);
            self.append_child(id, child_id);
        }
        id
    }

    fn element_tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }
}

impl Document for MemoryDocument {
    fn document_element(&self) -> Option<NodeId> {
        self.root
    }

    fn body(&self) -> Option<NodeId> {
        let root = self.root?;
        self.children(root)
            .iter()
            .copied()
            .find(|c| self.element_tag(*c).is_some_and(|t| t.eq_ignore_ascii_case("body")))
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element_tag(node).is_some()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element_tag(node)
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.is_element(current) {
                out.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    fn computed_value(&self, node: NodeId, property: &str) -> String {
        let Some(n) = self.nodes.get(node.0) else {
            return String::new();
        };
        let property = property.to_ascii_lowercase();
        if let Some(decl) = n.inline.get(&property).filter(|d| d.important) {
            return decl.value.clone();
        }
        n.computed.get(&property).cloned().unwrap_or_default()
    }

    fn bounding_box(&self, node: NodeId) -> Rect {
        self.nodes.get(node.0).map(|n| n.rect).unwrap_or_default()
    }

    fn set_important(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(tag) = self.element_tag(node).map(str::to_string) else {
            return;
        };
        let property = property.to_ascii_lowercase();
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.inline.insert(
                property.clone(),
                InlineDeclaration {
                    value: value.to_string(),
                    important: true,
                },
            );
        }
        self.writes.push(StyleWrite {
            node,
            tag,
            property,
            value: value.to_string(),
        });
    }
}

/// A serialized page: a tree of nodes with resolved styles and boxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSnapshot {
    pub root: NodeSnapshot,
}

/// One node of a [`PageSnapshot`]. Nodes without a `tag` are text nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl PageSnapshot {
    pub fn from_yaml(yaml: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a snapshot file; `.json` is parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }
}
