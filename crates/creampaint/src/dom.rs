//! Host document abstraction.
//!
//! The repaint loop never owns the page. It talks to whatever hosts it (a
//! browser binding, a headless renderer, the in-memory [`MemoryDocument`])
//! through the [`Document`] trait, which exposes only what the loop reads and
//! writes.
//!
//! [`MemoryDocument`]: crate::memory::MemoryDocument

use serde::{Deserialize, Serialize};

/// Stable handle of a node for the lifetime of the page.
///
/// Handles are never reused by a conforming host, so they can key side-tables
/// such as [`ProcessedSet`](crate::processed::ProcessedSet) without keeping the
/// node alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Rendered border box size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is below `min`.
    pub fn is_smaller_than(&self, min: f64) -> bool {
        self.width < min || self.height < min
    }
}

/// The page as seen by the repaint loop.
pub trait Document {
    /// The root element (`<html>`), if the document has one.
    fn document_element(&self) -> Option<NodeId>;

    /// The `<body>` element, if present.
    fn body(&self) -> Option<NodeId>;

    /// Whether `node` is an element (as opposed to text, comments, ...).
    fn is_element(&self, node: NodeId) -> bool;

    /// Tag name of an element, in whatever case the host reports it.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Element descendants of `node` in document order, excluding `node` itself.
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    /// Resolved (post-cascade) value of a CSS property, empty if unknown.
    fn computed_value(&self, node: NodeId, property: &str) -> String;

    /// Rendered box of an element.
    fn bounding_box(&self, node: NodeId) -> Rect;

    /// Writes an inline declaration that wins over author rules
    /// (`!important` priority).
    fn set_important(&mut self, node: NodeId, property: &str, value: &str);
}

/// One entry of a host's mutation feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MutationRecord {
    /// Nodes were inserted or removed under `target`.
    ChildList {
        target: NodeId,
        #[serde(default)]
        added: Vec<NodeId>,
        #[serde(default)]
        removed: Vec<NodeId>,
    },
    /// An observed attribute (`class`, `style`) changed on `target`.
    Attributes { target: NodeId, attribute: String },
}

impl MutationRecord {
    /// Convenience for a record that only adds nodes.
    pub fn added(target: NodeId, added: Vec<NodeId>) -> Self {
        MutationRecord::ChildList {
            target,
            added,
            removed: Vec::new(),
        }
    }

    /// Convenience for a record that only removes nodes.
    pub fn removed(target: NodeId, removed: Vec<NodeId>) -> Self {
        MutationRecord::ChildList {
            target,
            added: Vec::new(),
            removed,
        }
    }
}
