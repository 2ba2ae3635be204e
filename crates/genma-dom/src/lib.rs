//! Genma DOM - Document Object Model
//!
//! Arena-allocated DOM tree with the element primitives the node-set
//! wrapper needs: content, attributes, class list, dataset, live
//! properties and event listeners.

mod interner;
mod node;
mod tree;
mod document;
pub mod classlist;
pub mod dataset;
pub mod events;
pub mod properties;

pub use interner::{InternedString, StringInterner};
pub use node::{Node, NodeData, ElementData, ControlState, Attribute, TextData};
pub use tree::DomTree;
pub use document::Document;
pub use classlist::DOMTokenList;
pub use events::{Event, EventListener, ListenerRegistry, dispatch};
pub use properties::PropValue;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);
    /// No node
    pub const NONE: NodeId = NodeId(u32::MAX);
    /// The window event target. It has no node in the tree.
    pub const WINDOW: NodeId = NodeId(u32::MAX - 1);

    /// Whether this refers to a tree slot (not `NONE` or `WINDOW`)
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 < Self::WINDOW.0
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node not found: {0:?}")]
    NotFound(NodeId),

    #[error("Hierarchy request error: cannot insert {child:?} into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Unknown property '{name}' on <{tag}>")]
    UnknownProperty { tag: String, name: String },

    #[error("Property '{name}' is read-only")]
    ReadOnlyProperty { name: String },
}
