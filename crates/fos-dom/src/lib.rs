//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree with document fragments, shadow roots and
//! selector queries.

mod node;
mod tree;
mod document;
mod shadow;
mod selector;
mod dataset;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Descendants};
pub use document::Document;
pub use shadow::{ShadowRootData, ShadowRootMode};
pub use selector::{Selector, SelectorError};
pub use dataset::to_camel_case;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Arena index
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
    /// Node not found
    #[error("node {0:?} does not exist")]
    NotFound(NodeId),

    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,

    /// Operation requires a different kind of node
    #[error("invalid node type for this operation")]
    InvalidNodeType,

    /// Host already carries a shadow root
    #[error("element already hosts a shadow root")]
    ShadowRootExists,
}
