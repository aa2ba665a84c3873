//! Error types for document edits.

use crate::dom::NodeId;
use thiserror::Error;

/// Result type for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors that can occur while editing a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The id does not belong to this document.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// The node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// The edit would make a node its own ancestor, or give a text node
    /// children.
    #[error("hierarchy error: {0}")]
    Hierarchy(String),
}
