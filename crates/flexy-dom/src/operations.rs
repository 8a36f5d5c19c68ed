//! DOM Node Operations errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error: {child} cannot be inserted under {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Invalid node type for the operation
    #[error("node {0} is not an element")]
    InvalidNodeType(NodeId),
    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}
