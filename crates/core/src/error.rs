use thiserror::Error;

/// Errors raised by document tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node does not support the requested operation (e.g. structural
    /// changes on an attribute pseudo-node).
    #[error("operation '{0}' is not supported by this node")]
    NotSupported(&'static str),
    /// The insertion would produce an invalid tree (cycles, a document as child, ...).
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(String),
    /// A reference node is not a child of the node the operation was called on.
    #[error("the reference node is not a child of this node")]
    NotFound,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
