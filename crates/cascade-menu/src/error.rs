//! Error types for the menu crate.

use thiserror::Error;

/// Errors that can occur during menu tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// The node ID does not refer to a mounted node of this tree.
    #[error("unknown menu node")]
    UnknownNode,

    /// The item ID or index does not refer to a registered item.
    #[error("unknown menu item")]
    UnknownItem,

    /// A nested node cannot open while its parent is closed.
    #[error("parent node is closed")]
    ParentClosed,

    /// The operation only applies to nested nodes.
    #[error("node is not nested")]
    NotNested,
}

/// Result type for menu tree operations.
pub type MenuResult<T> = Result<T, MenuError>;
