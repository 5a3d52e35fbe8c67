//! Error types.

use thiserror::Error;

/// Failure of the host DOM while materializing a projection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The anchor must have a parent for `insert_before` and `replace`.
    #[error("node has no parent node")]
    NoParent,
    /// The reference node is not a child of the node being modified.
    #[error("node is not a child of this node")]
    NotAChild,
    /// Text nodes cannot hold children.
    #[error("text nodes cannot have children")]
    TextNodeChildren,
    /// The new child is the node itself or one of its ancestors.
    #[error("the new child contains the parent node")]
    HierarchyRequest,
}

/// Failure while producing or patching a VNode tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A render function reported a failure.
    #[error("render failed: {0}")]
    Failed(String),
    /// The root VNode of a projection must keep its selector.
    #[error("the selector for the root VNode may not be changed ({from} -> {to})")]
    RootSelectorChanged { from: String, to: String },
    /// A VNode was patched against a predecessor that was never rendered.
    #[error("previous VNode `{0}` has no DOM node")]
    NotRendered(String),
    /// The host DOM rejected a structural change.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl From<String> for RenderError {
    fn from(message: String) -> Self {
        Self::Failed(message)
    }
}

impl From<&str> for RenderError {
    fn from(message: &str) -> Self {
        Self::Failed(message.to_string())
    }
}

/// Errors surfaced by the projector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectorError {
    /// `detach` was called with a render function that is not registered.
    #[error("renderFunction was not found")]
    RenderFunctionNotFound,
    /// A render function or projection update failed during a render pass.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Attaching a projection failed in the host DOM.
    #[error(transparent)]
    Dom(#[from] DomError),
}
