//! Collaborator boundary.
//!
//! The projector never diffs or creates DOM itself. It hands VNodes to a
//! [`Dom`] implementation, gets back a [`Projection`], and from then on only
//! talks to the projection through [`Projection::update`].

use std::rc::Rc;

use super::VNode;
use crate::dom::DomNode;
use crate::error::{DomError, RenderError};
use crate::options::ProjectionOptions;
use crate::types::ProjectionHandle;

/// A live DOM subtree produced from a VNode.
pub trait Projection {
    /// Root DOM node of the projection.
    fn dom_node(&self) -> DomNode;

    /// Tree most recently rendered into the DOM.
    ///
    /// Each render stores a new snapshot; holders of an older `Rc` keep
    /// seeing the tree they were handed.
    fn last_render(&self) -> Rc<VNode>;

    /// Patch the DOM to match `vnode`. The root selector must not change.
    fn update(&self, vnode: VNode) -> Result<(), RenderError>;
}

/// Materializes VNodes into the host DOM.
///
/// Implementations copy `options` when the projection is created; later
/// changes to the caller's options do not reach existing projections.
pub trait Dom {
    /// Render `vnode` as the last child of `parent`.
    fn append(
        &self,
        parent: &DomNode,
        vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError>;

    /// Render `vnode` as the previous sibling of `before`.
    fn insert_before(
        &self,
        before: &DomNode,
        vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError>;

    /// Use `element` as the root DOM node of `vnode`, rendering its children
    /// into it.
    fn merge(
        &self,
        element: &DomNode,
        vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError>;

    /// Render `vnode` in place of `element`, which is removed from its parent.
    fn replace(
        &self,
        element: &DomNode,
        vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError>;
}
