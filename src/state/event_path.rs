//! Event Path Resolver - map a DOM node back to the VNode that owns it.
//!
//! The DOM is patched in place, so a DOM node can outlive the VNode that
//! created it and be adopted by a newer one. Instead of trusting whatever a
//! listener captured, resolution walks the node's ancestor chain up to the
//! projection root and then follows the same chain down the latest rendered
//! VNode tree.
//!
//! # API
//!
//! - `parent_node_path(node, root)` - ancestors from `node` up to `root` (excluded)
//! - `find_vnode_by_path(vnode, path)` - follow a root-to-target path down a VNode tree
//! - `resolve_vnode(vnode, root, node)` - both steps

use crate::dom::DomNode;
use crate::vdom::VNode;

/// Nodes from `node` up to, but excluding, `root`, in target-to-root order.
///
/// Returns `None` when the walk reaches the top of the document without
/// meeting `root`. An empty path means `node` is the root itself.
pub fn parent_node_path(node: &DomNode, root: &DomNode) -> Option<Vec<DomNode>> {
    let mut path = Vec::new();
    let mut current = node.clone();
    while !current.ptr_eq(root) {
        let parent = current.parent()?;
        path.push(current);
        current = parent;
    }
    Some(path)
}

/// Follow `path` (root-to-target order) down from `vnode`.
///
/// At each step the child whose DOM node is the next path element is
/// selected. Returns `None` as soon as a VNode has no children or no child
/// matches.
pub fn find_vnode_by_path<'a>(vnode: &'a VNode, path: &[DomNode]) -> Option<&'a VNode> {
    path.iter().try_fold(vnode, |current, node| {
        current
            .children()?
            .iter()
            .find(|child| child.dom_node() == Some(node))
    })
}

/// VNode in the tree rooted at `vnode` (rendered into `root`) that currently
/// owns `node`.
pub fn resolve_vnode<'a>(vnode: &'a VNode, root: &DomNode, node: &DomNode) -> Option<&'a VNode> {
    let mut path = parent_node_path(node, root)?;
    path.reverse();
    find_vnode_by_path(vnode, &path)
}

// =============================================================================
// Tests
// =============================================================================
