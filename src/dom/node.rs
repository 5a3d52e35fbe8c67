//! DOM node - element or text, with identity semantics.
//!
//! A `DomNode` is a cheap handle. Clones refer to the same node and compare
//! equal; two separately created nodes never do. Children are owned by their
//! parent, parents are referenced weakly.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::event::Event;
use super::style::CssStyle;
use crate::error::DomError;
use crate::types::Listener;

// =============================================================================
// Node Data
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element { tag: String, namespace: Option<String> },
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<DomNode>,
    attributes: BTreeMap<String, String>,
    style: CssStyle,
    listeners: BTreeMap<String, Listener>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: Weak::new(),
            children: Vec::new(),
            attributes: BTreeMap::new(),
            style: CssStyle::new(),
            listeners: BTreeMap::new(),
        }
    }
}

// =============================================================================
// DomNode
// =============================================================================

/// Handle to a node of the host document.
#[derive(Clone)]
pub struct DomNode(Rc<RefCell<NodeData>>);

impl DomNode {
    /// Create a detached element.
    pub fn element(tag: &str) -> Self {
        Self::element_ns(tag, None)
    }

    /// Create a detached element in a namespace.
    pub fn element_ns(tag: &str, namespace: Option<&str>) -> Self {
        Self(Rc::new(RefCell::new(NodeData::new(NodeKind::Element {
            tag: tag.to_string(),
            namespace: namespace.map(str::to_string),
        }))))
    }

    /// Create a detached text node.
    pub fn text(content: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData::new(NodeKind::Text(content.to_string())))))
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &DomNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // -------------------------------------------------------------------------
    // Kind
    // -------------------------------------------------------------------------

    /// Tag name, `None` for text nodes.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn namespace(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { namespace, .. } => namespace.clone(),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    /// Text of a text node, `None` for elements.
    pub fn text_content(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Text(content) => Some(content.clone()),
            NodeKind::Element { .. } => None,
        }
    }

    /// Replace the content of a text node. No-op on elements.
    pub fn set_text_content(&self, content: &str) {
        if let NodeKind::Text(current) = &mut self.0.borrow_mut().kind {
            *current = content.to_string();
        }
    }

    // -------------------------------------------------------------------------
    // Tree
    // -------------------------------------------------------------------------

    pub fn parent(&self) -> Option<DomNode> {
        self.0.borrow().parent.upgrade().map(DomNode)
    }

    pub fn children(&self) -> Vec<DomNode> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    pub fn first_child(&self) -> Option<DomNode> {
        self.0.borrow().children.first().cloned()
    }

    /// Append `child`, moving it out of its current parent first.
    pub fn append_child(&self, child: &DomNode) -> Result<(), DomError> {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference`, or at the end when `reference` is `None`.
    ///
    /// Inserting a node before itself leaves it in place.
    pub fn insert_before(
        &self,
        child: &DomNode,
        reference: Option<&DomNode>,
    ) -> Result<(), DomError> {
        if self.is_text() {
            return Err(DomError::TextNodeChildren);
        }
        if child.contains(self) {
            return Err(DomError::HierarchyRequest);
        }
        if let Some(reference) = reference {
            if !self.has_child(reference) {
                return Err(DomError::NotAChild);
            }
            if reference.ptr_eq(child) {
                return Ok(());
            }
        }

        child.detach();

        let mut data = self.0.borrow_mut();
        let index = match reference {
            Some(reference) => data
                .children
                .iter()
                .position(|c| c.ptr_eq(reference))
                .ok_or(DomError::NotAChild)?,
            None => data.children.len(),
        };
        data.children.insert(index, child.clone());
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        Ok(())
    }

    /// Remove `child` from this node.
    pub fn remove_child(&self, child: &DomNode) -> Result<(), DomError> {
        let mut data = self.0.borrow_mut();
        let index = data
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
            .ok_or(DomError::NotAChild)?;
        data.children.remove(index);
        child.0.borrow_mut().parent = Weak::new();
        Ok(())
    }

    /// Put `new_child` where `old_child` is and detach `old_child`.
    pub fn replace_child(&self, new_child: &DomNode, old_child: &DomNode) -> Result<(), DomError> {
        self.insert_before(new_child, Some(old_child))?;
        if new_child.ptr_eq(old_child) {
            return Ok(());
        }
        self.remove_child(old_child)
    }

    /// Remove this node from its parent, if it has one.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            let _ = parent.remove_child(self);
        }
    }

    /// Whether `node` is this node or one of its descendants.
    pub fn contains(&self, node: &DomNode) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if candidate.ptr_eq(self) {
                return true;
            }
            current = candidate.parent();
        }
        false
    }

    fn has_child(&self, node: &DomNode) -> bool {
        self.0.borrow().children.iter().any(|c| c.ptr_eq(node))
    }

    // -------------------------------------------------------------------------
    // Attributes & Style
    // -------------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    /// Shorthand for the `id` attribute.
    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    pub fn style(&self) -> Ref<'_, CssStyle> {
        Ref::map(self.0.borrow(), |data| &data.style)
    }

    pub fn style_mut(&self) -> RefMut<'_, CssStyle> {
        RefMut::map(self.0.borrow_mut(), |data| &mut data.style)
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Install the listener for an event type, replacing any previous one
    /// (`node.onclick = listener`).
    pub fn set_listener(&self, event_type: &str, listener: Listener) {
        self.0
            .borrow_mut()
            .listeners
            .insert(event_type.to_string(), listener);
    }

    pub fn remove_listener(&self, event_type: &str) {
        self.0.borrow_mut().listeners.remove(event_type);
    }

    pub fn listener(&self, event_type: &str) -> Option<Listener> {
        self.0.borrow().listeners.get(event_type).cloned()
    }

    pub fn has_listener(&self, event_type: &str) -> bool {
        self.0.borrow().listeners.contains_key(event_type)
    }

    /// Invoke this node's own listener for the event, as the browser does when
    /// it calls `node.onclick(event)`. Returns the listener's result.
    pub fn invoke_listener(&self, event: &Event) -> Option<bool> {
        let listener = self.listener(event.event_type())?;
        event.set_current_target(self);
        let result = listener(self, event);
        if result == Some(false) {
            event.prevent_default();
        }
        result
    }

    /// Dispatch an event at this node and bubble it through the ancestors.
    ///
    /// Returns `false` if any listener prevented the default action.
    pub fn dispatch(&self, event: &Event) -> bool {
        event.set_target(self);

        let mut current = Some(self.clone());
        while let Some(node) = current {
            node.invoke_listener(event);
            if event.propagation_stopped() {
                break;
            }
            current = node.parent();
        }

        !event.default_prevented()
    }
}

impl PartialEq for DomNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DomNode {}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Element { tag, .. } => f
                .debug_struct("DomNode")
                .field("tag", tag)
                .field("children", &data.children.len())
                .finish(),
            NodeKind::Text(content) => f.debug_tuple("DomNode::Text").field(content).finish(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_identity_equality() {
        let a = DomNode::element("div");
        let b = DomNode::element("div");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_append_moves_between_parents() {
        let first = DomNode::element("section");
        let second = DomNode::element("section");
        let child = DomNode::element("p");

        first.append_child(&child).unwrap();
        assert_eq!(child.parent(), Some(first.clone()));

        second.append_child(&child).unwrap();
        assert_eq!(first.child_count(), 0);
        assert_eq!(child.parent(), Some(second));
    }

    #[test]
    fn test_insert_before_and_replace() {
        let parent = DomNode::element("ul");
        let a = DomNode::element("li");
        let b = DomNode::element("li");
        let c = DomNode::element("li");

        parent.append_child(&a).unwrap();
        parent.insert_before(&b, Some(&a)).unwrap();
        assert_eq!(parent.children(), vec![b.clone(), a.clone()]);

        parent.replace_child(&c, &b).unwrap();
        assert_eq!(parent.children(), vec![c, a]);
        assert_eq!(b.parent(), None);
    }

    #[test]
    fn test_insert_before_rejects_foreign_reference() {
        let parent = DomNode::element("div");
        let stranger = DomNode::element("span");
        let child = DomNode::element("b");
        assert_eq!(parent.insert_before(&child, Some(&stranger)), Err(DomError::NotAChild));
        assert_eq!(child.parent(), None);
    }

    #[test]
    fn test_append_self_or_ancestor_is_rejected() {
        let outer = DomNode::element("div");
        let inner = DomNode::element("section");
        outer.append_child(&inner).unwrap();

        assert_eq!(inner.append_child(&inner), Err(DomError::HierarchyRequest));
        assert_eq!(inner.append_child(&outer), Err(DomError::HierarchyRequest));
        assert_eq!(outer.children(), vec![inner.clone()]);
        assert_eq!(inner.child_count(), 0);
        assert_eq!(outer.parent(), None);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_insert_before_itself_keeps_node() {
        let parent = DomNode::element("ul");
        let a = DomNode::element("li");
        let b = DomNode::element("li");
        parent.append_child(&a).unwrap();
        parent.append_child(&b).unwrap();

        assert_eq!(parent.insert_before(&b, Some(&b)), Ok(()));
        assert_eq!(parent.replace_child(&a, &a), Ok(()));
        assert_eq!(parent.children(), vec![a.clone(), b.clone()]);
        assert_eq!(b.parent(), Some(parent));
    }

    #[test]
    fn test_text_nodes_reject_children() {
        let text = DomNode::text("hi");
        assert_eq!(text.append_child(&DomNode::element("b")), Err(DomError::TextNodeChildren));
    }

    #[test]
    fn test_dispatch_bubbles_with_current_target() {
        let outer = DomNode::element("div");
        let inner = DomNode::element("button");
        outer.append_child(&inner).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        for node in [&outer, &inner] {
            let seen = seen.clone();
            node.set_listener(
                "click",
                Rc::new(move |this: &DomNode, event: &Event| {
                    assert_eq!(event.current_target().as_ref(), Some(this));
                    seen.borrow_mut().push(this.tag().unwrap_or_default());
                    None
                }),
            );
        }

        let event = Event::new("click");
        assert!(inner.dispatch(&event));
        assert_eq!(*seen.borrow(), vec!["button".to_string(), "div".to_string()]);
        assert_eq!(event.target(), Some(inner));
    }

    #[test]
    fn test_listener_returning_false_prevents_default() {
        let link = DomNode::element("a");
        link.set_listener("click", Rc::new(|_: &DomNode, _: &Event| Some(false)));

        let event = Event::new("click");
        assert!(!link.dispatch(&event));
        assert!(event.default_prevented());
    }
}
