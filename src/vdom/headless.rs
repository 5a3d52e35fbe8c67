//! Headless collaborator - materializes and patches VNodes in the in-memory DOM.
//!
//! This is the reference [`Dom`] implementation used by native hosts and the
//! test suite. Patching is positional:
//!
//! 1. Same selector at the same child index: reuse the DOM node, reconcile
//!    attributes, styles, listeners, then recurse into children
//! 2. Different selector: create a new DOM node and swap it in
//! 3. Surplus new children are appended, surplus old children removed
//!
//! Listener reconciliation respects the interception contract: with an
//! interceptor the listener installed at creation stays (it resolves the
//! current handler per event); without one the listener is swapped when the
//! declared handler changes.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::{Dom, Projection, VNode, VNodeProperties};
use crate::dom::{DomNode, Event};
use crate::error::{DomError, RenderError};
use crate::options::ProjectionOptions;
use crate::types::{EventHandler, Listener, ProjectionHandle};

// =============================================================================
// HeadlessDom
// =============================================================================

/// [`Dom`] implementation over [`DomNode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDom;

impl HeadlessDom {
    pub fn new() -> Self {
        Self
    }
}

impl Dom for HeadlessDom {
    fn append(
        &self,
        parent: &DomNode,
        mut vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError> {
        let options = options.clone();
        let node = create_dom(&mut vnode, &options, options.namespace.as_deref())?;
        parent.append_child(&node)?;
        Ok(HeadlessProjection::new(node, vnode, options))
    }

    fn insert_before(
        &self,
        before: &DomNode,
        mut vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError> {
        let parent = before.parent().ok_or(DomError::NoParent)?;
        let options = options.clone();
        let node = create_dom(&mut vnode, &options, options.namespace.as_deref())?;
        parent.insert_before(&node, Some(before))?;
        Ok(HeadlessProjection::new(node, vnode, options))
    }

    fn merge(
        &self,
        element: &DomNode,
        mut vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError> {
        let options = options.clone();
        vnode.set_dom_node(element.clone());
        init_properties(element, vnode.properties(), &options);
        let namespace = element.namespace().or_else(|| options.namespace.clone());
        if let Some(children) = vnode.children_mut() {
            for child in children {
                let child_node = create_dom(child, &options, namespace.as_deref())?;
                element.append_child(&child_node)?;
            }
        }
        Ok(HeadlessProjection::new(element.clone(), vnode, options))
    }

    fn replace(
        &self,
        element: &DomNode,
        mut vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError> {
        let parent = element.parent().ok_or(DomError::NoParent)?;
        let options = options.clone();
        let node = create_dom(&mut vnode, &options, options.namespace.as_deref())?;
        parent.replace_child(&node, element)?;
        Ok(HeadlessProjection::new(node, vnode, options))
    }
}

// =============================================================================
// HeadlessProjection
// =============================================================================

/// Projection produced by [`HeadlessDom`].
pub struct HeadlessProjection {
    dom_node: DomNode,
    last_render: RefCell<Rc<VNode>>,
    options: ProjectionOptions,
}

impl HeadlessProjection {
    fn new(dom_node: DomNode, vnode: VNode, options: ProjectionOptions) -> ProjectionHandle {
        Rc::new(Self {
            dom_node,
            last_render: RefCell::new(Rc::new(vnode)),
            options,
        })
    }

    /// Options copied at creation.
    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }
}

impl Projection for HeadlessProjection {
    fn dom_node(&self) -> DomNode {
        self.dom_node.clone()
    }

    fn last_render(&self) -> Rc<VNode> {
        self.last_render.borrow().clone()
    }

    fn update(&self, mut vnode: VNode) -> Result<(), RenderError> {
        let previous = self.last_render();
        if previous.selector() != vnode.selector() {
            return Err(RenderError::RootSelectorChanged {
                from: previous.selector().to_string(),
                to: vnode.selector().to_string(),
            });
        }

        patch(&previous, &mut vnode, &self.options)?;
        *self.last_render.borrow_mut() = Rc::new(vnode);
        Ok(())
    }
}

// =============================================================================
// Creation
// =============================================================================

fn create_dom(
    vnode: &mut VNode,
    options: &ProjectionOptions,
    namespace: Option<&str>,
) -> Result<DomNode, DomError> {
    let node = match vnode.text_content() {
        Some(text) => DomNode::text(text),
        None => DomNode::element_ns(vnode.tag(), namespace),
    };
    vnode.set_dom_node(node.clone());

    if !node.is_text() {
        init_properties(&node, vnode.properties(), options);
        if let Some(children) = vnode.children_mut() {
            for child in children {
                let child_node = create_dom(child, options, namespace)?;
                node.append_child(&child_node)?;
            }
        }
    }

    Ok(node)
}

fn init_properties(node: &DomNode, properties: &VNodeProperties, options: &ProjectionOptions) {
    for (name, value) in properties.attributes() {
        node.set_attribute(name, value);
    }
    for (name, value) in properties.styles() {
        (options.style_applyer)(node, name, value);
    }
    for (property_name, handler) in properties.handlers() {
        install_listener(node, property_name, handler, properties, options);
    }
}

fn install_listener(
    node: &DomNode,
    property_name: &str,
    handler: &EventHandler,
    properties: &VNodeProperties,
    options: &ProjectionOptions,
) {
    let listener = match &options.event_handler_interceptor {
        Some(interceptor) => interceptor(property_name, handler, node, properties),
        None => direct_listener(handler),
    };
    node.set_listener(event_type(property_name), listener);
}

fn direct_listener(handler: &EventHandler) -> Listener {
    let handler = handler.clone();
    Rc::new(move |_node: &DomNode, event: &Event| handler(event))
}

fn event_type(property_name: &str) -> &str {
    property_name.strip_prefix("on").unwrap_or(property_name)
}

// =============================================================================
// Patching
// =============================================================================

fn patch(
    previous: &VNode,
    next: &mut VNode,
    options: &ProjectionOptions,
) -> Result<(), RenderError> {
    let node = previous
        .dom_node()
        .cloned()
        .ok_or_else(|| RenderError::NotRendered(previous.selector().to_string()))?;
    next.set_dom_node(node.clone());

    if let Some(text) = next.text_content() {
        if previous.text_content() != Some(text) {
            node.set_text_content(text);
        }
        return Ok(());
    }

    update_properties(&node, previous.properties(), next.properties(), options);
    update_children(&node, previous.children().unwrap_or_default(), next, options)
}

fn update_properties(
    node: &DomNode,
    previous: &VNodeProperties,
    next: &VNodeProperties,
    options: &ProjectionOptions,
) {
    for (name, value) in next.attributes() {
        if previous.attribute(name) != Some(value) {
            node.set_attribute(name, value);
        }
    }
    for (name, _) in previous.attributes() {
        if next.attribute(name).is_none() {
            node.remove_attribute(name);
        }
    }

    for (name, value) in next.styles() {
        if previous.style(name) != Some(value) {
            (options.style_applyer)(node, name, value);
        }
    }
    for (name, _) in previous.styles() {
        if next.style(name).is_none() {
            (options.style_applyer)(node, name, "");
        }
    }

    for (property_name, handler) in next.handlers() {
        match previous.handler(property_name) {
            Some(_) if options.event_handler_interceptor.is_some() => {}
            Some(old) if Rc::ptr_eq(old, handler) => {}
            _ => install_listener(node, property_name, handler, next, options),
        }
    }
    for (property_name, _) in previous.handlers() {
        if next.handler(property_name).is_none() {
            node.remove_listener(event_type(property_name));
        }
    }
}

fn update_children(
    parent: &DomNode,
    previous: &[VNode],
    next: &mut VNode,
    options: &ProjectionOptions,
) -> Result<(), RenderError> {
    let namespace = parent.namespace();
    let next_children = next.children_mut().unwrap_or_default();

    for (index, child) in next_children.iter_mut().enumerate() {
        match previous.get(index) {
            Some(old) if old.same_kind(child) => patch(old, child, options)?,
            Some(old) => {
                let replacement = create_dom(child, options, namespace.as_deref())?;
                let old_node = old
                    .dom_node()
                    .ok_or_else(|| RenderError::NotRendered(old.selector().to_string()))?;
                parent.replace_child(&replacement, old_node)?;
                trace!(from = old.selector(), to = child.selector(), "replaced child node");
            }
            None => {
                let created = create_dom(child, options, namespace.as_deref())?;
                parent.append_child(&created)?;
            }
        }
    }

    for old in previous.iter().skip(next_children.len()) {
        if let Some(old_node) = old.dom_node() {
            parent.remove_child(old_node)?;
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
