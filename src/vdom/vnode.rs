//! Virtual nodes.
//!
//! A [`VNode`] describes one element or text node and its subtree. Render
//! functions build fresh trees with [`h`]; the collaborator records on each
//! VNode the DOM node it materialized or patched (`dom_node`), which is what
//! event resolution walks later.
//!
//! # Example
//!
//! ```ignore
//! use spark_projector::vdom::h;
//!
//! let tree = h("div.counter")
//!     .child(h("span").text_child("Clicks: 3"))
//!     .child(h("button#inc").on("click", |_event| {
//!         // bump application state
//!     }));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::{DomNode, Event};
use crate::types::EventHandler;

const TEXT_SELECTOR: &str = "#text";

// =============================================================================
// Handler Results
// =============================================================================

/// Conversion of a handler's return value into the DOM listener result.
///
/// `()` means "no opinion", `false` suppresses the default action.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> Option<bool>;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> Option<bool> {
        None
    }
}

impl IntoHandlerResult for bool {
    fn into_handler_result(self) -> Option<bool> {
        Some(self)
    }
}

impl IntoHandlerResult for Option<bool> {
    fn into_handler_result(self) -> Option<bool> {
        self
    }
}

/// Wrap a closure as an [`EventHandler`].
pub fn handler<F, R>(f: F) -> EventHandler
where
    F: Fn(&Event) -> R + 'static,
    R: IntoHandlerResult,
{
    Rc::new(move |event: &Event| f(event).into_handler_result())
}

// =============================================================================
// Properties
// =============================================================================

/// Attributes, inline styles and event handlers declared on a VNode.
///
/// Handlers are keyed by property name (`"onclick"`).
#[derive(Clone, Default)]
pub struct VNodeProperties {
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    handlers: BTreeMap<String, EventHandler>,
}

impl VNodeProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_style(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_string(), value.to_string());
    }

    /// Handler declared under a property name (`"onclick"`).
    pub fn handler(&self, property_name: &str) -> Option<&EventHandler> {
        self.handlers.get(property_name)
    }

    /// Handler declared for an event type (`"click"` looks up `"onclick"`).
    pub fn handler_for(&self, event_type: &str) -> Option<&EventHandler> {
        self.handlers.get(&format!("on{event_type}"))
    }

    pub fn handlers(&self) -> impl Iterator<Item = (&str, &EventHandler)> {
        self.handlers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn set_handler(&mut self, property_name: &str, handler: EventHandler) {
        self.handlers.insert(property_name.to_string(), handler);
    }
}

impl fmt::Debug for VNodeProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNodeProperties")
            .field("attributes", &self.attributes)
            .field("styles", &self.styles)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// VNode
// =============================================================================

/// Description of one DOM element or text node and its subtree.
#[derive(Clone)]
pub struct VNode {
    selector: String,
    text: Option<String>,
    properties: VNodeProperties,
    children: Option<Vec<VNode>>,
    dom_node: Option<DomNode>,
}

/// Build an element VNode from a selector: `tag`, optionally followed by
/// `#id` and `.class` parts (`"button#save.primary"`).
pub fn h(selector: &str) -> VNode {
    VNode::element(selector)
}

impl VNode {
    /// Element VNode. `#id` and `.class` parts of the selector become attributes.
    pub fn element(selector: &str) -> Self {
        let mut properties = VNodeProperties::new();
        let (_, id, classes) = parse_selector(selector);
        if let Some(id) = id {
            properties.set_attribute("id", id);
        }
        if !classes.is_empty() {
            properties.set_attribute("class", &classes.join(" "));
        }

        Self {
            selector: selector.to_string(),
            text: None,
            properties,
            children: None,
            dom_node: None,
        }
    }

    /// Text VNode.
    pub fn text(content: &str) -> Self {
        Self {
            selector: TEXT_SELECTOR.to_string(),
            text: Some(content.to_string()),
            properties: VNodeProperties::new(),
            children: None,
            dom_node: None,
        }
    }

    // -------------------------------------------------------------------------
    // Builder
    // -------------------------------------------------------------------------

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.properties.set_attribute(name, value);
        self
    }

    pub fn style(mut self, name: &str, value: &str) -> Self {
        self.properties.set_style(name, value);
        self
    }

    /// Declare a handler for an event type.
    pub fn on<F, R>(self, event_type: &str, f: F) -> Self
    where
        F: Fn(&Event) -> R + 'static,
        R: IntoHandlerResult,
    {
        self.on_handler(event_type, handler(f))
    }

    /// Declare an already shared handler for an event type.
    pub fn on_handler(mut self, event_type: &str, handler: EventHandler) -> Self {
        self.properties.set_handler(&format!("on{event_type}"), handler);
        self
    }

    pub fn child(mut self, child: VNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Set the children list. An empty iterator still yields `Some(&[])`.
    pub fn children_from(mut self, children: impl IntoIterator<Item = VNode>) -> Self {
        self.children
            .get_or_insert_with(Vec::new)
            .extend(children);
        self
    }

    pub fn text_child(self, content: &str) -> Self {
        self.child(VNode::text(content))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Tag name part of the selector.
    pub fn tag(&self) -> &str {
        parse_selector(&self.selector).0
    }

    pub fn is_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn properties(&self) -> &VNodeProperties {
        &self.properties
    }

    pub fn children(&self) -> Option<&[VNode]> {
        self.children.as_deref()
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut [VNode]> {
        self.children.as_deref_mut()
    }

    /// DOM node this VNode was materialized into, once rendered.
    pub fn dom_node(&self) -> Option<&DomNode> {
        self.dom_node.as_ref()
    }

    pub(crate) fn set_dom_node(&mut self, node: DomNode) {
        self.dom_node = Some(node);
    }

    /// Whether `other` can be patched in place of `self`.
    pub(crate) fn same_kind(&self, other: &VNode) -> bool {
        self.selector == other.selector && self.is_text() == other.is_text()
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("VNode");
        s.field("selector", &self.selector);
        if let Some(text) = &self.text {
            s.field("text", text);
        }
        s.field("properties", &self.properties)
            .field("children", &self.children)
            .field("rendered", &self.dom_node.is_some())
            .finish()
    }
}

/// Split a selector into tag, id and classes.
fn parse_selector(selector: &str) -> (&str, Option<&str>, Vec<&str>) {
    if selector == TEXT_SELECTOR {
        return (selector, None, Vec::new());
    }

    let tag_end = selector.find(['#', '.']).unwrap_or(selector.len());
    let tag = &selector[..tag_end];
    let mut id = None;
    let mut classes = Vec::new();

    let mut rest = &selector[tag_end..];
    while let Some(marker) = rest.chars().next() {
        let body = &rest[1..];
        let end = body.find(['#', '.']).unwrap_or(body.len());
        let part = &body[..end];
        if marker == '#' {
            id = Some(part);
        } else if !part.is_empty() {
            classes.push(part);
        }
        rest = &body[end..];
    }

    (tag, id, classes)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_selector_parsing() {
        let node = h("textarea#t1.wide.dark");
        assert_eq!(node.tag(), "textarea");
        assert_eq!(node.properties().attribute("id"), Some("t1"));
        assert_eq!(node.properties().attribute("class"), Some("wide dark"));

        let plain = h("div");
        assert_eq!(plain.tag(), "div");
        assert_eq!(plain.properties().attribute("id"), None);
    }

    #[test]
    fn test_children_absent_until_added() {
        assert!(h("div").children().is_none());
        assert_eq!(h("div").children_from(Vec::new()).children().map(<[VNode]>::len), Some(0));
        let node = h("div").child(h("span")).text_child("x");
        assert_eq!(node.children().map(<[VNode]>::len), Some(2));
    }

    #[test]
    fn test_handler_keyed_by_property_name() {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let node = h("button").on("click", move |_| counter.set(counter.get() + 1));

        let handler = node.properties().handler("onclick").cloned().unwrap();
        assert!(node.properties().handler_for("click").is_some());
        assert!(node.properties().handler_for("blur").is_none());

        assert_eq!(handler(&Event::new("click")), None);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_handler_results() {
        let deny = handler(|_| false);
        let maybe = handler(|_| Some(true));
        assert_eq!(deny(&Event::new("submit")), Some(false));
        assert_eq!(maybe(&Event::new("submit")), Some(true));
    }

    #[test]
    fn test_text_node_kind() {
        let text = VNode::text("hello");
        assert!(text.is_text());
        assert_eq!(text.text_content(), Some("hello"));
        assert!(!text.same_kind(&h("span")));
        assert!(text.same_kind(&VNode::text("bye")));
    }
}
