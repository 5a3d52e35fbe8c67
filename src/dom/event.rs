//! DOM event passed to listeners.

use std::cell::{Cell, RefCell};
use std::fmt;

use super::DomNode;

/// A DOM event.
///
/// `target` is the node the event was dispatched on; `current_target` is the
/// node whose listener is currently running. Both are filled by
/// [`DomNode::dispatch`], or set up front when a test invokes a listener
/// directly.
pub struct Event {
    event_type: String,
    target: RefCell<Option<DomNode>>,
    current_target: RefCell<Option<DomNode>>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create an event of the given type (`"click"`, `"blur"`, ...).
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target: RefCell::new(None),
            current_target: RefCell::new(None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Create an event whose target and current target are `node`.
    pub fn with_current_target(event_type: impl Into<String>, node: &DomNode) -> Self {
        let event = Self::new(event_type);
        event.set_target(node);
        event.set_current_target(node);
        event
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn target(&self) -> Option<DomNode> {
        self.target.borrow().clone()
    }

    pub fn current_target(&self) -> Option<DomNode> {
        self.current_target.borrow().clone()
    }

    pub(crate) fn set_target(&self, node: &DomNode) {
        *self.target.borrow_mut() = Some(node.clone());
    }

    pub(crate) fn set_current_target(&self, node: &DomNode) {
        *self.current_target.borrow_mut() = Some(node.clone());
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop bubbling after the current listener returns.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("current_target", &self.current_target.borrow())
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}
