//! Event interception shim.
//!
//! During an attach's first render the projector installs an interceptor on
//! the projection options. The collaborator calls it once per declared
//! handler and installs the returned listener instead of the handler itself.
//! The listener never calls the handler it was created for: on every event it
//! resolves the VNode that currently owns the DOM node (see
//! [`super::event_path`]) and hands that VNode to the projector's
//! `handle_intercepted_event`.
//!
//! The listener reaches the projection through a [`ProjectionSlot`] filled
//! after the collaborator returns, so it always reads the projection's latest
//! render rather than the first one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::event_path::resolve_vnode;
use crate::dom::{DomNode, Event};
use crate::projector::{Projector, ProjectorInner};
use crate::types::{
    EventHandler, EventHandlerInterceptor, InterceptedEventHandler, Listener, PerformanceEvent,
    PerformanceLogger,
};
use crate::vdom::{Projection, VNodeProperties};

/// Late-bound reference to the projection an interceptor belongs to.
#[derive(Clone, Default)]
pub(crate) struct ProjectionSlot(Rc<RefCell<Option<Weak<dyn Projection>>>>);

impl ProjectionSlot {
    pub(crate) fn fill(&self, projection: &Rc<dyn Projection>) {
        *self.0.borrow_mut() = Some(Rc::downgrade(projection));
    }

    fn get(&self) -> Option<Rc<dyn Projection>> {
        self.0.borrow().as_ref().and_then(Weak::upgrade)
    }
}

/// Everything an intercepted listener needs, shared by all listeners of one
/// projection.
#[derive(Clone)]
pub(crate) struct InterceptContext {
    pub(crate) projector: Weak<ProjectorInner>,
    pub(crate) projection: ProjectionSlot,
    pub(crate) performance_logger: PerformanceLogger,
    pub(crate) handle_intercepted_event: InterceptedEventHandler,
}

impl InterceptContext {
    /// Interceptor to install on the projection options.
    pub(crate) fn into_interceptor(self) -> EventHandlerInterceptor {
        Rc::new(
            move |_property_name: &str,
                  _handler: &EventHandler,
                  _node: &DomNode,
                  _properties: &VNodeProperties|
                  -> Listener {
                let context = self.clone();
                Rc::new(move |this: &DomNode, event: &Event| context.handle(this, event))
            },
        )
    }

    fn handle(&self, this: &DomNode, event: &Event) -> Option<bool> {
        (self.performance_logger)(PerformanceEvent::DomEvent, Some(event));
        let result = self.dispatch(this, event);
        (self.performance_logger)(PerformanceEvent::DomEventProcessed, Some(event));
        result
    }

    fn dispatch(&self, this: &DomNode, event: &Event) -> Option<bool> {
        let projector = Projector::from_inner(self.projector.upgrade()?);
        let projection = self.projection.get()?;
        let target = event.current_target()?;

        let tree = projection.last_render();
        let Some(vnode) = resolve_vnode(&tree, &projection.dom_node(), &target) else {
            debug!(event = event.event_type(), "event target no longer rendered, dropping event");
            return None;
        };

        trace!(
            event = event.event_type(),
            vnode = vnode.selector(),
            "dispatching intercepted event"
        );
        (self.handle_intercepted_event)(&projector, vnode, this, event)
    }
}
