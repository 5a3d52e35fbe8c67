//! Configuration.
//!
//! Two records live here:
//!
//! - [`ProjectionOptions`] - what the virtual-DOM collaborator receives. Built
//!   by [`apply_default_projection_options`] from a partial override.
//! - [`ProjectorOptions`] - what the caller hands to [`Projector::new`]. Every
//!   field is optional; hooks are documented with their invocation contract.
//!
//! # Example
//!
//! ```ignore
//! use spark_projector::options::ProjectorOptions;
//!
//! let options = ProjectorOptions::new()
//!     .with_performance_logger(|event, _dom_event| tracing::trace!(%event))
//!     .with_handle_intercepted_event(|projector, vnode, _node, event| {
//!         let result = vnode.properties().handler_for(event.event_type()).and_then(|h| h(event));
//!         if result != Some(false) {
//!             projector.schedule_render();
//!         }
//!         result
//!     });
//! ```
//!
//! [`Projector::new`]: crate::projector::Projector::new

use std::fmt;
use std::rc::Rc;

use crate::dom::{DomNode, Event};
use crate::engine::Registrations;
use crate::projector::Projector;
use crate::types::{
    AfterFirstVNodeRendered, DoRender, EventHandlerInterceptor, InterceptedEventHandler,
    ModifyDoRenderImplementation, PerformanceEvent, PerformanceLogger, PostProcessProjectionOptions,
    ProjectionHandle, StyleApplyer,
};
use crate::vdom::VNode;

// =============================================================================
// Projection Options (collaborator side)
// =============================================================================

/// Fully resolved options for the virtual-DOM collaborator.
#[derive(Clone)]
pub struct ProjectionOptions {
    /// Namespace for created elements, `None` for the default (HTML) namespace.
    pub namespace: Option<String>,
    /// Receives lifecycle points. No-op by default.
    pub performance_logger: PerformanceLogger,
    /// Wraps declared event handlers into DOM listeners. Installed by the
    /// projector around each attach's first render, not set by callers.
    pub event_handler_interceptor: Option<EventHandlerInterceptor>,
    /// Applies one CSS property to one DOM node.
    pub style_applyer: StyleApplyer,
}

/// Caller overrides for [`ProjectionOptions`]. Unset fields take defaults.
#[derive(Clone, Default)]
pub struct PartialProjectionOptions {
    pub namespace: Option<String>,
    pub performance_logger: Option<PerformanceLogger>,
    pub event_handler_interceptor: Option<EventHandlerInterceptor>,
    pub style_applyer: Option<StyleApplyer>,
}

/// Merge overrides onto the documented defaults.
///
/// - `namespace`: none
/// - `performance_logger`: does nothing
/// - `event_handler_interceptor`: none
/// - `style_applyer`: [`default_style_applyer`]
pub fn apply_default_projection_options(
    overrides: Option<PartialProjectionOptions>,
) -> ProjectionOptions {
    let overrides = overrides.unwrap_or_default();
    ProjectionOptions {
        namespace: overrides.namespace,
        performance_logger: overrides
            .performance_logger
            .unwrap_or_else(|| Rc::new(noop_performance_logger) as PerformanceLogger),
        event_handler_interceptor: overrides.event_handler_interceptor,
        style_applyer: overrides
            .style_applyer
            .unwrap_or_else(|| Rc::new(default_style_applyer) as StyleApplyer),
    }
}

/// Custom properties (`--name`) go through the property setter, everything
/// else is assigned directly on the style object.
pub fn default_style_applyer(node: &DomNode, property: &str, value: &str) {
    let mut style = node.style_mut();
    if property.starts_with("--") {
        style.set_property(property, value);
    } else {
        style.assign(property, value);
    }
}

pub fn noop_performance_logger(_event: PerformanceEvent, _dom_event: Option<&Event>) {}

impl Default for ProjectionOptions {
    fn default() -> Self {
        apply_default_projection_options(None)
    }
}

impl fmt::Debug for ProjectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionOptions")
            .field("namespace", &self.namespace)
            .field("event_handler_interceptor", &self.event_handler_interceptor.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Projector Options (caller side)
// =============================================================================

/// Construction-time configuration of a [`Projector`].
#[derive(Clone, Default)]
pub struct ProjectorOptions {
    /// Namespace passed on to the collaborator.
    pub namespace: Option<String>,
    /// Called with `renderStart`, `rendered`, `patched`, `renderDone` for every
    /// pass and `domEvent` / `domEventProcessed` around every intercepted event.
    pub performance_logger: Option<PerformanceLogger>,
    /// Replaces [`default_style_applyer`].
    pub style_applyer: Option<StyleApplyer>,
    /// Runs for every intercepted event that resolves to a VNode. Its return
    /// value becomes the DOM listener's result. Defaults to
    /// [`default_handle_intercepted_event`].
    pub handle_intercepted_event: Option<InterceptedEventHandler>,
    /// Called after each attach, once the first VNode is in the DOM.
    pub after_first_vnode_rendered: Option<AfterFirstVNodeRendered>,
    /// Called with the projection options before each attach's first render,
    /// after the event interceptor is installed. Mutations persist.
    pub post_process_projection_options: Option<PostProcessProjectionOptions>,
    /// Called once at construction with the default render pass and the live
    /// registrations; the returned pass replaces the default for
    /// `render_now()` and every frame.
    pub modify_do_render_implementation: Option<ModifyDoRenderImplementation>,
}

impl ProjectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    pub fn with_performance_logger<F>(mut self, f: F) -> Self
    where
        F: Fn(PerformanceEvent, Option<&Event>) + 'static,
    {
        self.performance_logger = Some(Rc::new(f));
        self
    }

    pub fn with_style_applyer<F>(mut self, f: F) -> Self
    where
        F: Fn(&DomNode, &str, &str) + 'static,
    {
        self.style_applyer = Some(Rc::new(f));
        self
    }

    pub fn with_handle_intercepted_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&Projector, &VNode, &DomNode, &Event) -> Option<bool> + 'static,
    {
        self.handle_intercepted_event = Some(Rc::new(f));
        self
    }

    pub fn with_after_first_vnode_rendered<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProjectionHandle, &VNode) + 'static,
    {
        self.after_first_vnode_rendered = Some(Rc::new(f));
        self
    }

    pub fn with_post_process_projection_options<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut ProjectionOptions) + 'static,
    {
        self.post_process_projection_options = Some(Rc::new(f));
        self
    }

    pub fn with_modify_do_render_implementation<F>(mut self, f: F) -> Self
    where
        F: Fn(DoRender, Registrations) -> DoRender + 'static,
    {
        self.modify_do_render_implementation = Some(Rc::new(f));
        self
    }

    /// Overrides for the collaborator options.
    pub(crate) fn projection_overrides(&self) -> PartialProjectionOptions {
        PartialProjectionOptions {
            namespace: self.namespace.clone(),
            performance_logger: self.performance_logger.clone(),
            event_handler_interceptor: None,
            style_applyer: self.style_applyer.clone(),
        }
    }
}

impl fmt::Debug for ProjectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectorOptions")
            .field("namespace", &self.namespace)
            .field("performance_logger", &self.performance_logger.is_some())
            .field("style_applyer", &self.style_applyer.is_some())
            .field("handle_intercepted_event", &self.handle_intercepted_event.is_some())
            .field("after_first_vnode_rendered", &self.after_first_vnode_rendered.is_some())
            .field(
                "post_process_projection_options",
                &self.post_process_projection_options.is_some(),
            )
            .field(
                "modify_do_render_implementation",
                &self.modify_do_render_implementation.is_some(),
            )
            .finish()
    }
}

/// Invoke the handler the VNode declares for the event type, then schedule a
/// render. Returns the handler's result.
pub fn default_handle_intercepted_event(
    projector: &Projector,
    vnode: &VNode,
    _dom_node: &DomNode,
    event: &Event,
) -> Option<bool> {
    let result = vnode
        .properties()
        .handler_for(event.event_type())
        .and_then(|handler| handler(event));
    projector.schedule_render();
    result
}

// =============================================================================
// Tests
// =============================================================================
