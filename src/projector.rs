//! Projector - frame-batched rendering of registered render functions.
//!
//! A [`Projector`] owns an ordered list of (render function, projection)
//! registrations and re-renders all of them in one pass per frame. It also
//! routes DOM events raised by rendered handlers back through the latest
//! rendered VNode tree (see [`crate::state::event_path`]).
//!
//! # API
//!
//! - `append / insert_before / merge / replace` - attach a render function
//! - `detach` - remove a registration, returning its projection
//! - `schedule_render` - request a pass on the next frame (coalesced)
//! - `render_now` - run a pass synchronously
//! - `stop / resume` - suppress frame requests, recover from a faulted pass
//!
//! # Example
//!
//! ```ignore
//! use spark_projector::{h, FrameQueue, HeadlessDom, Projector, ProjectorOptions, RenderFunction};
//!
//! let frames = Rc::new(FrameQueue::new());
//! let projector = Projector::new(ProjectorOptions::new(), Rc::new(HeadlessDom), frames.clone());
//!
//! let count = signal(0);
//! let c = count.clone();
//! projector.append(&body, RenderFunction::new(move || {
//!     h("button").text_child(&c.get().to_string())
//!         .on("click", move |_| count.set(count.get() + 1))
//! }))?;
//!
//! frames.tick()?; // one pass, however many clicks were handled
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;
use tracing::{debug, trace};

use crate::dom::DomNode;
use crate::engine::{Registrations, RenderFunction};
use crate::error::ProjectorError;
use crate::options::{
    apply_default_projection_options, default_handle_intercepted_event, ProjectionOptions,
    ProjectorOptions,
};
use crate::pipeline::frame::FrameScheduler;
use crate::pipeline::mount::{add_projection, MountKind};
use crate::pipeline::render::{create_do_render, RenderState};
use crate::types::{
    DoRender, InterceptedEventHandler, PerformanceLogger, ProjectionHandle, ProjectorFlags,
    ProjectorStatus,
};
use crate::vdom::Dom;

// =============================================================================
// Shared State
// =============================================================================

/// State behind every clone of a [`Projector`].
pub(crate) struct ProjectorInner {
    pub(crate) options: ProjectorOptions,
    /// Options handed to the collaborator. The interceptor is only set
    /// while an attach is rendering its first VNode.
    pub(crate) projection_options: RefCell<ProjectionOptions>,
    pub(crate) performance_logger: PerformanceLogger,
    pub(crate) handle_intercepted_event: InterceptedEventHandler,
    pub(crate) render_state: Rc<RenderState>,
    pub(crate) registrations: Registrations,
    pub(crate) do_render: DoRender,
    pub(crate) scheduler: Rc<dyn FrameScheduler>,
    pub(crate) dom: Rc<dyn Dom>,
}

// =============================================================================
// Projector
// =============================================================================

/// Handle to a projector. Clones share the same state.
///
/// Frame callbacks and DOM listeners hold weak references, so dropping the
/// last handle releases the projector even with a frame pending.
#[derive(Clone)]
pub struct Projector {
    inner: Rc<ProjectorInner>,
}

impl Projector {
    /// Create a projector rendering through `dom` and scheduling frames on
    /// `scheduler`.
    pub fn new(
        options: ProjectorOptions,
        dom: Rc<dyn Dom>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        let projection_options =
            apply_default_projection_options(Some(options.projection_overrides()));
        let performance_logger = projection_options.performance_logger.clone();

        let render_state = Rc::new(RenderState::new());
        let registrations = Registrations::new();
        let default_pass = create_do_render(
            render_state.clone(),
            registrations.clone(),
            performance_logger.clone(),
        );
        let do_render = match &options.modify_do_render_implementation {
            Some(modify) => modify(default_pass, registrations.clone()),
            None => default_pass,
        };

        let handle_intercepted_event = options
            .handle_intercepted_event
            .clone()
            .unwrap_or_else(|| {
                Rc::new(default_handle_intercepted_event) as InterceptedEventHandler
            });

        debug!(options = ?options, "projector created");
        Self {
            inner: Rc::new(ProjectorInner {
                options,
                projection_options: RefCell::new(projection_options),
                performance_logger,
                handle_intercepted_event,
                render_state,
                registrations,
                do_render,
                scheduler,
                dom,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<ProjectorInner>) -> Self {
        Self { inner }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Run a render pass now. A pending frame request stays pending.
    ///
    /// Returns the render function or patch error that faulted the pass. A
    /// pass on a faulted projector does nothing and returns `Ok`.
    pub fn render_now(&self) -> Result<(), ProjectorError> {
        (self.inner.do_render)()
    }

    /// Request a render pass on the next frame.
    ///
    /// Does nothing while stopped or when a frame is already pending.
    pub fn schedule_render(&self) {
        let state = &self.inner.render_state;
        if state.scheduled().is_some() || state.contains(ProjectorFlags::STOPPED) {
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let token = self.inner.scheduler.request_frame(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return Ok(());
            };
            inner.render_state.take_scheduled();
            (inner.do_render)()
        }));
        state.set_scheduled(Some(token));
        trace!(token = token.get(), "render scheduled");
    }

    /// Cancel the pending frame and suppress frame requests until `resume()`.
    pub fn stop(&self) {
        let state = &self.inner.render_state;
        if let Some(token) = state.take_scheduled() {
            self.inner.scheduler.cancel_frame(token);
        }
        state.insert(ProjectorFlags::STOPPED);
        debug!("projector stopped");
    }

    /// Allow frame requests again, clear a faulted pass and schedule a render.
    pub fn resume(&self) {
        self.inner
            .render_state
            .remove(ProjectorFlags::STOPPED | ProjectorFlags::RENDERING | ProjectorFlags::FAULTED);
        debug!("projector resumed");
        self.schedule_render();
    }

    // -------------------------------------------------------------------------
    // Attach / Detach
    // -------------------------------------------------------------------------

    /// Render `render_function` as the last child of `parent`.
    pub fn append(
        &self,
        parent: &DomNode,
        render_function: RenderFunction,
    ) -> Result<ProjectionHandle, ProjectorError> {
        add_projection(&self.inner, MountKind::Append, parent, render_function)
    }

    /// Render `render_function` as the previous sibling of `before`.
    pub fn insert_before(
        &self,
        before: &DomNode,
        render_function: RenderFunction,
    ) -> Result<ProjectionHandle, ProjectorError> {
        add_projection(&self.inner, MountKind::InsertBefore, before, render_function)
    }

    /// Render `render_function` into `element`, which becomes the root DOM
    /// node of the projection.
    pub fn merge(
        &self,
        element: &DomNode,
        render_function: RenderFunction,
    ) -> Result<ProjectionHandle, ProjectorError> {
        add_projection(&self.inner, MountKind::Merge, element, render_function)
    }

    /// Render `render_function` in place of `element`.
    pub fn replace(
        &self,
        element: &DomNode,
        render_function: RenderFunction,
    ) -> Result<ProjectionHandle, ProjectorError> {
        add_projection(&self.inner, MountKind::Replace, element, render_function)
    }

    /// Remove the first registration made with `render_function` and return
    /// its projection. The DOM is left as it is.
    pub fn detach(
        &self,
        render_function: &RenderFunction,
    ) -> Result<ProjectionHandle, ProjectorError> {
        let projection = self
            .inner
            .registrations
            .remove_render_function(render_function)
            .ok_or(ProjectorError::RenderFunctionNotFound)?;
        debug!(registrations = self.inner.registrations.len(), "projection detached");
        Ok(projection)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn status(&self) -> ProjectorStatus {
        self.inner.render_state.status()
    }

    /// Reactive view of [`Projector::status`].
    pub fn status_signal(&self) -> Signal<ProjectorStatus> {
        self.inner.render_state.status_signal()
    }

    pub fn is_scheduled(&self) -> bool {
        self.inner.render_state.scheduled().is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.render_state.contains(ProjectorFlags::STOPPED)
    }

    pub fn len(&self) -> usize {
        self.inner.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registrations.is_empty()
    }

    /// The registrations, shared with the render pass.
    pub fn registrations(&self) -> Registrations {
        self.inner.registrations.clone()
    }

    /// Snapshot of the options the collaborator receives on the next attach
    /// (before the interceptor and post-processing are applied).
    pub fn projection_options(&self) -> ProjectionOptions {
        self.inner.projection_options.borrow().clone()
    }
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("status", &self.status())
            .field("flags", &self.inner.render_state.flags())
            .field("registrations", &self.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
