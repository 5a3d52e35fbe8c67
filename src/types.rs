//! Core types shared by every layer of the projector.
//!
//! - [`ProjectorFlags`] - lifecycle bitflags (stopped / rendering / faulted)
//! - [`ProjectorStatus`] - the flags folded into one observable state
//! - [`PerformanceEvent`] - lifecycle points reported to the performance logger
//! - Callback aliases used as configuration fields and DOM listeners

use std::fmt;
use std::rc::Rc;

use crate::dom::{DomNode, Event};
use crate::engine::Registrations;
use crate::error::ProjectorError;
use crate::options::ProjectionOptions;
use crate::projector::Projector;
use crate::vdom::{Projection, VNode, VNodeProperties};

// =============================================================================
// Lifecycle Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Projector lifecycle flags.
    ///
    /// `RENDERING` is set for the duration of a render pass. A pass that fails
    /// leaves it set (together with `FAULTED`), which blocks every later pass
    /// until [`Projector::resume`] clears both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProjectorFlags: u8 {
        const STOPPED = 1 << 0;
        const RENDERING = 1 << 1;
        const FAULTED = 1 << 2;
    }
}

/// Observable projector state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectorStatus {
    /// No frame pending, not stopped.
    #[default]
    Idle,
    /// A frame request is outstanding.
    Scheduled,
    /// Frame requests are suppressed until `resume()`.
    Stopped,
    /// A render pass is executing.
    Rendering,
    /// The last render pass failed; passes are skipped until `resume()`.
    Faulted,
}

impl ProjectorStatus {
    /// Fold lifecycle flags and the scheduling token into a status.
    pub fn from_flags(flags: ProjectorFlags, scheduled: bool) -> Self {
        if flags.contains(ProjectorFlags::FAULTED) {
            Self::Faulted
        } else if flags.contains(ProjectorFlags::RENDERING) {
            Self::Rendering
        } else if flags.contains(ProjectorFlags::STOPPED) {
            Self::Stopped
        } else if scheduled {
            Self::Scheduled
        } else {
            Self::Idle
        }
    }
}

// =============================================================================
// Performance Events
// =============================================================================

/// Named lifecycle points passed to the performance logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceEvent {
    /// An intercepted DOM event arrived.
    DomEvent,
    /// An intercepted DOM event finished processing.
    DomEventProcessed,
    /// A render pass started.
    RenderStart,
    /// One render function produced its VNode.
    Rendered,
    /// One projection was patched.
    Patched,
    /// A render pass finished.
    RenderDone,
}

impl PerformanceEvent {
    /// The event name as reported to loggers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomEvent => "domEvent",
            Self::DomEventProcessed => "domEventProcessed",
            Self::RenderStart => "renderStart",
            Self::Rendered => "rendered",
            Self::Patched => "patched",
            Self::RenderDone => "renderDone",
        }
    }
}

impl fmt::Display for PerformanceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Callback Types
// =============================================================================

/// Live projection handle owned by the virtual-DOM collaborator.
pub type ProjectionHandle = Rc<dyn Projection>;

/// Receives lifecycle points with the DOM event involved, if any.
pub type PerformanceLogger = Rc<dyn Fn(PerformanceEvent, Option<&Event>)>;

/// Applies one CSS property to one DOM node.
pub type StyleApplyer = Rc<dyn Fn(&DomNode, &str, &str)>;

/// Handler declared on a VNode. `Some(false)` suppresses the default action.
pub type EventHandler = Rc<dyn Fn(&Event) -> Option<bool>>;

/// Listener installed on a DOM node. Receives the node it is installed on.
pub type Listener = Rc<dyn Fn(&DomNode, &Event) -> Option<bool>>;

/// Turns a declared handler into the listener installed on the DOM node.
///
/// Arguments: property name (`"onclick"`), declared handler, DOM node, and
/// the properties that declared the handler.
pub type EventHandlerInterceptor =
    Rc<dyn Fn(&str, &EventHandler, &DomNode, &VNodeProperties) -> Listener>;

/// Application logic run for every intercepted event that resolves to a VNode.
pub type InterceptedEventHandler =
    Rc<dyn Fn(&Projector, &VNode, &DomNode, &Event) -> Option<bool>>;

/// Called once per attach with the new projection and its first VNode.
pub type AfterFirstVNodeRendered = Rc<dyn Fn(&ProjectionHandle, &VNode)>;

/// Mutates the projection options before each attach's first render.
pub type PostProcessProjectionOptions = Rc<dyn Fn(&mut ProjectionOptions)>;

/// One render pass over every registration.
pub type DoRender = Rc<dyn Fn() -> Result<(), ProjectorError>>;

/// Wraps or replaces the render pass. Receives the default pass and the live
/// registration container.
pub type ModifyDoRenderImplementation = Rc<dyn Fn(DoRender, Registrations) -> DoRender>;

// =============================================================================
// Tests
// =============================================================================
