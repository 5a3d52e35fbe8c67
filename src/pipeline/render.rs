//! Render Pass - re-render every registration and patch its projection.
//!
//! The pass walks the registrations in insertion order. For each one it
//! invokes the render function and hands the result to the projection's
//! `update`. Lifecycle points are reported to the performance logger:
//!
//! ```text
//! renderStart, (rendered, patched) per registration, renderDone
//! ```
//!
//! A failing render function or patch aborts the pass and leaves the
//! projector faulted: `RENDERING` stays set, so every later pass returns
//! without rendering until `resume()` clears it.

use std::cell::Cell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, error, trace_span};

use super::frame::FrameToken;
use crate::engine::Registrations;
use crate::error::{ProjectorError, RenderError};
use crate::types::{DoRender, PerformanceEvent, PerformanceLogger, ProjectorFlags, ProjectorStatus};

// =============================================================================
// Render State
// =============================================================================

/// Scheduling and lifecycle state shared by the projector and its render pass.
pub(crate) struct RenderState {
    flags: Cell<ProjectorFlags>,
    scheduled: Cell<Option<FrameToken>>,
    status: Signal<ProjectorStatus>,
}

impl RenderState {
    pub(crate) fn new() -> Self {
        Self {
            flags: Cell::new(ProjectorFlags::empty()),
            scheduled: Cell::new(None),
            status: signal(ProjectorStatus::Idle),
        }
    }

    pub(crate) fn flags(&self) -> ProjectorFlags {
        self.flags.get()
    }

    pub(crate) fn contains(&self, flag: ProjectorFlags) -> bool {
        self.flags.get().contains(flag)
    }

    pub(crate) fn insert(&self, flag: ProjectorFlags) {
        let mut flags = self.flags.get();
        flags.insert(flag);
        self.flags.set(flags);
        self.sync();
    }

    pub(crate) fn remove(&self, flag: ProjectorFlags) {
        let mut flags = self.flags.get();
        flags.remove(flag);
        self.flags.set(flags);
        self.sync();
    }

    pub(crate) fn scheduled(&self) -> Option<FrameToken> {
        self.scheduled.get()
    }

    pub(crate) fn set_scheduled(&self, token: Option<FrameToken>) {
        self.scheduled.set(token);
        self.sync();
    }

    /// Clear and return the pending frame token.
    pub(crate) fn take_scheduled(&self) -> Option<FrameToken> {
        let token = self.scheduled.take();
        self.sync();
        token
    }

    pub(crate) fn status(&self) -> ProjectorStatus {
        self.status.get()
    }

    pub(crate) fn status_signal(&self) -> Signal<ProjectorStatus> {
        self.status.clone()
    }

    fn sync(&self) {
        let status = ProjectorStatus::from_flags(self.flags.get(), self.scheduled.get().is_some());
        if self.status.get() != status {
            self.status.set(status);
        }
    }

    /// Record a failed pass. `RENDERING` is left set.
    fn fault(&self, err: RenderError) -> ProjectorError {
        self.insert(ProjectorFlags::FAULTED);
        error!(error = %err, "render pass failed, projector halted until resume");
        ProjectorError::Render(err)
    }
}

// =============================================================================
// Default Render Pass
// =============================================================================

/// Build the default render pass over `registrations`.
///
/// The registrations are read by index on every step, so attach and detach
/// calls made by a render function are observed by the same pass. The pending
/// frame token is cleared by the frame callback, not here, so `render_now()`
/// leaves an outstanding frame request alone.
pub(crate) fn create_do_render(
    state: Rc<RenderState>,
    registrations: Registrations,
    performance_logger: PerformanceLogger,
) -> DoRender {
    Rc::new(move || -> Result<(), ProjectorError> {
        if state.contains(ProjectorFlags::RENDERING) {
            debug!(flags = ?state.flags(), "render pass skipped");
            return Ok(());
        }

        let span = trace_span!("render_pass", projections = registrations.len());
        let _enter = span.enter();

        state.insert(ProjectorFlags::RENDERING);
        performance_logger(PerformanceEvent::RenderStart, None);

        let mut index = 0;
        while let Some(registration) = registrations.get(index) {
            let vnode = registration
                .render_function
                .render()
                .map_err(|err| state.fault(err))?;
            performance_logger(PerformanceEvent::Rendered, None);

            registration
                .projection
                .update(vnode)
                .map_err(|err| state.fault(err))?;
            performance_logger(PerformanceEvent::Patched, None);
            index += 1;
        }

        performance_logger(PerformanceEvent::RenderDone, None);
        state.remove(ProjectorFlags::RENDERING);
        debug!(projections = index, "render pass complete");
        Ok(())
    })
}

// =============================================================================
// Tests
// =============================================================================
