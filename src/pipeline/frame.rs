//! Frame scheduling.
//!
//! The projector consumes a frame-scheduling primitive: "run this callback
//! once before the next paint, and give me a token to cancel it". In a
//! browser that is `requestAnimationFrame`; natively it is [`FrameQueue`],
//! driven by the host's own loop.
//!
//! # Example
//!
//! ```ignore
//! let frames = Rc::new(FrameQueue::new());
//! let projector = Projector::new(ProjectorOptions::new(), Rc::new(HeadlessDom), frames.clone());
//!
//! // Option 1: tick manually from your own loop
//! frames.tick()?;
//!
//! // Option 2: blocking loop at ~60fps
//! frames.run(FRAME_INTERVAL, || running.get());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{error, trace};

use crate::error::ProjectorError;

/// Interval between frames of [`FrameQueue::run`] (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Handle of a pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Work to run on the next frame. An error is left to the host to report.
pub type FrameCallback = Box<dyn FnOnce() -> Result<(), ProjectorError>>;

/// Host facility that runs a callback once before the next repaint.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameToken;

    /// Drop a pending request. Unknown or already-run tokens are ignored.
    fn cancel_frame(&self, token: FrameToken);
}

// =============================================================================
// FrameQueue
// =============================================================================

/// Host-driven frame scheduler.
///
/// Callbacks requested while a tick is running wait for the next tick, the
/// same way `requestAnimationFrame` inside a frame callback targets the
/// following frame. A callback cancelled by an earlier callback of the same
/// tick does not run.
#[derive(Default)]
pub struct FrameQueue {
    pending: RefCell<Vec<(FrameToken, FrameCallback)>>,
    /// Tokens of the running tick that have not run or been cancelled yet.
    in_flight: RefCell<HashSet<FrameToken>>,
    next_token: Cell<u64>,
    requested: Cell<usize>,
    cancelled: Cell<usize>,
    frames: Cell<u64>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next tick.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Total number of `request_frame` calls.
    pub fn requested(&self) -> usize {
        self.requested.get()
    }

    /// Total number of `cancel_frame` calls.
    pub fn cancelled(&self) -> usize {
        self.cancelled.get()
    }

    /// Number of ticks run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    /// Run one frame: every callback requested before this call.
    ///
    /// All callbacks run even if some fail. Failures are reported with
    /// `tracing::error!` and the first one is returned; otherwise the number
    /// of callbacks run.
    pub fn tick(&self) -> Result<usize, ProjectorError> {
        let callbacks = std::mem::take(&mut *self.pending.borrow_mut());
        self.frames.set(self.frames.get() + 1);
        trace!(frame = self.frames.get(), callbacks = callbacks.len(), "frame");
        *self.in_flight.borrow_mut() = callbacks.iter().map(|(token, _)| *token).collect();

        let mut ran = 0;
        let mut first_error = None;
        for (token, callback) in callbacks {
            if !self.in_flight.borrow_mut().remove(&token) {
                trace!(token = token.get(), "frame callback cancelled during tick");
                continue;
            }
            ran += 1;
            if let Err(err) = callback() {
                error!(token = token.get(), error = %err, "frame callback failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(ran),
        }
    }

    /// Tick every `interval` until `keep_running` returns false. Callback
    /// failures are reported and the loop continues.
    pub fn run(&self, interval: Duration, keep_running: impl Fn() -> bool) {
        while keep_running() {
            let _ = self.tick();
            thread::sleep(interval);
        }
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&self, callback: FrameCallback) -> FrameToken {
        let id = self.next_token.get() + 1;
        self.next_token.set(id);
        self.requested.set(self.requested.get() + 1);

        let token = FrameToken(id);
        self.pending.borrow_mut().push((token, callback));
        token
    }

    fn cancel_frame(&self, token: FrameToken) {
        self.cancelled.set(self.cancelled.get() + 1);
        self.pending.borrow_mut().retain(|(t, _)| *t != token);
        self.in_flight.borrow_mut().remove(&token);
    }
}

impl fmt::Debug for FrameQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.pending())
            .field("requested", &self.requested())
            .field("cancelled", &self.cancelled())
            .field("frames", &self.frame_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
