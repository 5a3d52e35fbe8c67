//! Render Pipeline
//!
//! This module connects render functions to frames and to the DOM.
//!
//! # Pipeline Architecture
//!
//! ```text
//! schedule_render → FrameScheduler → render pass → Projection::update
//! ```
//!
//! ## Data Flow
//!
//! 1. **mount** - first render of an attach, interceptor installed, registration added
//! 2. **frame** - at most one frame request outstanding per projector
//! 3. **render** - one pass re-renders every registration in insertion order
//!
//! ## Key Design Principles
//!
//! - **Coalesced**: any number of `schedule_render` calls before a frame yield one pass
//! - **Fail-stop**: a failed pass blocks later passes until `resume()`
//! - **No nesting**: a pass never runs inside another pass

pub mod frame;
pub mod mount;
pub(crate) mod render;

// Re-exports
pub use frame::{FrameCallback, FrameQueue, FrameScheduler, FrameToken, FRAME_INTERVAL};
pub use mount::MountKind;
