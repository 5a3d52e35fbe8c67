//! Engine - render registrations.
//!
//! The projector keeps one ordered list of (render function, projection)
//! pairs. Every render pass walks it front to back.

mod registry;

pub use registry::{IntoRenderResult, Registration, Registrations, RenderFunction};
