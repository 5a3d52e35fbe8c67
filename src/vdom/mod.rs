//! Virtual DOM - VNodes and the collaborator boundary.
//!
//! - [`VNode`] / [`h`] - virtual node tree built by render functions
//! - [`Dom`] / [`Projection`] - what the projector asks of a virtual-DOM library
//! - [`HeadlessDom`] - reference collaborator over the in-memory [`crate::dom`]

mod headless;
mod projection;
mod vnode;

pub use headless::{HeadlessDom, HeadlessProjection};
pub use projection::{Dom, Projection};
pub use vnode::{h, handler, IntoHandlerResult, VNode, VNodeProperties};
