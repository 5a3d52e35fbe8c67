//! # spark-projector
//!
//! Frame-batched virtual-DOM projector for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! observable projector status.
//!
//! ## Architecture
//!
//! A projector keeps a list of render functions, each paired with the live
//! projection it renders into. Changes are batched: any number of
//! `schedule_render()` calls before the next frame produce one pass that
//! re-renders every registration in insertion order.
//!
//! ```text
//! render function → VNode → Dom (append/insert_before/merge/replace) → Projection
//!                     ↑                                                     │
//!       handle_intercepted_event ← resolve VNode by path ← DOM event ───────┘
//! ```
//!
//! Event listeners installed during the first render never capture a
//! handler. Each event is resolved against the projection's latest rendered
//! tree, so a handler swapped between renders is always the one invoked.
//!
//! ## Modules
//!
//! - [`types`] - Lifecycle flags, status, performance events, callback aliases
//! - [`error`] - Error types
//! - [`options`] - Projection options merger and projector configuration
//! - [`dom`] - In-memory host DOM
//! - [`vdom`] - VNodes, the collaborator traits, headless collaborator
//! - [`engine`] - Render functions and registrations
//! - [`state`] - Event path resolution
//! - [`pipeline`] - Frame scheduling, render pass, attach
//! - [`projector`] - The projector

pub mod dom;
pub mod engine;
pub mod error;
pub mod options;
pub mod pipeline;
pub mod projector;
pub mod state;
pub mod types;
pub mod vdom;

// Re-export commonly used items
pub use types::*;

pub use dom::{CssStyle, DomNode, Event};

pub use engine::{IntoRenderResult, Registration, Registrations, RenderFunction};

pub use error::{DomError, ProjectorError, RenderError};

pub use options::{
    apply_default_projection_options, default_handle_intercepted_event, default_style_applyer,
    noop_performance_logger, PartialProjectionOptions, ProjectionOptions, ProjectorOptions,
};

pub use pipeline::{
    FrameCallback, FrameQueue, FrameScheduler, FrameToken, MountKind, FRAME_INTERVAL,
};

pub use projector::Projector;

pub use state::{find_vnode_by_path, parent_node_path, resolve_vnode};

pub use vdom::{
    h, handler, Dom, HeadlessDom, HeadlessProjection, IntoHandlerResult, Projection, VNode,
    VNodeProperties,
};
