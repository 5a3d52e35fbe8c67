//! State Module - event routing back to the virtual tree
//!
//! - **Event path** - DOM ancestor chain to VNode resolution
//! - **Intercept** - listener shim installed during first render

pub mod event_path;
pub(crate) mod intercept;

pub use event_path::{find_vnode_by_path, parent_node_path, resolve_vnode};
