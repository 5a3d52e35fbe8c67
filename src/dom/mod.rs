//! Headless host DOM.
//!
//! The projector only needs a small slice of the browser DOM: node identity,
//! parent links, listeners, attributes and inline style. This module provides
//! that slice in memory so projections can be driven without a browser.
//!
//! - [`DomNode`] - element or text node handle
//! - [`Event`] - event with target / current target and default prevention
//! - [`CssStyle`] - inline style with assignment and property-setter paths

mod event;
mod node;
mod style;

pub use event::Event;
pub use node::DomNode;
pub use style::CssStyle;
