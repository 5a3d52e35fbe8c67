//! Mount API - attach a render function to a DOM anchor.
//!
//! Every attach operation runs the same sequence:
//!
//! 1. Install an event interceptor on the projection options
//! 2. Run the `post_process_projection_options` hook
//! 3. Render the first VNode
//! 4. Hand it to the collaborator primitive for this [`MountKind`]
//! 5. Uninstall the interceptor (also when a step above failed)
//! 6. Register the (render function, projection) pair
//! 7. Run the `after_first_vnode_rendered` hook
//!
//! The collaborator copies the options, so listeners created during the
//! first render keep routing through the interceptor for the projection's
//! whole lifetime.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::dom::DomNode;
use crate::engine::RenderFunction;
use crate::error::{DomError, ProjectorError};
use crate::options::ProjectionOptions;
use crate::projector::ProjectorInner;
use crate::state::intercept::{InterceptContext, ProjectionSlot};
use crate::types::ProjectionHandle;
use crate::vdom::{Dom, VNode};

// =============================================================================
// Mount Kind
// =============================================================================

/// Where the first render lands relative to the anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    /// Last child of the anchor.
    Append,
    /// Previous sibling of the anchor.
    InsertBefore,
    /// The anchor itself becomes the root DOM node.
    Merge,
    /// Takes the anchor's place in its parent.
    Replace,
}

impl MountKind {
    /// Call the matching collaborator primitive.
    pub fn project(
        self,
        dom: &dyn Dom,
        anchor: &DomNode,
        vnode: VNode,
        options: &ProjectionOptions,
    ) -> Result<ProjectionHandle, DomError> {
        match self {
            Self::Append => dom.append(anchor, vnode, options),
            Self::InsertBefore => dom.insert_before(anchor, vnode, options),
            Self::Merge => dom.merge(anchor, vnode, options),
            Self::Replace => dom.replace(anchor, vnode, options),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::InsertBefore => "insertBefore",
            Self::Merge => "merge",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for MountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Attach
// =============================================================================

/// Render `render_function` once into `anchor` and register it.
pub(crate) fn add_projection(
    inner: &Rc<ProjectorInner>,
    kind: MountKind,
    anchor: &DomNode,
    render_function: RenderFunction,
) -> Result<ProjectionHandle, ProjectorError> {
    let slot = ProjectionSlot::default();
    let context = InterceptContext {
        projector: Rc::downgrade(inner),
        projection: slot.clone(),
        performance_logger: inner.performance_logger.clone(),
        handle_intercepted_event: inner.handle_intercepted_event.clone(),
    };

    // No borrow of the shared options is held while the hook runs.
    let mut options = inner.projection_options.borrow().clone();
    options.event_handler_interceptor = Some(context.into_interceptor());
    if let Some(post_process) = &inner.options.post_process_projection_options {
        post_process(&mut options);
    }
    *inner.projection_options.borrow_mut() = options.clone();

    let projection = first_render(inner, kind, anchor, &render_function, &options);
    inner.projection_options.borrow_mut().event_handler_interceptor = None;
    let projection = projection?;

    slot.fill(&projection);
    inner.registrations.push(render_function, projection.clone());
    debug!(
        kind = kind.as_str(),
        registrations = inner.registrations.len(),
        "projection attached"
    );

    if let Some(after_first) = &inner.options.after_first_vnode_rendered {
        after_first(&projection, &projection.last_render());
    }
    Ok(projection)
}

fn first_render(
    inner: &ProjectorInner,
    kind: MountKind,
    anchor: &DomNode,
    render_function: &RenderFunction,
    options: &ProjectionOptions,
) -> Result<ProjectionHandle, ProjectorError> {
    let vnode = render_function.render()?;
    Ok(kind.project(inner.dom.as_ref(), anchor, vnode, options)?)
}

// =============================================================================
// Tests
// =============================================================================
