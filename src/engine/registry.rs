//! Render Registry - render functions paired with their live projections.
//!
//! Manages the projector's registrations:
//! - [`RenderFunction`] identity (detach compares handles, not closures)
//! - Insertion order, preserved across removal
//! - Shared ownership, so a replacement render pass observes later
//!   attach/detach calls

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::RenderError;
use crate::types::ProjectionHandle;
use crate::vdom::VNode;

// =============================================================================
// Render Function
// =============================================================================

/// Conversion of a render closure's return value.
pub trait IntoRenderResult {
    fn into_render_result(self) -> Result<VNode, RenderError>;
}

impl IntoRenderResult for VNode {
    fn into_render_result(self) -> Result<VNode, RenderError> {
        Ok(self)
    }
}

impl<E: Into<RenderError>> IntoRenderResult for Result<VNode, E> {
    fn into_render_result(self) -> Result<VNode, RenderError> {
        self.map_err(Into::into)
    }
}

/// Zero-argument function producing a fresh VNode tree.
///
/// Clones share identity: a clone detaches the registration made with the
/// original. Two functions built from identical closures are distinct.
#[derive(Clone)]
pub struct RenderFunction(Rc<dyn Fn() -> Result<VNode, RenderError>>);

impl RenderFunction {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: IntoRenderResult,
    {
        Self(Rc::new(move || f().into_render_result()))
    }

    /// Produce a VNode tree.
    pub fn render(&self) -> Result<VNode, RenderError> {
        (self.0)()
    }

    pub fn ptr_eq(&self, other: &RenderFunction) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for RenderFunction {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for RenderFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RenderFunction")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

// =============================================================================
// Registrations
// =============================================================================

/// One render function and the projection it renders into.
#[derive(Clone)]
pub struct Registration {
    pub render_function: RenderFunction,
    pub projection: ProjectionHandle,
}

/// Ordered, shared list of registrations.
///
/// Index `i` always pairs the `i`-th render function with the `i`-th
/// projection. Handles are cheap clones of the same list.
#[derive(Clone, Default)]
pub struct Registrations(Rc<RefCell<Vec<Registration>>>);

impl Registrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Append a registration at the end.
    pub fn push(&self, render_function: RenderFunction, projection: ProjectionHandle) {
        self.0.borrow_mut().push(Registration {
            render_function,
            projection,
        });
    }

    /// Registration at `index`. The list is not borrowed after this returns,
    /// so callers may render while holding the result.
    pub fn get(&self, index: usize) -> Option<Registration> {
        self.0.borrow().get(index).cloned()
    }

    /// Remove the registration at `index`; later entries shift down.
    pub fn remove(&self, index: usize) -> Option<Registration> {
        let mut list = self.0.borrow_mut();
        (index < list.len()).then(|| list.remove(index))
    }

    /// Index of the first registration made with `render_function`.
    pub fn position(&self, render_function: &RenderFunction) -> Option<usize> {
        self.0
            .borrow()
            .iter()
            .position(|r| r.render_function.ptr_eq(render_function))
    }

    /// Remove the first registration made with `render_function` and return
    /// its projection.
    pub fn remove_render_function(
        &self,
        render_function: &RenderFunction,
    ) -> Option<ProjectionHandle> {
        let index = self.position(render_function)?;
        self.remove(index).map(|r| r.projection)
    }

    /// Snapshot of the projections, in order.
    pub fn projections(&self) -> Vec<ProjectionHandle> {
        self.0.borrow().iter().map(|r| r.projection.clone()).collect()
    }

    /// Snapshot of the render functions, in order.
    pub fn render_functions(&self) -> Vec<RenderFunction> {
        self.0
            .borrow()
            .iter()
            .map(|r| r.render_function.clone())
            .collect()
    }
}

impl fmt::Debug for Registrations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrations").field("len", &self.len()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
