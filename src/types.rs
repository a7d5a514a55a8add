//! Core types for spark-hooks.
//!
//! These types define the foundation that everything builds on.
//! They flow through the render → commit pipeline and define what the
//! action runner understands.

use std::any::Any;
use std::rc::Rc;

// =============================================================================
// Resource Handle
// =============================================================================

/// Opaque handle to an externally-owned resource.
///
/// The handle is produced by a create callback and exclusively owned by its
/// resource slot from successful create until destroy. Nothing else may
/// mutate it; the only mutation path is the update callback supplied by the
/// owning call site.
pub type Resource = Rc<dyn Any>;

// =============================================================================
// Errors from user callbacks
// =============================================================================

/// Failure payload produced by a create/update/destroy callback.
///
/// Single-threaded commit model, so no `Send + Sync` bound is required.
pub type BoxError = Box<dyn std::error::Error>;

// =============================================================================
// Callback Types
// =============================================================================

/// Producer of a new resource handle from the current render closure.
pub type CreateFn = Box<dyn FnOnce() -> Result<Resource, BoxError>>;

/// Mutation applied to an existing handle. Receives the handle and returns
/// the (possibly same) handle; returning a different handle replaces the
/// slot's stored one without starting a new epoch.
pub type UpdateFn = Box<dyn FnOnce(Resource) -> Result<Resource, BoxError>>;

/// Terminal cleanup for a handle. After this runs the handle must not be
/// used again.
pub type DestroyFn = Box<dyn FnOnce(Resource) -> Result<(), BoxError>>;

// =============================================================================
// Slot Lifecycle State
// =============================================================================

/// Lifecycle state of a resource slot.
///
/// ```text
/// Unmounted → Mounting → Mounted ⇄ Updating
///                           ↓
///                       Unmounting → Unmounted
/// ```
///
/// `Mounting`/`Updating`/`Unmounting` are only observable while the commit
/// runner is executing actions for the slot; a slot at rest is either
/// `Unmounted` or `Mounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    /// No commit has reached this call site yet, or it has been unmounted.
    #[default]
    Unmounted,
    /// First commit in progress: create scheduled, not yet finished.
    Mounting,
    /// A commit has completed for this call site.
    Mounted,
    /// A subsequent commit is running actions (update or replace).
    Updating,
    /// Unmount destroy in progress.
    Unmounting,
}
