//! Commit error taxonomy.
//!
//! The lifecycle primitive never swallows an error: every callback failure
//! and invariant violation is pushed onto the root's commit-error channel,
//! where the surrounding error boundary (or a test) drains it with
//! [`Root::take_errors`](crate::runtime::Root::take_errors).

use thiserror::Error;

use crate::types::BoxError;

/// Error surfaced through the commit-error channel.
///
/// Callback failures carry the callback's own error as `source`. Slot
/// bookkeeping still advances when a callback fails: a failed create records
/// no handle, a failed destroy releases the handle anyway (it is never
/// destroyed twice), a failed update keeps the existing handle.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Dependency list length changed between renders at the same call site.
    /// Fatal in development builds; release builds treat the list as changed
    /// and the commit proceeds.
    #[error("dependency list arity changed at slot {slot}: {prev} -> {next} entries")]
    DepsArityMismatch {
        /// Call-site index within the component instance.
        slot: usize,
        /// Previously recorded arity.
        prev: usize,
        /// This render's arity.
        next: usize,
    },

    /// The create callback failed. No handle is recorded and the paired
    /// update does not run; destroy is never invoked for this epoch.
    #[error("resource create failed at slot {slot}: {source}")]
    CreateFailed {
        /// Call-site index within the component instance.
        slot: usize,
        /// The callback's error.
        source: BoxError,
    },

    /// The update callback failed. The existing handle is kept.
    #[error("resource update failed at slot {slot}: {source}")]
    UpdateFailed {
        /// Call-site index within the component instance.
        slot: usize,
        /// The callback's error.
        source: BoxError,
    },

    /// The destroy callback failed. The handle is considered released.
    #[error("resource destroy failed at slot {slot}: {source}")]
    DestroyFailed {
        /// Call-site index within the component instance.
        slot: usize,
        /// The callback's error.
        source: BoxError,
    },

    /// The kind of hook at a call site changed between renders. The old
    /// slot is unmounted and the call site remounts fresh.
    #[error("hook order violation at slot {slot}: expected {prev}, got {next}")]
    HookOrderViolation {
        /// Call-site index within the component instance.
        slot: usize,
        /// Hook kind recorded at the previous commit.
        prev: &'static str,
        /// Hook kind staged by this render.
        next: &'static str,
    },
}
