//! Hook entry points - `use_resource_effect` and `use_memo`.
//!
//! Hooks must be called unconditionally, in the same order, on every render
//! of a component: call order is what anchors a hook to its slot. Calling a
//! hook outside of a render panics.

use std::any::Any;
use std::rc::Rc;

use log::error;

use crate::deps::Dep;
use crate::scheduler::EffectDescriptor;
use crate::slot::HookSlot;
use crate::types::{BoxError, Resource};

use super::instance::{with_frame, StagedHook};

// =============================================================================
// use_resource_effect
// =============================================================================

/// Bind the lifecycle of an externally-owned resource to this call site.
///
/// At every commit the scheduler diffs both dependency lists against the
/// ones recorded at the previous commit and performs one of:
///
/// - nothing, when neither list changed;
/// - `update` on the existing handle, when only `update_deps` changed
///   (resource identity is preserved);
/// - `destroy` (old handle) → `create` → `update` (new handle), when
///   `create_deps` changed: a full replacement, never a partial one;
/// - `create` → `update` on the first commit that reaches this call site.
///
/// On unmount the last committed `destroy` runs exactly once iff a live
/// handle exists. Callback errors surface on the root's commit-error
/// channel; see [`CommitError`](crate::error::CommitError) for the
/// bookkeeping rules.
///
/// ```ignore
/// use_resource_effect(
///     move || Ok(Connection::open(room_id)?),
///     deps![room_id],
///     move |conn| { conn.set_options(&opts); Ok(conn) },
///     deps![opts.clone()],
///     |conn| { conn.disconnect(); Ok(()) },
/// );
/// ```
///
/// # Panics
///
/// Panics when called outside of a component render.
pub fn use_resource_effect<R, C, U, D>(
    create: C,
    create_deps: Vec<Dep>,
    update: U,
    update_deps: Vec<Dep>,
    destroy: D,
) where
    R: Any,
    C: FnOnce() -> Result<R, BoxError> + 'static,
    U: FnOnce(Rc<R>) -> Result<Rc<R>, BoxError> + 'static,
    D: FnOnce(Rc<R>) -> Result<(), BoxError> + 'static,
{
    let descriptor = EffectDescriptor::new(
        move || create().map(|resource| Rc::new(resource) as Resource),
        create_deps,
        move |resource: Resource| {
            update(downcast::<R>(resource)?).map(|resource| resource as Resource)
        },
        update_deps,
        move |resource: Resource| destroy(downcast::<R>(resource)?),
    );
    with_frame(|frame| frame.staged.push(StagedHook::Resource(descriptor)));
}

/// Recover the typed handle from the slot's type-erased one.
///
/// Only fails when the resource type at a call site changed between renders
/// without its create deps changing, which is itself a hook-order bug; the
/// failure is reported through the commit-error channel rather than
/// panicking mid-commit.
fn downcast<R: Any>(resource: Resource) -> Result<Rc<R>, BoxError> {
    resource
        .downcast::<R>()
        .map_err(|_| BoxError::from("resource type changed at this call site"))
}

// =============================================================================
// use_memo
// =============================================================================

/// Memoize a value, recomputing only when `deps` change.
///
/// The returned `Rc` is identity-stable across renders while the deps are
/// unchanged, which makes it usable as a [`Dep::Token`] comparison key for
/// a downstream resource effect.
///
/// Computation happens during the render pass; the slot write is staged and
/// only applied when the render commits, so a discarded render leaves the
/// committed value authoritative.
///
/// # Panics
///
/// Panics when called outside of a component render.
pub fn use_memo<T, F>(compute: F, deps: Vec<Dep>) -> Rc<T>
where
    T: Any,
    F: FnOnce() -> T,
{
    // Phase 1: look up the committed slot (read-only) and reserve an index.
    let (index, committed) = with_frame(|frame| {
        let index = frame.staged.len();
        let committed = frame
            .instance
            .borrow()
            .as_ref()
            .and_then(|instance| instance.slots.get(index))
            .and_then(|slot| match slot {
                HookSlot::Memo(memo) => memo.value_if_unchanged(&deps),
                // Kind mismatch is reported at commit; recompute for now.
                HookSlot::Resource(_) => None,
            });
        (index, committed)
    });

    if let Some(value) = committed {
        match value.downcast::<T>() {
            Ok(typed) => {
                with_frame(|frame| frame.staged.push(StagedHook::Memo(None)));
                return typed;
            }
            Err(_) => {
                // Same slot, same deps, different type: stale slot from a
                // hook-order violation. Recompute below.
                error!("memo value type changed at slot {index}, recomputing");
            }
        }
    }

    // Phase 2: recompute outside any thread-local borrow, then stage the
    // write for commit time.
    let value = Rc::new(compute());
    let erased: Rc<dyn Any> = value.clone();
    with_frame(|frame| {
        frame
            .staged
            .push(StagedHook::Memo(Some((erased, deps.into_boxed_slice()))));
    });
    value
}
