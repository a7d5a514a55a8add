//! Commit-Time Action Runner - executes scheduled actions in order.
//!
//! Runs strictly after the host-mutation point of a commit, once per
//! committed render per slot. Per-slot sequence: previous destroy → create →
//! update, or update only, or nothing. Callback errors are pushed onto the
//! commit-error channel and bookkeeping still advances; nothing is retried
//! within a commit.

use log::{trace, warn};

use crate::error::CommitError;
use crate::scheduler::{ActionFlags, EffectDescriptor};
use crate::slot::ResourceSlot;
use crate::types::SlotState;

// =============================================================================
// Commit actions
// =============================================================================

/// Execute an action plan against one slot, consuming the descriptor.
///
/// Bookkeeping rules on failure:
/// - create fails: no handle recorded, paired update skipped, deps and the
///   new destroy closure still recorded (no retry until deps change);
/// - update fails: existing handle kept;
/// - destroy fails: handle considered released, never destroyed again.
pub(crate) fn run_actions(
    slot_index: usize,
    slot: &mut ResourceSlot,
    flags: ActionFlags,
    desc: EffectDescriptor,
    errors: &mut Vec<CommitError>,
) {
    let EffectDescriptor {
        create,
        create_deps,
        update,
        update_deps,
        destroy,
    } = desc;

    if flags.is_empty() {
        // No callback runs this commit, but the destroy closure is refreshed
        // so unmount always uses the latest committed closure environment.
        slot.set_destroy(destroy);
        return;
    }

    slot.set_state(if slot.state() == SlotState::Unmounted {
        SlotState::Mounting
    } else {
        SlotState::Updating
    });

    if flags.contains(ActionFlags::DESTROY) {
        // Old handle, previous commit's destroy closure.
        let resource = slot.take_resource();
        let destroy_prev = slot.take_destroy();
        if let (Some(resource), Some(destroy_prev)) = (resource, destroy_prev) {
            trace!("slot {slot_index}: destroy old resource");
            if let Err(source) = destroy_prev(resource) {
                errors.push(CommitError::DestroyFailed {
                    slot: slot_index,
                    source,
                });
            }
        }
    }

    if flags.contains(ActionFlags::CREATE) {
        trace!("slot {slot_index}: create resource");
        match (create)() {
            Ok(resource) => slot.write(Some(resource), create_deps),
            Err(source) => {
                slot.write(None, create_deps);
                errors.push(CommitError::CreateFailed {
                    slot: slot_index,
                    source,
                });
            }
        }
    }

    if flags.contains(ActionFlags::UPDATE) {
        if let Some(resource) = slot.resource().cloned() {
            trace!("slot {slot_index}: update resource");
            match (update)(resource) {
                // The update may return a different handle; identity is
                // whatever the callback says it is.
                Ok(next) => slot.put_resource(next),
                Err(source) => errors.push(CommitError::UpdateFailed {
                    slot: slot_index,
                    source,
                }),
            }
        } else {
            // Create failed this commit or a previous one: nothing to update.
            warn!("slot {slot_index}: update skipped, no live resource");
        }
        slot.set_update_deps(update_deps);
    }

    slot.set_destroy(destroy);
    slot.set_state(SlotState::Mounted);
}

/// Unmount-time destroy: exactly once, iff a live handle exists.
pub(crate) fn run_unmount(
    slot_index: usize,
    slot: &mut ResourceSlot,
    errors: &mut Vec<CommitError>,
) {
    slot.set_state(SlotState::Unmounting);
    if let Some(resource) = slot.take_resource() {
        if let Some(destroy) = slot.take_destroy() {
            trace!("slot {slot_index}: destroy on unmount");
            if let Err(source) = destroy(resource) {
                errors.push(CommitError::DestroyFailed {
                    slot: slot_index,
                    source,
                });
            }
        }
    }
    slot.clear();
}

// =============================================================================
// Tests
// =============================================================================
