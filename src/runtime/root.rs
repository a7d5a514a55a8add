//! Root - render/commit driver and unmount path.
//!
//! A [`Root`] hosts one component instance and drives discrete
//! render → commit cycles:
//!
//! 1. [`Root::prepare`] runs the component body with a render frame
//!    installed; hooks stage descriptors, nothing observable happens.
//! 2. The returned [`PendingCommit`] is either committed (plans are
//!    computed against the committed slots, the action runner executes
//!    them in declaration order) or dropped, which discards the render
//!    with no observable effect (speculative work).
//! 3. [`Root::unmount`] destroys every live resource exactly once, in
//!    declaration order, and releases the instance.
//!
//! The commit-error channel collects everything the commit surfaced; drain
//! it with [`Root::take_errors`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};

use crate::commit;
use crate::error::CommitError;
use crate::scheduler;
use crate::slot::{HookSlot, MemoSlot, ResourceSlot};

use super::instance::{ComponentInstance, FrameGuard, InstanceCell, StagedHook};

// =============================================================================
// Root
// =============================================================================

/// Hosts one component instance and its commit-error channel.
pub struct Root {
    instance: InstanceCell,
    errors: Vec<CommitError>,
}

impl Root {
    /// Fresh root with no mounted instance.
    pub fn new() -> Self {
        Self {
            instance: Rc::new(RefCell::new(None)),
            errors: Vec::new(),
        }
    }

    /// Render and commit in one step.
    ///
    /// The component body runs immediately (pure staging); the staged work
    /// is then committed. Equivalent to `self.prepare(component).commit()`.
    pub fn render(&mut self, component: impl FnOnce()) {
        self.prepare(component).commit();
    }

    /// Run a render pass without committing it.
    ///
    /// Dropping the returned [`PendingCommit`] discards the render: no
    /// scheduled action executes and the previously committed state remains
    /// authoritative.
    pub fn prepare(&mut self, component: impl FnOnce()) -> PendingCommit<'_> {
        let guard = FrameGuard::push(Rc::clone(&self.instance));
        component();
        let frame = guard.finish();
        PendingCommit {
            root: self,
            staged: frame.staged,
        }
    }

    /// Unmount the instance: destroy every live resource exactly once, in
    /// declaration order, then release all slots.
    ///
    /// A no-op when nothing is mounted. Rendering again after unmount
    /// mounts a fresh instance.
    pub fn unmount(&mut self) {
        let Some(mut instance) = self.instance.borrow_mut().take() else {
            return;
        };
        debug!("unmounting instance with {} slots", instance.slots.len());
        for (index, slot) in instance.slots.iter_mut().enumerate() {
            if let HookSlot::Resource(slot) = slot {
                commit::run_unmount(index, slot, &mut self.errors);
            }
        }
    }

    /// Drain the commit-error channel.
    pub fn take_errors(&mut self) -> Vec<CommitError> {
        std::mem::take(&mut self.errors)
    }
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        // Resources must not outlive their root.
        self.unmount();
    }
}

// =============================================================================
// Pending Commit
// =============================================================================

/// A completed render pass that has not been committed yet.
///
/// Commit with [`PendingCommit::commit`]; drop to discard. Only one pending
/// commit can exist per root at a time (it borrows the root mutably), so
/// actions from commit N always complete before commit N+1 begins.
pub struct PendingCommit<'a> {
    root: &'a mut Root,
    staged: Vec<StagedHook>,
}

impl PendingCommit<'_> {
    /// Apply the render: reconcile slots, plan each resource effect, and
    /// run the planned actions.
    ///
    /// Host-tree mutation is an external collaborator; this runs at the
    /// point strictly after it, matching standard effect timing.
    pub fn commit(self) {
        let PendingCommit { root, staged } = self;
        let staged_len = staged.len();

        let mut cell = root.instance.borrow_mut();
        let instance = cell.get_or_insert_with(ComponentInstance::default);
        let errors = &mut root.errors;

        for (index, staged_hook) in staged.into_iter().enumerate() {
            reconcile_slot(instance, index, &staged_hook, errors);
            let slot = &mut instance.slots[index];
            match (slot, staged_hook) {
                (HookSlot::Memo(memo), StagedHook::Memo(Some((value, deps)))) => {
                    memo.write(value, deps);
                }
                (HookSlot::Memo(_), StagedHook::Memo(None)) => {}
                (HookSlot::Resource(slot), StagedHook::Resource(descriptor)) => {
                    let flags = scheduler::plan(index, slot, &descriptor, errors);
                    commit::run_actions(index, slot, flags, descriptor, errors);
                }
                // reconcile_slot guarantees matching kinds.
                _ => unreachable!("slot kind reconciled before dispatch"),
            }
        }

        // Fewer hook calls than committed slots: the extra call sites are
        // gone, release their resources.
        if staged_len < instance.slots.len() {
            error!(
                "render staged {} hooks but {} slots are committed",
                staged_len,
                instance.slots.len()
            );
            errors.push(CommitError::HookOrderViolation {
                slot: staged_len,
                prev: instance.slots[staged_len].kind(),
                next: "none",
            });
            for (offset, slot) in instance.slots[staged_len..].iter_mut().enumerate() {
                if let HookSlot::Resource(slot) = slot {
                    commit::run_unmount(staged_len + offset, slot, errors);
                }
            }
            instance.slots.truncate(staged_len);
        }
    }
}

/// Make sure `instance.slots[index]` exists and matches the staged kind.
///
/// A kind mismatch is a hook-order violation: the old slot is unmounted
/// (its resource destroyed exactly once) and the call site remounts fresh.
fn reconcile_slot(
    instance: &mut ComponentInstance,
    index: usize,
    staged: &StagedHook,
    errors: &mut Vec<CommitError>,
) {
    let fresh = || match staged {
        StagedHook::Resource(_) => HookSlot::Resource(ResourceSlot::new()),
        StagedHook::Memo(_) => HookSlot::Memo(MemoSlot::new()),
    };

    if index == instance.slots.len() {
        instance.slots.push(fresh());
        return;
    }

    let current = &mut instance.slots[index];
    if current.kind() != staged.kind() {
        error!(
            "hook order violation at slot {index}: {} -> {}",
            current.kind(),
            staged.kind()
        );
        errors.push(CommitError::HookOrderViolation {
            slot: index,
            prev: current.kind(),
            next: staged.kind(),
        });
        if let HookSlot::Resource(slot) = current {
            commit::run_unmount(index, slot, errors);
        }
        *current = fresh();
    }
}
