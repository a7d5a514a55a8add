//! Lifecycle Effect Scheduler - decides which actions a commit performs.
//!
//! Evaluated once per committed render per resource slot. Planning is pure:
//! it reads the slot as committed by the previous render, diffs both
//! dependency lists, and produces an [`ActionFlags`] plan. Execution is the
//! commit runner's job (see `commit`).
//!
//! Decision table:
//!
//! | slot state            | create deps | update deps | plan                        |
//! |-----------------------|-------------|-------------|-----------------------------|
//! | never committed       | -           | -           | CREATE, UPDATE              |
//! | committed, live       | changed     | -           | DESTROY, CREATE, UPDATE     |
//! | committed, create err | changed     | -           | CREATE, UPDATE              |
//! | committed             | unchanged   | changed     | UPDATE                      |
//! | committed             | unchanged   | unchanged   | (none)                      |
//!
//! Create always implies an initial update pass with the same commit's
//! update deps; once create deps change the old update deps are irrelevant,
//! the replacement is always total.

use bitflags::bitflags;
use log::debug;

use crate::deps::{self, Comparison, Dep};
use crate::error::CommitError;
use crate::slot::ResourceSlot;
use crate::types::{BoxError, CreateFn, DestroyFn, Resource, UpdateFn};

// =============================================================================
// Action Flags
// =============================================================================

bitflags! {
    /// Actions scheduled for one slot in one commit.
    ///
    /// Execution order within a slot is fixed: DESTROY (old handle), then
    /// CREATE, then UPDATE (new handle).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ActionFlags: u8 {
        /// Run the previous commit's destroy closure on the old handle.
        const DESTROY = 1 << 0;
        /// Run this render's create callback.
        const CREATE = 1 << 1;
        /// Run this render's update callback.
        const UPDATE = 1 << 2;
    }
}

// =============================================================================
// Effect Descriptor
// =============================================================================

/// Everything one render pass declares for one resource-effect call site.
///
/// Ephemeral: produced during render, consumed at commit. A descriptor from
/// a discarded render is simply dropped with no observable effect.
pub struct EffectDescriptor {
    pub(crate) create: CreateFn,
    pub(crate) create_deps: Box<[Dep]>,
    pub(crate) update: UpdateFn,
    pub(crate) update_deps: Box<[Dep]>,
    pub(crate) destroy: DestroyFn,
}

impl EffectDescriptor {
    /// Box the three callbacks and capture both dependency lists.
    pub fn new<C, U, D>(
        create: C,
        create_deps: Vec<Dep>,
        update: U,
        update_deps: Vec<Dep>,
        destroy: D,
    ) -> Self
    where
        C: FnOnce() -> Result<Resource, BoxError> + 'static,
        U: FnOnce(Resource) -> Result<Resource, BoxError> + 'static,
        D: FnOnce(Resource) -> Result<(), BoxError> + 'static,
    {
        Self {
            create: Box::new(create),
            create_deps: create_deps.into_boxed_slice(),
            update: Box::new(update),
            update_deps: update_deps.into_boxed_slice(),
            destroy: Box::new(destroy),
        }
    }

    /// Dependency list compared against the slot's stored create deps.
    pub fn create_deps(&self) -> &[Dep] {
        &self.create_deps
    }

    /// Dependency list compared against the slot's stored update deps.
    pub fn update_deps(&self) -> &[Dep] {
        &self.update_deps
    }
}

// =============================================================================
// Planning
// =============================================================================

/// Produce the action plan for one slot at commit time.
///
/// Pure with respect to the slot; the only side effects are log lines and
/// arity-mismatch reports pushed onto the commit-error channel (an arity
/// mismatch is fatal in development builds).
pub fn plan(
    slot_index: usize,
    slot: &ResourceSlot,
    desc: &EffectDescriptor,
    errors: &mut Vec<CommitError>,
) -> ActionFlags {
    // First reach of this call site: mount.
    if slot.create_deps().is_none() {
        debug!("slot {slot_index}: mount");
        return ActionFlags::CREATE | ActionFlags::UPDATE;
    }

    let create_cmp = resolve(slot_index, deps::compare(slot.create_deps(), &desc.create_deps), errors);
    if create_cmp == Comparison::Changed {
        // Full replacement, never a partial one. Nothing to destroy when the
        // previous create failed.
        let mut flags = ActionFlags::CREATE | ActionFlags::UPDATE;
        if slot.resource().is_some() {
            flags |= ActionFlags::DESTROY;
            debug!("slot {slot_index}: replace (create deps changed)");
        } else {
            debug!("slot {slot_index}: recreate after failed create");
        }
        return flags;
    }

    let update_cmp = resolve(slot_index, deps::compare(slot.update_deps(), &desc.update_deps), errors);
    if update_cmp == Comparison::Changed {
        debug!("slot {slot_index}: update (update deps changed)");
        return ActionFlags::UPDATE;
    }

    debug!("slot {slot_index}: no-op (deps unchanged)");
    ActionFlags::empty()
}

/// Map an arity mismatch to `Changed`, reporting the invariant violation.
///
/// Fatal in development builds; release builds report the error and fall
/// back to treating the list as changed.
fn resolve(slot_index: usize, cmp: Comparison, errors: &mut Vec<CommitError>) -> Comparison {
    match cmp {
        Comparison::ArityMismatch { prev, next } => {
            debug_assert!(
                false,
                "dependency list arity changed at slot {slot_index}: {prev} -> {next} entries"
            );
            errors.push(CommitError::DepsArityMismatch {
                slot: slot_index,
                prev,
                next,
            });
            Comparison::Changed
        }
        other => other,
    }
}

// =============================================================================
// Tests
// =============================================================================
