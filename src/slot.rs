//! Hook slots - per-call-site storage surviving across renders.
//!
//! A component instance owns an ordered list of [`HookSlot`]s indexed by
//! call order (stable call-site indexing). Slots are pure data holders:
//! all decision logic lives in the scheduler, all mutation happens in the
//! commit-time action runner.

use std::any::Any;
use std::rc::Rc;

use log::warn;

use crate::deps::{self, Comparison, Dep};
use crate::types::{DestroyFn, Resource, SlotState};

// =============================================================================
// Resource Slot
// =============================================================================

/// Storage for one resource-effect call site.
///
/// Holds the current resource handle, the dependency lists captured at the
/// last create / last update, the destroy closure from the last committed
/// render, and the lifecycle state.
///
/// Invariant: `resource` is `Some` iff create has run successfully and
/// destroy has not yet run for the current epoch.
#[derive(Default)]
pub struct ResourceSlot {
    resource: Option<Resource>,
    create_deps: Option<Box<[Dep]>>,
    update_deps: Option<Box<[Dep]>>,
    destroy: Option<DestroyFn>,
    state: SlotState,
}

impl ResourceSlot {
    /// Empty slot, never committed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current resource handle, if one is live.
    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Dependency list captured at the last create (including a failed one).
    /// `None` means this call site has never committed.
    pub fn create_deps(&self) -> Option<&[Dep]> {
        self.create_deps.as_deref()
    }

    /// Dependency list captured at the last update.
    pub fn update_deps(&self) -> Option<&[Dep]> {
        self.update_deps.as_deref()
    }

    /// Lifecycle state of the slot.
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Begin a new epoch: record the create deps and the handle the create
    /// callback produced (`None` when create failed).
    pub(crate) fn write(&mut self, resource: Option<Resource>, create_deps: Box<[Dep]>) {
        self.resource = resource;
        self.create_deps = Some(create_deps);
    }

    /// Record the deps captured at the last update.
    pub(crate) fn set_update_deps(&mut self, update_deps: Box<[Dep]>) {
        self.update_deps = Some(update_deps);
    }

    /// Replace the handle (an update callback may return a different one).
    pub(crate) fn put_resource(&mut self, resource: Resource) {
        self.resource = Some(resource);
    }

    /// Take the handle out for destroy. Leaves the slot with no live handle.
    pub(crate) fn take_resource(&mut self) -> Option<Resource> {
        self.resource.take()
    }

    /// Refresh the destroy closure from the latest committed render.
    pub(crate) fn set_destroy(&mut self, destroy: DestroyFn) {
        self.destroy = Some(destroy);
    }

    /// Take the destroy closure. Each closure runs at most once.
    pub(crate) fn take_destroy(&mut self) -> Option<DestroyFn> {
        self.destroy.take()
    }

    pub(crate) fn set_state(&mut self, state: SlotState) {
        self.state = state;
    }

    /// Release everything. The slot returns to [`SlotState::Unmounted`].
    pub(crate) fn clear(&mut self) {
        self.resource = None;
        self.create_deps = None;
        self.update_deps = None;
        self.destroy = None;
        self.state = SlotState::Unmounted;
    }
}

// =============================================================================
// Memo Slot
// =============================================================================

/// Storage for one memo call site: the memoized value and the deps it was
/// computed under.
#[derive(Default)]
pub struct MemoSlot {
    value: Option<Rc<dyn Any>>,
    deps: Option<Box<[Dep]>>,
}

impl MemoSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed value if the deps are unchanged, else `None` (recompute).
    pub(crate) fn value_if_unchanged(&self, next: &[Dep]) -> Option<Rc<dyn Any>> {
        match deps::compare(self.deps.as_deref(), next) {
            Comparison::Unchanged => self.value.clone(),
            Comparison::Changed => None,
            Comparison::ArityMismatch { prev, next } => {
                warn!("memo dependency arity changed ({prev} -> {next}), recomputing");
                None
            }
        }
    }

    pub(crate) fn write(&mut self, value: Rc<dyn Any>, deps: Box<[Dep]>) {
        self.value = Some(value);
        self.deps = Some(deps);
    }
}

// =============================================================================
// Hook Slot
// =============================================================================

/// One entry in a component instance's ordered slot list.
pub enum HookSlot {
    /// A `use_resource_effect` call site.
    Resource(ResourceSlot),
    /// A `use_memo` call site.
    Memo(MemoSlot),
}

impl HookSlot {
    /// Human-readable kind, used in hook-order violation reports.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            HookSlot::Resource(_) => "resource",
            HookSlot::Memo(_) => "memo",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
