//! Component instance and render frame context.
//!
//! A component instance owns the ordered list of hook slots for one mounted
//! component. During a render pass a [`RenderFrame`] is installed in a
//! thread-local; hooks stage their work into it. The frame is pure staging:
//! nothing observable happens until the frame is committed, and a frame
//! that is dropped instead of committed has no effect at all.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::deps::Dep;
use crate::scheduler::EffectDescriptor;
use crate::slot::HookSlot;

// =============================================================================
// Component Instance
// =============================================================================

/// Per-instance hook storage, surviving across renders until unmount.
///
/// Slots are anchored by call order: the Nth hook call of every render of
/// this instance maps to `slots[N]`.
#[derive(Default)]
pub(crate) struct ComponentInstance {
    pub(crate) slots: Vec<HookSlot>,
}

/// Shared cell holding the committed instance (`None` before first commit
/// and after unmount).
pub(crate) type InstanceCell = Rc<RefCell<Option<ComponentInstance>>>;

// =============================================================================
// Staged hooks
// =============================================================================

/// One hook call recorded during a render pass.
pub(crate) enum StagedHook {
    /// A resource-effect call site with this render's descriptor.
    Resource(EffectDescriptor),
    /// A memo call site. `None` means the committed value is still valid;
    /// `Some` carries a freshly computed value to write at commit.
    Memo(Option<(Rc<dyn Any>, Box<[Dep]>)>),
}

impl StagedHook {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            StagedHook::Resource(_) => "resource",
            StagedHook::Memo(_) => "memo",
        }
    }
}

// =============================================================================
// Render Frame
// =============================================================================

/// The in-progress render pass: staged hook calls plus read access to the
/// committed instance (memo reads only).
pub(crate) struct RenderFrame {
    pub(crate) staged: Vec<StagedHook>,
    pub(crate) instance: InstanceCell,
}

thread_local! {
    static CURRENT_FRAME: RefCell<Option<RenderFrame>> = const { RefCell::new(None) };
}

/// Run a closure against the active render frame.
///
/// # Panics
///
/// Panics if no render frame is active, i.e. a hook was called outside of a
/// component render. Hook order must be stable, so hooks may never run
/// conditionally or outside the render body.
pub(crate) fn with_frame<R>(f: impl FnOnce(&mut RenderFrame) -> R) -> R {
    CURRENT_FRAME.with(|cell| {
        let mut slot = cell.borrow_mut();
        let frame = slot
            .as_mut()
            .expect("hooks may only be called while a component is rendering");
        f(frame)
    })
}

/// Guard that installs a render frame and guarantees it is removed again,
/// even when the component body panics.
pub(crate) struct FrameGuard;

impl FrameGuard {
    /// Install a fresh frame for `instance`.
    ///
    /// # Panics
    ///
    /// Panics if a render frame is already active (nested renders are not a
    /// legal input in the cooperative single-threaded model).
    pub(crate) fn push(instance: InstanceCell) -> Self {
        CURRENT_FRAME.with(|cell| {
            let mut slot = cell.borrow_mut();
            assert!(slot.is_none(), "a render frame is already active");
            *slot = Some(RenderFrame {
                staged: Vec::new(),
                instance,
            });
        });
        FrameGuard
    }

    /// Take the completed frame out, consuming the guard.
    pub(crate) fn finish(self) -> RenderFrame {
        CURRENT_FRAME.with(|cell| cell.borrow_mut().take()).expect("render frame missing")
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        // No-op when finish() already took the frame.
        CURRENT_FRAME.with(|cell| {
            *cell.borrow_mut() = None;
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
