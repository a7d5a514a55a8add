//! # spark-hooks
//!
//! Resource-lifecycle effect hooks for reactive component runtimes.
//!
//! A resource effect binds an externally-owned resource (a connection, a
//! native handle) to a component call site with *three* independent actions
//! instead of the conventional single effect:
//!
//! - `create` runs when the create deps change (full replacement of the
//!   resource, old handle destroyed first);
//! - `update` mutates the existing handle in place when only the update
//!   deps change (resource identity preserved);
//! - `destroy` runs exactly once per resource, on replacement or unmount.
//!
//! ## Architecture
//!
//! Rendering and committing are two explicit phases connected by a staging
//! queue:
//!
//! ```text
//! render (hooks stage descriptors, pure)
//!     → commit plan (dependency diffing per slot)
//!     → action runner (destroy → create → update, declaration order)
//!     → resource slots (per-call-site state for the next render)
//! ```
//!
//! A render pass that is never committed is discarded with no observable
//! effect; the previously committed slot state stays authoritative.
//!
//! ## Example
//!
//! ```ignore
//! use spark_hooks::{deps, use_memo, use_resource_effect, Root};
//!
//! let mut root = Root::new();
//! root.render(move || {
//!     let opts = use_memo(move || Options::for_user(&username), deps![username]);
//!     use_resource_effect(
//!         move || Ok(Connection::open(room_id)?),
//!         deps![room_id],
//!         move |conn| { conn.set_options(&opts); Ok(conn) },
//!         deps![opts.clone()],
//!         |conn| { conn.disconnect(); Ok(()) },
//!     );
//! });
//! // ... re-render on prop changes; the scheduler decides per commit ...
//! root.unmount();
//! ```
//!
//! ## Modules
//!
//! - [`deps`] - dependency lists and the same-value comparator
//! - [`slot`] - per-call-site storage surviving across renders
//! - [`scheduler`] - the per-commit action planner
//! - [`error`] - commit error taxonomy
//! - [`runtime`] - minimal render/commit harness and the hook entry points
//! - [`types`] - resource handle and callback types

pub mod deps;
pub mod error;
pub mod runtime;
pub mod scheduler;
pub mod slot;
pub mod types;

pub(crate) mod commit;

// Re-export commonly used items
pub use deps::{compare, Comparison, Dep};
pub use error::CommitError;
pub use runtime::{use_memo, use_resource_effect, PendingCommit, Root};
pub use scheduler::{ActionFlags, EffectDescriptor};
pub use slot::{HookSlot, MemoSlot, ResourceSlot};
pub use types::{BoxError, Resource, SlotState};
