//! Runtime harness - the minimal surrounding-renderer contract.
//!
//! The lifecycle primitive needs four things from a renderer: per-call-site
//! storage with stable call-site indexing, a commit-phase hook, an
//! unmount-phase hook, and a commit-error channel. This module provides the
//! smallest host that satisfies that contract:
//!
//! - [`Root`] - render/commit driver, unmount path, error channel
//! - [`PendingCommit`] - an uncommitted render pass (drop to discard)
//! - [`use_resource_effect`] / [`use_memo`] - the hook entry points

mod hooks;
mod instance;
mod root;

pub use hooks::{use_memo, use_resource_effect};
pub use root::{PendingCommit, Root};
