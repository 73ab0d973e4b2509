//! Frame-driven widgets on top of `spindle-core`.
//!
//! - [`motion`] — `Motion` elements that rotate on a frame loop with repeat
//!   and delay support.
//! - [`progress`] / [`progress_bar`] — eased loading progress and the bar
//!   that displays it.
//! - [`cursor`] — pointer followers coordinated by a shared zone registry.
//! - [`document_tab`] — route-driven tab title and favicon.
//! - [`funnel`] — ordered step flows, optionally mirrored into history.
//!
//! Everything here is single-threaded: collaborators are shared through
//! `Rc` and frame callbacks hold only weak references back to their owners.

pub mod cursor;
pub mod document_tab;
pub mod funnel;
pub mod motion;
pub mod progress;
pub mod progress_bar;

pub use cursor::{CursorZoneRegistry, FollowerOptions, MouseFollower};
pub use document_tab::{
    DocumentMeta, DocumentSurface, DocumentTab, DocumentTabOverride, MemoryDocument, match_route,
};
pub use funnel::{Funnel, FunnelError, FunnelMeta, FunnelStep, History, MemoryHistory};
pub use motion::{ElementKind, Motion, apply_rotation};
pub use progress::{COMPLETE_DURATION, Progress, ProgressConfig, ProgressError};
pub use progress_bar::ProgressBar;
