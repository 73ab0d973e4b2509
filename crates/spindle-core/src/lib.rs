//! # Frames, Surfaces, and Rotation State
//!
//! Spindle animates visual elements from a host-provided frame loop. The core
//! crate holds the pieces everything else is built from:
//!
//! - [`FrameScheduler`](frame::FrameScheduler) — "call me on the next frame",
//!   plus cancellation and the clock frame timestamps are measured on.
//! - [`StyleSurface`](style::StyleSurface) — the element being animated; it
//!   only has to accept `name: value` style writes.
//! - [`RotationRun`](animation::RotationRun) — the per-binding state machine
//!   that turns timestamps into rotation angles.
//! - [`Signal`](signal::Signal) and [`Dispose`](effects::Dispose) — small
//!   reactive value and cleanup handles used by the ui crate.
//!
//! ## Driving a rotation by hand
//!
//! ```rust
//! use spindle_core::*;
//!
//! let spec = AnimationSpec::rotate(180.0);
//! let mut run = RotationRun::new(spec);
//! run.start(0.0);
//!
//! assert_eq!(run.tick(500.0), Tick::Continue(90.0));
//! assert_eq!(run.tick(1000.0), Tick::Finish(180.0));
//! assert_eq!(run.phase(), Phase::Stopped);
//! ```
//!
//! ## Deterministic frames
//!
//! [`ManualFrameScheduler`](frame::ManualFrameScheduler) only runs callbacks
//! when told to, which makes frame-driven code testable without a display:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use spindle_core::*;
//!
//! let scheduler = ManualFrameScheduler::new();
//! let seen = Rc::new(Cell::new(0.0));
//! let s = seen.clone();
//! scheduler.request_frame(Box::new(move |t| s.set(t)));
//!
//! scheduler.run_frame(16.0);
//! assert_eq!(seen.get(), 16.0);
//! assert_eq!(scheduler.pending_count(), 0);
//! ```

pub mod animation;
pub mod color;
pub mod effects;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod prelude;
pub mod signal;
pub mod style;
pub mod tests;

pub use prelude::*;
