//! Frame scheduling.
//!
//! Hosts implement [`FrameScheduler`] on top of whatever drives their display
//! refresh (`requestAnimationFrame`, a vsync callback, a fixed-step loop).
//! [`ManualFrameScheduler`] is a deterministic implementation for tests and
//! headless runs: nothing happens until the owner calls
//! [`ManualFrameScheduler::run_frame`].

use std::cell::RefCell;

use slotmap::SlotMap;

use crate::animation::Clock;

slotmap::new_key_type! {
    /// Identifies one outstanding frame request.
    pub struct FrameHandle;
}

pub type FrameCallback = Box<dyn FnOnce(f64)>;

pub trait FrameScheduler: Clock {
    /// Runs `callback` once on the next frame with that frame's timestamp.
    ///
    /// Returns `None` when the host cannot schedule frames; the callback is
    /// dropped without running.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle>;

    /// Drops a pending request. Unknown or already-run handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

#[derive(Default)]
pub struct ManualFrameScheduler {
    inner: RefCell<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    now: f64,
    pending: SlotMap<FrameHandle, FrameCallback>,
    order: Vec<FrameHandle>,
    refusing: bool,
    frames_run: u64,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every request is refused, as on a host without a display.
    pub fn set_refusing(&self, refusing: bool) {
        self.inner.borrow_mut().refusing = refusing;
    }

    /// Moves the clock without running any frame.
    pub fn set_now(&self, now: f64) {
        self.inner.borrow_mut().now = now;
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.inner.borrow().pending.contains_key(handle)
    }

    pub fn frames_run(&self) -> u64 {
        self.inner.borrow().frames_run
    }

    /// Runs every callback that was pending when the frame began, in request
    /// order, and returns how many ran. Requests made by those callbacks wait
    /// for the next frame.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let batch = {
            let mut inner = self.inner.borrow_mut();
            inner.now = timestamp;
            inner.frames_run += 1;
            std::mem::take(&mut inner.order)
        };

        let mut ran = 0;
        for handle in batch {
            // Cancelled earlier in this frame if missing.
            let callback = self.inner.borrow_mut().pending.remove(handle);
            if let Some(callback) = callback {
                callback(timestamp);
                ran += 1;
            }
        }
        log::trace!("frame @{timestamp}ms ran {ran} callbacks");
        ran
    }

    pub fn advance_by(&self, millis: f64) -> usize {
        let next = self.now() + millis;
        self.run_frame(next)
    }

    /// Runs frames every `step` milliseconds up to and including `until`.
    /// A non-positive `step` runs nothing.
    pub fn run_until(&self, until: f64, step: f64) -> usize {
        if step.is_nan() || step <= 0.0 {
            return 0;
        }
        let mut ran = 0;
        let mut t = self.now();
        while t + step <= until {
            t += step;
            ran += self.run_frame(t);
        }
        ran
    }
}

impl Clock for ManualFrameScheduler {
    fn now(&self) -> f64 {
        self.inner.borrow().now
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let mut inner = self.inner.borrow_mut();
        if inner.refusing {
            return None;
        }
        let handle = inner.pending.insert(callback);
        inner.order.push(handle);
        Some(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        if inner.pending.remove(handle).is_some() {
            inner.order.retain(|h| *h != handle);
        }
    }
}
