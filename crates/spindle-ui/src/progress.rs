use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spindle_core::{Dispose, FrameHandle, FrameScheduler, Signal};
use thiserror::Error;

pub const PROGRESS_MIN: f64 = 0.0;
pub const PROGRESS_MAX: f64 = 100.0;
/// How long `complete()` takes to run the bar out to 100.
pub const COMPLETE_DURATION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressError {
    #[error("duration must be greater than 0")]
    NonPositiveDuration,
    #[error("initial progress must be between 0 and 100, got {0}")]
    InitialOutOfRange(f64),
    #[error("target progress must be between 0 and 100, got {0}")]
    TargetOutOfRange(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressConfig {
    pub duration: Duration,
    pub initial: f64,
    pub target: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(5000),
            initial: PROGRESS_MIN,
            target: PROGRESS_MAX,
        }
    }
}

impl ProgressConfig {
    pub fn validate(&self) -> Result<(), ProgressError> {
        let in_range = |v: f64| (PROGRESS_MIN..=PROGRESS_MAX).contains(&v);
        if self.duration.is_zero() {
            return Err(ProgressError::NonPositiveDuration);
        }
        if !in_range(self.initial) {
            return Err(ProgressError::InitialOutOfRange(self.initial));
        }
        if !in_range(self.target) {
            return Err(ProgressError::TargetOutOfRange(self.target));
        }
        Ok(())
    }
}

/// One leg of progress animation: cubic ease-out from `from` to `to`.
#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
}

impl Tween {
    fn sample(&self, now: f64) -> f64 {
        let elapsed = now - self.start;
        if elapsed >= self.duration {
            return self.to;
        }
        let ratio = (elapsed / self.duration).max(0.0);
        let eased = self.from + (self.to - self.from) * (1.0 - (1.0 - ratio).powi(3));
        (eased * 1000.0).floor() / 1000.0
    }
}

struct ProgressState {
    value: Signal<f64>,
    pending: Option<FrameHandle>,
    // Bumped on every cancel so stale callbacks can tell they were superseded.
    generation: u64,
}

/// Frame-driven progress value for loading bars.
pub struct Progress {
    scheduler: Rc<dyn FrameScheduler>,
    state: Rc<RefCell<ProgressState>>,
}

impl Progress {
    /// Validates `config` and starts animating toward its target, unless the
    /// initial value is already full.
    pub fn start(
        config: ProgressConfig,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Result<Self, ProgressError> {
        config.validate()?;
        let progress = Self {
            scheduler,
            state: Rc::new(RefCell::new(ProgressState {
                value: Signal::new(config.initial),
                pending: None,
                generation: 0,
            })),
        };
        if config.initial != PROGRESS_MAX {
            log::debug!(
                "progress: {} -> {} over {:?}",
                config.initial,
                config.target,
                config.duration
            );
            progress.animate(config.duration, config.initial, config.target);
        }
        Ok(progress)
    }

    pub fn value(&self) -> f64 {
        self.state.borrow().value.get()
    }

    pub fn is_animating(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    pub fn subscribe(&self, f: impl Fn(f64) + 'static) -> Dispose {
        self.state.borrow().value.subscribe(move |v| f(*v))
    }

    /// Runs the bar out to 100 over [`COMPLETE_DURATION`], abandoning the
    /// current animation. Does nothing once full.
    pub fn complete(&self) {
        let current = self.value();
        if current == PROGRESS_MAX {
            return;
        }
        self.cancel();
        log::debug!("progress: completing from {current}");
        self.animate(COMPLETE_DURATION, current, PROGRESS_MAX);
    }

    fn animate(&self, duration: Duration, from: f64, to: f64) {
        let tween = Tween {
            from,
            to,
            start: self.scheduler.now(),
            duration: duration.as_secs_f64() * 1000.0,
        };
        let generation = self.state.borrow().generation;
        request(&self.state, &self.scheduler, tween, generation);
    }

    fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        if let Some(handle) = state.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request(
    state: &Rc<RefCell<ProgressState>>,
    scheduler: &Rc<dyn FrameScheduler>,
    tween: Tween,
    generation: u64,
) {
    let weak_state = Rc::downgrade(state);
    let weak_scheduler = Rc::downgrade(scheduler);
    let handle = scheduler.request_frame(Box::new(move |timestamp| {
        on_frame(&weak_state, &weak_scheduler, tween, generation, timestamp)
    }));
    if handle.is_none() {
        log::warn!("progress: frame request refused; holding current value");
    }
    state.borrow_mut().pending = handle;
}

fn on_frame(
    state: &Weak<RefCell<ProgressState>>,
    scheduler: &Weak<dyn FrameScheduler>,
    tween: Tween,
    generation: u64,
    timestamp: f64,
) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let value = {
        let mut s = state.borrow_mut();
        if s.generation != generation {
            return;
        }
        s.pending = None;
        s.value.clone()
    };

    if value.get() == tween.to {
        return;
    }
    let next = tween.sample(timestamp);
    value.set(next);
    if next == tween.to {
        log::debug!("progress: reached {next}");
        return;
    }
    // A subscriber may have called `complete()` during the write above.
    if state.borrow().generation != generation {
        return;
    }
    if let Some(scheduler) = scheduler.upgrade() {
        request(&state, &scheduler, tween, generation);
    }
}
