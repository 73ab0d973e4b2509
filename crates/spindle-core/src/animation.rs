use std::time::Duration;

use web_time::Instant;

use crate::error::MotionError;

/// Timing curve named in the `transition` hint.
///
/// Interpolation of the rotation itself is always linear in elapsed time; the
/// easing only travels to the surface as `transition: transform <easing>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Easing {
    #[default]
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn css_name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::Ease => "ease",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

/// How many cycles an animation runs before stopping on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Repeat {
    Count(u32),
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(1)
    }
}

impl Repeat {
    /// True once `completed` cycles satisfy this repeat setting.
    pub fn is_exhausted(&self, completed: u32) -> bool {
        match self {
            Repeat::Count(n) => completed >= *n,
            Repeat::Infinite => false,
        }
    }
}

/// Immutable description of one rotation animation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AnimationSpec {
    pub target_rotation_degrees: f64,
    pub duration: Duration,
    pub repeat: Repeat,
    pub easing: Easing,
    pub repeat_delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            target_rotation_degrees: 0.0,
            duration: Duration::from_secs(1),
            repeat: Repeat::Count(1),
            easing: Easing::Linear,
            repeat_delay: Duration::ZERO,
        }
    }
}

impl AnimationSpec {
    /// A single linear one-second turn to `degrees`.
    pub fn rotate(degrees: f64) -> Self {
        Self {
            target_rotation_degrees: degrees,
            ..Self::default()
        }
    }

    /// Full turns forever, one every `period`.
    pub fn spin(period: Duration) -> Self {
        Self {
            target_rotation_degrees: 360.0,
            duration: period,
            repeat: Repeat::Infinite,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_repeat_delay(mut self, delay: Duration) -> Self {
        self.repeat_delay = delay;
        self
    }

    pub fn duration_millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }

    pub fn repeat_delay_millis(&self) -> f64 {
        self.repeat_delay.as_secs_f64() * 1000.0
    }

    /// Rejects configurations that would otherwise produce NaN rotations.
    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.target_rotation_degrees.is_finite() {
            return Err(MotionError::NonFiniteRotation(self.target_rotation_degrees));
        }
        if self.duration.is_zero() {
            return Err(MotionError::NonPositiveDuration);
        }
        if self.repeat == Repeat::Count(0) {
            return Err(MotionError::ZeroRepeatCount);
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    InDelay,
    Stopped,
}

/// What a frame should do with the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// Render this rotation and request another frame.
    Continue(f64),
    /// Render this rotation; nothing further is scheduled.
    Finish(f64),
    /// Already stopped: no write, no frame.
    Idle,
}

/// Mutable bookkeeping for one bound rotation.
///
/// Only one of `cycle_start` / `delay_start` is ever `Some`.
#[derive(Clone, Debug)]
pub struct RotationRun {
    spec: AnimationSpec,
    phase: Phase,
    iterations_completed: u32,
    cycle_start: Option<f64>,
    delay_start: Option<f64>,
}

impl RotationRun {
    pub fn new(spec: AnimationSpec) -> Self {
        Self {
            spec,
            phase: Phase::Stopped,
            iterations_completed: 0,
            cycle_start: None,
            delay_start: None,
        }
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn iterations_completed(&self) -> u32 {
        self.iterations_completed
    }

    pub fn cycle_start(&self) -> Option<f64> {
        self.cycle_start
    }

    pub fn delay_start(&self) -> Option<f64> {
        self.delay_start
    }

    /// Begins the first cycle at `now`, discarding any previous progress.
    pub fn start(&mut self, now: f64) {
        self.phase = Phase::Running;
        self.iterations_completed = 0;
        self.cycle_start = Some(now);
        self.delay_start = None;
    }

    pub fn stop(&mut self) {
        self.phase = Phase::Stopped;
        self.cycle_start = None;
        self.delay_start = None;
    }

    /// Advances the machine to `now` and reports what to render.
    pub fn tick(&mut self, now: f64) -> Tick {
        match self.phase {
            Phase::Stopped => Tick::Idle,
            Phase::InDelay => {
                let delay_start = *self.delay_start.get_or_insert(now);
                if now - delay_start < self.spec.repeat_delay_millis() {
                    return Tick::Continue(0.0);
                }
                self.phase = Phase::Running;
                self.delay_start = None;
                self.cycle_start = Some(now);
                self.advance_cycle(now)
            }
            Phase::Running => self.advance_cycle(now),
        }
    }

    fn advance_cycle(&mut self, now: f64) -> Tick {
        let start = *self.cycle_start.get_or_insert(now);
        let elapsed = now - start;
        let duration = self.spec.duration_millis();

        if elapsed >= duration {
            self.iterations_completed = self.iterations_completed.saturating_add(1);
            if self.spec.repeat.is_exhausted(self.iterations_completed) {
                self.stop();
                return Tick::Finish(self.spec.target_rotation_degrees);
            }
            self.phase = Phase::InDelay;
            self.cycle_start = None;
            self.delay_start = Some(now);
            return Tick::Continue(0.0);
        }

        let ratio = (elapsed / duration).clamp(0.0, 1.0);
        Tick::Continue(self.spec.target_rotation_degrees * ratio)
    }
}

/// Monotonic time source in milliseconds; frame timestamps share its origin.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock measured from construction, like `performance.now()`.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
