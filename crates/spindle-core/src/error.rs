use thiserror::Error;

/// Configuration errors surfaced when a rotation is bound.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotionError {
    #[error("animation duration must be greater than zero")]
    NonPositiveDuration,
    #[error("repeat count must be at least 1 (use Repeat::Infinite to loop forever)")]
    ZeroRepeatCount,
    #[error("target rotation must be finite, got {0}")]
    NonFiniteRotation(f64),
}
