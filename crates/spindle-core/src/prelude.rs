pub use crate::animation::{
    AnimationSpec, Clock, Easing, Phase, Repeat, RotationRun, SystemClock, Tick,
};
pub use crate::color::Color;
pub use crate::effects::Dispose;
pub use crate::error::MotionError;
pub use crate::frame::{FrameCallback, FrameHandle, FrameScheduler, ManualFrameScheduler};
pub use crate::geometry::{BoundingRect, Rect, Vec2};
pub use crate::signal::{Signal, SubId, signal};
pub use crate::style::{StyleMap, StyleProps, StyleSurface, apply_styles, css_number};
