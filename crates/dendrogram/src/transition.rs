//! Time-sliced transitions sampled against a host clock.
//!
//! Nothing here owns a timer. The host passes the current time (a
//! `Duration` since mount) and every [`Tween`] is evaluated on demand, so
//! the same scene can be driven by any frame loop.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tree_model::Point;

/// Easing curve applied to transition progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[display(fmt = "linear")]
    Linear,
    /// Slow start and end; the usual default for tree transitions.
    #[default]
    #[display(fmt = "cubic-in-out")]
    CubicInOut,
    #[display(fmt = "cubic-out")]
    CubicOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
        }
    }
}

/// Values that can be interpolated by a [`Tween`].
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, to: f32, t: f32) -> f32 {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, to: Point, t: f32) -> Point {
        Point::lerp(self, to, t)
    }
}

/// Duration and easing shared by every tween of a reconcile pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionSpec {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// A transition that completes immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Easing::Linear)
    }

    /// Start a tween at `now`.
    pub fn tween<T: Lerp>(&self, from: T, to: T, now: Duration) -> Tween<T> {
        Tween {
            from,
            to,
            start: now,
            duration: self.duration,
            easing: self.easing,
        }
    }
}

/// A value moving from `from` to `to` over `[start, start + duration]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween<T> {
    from: T,
    to: T,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    /// A tween that already sits at `value`.
    pub fn settled(value: T) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// Value at time `now`.
    pub fn sample(&self, now: Duration) -> T {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        self.from.lerp(self.to, self.easing.apply(progress))
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// True once the end value is reached.
    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }

    /// Where the tween is heading.
    pub fn target(&self) -> T {
        self.to
    }

    /// Where the tween started.
    pub fn origin(&self) -> T {
        self.from
    }

    /// Head for a new target, continuing from the value at `now`.
    pub fn retarget(&mut self, to: T, now: Duration, spec: &TransitionSpec) {
        *self = spec.tween(self.sample(now), to, now);
    }
}
