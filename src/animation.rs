//! Time-based interpolation of widget motion.
//!
//! An animation is a pure function of elapsed time: callers poll
//! [`MoveAnimation::value_at`] each frame with the current instant and drop
//! the entry once [`MoveAnimation::finished`] reports true. Nothing here
//! reads the clock or keeps per-frame state, which keeps the whole module
//! testable without sleeping.

use std::time::{Duration, Instant};

use crate::constants::{LAYOUT_ANIMATION_MS, PROGRESS_ANIMATION_MS};
use crate::geometry::PointF;

/// Named easing curves.
///
/// `EaseOutCubic` is used for layout moves and fade-ins, `EaseOutQuad` for
/// slide-ins; both decelerate toward the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    EaseOutCubic,
    EaseOutQuad,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
        }
    }
}

/// A scalar value easing from `start` to `target` over `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    pub start: f32,
    pub target: f32,
    pub started: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl Animation {
    pub fn new(start: f32, target: f32, started: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            start,
            target,
            started,
            duration,
            easing,
        }
    }

    /// A generic progress/fade animation with the default duration.
    pub fn progress(start: f32, target: f32, started: Instant, easing: Easing) -> Self {
        Self::new(
            start,
            target,
            started,
            Duration::from_millis(PROGRESS_ANIMATION_MS),
            easing,
        )
    }

    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        let eased = self.easing.apply(self.progress_at(now));
        self.start + (self.target - self.start) * eased
    }

    pub fn finished(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}

/// A bubble position easing toward its layout target.
///
/// The target always equals the position the layout engine declared when the
/// animation was created; callers snap the widget to `target` and drop the
/// entry once `finished`.
#[derive(Debug, Clone, Copy)]
pub struct MoveAnimation {
    pub start: PointF,
    pub target: PointF,
    pub started: Instant,
    pub duration: Duration,
    pub easing: Easing,
}

impl MoveAnimation {
    /// A layout reposition animation (fixed 300 ms, cubic ease-out).
    pub fn layout(start: PointF, target: PointF, started: Instant) -> Self {
        Self {
            start,
            target,
            started,
            duration: Duration::from_millis(LAYOUT_ANIMATION_MS),
            easing: Easing::EaseOutCubic,
        }
    }

    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now: Instant) -> PointF {
        let eased = self.easing.apply(self.progress_at(now));
        PointF::new(
            self.start.x + (self.target.x - self.start.x) * eased,
            self.start.y + (self.target.y - self.start.y) * eased,
        )
    }

    pub fn finished(&self, now: Instant) -> bool {
        self.progress_at(now) >= 1.0
    }
}
