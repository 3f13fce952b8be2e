//! Timed interpolation of one visual property.
//!
//! A [`Tween`] maps elapsed time to a property value:
//!
//! ```text
//! progress = min(elapsed / duration, 1)          (fixed point, 0..=1024)
//! value    = from + (to - from) * ease(progress)
//! ```
//!
//! The default easing is integer smoothstep (`3t^2 - 2t^3`), which is
//! monotonic and has zero slope at both ends. [`Easing::Overshoot`] runs
//! slightly past the end value before settling, for small bounce nudges.

use embassy_time::{Duration, Instant};

use crate::surface::{DrawableId, Property};

/// Fixed-point representation of progress 1.0.
pub const PROGRESS_ONE: u32 = 1024;

// =============================================================================
// Easing
// =============================================================================

/// Interpolation curve.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Easing {
    Linear,
    /// Slow start, slow finish.
    #[default]
    EaseInOut,
    /// Cubic bezier (0, 1000, 1300, 1024): passes the end value, then settles.
    Overshoot,
}

impl Easing {
    /// Map linear progress (0..=[`PROGRESS_ONE`]) onto the curve.
    pub fn apply(
        self,
        progress: u32,
    ) -> u32 {
        let t = i64::from(progress.min(PROGRESS_ONE));
        let one = i64::from(PROGRESS_ONE);
        match self {
            Self::Linear => t as u32,
            Self::EaseInOut => (t * t * (3 * one - 2 * t) / (one * one)) as u32,
            Self::Overshoot => {
                let u = one - t;
                let curve = 3 * u * u * t * 1000 + 3 * u * t * t * 1300 + t * t * t * one;
                (curve / (one * one * one)) as u32
            }
        }
    }
}

// =============================================================================
// Completion Action
// =============================================================================

/// What to do when a tween reaches its end value. Never runs on cancellation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OnReady {
    #[default]
    Nothing,
    /// Set the drawable's hidden flag.
    Hide,
}

// =============================================================================
// Tween
// =============================================================================

/// One phase of a transition: property, start and end value, timing, curve.
///
/// `from` is optional. Without it the tween starts at whatever value the
/// property currently has on the surface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tween {
    pub drawable: DrawableId,
    pub property: Property,
    pub from: Option<i32>,
    pub to: i32,
    pub duration: Duration,
    pub easing: Easing,
    pub on_ready: OnReady,
}

impl Tween {
    /// Tween of `property` on `drawable` toward `to`, eased in and out.
    pub const fn new(
        drawable: DrawableId,
        property: Property,
        to: i32,
        duration: Duration,
    ) -> Self {
        Self {
            drawable,
            property,
            from: None,
            to,
            duration,
            easing: Easing::EaseInOut,
            on_ready: OnReady::Nothing,
        }
    }

    /// Start from `from` instead of the current value (honoured when idle).
    pub const fn from(
        mut self,
        from: i32,
    ) -> Self {
        self.from = Some(from);
        self
    }

    pub const fn easing(
        mut self,
        easing: Easing,
    ) -> Self {
        self.easing = easing;
        self
    }

    /// Hide the drawable once the end value is reached.
    pub const fn then_hide(mut self) -> Self {
        self.on_ready = OnReady::Hide;
        self
    }

    /// Whether this tween drives the same (drawable, property) pair.
    #[inline]
    pub fn targets(
        &self,
        drawable: DrawableId,
        property: Property,
    ) -> bool {
        self.drawable == drawable && self.property == property
    }
}

/// A tween bound to its resolved start value and start time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RunningTween {
    pub tween: Tween,
    pub from: i32,
    pub started_at: Instant,
}

impl RunningTween {
    /// Linear progress at `now`, 0..=[`PROGRESS_ONE`].
    pub fn progress(
        &self,
        now: Instant,
    ) -> u32 {
        let total = self.tween.duration.as_millis();
        if total == 0 {
            return PROGRESS_ONE;
        }
        let elapsed = now.checked_duration_since(self.started_at).map_or(0, |d| d.as_millis());
        if elapsed >= total {
            PROGRESS_ONE
        } else {
            (elapsed * u64::from(PROGRESS_ONE) / total) as u32
        }
    }

    /// Interpolated value at `now` and whether the tween has finished.
    pub fn sample(
        &self,
        now: Instant,
    ) -> (i32, bool) {
        let progress = self.progress(now);
        if progress >= PROGRESS_ONE {
            return (self.tween.to, true);
        }
        let eased = i64::from(self.tween.easing.apply(progress));
        let span = i64::from(self.tween.to) - i64::from(self.from);
        let value = i64::from(self.from) + span * eased / i64::from(PROGRESS_ONE);
        (value as i32, false)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn running(
        from: i32,
        to: i32,
        ms: u64,
        easing: Easing,
    ) -> RunningTween {
        RunningTween {
            tween: Tween::new(DrawableId::from_index(0), Property::X, to, Duration::from_millis(ms)).easing(easing),
            from,
            started_at: Instant::from_millis(1000),
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseInOut, Easing::Overshoot] {
            assert_eq!(easing.apply(0), 0, "{easing:?} should start at 0");
            assert_eq!(easing.apply(PROGRESS_ONE), PROGRESS_ONE, "{easing:?} should end at 1");
        }
    }

    #[test]
    fn test_ease_in_out_is_monotonic_and_symmetric() {
        let mut prev = 0;
        for p in 0..=PROGRESS_ONE {
            let v = Easing::EaseInOut.apply(p);
            assert!(v >= prev, "Easing must be monotonic at {p}");
            prev = v;
        }
        assert_eq!(Easing::EaseInOut.apply(PROGRESS_ONE / 2), PROGRESS_ONE / 2);
        assert!(Easing::EaseInOut.apply(PROGRESS_ONE / 4) < PROGRESS_ONE / 4, "Should start slow");
    }

    #[test]
    fn test_overshoot_passes_end() {
        let late = Easing::Overshoot.apply(PROGRESS_ONE * 4 / 5);
        assert!(late > PROGRESS_ONE, "Overshoot should exceed 1 late in the curve, got {late}");
        let t = running(0, 100, 200, Easing::Overshoot);
        assert!(t.sample(Instant::from_millis(1160)).0 > 100, "Value should pass the target");
        assert_eq!(t.sample(Instant::from_millis(1200)), (100, true), "Settles exactly on the target");
    }

    #[test]
    fn test_easing_clamps_progress() {
        assert_eq!(Easing::EaseInOut.apply(PROGRESS_ONE * 3), PROGRESS_ONE);
    }

    #[test]
    fn test_sample_linear_midpoint() {
        let t = running(0, 100, 100, Easing::Linear);
        assert_eq!(t.sample(Instant::from_millis(1050)), (50, false));
    }

    #[test]
    fn test_sample_before_start_holds_from() {
        let t = running(10, 20, 100, Easing::Linear);
        assert_eq!(t.sample(Instant::from_millis(500)), (10, false));
    }

    #[test]
    fn test_sample_finishes_at_to() {
        let t = running(255, 0, 140, Easing::EaseInOut);
        assert_eq!(t.sample(Instant::from_millis(1140)), (0, true));
        assert_eq!(t.sample(Instant::from_millis(9000)), (0, true));
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let t = running(3, 7, 0, Easing::EaseInOut);
        assert_eq!(t.sample(Instant::from_millis(1000)), (7, true));
    }

    #[test]
    fn test_builder() {
        let t = Tween::new(DrawableId::from_index(3), Property::Opacity, 0, Duration::from_millis(10))
            .from(255)
            .then_hide();
        assert_eq!(t.from, Some(255));
        assert_eq!(t.on_ready, OnReady::Hide);
        assert_eq!(t.easing, Easing::EaseInOut);
        assert!(t.targets(DrawableId::from_index(3), Property::Opacity));
        assert!(!t.targets(DrawableId::from_index(3), Property::Y));
    }
}
