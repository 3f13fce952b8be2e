//! Exclusive tween runner keyed by (drawable, property).
//!
//! # State Machine
//!
//! Each (drawable, property) pair is either idle or running exactly one
//! tween:
//!
//! ```text
//! Idle --start--> Running --tick(done)--> Ready (completion action runs) --> Idle
//!                    |
//!                    +--start / cancel--> Cancelled (no action) --> Idle / Running
//! ```
//!
//! Starting a tween on a running pair cancels the old one first and starts
//! the new one from the current interpolated value, never from a stale
//! `from`. This keeps restarts free of visual jumps.
//!
//! # Pool Exhaustion
//!
//! Tweens live in a fixed-size pool. When it is full the new tween is applied
//! instantly (end value plus completion action) so the drawable still ends in
//! the requested pose.

use embassy_time::Instant;
use heapless::Vec;

use super::tween::{OnReady, RunningTween, Tween};
use crate::config::MAX_TWEENS;
use crate::log_warn;
use crate::surface::{DrawableId, Property, Surface};

/// Runs tweens against a [`Surface`] on the cooperative tick.
pub struct Sequencer {
    running: Vec<RunningTween, MAX_TWEENS>,
    started: u32,
}

impl Sequencer {
    pub const fn new() -> Self {
        Self {
            running: Vec::new(),
            started: 0,
        }
    }

    /// Start `tween` at `now`, cancelling whatever runs on the same pair.
    ///
    /// The start value is applied to the surface immediately.
    pub fn start<S: Surface>(
        &mut self,
        surface: &mut S,
        now: Instant,
        tween: Tween,
    ) {
        let restarted = self.cancel(tween.drawable, tween.property);
        let current = surface.get(tween.drawable, tween.property);
        let from = match tween.from {
            Some(from) if !restarted => from,
            _ => current,
        };

        surface.set(tween.drawable, tween.property, from);
        self.started = self.started.wrapping_add(1);

        let run = RunningTween {
            tween,
            from,
            started_at: now,
        };
        if let Err(run) = self.running.push(run) {
            log_warn!("tween pool full, snapping");
            finish(surface, &run.tween);
        }
    }

    /// Cancel the tween on (`drawable`, `property`) without running its
    /// completion action. Returns whether one was running.
    pub fn cancel(
        &mut self,
        drawable: DrawableId,
        property: Property,
    ) -> bool {
        match self.running.iter().position(|r| r.tween.targets(drawable, property)) {
            Some(pos) => {
                self.running.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Cancel every tween on `drawable`. Returns how many were running.
    pub fn cancel_all(
        &mut self,
        drawable: DrawableId,
    ) -> usize {
        let before = self.running.len();
        self.running.retain(|r| r.tween.drawable != drawable);
        before - self.running.len()
    }

    pub fn is_running(
        &self,
        drawable: DrawableId,
        property: Property,
    ) -> bool {
        self.running.iter().any(|r| r.tween.targets(drawable, property))
    }

    /// Value the pair is heading to: the running tween's end value, or the
    /// current surface value when idle.
    pub fn destination<S: Surface>(
        &self,
        surface: &S,
        drawable: DrawableId,
        property: Property,
    ) -> i32 {
        self.running
            .iter()
            .find(|r| r.tween.targets(drawable, property))
            .map_or_else(|| surface.get(drawable, property), |r| r.tween.to)
    }

    /// Advance every tween to `now`. Finished tweens are removed and their
    /// completion actions run. Returns the number still running.
    pub fn tick<S: Surface>(
        &mut self,
        surface: &mut S,
        now: Instant,
    ) -> usize {
        self.running.retain(|run| {
            let (value, done) = run.sample(now);
            surface.set(run.tween.drawable, run.tween.property, value);
            if done {
                on_ready(surface, &run.tween);
            }
            !done
        });
        self.running.len()
    }

    /// Number of running tweens.
    #[inline]
    pub fn len(&self) -> usize { self.running.len() }

    #[inline]
    pub fn is_idle(&self) -> bool { self.running.is_empty() }

    /// Total tweens started since construction (wrapping).
    #[inline]
    pub const fn started(&self) -> u32 { self.started }
}

impl Default for Sequencer {
    fn default() -> Self { Self::new() }
}

fn on_ready<S: Surface>(
    surface: &mut S,
    tween: &Tween,
) {
    match tween.on_ready {
        OnReady::Nothing => {}
        OnReady::Hide => surface.set_hidden(tween.drawable, true),
    }
}

fn finish<S: Surface>(
    surface: &mut S,
    tween: &Tween,
) {
    surface.set(tween.drawable, tween.property, tween.to);
    on_ready(surface, tween);
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use super::*;
    use crate::animations::Easing;
    use crate::scene::Scene;
    use crate::surface::DrawableKind;

    fn setup() -> (Scene<8>, DrawableId) {
        let mut scene = Scene::new();
        let id = scene.create(None, DrawableKind::Image).unwrap();
        (scene, id)
    }

    fn at(ms: u64) -> Instant { Instant::from_millis(ms) }

    fn slide(
        id: DrawableId,
        to: i32,
    ) -> Tween {
        Tween::new(id, Property::X, to, Duration::from_millis(100)).easing(Easing::Linear)
    }

    #[test]
    fn test_start_applies_from_immediately() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        seq.start(&mut scene, at(0), slide(id, 50).from(10));

        assert_eq!(scene.x(id), 10, "Start value should be applied at start");
        assert!(seq.is_running(id, Property::X));
        assert_eq!(seq.started(), 1);
    }

    #[test]
    fn test_tick_interpolates_and_completes() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        seq.start(&mut scene, at(0), slide(id, 100).from(0));

        assert_eq!(seq.tick(&mut scene, at(50)), 1);
        assert_eq!(scene.x(id), 50);
        assert_eq!(seq.tick(&mut scene, at(100)), 0, "Tween should finish at its duration");
        assert_eq!(scene.x(id), 100);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_restart_starts_from_current_value() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        seq.start(&mut scene, at(0), slide(id, 100).from(0));
        seq.tick(&mut scene, at(40));
        assert_eq!(scene.x(id), 40);

        // Explicit from is ignored while the pair is running
        seq.start(&mut scene, at(40), slide(id, 0).from(100));

        assert_eq!(seq.len(), 1, "Exactly one tween should remain on the pair");
        assert_eq!(scene.x(id), 40, "Restart must not jump back to the stale from");
        seq.tick(&mut scene, at(90));
        assert_eq!(scene.x(id), 20, "Second tween interpolates from 40 toward 0");
    }

    #[test]
    fn test_cancelled_tween_skips_completion() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        let fade_out = Tween::new(id, Property::Opacity, 0, Duration::from_millis(140)).then_hide();
        seq.start(&mut scene, at(0), fade_out);
        seq.start(&mut scene, at(70), Tween::new(id, Property::Opacity, 255, Duration::from_millis(140)));

        seq.tick(&mut scene, at(500));
        assert!(!scene.is_hidden(id), "Cancelled fade-out must not hide");
        assert_eq!(scene.opacity(id), 255);
    }

    #[test]
    fn test_completion_hides() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        seq.start(&mut scene, at(0), Tween::new(id, Property::Opacity, 0, Duration::from_millis(140)).then_hide());
        seq.tick(&mut scene, at(140));
        assert!(scene.is_hidden(id));
        assert_eq!(scene.opacity(id), 0);
    }

    #[test]
    fn test_pairs_are_independent() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        seq.start(&mut scene, at(0), slide(id, 10));
        seq.start(&mut scene, at(0), Tween::new(id, Property::Y, 5, Duration::from_millis(100)));
        assert_eq!(seq.len(), 2, "X and Y run side by side");

        assert_eq!(seq.cancel_all(id), 2);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_cancel_unknown_is_noop() {
        let (_, id) = setup();
        let mut seq = Sequencer::new();
        assert!(!seq.cancel(id, Property::Opacity));
        assert_eq!(seq.cancel_all(id), 0);
    }

    #[test]
    fn test_destination() {
        let (mut scene, id) = setup();
        let mut seq = Sequencer::new();
        scene.set_x(id, 7);
        assert_eq!(seq.destination(&scene, id, Property::X), 7, "Idle pair reports its current value");

        seq.start(&mut scene, at(0), slide(id, 30));
        assert_eq!(seq.destination(&scene, id, Property::X), 30, "Running pair reports its end value");
    }

    #[test]
    fn test_pool_full_snaps_to_end() {
        let mut scene: Scene<{ MAX_TWEENS + 1 }> = Scene::new();
        let mut seq = Sequencer::new();
        for _ in 0..MAX_TWEENS {
            let id = scene.create(None, DrawableKind::Image).unwrap();
            seq.start(&mut scene, at(0), slide(id, 10));
        }
        let extra = scene.create(None, DrawableKind::Image).unwrap();
        seq.start(&mut scene, at(0), Tween::new(extra, Property::Opacity, 0, Duration::from_millis(100)).then_hide());

        assert_eq!(seq.len(), MAX_TWEENS);
        assert_eq!(scene.opacity(extra), 0, "Overflowing tween should snap to its end value");
        assert!(scene.is_hidden(extra), "Overflowing tween should still run its completion");
    }
}
