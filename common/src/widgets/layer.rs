//! Active layer label with a two-phase crossfade.
//!
//! # Transition
//!
//! ```text
//! out:  y 0 -> -6, opacity cover -> transparent        (120 ms, ease in-out)
//! swap: 121 ms later: set text, y = +6, transparent    (one atomic pose reset)
//! in:   y +6 -> 0, opacity transparent -> cover        (120 ms, ease in-out)
//! ```
//!
//! The swap runs as a [`Continuation`] on the engine scheduler. Each label
//! instance tracks its own pending continuation; a new layer change cancels
//! it and starts the out phase from the current pose, so rapid switches
//! never queue.
//!
//! The first update after construction sets the text directly: there is
//! nothing to animate away from.

use core::fmt::Write;

use heapless::String;

use crate::animations::{Scheduler, TimerId, Tween};
use crate::colors::{OPA_COVER, OPA_TRANSP};
use crate::config::{LABEL_LEN, LAYER_ANIM, LAYER_SLIDE_PX, LAYER_SWAP_DELAY};
use crate::error::Error;
use crate::log_warn;
use crate::render::{RenderedState, Verdict};
use crate::surface::{Align, DrawableId, DrawableKind, Property, Surface};
use super::{Continuation, Frame};

/// Formatted label content.
pub type LabelText = String<LABEL_LEN>;

/// Layer name, or the decimal index when the name is missing or empty.
pub fn label_text(
    index: u8,
    name: Option<&str>,
) -> LabelText {
    let mut text = LabelText::new();
    match name.filter(|n| !n.is_empty()) {
        Some(name) => {
            for c in name.chars() {
                if text.push(c).is_err() {
                    break;
                }
            }
        }
        None => {
            let _ = write!(text, "{index}");
        }
    }
    text
}

pub struct LayerWidget {
    label: DrawableId,
    rendered: RenderedState<LabelText>,
    pending: Option<TimerId>,
}

impl LayerWidget {
    pub fn new<S: Surface>(
        surface: &mut S,
        parent: Option<DrawableId>,
    ) -> Result<Self, Error> {
        let label = surface.create(parent, DrawableKind::Label(Align::Left))?;
        surface.set_opacity(label, OPA_COVER);
        surface.set_y(label, 0);
        Ok(Self {
            label,
            rendered: RenderedState::new(),
            pending: None,
        })
    }

    #[inline]
    pub const fn root(&self) -> DrawableId { self.label }

    /// Continuation waiting to swap the text in, if any.
    #[inline]
    pub const fn pending(&self) -> Option<TimerId> { self.pending }

    /// Show `text`. `instance` is this widget's registry index, carried by
    /// the scheduled continuation back to [`Self::swap_in`].
    pub fn update<S: Surface>(
        &mut self,
        frame: &mut Frame<'_, S>,
        timers: &mut Scheduler<Continuation>,
        instance: u8,
        text: LabelText,
    ) {
        match self.rendered.accept(text.clone()) {
            Verdict::Unchanged => {}
            Verdict::First => {
                frame.sequencer.cancel_all(self.label);
                frame.surface.set_text(self.label, &text);
                frame.surface.set_opacity(self.label, OPA_COVER);
                frame.surface.set_y(self.label, 0);
            }
            Verdict::Changed => {
                if let Some(id) = self.pending.take() {
                    timers.cancel(id);
                }

                frame.animate(Tween::new(self.label, Property::Y, -LAYER_SLIDE_PX, LAYER_ANIM));
                frame.animate(Tween::new(self.label, Property::Opacity, i32::from(OPA_TRANSP), LAYER_ANIM));

                let job = Continuation::LayerSwapIn { instance, text };
                match timers.schedule(frame.now, LAYER_SWAP_DELAY, job) {
                    Ok(id) => self.pending = Some(id),
                    Err(Continuation::LayerSwapIn { text, .. }) => {
                        log_warn!("no timer slot, swapping layer {} now", instance);
                        self.swap_in(frame, &text);
                    }
                }
            }
        }
    }

    /// Second phase: reset the pose with the new text, then slide and fade in.
    pub fn swap_in<S: Surface>(
        &mut self,
        frame: &mut Frame<'_, S>,
        text: &str,
    ) {
        self.pending = None;
        frame.sequencer.cancel_all(self.label);

        frame.surface.set_text(self.label, text);
        frame.surface.set_y(self.label, LAYER_SLIDE_PX);
        frame.surface.set_opacity(self.label, OPA_TRANSP);

        frame.animate(Tween::new(self.label, Property::Y, 0, LAYER_ANIM).from(LAYER_SLIDE_PX));
        frame.animate(
            Tween::new(self.label, Property::Opacity, i32::from(OPA_COVER), LAYER_ANIM).from(i32::from(OPA_TRANSP)),
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_time::{Duration, Instant};

    use super::*;
    use crate::animations::Sequencer;
    use crate::scene::Scene;

    struct Rig {
        scene: Scene<4>,
        sequencer: Sequencer,
        timers: Scheduler<Continuation>,
        widget: LayerWidget,
        now: Instant,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = Scene::new();
            let widget = LayerWidget::new(&mut scene, None).unwrap();
            Self {
                scene,
                sequencer: Sequencer::new(),
                timers: Scheduler::new(),
                widget,
                now: Instant::from_millis(0),
            }
        }

        fn show(
            &mut self,
            text: &str,
        ) {
            let mut frame = Frame {
                surface: &mut self.scene,
                sequencer: &mut self.sequencer,
                now: self.now,
            };
            self.widget.update(&mut frame, &mut self.timers, 0, label_text(0, Some(text)));
        }

        /// Advance the clock and run whatever falls due, like the engine tick.
        fn advance(
            &mut self,
            ms: u64,
        ) {
            self.now += Duration::from_millis(ms);
            self.sequencer.tick(&mut self.scene, self.now);
            while let Some((id, Continuation::LayerSwapIn { text, .. })) = self.timers.pop_due(self.now) {
                if self.widget.pending() == Some(id) {
                    let mut frame = Frame {
                        surface: &mut self.scene,
                        sequencer: &mut self.sequencer,
                        now: self.now,
                    };
                    self.widget.swap_in(&mut frame, &text);
                }
            }
        }

        fn label(&self) -> DrawableId { self.widget.root() }
    }

    #[test]
    fn test_label_text() {
        assert_eq!(label_text(2, Some("NAV")).as_str(), "NAV");
        assert_eq!(label_text(2, Some("")).as_str(), "2", "Empty name falls back to the index");
        assert_eq!(label_text(17, None).as_str(), "17");
        assert_eq!(label_text(0, Some("a-very-long-layer-name")).len(), LABEL_LEN);
    }

    #[test]
    fn test_first_update_sets_directly() {
        let mut rig = Rig::new();
        rig.show("BASE");
        assert_eq!(rig.scene.text(rig.label()), "BASE");
        assert!(rig.sequencer.is_idle(), "First update must not animate");
        assert!(rig.timers.is_empty());
    }

    #[test]
    fn test_unchanged_text_is_ignored() {
        let mut rig = Rig::new();
        rig.show("BASE");
        let started = rig.sequencer.started();
        rig.show("BASE");
        assert_eq!(rig.sequencer.started(), started);
        assert!(rig.timers.is_empty());
    }

    #[test]
    fn test_crossfade_phases() {
        let mut rig = Rig::new();
        rig.show("BASE");
        rig.show("NAV");
        assert_eq!(rig.scene.text(rig.label()), "BASE", "Old text stays during the out phase");

        rig.advance(120);
        assert_eq!(rig.scene.y(rig.label()), -LAYER_SLIDE_PX);
        assert_eq!(rig.scene.opacity(rig.label()), OPA_TRANSP);
        assert_eq!(rig.scene.text(rig.label()), "BASE");

        rig.advance(1);
        assert_eq!(rig.scene.text(rig.label()), "NAV", "Swap happens right after the out phase");
        assert_eq!(rig.scene.y(rig.label()), LAYER_SLIDE_PX);
        assert_eq!(rig.scene.opacity(rig.label()), OPA_TRANSP);

        rig.advance(120);
        assert_eq!(rig.scene.y(rig.label()), 0);
        assert_eq!(rig.scene.opacity(rig.label()), OPA_COVER);
        assert!(rig.widget.pending().is_none());
    }

    #[test]
    fn test_restart_cancels_pending_swap() {
        let mut rig = Rig::new();
        rig.show("BASE");
        rig.show("NAV");
        rig.advance(60);
        let first = rig.widget.pending();
        rig.show("SYM");

        assert!(first.is_some());
        assert_ne!(rig.widget.pending(), first, "A new continuation replaces the old one");
        assert_eq!(rig.timers.len(), 1, "Transitions never queue");

        rig.advance(121);
        assert_eq!(rig.scene.text(rig.label()), "SYM", "Only the latest text is swapped in");
        rig.advance(120);
        assert_eq!(rig.scene.text(rig.label()), "SYM");
        assert_eq!(rig.scene.opacity(rig.label()), OPA_COVER);
    }

    #[test]
    fn test_restart_during_in_phase_starts_from_current_pose() {
        let mut rig = Rig::new();
        rig.show("BASE");
        rig.show("NAV");
        rig.advance(121 + 60);
        let y = rig.scene.y(rig.label());
        assert!(y > 0 && y < LAYER_SLIDE_PX, "Mid in-phase, got y={y}");

        rig.show("BASE");
        assert_eq!(rig.scene.y(rig.label()), y, "Out phase must not jump back to 0");
    }
}
