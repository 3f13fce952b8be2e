//! Caps word and lock LED letters.
//!
//! A right-aligned label reading, in order: `W` (caps word), `C` (caps lock),
//! `N` (num lock), `S` (scroll lock). Lock reports and caps word events arrive
//! separately; each one updates only its own field of the stored state and the
//! label is rebuilt from both.

use heapless::String;

use crate::config::LABEL_LEN;
use crate::error::Error;
use crate::events::lock_bits::{CAPS_LOCK, NUM_LOCK, SCROLL_LOCK};
use crate::render::RenderedState;
use crate::surface::{Align, DrawableId, DrawableKind, Surface};

/// Lock bits shown by the widget; other LED bits never cause a redraw.
const SHOWN_LOCKS: u8 = NUM_LOCK | CAPS_LOCK | SCROLL_LOCK;

/// Merged indicator state of one instance.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorState {
    /// HID LED bits, masked to num / caps / scroll lock.
    pub locks: u8,
    pub caps_word: bool,
}

/// Label text for `state`.
pub fn indicator_text(state: IndicatorState) -> String<LABEL_LEN> {
    let mut text = String::new();
    let letters = [
        (state.caps_word, 'W'),
        (state.locks & CAPS_LOCK != 0, 'C'),
        (state.locks & NUM_LOCK != 0, 'N'),
        (state.locks & SCROLL_LOCK != 0, 'S'),
    ];
    for (_, letter) in letters.into_iter().filter(|(on, _)| *on) {
        let _ = text.push(letter);
    }
    text
}

pub struct HidIndicatorsWidget {
    label: DrawableId,
    state: IndicatorState,
    rendered: RenderedState<IndicatorState>,
}

impl HidIndicatorsWidget {
    pub fn new<S: Surface>(
        surface: &mut S,
        parent: Option<DrawableId>,
    ) -> Result<Self, Error> {
        let label = surface.create(parent, DrawableKind::Label(Align::Right))?;
        Ok(Self {
            label,
            state: IndicatorState::default(),
            rendered: RenderedState::new(),
        })
    }

    #[inline]
    pub const fn root(&self) -> DrawableId { self.label }

    #[inline]
    pub const fn state(&self) -> IndicatorState { self.state }

    /// Merge a new LED report, keeping the caps word flag.
    pub fn set_locks<S: Surface>(
        &mut self,
        surface: &mut S,
        indicators: u8,
    ) -> bool {
        self.state.locks = indicators & SHOWN_LOCKS;
        self.refresh(surface)
    }

    /// Merge a caps word change, keeping the lock bits.
    pub fn set_caps_word<S: Surface>(
        &mut self,
        surface: &mut S,
        active: bool,
    ) -> bool {
        self.state.caps_word = active;
        self.refresh(surface)
    }

    fn refresh<S: Surface>(
        &mut self,
        surface: &mut S,
    ) -> bool {
        if !self.rendered.accept(self.state).proceeds() {
            return false;
        }
        surface.set_text(self.label, &indicator_text(self.state));
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
