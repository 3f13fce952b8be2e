//! Status widget kinds shown on the dongle display.
//!
//! Each kind builds its drawables on a [`Surface`] at construction and then
//! only reacts to [`WidgetState`] values handed in by the engine:
//!
//! - [`battery`]: one gauge per split peripheral
//! - [`modifiers`]: held modifier icons with priority column packing
//! - [`layer`]: active layer name with a crossfade/slide transition
//! - [`hid_indicators`]: caps word and lock LED letters
//! - [`output`]: USB / BLE transport and connection status
//!
//! Widgets never own time. Animated updates receive a [`Frame`] bundling the
//! surface, the shared sequencer and the current engine clock.

pub mod battery;
pub mod hid_indicators;
pub mod layer;
pub mod modifiers;
pub mod output;

pub use battery::BatteryWidget;
pub use hid_indicators::{HidIndicatorsWidget, IndicatorState, indicator_text};
pub use layer::{LabelText, LayerWidget, label_text};
pub use modifiers::{ModifierSymbol, ModifiersWidget, SYMBOL_COUNT, SYMBOLS, layout};
pub use output::{OutputState, OutputWidget};

use embassy_time::Instant;

use crate::animations::{Sequencer, Tween};
use crate::surface::Surface;

/// Snapshot of the domain facts one widget kind renders.
///
/// Produced fresh by an extractor for every matching event and consumed by
/// value; never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum WidgetState {
    Battery { source: u8, level: u8 },
    /// HID modifier byte.
    Modifiers(u8),
    Layer { index: u8, name: Option<LabelText> },
    /// HID LED report bits.
    LockIndicators(u8),
    CapsWord(bool),
    Output(OutputState),
}

/// Mutable view used by animated updates.
pub struct Frame<'a, S: Surface> {
    pub surface: &'a mut S,
    pub sequencer: &'a mut Sequencer,
    pub now: Instant,
}

impl<S: Surface> Frame<'_, S> {
    /// Start `tween` now, replacing whatever runs on its pair.
    #[inline]
    pub fn animate(
        &mut self,
        tween: Tween,
    ) {
        self.sequencer.start(self.surface, self.now, tween);
    }
}

/// One-shot continuations scheduled by widgets and run on a later tick.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Continuation {
    /// Second half of a layer label transition on layer instance `instance`.
    LayerSwapIn { instance: u8, text: LabelText },
}
