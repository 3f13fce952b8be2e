//! Held modifier icons with priority column packing.
//!
//! # Symbols
//!
//! Four symbols in fixed priority order: Control, GUI, Shift, Alt. Each has an
//! icon and an underline. With the `mac-modifiers` feature GUI and Alt use the
//! Command and Option glyphs.
//!
//! # Transitions
//!
//! | Change            | Icon / underline                                          |
//! |-------------------|-----------------------------------------------------------|
//! | inactive → active | unhide, fade in (140 ms), nudge Y to shown pose (200 ms)  |
//! | active → inactive | nudge Y to hidden pose, fade out, hide on completion      |
//!
//! # Layout
//!
//! After the transitions the active symbols are packed into columns
//! `0..k-1` in priority order, so a lone active symbol always sits in
//! column 0. Moving to a column is a 100 ms X slide, skipped when the symbol
//! is already at (or heading to) that column. No placement runs when nothing
//! is active.

use crate::colors::{OPA_COVER, OPA_TRANSP};
use crate::config::{
    MODIFIER_FADE,
    MODIFIER_NUDGE,
    MODIFIER_SLIDE,
    SIZE_SYMBOLS,
    SYMBOL_Y_HIDDEN,
    SYMBOL_Y_SHOWN,
    UNDERLINE_Y_HIDDEN,
    UNDERLINE_Y_SHOWN,
    column_x,
};
use crate::animations::{Easing, Tween};
use crate::error::Error;
use crate::events::modifier_bits;
use crate::render::RenderedState;
use crate::surface::{DrawableId, DrawableKind, Glyph, Property, Surface};
use super::Frame;

/// Number of modifier symbols.
pub const SYMBOL_COUNT: usize = 4;

/// Static descriptor of one modifier symbol.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModifierSymbol {
    /// HID modifier bits (both hands) that light this symbol.
    pub mask: u8,
    pub glyph: Glyph,
}

#[cfg(not(feature = "mac-modifiers"))]
const GUI_GLYPH: Glyph = Glyph::Gui;
#[cfg(feature = "mac-modifiers")]
const GUI_GLYPH: Glyph = Glyph::Command;

#[cfg(not(feature = "mac-modifiers"))]
const ALT_GLYPH: Glyph = Glyph::Alt;
#[cfg(feature = "mac-modifiers")]
const ALT_GLYPH: Glyph = Glyph::Option;

/// Symbols in priority order (leftmost first when several are active).
pub const SYMBOLS: [ModifierSymbol; SYMBOL_COUNT] = [
    ModifierSymbol {
        mask: modifier_bits::CTL,
        glyph: Glyph::Control,
    },
    ModifierSymbol {
        mask: modifier_bits::GUI,
        glyph: GUI_GLYPH,
    },
    ModifierSymbol {
        mask: modifier_bits::SFT,
        glyph: Glyph::Shift,
    },
    ModifierSymbol {
        mask: modifier_bits::ALT,
        glyph: ALT_GLYPH,
    },
];

/// Column of every symbol for a set of active flags; `None` when inactive.
///
/// A strict function of the active set: press order never matters.
pub fn layout(active: [bool; SYMBOL_COUNT]) -> [Option<usize>; SYMBOL_COUNT] {
    let mut columns = [None; SYMBOL_COUNT];
    let mut next = 0;
    for (column, _) in columns.iter_mut().zip(active).filter(|(_, on)| *on) {
        *column = Some(next);
        next += 1;
    }
    columns
}

// =============================================================================
// Symbol Drawables
// =============================================================================

struct SymbolView {
    icon: DrawableId,
    underline: DrawableId,
    /// Direction of the last started transition: true = toward shown.
    active: bool,
}

impl SymbolView {
    fn show<S: Surface>(
        &self,
        frame: &mut Frame<'_, S>,
    ) {
        for id in [self.icon, self.underline] {
            frame.surface.set_hidden(id, false);
            frame.animate(Tween::new(id, Property::Opacity, i32::from(OPA_COVER), MODIFIER_FADE).from(i32::from(OPA_TRANSP)));
        }
        frame.animate(nudge(self.icon, SYMBOL_Y_HIDDEN, SYMBOL_Y_SHOWN));
        frame.animate(nudge(self.underline, UNDERLINE_Y_HIDDEN, UNDERLINE_Y_SHOWN));
    }

    fn hide<S: Surface>(
        &self,
        frame: &mut Frame<'_, S>,
    ) {
        frame.animate(nudge(self.icon, SYMBOL_Y_SHOWN, SYMBOL_Y_HIDDEN));
        frame.animate(nudge(self.underline, UNDERLINE_Y_SHOWN, UNDERLINE_Y_HIDDEN));
        for id in [self.icon, self.underline] {
            frame.animate(Tween::new(id, Property::Opacity, i32::from(OPA_TRANSP), MODIFIER_FADE).then_hide());
        }
    }

    /// Slide icon and underline to `col`; no-op when already there.
    fn place_at<S: Surface>(
        &self,
        frame: &mut Frame<'_, S>,
        col: usize,
    ) {
        let target = column_x(col);
        for id in [self.icon, self.underline] {
            if frame.sequencer.destination(frame.surface, id, Property::X) != target {
                frame.animate(Tween::new(id, Property::X, target, MODIFIER_SLIDE));
            }
        }
    }
}

fn nudge(
    id: DrawableId,
    from: i32,
    to: i32,
) -> Tween {
    Tween::new(id, Property::Y, to, MODIFIER_NUDGE).from(from).easing(Easing::Overshoot)
}

// =============================================================================
// Widget
// =============================================================================

pub struct ModifiersWidget {
    root: DrawableId,
    symbols: [SymbolView; SYMBOL_COUNT],
    rendered: RenderedState<u8>,
}

impl ModifiersWidget {
    /// Build the container with every symbol transparent, hidden and parked
    /// at its priority column.
    pub fn new<S: Surface>(
        surface: &mut S,
        parent: Option<DrawableId>,
    ) -> Result<Self, Error> {
        let root = surface.create(parent, DrawableKind::Container)?;
        let mut build = |col: usize| -> Result<SymbolView, Error> {
            let icon = surface.create(Some(root), DrawableKind::Image)?;
            surface.set_image(icon, SYMBOLS[col].glyph);
            let underline = surface.create(Some(root), DrawableKind::Line(SIZE_SYMBOLS as u32))?;

            for (id, y) in [(icon, SYMBOL_Y_HIDDEN), (underline, UNDERLINE_Y_HIDDEN)] {
                surface.set_x(id, column_x(col));
                surface.set_y(id, y);
                surface.set_opacity(id, OPA_TRANSP);
                surface.set_hidden(id, true);
            }
            Ok(SymbolView {
                icon,
                underline,
                active: false,
            })
        };
        let symbols = [build(0)?, build(1)?, build(2)?, build(3)?];
        Ok(Self {
            root,
            symbols,
            rendered: RenderedState::new(),
        })
    }

    #[inline]
    pub const fn root(&self) -> DrawableId { self.root }

    /// Icon and underline of the symbol at priority `index`.
    pub fn drawables(
        &self,
        index: usize,
    ) -> Option<(DrawableId, DrawableId)> {
        self.symbols.get(index).map(|s| (s.icon, s.underline))
    }

    /// Current active flags in priority order.
    pub fn active(&self) -> [bool; SYMBOL_COUNT] { core::array::from_fn(|i| self.symbols[i].active) }

    /// Apply a HID modifier byte. Returns whether the state was new.
    pub fn update<S: Surface>(
        &mut self,
        frame: &mut Frame<'_, S>,
        modifiers: u8,
    ) -> bool {
        if !self.rendered.accept(modifiers).proceeds() {
            return false;
        }

        for (view, symbol) in self.symbols.iter_mut().zip(SYMBOLS) {
            let is_active = modifiers & symbol.mask != 0;
            if is_active && !view.active {
                view.show(frame);
                view.active = true;
            } else if !is_active && view.active {
                view.hide(frame);
                view.active = false;
            }
        }

        let columns = layout(self.active());
        for (view, column) in self.symbols.iter().zip(columns) {
            if let Some(col) = column {
                view.place_at(frame, col);
            }
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
