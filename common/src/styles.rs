//! Pre-computed static text styles to avoid per-frame object construction.
//!
//! # Optimization: Static Style Constants
//!
//! `MonoTextStyle` and `TextStyle` are built once at compile time and referenced
//! by the scene renderer on every redraw, instead of being rebuilt per label.

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_12_POINT;

use crate::colors::WHITE;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, top baseline. Label position is its top-left corner.
pub const LEFT_TOP: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).baseline(Baseline::Top).build();

/// Right-aligned, top baseline. Label position is its top-right corner.
pub const RIGHT_TOP: TextStyle = TextStyleBuilder::new().alignment(Alignment::Right).baseline(Baseline::Top).build();

/// Centered both ways. Used for letters inside glyph frames.
pub const CENTER_MIDDLE: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Center)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Fonts and Styles
// =============================================================================

/// Label font (`ProFont` 12pt). Layer names and lock indicator letters.
pub const LABEL_FONT: &MonoFont = &PROFONT_12_POINT;

/// Lit label text.
pub const LABEL_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(LABEL_FONT, WHITE);

/// Tiny lit text for letters inside glyphs (5x8 pixels).
pub const GLYPH_STYLE: MonoTextStyle<'static, BinaryColor> = MonoTextStyle::new(&FONT_5X8, WHITE);
