//! Color and opacity constants for the dongle display.
//!
//! # Optimization: Using Built-in `BinaryColor` Variants
//!
//! The dongle display is a 1-bit OLED panel, so `embedded_graphics`'
//! [`BinaryColor`] is the native pixel type. Naming the two extremes here keeps
//! the drawing code free of bare `On`/`Off` literals whose meaning depends on
//! panel polarity.
//!
//! ## Opacity
//!
//! Opacity is tracked per drawable as an 8-bit value, the same scale the
//! tween engine interpolates on. A monochrome panel cannot blend, so the
//! scene renderer treats anything at or above [`OPA_HALF`] as drawn.

use embedded_graphics::pixelcolor::BinaryColor;

// =============================================================================
// Pixel Colors
// =============================================================================

/// Unlit pixel. Background and gauge "empty" area.
pub const BLACK: BinaryColor = BinaryColor::Off;

/// Lit pixel. Text, icons, gauge outline and charge fill.
pub const WHITE: BinaryColor = BinaryColor::On;

// =============================================================================
// Opacity Extremes
// =============================================================================

/// Fully transparent.
pub const OPA_TRANSP: u8 = 0;

/// Fully opaque.
pub const OPA_COVER: u8 = 255;

/// Visibility threshold on a 1-bit panel.
pub const OPA_HALF: u8 = 128;
