//! Display, layout and timing configuration constants.
//!
//! # Optimization: Pre-computed Layout Constants
//!
//! Layout values such as the modifier column pitch are computed at compile time
//! as `const`, so widgets never recalculate positions on the event path.
//! Everything here is a tunable constant, not a computed policy: changing a
//! slide distance or a fade time only changes how transitions look.

use embassy_time::Duration;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (128x64 SSD1306-class OLED on the dongle).
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 64;

/// Number of split peripherals reporting battery levels to the dongle.
pub const PERIPHERAL_COUNT: usize = 2;

// =============================================================================
// Battery Gauge
// =============================================================================

/// Gauge raster width in pixels (60 px of charge + frame column + tip column).
pub const GAUGE_WIDTH: u32 = 62;

/// Gauge raster height in pixels.
pub const GAUGE_HEIGHT: u32 = 3;

/// Pixel span representing 100% charge.
pub const GAUGE_FILL_SPAN: u32 = 60;

/// Vertical distance between two peripheral gauges.
pub const GAUGE_ROW_PITCH: i32 = 10;

// =============================================================================
// Modifier Symbols
// =============================================================================

/// Modifier icon edge length in pixels.
pub const SIZE_SYMBOLS: i32 = 14;

/// Left margin before column 0.
pub const SYMBOL_MARGIN: i32 = 1;

/// Horizontal gap between two icon columns.
pub const SYMBOL_GAP: i32 = 1;

/// Icon Y when shown.
pub const SYMBOL_Y_SHOWN: i32 = 0;

/// Icon Y when hidden (one pixel low, nudged up on show).
pub const SYMBOL_Y_HIDDEN: i32 = 1;

/// Underline Y when shown.
pub const UNDERLINE_Y_SHOWN: i32 = SIZE_SYMBOLS + 2;

/// Underline Y when hidden.
pub const UNDERLINE_Y_HIDDEN: i32 = SIZE_SYMBOLS + 4;

/// Fade in/out time for a modifier icon and its underline.
pub const MODIFIER_FADE: Duration = Duration::from_millis(140);

/// Vertical nudge time on show/hide.
pub const MODIFIER_NUDGE: Duration = Duration::from_millis(200);

/// Horizontal slide time when the column layout changes.
pub const MODIFIER_SLIDE: Duration = Duration::from_millis(100);

/// X coordinate of a modifier column.
///
/// `x(col) = margin + (icon width + gap) * col`
#[inline]
pub const fn column_x(col: usize) -> i32 { SYMBOL_MARGIN + (SIZE_SYMBOLS + SYMBOL_GAP) * col as i32 }

// =============================================================================
// Layer Label
// =============================================================================

/// Slide distance of the layer label crossfade (out = upward, in = from below).
pub const LAYER_SLIDE_PX: i32 = 6;

/// Layer label phase length in milliseconds.
const LAYER_ANIM_MS: u64 = 120;

/// Duration of each layer label phase.
pub const LAYER_ANIM: Duration = Duration::from_millis(LAYER_ANIM_MS);

/// Delay before the swap-in phase starts; one millisecond after the out phase ends.
pub const LAYER_SWAP_DELAY: Duration = Duration::from_millis(LAYER_ANIM_MS + 1);

/// Maximum characters of a rendered label (layer name, indicator letters).
pub const LABEL_LEN: usize = 16;

// =============================================================================
// Capacities
// =============================================================================

/// Live instances per widget kind (one per physical display).
pub const MAX_INSTANCES: usize = 4;

/// Event subscriptions across all widget kinds.
pub const MAX_SUBSCRIPTIONS: usize = 16;

/// Concurrently running tweens.
pub const MAX_TWEENS: usize = 64;

/// Concurrently pending deferred continuations.
pub const MAX_TIMERS: usize = 8;

/// Drawables held by the reference scene graph.
pub const MAX_DRAWABLES: usize = 128;
