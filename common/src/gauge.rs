//! Battery gauge rasterizer.
//!
//! Turns a charge percentage into a 62x3 one-bit bitmap:
//!
//! ```text
//!  x: 0                                                           61
//!     #...........................................................#
//!     ####################################........................#   <- tip
//!     #...........................................................#
//!     |<--------- fill = level * 60 / 100 --------->|
//! ```
//!
//! The fill rectangle is 3 px high and starts at the left edge, so at any
//! non-zero level it covers the left frame corners. Levels above 100 are a
//! measurement anomaly and clamp to a full gauge.
//!
//! [`rasterize`] is pure: the bitmap is re-derived wholesale from the level on
//! every update, never patched from the previous one.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::colors::{BLACK, WHITE};
use crate::config::{GAUGE_FILL_SPAN, GAUGE_HEIGHT, GAUGE_WIDTH, PERIPHERAL_COUNT};

/// Bytes needed for a packed 62x3 bitmap.
const GAUGE_BYTES: usize = ((GAUGE_WIDTH * GAUGE_HEIGHT) as usize).div_ceil(8);

// =============================================================================
// Gauge Bitmap
// =============================================================================

/// Packed one-bit raster of gauge size, row-major, LSB first.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GaugeBitmap {
    bits: [u8; GAUGE_BYTES],
}

impl GaugeBitmap {
    /// All pixels off.
    pub const fn new() -> Self { Self { bits: [0; GAUGE_BYTES] } }

    /// Color of the pixel at (`x`, `y`); out-of-bounds reads are black.
    pub fn pixel(
        &self,
        x: u32,
        y: u32,
    ) -> BinaryColor {
        if x >= GAUGE_WIDTH || y >= GAUGE_HEIGHT {
            return BLACK;
        }
        let bit = (y * GAUGE_WIDTH + x) as usize;
        BinaryColor::from(self.bits[bit / 8] & (1 << (bit % 8)) != 0)
    }

    /// Raw packed contents.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8] { &self.bits }

    fn put(
        &mut self,
        x: u32,
        y: u32,
        color: BinaryColor,
    ) {
        let bit = (y * GAUGE_WIDTH + x) as usize;
        if color.is_on() {
            self.bits[bit / 8] |= 1 << (bit % 8);
        } else {
            self.bits[bit / 8] &= !(1 << (bit % 8));
        }
    }
}

impl Default for GaugeBitmap {
    fn default() -> Self { Self::new() }
}

impl OriginDimensions for GaugeBitmap {
    fn size(&self) -> Size { Size::new(GAUGE_WIDTH, GAUGE_HEIGHT) }
}

impl DrawTarget for GaugeBitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Ok((x, y)) = <(u32, u32)>::try_from(point)
                && x < GAUGE_WIDTH
                && y < GAUGE_HEIGHT
            {
                self.put(x, y, color);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Rasterization
// =============================================================================

/// Fill width in pixels for a charge level, after clamping to 100.
#[inline]
pub const fn fill_width(level: u8) -> u32 {
    let level = if level > 100 { 100 } else { level };
    level as u32 * GAUGE_FILL_SPAN / 100
}

/// Draw the gauge for `level` into `bitmap`, replacing all previous content.
pub fn draw_gauge(
    bitmap: &mut GaugeBitmap,
    level: u8,
) {
    let scaled = fill_width(level);
    let right = GAUGE_WIDTH as i32 - 1;
    let bottom = GAUGE_HEIGHT as i32 - 1;

    bitmap.clear(BLACK).ok();

    // Battery tip, middle row of the right edge
    Pixel(Point::new(right, 1), WHITE).draw(bitmap).ok();

    // Frame corners
    Pixel(Point::new(0, 0), WHITE).draw(bitmap).ok();
    Pixel(Point::new(0, bottom), WHITE).draw(bitmap).ok();
    Pixel(Point::new(right, 0), WHITE).draw(bitmap).ok();
    Pixel(Point::new(right, bottom), WHITE).draw(bitmap).ok();

    if scaled > 0 {
        Rectangle::new(Point::zero(), Size::new(scaled, GAUGE_HEIGHT))
            .into_styled(PrimitiveStyle::with_fill(WHITE))
            .draw(bitmap)
            .ok();
    }
}

/// Pure gauge rendering: same level, byte-identical bitmap.
pub fn rasterize(level: u8) -> GaugeBitmap {
    let mut bitmap = GaugeBitmap::new();
    draw_gauge(&mut bitmap, level);
    bitmap
}

/// Owns one reusable gauge buffer per peripheral slot.
pub struct GaugeRasterizer {
    buffers: [GaugeBitmap; PERIPHERAL_COUNT],
}

impl GaugeRasterizer {
    /// Every slot starts as an empty gauge.
    pub fn new() -> Self {
        Self {
            buffers: core::array::from_fn(|_| rasterize(0)),
        }
    }

    /// Last rendered buffer of `slot`.
    #[inline]
    pub fn current(
        &self,
        slot: usize,
    ) -> Option<&GaugeBitmap> {
        self.buffers.get(slot)
    }

    /// Redraw the buffer of `slot` for `level`.
    ///
    /// Returns `None` for a slot beyond [`PERIPHERAL_COUNT`].
    pub fn render(
        &mut self,
        slot: usize,
        level: u8,
    ) -> Option<&GaugeBitmap> {
        let buffer = self.buffers.get_mut(slot)?;
        draw_gauge(buffer, level);
        Some(buffer)
    }
}

impl Default for GaugeRasterizer {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Lit pixels of the middle row, excluding the tip column.
    fn middle_row_fill(bitmap: &GaugeBitmap) -> u32 {
        (0..GAUGE_WIDTH - 1).filter(|&x| bitmap.pixel(x, 1).is_on()).count() as u32
    }

    #[test]
    fn test_gauge_bytes() {
        assert_eq!(GAUGE_BYTES, 24, "62x3 bits should pack into 24 bytes");
    }

    #[test]
    fn test_fill_width_truncates() {
        for level in 0..=100u8 {
            assert_eq!(fill_width(level), u32::from(level) * 60 / 100, "Level {level}");
        }
        assert_eq!(fill_width(1), 0, "1% should truncate to no fill");
        assert_eq!(fill_width(2), 1);
        assert_eq!(fill_width(99), 59);
    }

    #[test]
    fn test_fill_matches_level_for_all_percentages() {
        for level in 0..=100u8 {
            let bitmap = rasterize(level);
            assert_eq!(middle_row_fill(&bitmap), fill_width(level), "Level {level}: wrong fill width");
            // Fill is contiguous from the left edge
            for x in 0..fill_width(level) {
                for y in 0..GAUGE_HEIGHT {
                    assert!(bitmap.pixel(x, y).is_on(), "Level {level}: ({x},{y}) should be filled");
                }
            }
        }
    }

    #[test]
    fn test_over_100_clamps() {
        let full = rasterize(100);
        for level in [101u8, 150, 255] {
            assert_eq!(rasterize(level), full, "Level {level} should render as 100%");
        }
    }

    #[test]
    fn test_zero_draws_outline_only() {
        let bitmap = rasterize(0);
        let lit: Vec<(u32, u32)> = (0..GAUGE_HEIGHT)
            .flat_map(|y| (0..GAUGE_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| bitmap.pixel(x, y).is_on())
            .collect();
        assert_eq!(lit, vec![(0, 0), (61, 0), (61, 1), (0, 2), (61, 2)]);
    }

    #[test]
    fn test_tip_always_lit() {
        for level in [0u8, 1, 50, 100] {
            assert!(rasterize(level).pixel(61, 1).is_on(), "Tip missing at level {level}");
        }
    }

    #[test]
    fn test_rasterize_is_pure() {
        assert_eq!(rasterize(45).as_bytes(), rasterize(45).as_bytes());
    }

    #[test]
    fn test_redraw_leaves_no_residual_fill() {
        let mut bitmap = GaugeBitmap::new();
        draw_gauge(&mut bitmap, 90);
        draw_gauge(&mut bitmap, 45);
        assert_eq!(bitmap, rasterize(45), "Lower level must clear the previous fill");
    }

    #[test]
    fn test_rasterizer_slots() {
        let mut gauges = GaugeRasterizer::new();
        assert_eq!(gauges.render(0, 45), Some(&rasterize(45)));
        assert!(gauges.render(PERIPHERAL_COUNT, 45).is_none(), "Unknown slot should be rejected");
        assert_eq!(gauges.current(0), Some(&rasterize(45)), "Slot keeps its last rendering");
        assert_eq!(gauges.current(1), Some(&rasterize(0)), "Untouched slot shows an empty gauge");
    }

    #[test]
    fn test_out_of_bounds_pixel_reads_black() {
        let bitmap = rasterize(100);
        assert_eq!(bitmap.pixel(GAUGE_WIDTH, 0), BLACK);
        assert_eq!(bitmap.pixel(0, GAUGE_HEIGHT), BLACK);
    }
}
