//! Peripheral battery gauges.
//!
//! A container with one 62x3 canvas per peripheral slot, slot `i` at
//! `y = GAUGE_ROW_PITCH * i`. The engine rasterizes a slot once per update and
//! attaches the same buffer to that slot's canvas on every instance.

use crate::config::{GAUGE_ROW_PITCH, PERIPHERAL_COUNT};
use crate::error::Error;
use crate::gauge::GaugeBitmap;
use crate::surface::{DrawableId, DrawableKind, Surface};

pub struct BatteryWidget {
    root: DrawableId,
    gauges: [DrawableId; PERIPHERAL_COUNT],
}

impl BatteryWidget {
    /// Build the container and its canvases, each showing `initial(slot)`.
    pub fn new<'a, S: Surface>(
        surface: &mut S,
        parent: Option<DrawableId>,
        initial: impl Fn(usize) -> Option<&'a GaugeBitmap>,
    ) -> Result<Self, Error> {
        let root = surface.create(parent, DrawableKind::Container)?;
        let mut gauges = [root; PERIPHERAL_COUNT];
        for (slot, gauge) in gauges.iter_mut().enumerate() {
            *gauge = surface.create(Some(root), DrawableKind::Canvas)?;
            surface.set_y(*gauge, GAUGE_ROW_PITCH * slot as i32);
            if let Some(bitmap) = initial(slot) {
                surface.set_canvas(*gauge, bitmap);
            }
        }
        Ok(Self { root, gauges })
    }

    #[inline]
    pub const fn root(&self) -> DrawableId { self.root }

    /// Canvas of peripheral `slot`.
    pub fn gauge(
        &self,
        slot: usize,
    ) -> Option<DrawableId> {
        self.gauges.get(slot).copied()
    }

    /// Attach a freshly rendered buffer to `slot`.
    pub fn show<S: Surface>(
        &self,
        surface: &mut S,
        slot: usize,
        bitmap: &GaugeBitmap,
    ) {
        if let Some(gauge) = self.gauge(slot) {
            surface.set_canvas(gauge, bitmap);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::rasterize;
    use crate::scene::Scene;

    #[test]
    fn test_canvas_rows() {
        let mut scene: Scene<8> = Scene::new();
        let empty = rasterize(0);
        let widget = BatteryWidget::new(&mut scene, None, |_| Some(&empty)).unwrap();

        for slot in 0..PERIPHERAL_COUNT {
            let gauge = widget.gauge(slot).unwrap();
            assert_eq!(scene.parent(gauge), Some(widget.root()));
            assert_eq!(scene.y(gauge), GAUGE_ROW_PITCH * slot as i32, "Slot {slot} row offset");
            assert_eq!(scene.canvas(gauge), Some(&empty));
        }
        assert!(widget.gauge(PERIPHERAL_COUNT).is_none());
        assert_eq!(scene.children(widget.root()).count(), PERIPHERAL_COUNT, "Only gauge canvases, no slot labels");
    }

    #[test]
    fn test_show_replaces_bitmap() {
        let mut scene: Scene<8> = Scene::new();
        let widget = BatteryWidget::new(&mut scene, None, |_| None).unwrap();
        widget.show(&mut scene, 1, &rasterize(80));
        assert_eq!(scene.canvas(widget.gauge(1).unwrap()), Some(&rasterize(80)));
        assert_eq!(scene.canvas(widget.gauge(0).unwrap()), Some(&GaugeBitmap::new()), "Other slot untouched");
    }
}
