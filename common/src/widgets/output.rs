//! Output transport and connection status.
//!
//! Children, in creation order: usb, usb HID status, bt, bt profile number,
//! bt status, selection line. Only one transport group is visible at a time;
//! the selection line is kept for layout compatibility and always hidden.
//!
//! | Transport | Shown                  | Glyphs                                        |
//! |-----------|------------------------|-----------------------------------------------|
//! | USB       | usb, usb HID status    | Ok when HID ready, else NotOk                 |
//! | BLE       | bt, number, bt status  | Digit(1..=5) or NotOk; Open / Ok / NotOk      |

use crate::error::Error;
use crate::events::{DeviceStatus, Transport};
use crate::log_warn;
use crate::render::RenderedState;
use crate::surface::{DrawableId, DrawableKind, Glyph, Surface};

/// BLE profiles that have a number glyph.
const PROFILE_GLYPHS: u8 = 5;

// Child offsets inside the widget container
const USB_POS: (i32, i32) = (1, 4);
const USB_STATUS_POS: (i32, i32) = (3, 11);
const BT_POS: (i32, i32) = (23, 4);
const BT_NUMBER_POS: (i32, i32) = (35, 11);
const BT_STATUS_POS: (i32, i32) = (35, 5);
const SELECTION_POS: (i32, i32) = (4, 2);
const SELECTION_LEN: u32 = 13;

/// Output facts the widget draws from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputState {
    pub transport: Transport,
    /// Zero-based active BLE profile.
    pub profile_index: u8,
    pub connected: bool,
    pub bonded: bool,
    pub usb_hid_ready: bool,
}

impl OutputState {
    /// Read the current output state from the device.
    pub fn query(status: &dyn DeviceStatus) -> Self {
        Self {
            transport: status.selected_transport(),
            profile_index: status.active_profile_index(),
            connected: status.active_profile_connected(),
            bonded: status.active_profile_bonded(),
            usb_hid_ready: status.usb_hid_ready(),
        }
    }

    /// Profile number glyph, NotOk for an index without one.
    pub fn profile_glyph(&self) -> Glyph {
        if self.profile_index < PROFILE_GLYPHS {
            Glyph::Digit(self.profile_index + 1)
        } else {
            log_warn!("no glyph for profile {}", self.profile_index);
            Glyph::NotOk
        }
    }

    /// Open for an unbonded profile, else whether it is connected.
    pub const fn ble_status_glyph(&self) -> Glyph {
        match (self.bonded, self.connected) {
            (false, _) => Glyph::Open,
            (true, true) => Glyph::Ok,
            (true, false) => Glyph::NotOk,
        }
    }

    pub const fn usb_status_glyph(&self) -> Glyph { if self.usb_hid_ready { Glyph::Ok } else { Glyph::NotOk } }
}

pub struct OutputWidget {
    root: DrawableId,
    usb: DrawableId,
    usb_hid_status: DrawableId,
    bt: DrawableId,
    bt_number: DrawableId,
    bt_status: DrawableId,
    selection_line: DrawableId,
    rendered: RenderedState<OutputState>,
}

impl OutputWidget {
    pub fn new<S: Surface>(
        surface: &mut S,
        parent: Option<DrawableId>,
    ) -> Result<Self, Error> {
        let root = surface.create(parent, DrawableKind::Container)?;
        let mut image = |(x, y): (i32, i32), glyph: Option<Glyph>| -> Result<DrawableId, Error> {
            let id = surface.create(Some(root), DrawableKind::Image)?;
            surface.set_x(id, x);
            surface.set_y(id, y);
            if let Some(glyph) = glyph {
                surface.set_image(id, glyph);
            }
            Ok(id)
        };
        let usb = image(USB_POS, Some(Glyph::Usb))?;
        let usb_hid_status = image(USB_STATUS_POS, None)?;
        let bt = image(BT_POS, Some(Glyph::Bluetooth))?;
        let bt_number = image(BT_NUMBER_POS, None)?;
        let bt_status = image(BT_STATUS_POS, None)?;

        let selection_line = surface.create(Some(root), DrawableKind::Line(SELECTION_LEN))?;
        surface.set_x(selection_line, SELECTION_POS.0);
        surface.set_y(selection_line, SELECTION_POS.1);
        surface.set_hidden(selection_line, true);

        Ok(Self {
            root,
            usb,
            usb_hid_status,
            bt,
            bt_number,
            bt_status,
            selection_line,
            rendered: RenderedState::new(),
        })
    }

    #[inline]
    pub const fn root(&self) -> DrawableId { self.root }

    /// Children in creation order.
    pub const fn children(&self) -> [DrawableId; 6] {
        [self.usb, self.usb_hid_status, self.bt, self.bt_number, self.bt_status, self.selection_line]
    }

    /// Redraw for `state` when any field changed. Returns whether it did.
    pub fn update<S: Surface>(
        &mut self,
        surface: &mut S,
        state: OutputState,
    ) -> bool {
        if !self.rendered.accept(state).proceeds() {
            return false;
        }

        surface.set_hidden(self.selection_line, true);

        let usb = state.transport == Transport::Usb;
        for id in [self.usb, self.usb_hid_status] {
            surface.set_hidden(id, !usb);
        }
        for id in [self.bt, self.bt_number, self.bt_status] {
            surface.set_hidden(id, usb);
        }

        match state.transport {
            Transport::Usb => surface.set_image(self.usb_hid_status, state.usb_status_glyph()),
            Transport::Ble => {
                surface.set_image(self.bt_number, state.profile_glyph());
                surface.set_image(self.bt_status, state.ble_status_glyph());
            }
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn ble(
        profile_index: u8,
        bonded: bool,
        connected: bool,
    ) -> OutputState {
        OutputState {
            transport: Transport::Ble,
            profile_index,
            connected,
            bonded,
            usb_hid_ready: false,
        }
    }

    fn setup() -> (Scene<8>, OutputWidget) {
        let mut scene = Scene::new();
        let widget = OutputWidget::new(&mut scene, None).unwrap();
        (scene, widget)
    }

    #[test]
    fn test_profile_glyphs() {
        assert_eq!(ble(0, true, true).profile_glyph(), Glyph::Digit(1));
        assert_eq!(ble(4, true, true).profile_glyph(), Glyph::Digit(5));
        assert_eq!(ble(5, true, true).profile_glyph(), Glyph::NotOk, "Unknown profile maps to the error glyph");
    }

    #[test]
    fn test_ble_status_glyphs() {
        assert_eq!(ble(0, false, true).ble_status_glyph(), Glyph::Open, "Unbonded wins over connected");
        assert_eq!(ble(0, true, true).ble_status_glyph(), Glyph::Ok);
        assert_eq!(ble(0, true, false).ble_status_glyph(), Glyph::NotOk);
    }

    #[test]
    fn test_usb_shows_only_usb_group() {
        let (mut scene, mut widget) = setup();
        let state = OutputState {
            usb_hid_ready: true,
            ..OutputState::default()
        };
        assert!(widget.update(&mut scene, state));

        let [usb, usb_status, bt, bt_number, bt_status, line] = widget.children();
        assert!(!scene.is_hidden(usb) && !scene.is_hidden(usb_status));
        assert!(scene.is_hidden(bt) && scene.is_hidden(bt_number) && scene.is_hidden(bt_status));
        assert!(scene.is_hidden(line), "Selection line is always hidden");
        assert_eq!(scene.glyph(usb_status), Some(Glyph::Ok));
    }

    #[test]
    fn test_ble_shows_only_bt_group() {
        let (mut scene, mut widget) = setup();
        widget.update(&mut scene, ble(2, true, false));

        let [usb, usb_status, bt, bt_number, bt_status, _] = widget.children();
        assert!(scene.is_hidden(usb) && scene.is_hidden(usb_status));
        assert!(!scene.is_hidden(bt));
        assert_eq!(scene.glyph(bt_number), Some(Glyph::Digit(3)));
        assert_eq!(scene.glyph(bt_status), Some(Glyph::NotOk));
    }

    #[test]
    fn test_field_change_redraws() {
        let (mut scene, mut widget) = setup();
        widget.update(&mut scene, ble(0, true, false));
        assert!(!widget.update(&mut scene, ble(0, true, false)), "Same state is absorbed");
        assert!(widget.update(&mut scene, ble(0, true, true)), "Connection change redraws");
        assert_eq!(scene.glyph(widget.children()[4]), Some(Glyph::Ok));
    }
}
