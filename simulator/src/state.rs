//! Simulated keyboard state behind the dongle display.
//!
//! `SimDevice` stands in for the firmware queries (`DeviceStatus`) and turns
//! key presses in the simulator window into the domain events the real event
//! bus would deliver.

use dongle_common::config::PERIPHERAL_COUNT;
use dongle_common::events::lock_bits::{CAPS_LOCK, NUM_LOCK, SCROLL_LOCK};
use dongle_common::events::modifier_bits::{LALT, LCTL, LGUI, LSFT};
use dongle_common::{DeviceStatus, Event, Transport};
use embedded_graphics_simulator::sdl2::Keycode;

/// Keymap layer names; the empty one exercises the index fallback.
const LAYER_NAMES: [&str; 4] = ["BASE", "NAV", "SYM", ""];

/// BLE profiles the simulated device cycles through (one past the glyph range).
const PROFILE_COUNT: usize = 6;

/// Battery change per key press, in percent.
const BATTERY_STEP: u8 = 10;

pub struct SimDevice {
    layer: u8,
    modifiers: u8,
    locks: u8,
    caps_word: bool,
    transport: Transport,
    profile: u8,
    bonded: [bool; PROFILE_COUNT],
    connected: [bool; PROFILE_COUNT],
    usb_ready: bool,
    battery: [u8; PERIPHERAL_COUNT],
}

impl SimDevice {
    pub const fn new() -> Self {
        Self {
            layer: 0,
            modifiers: 0,
            locks: 0,
            caps_word: false,
            transport: Transport::Usb,
            profile: 0,
            bonded: [true, true, false, false, false, false],
            connected: [true, false, false, false, false, false],
            usb_ready: true,
            battery: [100; PERIPHERAL_COUNT],
        }
    }

    /// Battery level of every peripheral, as reported at start-up.
    pub fn battery_events(&self) -> impl Iterator<Item = Event> + '_ {
        self.battery.iter().enumerate().map(|(source, &level)| Event::PeripheralBatteryChanged {
            source: source as u8,
            level,
        })
    }

    /// Drain one percent from `source`, as a slow background discharge.
    pub fn discharge(
        &mut self,
        source: usize,
    ) -> Option<Event> {
        let level = self.battery.get_mut(source)?;
        *level = level.saturating_sub(1);
        Some(Event::PeripheralBatteryChanged {
            source: source as u8,
            level: *level,
        })
    }

    fn adjust_battery(
        &mut self,
        source: usize,
        up: bool,
    ) -> Option<Event> {
        let level = self.battery.get_mut(source)?;
        *level = if up {
            level.saturating_add(BATTERY_STEP).min(100)
        } else {
            level.saturating_sub(BATTERY_STEP)
        };
        Some(Event::PeripheralBatteryChanged {
            source: source as u8,
            level: *level,
        })
    }

    /// Apply a key press and return the event it raises, if any.
    ///
    /// | Keys       | Effect                                   |
    /// |------------|------------------------------------------|
    /// | Q W E R    | toggle Control / GUI / Shift / Alt       |
    /// | L          | next layer                               |
    /// | C N K      | toggle caps / num / scroll lock          |
    /// | V          | toggle caps word                         |
    /// | T          | switch USB / BLE                         |
    /// | P          | next BLE profile                         |
    /// | B O        | toggle bonded / connected (this profile) |
    /// | U          | toggle USB HID ready                     |
    /// | Z X / G H  | peripheral 0 / 1 battery down / up       |
    pub fn on_key(
        &mut self,
        keycode: Keycode,
    ) -> Option<Event> {
        let profile = usize::from(self.profile);
        match keycode {
            Keycode::Q => self.toggle_modifier(LCTL),
            Keycode::W => self.toggle_modifier(LGUI),
            Keycode::E => self.toggle_modifier(LSFT),
            Keycode::R => self.toggle_modifier(LALT),
            Keycode::L => {
                self.layer = (self.layer + 1) % LAYER_NAMES.len() as u8;
                Some(Event::LayerStateChanged)
            }
            Keycode::C => self.toggle_lock(CAPS_LOCK),
            Keycode::N => self.toggle_lock(NUM_LOCK),
            Keycode::K => self.toggle_lock(SCROLL_LOCK),
            Keycode::V => {
                self.caps_word = !self.caps_word;
                Some(Event::CapsWordChanged { active: self.caps_word })
            }
            Keycode::T => {
                self.transport = match self.transport {
                    Transport::Usb => Transport::Ble,
                    Transport::Ble => Transport::Usb,
                };
                Some(Event::EndpointChanged)
            }
            Keycode::P => {
                self.profile = ((profile + 1) % PROFILE_COUNT) as u8;
                Some(Event::BleActiveProfileChanged)
            }
            Keycode::B => {
                self.bonded[profile] = !self.bonded[profile];
                Some(Event::BleActiveProfileChanged)
            }
            Keycode::O => {
                self.connected[profile] = !self.connected[profile];
                Some(Event::BleActiveProfileChanged)
            }
            Keycode::U => {
                self.usb_ready = !self.usb_ready;
                Some(Event::UsbConnStateChanged)
            }
            Keycode::Z => self.adjust_battery(0, false),
            Keycode::X => self.adjust_battery(0, true),
            Keycode::G => self.adjust_battery(1, false),
            Keycode::H => self.adjust_battery(1, true),
            _ => None,
        }
    }

    fn toggle_modifier(
        &mut self,
        bit: u8,
    ) -> Option<Event> {
        self.modifiers ^= bit;
        Some(Event::KeycodeStateChanged)
    }

    fn toggle_lock(
        &mut self,
        bit: u8,
    ) -> Option<Event> {
        self.locks ^= bit;
        Some(Event::HidIndicatorsChanged { indicators: self.locks })
    }
}

impl DeviceStatus for SimDevice {
    fn highest_active_layer(&self) -> u8 { self.layer }

    fn layer_name(
        &self,
        index: u8,
    ) -> Option<&str> {
        LAYER_NAMES.get(usize::from(index)).copied()
    }

    fn explicit_modifiers(&self) -> u8 { self.modifiers }

    fn selected_transport(&self) -> Transport { self.transport }

    fn active_profile_index(&self) -> u8 { self.profile }

    fn active_profile_connected(&self) -> bool { self.connected[usize::from(self.profile)] }

    fn active_profile_bonded(&self) -> bool { self.bonded[usize::from(self.profile)] }

    fn usb_hid_ready(&self) -> bool { self.usb_ready }
}
