//! Domain events delivered to the widget engine and device state queries.
//!
//! Events arrive one at a time from the keyboard's event bus. Some carry
//! their payload (battery level, lock bits); others are bare notifications
//! and the engine pulls the current value through [`DeviceStatus`].

// =============================================================================
// Bit Masks
// =============================================================================

/// HID keyboard LED report bits.
pub mod lock_bits {
    pub const NUM_LOCK: u8 = 0x01;
    pub const CAPS_LOCK: u8 = 0x02;
    pub const SCROLL_LOCK: u8 = 0x04;
}

/// HID modifier byte bits (left hand in the low nibble, right hand in the high).
pub mod modifier_bits {
    pub const LCTL: u8 = 0x01;
    pub const LSFT: u8 = 0x02;
    pub const LALT: u8 = 0x04;
    pub const LGUI: u8 = 0x08;
    pub const RCTL: u8 = 0x10;
    pub const RSFT: u8 = 0x20;
    pub const RALT: u8 = 0x40;
    pub const RGUI: u8 = 0x80;

    /// Either control key.
    pub const CTL: u8 = LCTL | RCTL;
    /// Either shift key.
    pub const SFT: u8 = LSFT | RSFT;
    /// Either alt key.
    pub const ALT: u8 = LALT | RALT;
    /// Either GUI key.
    pub const GUI: u8 = LGUI | RGUI;
}

// =============================================================================
// Events
// =============================================================================

/// Domain events the display reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A split peripheral reported a new battery percentage.
    PeripheralBatteryChanged { source: u8, level: u8 },
    /// Host changed the keyboard LED report.
    HidIndicatorsChanged { indicators: u8 },
    /// Caps word toggled.
    CapsWordChanged { active: bool },
    /// A key was pressed or released; modifiers are re-queried.
    KeycodeStateChanged,
    /// Layer activation changed; the highest layer is re-queried.
    LayerStateChanged,
    /// Preferred output transport changed.
    EndpointChanged,
    /// Active BLE profile switched or its connection changed.
    BleActiveProfileChanged,
    /// USB connection state changed.
    UsbConnStateChanged,
}

/// Event discriminant used as the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    PeripheralBatteryChanged,
    HidIndicatorsChanged,
    CapsWordChanged,
    KeycodeStateChanged,
    LayerStateChanged,
    EndpointChanged,
    BleActiveProfileChanged,
    UsbConnStateChanged,
}

impl Event {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::PeripheralBatteryChanged { .. } => EventKind::PeripheralBatteryChanged,
            Self::HidIndicatorsChanged { .. } => EventKind::HidIndicatorsChanged,
            Self::CapsWordChanged { .. } => EventKind::CapsWordChanged,
            Self::KeycodeStateChanged => EventKind::KeycodeStateChanged,
            Self::LayerStateChanged => EventKind::LayerStateChanged,
            Self::EndpointChanged => EventKind::EndpointChanged,
            Self::BleActiveProfileChanged => EventKind::BleActiveProfileChanged,
            Self::UsbConnStateChanged => EventKind::UsbConnStateChanged,
        }
    }
}

// =============================================================================
// Device Queries
// =============================================================================

/// Output transport selected for HID reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    #[default]
    Usb,
    Ble,
}

/// Current device state, queried by extractors for bare notification events
/// and by the initial sync after construction.
pub trait DeviceStatus {
    /// Index of the highest active layer.
    fn highest_active_layer(&self) -> u8;

    /// Display name of layer `index`, if the keymap defines one.
    fn layer_name(
        &self,
        index: u8,
    ) -> Option<&str>;

    /// Currently held modifiers as a HID modifier byte.
    fn explicit_modifiers(&self) -> u8;

    fn selected_transport(&self) -> Transport;

    /// Zero-based index of the active BLE profile.
    fn active_profile_index(&self) -> u8;

    fn active_profile_connected(&self) -> bool;

    fn active_profile_bonded(&self) -> bool;

    /// Whether the USB HID interface is enumerated and ready.
    fn usb_hid_ready(&self) -> bool;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ignores_payload() {
        let a = Event::PeripheralBatteryChanged { source: 0, level: 10 };
        let b = Event::PeripheralBatteryChanged { source: 1, level: 90 };
        assert_eq!(a.kind(), b.kind());
        assert_ne!(a.kind(), Event::CapsWordChanged { active: true }.kind());
    }

    #[test]
    fn test_modifier_masks_cover_both_hands() {
        assert_eq!(modifier_bits::CTL | modifier_bits::SFT | modifier_bits::ALT | modifier_bits::GUI, 0xFF);
        assert_eq!(modifier_bits::SFT & modifier_bits::RSFT, modifier_bits::RSFT);
    }
}
