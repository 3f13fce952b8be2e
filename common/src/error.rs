//! Construction-time errors.
//!
//! Only widget construction and subscription registration can fail. Event
//! handling and ticking never report errors: bad inputs fall back to a defined
//! visual and races resolve by cancel-and-restart.

use core::fmt;

/// Widget engine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No room for another instance of this widget kind
    InstanceRegistryFull,
    /// No room for another event subscription
    SubscriptionRegistryFull,
    /// The surface cannot create more drawables
    DrawableLimit,
}

impl fmt::Display for Error {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::InstanceRegistryFull => f.write_str("widget instance registry full"),
            Self::SubscriptionRegistryFull => f.write_str("subscription registry full"),
            Self::DrawableLimit => f.write_str("drawable limit reached"),
        }
    }
}

impl core::error::Error for Error {}
