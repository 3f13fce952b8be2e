//! Event subscription registry.
//!
//! A subscription binds an [`EventKind`] to an extractor, which derives a
//! widget state from the event (or from a device query), and an update
//! function, which fans that state out to the widget instances held by the
//! context `C`. Several subscriptions may feed the same widget kind; each
//! extractor fills only its own part of the state and the update merges it.
//!
//! Dispatch is a synchronous call chain: every matching subscription runs to
//! completion, in registration order, before `dispatch` returns.

use heapless::Vec;

use crate::error::Error;
use crate::events::{DeviceStatus, Event, EventKind};
use crate::{log_debug, log_error};

/// Derives a state from an event. `None` skips the update.
pub type Extract<S> = fn(&Event, &dyn DeviceStatus) -> Option<S>;

/// Applies a state to every instance of a widget kind.
pub type Update<C, S> = fn(&mut C, S);

/// One (event kind, extractor, update) binding.
pub struct Subscription<C, S> {
    pub kind: EventKind,
    pub extract: Extract<S>,
    pub update: Update<C, S>,
}

impl<C, S> Clone for Subscription<C, S> {
    fn clone(&self) -> Self { *self }
}

impl<C, S> Copy for Subscription<C, S> {}

/// Fixed-capacity list of subscriptions.
pub struct SubscriptionRegistry<C, S, const N: usize> {
    entries: Vec<Subscription<C, S>, N>,
}

impl<C, S, const N: usize> SubscriptionRegistry<C, S, N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `extract` and `update` to events of `kind`.
    pub fn register(
        &mut self,
        kind: EventKind,
        extract: Extract<S>,
        update: Update<C, S>,
    ) -> Result<(), Error> {
        let subscription = Subscription {
            kind,
            extract,
            update,
        };
        if self.entries.push(subscription).is_err() {
            log_error!("subscription registry full ({})", N);
            return Err(Error::SubscriptionRegistryFull);
        }
        Ok(())
    }

    /// Deliver `event` to every matching subscription.
    ///
    /// Returns the number of subscriptions that matched the event kind.
    pub fn dispatch(
        &self,
        context: &mut C,
        event: &Event,
        status: &dyn DeviceStatus,
    ) -> usize {
        let kind = event.kind();
        let mut matched = 0;
        for subscription in self.entries.iter().filter(|s| s.kind == kind) {
            matched += 1;
            if let Some(state) = (subscription.extract)(event, status) {
                (subscription.update)(context, state);
            }
        }
        log_debug!("event dispatched to {} listeners", matched);
        matched
    }

    /// Number of registered subscriptions.
    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<C, S, const N: usize> Default for SubscriptionRegistry<C, S, N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Transport;

    struct NoDevice;

    impl DeviceStatus for NoDevice {
        fn highest_active_layer(&self) -> u8 { 0 }

        fn layer_name(
            &self,
            _index: u8,
        ) -> Option<&str> {
            None
        }

        fn explicit_modifiers(&self) -> u8 { 0 }

        fn selected_transport(&self) -> Transport { Transport::Usb }

        fn active_profile_index(&self) -> u8 { 0 }

        fn active_profile_connected(&self) -> bool { false }

        fn active_profile_bonded(&self) -> bool { false }

        fn usb_hid_ready(&self) -> bool { false }
    }

    /// Caps lock and caps word merged into one stored state.
    #[derive(Default)]
    struct Label {
        caps_lock: bool,
        caps_word: bool,
        updates: u32,
    }

    enum Part {
        CapsLock(bool),
        CapsWord(bool),
    }

    fn extract_locks(
        event: &Event,
        _: &dyn DeviceStatus,
    ) -> Option<Part> {
        match *event {
            Event::HidIndicatorsChanged { indicators } => Some(Part::CapsLock(indicators & 0x02 != 0)),
            _ => None,
        }
    }

    fn extract_caps_word(
        event: &Event,
        _: &dyn DeviceStatus,
    ) -> Option<Part> {
        match *event {
            Event::CapsWordChanged { active } => Some(Part::CapsWord(active)),
            _ => None,
        }
    }

    fn merge(
        label: &mut Label,
        part: Part,
    ) {
        match part {
            Part::CapsLock(on) => label.caps_lock = on,
            Part::CapsWord(on) => label.caps_word = on,
        }
        label.updates += 1;
    }

    fn registry() -> SubscriptionRegistry<Label, Part, 4> {
        let mut registry = SubscriptionRegistry::new();
        registry.register(EventKind::HidIndicatorsChanged, extract_locks, merge).unwrap();
        registry.register(EventKind::CapsWordChanged, extract_caps_word, merge).unwrap();
        registry
    }

    #[test]
    fn test_dispatch_routes_by_kind() {
        let registry = registry();
        let mut label = Label::default();

        let matched = registry.dispatch(&mut label, &Event::CapsWordChanged { active: true }, &NoDevice);
        assert_eq!(matched, 1);
        assert!(label.caps_word);
        assert_eq!(label.updates, 1);
    }

    #[test]
    fn test_two_sources_merge() {
        let registry = registry();
        let mut label = Label::default();

        registry.dispatch(&mut label, &Event::CapsWordChanged { active: true }, &NoDevice);
        registry.dispatch(&mut label, &Event::HidIndicatorsChanged { indicators: 0x02 }, &NoDevice);
        assert!(label.caps_word && label.caps_lock, "Each source should keep the other's field");
    }

    #[test]
    fn test_unsubscribed_event_matches_nothing() {
        let registry = registry();
        let mut label = Label::default();
        assert_eq!(registry.dispatch(&mut label, &Event::LayerStateChanged, &NoDevice), 0);
        assert_eq!(label.updates, 0);
    }

    #[test]
    fn test_full_registry_rejects() {
        let mut registry: SubscriptionRegistry<Label, Part, 1> = SubscriptionRegistry::new();
        registry.register(EventKind::CapsWordChanged, extract_caps_word, merge).unwrap();
        assert_eq!(
            registry.register(EventKind::HidIndicatorsChanged, extract_locks, merge),
            Err(Error::SubscriptionRegistryFull)
        );
        assert_eq!(registry.len(), 1);
    }
}
