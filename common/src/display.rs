//! The widget update engine.
//!
//! [`Display`] owns the drawing surface, the animation machinery, one
//! instance registry per widget kind and the event subscriptions that connect
//! domain events to those registries.
//!
//! # Event Flow
//!
//! ```text
//! handle(event)
//!   -> subscriptions matching event.kind()
//!      -> extract(event, device)  -> WidgetState
//!      -> update(screen, state)   -> every instance of the kind
//!         -> diff gate -> layout / tween / rasterize -> Surface
//! ```
//!
//! # Cooperative Timing
//!
//! Nothing here reads a clock. The host calls [`Display::tick`] periodically
//! (the simulator once per frame, firmware from its display task); events
//! handled between ticks are stamped with the last tick time. Tweens and
//! deferred continuations advance only inside `tick`, on the same context that
//! handles events, so no locking is needed.

use embassy_time::Instant;

use crate::animations::{Scheduler, Sequencer};
use crate::config::{MAX_INSTANCES, MAX_SUBSCRIPTIONS, PERIPHERAL_COUNT};
use crate::error::Error;
use crate::events::{DeviceStatus, Event, EventKind};
use crate::gauge::GaugeRasterizer;
use crate::log_buffer::set_clock;
use crate::registry::{WidgetHandle, WidgetRegistry};
use crate::subscriptions::SubscriptionRegistry;
use crate::surface::{DrawableId, Surface};
use crate::widgets::{
    BatteryWidget,
    Continuation,
    Frame,
    HidIndicatorsWidget,
    LayerWidget,
    ModifiersWidget,
    OutputState,
    OutputWidget,
    WidgetState,
    label_text,
};
use crate::{log_info, log_warn};

/// Everything the subscriptions mutate.
pub struct Screen<S: Surface> {
    surface: S,
    sequencer: Sequencer,
    timers: Scheduler<Continuation>,
    gauges: GaugeRasterizer,
    now: Instant,
    batteries: WidgetRegistry<BatteryWidget, MAX_INSTANCES>,
    modifiers: WidgetRegistry<ModifiersWidget, MAX_INSTANCES>,
    layers: WidgetRegistry<LayerWidget, MAX_INSTANCES>,
    indicators: WidgetRegistry<HidIndicatorsWidget, MAX_INSTANCES>,
    outputs: WidgetRegistry<OutputWidget, MAX_INSTANCES>,
}

impl<S: Surface> Screen<S> {
    fn new(surface: S) -> Self {
        Self {
            surface,
            sequencer: Sequencer::new(),
            timers: Scheduler::new(),
            gauges: GaugeRasterizer::new(),
            now: Instant::from_millis(0),
            batteries: WidgetRegistry::new(),
            modifiers: WidgetRegistry::new(),
            layers: WidgetRegistry::new(),
            indicators: WidgetRegistry::new(),
            outputs: WidgetRegistry::new(),
        }
    }

    /// Run every continuation due at the current time.
    fn run_due(&mut self) -> usize {
        let mut fired = 0;
        while let Some((id, job)) = self.timers.pop_due(self.now) {
            fired += 1;
            match job {
                Continuation::LayerSwapIn { instance, text } => {
                    let mut frame = Frame {
                        surface: &mut self.surface,
                        sequencer: &mut self.sequencer,
                        now: self.now,
                    };
                    if let Some(layer) = self.layers.at_mut(usize::from(instance))
                        && layer.pending() == Some(id)
                    {
                        layer.swap_in(&mut frame, &text);
                    }
                }
            }
        }
        fired
    }
}

// =============================================================================
// Extractors
// =============================================================================

fn extract_battery(
    event: &Event,
    _: &dyn DeviceStatus,
) -> Option<WidgetState> {
    match *event {
        Event::PeripheralBatteryChanged { source, level } => Some(WidgetState::Battery { source, level }),
        _ => None,
    }
}

fn extract_modifiers(
    _: &Event,
    status: &dyn DeviceStatus,
) -> Option<WidgetState> {
    Some(WidgetState::Modifiers(status.explicit_modifiers()))
}

fn extract_layer(
    _: &Event,
    status: &dyn DeviceStatus,
) -> Option<WidgetState> {
    let index = status.highest_active_layer();
    let name = status
        .layer_name(index)
        .filter(|name| !name.is_empty())
        .map(|name| label_text(index, Some(name)));
    Some(WidgetState::Layer { index, name })
}

fn extract_locks(
    event: &Event,
    _: &dyn DeviceStatus,
) -> Option<WidgetState> {
    match *event {
        Event::HidIndicatorsChanged { indicators } => Some(WidgetState::LockIndicators(indicators)),
        _ => None,
    }
}

fn extract_caps_word(
    event: &Event,
    _: &dyn DeviceStatus,
) -> Option<WidgetState> {
    match *event {
        Event::CapsWordChanged { active } => Some(WidgetState::CapsWord(active)),
        _ => None,
    }
}

fn extract_output(
    _: &Event,
    status: &dyn DeviceStatus,
) -> Option<WidgetState> {
    Some(WidgetState::Output(OutputState::query(status)))
}

// =============================================================================
// Updates
// =============================================================================

fn update_battery<S: Surface>(
    screen: &mut Screen<S>,
    state: WidgetState,
) {
    let WidgetState::Battery { source, level } = state else {
        return;
    };
    let slot = usize::from(source);
    if slot >= PERIPHERAL_COUNT {
        log_warn!("battery source {} out of range", source);
        return;
    }
    let Some(bitmap) = screen.gauges.render(slot, level) else {
        return;
    };
    let surface = &mut screen.surface;
    screen.batteries.for_each_mut(|widget| widget.show(surface, slot, bitmap));
}

fn update_modifiers<S: Surface>(
    screen: &mut Screen<S>,
    state: WidgetState,
) {
    let WidgetState::Modifiers(mods) = state else {
        return;
    };
    let mut frame = Frame {
        surface: &mut screen.surface,
        sequencer: &mut screen.sequencer,
        now: screen.now,
    };
    screen.modifiers.for_each_mut(|widget| {
        widget.update(&mut frame, mods);
    });
}

fn update_layer<S: Surface>(
    screen: &mut Screen<S>,
    state: WidgetState,
) {
    let WidgetState::Layer { index, name } = state else {
        return;
    };
    let text = label_text(index, name.as_deref());
    let mut frame = Frame {
        surface: &mut screen.surface,
        sequencer: &mut screen.sequencer,
        now: screen.now,
    };
    let timers = &mut screen.timers;
    let mut instance = 0u8;
    screen.layers.for_each_mut(|widget| {
        widget.update(&mut frame, timers, instance, text.clone());
        instance += 1;
    });
}

fn update_indicators<S: Surface>(
    screen: &mut Screen<S>,
    state: WidgetState,
) {
    let surface = &mut screen.surface;
    match state {
        WidgetState::LockIndicators(bits) => screen.indicators.for_each_mut(|widget| {
            widget.set_locks(surface, bits);
        }),
        WidgetState::CapsWord(active) => screen.indicators.for_each_mut(|widget| {
            widget.set_caps_word(surface, active);
        }),
        _ => {}
    }
}

fn update_output<S: Surface>(
    screen: &mut Screen<S>,
    state: WidgetState,
) {
    let WidgetState::Output(output) = state else {
        return;
    };
    let surface = &mut screen.surface;
    screen.outputs.for_each_mut(|widget| {
        widget.update(surface, output);
    });
}

// =============================================================================
// Display
// =============================================================================

/// Widget engine bound to one drawing surface.
pub struct Display<S: Surface> {
    subscriptions: SubscriptionRegistry<Screen<S>, WidgetState, MAX_SUBSCRIPTIONS>,
    screen: Screen<S>,
}

impl<S: Surface> Display<S> {
    /// Take ownership of `surface` and register every widget subscription.
    pub fn new(surface: S) -> Result<Self, Error> {
        let mut subscriptions = SubscriptionRegistry::new();
        subscriptions.register(EventKind::PeripheralBatteryChanged, extract_battery, update_battery::<S>)?;
        subscriptions.register(EventKind::KeycodeStateChanged, extract_modifiers, update_modifiers::<S>)?;
        subscriptions.register(EventKind::LayerStateChanged, extract_layer, update_layer::<S>)?;
        subscriptions.register(EventKind::HidIndicatorsChanged, extract_locks, update_indicators::<S>)?;
        subscriptions.register(EventKind::CapsWordChanged, extract_caps_word, update_indicators::<S>)?;
        for kind in [
            EventKind::EndpointChanged,
            EventKind::BleActiveProfileChanged,
            EventKind::UsbConnStateChanged,
        ] {
            subscriptions.register(kind, extract_output, update_output::<S>)?;
        }
        log_info!("display ready, {} subscriptions", subscriptions.len());

        Ok(Self {
            subscriptions,
            screen: Screen::new(surface),
        })
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn init_battery(
        &mut self,
        parent: Option<DrawableId>,
    ) -> Result<WidgetHandle<BatteryWidget>, Error> {
        let screen = &mut self.screen;
        screen.batteries.check_capacity()?;
        let gauges = &screen.gauges;
        let widget = BatteryWidget::new(&mut screen.surface, parent, |slot| gauges.current(slot))?;
        let handle = screen.batteries.append(widget)?;
        log_info!("battery widget {} registered", handle.index());
        Ok(handle)
    }

    pub fn init_modifiers(
        &mut self,
        parent: Option<DrawableId>,
    ) -> Result<WidgetHandle<ModifiersWidget>, Error> {
        self.screen.modifiers.check_capacity()?;
        let widget = ModifiersWidget::new(&mut self.screen.surface, parent)?;
        let handle = self.screen.modifiers.append(widget)?;
        log_info!("modifiers widget {} registered", handle.index());
        Ok(handle)
    }

    pub fn init_layer(
        &mut self,
        parent: Option<DrawableId>,
    ) -> Result<WidgetHandle<LayerWidget>, Error> {
        self.screen.layers.check_capacity()?;
        let widget = LayerWidget::new(&mut self.screen.surface, parent)?;
        let handle = self.screen.layers.append(widget)?;
        log_info!("layer widget {} registered", handle.index());
        Ok(handle)
    }

    pub fn init_hid_indicators(
        &mut self,
        parent: Option<DrawableId>,
    ) -> Result<WidgetHandle<HidIndicatorsWidget>, Error> {
        self.screen.indicators.check_capacity()?;
        let widget = HidIndicatorsWidget::new(&mut self.screen.surface, parent)?;
        let handle = self.screen.indicators.append(widget)?;
        log_info!("hid indicators widget {} registered", handle.index());
        Ok(handle)
    }

    pub fn init_output(
        &mut self,
        parent: Option<DrawableId>,
    ) -> Result<WidgetHandle<OutputWidget>, Error> {
        self.screen.outputs.check_capacity()?;
        let widget = OutputWidget::new(&mut self.screen.surface, parent)?;
        let handle = self.screen.outputs.append(widget)?;
        log_info!("output widget {} registered", handle.index());
        Ok(handle)
    }

    // -------------------------------------------------------------------------
    // Drawable roots
    // -------------------------------------------------------------------------

    pub fn battery_root(
        &self,
        handle: WidgetHandle<BatteryWidget>,
    ) -> Option<DrawableId> {
        self.screen.batteries.get(handle).map(BatteryWidget::root)
    }

    pub fn modifiers_root(
        &self,
        handle: WidgetHandle<ModifiersWidget>,
    ) -> Option<DrawableId> {
        self.screen.modifiers.get(handle).map(ModifiersWidget::root)
    }

    pub fn layer_root(
        &self,
        handle: WidgetHandle<LayerWidget>,
    ) -> Option<DrawableId> {
        self.screen.layers.get(handle).map(LayerWidget::root)
    }

    pub fn hid_indicators_root(
        &self,
        handle: WidgetHandle<HidIndicatorsWidget>,
    ) -> Option<DrawableId> {
        self.screen.indicators.get(handle).map(HidIndicatorsWidget::root)
    }

    pub fn output_root(
        &self,
        handle: WidgetHandle<OutputWidget>,
    ) -> Option<DrawableId> {
        self.screen.outputs.get(handle).map(OutputWidget::root)
    }

    /// Widget behind `handle`, for inspection.
    pub fn modifiers(
        &self,
        handle: WidgetHandle<ModifiersWidget>,
    ) -> Option<&ModifiersWidget> {
        self.screen.modifiers.get(handle)
    }

    pub fn layer(
        &self,
        handle: WidgetHandle<LayerWidget>,
    ) -> Option<&LayerWidget> {
        self.screen.layers.get(handle)
    }

    pub fn battery(
        &self,
        handle: WidgetHandle<BatteryWidget>,
    ) -> Option<&BatteryWidget> {
        self.screen.batteries.get(handle)
    }

    pub fn output(
        &self,
        handle: WidgetHandle<OutputWidget>,
    ) -> Option<&OutputWidget> {
        self.screen.outputs.get(handle)
    }

    // -------------------------------------------------------------------------
    // Runtime
    // -------------------------------------------------------------------------

    /// Deliver one domain event. Returns how many subscriptions matched.
    pub fn handle(
        &mut self,
        event: &Event,
        status: &dyn DeviceStatus,
    ) -> usize {
        self.subscriptions.dispatch(&mut self.screen, event, status)
    }

    /// Pull modifiers, layer and output state from the device once.
    ///
    /// Call after all widgets are constructed so query-driven kinds start
    /// with the real device state instead of waiting for the first event.
    pub fn sync(
        &mut self,
        status: &dyn DeviceStatus,
    ) {
        for event in [Event::KeycodeStateChanged, Event::LayerStateChanged, Event::EndpointChanged] {
            self.handle(&event, status);
        }
    }

    /// Advance animations to `now` and run due continuations.
    ///
    /// Returns the number of tweens still running.
    pub fn tick(
        &mut self,
        now: Instant,
    ) -> usize {
        set_clock(now);
        self.screen.now = now;
        let screen = &mut self.screen;
        screen.sequencer.tick(&mut screen.surface, now);
        screen.run_due();
        screen.sequencer.len()
    }

    /// Engine time of the last tick.
    #[inline]
    pub fn now(&self) -> Instant { self.screen.now }

    /// Whether any tween or continuation is still in flight.
    pub fn is_animating(&self) -> bool { !self.screen.sequencer.is_idle() || !self.screen.timers.is_empty() }

    #[inline]
    pub fn sequencer(&self) -> &Sequencer { &self.screen.sequencer }

    #[inline]
    pub fn surface(&self) -> &S { &self.screen.surface }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S { &mut self.screen.surface }

    /// Give the surface back, dropping the engine.
    pub fn into_surface(self) -> S { self.screen.surface }
}
