//! Status widget engine for a split keyboard dongle display.
//!
//! This crate holds everything that does not depend on a concrete display
//! driver, shared between the desktop simulator and firmware builds:
//!
//! - [`display`]: the engine (subscriptions, registries, tick)
//! - [`widgets`]: battery, modifiers, layer, HID indicators, output status
//! - [`animations`]: tweens, the exclusive sequencer, deferred continuations
//! - [`gauge`]: pure 62x3 battery gauge rasterizer
//! - [`render`]: per-instance diff gate
//! - [`registry`] / [`subscriptions`]: instance lists and event bindings
//! - [`surface`] / [`scene`]: drawing primitives and the reference scene graph
//! - [`events`]: domain events and device queries
//! - [`colors`], [`config`], [`styles`]: display constants
//! - [`log_buffer`]: ring buffer behind the `log_*!` macros
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests. It never reads a clock: time enters
//! only through [`display::Display::tick`].

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod log_buffer;

pub mod animations;
pub mod colors;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod gauge;
pub mod registry;
pub mod render;
pub mod scene;
pub mod styles;
pub mod subscriptions;
pub mod surface;
pub mod widgets;

// Re-export commonly used items
pub use display::Display;
pub use error::Error;
pub use events::{DeviceStatus, Event, EventKind, Transport};
pub use gauge::{GaugeBitmap, rasterize};
pub use registry::WidgetHandle;
pub use scene::Scene;
pub use surface::{Align, DrawableId, DrawableKind, Glyph, Property, Surface};
