//! Display primitive surface consumed by the widgets.
//!
//! Widgets never touch pixels directly (the gauge rasterizer excepted, which
//! owns its own bitmaps). They create drawables, then mutate text, image,
//! visibility, position and opacity through [`Surface`]. All primitives except
//! [`Surface::create`] are infallible: an unknown handle is ignored.
//!
//! [`crate::scene::Scene`] is the reference implementation that renders onto
//! an `embedded-graphics` draw target.

use crate::error::Error;
use crate::gauge::GaugeBitmap;

/// Opaque handle to a drawable created by a [`Surface`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawableId(u16);

impl DrawableId {
    /// Build a handle from a surface-internal slot index.
    #[inline]
    pub const fn from_index(index: u16) -> Self { Self(index) }

    /// Surface-internal slot index.
    #[inline]
    pub const fn index(self) -> usize { self.0 as usize }
}

/// Horizontal text alignment inside a label.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// What a drawable shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawableKind {
    /// Groups children; positions of children are relative to it.
    Container,
    /// Single line of text.
    Label(Align),
    /// One [`Glyph`].
    Image,
    /// Horizontal line of the given length, 2 px thick.
    Line(u32),
    /// Gauge-sized raster buffer.
    Canvas,
}

/// Built-in icon set.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    Control,
    /// Windows-style GUI key.
    Gui,
    Shift,
    Alt,
    /// macOS Command.
    Command,
    /// macOS Option.
    Option,
    Usb,
    Bluetooth,
    Ok,
    NotOk,
    /// Unbonded (open) BLE profile.
    Open,
    /// Profile number, 1-based.
    Digit(u8),
}

/// Animatable visual property of a drawable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Property {
    Opacity,
    X,
    Y,
}

/// Drawing primitives the widget engine is built on.
pub trait Surface {
    /// Create a drawable under `parent` (or at the screen root).
    fn create(
        &mut self,
        parent: Option<DrawableId>,
        kind: DrawableKind,
    ) -> Result<DrawableId, Error>;

    fn set_text(
        &mut self,
        id: DrawableId,
        text: &str,
    );

    fn set_image(
        &mut self,
        id: DrawableId,
        glyph: Glyph,
    );

    fn set_hidden(
        &mut self,
        id: DrawableId,
        hidden: bool,
    );

    fn is_hidden(
        &self,
        id: DrawableId,
    ) -> bool;

    fn set_x(
        &mut self,
        id: DrawableId,
        x: i32,
    );

    fn set_y(
        &mut self,
        id: DrawableId,
        y: i32,
    );

    fn x(
        &self,
        id: DrawableId,
    ) -> i32;

    fn y(
        &self,
        id: DrawableId,
    ) -> i32;

    fn set_opacity(
        &mut self,
        id: DrawableId,
        opacity: u8,
    );

    fn opacity(
        &self,
        id: DrawableId,
    ) -> u8;

    /// Attach a copy of `bitmap` to a canvas drawable.
    fn set_canvas(
        &mut self,
        id: DrawableId,
        bitmap: &GaugeBitmap,
    );

    /// Read an animatable property.
    fn get(
        &self,
        id: DrawableId,
        property: Property,
    ) -> i32 {
        match property {
            Property::Opacity => i32::from(self.opacity(id)),
            Property::X => self.x(id),
            Property::Y => self.y(id),
        }
    }

    /// Write an animatable property. Opacity is clamped to 0..=255.
    fn set(
        &mut self,
        id: DrawableId,
        property: Property,
        value: i32,
    ) {
        match property {
            Property::Opacity => self.set_opacity(id, value.clamp(0, 255) as u8),
            Property::X => self.set_x(id, value),
            Property::Y => self.set_y(id, value),
        }
    }
}
