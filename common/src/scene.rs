//! Reference display surface: a fixed-capacity scene graph.
//!
//! [`Scene`] stores every drawable the widgets create (kind, parent, relative
//! position, hidden flag, opacity, text, glyph, canvas) and implements
//! [`Surface`] on top of it. [`Scene::draw`] renders the visible drawables onto
//! any `DrawTarget<Color = BinaryColor>`, e.g. an SSD1306 frame buffer or the
//! desktop simulator window.
//!
//! # Composition Rules
//!
//! - Positions are relative to the parent; roots are relative to the screen.
//! - A hidden drawable hides its whole subtree.
//! - Opacity multiplies down the tree. The panel is 1-bit, so a drawable is
//!   drawn when its effective opacity is at least [`OPA_HALF`].
//! - Drawables are painted in creation order; a parent is always created
//!   before its children.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;
use heapless::{String, Vec};

use crate::colors::{OPA_COVER, OPA_HALF, WHITE};
use crate::config::{GAUGE_HEIGHT, GAUGE_WIDTH, LABEL_LEN, SIZE_SYMBOLS};
use crate::error::Error;
use crate::gauge::GaugeBitmap;
use crate::styles::{CENTER_MIDDLE, GLYPH_STYLE, LABEL_STYLE, LEFT_TOP, RIGHT_TOP};
use crate::surface::{Align, DrawableId, DrawableKind, Glyph, Surface};

/// Edge length of the small status glyphs (ok / not ok / open).
const STATUS_GLYPH_SIZE: u32 = 7;

struct Node {
    kind: DrawableKind,
    parent: Option<DrawableId>,
    x: i32,
    y: i32,
    hidden: bool,
    opacity: u8,
    text: String<LABEL_LEN>,
    glyph: Option<Glyph>,
    canvas: Option<GaugeBitmap>,
    revision: u32,
}

impl Node {
    fn new(
        kind: DrawableKind,
        parent: Option<DrawableId>,
    ) -> Self {
        Self {
            kind,
            parent,
            x: 0,
            y: 0,
            hidden: false,
            opacity: OPA_COVER,
            text: String::new(),
            glyph: None,
            canvas: if kind == DrawableKind::Canvas { Some(GaugeBitmap::new()) } else { None },
            revision: 0,
        }
    }
}

/// Scene graph holding up to `N` drawables.
pub struct Scene<const N: usize> {
    nodes: Vec<Node, N>,
    dirty: bool,
}

impl<const N: usize> Scene<N> {
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            dirty: true,
        }
    }

    /// Number of drawables created so far.
    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    fn node(
        &self,
        id: DrawableId,
    ) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Mutable access for a write; marks the scene dirty.
    fn write(
        &mut self,
        id: DrawableId,
    ) -> Option<&mut Node> {
        let node = self.nodes.get_mut(id.index())?;
        node.revision = node.revision.wrapping_add(1);
        self.dirty = true;
        Some(node)
    }

    pub fn kind(
        &self,
        id: DrawableId,
    ) -> Option<DrawableKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn parent(
        &self,
        id: DrawableId,
    ) -> Option<DrawableId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Direct children of `id`, in creation order.
    pub fn children(
        &self,
        id: DrawableId,
    ) -> impl Iterator<Item = DrawableId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(id))
            .map(|(i, _)| DrawableId::from_index(i as u16))
    }

    pub fn text(
        &self,
        id: DrawableId,
    ) -> &str {
        self.node(id).map_or("", |n| n.text.as_str())
    }

    pub fn glyph(
        &self,
        id: DrawableId,
    ) -> Option<Glyph> {
        self.node(id).and_then(|n| n.glyph)
    }

    pub fn canvas(
        &self,
        id: DrawableId,
    ) -> Option<&GaugeBitmap> {
        self.node(id).and_then(|n| n.canvas.as_ref())
    }

    /// Number of writes made to `id` since creation.
    pub fn revision(
        &self,
        id: DrawableId,
    ) -> u32 {
        self.node(id).map_or(0, |n| n.revision)
    }

    /// Absolute top-left corner of `id` on screen.
    pub fn origin(
        &self,
        id: DrawableId,
    ) -> Point {
        let mut point = Point::zero();
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            point += Point::new(node.x, node.y);
            cursor = node.parent.and_then(|p| self.node(p));
        }
        point
    }

    /// Opacity after multiplying down from the root; 0 when any ancestor is hidden.
    pub fn effective_opacity(
        &self,
        id: DrawableId,
    ) -> u8 {
        let mut opacity = u32::from(OPA_COVER);
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            if node.hidden {
                return 0;
            }
            opacity = opacity * u32::from(node.opacity) / u32::from(OPA_COVER);
            cursor = node.parent.and_then(|p| self.node(p));
        }
        opacity as u8
    }

    /// Whether `id` ends up on the panel.
    pub fn is_visible(
        &self,
        id: DrawableId,
    ) -> bool {
        self.node(id).is_some() && self.effective_opacity(id) >= OPA_HALF
    }

    /// Returns `true` once after any write, then `false` until the next one.
    pub fn take_dirty(&mut self) -> bool { core::mem::replace(&mut self.dirty, false) }

    /// Render every visible drawable onto `target`.
    pub fn draw<D>(
        &self,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        for (i, node) in self.nodes.iter().enumerate() {
            let id = DrawableId::from_index(i as u16);
            if !self.is_visible(id) {
                continue;
            }
            let origin = self.origin(id);
            match node.kind {
                DrawableKind::Container => {}
                DrawableKind::Label(Align::Left) => {
                    Text::with_text_style(&node.text, origin, LABEL_STYLE, LEFT_TOP).draw(target)?;
                }
                DrawableKind::Label(Align::Right) => {
                    Text::with_text_style(&node.text, origin, LABEL_STYLE, RIGHT_TOP).draw(target)?;
                }
                DrawableKind::Image => {
                    if let Some(glyph) = node.glyph {
                        draw_glyph(target, glyph, origin)?;
                    }
                }
                DrawableKind::Line(length) => {
                    Line::new(origin, origin + Point::new(length as i32, 0))
                        .into_styled(PrimitiveStyle::with_stroke(WHITE, 2))
                        .draw(target)?;
                }
                DrawableKind::Canvas => {
                    if let Some(bitmap) = &node.canvas {
                        draw_bitmap(target, bitmap, origin)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<const N: usize> Default for Scene<N> {
    fn default() -> Self { Self::new() }
}

impl<const N: usize> Surface for Scene<N> {
    fn create(
        &mut self,
        parent: Option<DrawableId>,
        kind: DrawableKind,
    ) -> Result<DrawableId, Error> {
        let parent = parent.filter(|p| p.index() < self.nodes.len());
        let id = DrawableId::from_index(self.nodes.len() as u16);
        self.nodes.push(Node::new(kind, parent)).map_err(|_| Error::DrawableLimit)?;
        self.dirty = true;
        Ok(id)
    }

    fn set_text(
        &mut self,
        id: DrawableId,
        text: &str,
    ) {
        if let Some(node) = self.write(id) {
            node.text.clear();
            for c in text.chars() {
                if node.text.push(c).is_err() {
                    break;
                }
            }
        }
    }

    fn set_image(
        &mut self,
        id: DrawableId,
        glyph: Glyph,
    ) {
        if let Some(node) = self.write(id) {
            node.glyph = Some(glyph);
        }
    }

    fn set_hidden(
        &mut self,
        id: DrawableId,
        hidden: bool,
    ) {
        if let Some(node) = self.write(id) {
            node.hidden = hidden;
        }
    }

    fn is_hidden(
        &self,
        id: DrawableId,
    ) -> bool {
        self.node(id).is_some_and(|n| n.hidden)
    }

    fn set_x(
        &mut self,
        id: DrawableId,
        x: i32,
    ) {
        if let Some(node) = self.write(id) {
            node.x = x;
        }
    }

    fn set_y(
        &mut self,
        id: DrawableId,
        y: i32,
    ) {
        if let Some(node) = self.write(id) {
            node.y = y;
        }
    }

    fn x(
        &self,
        id: DrawableId,
    ) -> i32 {
        self.node(id).map_or(0, |n| n.x)
    }

    fn y(
        &self,
        id: DrawableId,
    ) -> i32 {
        self.node(id).map_or(0, |n| n.y)
    }

    fn set_opacity(
        &mut self,
        id: DrawableId,
        opacity: u8,
    ) {
        if let Some(node) = self.write(id) {
            node.opacity = opacity;
        }
    }

    fn opacity(
        &self,
        id: DrawableId,
    ) -> u8 {
        self.node(id).map_or(0, |n| n.opacity)
    }

    fn set_canvas(
        &mut self,
        id: DrawableId,
        bitmap: &GaugeBitmap,
    ) {
        if let Some(node) = self.write(id)
            && let Some(canvas) = node.canvas.as_mut()
        {
            canvas.clone_from(bitmap);
        }
    }
}

// =============================================================================
// Glyph Rendering
// =============================================================================

/// Letters drawn inside a modifier frame or as a bare transport label.
fn glyph_letters(glyph: Glyph) -> Option<&'static str> {
    const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    match glyph {
        Glyph::Control => Some("CT"),
        Glyph::Gui => Some("WN"),
        Glyph::Shift => Some("SH"),
        Glyph::Alt => Some("AL"),
        Glyph::Command => Some("CM"),
        Glyph::Option => Some("OP"),
        Glyph::Usb => Some("USB"),
        Glyph::Bluetooth => Some("BT"),
        Glyph::Digit(n) => Some(DIGITS[usize::from(n.min(9))]),
        Glyph::Ok | Glyph::NotOk | Glyph::Open => None,
    }
}

const fn is_modifier(glyph: Glyph) -> bool {
    matches!(
        glyph,
        Glyph::Control | Glyph::Gui | Glyph::Shift | Glyph::Alt | Glyph::Command | Glyph::Option
    )
}

fn draw_glyph<D>(
    target: &mut D,
    glyph: Glyph,
    origin: Point,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(WHITE, 1);
    let edge = STATUS_GLYPH_SIZE as i32 - 1;

    if is_modifier(glyph) {
        let frame = Rectangle::new(origin, Size::new_equal(SIZE_SYMBOLS as u32));
        RoundedRectangle::with_equal_corners(frame, Size::new_equal(3))
            .into_styled(stroke)
            .draw(target)?;
    }

    match glyph {
        Glyph::Ok => {
            Line::new(origin + Point::new(0, 3), origin + Point::new(2, 5))
                .into_styled(stroke)
                .draw(target)?;
            Line::new(origin + Point::new(2, 5), origin + Point::new(edge, 0))
                .into_styled(stroke)
                .draw(target)?;
        }
        Glyph::NotOk => {
            Line::new(origin, origin + Point::new(edge, edge))
                .into_styled(stroke)
                .draw(target)?;
            Line::new(origin + Point::new(0, edge), origin + Point::new(edge, 0))
                .into_styled(stroke)
                .draw(target)?;
        }
        Glyph::Open => {
            Circle::new(origin, STATUS_GLYPH_SIZE).into_styled(stroke).draw(target)?;
        }
        _ => {
            if let Some(letters) = glyph_letters(glyph) {
                let center = if is_modifier(glyph) {
                    origin + Point::new_equal(SIZE_SYMBOLS / 2)
                } else {
                    let width = letters.len() as i32 * 5;
                    origin + Point::new(width / 2, 4)
                };
                Text::with_text_style(letters, center, GLYPH_STYLE, CENTER_MIDDLE).draw(target)?;
            }
        }
    }
    Ok(())
}

fn draw_bitmap<D>(
    target: &mut D,
    bitmap: &GaugeBitmap,
    origin: Point,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let pixels = (0..GAUGE_HEIGHT)
        .flat_map(|y| (0..GAUGE_WIDTH).map(move |x| (x, y)))
        .filter(|&(x, y)| bitmap.pixel(x, y).is_on())
        .map(|(x, y)| Pixel(origin + Point::new(x as i32, y as i32), WHITE));
    target.draw_iter(pixels)
}

// =============================================================================
// Unit Tests
// =============================================================================
