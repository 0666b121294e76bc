//! Leaf - the atomic content unit.
//!
//! A leaf has an intrinsic bounding box and no children. Width and height can
//! be pinned with `set_width`/`set_height`; passing `None` reverts to the
//! intrinsic size.

use std::rc::Rc;

use crate::font::Style;
use crate::primitives::{Point, Rect, Size};
use crate::surface::DrawingSurface;

/// What a leaf renders.
#[derive(Debug, Clone)]
pub enum LeafContent {
    /// A single character measured by its style's font.
    Glyph { c: char, style: Rc<Style> },
    /// An opaque box of fixed size (inline image, spacer).
    Box,
}

#[derive(Debug, Clone)]
pub struct Leaf {
    content: LeafContent,
    intrinsic: Size,
    fixed_width: Option<f32>,
    fixed_height: Option<f32>,
    position: Point,
}

impl Leaf {
    /// Create a glyph leaf, measuring it through the style's font metrics.
    pub fn glyph(c: char, style: Rc<Style>) -> Self {
        let intrinsic = style.measure(c);
        Self::with_content(LeafContent::Glyph { c, style }, intrinsic)
    }

    /// Create an opaque leaf with a fixed intrinsic size.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::with_content(LeafContent::Box, Size::new(width, height))
    }

    fn with_content(content: LeafContent, intrinsic: Size) -> Self {
        Self {
            content,
            intrinsic,
            fixed_width: None,
            fixed_height: None,
            position: Point::ORIGIN,
        }
    }

    pub fn content(&self) -> &LeafContent {
        &self.content
    }

    pub fn intrinsic(&self) -> Size {
        self.intrinsic
    }

    /// Current bounds, honoring any pinned width or height.
    pub fn bounds(&self) -> Size {
        Size::new(
            self.fixed_width.unwrap_or(self.intrinsic.width),
            self.fixed_height.unwrap_or(self.intrinsic.height),
        )
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.bounds())
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_width(&mut self, width: Option<f32>) {
        self.fixed_width = width;
    }

    pub fn set_height(&mut self, height: Option<f32>) {
        self.fixed_height = height;
    }

    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        match &self.content {
            LeafContent::Glyph { c, style } => {
                surface.styled(style).draw_char(*c, Some(self.rect()));
            }
            LeafContent::Box => {}
        }
    }
}
