//! Font metrics and text style.
//!
//! Glyph measurement is an external service: the layout core only asks a
//! [`FontMetrics`] implementation for the bounding box of one character in a
//! given style. [`MonospaceMetrics`] is a cell-based estimate for hosts (and
//! tests) without a real shaping engine.

use std::fmt;
use std::rc::Rc;

use unicode_width::UnicodeWidthChar;

use crate::primitives::{Color, Size};

/// Default advance of one cell at [`BASE_FONT_SIZE`].
pub const CHAR_WIDTH: f32 = 8.4;
/// Default line height at [`BASE_FONT_SIZE`].
pub const LINE_HEIGHT: f32 = 18.0;
/// Font size the defaults above are measured at.
pub const BASE_FONT_SIZE: f32 = 14.0;

/// Maps a character and style attributes to a bounding box.
pub trait FontMetrics {
    fn char_bounds(&self, c: char, size: f32, bold: bool, italic: bool) -> Size;
}

/// Text style shared by glyph leaves.
#[derive(Clone)]
pub struct Style {
    pub font_size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub font: Rc<dyn FontMetrics>,
}

impl fmt::Debug for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Style")
            .field("font_size", &self.font_size)
            .field("color", &self.color)
            .field("bold", &self.bold)
            .field("italic", &self.italic)
            .finish_non_exhaustive()
    }
}

impl Style {
    /// Create a regular style at the base font size.
    pub fn new(font: Rc<dyn FontMetrics>) -> Self {
        Self {
            font_size: BASE_FONT_SIZE,
            color: Color::WHITE,
            bold: false,
            italic: false,
            font,
        }
    }

    /// Set the font size.
    pub fn size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set the text color.
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set bold weight.
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic slant.
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Measure one character in this style.
    pub fn measure(&self, c: char) -> Size {
        self.font.char_bounds(c, self.font_size, self.bold, self.italic)
    }
}

/// Cell-grid metrics: every character is a whole number of cells wide.
///
/// Width comes from the Unicode East Asian Width of the character (1 for
/// Latin, 2 for CJK, 0 for combining marks and controls), scaled by font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Cell advance at [`BASE_FONT_SIZE`].
    pub cell_width: f32,
    /// Line height at [`BASE_FONT_SIZE`].
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            cell_width: CHAR_WIDTH,
            line_height: LINE_HEIGHT,
        }
    }
}

impl MonospaceMetrics {
    pub fn new(cell_width: f32, line_height: f32) -> Self {
        Self { cell_width, line_height }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn char_bounds(&self, c: char, size: f32, _bold: bool, _italic: bool) -> Size {
        let scale = size / BASE_FONT_SIZE;
        let cells = UnicodeWidthChar::width(c).unwrap_or(0) as f32;
        Size::new(cells * self.cell_width * scale, self.line_height * scale)
    }
}
