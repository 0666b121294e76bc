//! Drawing surface abstraction.
//!
//! Nodes draw by issuing character commands to a [`DrawingSurface`]. A surface
//! can hand out a style-scoped sub-surface for a subtree; commands issued on it
//! carry that style. [`RecordingSurface`] collects commands into a list, which
//! is what a GPU or terminal backend would consume in batch.

use crate::font::Style;
use crate::primitives::{Color, Rect};

/// Receives draw commands from layout nodes.
pub trait DrawingSurface {
    /// Draw a character, optionally inside a known bounding box.
    fn draw_char(&mut self, c: char, bounds: Option<Rect>);

    /// Open a nested surface scoped to `style`.
    fn styled<'s>(&'s mut self, style: &Style) -> Box<dyn DrawingSurface + 's>;
}

/// Style attributes captured on a recorded command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

impl From<&Style> for TextStyle {
    fn from(style: &Style) -> Self {
        Self {
            font_size: style.font_size,
            color: style.color,
            bold: style.bold,
            italic: style.italic,
        }
    }
}

/// One recorded character draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub c: char,
    pub bounds: Option<Rect>,
    pub style: Option<TextStyle>,
}

/// A surface that records every command instead of rasterizing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// The recorded characters in draw order.
    pub fn text(&self) -> String {
        self.commands.iter().map(|cmd| cmd.c).collect()
    }
}

impl DrawingSurface for RecordingSurface {
    fn draw_char(&mut self, c: char, bounds: Option<Rect>) {
        self.commands.push(DrawCommand { c, bounds, style: None });
    }

    fn styled<'s>(&'s mut self, style: &Style) -> Box<dyn DrawingSurface + 's> {
        Box::new(StyledRecorder {
            commands: &mut self.commands,
            style: TextStyle::from(style),
        })
    }
}

/// Style-scoped view over a [`RecordingSurface`]'s command list.
struct StyledRecorder<'a> {
    commands: &'a mut Vec<DrawCommand>,
    style: TextStyle,
}

impl DrawingSurface for StyledRecorder<'_> {
    fn draw_char(&mut self, c: char, bounds: Option<Rect>) {
        self.commands.push(DrawCommand {
            c,
            bounds,
            style: Some(self.style),
        });
    }

    fn styled<'s>(&'s mut self, style: &Style) -> Box<dyn DrawingSurface + 's> {
        Box::new(StyledRecorder {
            commands: &mut *self.commands,
            style: TextStyle::from(style),
        })
    }
}
