//! Containers - Composite, Row and Column.
//!
//! All three own an ordered list of [`LayoutNode`] children. They differ in how
//! they place those children:
//!
//! - `Composite` keeps children where they are and moves them as a group.
//! - `Row` flows children left to right on one line, or wraps them onto
//!   visual lines once a width is pinned with `set_width`.
//! - `Column` stacks children top to bottom and can split a pinned height
//!   evenly between them.
//!
//! Bounds are cached. After changing children, call `refresh` (or
//! [`LayoutNode::measure`] for a whole subtree) before reading `bounds`.

use crate::primitives::{Point, Size};
use crate::surface::DrawingSurface;

use super::index::RowId;
use super::node::LayoutNode;
use super::source::SourceSequence;

// =========================================================================
// Composite
// =========================================================================

/// A plain container of owned children.
#[derive(Debug, Clone, Default)]
pub struct Composite {
    pub(crate) children: Vec<LayoutNode>,
    position: Point,
    bounds: Size,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child at the end.
    pub fn push(mut self, child: impl Into<LayoutNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Recompute bounds as the extent of all children from our position.
    pub fn refresh(&mut self, leaves: &SourceSequence) {
        let mut extent = Size::ZERO;
        for child in &self.children {
            let origin = child.position(leaves) - self.position;
            let size = child.bounds(leaves);
            extent.width = extent.width.max(origin.x + size.width);
            extent.height = extent.height.max(origin.y + size.height);
        }
        self.bounds = extent;
    }

    /// Move the whole group so its origin lands on `position`.
    pub fn set_position(&mut self, leaves: &mut SourceSequence, position: Point) {
        let delta = position - self.position;
        self.position = position;
        for child in &mut self.children {
            let moved = child.position(leaves) + delta;
            child.set_position(leaves, moved);
        }
    }

    pub fn set_width(&mut self, leaves: &mut SourceSequence, width: Option<f32>) {
        for child in &mut self.children {
            child.set_width(leaves, width);
        }
        self.refresh(leaves);
    }

    pub fn set_height(&mut self, leaves: &mut SourceSequence, height: Option<f32>) {
        for child in &mut self.children {
            child.set_height(leaves, height);
        }
        self.refresh(leaves);
    }

    pub fn draw(&self, leaves: &SourceSequence, surface: &mut dyn DrawingSurface) {
        for child in &self.children {
            child.draw(leaves, surface);
        }
    }
}

// =========================================================================
// Row
// =========================================================================

/// A horizontal flow container.
///
/// Children are usually [`LayoutNode::Reference`]s into the source sequence,
/// so a row never owns the leaves it shows.
#[derive(Debug, Clone, Default)]
pub struct Row {
    id: Option<RowId>,
    pub(crate) children: Vec<LayoutNode>,
    /// Horizontal gap between items; also the gap between wrapped lines.
    gap: f32,
    position: Point,
    /// Single-line extent of the children including gaps.
    content: Size,
    /// Reported bounds (content, or pinned width with wrapped height).
    bounds: Size,
    fixed_width: Option<f32>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap between items.
    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    /// Add a child at the end.
    pub fn push(mut self, child: impl Into<LayoutNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub(crate) fn with_id(id: RowId, gap: f32) -> Self {
        Self {
            id: Some(id),
            gap,
            ..Self::default()
        }
    }

    /// Identity assigned by the compositor, if this row is part of a composition.
    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn gap_width(&self) -> f32 {
        self.gap
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Single-line width of the children, gaps included.
    pub fn content_width(&self) -> f32 {
        self.content.width
    }

    /// Recompute the single-line extent and the reported bounds.
    pub fn refresh(&mut self, leaves: &SourceSequence) {
        let mut content = Size::ZERO;
        for (i, child) in self.children.iter().enumerate() {
            let size = child.bounds(leaves);
            if i > 0 {
                content.width += self.gap;
            }
            content.width += size.width;
            content.height = content.height.max(size.height);
        }
        self.content = content;
        self.bounds = match self.fixed_width {
            Some(width) => Size::new(width, self.wrapped_height(leaves, width)),
            None => content,
        };
    }

    /// Place children left to right starting at `position`.
    ///
    /// With a pinned width the children wrap onto visual lines instead.
    pub fn set_position(&mut self, leaves: &mut SourceSequence, position: Point) {
        self.position = position;
        match self.fixed_width {
            Some(width) => self.flow_wrapped(leaves, width),
            None => self.flow_line(leaves),
        }
    }

    /// Pin the row width and wrap children greedily, or revert with `None`.
    ///
    /// Always re-flows, so re-applying the same width picks up child edits.
    pub fn set_width(&mut self, leaves: &mut SourceSequence, width: Option<f32>) {
        self.fixed_width = width;
        match width {
            Some(width) => self.flow_wrapped(leaves, width),
            None => self.flow_line(leaves),
        }
        self.refresh(leaves);
    }

    pub fn set_height(&mut self, leaves: &mut SourceSequence, height: Option<f32>) {
        for child in &mut self.children {
            child.set_height(leaves, height);
        }
        self.refresh(leaves);
    }

    pub fn draw(&self, leaves: &SourceSequence, surface: &mut dyn DrawingSurface) {
        for child in &self.children {
            child.draw(leaves, surface);
        }
    }

    fn flow_line(&mut self, leaves: &mut SourceSequence) {
        let mut pos = self.position;
        for child in &mut self.children {
            child.set_position(leaves, pos);
            pos.x += child.bounds(leaves).width + self.gap;
        }
    }

    /// Single greedy pass: start a new line whenever the next child would
    /// cross the right edge. A child wider than the row gets a line to itself.
    fn flow_wrapped(&mut self, leaves: &mut SourceSequence, width: f32) {
        let left = self.position.x;
        let right = left + width;
        let mut pos = self.position;
        let mut line_height = 0.0f32;

        for child in &mut self.children {
            let size = child.bounds(leaves);
            if pos.x > left && pos.x + size.width > right {
                pos.x = left;
                pos.y += line_height + self.gap;
                line_height = 0.0;
            }
            child.set_position(leaves, pos);
            pos.x += size.width + self.gap;
            line_height = line_height.max(size.height);
        }
    }

    fn wrapped_height(&self, leaves: &SourceSequence, width: f32) -> f32 {
        let mut x = 0.0f32;
        let mut y = 0.0f32;
        let mut line_height = 0.0f32;

        for child in &self.children {
            let size = child.bounds(leaves);
            if x > 0.0 && x + size.width > width {
                y += line_height + self.gap;
                x = 0.0;
                line_height = 0.0;
            }
            x += size.width + self.gap;
            line_height = line_height.max(size.height);
        }

        y + line_height
    }
}

// =========================================================================
// Column
// =========================================================================

/// A vertical flow container.
#[derive(Debug, Clone, Default)]
pub struct Column {
    pub(crate) children: Vec<LayoutNode>,
    /// Vertical gap between children.
    spacing: f32,
    position: Point,
    bounds: Size,
    fixed_height: Option<f32>,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set vertical spacing between children.
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Add a child at the end.
    pub fn push(mut self, child: impl Into<LayoutNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(&self) -> &[LayoutNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// The child at `index` if it is a row.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.children.get(index).and_then(LayoutNode::as_row)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.children.get_mut(index).and_then(LayoutNode::as_row_mut)
    }

    /// Iterate the rows of this column, skipping any other kind of child.
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.children.iter().filter_map(LayoutNode::as_row)
    }

    /// Recompute bounds from the cached bounds of the children.
    pub fn refresh(&mut self, leaves: &SourceSequence) {
        let mut width = 0.0f32;
        let mut height = 0.0f32;
        for (i, child) in self.children.iter().enumerate() {
            let size = child.bounds(leaves);
            if i > 0 {
                height += self.spacing;
            }
            width = width.max(size.width);
            height += size.height;
        }
        self.bounds = Size::new(width, self.fixed_height.unwrap_or(height));
    }

    /// Stack children top to bottom from `position`.
    pub fn set_position(&mut self, leaves: &mut SourceSequence, position: Point) {
        self.position = position;
        self.place_from(leaves, 0);
    }

    /// Re-place children from `start` onward, keeping earlier ones where they are.
    pub fn place_from(&mut self, leaves: &mut SourceSequence, start: usize) {
        let mut y = match start.checked_sub(1).and_then(|i| self.children.get(i)) {
            Some(prev) => prev.position(leaves).y + (prev.bounds(leaves).height + self.spacing),
            None => self.position.y,
        };
        let x = self.position.x;
        for child in self.children.iter_mut().skip(start) {
            child.set_position(leaves, Point::new(x, y));
            y += child.bounds(leaves).height + self.spacing;
        }
    }

    /// Like [`Column::place_from`], but once past `settled` stop at the first
    /// child that is already in place; everything after it is too.
    pub(crate) fn place_touched(&mut self, leaves: &mut SourceSequence, start: usize, settled: usize) {
        let mut y = match start.checked_sub(1).and_then(|i| self.children.get(i)) {
            Some(prev) => prev.position(leaves).y + (prev.bounds(leaves).height + self.spacing),
            None => self.position.y,
        };
        let x = self.position.x;
        for (i, child) in self.children.iter_mut().enumerate().skip(start) {
            let target = Point::new(x, y);
            if i >= settled && child.position(leaves) == target {
                break;
            }
            child.set_position(leaves, target);
            y += child.bounds(leaves).height + self.spacing;
        }
    }

    pub fn set_width(&mut self, leaves: &mut SourceSequence, width: Option<f32>) {
        for child in &mut self.children {
            child.set_width(leaves, width);
        }
        self.refresh(leaves);
    }

    /// Split a pinned height evenly between children, or pass `None` through.
    pub fn set_height(&mut self, leaves: &mut SourceSequence, height: Option<f32>) {
        self.fixed_height = height;
        let count = self.children.len();
        if count > 0 {
            let share = height.map(|h| h / count as f32);
            for child in &mut self.children {
                child.set_height(leaves, share);
            }
        }
        self.refresh(leaves);
    }

    pub fn draw(&self, leaves: &SourceSequence, surface: &mut dyn DrawingSurface) {
        for child in &self.children {
            child.draw(leaves, surface);
        }
    }
}
