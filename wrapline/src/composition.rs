//! Composition - owns a source sequence and the row/column tree built from it.
//!
//! Every mutation goes through here so the sequence, the tree and the index
//! move together. Leaves added before the first `compose` are stored but not
//! laid out; the first `compose` picks them all up.

use std::ops::Range;
use std::rc::Rc;

use crate::compositor::{ComposeContext, Compositor, WrapCompositor};
use crate::config::WrapConfig;
use crate::error::{LayoutError, Result};
use crate::font::Style;
use crate::layout::containers::Column;
use crate::layout::index::Index;
use crate::layout::leaf::Leaf;
use crate::layout::source::{LeafId, SourceSequence};
use crate::primitives::{Rect, Size};
use crate::surface::DrawingSurface;

#[derive(Debug)]
pub struct Composition<C: Compositor = WrapCompositor> {
    source: SourceSequence,
    column: Column,
    config: WrapConfig,
    compositor: C,
    composed: bool,
}

impl Composition<WrapCompositor> {
    pub fn new(config: WrapConfig) -> Self {
        Self::with_compositor(config, WrapCompositor::new())
    }
}

impl Default for Composition<WrapCompositor> {
    fn default() -> Self {
        Self::new(WrapConfig::default())
    }
}

impl<C: Compositor> Composition<C> {
    pub fn with_compositor(config: WrapConfig, compositor: C) -> Self {
        Self {
            source: SourceSequence::new(),
            column: Column::new(),
            config,
            compositor,
            composed: false,
        }
    }

    pub fn source(&self) -> &SourceSequence {
        &self.source
    }

    /// The root column; its children are the rows.
    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn config(&self) -> &WrapConfig {
        &self.config
    }

    pub fn index(&self) -> &Index {
        self.compositor.index()
    }

    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    /// Whether the tree reflects the source sequence.
    pub fn is_composed(&self) -> bool {
        self.composed
    }

    /// Extent of the laid-out column.
    pub fn bounds(&self) -> Size {
        self.column.bounds()
    }

    /// Rebuild the partition for a new target width.
    pub fn compose(&mut self, width: f32) -> Result<()> {
        let config = self.config.width(width);
        config.validate()?;
        self.config = config;
        self.recompose()
    }

    /// Rebuild the partition with the current configuration.
    ///
    /// Needed after leaf sizes were changed in place.
    pub fn recompose(&mut self) -> Result<()> {
        let cx = ComposeContext {
            source: &mut self.source,
            column: &mut self.column,
            config: &self.config,
        };
        self.compositor.compose(cx)?;
        self.composed = true;
        Ok(())
    }

    /// Replace the configuration and rebuild.
    pub fn set_config(&mut self, config: WrapConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        if self.composed {
            self.recompose()?;
        }
        Ok(())
    }

    /// Append one leaf.
    pub fn push_leaf(&mut self, leaf: Leaf) -> Result<LeafId> {
        let at = self.source.len();
        let range = self.insert_leaves(at, [leaf])?;
        self.source
            .id_at(range.start)
            .ok_or(LayoutError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.source.len(),
            })
    }

    /// Insert leaves at `at` in reading order and lay them out.
    ///
    /// Returns the source positions the new leaves occupy.
    pub fn insert_leaves(
        &mut self,
        at: usize,
        leaves: impl IntoIterator<Item = Leaf>,
    ) -> Result<Range<usize>> {
        let range = self.source.insert(at, leaves)?;
        if !self.composed || range.is_empty() {
            return Ok(range);
        }

        let cx = ComposeContext {
            source: &mut self.source,
            column: &mut self.column,
            config: &self.config,
        };
        if let Err(err) = self.compositor.elements_added(cx, range.clone()) {
            tracing::warn!(?range, %err, "layout rejected insertion, rolling back");
            self.source.remove(range)?;
            return Err(err);
        }
        Ok(range)
    }

    /// Insert one glyph leaf per character of `text`.
    pub fn insert_text(&mut self, at: usize, text: &str, style: &Rc<Style>) -> Result<Range<usize>> {
        let leaves: Vec<Leaf> = text
            .chars()
            .map(|c| Leaf::glyph(c, Rc::clone(style)))
            .collect();
        self.insert_leaves(at, leaves)
    }

    /// Remove the leaves at `range`, returning them in reading order.
    ///
    /// The tree drops its references before the leaves leave the sequence.
    pub fn remove_leaves(&mut self, range: Range<usize>) -> Result<Vec<Leaf>> {
        self.source.check_range(&range)?;
        if self.composed && !range.is_empty() {
            let cx = ComposeContext {
                source: &mut self.source,
                column: &mut self.column,
                config: &self.config,
            };
            self.compositor.elements_removed(cx, range.clone())?;
        }
        self.source.remove(range)
    }

    /// Render the tree.
    pub fn draw(&self, surface: &mut dyn DrawingSurface) {
        self.column.draw(&self.source, surface);
    }

    /// Leaf handles of every row, top to bottom.
    pub fn rows(&self) -> Vec<Vec<LeafId>> {
        self.column
            .rows()
            .map(|row| {
                row.children()
                    .iter()
                    .filter_map(|child| child.referenced_leaf())
                    .collect()
            })
            .collect()
    }

    /// Placed rectangle of a leaf.
    pub fn leaf_rect(&self, id: LeafId) -> Option<Rect> {
        self.source.get(id).map(Leaf::rect)
    }
}
