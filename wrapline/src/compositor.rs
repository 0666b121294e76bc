//! Compositor - partitions a source sequence into rows of a column.
//!
//! [`WrapCompositor`] builds the partition greedily: leaves are appended to the
//! current row while `row_width + gap + leaf_width < width`, otherwise a new
//! row starts. An empty row always takes the next leaf, so a leaf wider than
//! the target sits alone on its own row instead of being split forever.
//!
//! Incremental edits go through a single reflow routine. It re-runs the greedy
//! rule from the first affected row and stops at the first row past the edit
//! whose first leaf is the same as before: from there on the old rows are
//! already what a full compose would produce. Insertion pushes overflow tails
//! forward; removal pulls leaves back from the following rows. Both end in the
//! exact partition `compose` would build, so an insert followed by removing
//! the same range restores the previous rows.

use std::collections::HashSet;
use std::ops::Range;

use crate::config::WrapConfig;
use crate::error::{LayoutError, Result};
use crate::layout::containers::{Column, Row};
use crate::layout::cursor::Cursor;
use crate::layout::index::{Index, RowId};
use crate::layout::node::LayoutNode;
use crate::layout::source::{LeafId, SourceSequence};

/// Everything a compositor operation works on, passed explicitly per call.
pub struct ComposeContext<'a> {
    pub source: &'a mut SourceSequence,
    pub column: &'a mut Column,
    pub config: &'a WrapConfig,
}

/// Builds and maintains a row/column partition of a source sequence.
pub trait Compositor {
    /// Rebuild the whole partition.
    fn compose(&mut self, cx: ComposeContext<'_>) -> Result<()>;

    /// Lay out leaves just inserted at `range` of the source sequence.
    fn elements_added(&mut self, cx: ComposeContext<'_>, range: Range<usize>) -> Result<()>;

    /// Drop leaves at `range` of the source sequence from the layout.
    ///
    /// Called while the leaves are still in the sequence.
    fn elements_removed(&mut self, cx: ComposeContext<'_>, range: Range<usize>) -> Result<()>;

    /// The leaf lookup table this compositor maintains.
    fn index(&self) -> &Index;
}

/// Greedy word-wrap compositor.
#[derive(Debug, Default)]
pub struct WrapCompositor {
    index: Index,
}

/// Whether a leaf of width `leaf` fits after a non-empty row of width `row`.
#[inline]
fn fits(row: f32, leaf: f32, config: &WrapConfig) -> bool {
    row + config.gap + leaf < config.width
}

/// Width of a row's children on one line, gaps included.
///
/// Accumulates in the same order as [`fits`] so both agree on ties.
fn line_width(row: &Row, source: &SourceSequence, gap: f32) -> f32 {
    let mut width = 0.0f32;
    for (i, child) in row.children().iter().enumerate() {
        let leaf = child.bounds(source).width;
        width = if i == 0 { leaf } else { width + gap + leaf };
    }
    width
}

/// How many leading children of `row` the greedy rule keeps on it.
fn greedy_prefix(row: &Row, source: &SourceSequence, config: &WrapConfig) -> usize {
    let mut width = 0.0f32;
    for (i, child) in row.children().iter().enumerate() {
        let leaf = child.bounds(source).width;
        if i > 0 && !fits(width, leaf, config) {
            return i;
        }
        width = if i == 0 { leaf } else { width + config.gap + leaf };
    }
    row.len()
}

fn warn_if_overflowing(row: &Row, config: &WrapConfig) {
    if row.len() == 1 && row.content_width() >= config.width {
        tracing::warn!(
            width = row.content_width(),
            target = config.width,
            "leaf wider than target width occupies its own row"
        );
    }
}

fn row_at(column: &mut Column, index: usize) -> Result<&mut Row> {
    column.row_mut(index).ok_or(LayoutError::NotARow(index))
}

/// Row `index` as a tree node, so its children are edited through cursors.
fn row_node_at(column: &mut Column, index: usize) -> Result<&mut LayoutNode> {
    let node = column
        .children
        .get_mut(index)
        .ok_or(LayoutError::NotARow(index))?;
    if matches!(node, LayoutNode::Row(_)) {
        Ok(node)
    } else {
        Err(LayoutError::NotARow(index))
    }
}

fn row_id_at(column: &Column, index: usize) -> Result<RowId> {
    column
        .row(index)
        .and_then(Row::id)
        .ok_or(LayoutError::NotARow(index))
}

impl WrapCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_row(&mut self, config: &WrapConfig) -> Row {
        Row::with_id(self.index.allocate_row(), config.gap)
    }

    /// Re-run the greedy rule from row `start` until the partition settles.
    ///
    /// `pending` holds rows whose contents were changed by the edit; rows
    /// beyond `start` that are not pending end the pass. Returns the index
    /// one past the last row processed.
    fn reflow(
        &mut self,
        cx: &mut ComposeContext<'_>,
        start: usize,
        mut pending: HashSet<RowId>,
    ) -> Result<usize> {
        let config = cx.config;
        let mut r = start;

        while r < cx.column.len() {
            let id = row_id_at(cx.column, r)?;
            if r > start && !pending.contains(&id) {
                break;
            }

            let node = row_node_at(cx.column, r)?;
            let len = node.child_count();
            let keep = match node.as_row() {
                Some(row) => greedy_prefix(row, cx.source, config),
                None => len,
            };

            if keep < len {
                // Overflow: push the tail to the front of the next row.
                let end = node.end();
                let tail = node.remove_children(&Cursor::Row(keep), &end)?;
                tracing::trace!(row = r, moved = tail.len(), "pushing overflow forward");
                if r + 1 < cx.column.len() {
                    let next = row_node_at(cx.column, r + 1)?;
                    let begin = next.begin();
                    next.insert_children(&begin, tail)?;
                    pending.insert(row_id_at(cx.column, r + 1)?);
                } else {
                    let id = self.index.allocate_row();
                    let mut next = Row::with_id(id, config.gap);
                    next.children = tail;
                    pending.insert(id);
                    cx.column.children.push(LayoutNode::Row(next));
                }
            } else {
                self.pull_back(cx, r, &mut pending)?;
            }

            let row = row_at(cx.column, r)?;
            if row.is_empty() {
                // Only possible when no rows follow.
                cx.column.children.remove(r);
                continue;
            }
            row.refresh(cx.source);
            warn_if_overflowing(row, config);
            self.index.record_row(row);
            r += 1;
        }

        self.index.rebuild_spans(cx.column, start);
        Ok(r)
    }

    /// Pull leading leaves of the rows after `r` into row `r` while they fit.
    fn pull_back(
        &mut self,
        cx: &mut ComposeContext<'_>,
        r: usize,
        pending: &mut HashSet<RowId>,
    ) -> Result<()> {
        let config = cx.config;
        let mut width = line_width(row_at(cx.column, r)?, cx.source, config.gap);

        while r + 1 < cx.column.len() {
            let row_empty = row_at(cx.column, r)?.is_empty();
            let next = row_node_at(cx.column, r + 1)?;

            let mut take = 0;
            let mut filled = !row_empty;
            for child in next.children() {
                let leaf = child.bounds(cx.source).width;
                if filled && !fits(width, leaf, config) {
                    break;
                }
                width = if filled { width + config.gap + leaf } else { leaf };
                filled = true;
                take += 1;
            }
            if take == 0 {
                break;
            }

            let begin = next.begin();
            let moved = next.remove_children(&begin, &Cursor::Row(take))?;
            let next_empty = next.child_count() == 0;
            let next_id = row_id_at(cx.column, r + 1)?;
            tracing::trace!(row = r, moved = moved.len(), "pulling leaves back");
            let row = row_node_at(cx.column, r)?;
            let end = row.end();
            row.insert_children(&end, moved)?;

            if next_empty {
                cx.column.children.remove(r + 1);
            } else {
                pending.insert(next_id);
                break;
            }
        }
        Ok(())
    }

    /// Position rows from `start`, then refresh the column bounds.
    fn place(&self, cx: &mut ComposeContext<'_>, start: usize, settled: usize) {
        cx.column.place_touched(cx.source, start, settled);
        cx.column.refresh(cx.source);
    }
}

impl Compositor for WrapCompositor {
    fn compose(&mut self, cx: ComposeContext<'_>) -> Result<()> {
        let config = cx.config;
        config.validate()?;
        self.index.clear();

        *cx.column = Column::new().spacing(config.line_spacing);
        let mut row = self.new_row(config);
        let mut width = 0.0f32;

        for &id in cx.source.ids() {
            let leaf = cx.source.bounds(id).width;
            if !row.is_empty() && !fits(width, leaf, config) {
                let full = std::mem::replace(&mut row, self.new_row(config));
                cx.column.children.push(LayoutNode::Row(full));
                width = 0.0;
            }
            width = if row.is_empty() { leaf } else { width + config.gap + leaf };
            row.children.push(LayoutNode::Reference(id));
        }
        if !row.is_empty() {
            cx.column.children.push(LayoutNode::Row(row));
        }

        for row in cx.column.children.iter_mut().filter_map(LayoutNode::as_row_mut) {
            row.refresh(cx.source);
            warn_if_overflowing(row, config);
        }
        self.index.rebuild(cx.column);
        cx.column.set_position(cx.source, config.origin);
        cx.column.refresh(cx.source);

        tracing::debug!(
            leaves = cx.source.len(),
            rows = cx.column.len(),
            width = config.width,
            "composed"
        );
        Ok(())
    }

    fn elements_added(&mut self, mut cx: ComposeContext<'_>, range: Range<usize>) -> Result<()> {
        cx.source.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let ids: Vec<LeafId> = cx.source.ids()[range.clone()].to_vec();
        if let Some(&known) = ids.iter().find(|id| self.index.contains(**id)) {
            return Err(LayoutError::AlreadyIndexed(known));
        }

        let (anchor_row, offset) = match range.start.checked_sub(1) {
            Some(prev) => {
                let prev_id = cx.source.id_at(prev).ok_or(LayoutError::RangeOutOfBounds {
                    start: range.start,
                    end: range.end,
                    len: cx.source.len(),
                })?;
                let entry = self.index.lookup(prev_id)?;
                (entry.row_index, entry.offset + 1)
            }
            None => (0, 0),
        };
        if cx.column.is_empty() {
            let row = self.new_row(cx.config);
            cx.column.children.push(LayoutNode::Row(row));
        }
        let anchor_id = row_id_at(cx.column, anchor_row)?;

        // Validation done; from here on the edit is applied.
        row_node_at(cx.column, anchor_row)?.insert_children(
            &Cursor::Row(offset),
            ids.iter().map(|&id| LayoutNode::Reference(id)),
        )?;

        let end = self.reflow(&mut cx, anchor_row, HashSet::from([anchor_id]))?;
        self.place(&mut cx, anchor_row, end);

        tracing::debug!(
            added = ids.len(),
            from_row = anchor_row,
            rows_touched = end.saturating_sub(anchor_row),
            rows = cx.column.len(),
            "elements added"
        );
        Ok(())
    }

    fn elements_removed(&mut self, mut cx: ComposeContext<'_>, range: Range<usize>) -> Result<()> {
        cx.source.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let ids: Vec<LeafId> = cx.source.ids()[range.clone()].to_vec();
        let mut entries = Vec::with_capacity(ids.len());
        for &id in &ids {
            entries.push(self.index.lookup(id)?);
        }
        let (Some(first), Some(last)) = (entries.first().copied(), entries.last().copied()) else {
            return Ok(());
        };
        for index in first.row_index..=last.row_index {
            row_at(cx.column, index)?;
        }

        // Validation done; from here on the edit is applied.
        let (ra, oa) = (first.row_index, first.offset);
        let (rb, ob) = (last.row_index, last.offset);
        if ra == rb {
            row_node_at(cx.column, ra)?.remove_children(&Cursor::Row(oa), &Cursor::Row(ob + 1))?;
        } else {
            let head = row_node_at(cx.column, ra)?;
            let end = head.end();
            head.remove_children(&Cursor::Row(oa), &end)?;
            let tail = row_node_at(cx.column, rb)?;
            let begin = tail.begin();
            tail.remove_children(&begin, &Cursor::Row(ob + 1))?;
            // Whole rows in between go with their leaves.
            cx.column.children.drain(ra + 1..rb);
        }
        for &id in &ids {
            self.index.forget(id);
        }

        // Drop whichever of the edge rows ended up empty.
        let edge_rows = if rb > ra { 2 } else { 1 };
        let mut pending = HashSet::new();
        let mut kept = ra;
        for _ in 0..edge_rows {
            if kept >= cx.column.len() {
                break;
            }
            if row_at(cx.column, kept)?.is_empty() {
                cx.column.children.remove(kept);
            } else {
                pending.insert(row_id_at(cx.column, kept)?);
                kept += 1;
            }
        }

        let start = if oa == 0 { ra.saturating_sub(1) } else { ra };
        let end = if start < cx.column.len() {
            pending.insert(row_id_at(cx.column, start)?);
            self.reflow(&mut cx, start, pending)?
        } else {
            self.index.rebuild_spans(cx.column, start);
            start
        };
        self.place(&mut cx, start, end);

        tracing::debug!(
            removed = ids.len(),
            from_row = start,
            rows_touched = end.saturating_sub(start),
            rows = cx.column.len(),
            "elements removed"
        );
        Ok(())
    }

    fn index(&self) -> &Index {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::leaf::Leaf;
    use crate::primitives::Point;

    struct Fixture {
        source: SourceSequence,
        column: Column,
        config: WrapConfig,
        compositor: WrapCompositor,
    }

    impl Fixture {
        fn new(widths: &[f32], width: f32) -> Self {
            let mut source = SourceSequence::new();
            for &w in widths {
                source.push(Leaf::sized(w, 10.0));
            }
            let mut fixture = Self {
                source,
                column: Column::new(),
                config: WrapConfig::new(width),
                compositor: WrapCompositor::new(),
            };
            fixture.compose().expect("compose");
            fixture
        }

        fn compose(&mut self) -> Result<()> {
            let cx = ComposeContext {
                source: &mut self.source,
                column: &mut self.column,
                config: &self.config,
            };
            self.compositor.compose(cx)
        }

        fn insert(&mut self, at: usize, widths: &[f32]) -> Result<()> {
            let leaves: Vec<Leaf> = widths.iter().map(|&w| Leaf::sized(w, 10.0)).collect();
            let range = self.source.insert(at, leaves)?;
            let cx = ComposeContext {
                source: &mut self.source,
                column: &mut self.column,
                config: &self.config,
            };
            self.compositor.elements_added(cx, range)
        }

        fn remove(&mut self, range: Range<usize>) -> Result<()> {
            let cx = ComposeContext {
                source: &mut self.source,
                column: &mut self.column,
                config: &self.config,
            };
            self.compositor.elements_removed(cx, range.clone())?;
            self.source.remove(range)?;
            Ok(())
        }

        /// Leaf widths per row.
        fn rows(&self) -> Vec<Vec<f32>> {
            self.column
                .rows()
                .map(|row| {
                    row.children()
                        .iter()
                        .map(|child| child.bounds(&self.source).width)
                        .collect()
                })
                .collect()
        }

        fn assert_index_consistent(&self) {
            let index = self.compositor.index();
            assert_eq!(index.len(), self.source.len());
            assert_eq!(index.row_count(), self.column.len());
            for (source, &id) in self.source.ids().iter().enumerate() {
                let entry = index.lookup(id).expect("indexed");
                assert_eq!(entry.source, source);
                let row = self.column.row(entry.row_index).expect("row");
                assert_eq!(row.id(), Some(entry.row));
                assert_eq!(row.children()[entry.offset].referenced_leaf(), Some(id));
            }
        }
    }

    #[test]
    fn test_compose_greedy_rows() {
        let fixture = Fixture::new(&[40.0, 40.0, 40.0, 40.0], 100.0);
        assert_eq!(fixture.rows(), vec![vec![40.0, 40.0], vec![40.0, 40.0]]);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_compose_fit_is_strict() {
        // 50 + 50 == 100 does not fit a width of 100.
        let fixture = Fixture::new(&[50.0, 50.0], 100.0);
        assert_eq!(fixture.rows(), vec![vec![50.0], vec![50.0]]);
    }

    #[test]
    fn test_compose_overwide_leaf_gets_own_row() {
        let fixture = Fixture::new(&[10.0, 150.0, 10.0], 100.0);
        assert_eq!(fixture.rows(), vec![vec![10.0], vec![150.0], vec![10.0]]);
    }

    #[test]
    fn test_compose_empty_source_has_no_rows() {
        let fixture = Fixture::new(&[], 100.0);
        assert!(fixture.column.is_empty());
        assert!(fixture.compositor.index().is_empty());
    }

    #[test]
    fn test_compose_with_gap() {
        let mut fixture = Fixture::new(&[30.0, 30.0, 30.0], 100.0);
        fixture.config = WrapConfig::new(100.0).gap(10.0);
        fixture.compose().expect("compose");
        // 30 + 10 + 30 + 10 + 30 = 110 does not fit.
        assert_eq!(fixture.rows(), vec![vec![30.0, 30.0], vec![30.0]]);
    }

    #[test]
    fn test_compose_rejects_bad_width() {
        let mut fixture = Fixture::new(&[10.0], 100.0);
        fixture.config = WrapConfig::new(-1.0);
        assert!(matches!(fixture.compose(), Err(LayoutError::InvalidWidth(_))));
    }

    #[test]
    fn test_compose_places_rows() {
        let mut fixture = Fixture::new(&[40.0, 40.0, 40.0], 100.0);
        fixture.config = WrapConfig::new(100.0).line_spacing(2.0).origin(Point::new(5.0, 5.0));
        fixture.compose().expect("compose");

        let positions: Vec<Point> = fixture
            .source
            .iter()
            .map(|(_, leaf)| leaf.position())
            .collect();
        assert_eq!(
            positions,
            vec![Point::new(5.0, 5.0), Point::new(45.0, 5.0), Point::new(5.0, 17.0)]
        );
    }

    #[test]
    fn test_insert_into_full_row_cascades() {
        let mut fixture = Fixture::new(&[40.0, 40.0, 40.0, 40.0], 100.0);
        fixture.insert(1, &[15.0]).expect("insert");
        assert_eq!(
            fixture.rows(),
            vec![vec![40.0, 15.0, 40.0], vec![40.0, 40.0]]
        );

        fixture.insert(0, &[30.0]).expect("insert");
        assert_eq!(
            fixture.rows(),
            vec![vec![30.0, 40.0, 15.0], vec![40.0, 40.0], vec![40.0]]
        );
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_insert_at_end_appends_row() {
        let mut fixture = Fixture::new(&[40.0, 40.0], 100.0);
        fixture.insert(2, &[40.0]).expect("insert");
        assert_eq!(fixture.rows(), vec![vec![40.0, 40.0], vec![40.0]]);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_insert_into_empty_composition() {
        let mut fixture = Fixture::new(&[], 100.0);
        fixture.insert(0, &[40.0, 40.0, 40.0]).expect("insert");
        assert_eq!(fixture.rows(), vec![vec![40.0, 40.0], vec![40.0]]);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_insert_twice_is_rejected() {
        let mut fixture = Fixture::new(&[40.0, 40.0], 100.0);
        let before = fixture.rows();
        let cx = ComposeContext {
            source: &mut fixture.source,
            column: &mut fixture.column,
            config: &fixture.config,
        };
        let result = fixture.compositor.elements_added(cx, 0..1);
        assert!(matches!(result, Err(LayoutError::AlreadyIndexed(_))));
        assert_eq!(fixture.rows(), before);
    }

    #[test]
    fn test_remove_sole_leaf_of_row() {
        let mut fixture = Fixture::new(&[40.0, 40.0, 40.0, 40.0, 40.0], 100.0);
        assert_eq!(fixture.rows().len(), 3);
        fixture.remove(4..5).expect("remove");
        assert_eq!(fixture.rows(), vec![vec![40.0, 40.0], vec![40.0, 40.0]]);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_remove_pulls_leaves_back() {
        let mut fixture = Fixture::new(&[40.0, 40.0, 40.0, 40.0, 40.0], 100.0);
        fixture.remove(0..1).expect("remove");
        assert_eq!(fixture.rows(), vec![vec![40.0, 40.0], vec![40.0, 40.0]]);

        fixture.remove(1..3).expect("remove");
        assert_eq!(fixture.rows(), vec![vec![40.0, 40.0]]);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_remove_everything() {
        let mut fixture = Fixture::new(&[40.0, 40.0, 40.0], 100.0);
        fixture.remove(0..3).expect("remove");
        assert!(fixture.column.is_empty());
        assert!(fixture.compositor.index().is_empty());
        assert_eq!(fixture.compositor.index().row_count(), 0);
    }

    #[test]
    fn test_remove_out_of_range_changes_nothing() {
        let mut fixture = Fixture::new(&[40.0, 40.0], 100.0);
        let before = fixture.rows();
        assert!(matches!(
            fixture.remove(1..5),
            Err(LayoutError::RangeOutOfBounds { .. })
        ));
        assert_eq!(fixture.rows(), before);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_insert_then_remove_restores_rows() {
        let widths = [30.0, 20.0, 45.0, 10.0, 60.0, 25.0, 35.0];
        let mut fixture = Fixture::new(&widths, 100.0);
        let before = fixture.rows();

        fixture.insert(3, &[50.0, 5.0, 70.0]).expect("insert");
        fixture.assert_index_consistent();
        fixture.remove(3..6).expect("remove");

        assert_eq!(fixture.rows(), before);
        fixture.assert_index_consistent();
    }

    #[test]
    fn test_incremental_matches_full_compose() {
        let mut fixture = Fixture::new(&[30.0, 20.0, 45.0, 10.0, 60.0, 25.0], 100.0);
        fixture.insert(2, &[90.0, 5.0]).expect("insert");
        fixture.remove(0..1).expect("remove");
        fixture.insert(6, &[33.0]).expect("insert");
        let incremental = fixture.rows();

        fixture.compose().expect("compose");
        assert_eq!(fixture.rows(), incremental);
    }

    #[test]
    fn test_incremental_edit_repositions_following_rows() {
        let mut fixture = Fixture::new(&[40.0, 40.0, 40.0], 100.0);
        fixture.insert(0, &[40.0]).expect("insert");

        let ys: Vec<f32> = fixture.source.iter().map(|(_, leaf)| leaf.position().y).collect();
        let mut sorted = ys.clone();
        sorted.sort_by(f32::total_cmp);
        assert_eq!(sorted, vec![0.0, 0.0, 10.0, 10.0]);
        assert_eq!(fixture.column.bounds().height, 20.0);
    }
}
