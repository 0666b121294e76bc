//! Index - leaf to row lookup for incremental reflow.
//!
//! For every laid-out leaf the index answers: which row holds it, where that
//! row sits in the column, the leaf's offset inside the row, and the leaf's
//! offset in the source sequence.
//!
//! Only the `(row id, in-row offset)` pair is stored per leaf. Row positions
//! and each row's first source offset live in a per-row span table, so when
//! rows are inserted or deleted only the span table is rebuilt; leaf entries
//! are rewritten only for rows whose membership actually changed.

use std::collections::HashMap;

use crate::error::{LayoutError, Result};

use super::containers::{Column, Row};
use super::source::LeafId;

/// Stable identity of a row inside one composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Where a leaf currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// The owning row.
    pub row: RowId,
    /// Offset of the owning row in the column.
    pub row_index: usize,
    /// Offset of the leaf inside its row.
    pub offset: usize,
    /// Offset of the leaf in the source sequence.
    pub source: usize,
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    row: RowId,
    offset: usize,
}

#[derive(Debug, Clone, Copy)]
struct RowSpan {
    id: RowId,
    source_start: usize,
    len: usize,
}

#[derive(Debug, Default)]
pub struct Index {
    placements: HashMap<LeafId, Placement>,
    spans: Vec<RowSpan>,
    row_positions: HashMap<RowId, usize>,
    next_row: u64,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed leaves.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Number of rows the index knows about.
    pub fn row_count(&self) -> usize {
        self.spans.len()
    }

    pub fn contains(&self, leaf: LeafId) -> bool {
        self.placements.contains_key(&leaf)
    }

    pub fn get(&self, leaf: LeafId) -> Option<IndexEntry> {
        let placement = self.placements.get(&leaf)?;
        let row_index = *self.row_positions.get(&placement.row)?;
        let span = self.spans.get(row_index)?;
        Some(IndexEntry {
            row: placement.row,
            row_index,
            offset: placement.offset,
            source: span.source_start + placement.offset,
        })
    }

    /// Like [`Index::get`], but an untracked leaf is an error.
    pub fn lookup(&self, leaf: LeafId) -> Result<IndexEntry> {
        self.get(leaf).ok_or(LayoutError::UnknownLeaf(leaf))
    }

    /// Column offset of a row.
    pub fn row_index(&self, row: RowId) -> Option<usize> {
        self.row_positions.get(&row).copied()
    }

    pub fn clear(&mut self) {
        self.placements.clear();
        self.spans.clear();
        self.row_positions.clear();
    }

    pub(crate) fn allocate_row(&mut self) -> RowId {
        let id = RowId(self.next_row);
        self.next_row += 1;
        id
    }

    /// Rewrite the entries of every leaf referenced by `row`.
    pub(crate) fn record_row(&mut self, row: &Row) {
        let Some(id) = row.id() else {
            return;
        };
        for (offset, child) in row.children().iter().enumerate() {
            if let Some(leaf) = child.referenced_leaf() {
                self.placements.insert(leaf, Placement { row: id, offset });
            }
        }
    }

    pub(crate) fn forget(&mut self, leaf: LeafId) {
        self.placements.remove(&leaf);
    }

    /// Rebuild the span table for rows `from..` of `column`.
    ///
    /// Rows before `from` must be unchanged since the last rebuild.
    pub(crate) fn rebuild_spans(&mut self, column: &Column, from: usize) {
        let from = from.min(self.spans.len());
        for span in self.spans.drain(from..) {
            self.row_positions.remove(&span.id);
        }
        let mut source_start = self
            .spans
            .last()
            .map_or(0, |span| span.source_start + span.len);

        for (position, row) in column.rows().enumerate().skip(from) {
            let Some(id) = row.id() else {
                continue;
            };
            self.spans.push(RowSpan {
                id,
                source_start,
                len: row.len(),
            });
            self.row_positions.insert(id, position);
            source_start += row.len();
        }
    }

    /// Rebuild everything from `column`.
    pub(crate) fn rebuild(&mut self, column: &Column) {
        self.clear();
        for row in column.rows() {
            self.record_row(row);
        }
        self.rebuild_spans(column, 0);
    }
}
