//! Shared harness for wrapline integration tests.

#![allow(dead_code)]

use std::ops::Range;

use tracing_subscriber::EnvFilter;
use wrapline::{Composition, LeafId, Leaf, WrapConfig};

/// Route `tracing` output to the test writer; set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A composition of fixed-size boxes with helpers to edit and inspect it.
pub struct ReflowTest {
    pub doc: Composition,
}

impl ReflowTest {
    /// Compose boxes of the given widths (all 10 high) at `width`.
    pub fn new(width: f32, widths: &[f32]) -> Self {
        Self::with_config(WrapConfig::new(width), widths)
    }

    pub fn with_config(config: WrapConfig, widths: &[f32]) -> Self {
        init_tracing();
        let mut doc = Composition::new(config);
        doc.insert_leaves(0, boxes(widths)).expect("insert leaves");
        doc.recompose().expect("compose");
        Self { doc }
    }

    pub fn insert(&mut self, at: usize, widths: &[f32]) -> Range<usize> {
        self.doc.insert_leaves(at, boxes(widths)).expect("insert leaves")
    }

    pub fn remove(&mut self, range: Range<usize>) {
        self.doc.remove_leaves(range).expect("remove leaves");
    }

    /// Leaf widths per row.
    pub fn widths(&self) -> Vec<Vec<f32>> {
        self.doc
            .rows()
            .iter()
            .map(|row| row.iter().map(|id| self.width_of(*id)).collect())
            .collect()
    }

    pub fn width_of(&self, id: LeafId) -> f32 {
        self.doc.source().bounds(id).width
    }

    /// Assert every structural invariant of the current layout.
    pub fn check_invariants(&self) {
        let config = *self.doc.config();
        let rows = self.doc.rows();
        let source = self.doc.source();
        let index = self.doc.index();

        // Reading order and coverage.
        let flat: Vec<LeafId> = rows.iter().flatten().copied().collect();
        assert_eq!(flat, source.ids(), "rows do not reproduce reading order");
        assert_eq!(index.len(), source.len(), "index size differs from source");
        assert_eq!(index.row_count(), rows.len(), "index row count is stale");

        for (row_index, row) in rows.iter().enumerate() {
            assert!(!row.is_empty(), "row {row_index} is empty");

            // Width bound for multi-leaf rows.
            if row.len() > 1 {
                let mut width = 0.0f32;
                for (i, id) in row.iter().enumerate() {
                    let leaf = self.width_of(*id);
                    width = if i == 0 { leaf } else { width + config.gap + leaf };
                }
                assert!(
                    width < config.width,
                    "row {row_index} is {width} wide, target {}",
                    config.width
                );
            }

            for (offset, id) in row.iter().enumerate() {
                let entry = index.lookup(*id).expect("leaf is indexed");
                assert_eq!(entry.row_index, row_index);
                assert_eq!(entry.offset, offset);
                assert_eq!(source.ids()[entry.source], *id);
            }
        }

        // Placement: rows stacked top to bottom, leaves left to right.
        let mut y = config.origin.y;
        for row in self.doc.column().rows() {
            assert_eq!(row.position().y, y, "row placed at the wrong height");
            let mut x = config.origin.x;
            for child in row.children() {
                let id = child.referenced_leaf().expect("rows hold references");
                let rect = self.doc.leaf_rect(id).expect("live leaf");
                assert_eq!((rect.x, rect.y), (x, y), "leaf placed out of flow");
                x += rect.width + config.gap;
            }
            y += row.bounds().height + config.line_spacing;
        }
    }

    /// Rows a fresh compose would produce, as leaf handles.
    pub fn composed_from_scratch(&self) -> Vec<Vec<LeafId>> {
        let mut fresh = Composition::new(*self.doc.config());
        let leaves: Vec<Leaf> = self
            .doc
            .source()
            .iter()
            .map(|(_, leaf)| leaf.clone())
            .collect();
        fresh.insert_leaves(0, leaves).expect("insert leaves");
        fresh.recompose().expect("compose");
        // Map fresh rows back onto our handles by reading position.
        let ids = self.doc.source().ids();
        let mut next = 0;
        fresh
            .rows()
            .iter()
            .map(|row| {
                let mapped = ids[next..next + row.len()].to_vec();
                next += row.len();
                mapped
            })
            .collect()
    }
}

pub fn boxes(widths: &[f32]) -> Vec<Leaf> {
    widths.iter().map(|&w| Leaf::sized(w, 10.0)).collect()
}
