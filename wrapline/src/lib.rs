//! Wrapline: incremental line-wrap layout
//!
//! Wrapline partitions an ordered sequence of inline leaves (glyphs, inline
//! boxes) into rows no wider than a target width, stacks the rows in a column,
//! and keeps that partition up to date as leaves are inserted or removed
//! without recomputing the whole document.
//!
//! # Architecture
//!
//! ```text
//! Composition
//!   SourceSequence  owns every Leaf, addressed by LeafId
//!   Column of Rows  holds LeafId references in reading order
//!   Compositor      builds rows and reflows them after each edit
//!   Index           leaf -> (row, offset in row, offset in source)
//! ```
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use wrapline::{Composition, MonospaceMetrics, RecordingSurface, Style, WrapConfig};
//!
//! let style = Rc::new(Style::new(Rc::new(MonospaceMetrics::new(10.0, 20.0))));
//! let mut doc = Composition::new(WrapConfig::new(35.0));
//! doc.insert_text(0, "hello", &style)?;
//! doc.recompose()?;
//! assert_eq!(doc.rows().len(), 2);
//!
//! let mut surface = RecordingSurface::new();
//! doc.draw(&mut surface);
//! assert_eq!(surface.text(), "hello");
//! # Ok::<(), wrapline::LayoutError>(())
//! ```

// Core primitives
pub mod primitives;
pub mod error;
pub mod config;

// External collaborators (metrics in, draw commands out)
pub mod font;
pub mod surface;

// Layout tree
pub mod layout;

// Partitioning engine
pub mod compositor;
pub mod composition;

// Re-export core types
pub use primitives::{Color, Point, Rect, Size};
pub use error::{LayoutError, Result};
pub use config::WrapConfig;
pub use font::{FontMetrics, MonospaceMetrics, Style, BASE_FONT_SIZE, CHAR_WIDTH, LINE_HEIGHT};
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface, TextStyle};
pub use layout::{
    Column, Composite, ContainerKind, Cursor, Index, IndexEntry, LayoutNode, Leaf, LeafContent,
    LeafId, Row, RowId, SourceSequence,
};
pub use compositor::{ComposeContext, Compositor, WrapCompositor};
pub use composition::Composition;
