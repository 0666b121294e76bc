//! Cursor - one traversal handle over every container kind.
//!
//! A [`Cursor`] is an offset tagged with the kind of container it walks. Any
//! algorithm can step through, read, or remove children of a Composite, Row or
//! Column without knowing which one it has. Using a cursor against a container
//! of a different kind, or comparing cursors of different kinds, is reported
//! as [`LayoutError::CursorMismatch`] rather than treated as "not equal".
//!
//! Cursors carry no borrow of the container. A structural edit made after a
//! cursor was created leaves it pointing at whatever now sits at its offset;
//! dereferencing past the end yields [`LayoutError::CursorOutOfRange`].

use crate::error::{LayoutError, Result};

use super::node::LayoutNode;

/// The storage family a node belongs to.
///
/// References report [`ContainerKind::Leaf`]: they forward to a leaf, which has
/// no children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Leaf,
    Composite,
    Row,
    Column,
}

/// A position among the children of a container.
#[derive(Debug, Clone)]
pub enum Cursor {
    /// A leaf has no children; its begin and end coincide.
    Leaf,
    Composite(usize),
    Row(usize),
    Column(usize),
}

impl Cursor {
    /// Create a cursor over a container of `kind` at `offset`.
    pub fn new(kind: ContainerKind, offset: usize) -> Self {
        match kind {
            ContainerKind::Leaf => Cursor::Leaf,
            ContainerKind::Composite => Cursor::Composite(offset),
            ContainerKind::Row => Cursor::Row(offset),
            ContainerKind::Column => Cursor::Column(offset),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Cursor::Leaf => ContainerKind::Leaf,
            Cursor::Composite(_) => ContainerKind::Composite,
            Cursor::Row(_) => ContainerKind::Row,
            Cursor::Column(_) => ContainerKind::Column,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Cursor::Leaf => 0,
            Cursor::Composite(offset) | Cursor::Row(offset) | Cursor::Column(offset) => *offset,
        }
    }

    fn offset_mut(&mut self) -> Option<&mut usize> {
        match self {
            Cursor::Leaf => None,
            Cursor::Composite(offset) | Cursor::Row(offset) | Cursor::Column(offset) => Some(offset),
        }
    }

    /// Step forward by `n` children.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        let offset = self.offset();
        match self.offset_mut() {
            Some(slot) => {
                *slot = offset.saturating_add(n);
                Ok(())
            }
            None if n == 0 => Ok(()),
            None => Err(LayoutError::CursorOutOfRange { offset: n, len: 0 }),
        }
    }

    /// Step back by `n` children.
    pub fn retreat(&mut self, n: usize) -> Result<()> {
        let offset = self.offset();
        let Some(moved) = offset.checked_sub(n) else {
            return Err(LayoutError::CursorUnderflow { offset, steps: n });
        };
        if let Some(slot) = self.offset_mut() {
            *slot = moved;
        }
        Ok(())
    }

    /// Return a copy moved forward by `n`.
    pub fn next(&self, n: usize) -> Result<Self> {
        let mut moved = self.clone();
        moved.advance(n)?;
        Ok(moved)
    }

    /// Return a copy moved back by `n`.
    pub fn prev(&self, n: usize) -> Result<Self> {
        let mut moved = self.clone();
        moved.retreat(n)?;
        Ok(moved)
    }

    fn ensure_same_kind(&self, other: ContainerKind) -> Result<()> {
        if self.kind() == other {
            Ok(())
        } else {
            Err(LayoutError::CursorMismatch {
                expected: other,
                found: self.kind(),
            })
        }
    }

    /// Compare two cursors; cursors over different container kinds are an error.
    pub fn try_eq(&self, other: &Cursor) -> Result<bool> {
        other.ensure_same_kind(self.kind())?;
        Ok(self.offset() == other.offset())
    }

    /// Number of steps from `self` forward to `end`.
    pub fn distance_to(&self, end: &Cursor) -> Result<usize> {
        end.ensure_same_kind(self.kind())?;
        end.offset()
            .checked_sub(self.offset())
            .ok_or(LayoutError::CursorRangeReversed {
                begin: self.offset(),
                end: end.offset(),
            })
    }

    /// Check this cursor belongs to `node`'s container kind.
    pub fn check(&self, node: &LayoutNode) -> Result<()> {
        self.ensure_same_kind(node.kind())
    }

    /// Dereference against `node`, yielding the child slot under the cursor.
    pub fn get<'n>(&self, node: &'n LayoutNode) -> Result<&'n LayoutNode> {
        self.check(node)?;
        let children = node.children();
        children.get(self.offset()).ok_or(LayoutError::CursorOutOfRange {
            offset: self.offset(),
            len: children.len(),
        })
    }

    /// Mutable dereference against `node`.
    pub fn get_mut<'n>(&self, node: &'n mut LayoutNode) -> Result<&'n mut LayoutNode> {
        self.check(node)?;
        let offset = self.offset();
        let children = node.children_mut()?;
        let len = children.len();
        children
            .get_mut(offset)
            .ok_or(LayoutError::CursorOutOfRange { offset, len })
    }
}
