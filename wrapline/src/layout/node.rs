//! LayoutNode - the closed set of node kinds.
//!
//! Every node in a layout tree is one of five variants. Operations dispatch
//! with a `match` instead of through a trait object, so adding a capability
//! means touching this file and nothing else.
//!
//! Nodes never hold a pointer to the source sequence. Every operation that
//! needs leaf data takes the [`SourceSequence`] explicitly, and
//! [`LayoutNode::Reference`] stores a [`LeafId`] handle, which resolves to
//! nothing (zero size, no draw) once its leaf has been removed.

use crate::error::{LayoutError, Result};
use crate::primitives::{Point, Size};
use crate::surface::DrawingSurface;

use super::containers::{Column, Composite, Row};
use super::cursor::{ContainerKind, Cursor};
use super::leaf::Leaf;
use super::source::{LeafId, SourceSequence};

/// A node in a layout tree.
#[derive(Debug, Clone)]
pub enum LayoutNode {
    /// An owned leaf.
    Leaf(Leaf),
    /// A non-owning handle to a leaf in the source sequence.
    Reference(LeafId),
    Composite(Composite),
    Row(Row),
    Column(Column),
}

impl LayoutNode {
    pub fn kind(&self) -> ContainerKind {
        match self {
            LayoutNode::Leaf(_) | LayoutNode::Reference(_) => ContainerKind::Leaf,
            LayoutNode::Composite(_) => ContainerKind::Composite,
            LayoutNode::Row(_) => ContainerKind::Row,
            LayoutNode::Column(_) => ContainerKind::Column,
        }
    }

    pub fn draw(&self, leaves: &SourceSequence, surface: &mut dyn DrawingSurface) {
        match self {
            LayoutNode::Leaf(leaf) => leaf.draw(surface),
            LayoutNode::Reference(id) => {
                if let Some(leaf) = leaves.get(*id) {
                    leaf.draw(surface);
                }
            }
            LayoutNode::Composite(c) => c.draw(leaves, surface),
            LayoutNode::Row(r) => r.draw(leaves, surface),
            LayoutNode::Column(c) => c.draw(leaves, surface),
        }
    }

    pub fn bounds(&self, leaves: &SourceSequence) -> Size {
        match self {
            LayoutNode::Leaf(leaf) => leaf.bounds(),
            LayoutNode::Reference(id) => leaves.bounds(*id),
            LayoutNode::Composite(c) => c.bounds(),
            LayoutNode::Row(r) => r.bounds(),
            LayoutNode::Column(c) => c.bounds(),
        }
    }

    pub fn position(&self, leaves: &SourceSequence) -> Point {
        match self {
            LayoutNode::Leaf(leaf) => leaf.position(),
            LayoutNode::Reference(id) => leaves.get(*id).map_or(Point::ORIGIN, Leaf::position),
            LayoutNode::Composite(c) => c.position(),
            LayoutNode::Row(r) => r.position(),
            LayoutNode::Column(c) => c.position(),
        }
    }

    pub fn set_position(&mut self, leaves: &mut SourceSequence, position: Point) {
        match self {
            LayoutNode::Leaf(leaf) => leaf.set_position(position),
            LayoutNode::Reference(id) => {
                if let Some(leaf) = leaves.get_mut(*id) {
                    leaf.set_position(position);
                }
            }
            LayoutNode::Composite(c) => c.set_position(leaves, position),
            LayoutNode::Row(r) => r.set_position(leaves, position),
            LayoutNode::Column(c) => c.set_position(leaves, position),
        }
    }

    /// Pin the width (`Some`) or revert to intrinsic sizing (`None`).
    pub fn set_width(&mut self, leaves: &mut SourceSequence, width: Option<f32>) {
        match self {
            LayoutNode::Leaf(leaf) => leaf.set_width(width),
            LayoutNode::Reference(id) => {
                if let Some(leaf) = leaves.get_mut(*id) {
                    leaf.set_width(width);
                }
            }
            LayoutNode::Composite(c) => c.set_width(leaves, width),
            LayoutNode::Row(r) => r.set_width(leaves, width),
            LayoutNode::Column(c) => c.set_width(leaves, width),
        }
    }

    /// Pin the height (`Some`) or revert to intrinsic sizing (`None`).
    pub fn set_height(&mut self, leaves: &mut SourceSequence, height: Option<f32>) {
        match self {
            LayoutNode::Leaf(leaf) => leaf.set_height(height),
            LayoutNode::Reference(id) => {
                if let Some(leaf) = leaves.get_mut(*id) {
                    leaf.set_height(height);
                }
            }
            LayoutNode::Composite(c) => c.set_height(leaves, height),
            LayoutNode::Row(r) => r.set_height(leaves, height),
            LayoutNode::Column(c) => c.set_height(leaves, height),
        }
    }

    /// Recompute cached bounds for this subtree, children first.
    pub fn measure(&mut self, leaves: &SourceSequence) {
        match self {
            LayoutNode::Leaf(_) | LayoutNode::Reference(_) => {}
            LayoutNode::Composite(c) => {
                for child in &mut c.children {
                    child.measure(leaves);
                }
                c.refresh(leaves);
            }
            LayoutNode::Row(r) => {
                for child in &mut r.children {
                    child.measure(leaves);
                }
                r.refresh(leaves);
            }
            LayoutNode::Column(c) => {
                for child in &mut c.children {
                    child.measure(leaves);
                }
                c.refresh(leaves);
            }
        }
    }

    // =====================================================================
    // Children
    // =====================================================================

    /// Children of a container; empty for leaves and references.
    pub fn children(&self) -> &[LayoutNode] {
        match self {
            LayoutNode::Leaf(_) | LayoutNode::Reference(_) => &[],
            LayoutNode::Composite(c) => &c.children,
            LayoutNode::Row(r) => &r.children,
            LayoutNode::Column(c) => &c.children,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Result<&mut Vec<LayoutNode>> {
        match self {
            LayoutNode::Leaf(_) | LayoutNode::Reference(_) => {
                Err(LayoutError::NotAContainer(ContainerKind::Leaf))
            }
            LayoutNode::Composite(c) => Ok(&mut c.children),
            LayoutNode::Row(r) => Ok(&mut r.children),
            LayoutNode::Column(c) => Ok(&mut c.children),
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Cursor at the first child.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.kind(), 0)
    }

    /// Cursor one past the last child.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.kind(), self.child_count())
    }

    /// Append a child, returning the stored node.
    pub fn push_child(&mut self, child: impl Into<LayoutNode>) -> Result<&mut LayoutNode> {
        let children = self.children_mut()?;
        children.push(child.into());
        let last = children.len() - 1;
        Ok(&mut children[last])
    }

    /// Insert a child at `index`, shifting later children right.
    pub fn insert_child(&mut self, index: usize, child: impl Into<LayoutNode>) -> Result<&mut LayoutNode> {
        let children = self.children_mut()?;
        if index > children.len() {
            return Err(LayoutError::CursorOutOfRange {
                offset: index,
                len: children.len(),
            });
        }
        children.insert(index, child.into());
        Ok(&mut children[index])
    }

    /// Remove the child under `at`.
    pub fn remove_child(&mut self, at: &Cursor) -> Result<LayoutNode> {
        at.check(self)?;
        let children = self.children_mut()?;
        let offset = at.offset();
        if offset >= children.len() {
            return Err(LayoutError::CursorOutOfRange {
                offset,
                len: children.len(),
            });
        }
        Ok(children.remove(offset))
    }

    /// Remove the children in `[begin, end)`.
    pub fn remove_children(&mut self, begin: &Cursor, end: &Cursor) -> Result<Vec<LayoutNode>> {
        begin.check(self)?;
        begin.distance_to(end)?;
        let children = self.children_mut()?;
        if end.offset() > children.len() {
            return Err(LayoutError::CursorOutOfRange {
                offset: end.offset(),
                len: children.len(),
            });
        }
        Ok(children.drain(begin.offset()..end.offset()).collect())
    }

    /// Insert `nodes` before the child under `at`, keeping their order.
    pub fn insert_children(
        &mut self,
        at: &Cursor,
        nodes: impl IntoIterator<Item = LayoutNode>,
    ) -> Result<()> {
        at.check(self)?;
        let children = self.children_mut()?;
        let offset = at.offset();
        if offset > children.len() {
            return Err(LayoutError::CursorOutOfRange {
                offset,
                len: children.len(),
            });
        }
        children.splice(offset..offset, nodes);
        Ok(())
    }

    // =====================================================================
    // Downcasts
    // =====================================================================

    pub fn as_row(&self) -> Option<&Row> {
        match self {
            LayoutNode::Row(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_row_mut(&mut self) -> Option<&mut Row> {
        match self {
            LayoutNode::Row(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&Column> {
        match self {
            LayoutNode::Column(c) => Some(c),
            _ => None,
        }
    }

    /// The leaf a reference points at.
    pub fn referenced_leaf(&self) -> Option<LeafId> {
        match self {
            LayoutNode::Reference(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<Leaf> for LayoutNode {
    fn from(v: Leaf) -> Self { Self::Leaf(v) }
}

impl From<LeafId> for LayoutNode {
    fn from(v: LeafId) -> Self { Self::Reference(v) }
}

impl From<Composite> for LayoutNode {
    fn from(v: Composite) -> Self { Self::Composite(v) }
}

impl From<Row> for LayoutNode {
    fn from(v: Row) -> Self { Self::Row(v) }
}

impl From<Column> for LayoutNode {
    fn from(v: Column) -> Self { Self::Column(v) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SourceSequence, LayoutNode) {
        let mut seq = SourceSequence::new();
        let a = seq.push(Leaf::sized(10.0, 5.0));
        let b = seq.push(Leaf::sized(20.0, 8.0));
        let c = seq.push(Leaf::sized(30.0, 2.0));
        let row = Row::new().push(a).push(b).push(c);
        (seq, LayoutNode::Row(row))
    }

    #[test]
    fn test_reference_forwards_to_leaf() {
        let (mut seq, _) = sample();
        let id = seq.id_at(1).expect("leaf exists");
        let mut node = LayoutNode::from(id);

        assert_eq!(node.bounds(&seq), Size::new(20.0, 8.0));
        node.set_position(&mut seq, Point::new(3.0, 4.0));
        node.set_width(&mut seq, Some(7.0));

        let leaf = seq.get(id).expect("leaf exists");
        assert_eq!(leaf.position(), Point::new(3.0, 4.0));
        assert_eq!(leaf.bounds().width, 7.0);
        assert_eq!(node.position(&seq), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_stale_reference_is_inert() {
        let (mut seq, _) = sample();
        let id = seq.id_at(0).expect("leaf exists");
        seq.remove(0..1).expect("remove");
        let node = LayoutNode::Reference(id);

        assert_eq!(node.bounds(&seq), Size::ZERO);
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_measure_refreshes_row() {
        let (seq, mut node) = sample();
        assert_eq!(node.bounds(&seq), Size::ZERO);
        node.measure(&seq);
        assert_eq!(node.bounds(&seq), Size::new(60.0, 8.0));
    }

    #[test]
    fn test_child_mutation() {
        let (seq, mut node) = sample();
        let extra = Leaf::sized(1.0, 1.0);
        node.insert_child(1, extra).expect("insert");
        assert_eq!(node.child_count(), 4);

        let removed = node.remove_child(&Cursor::Row(1)).expect("remove");
        assert!(matches!(removed, LayoutNode::Leaf(_)));

        let begin = node.begin();
        let end = begin.next(2).expect("advance");
        let drained = node.remove_children(&begin, &end).expect("range");
        assert_eq!(drained.len(), 2);
        assert_eq!(node.child_count(), 1);

        node.measure(&seq);
        assert_eq!(node.bounds(&seq).width, 30.0);
    }

    #[test]
    fn test_leaf_rejects_children() {
        let mut node = LayoutNode::Leaf(Leaf::sized(1.0, 1.0));
        assert_eq!(
            node.push_child(Leaf::sized(1.0, 1.0)).map(|_| ()),
            Err(LayoutError::NotAContainer(ContainerKind::Leaf))
        );
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_remove_with_foreign_cursor_fails() {
        let (_, mut node) = sample();
        let result = node.remove_child(&Cursor::Column(0));
        assert!(matches!(result, Err(LayoutError::CursorMismatch { .. })));
        assert_eq!(node.child_count(), 3);
    }

    #[test]
    fn test_insert_past_end_fails() {
        let (_, mut node) = sample();
        assert!(node.insert_child(9, Leaf::sized(1.0, 1.0)).is_err());
        assert_eq!(node.child_count(), 3);
    }

    #[test]
    fn test_insert_children_at_cursor() {
        let (mut seq, mut node) = sample();
        let x = seq.push(Leaf::sized(1.0, 1.0));
        let y = seq.push(Leaf::sized(2.0, 1.0));

        let at = node.begin().next(1).expect("advance");
        node.insert_children(&at, [LayoutNode::from(x), LayoutNode::from(y)])
            .expect("insert");
        let order: Vec<_> = node.children().iter().filter_map(LayoutNode::referenced_leaf).collect();
        assert_eq!(order[1..3], [x, y]);
        assert_eq!(node.child_count(), 5);

        let end = node.end();
        node.insert_children(&end, Vec::new()).expect("empty insert");
        assert_eq!(node.child_count(), 5);

        assert!(matches!(
            node.insert_children(&Cursor::Column(0), [LayoutNode::from(x)]),
            Err(LayoutError::CursorMismatch { .. })
        ));
        assert_eq!(
            node.insert_children(&Cursor::Row(9), [LayoutNode::from(x)]),
            Err(LayoutError::CursorOutOfRange { offset: 9, len: 5 })
        );
    }
}
