//! Source sequence - the ordered, owning store of leaves.
//!
//! Leaves live in a generational arena and are addressed by [`LeafId`]. The
//! reading order is a separate list of ids, so rows can hold handles into the
//! arena without owning anything. A removed leaf's slot gets a new generation,
//! which makes any handle still pointing at it resolve to `None` instead of a
//! different leaf.

use std::ops::Range;

use crate::error::{LayoutError, Result};
use crate::primitives::Size;

use super::leaf::Leaf;

/// Stable handle to a leaf in a [`SourceSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafId {
    index: u32,
    generation: u32,
}

impl LeafId {
    pub const fn index(&self) -> u32 {
        self.index
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    leaf: Option<Leaf>,
}

#[derive(Debug, Clone, Default)]
pub struct SourceSequence {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<LeafId>,
}

impl SourceSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaves in reading order.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Leaf handles in reading order.
    pub fn ids(&self) -> &[LeafId] {
        &self.order
    }

    /// Handle of the leaf at `position` in reading order.
    pub fn id_at(&self, position: usize) -> Option<LeafId> {
        self.order.get(position).copied()
    }

    pub fn contains(&self, id: LeafId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: LeafId) -> Option<&Leaf> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.leaf.as_ref())
    }

    pub fn get_mut(&mut self, id: LeafId) -> Option<&mut Leaf> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.leaf.as_mut())
    }

    /// Bounds of a leaf, or zero for a stale handle.
    pub fn bounds(&self, id: LeafId) -> Size {
        self.get(id).map_or(Size::ZERO, Leaf::bounds)
    }

    /// Iterate leaves in reading order.
    pub fn iter(&self) -> impl Iterator<Item = (LeafId, &Leaf)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.get(id).map(|leaf| (id, leaf)))
    }

    /// Append a leaf at the end of the reading order.
    pub fn push(&mut self, leaf: Leaf) -> LeafId {
        let id = self.allocate(leaf);
        self.order.push(id);
        id
    }

    /// Insert leaves at `at` in reading order, returning the positions they occupy.
    pub fn insert(
        &mut self,
        at: usize,
        leaves: impl IntoIterator<Item = Leaf>,
    ) -> Result<Range<usize>> {
        if at > self.order.len() {
            return Err(LayoutError::RangeOutOfBounds {
                start: at,
                end: at,
                len: self.order.len(),
            });
        }
        let ids: Vec<LeafId> = leaves.into_iter().map(|leaf| self.allocate(leaf)).collect();
        let inserted = at..at + ids.len();
        self.order.splice(at..at, ids);
        Ok(inserted)
    }

    /// Remove the leaves at `range` from the reading order and free their slots.
    pub fn remove(&mut self, range: Range<usize>) -> Result<Vec<Leaf>> {
        self.check_range(&range)?;
        let removed: Vec<LeafId> = self.order.drain(range).collect();
        Ok(removed.into_iter().filter_map(|id| self.release(id)).collect())
    }

    /// Validate that `range` lies within the reading order.
    pub fn check_range(&self, range: &Range<usize>) -> Result<()> {
        if range.start > range.end || range.end > self.order.len() {
            return Err(LayoutError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.order.len(),
            });
        }
        Ok(())
    }

    fn allocate(&mut self, leaf: Leaf) -> LeafId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.leaf = Some(leaf);
            LeafId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                leaf: Some(leaf),
            });
            LeafId { index, generation: 0 }
        }
    }

    fn release(&mut self, id: LeafId) -> Option<Leaf> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let leaf = slot.leaf.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(leaf)
    }
}
