//! Compact bit vector representation of the leaves below a vertex.
//!
//! A [LeafSet] has one bit per index of a [LeafIndexMap](crate::topology::LeafIndexMap).
//! Cutting the incoming branch of a vertex splits the leaves into the vertex's
//! leaf set and its [complement](LeafSet::complement), so every bipartition
//! question reduces to containment and overlap tests on these bit vectors.
//!
//! # Example
//! For leaves `[A, B, C, D]` mapped to indices `[0, 1, 2, 3]`:
//! - clade {A, B} → `1100`
//! - its complement {C, D} → `0011`

use crate::topology::error::{Result, TopologyError};
use bitvec::prelude::*;
use std::fmt;

// =#========================================================================#=
// LEAF SET
// =#========================================================================$=
/// Fixed-size bit vector over the leaf index space of one comparison.
///
/// Equality and hashing are structural (bit pattern), so leaf sets can key
/// a [HashMap](std::collections::HashMap) of clades.
///
/// All binary operations require both operands to have the same size and
/// fail with [TopologyError::SizeMismatch] otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LeafSet {
    bits: BitVec<u64, Lsb0>,
}

/// Outcome of [LeafSet::compare].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafSetRelation {
    /// Both sets contain the same leaves
    Equal,
    /// `self` is a strict subset; the other set contains this many extra leaves
    OtherHasExtra(usize),
    /// `self` contains at least one leaf the other set lacks
    NotContained,
}

impl LeafSetRelation {
    /// Returns the number of leaves the other set has in addition, or `None`
    /// if `self` is not contained in it.
    pub fn additional_leaf_count(&self) -> Option<usize> {
        match self {
            LeafSetRelation::Equal => Some(0),
            LeafSetRelation::OtherHasExtra(count) => Some(*count),
            LeafSetRelation::NotContained => None,
        }
    }
}

impl LeafSet {
    /// Creates an empty leaf set for an index space of `size` leaves.
    pub fn new(size: usize) -> Self {
        LeafSet {
            bits: BitVec::repeat(false, size),
        }
    }

    /// Creates a leaf set containing only the leaf with `index`.
    pub fn singleton(size: usize, index: usize) -> Result<Self> {
        let mut leaf_set = Self::new(size);
        leaf_set.set_bit(index, true)?;
        Ok(leaf_set)
    }

    /// Returns the size of the index space.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Sets or clears the bit of leaf `index`.
    pub fn set_bit(&mut self, index: usize, value: bool) -> Result<()> {
        if index >= self.bits.len() {
            return Err(TopologyError::IndexOutOfRange {
                index,
                size: self.bits.len(),
            });
        }
        self.bits.set(index, value);
        Ok(())
    }

    /// Returns whether leaf `index` is contained; `false` if out of range.
    pub fn is_set(&self, index: usize) -> bool {
        self.bits.get(index).is_some_and(|bit| *bit)
    }

    /// Returns the number of contained leaves.
    pub fn popcount(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns `true` if no leaf is contained.
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Returns the size of the smaller side of the bipartition this set induces.
    pub fn min_side(&self) -> usize {
        let inside = self.popcount();
        inside.min(self.len() - inside)
    }

    /// Iterates over the indices of contained leaves in increasing order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Adds all leaves of `other` to this set (bitwise OR).
    pub fn union(&mut self, other: &LeafSet) -> Result<()> {
        self.check_size(other)?;
        self.bits |= other.bits.as_bitslice();
        Ok(())
    }

    /// Returns the leaves of the index space not contained in this set.
    pub fn complement(&self) -> LeafSet {
        LeafSet {
            bits: !self.bits.clone(),
        }
    }

    /// Returns the leaves of `universe` not contained in this set.
    ///
    /// For a tree that carries only part of the index space, the complement
    /// of a clade is taken within the tree's root set.
    pub fn complement_within(&self, universe: &LeafSet) -> Result<LeafSet> {
        self.check_size(universe)?;
        let mut bits = !self.bits.clone();
        bits &= universe.bits.as_bitslice();
        Ok(LeafSet { bits })
    }

    /// Compares `self` (or its complement) against `other`.
    ///
    /// Stops at the first leaf of `self` missing in `other` and returns
    /// [LeafSetRelation::NotContained]. Otherwise counts the leaves of
    /// `other` missing in `self`.
    pub fn compare(&self, other: &LeafSet, use_complement: bool) -> Result<LeafSetRelation> {
        self.check_size(other)?;

        let mut additional = 0;
        for (own, theirs) in self.pairs(other, use_complement) {
            if own && !theirs {
                return Ok(LeafSetRelation::NotContained);
            }
            if theirs && !own {
                additional += 1;
            }
        }

        Ok(match additional {
            0 => LeafSetRelation::Equal,
            count => LeafSetRelation::OtherHasExtra(count),
        })
    }

    /// Returns `true` iff every leaf of `subset` is contained in `self`.
    pub fn contains_all(&self, subset: &LeafSet) -> Result<bool> {
        self.check_size(subset)?;
        Ok(subset.bits.iter_ones().all(|index| self.bits[index]))
    }

    /// Returns `true` iff `self` (or its complement) is a strict subset of `other`.
    pub fn is_proper_subtree_of(&self, other: &LeafSet, use_complement: bool) -> Result<bool> {
        Ok(matches!(
            self.compare(other, use_complement)?,
            LeafSetRelation::OtherHasExtra(_)
        ))
    }

    /// Returns `true` iff `self` (or its complement) shares at least one leaf
    /// with `other` and also contains a leaf `other` lacks.
    pub fn has_incompatible_overlap(&self, other: &LeafSet, use_complement: bool) -> Result<bool> {
        self.check_size(other)?;

        let mut shared = false;
        let mut extra = false;
        for (own, theirs) in self.pairs(other, use_complement) {
            if own {
                if theirs {
                    shared = true;
                } else {
                    extra = true;
                }
                if shared && extra {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Returns `true` iff the bipartitions induced by `self` and `other`
    /// conflict, i.e. are neither nested nor disjoint in either direction.
    pub fn conflicts_with(&self, other: &LeafSet) -> Result<bool> {
        Ok(self.has_incompatible_overlap(other, false)?
            && self.has_incompatible_overlap(other, true)?)
    }

    fn pairs<'a>(
        &'a self,
        other: &'a LeafSet,
        use_complement: bool,
    ) -> impl Iterator<Item = (bool, bool)> + 'a {
        self.bits
            .iter()
            .by_vals()
            .map(move |own| own != use_complement)
            .zip(other.bits.iter().by_vals())
    }

    fn check_size(&self, other: &LeafSet) -> Result<()> {
        if self.len() != other.len() {
            return Err(TopologyError::SizeMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for LeafSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
