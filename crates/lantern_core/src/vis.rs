//! Potentially-visible sets.
//!
//! A `VisMask` holds one bit per leaf, least significant bit first within
//! each byte, the layout the map compiler writes.

/// Bitmask over map leaves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisMask {
    bits: Vec<u8>,
    leaves: usize,
}

impl VisMask {
    /// Mask with no leaf set.
    #[must_use]
    pub fn empty(leaves: usize) -> Self {
        Self {
            bits: vec![0; leaves.div_ceil(8)],
            leaves,
        }
    }

    /// Mask with every leaf set.
    #[must_use]
    pub fn all(leaves: usize) -> Self {
        let mut mask = Self::empty(leaves);
        mask.fill();
        mask
    }

    /// Builds a mask from packed bytes. Bits past `leaves` are dropped.
    ///
    /// Returns `None` if `bytes` is too short to hold `leaves` bits.
    #[must_use]
    pub fn from_bytes(leaves: usize, bytes: &[u8]) -> Option<Self> {
        let len = leaves.div_ceil(8);
        if bytes.len() < len {
            return None;
        }
        let mut mask = Self {
            bits: bytes[..len].to_vec(),
            leaves,
        };
        mask.clear_tail();
        Some(mask)
    }

    /// Number of leaves covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.leaves
    }

    /// True if the mask covers no leaves.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    /// Packed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Tests a leaf bit. Leaves outside the mask are not visible.
    #[inline]
    #[must_use]
    pub fn contains(&self, leaf: usize) -> bool {
        leaf < self.leaves && self.bits[leaf >> 3] & (1 << (leaf & 7)) != 0
    }

    /// Sets a leaf bit. Out-of-range leaves are ignored.
    pub fn insert(&mut self, leaf: usize) {
        if leaf < self.leaves {
            self.bits[leaf >> 3] |= 1 << (leaf & 7);
        }
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Sets every bit.
    pub fn fill(&mut self) {
        self.bits.fill(0xff);
        self.clear_tail();
    }

    /// ORs `other` into this mask over their common range.
    pub fn union_with(&mut self, other: &Self) {
        for (dst, src) in self.bits.iter_mut().zip(&other.bits) {
            *dst |= *src;
        }
        self.clear_tail();
    }

    /// Replaces the contents with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.bits.clear();
        self.bits.extend_from_slice(&other.bits);
        self.leaves = other.leaves;
    }

    /// Iterates the set leaves in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.leaves).filter(move |&leaf| self.contains(leaf))
    }

    /// Number of set leaves.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    fn clear_tail(&mut self) {
        let rem = self.leaves & 7;
        if rem != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= (1u8 << rem) - 1;
            }
        }
    }
}

/// Precomputed PVS rows, one per leaf.
///
/// A map compiled without visibility has no rows; every leaf then sees
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisData {
    rows: Vec<VisMask>,
}

impl VisData {
    /// Visibility table from one mask per leaf.
    #[must_use]
    pub fn new(rows: Vec<VisMask>) -> Self {
        Self { rows }
    }

    /// A map without visibility information.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Row for `leaf`, if the map has visibility data.
    #[must_use]
    pub fn row(&self, leaf: usize) -> Option<&VisMask> {
        self.rows.get(leaf)
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[VisMask] {
        &self.rows
    }

    /// True if the map was compiled without visibility.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.rows.is_empty()
    }
}
