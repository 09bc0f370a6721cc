//! Dynamic fragments attached to leaves.
//!
//! Static entities are linked into every leaf they touch. Each frame the
//! marker re-registers the fragments of every visible leaf, whether or not
//! the surfaces were remarked, because fragment membership changes
//! independently of the map.

use lantern_core::LeafId;

/// Per-leaf fragment lists owned by the entity collaborator.
pub trait FragmentRegistry {
    /// True if anything is attached to `leaf`.
    fn has_fragments(&self, leaf: LeafId) -> bool;

    /// Registers the fragments of `leaf` for this frame.
    fn store_fragments(&mut self, leaf: LeafId);
}

/// Registry for maps without static entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFragments;

impl FragmentRegistry for NoFragments {
    fn has_fragments(&self, _leaf: LeafId) -> bool {
        false
    }

    fn store_fragments(&mut self, _leaf: LeafId) {}
}

/// Handle of one static entity fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FragmentId(pub u32);

/// Fragment lists per leaf, plus the set registered this frame.
///
/// A fragment linked into several visible leaves is registered once.
#[derive(Debug, Clone, Default)]
pub struct LeafFragments {
    leaves: Vec<Vec<FragmentId>>,
    stamps: Vec<u64>,
    frame: u64,
    stored: Vec<FragmentId>,
}

impl LeafFragments {
    /// Empty lists for `leaves` leaves.
    #[must_use]
    pub fn new(leaves: usize) -> Self {
        Self {
            leaves: vec![Vec::new(); leaves],
            stamps: Vec::new(),
            frame: 1,
            stored: Vec::new(),
        }
    }

    /// Links `fragment` into `leaf`. Out-of-range leaves are ignored.
    pub fn attach(&mut self, leaf: LeafId, fragment: FragmentId) {
        let Some(list) = self.leaves.get_mut(leaf.index()) else {
            return;
        };
        list.push(fragment);
        let slot = fragment.0 as usize;
        if slot >= self.stamps.len() {
            self.stamps.resize(slot + 1, 0);
        }
    }

    /// Unlinks everything from `leaf`.
    pub fn clear_leaf(&mut self, leaf: LeafId) {
        if let Some(list) = self.leaves.get_mut(leaf.index()) {
            list.clear();
        }
    }

    /// Starts a new frame: forgets the registered set.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.stored.clear();
    }

    /// Fragments registered since the last `begin_frame`, in registration
    /// order.
    #[must_use]
    pub fn stored(&self) -> &[FragmentId] {
        &self.stored
    }
}

impl FragmentRegistry for LeafFragments {
    fn has_fragments(&self, leaf: LeafId) -> bool {
        self.leaves.get(leaf.index()).is_some_and(|l| !l.is_empty())
    }

    fn store_fragments(&mut self, leaf: LeafId) {
        let Some(list) = self.leaves.get(leaf.index()) else {
            return;
        };
        for &fragment in list {
            let stamp = &mut self.stamps[fragment.0 as usize];
            if *stamp != self.frame {
                *stamp = self.frame;
                self.stored.push(fragment);
            }
        }
    }
}
