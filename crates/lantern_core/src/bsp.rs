//! Spatial partition nodes and leaves.

use crate::surface::SurfaceId;

/// Index of a leaf. Bit `n` of a `VisMask` refers to `LeafId(n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafId(pub u32);

impl LeafId {
    /// Array index of this leaf.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Array index of this node.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Content classification of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contents {
    /// Open air.
    Empty,
    /// Inside a wall.
    Solid,
    /// Water volume.
    Water,
    /// Slime volume.
    Slime,
    /// Lava volume.
    Lava,
    /// Sky volume.
    Sky,
}

impl Contents {
    /// True for water, slime and lava.
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water | Self::Slime | Self::Lava)
    }
}

/// Either side of a node split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// Another interior node.
    Node(NodeId),
    /// A terminal leaf.
    Leaf(LeafId),
}

/// Interior partition node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Split plane index.
    pub plane: u32,
    /// Front (`[0]`) and back (`[1]`) children.
    pub children: [Child; 2],
    /// First surface of the run this node owns.
    pub first_surface: u32,
    /// Length of the owned surface run.
    pub num_surfaces: u32,
}

impl Node {
    /// Surfaces owned by this node, in array order.
    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> {
        (self.first_surface..self.first_surface + self.num_surfaces).map(SurfaceId)
    }
}

/// Convex terminal cell of the partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Content classification.
    pub contents: Contents,
    /// Surfaces visible from inside this leaf ("marksurfaces").
    ///
    /// May still list surfaces that were stripped from node runs by
    /// post-compile tools.
    pub mark_surfaces: Vec<SurfaceId>,
}

impl Leaf {
    /// Creates a leaf.
    #[must_use]
    pub fn new(contents: Contents, mark_surfaces: Vec<SurfaceId>) -> Self {
        Self {
            contents,
            mark_surfaces,
        }
    }
}
