//! # Map Error Types
//!
//! Everything `WorldModel::new` can reject. After a map passes validation
//! the renderer treats it as trusted and never re-checks indices.

use thiserror::Error;

/// Errors found while validating a loaded map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The map has no leaves at all.
    #[error("map has no leaves")]
    NoLeaves,

    /// A leaf's surface list references a surface that does not exist.
    #[error("leaf {leaf} references surface {surface}, map has {count} surfaces")]
    LeafSurfaceOutOfRange {
        /// Offending leaf.
        leaf: u32,
        /// Referenced surface.
        surface: u32,
        /// Number of surfaces in the map.
        count: usize,
    },

    /// A surface names a texture slot past the end of the texture table.
    #[error("surface {surface} uses texture {texture}, map has {count} texture slots")]
    TextureOutOfRange {
        /// Offending surface.
        surface: u32,
        /// Referenced texture slot.
        texture: u32,
        /// Number of texture slots.
        count: usize,
    },

    /// A surface's vertex run does not fit in 32-bit vertex indices.
    #[error("surface {surface} vertices {first}+{edges} overflow 32-bit indices")]
    VertexRangeOverflow {
        /// Offending surface.
        surface: u32,
        /// First vertex.
        first: u32,
        /// Vertex count.
        edges: u32,
    },

    /// A surface or node names a split plane that does not exist.
    #[error("plane {plane} out of range ({count} planes)")]
    PlaneOutOfRange {
        /// Referenced plane.
        plane: u32,
        /// Number of planes.
        count: usize,
    },

    /// A node's surface run extends past the surface array.
    #[error("node {node} owns surfaces {first}..{end}, map has {count} surfaces")]
    NodeSurfacesOutOfRange {
        /// Offending node.
        node: u32,
        /// First surface of the run.
        first: u32,
        /// One past the last surface of the run.
        end: u64,
        /// Number of surfaces in the map.
        count: usize,
    },

    /// A node child points at a node or leaf that does not exist.
    #[error("node {node} has a dangling child")]
    ChildOutOfRange {
        /// Offending node.
        node: u32,
    },

    /// A precomputed visibility row cannot hold one bit per leaf.
    #[error("visibility row for leaf {leaf} covers {bits} leaves, map has {leaves}")]
    VisRowTooShort {
        /// Leaf whose row is short.
        leaf: u32,
        /// Leaves the row covers.
        bits: usize,
        /// Leaves in the map.
        leaves: usize,
    },

    /// The visibility table has a different number of rows than leaves.
    #[error("visibility table has {rows} rows for {leaves} leaves")]
    VisRowCount {
        /// Rows present.
        rows: usize,
        /// Leaves in the map.
        leaves: usize,
    },

    /// A texture animation sequence references a missing texture slot.
    #[error("texture {texture} animates through missing slot {frame}")]
    AnimationOutOfRange {
        /// Animated texture.
        texture: u32,
        /// Referenced frame slot.
        frame: u32,
    },

    /// A submodel's surface range extends past the surface array.
    #[error("submodel {submodel} surface range out of range")]
    SubModelOutOfRange {
        /// Offending submodel.
        submodel: u32,
    },
}

/// Result type for map loading.
pub type WorldResult<T> = Result<T, WorldError>;
