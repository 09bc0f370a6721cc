//! Planar map surfaces.

use bitflags::bitflags;

use crate::geometry::Aabb;
use crate::texture::TextureId;

/// Index of a surface in the map's surface array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// Array index of this surface.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    /// Per-surface drawing flags, fixed at load time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: u32 {
        /// Surface faces the back side of its plane.
        const PLANE_BACK = 1 << 1;
        /// Sky surface.
        const SKY = 1 << 2;
        /// Liquid (warped, turbulent) surface.
        const LIQUID = 1 << 4;
        /// Drawn without a lightmap by a specialised pass (sky and liquids).
        const TILED = 1 << 5;
        /// Texture was missing from the map file.
        const NO_TEXTURE = 1 << 8;
        /// Alpha-tested fence texture.
        const FENCE = 1 << 9;
        /// Liquid is lava.
        const LAVA = 1 << 10;
        /// Liquid is slime.
        const SLIME = 1 << 11;
        /// Liquid is a teleporter surface.
        const TELE = 1 << 12;
        /// Liquid is water.
        const WATER = 1 << 13;
    }
}

/// A convex planar polygon with one texture.
///
/// Vertices live in a shared vertex buffer, starting at `first_vertex`,
/// in fan order.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    /// World-space bounds.
    pub bounds: Aabb,
    /// Index of the plane the surface lies on.
    pub plane: u32,
    /// Drawing flags. `PLANE_BACK` flips the plane for back-face tests.
    pub flags: SurfaceFlags,
    /// Texture slot.
    pub texture: TextureId,
    /// Number of polygon edges (equal to its vertex count).
    pub num_edges: u32,
    /// First vertex in the shared vertex buffer.
    pub first_vertex: u32,
    /// Lightmap page the surface samples from.
    pub lightmap: u32,
}

impl Surface {
    /// Number of triangle-list indices needed to draw this surface.
    ///
    /// A polygon with `E` edges is drawn as `E - 2` fan triangles.
    #[inline]
    #[must_use]
    pub const fn index_count(&self) -> u32 {
        3 * self.num_edges.saturating_sub(2)
    }

    /// Writes the fan triangulation of this surface into `dest`.
    ///
    /// Every triangle shares the first vertex.
    pub fn write_fan_indices(&self, dest: &mut Vec<u32>) {
        let first = self.first_vertex;
        for i in 2..self.num_edges {
            dest.extend_from_slice(&[first, first + i - 1, first + i]);
        }
    }

    /// True for liquid surfaces.
    #[inline]
    #[must_use]
    pub const fn is_liquid(&self) -> bool {
        self.flags.contains(SurfaceFlags::LIQUID)
    }
}
