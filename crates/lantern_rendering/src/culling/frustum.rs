//! View frustum.
//!
//! Extracts frustum planes from the view-projection matrix and tests
//! surface bounding boxes against them.

use lantern_core::{Aabb, Plane};

/// View frustum for culling.
///
/// The default frustum has six zero planes and culls nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far planes.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Plane indices.
    pub const LEFT: usize = 0;
    /// Right plane index.
    pub const RIGHT: usize = 1;
    /// Bottom plane index.
    pub const BOTTOM: usize = 2;
    /// Top plane index.
    pub const TOP: usize = 3;
    /// Near plane index.
    pub const NEAR: usize = 4;
    /// Far plane index.
    pub const FAR: usize = 5;

    /// Extracts frustum planes from a view-projection matrix.
    ///
    /// The matrix is column-major.
    #[must_use]
    pub fn from_view_projection(m: &[[f32; 4]; 4]) -> Self {
        let row = |r: usize, sign: f32| {
            Plane::new(
                m[0][3] + sign * m[0][r],
                m[1][3] + sign * m[1][r],
                m[2][3] + sign * m[2][r],
                m[3][3] + sign * m[3][r],
            )
            .normalized()
        };

        let mut planes = [Plane::default(); 6];
        planes[Self::LEFT] = row(0, 1.0);
        planes[Self::RIGHT] = row(0, -1.0);
        planes[Self::BOTTOM] = row(1, 1.0);
        planes[Self::TOP] = row(1, -1.0);
        planes[Self::NEAR] = row(2, 1.0);
        planes[Self::FAR] = row(2, -1.0);
        Self { planes }
    }

    /// Frustum bounded by four side planes only, the way a world renderer
    /// with an infinite far plane culls.
    #[must_use]
    pub fn from_side_planes(sides: [Plane; 4]) -> Self {
        let mut planes = [Plane::default(); 6];
        planes[..4].copy_from_slice(&sides);
        Self { planes }
    }

    /// True if `bounds` lies entirely outside any plane.
    #[must_use]
    pub fn cull_box(&self, bounds: &Aabb) -> bool {
        let center = bounds.center();
        let half = bounds.half_extents();

        self.planes.iter().any(|plane| {
            // Projection interval radius of the box onto the plane normal.
            let r = half[0] * plane.a.abs() + half[1] * plane.b.abs() + half[2] * plane.c.abs();
            plane.distance_to_point(center) < -r
        })
    }
}
