//! Planes and boxes shared by the map and the culler.

use bytemuck::{Pod, Zeroable};

/// A plane in 3D space (Ax + By + Cz + D = 0).
///
/// Used for frustum planes, which are uploaded as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    /// Normal X component.
    pub a: f32,
    /// Normal Y component.
    pub b: f32,
    /// Normal Z component.
    pub c: f32,
    /// Distance term.
    pub d: f32,
}

impl Plane {
    /// Creates a new plane.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Normalizes the plane.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len > 0.0 {
            Self {
                a: self.a / len,
                b: self.b / len,
                c: self.c / len,
                d: self.d / len,
            }
        } else {
            self
        }
    }

    /// Returns the signed distance from a point to the plane.
    #[inline]
    #[must_use]
    pub fn distance_to_point(&self, p: [f32; 3]) -> f32 {
        self.a * p[0] + self.b * p[1] + self.c * p[2] + self.d
    }
}

/// Orientation class of a map plane.
///
/// Axial planes let distance tests read a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneKind {
    /// Normal is +X.
    AxisX,
    /// Normal is +Y.
    AxisY,
    /// Normal is +Z.
    AxisZ,
    /// Any other orientation.
    NonAxial,
}

/// A BSP split plane: points `p` with `dot(normal, p) == dist`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlane {
    /// Unit normal.
    pub normal: [f32; 3],
    /// Distance from the origin along the normal.
    pub dist: f32,
    /// Orientation class.
    pub kind: PlaneKind,
}

impl SplitPlane {
    /// Creates a plane and classifies its orientation.
    #[must_use]
    pub fn new(normal: [f32; 3], dist: f32) -> Self {
        let kind = match normal {
            [x, y, z] if x == 1.0 && y == 0.0 && z == 0.0 => PlaneKind::AxisX,
            [x, y, z] if x == 0.0 && y == 1.0 && z == 0.0 => PlaneKind::AxisY,
            [x, y, z] if x == 0.0 && y == 0.0 && z == 1.0 => PlaneKind::AxisZ,
            _ => PlaneKind::NonAxial,
        };
        Self { normal, dist, kind }
    }

    /// Axis-aligned plane `coordinate[axis] == dist`.
    ///
    /// # Panics
    ///
    /// Panics if `axis` is not 0, 1 or 2.
    #[must_use]
    pub fn axial(axis: usize, dist: f32) -> Self {
        let mut normal = [0.0; 3];
        normal[axis] = 1.0;
        Self::new(normal, dist)
    }

    /// Signed distance from `point`, positive on the front side.
    #[inline]
    #[must_use]
    pub fn distance(&self, point: [f32; 3]) -> f32 {
        match self.kind {
            PlaneKind::AxisX => point[0] - self.dist,
            PlaneKind::AxisY => point[1] - self.dist,
            PlaneKind::AxisZ => point[2] - self.dist,
            PlaneKind::NonAxial => {
                point[0] * self.normal[0] + point[1] * self.normal[1] + point[2] * self.normal[2]
                    - self.dist
            }
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: [f32; 3],
    /// Maximum corner.
    pub max: [f32; 3],
}

impl Aabb {
    /// Creates a new box.
    #[must_use]
    pub const fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Returns the center of the box.
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// Returns the half-extents of the box.
    #[must_use]
    pub fn half_extents(&self) -> [f32; 3] {
        [
            (self.max[0] - self.min[0]) * 0.5,
            (self.max[1] - self.min[1]) * 0.5,
            (self.max[2] - self.min[2]) * 0.5,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_normalization() {
        let plane = Plane::new(3.0, 4.0, 0.0, 10.0);
        let normalized = plane.normalized();

        // 3-4-5 triangle, so length is 5
        assert!((normalized.a - 0.6).abs() < 0.001);
        assert!((normalized.b - 0.8).abs() < 0.001);
        assert!((normalized.d - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_split_plane_classification() {
        assert_eq!(SplitPlane::axial(0, 4.0).kind, PlaneKind::AxisX);
        assert_eq!(SplitPlane::axial(2, 4.0).kind, PlaneKind::AxisZ);
        let diagonal = SplitPlane::new([0.6, 0.8, 0.0], 0.0);
        assert_eq!(diagonal.kind, PlaneKind::NonAxial);
    }

    #[test]
    fn test_axial_distance_matches_general() {
        let axial = SplitPlane::axial(1, 16.0);
        let general = SplitPlane {
            kind: PlaneKind::NonAxial,
            ..axial
        };
        let p = [3.0, 40.0, -7.0];
        assert_eq!(axial.distance(p), 24.0);
        assert_eq!(general.distance(p), 24.0);
    }

    #[test]
    fn test_aabb_center() {
        let aabb = Aabb::new([0.0, 0.0, 0.0], [32.0, 32.0, 32.0]);
        assert_eq!(aabb.center(), [16.0, 16.0, 16.0]);
        assert_eq!(aabb.half_extents(), [16.0, 16.0, 16.0]);
    }
}
