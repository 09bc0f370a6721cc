//! The loaded world model.
//!
//! `WorldAsset` is the raw data handed over by the map loader;
//! `WorldModel::new` validates it once and the renderer trusts it from then
//! on.

use crate::bsp::{Child, Contents, Leaf, LeafId, Node, NodeId};
use crate::error::{WorldError, WorldResult};
use crate::geometry::SplitPlane;
use crate::surface::{Surface, SurfaceId};
use crate::texture::{Texture, TextureId};
use crate::vis::{VisData, VisMask};

/// A brush submodel (door, platform, ...): a run of the shared surface array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubModel {
    /// First surface of the run.
    pub first_surface: u32,
    /// Length of the run.
    pub num_surfaces: u32,
}

impl SubModel {
    /// Surfaces of this submodel, in array order.
    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> {
        (self.first_surface..self.first_surface + self.num_surfaces).map(SurfaceId)
    }
}

/// Unvalidated map data as produced by a loader.
#[derive(Debug, Clone, Default)]
pub struct WorldAsset {
    /// Map name.
    pub name: String,
    /// Split planes, shared by nodes and surfaces.
    pub planes: Vec<SplitPlane>,
    /// Texture slots. `None` marks a slot the map file left empty.
    pub textures: Vec<Option<Texture>>,
    /// All surfaces, world and submodels.
    pub surfaces: Vec<Surface>,
    /// Interior nodes. Node 0 is the root; children always have higher ids.
    pub nodes: Vec<Node>,
    /// Leaves.
    pub leaves: Vec<Leaf>,
    /// Precomputed visibility.
    pub vis: VisData,
    /// Brush submodels.
    pub submodels: Vec<SubModel>,
}

/// Validated, read-only world map.
#[derive(Debug, Clone)]
pub struct WorldModel {
    name: String,
    planes: Vec<SplitPlane>,
    textures: Vec<Option<Texture>>,
    surfaces: Vec<Surface>,
    nodes: Vec<Node>,
    leaves: Vec<Leaf>,
    vis: VisData,
    submodels: Vec<SubModel>,
    novis: VisMask,
}

impl WorldModel {
    /// Validates `asset` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns the first dangling index or malformed table found.
    pub fn new(asset: WorldAsset) -> WorldResult<Self> {
        validate(&asset)?;
        let novis = VisMask::all(asset.leaves.len());
        Ok(Self {
            name: asset.name,
            planes: asset.planes,
            textures: asset.textures,
            surfaces: asset.surfaces,
            nodes: asset.nodes,
            leaves: asset.leaves,
            vis: asset.vis,
            submodels: asset.submodels,
            novis,
        })
    }

    /// Map name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split planes.
    #[must_use]
    pub fn planes(&self) -> &[SplitPlane] {
        &self.planes
    }

    /// Texture slots, including empty ones.
    #[must_use]
    pub fn textures(&self) -> &[Option<Texture>] {
        &self.textures
    }

    /// Texture in `id`, if the slot is filled.
    #[must_use]
    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.index()).and_then(Option::as_ref)
    }

    /// All surfaces.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// One surface.
    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.index()]
    }

    /// Plane a surface lies on.
    #[must_use]
    pub fn surface_plane(&self, surface: &Surface) -> &SplitPlane {
        &self.planes[surface.plane as usize]
    }

    /// Interior nodes in array order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Leaves.
    #[must_use]
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// One leaf, if it exists.
    #[must_use]
    pub fn leaf(&self, id: LeafId) -> Option<&Leaf> {
        self.leaves.get(id.index())
    }

    /// Precomputed visibility.
    #[must_use]
    pub fn vis(&self) -> &VisData {
        &self.vis
    }

    /// Brush submodels.
    #[must_use]
    pub fn submodels(&self) -> &[SubModel] {
        &self.submodels
    }

    /// Mask with every leaf visible.
    #[must_use]
    pub fn novis_mask(&self) -> &VisMask {
        &self.novis
    }

    /// PVS row for `leaf`, or the everything-visible mask when the map has
    /// no visibility data.
    #[must_use]
    pub fn leaf_pvs(&self, leaf: LeafId) -> &VisMask {
        self.vis.row(leaf.index()).unwrap_or(&self.novis)
    }

    /// Root of the partition tree.
    #[must_use]
    pub fn root(&self) -> Child {
        if self.nodes.is_empty() {
            Child::Leaf(LeafId(0))
        } else {
            Child::Node(NodeId(0))
        }
    }

    /// Leaf containing `point`.
    #[must_use]
    pub fn leaf_at(&self, point: [f32; 3]) -> LeafId {
        let mut child = self.root();
        loop {
            match child {
                Child::Leaf(leaf) => return leaf,
                Child::Node(id) => {
                    let node = &self.nodes[id.index()];
                    let d = self.planes[node.plane as usize].distance(point);
                    child = if d > 0.0 {
                        node.children[0]
                    } else {
                        node.children[1]
                    };
                }
            }
        }
    }

    /// Merged PVS of every leaf within `radius` of `origin`.
    ///
    /// Conservative: used near liquid surfaces, where the eye can see
    /// through what the point-exact PVS would cull.
    pub fn fat_pvs(&self, origin: [f32; 3], radius: f32, out: &mut VisMask) {
        if out.len() == self.leaves.len() {
            out.clear();
        } else {
            *out = VisMask::empty(self.leaves.len());
        }
        self.add_to_fat_pvs(origin, radius, self.root(), out);
    }

    fn add_to_fat_pvs(&self, origin: [f32; 3], radius: f32, mut child: Child, out: &mut VisMask) {
        loop {
            match child {
                Child::Leaf(leaf) => {
                    if self.leaves[leaf.index()].contents != Contents::Solid {
                        out.union_with(self.leaf_pvs(leaf));
                    }
                    return;
                }
                Child::Node(id) => {
                    let node = &self.nodes[id.index()];
                    let d = self.planes[node.plane as usize].distance(origin);
                    if d > radius {
                        child = node.children[0];
                    } else if d < -radius {
                        child = node.children[1];
                    } else {
                        self.add_to_fat_pvs(origin, radius, node.children[0], out);
                        child = node.children[1];
                    }
                }
            }
        }
    }

    /// Texture actually drawn for `base` this frame.
    ///
    /// Picks the alternate sequence for entities on a non-zero frame, then
    /// the `tick`-th frame of the sequence. Non-animated textures map to
    /// themselves.
    #[must_use]
    pub fn animated_texture(&self, base: TextureId, entity_frame: u32, tick: u32) -> TextureId {
        let Some(anim) = self.texture(base).and_then(|t| t.animation.as_ref()) else {
            return base;
        };
        let sequence = if entity_frame != 0 && !anim.alternate.is_empty() {
            &anim.alternate
        } else {
            &anim.frames
        };
        if sequence.is_empty() {
            return base;
        }
        sequence[tick as usize % sequence.len()]
    }
}

fn validate(asset: &WorldAsset) -> WorldResult<()> {
    let surface_count = asset.surfaces.len();
    let leaf_count = asset.leaves.len();
    if leaf_count == 0 {
        return Err(WorldError::NoLeaves);
    }

    let check_plane = |plane: u32| {
        if (plane as usize) < asset.planes.len() {
            Ok(())
        } else {
            Err(WorldError::PlaneOutOfRange {
                plane,
                count: asset.planes.len(),
            })
        }
    };

    for (i, surface) in asset.surfaces.iter().enumerate() {
        check_plane(surface.plane)?;
        if surface.texture.index() >= asset.textures.len() {
            return Err(WorldError::TextureOutOfRange {
                surface: i as u32,
                texture: surface.texture.0,
                count: asset.textures.len(),
            });
        }
        if surface.first_vertex.checked_add(surface.num_edges).is_none() {
            return Err(WorldError::VertexRangeOverflow {
                surface: i as u32,
                first: surface.first_vertex,
                edges: surface.num_edges,
            });
        }
    }

    for (i, node) in asset.nodes.iter().enumerate() {
        check_plane(node.plane)?;
        let end = u64::from(node.first_surface) + u64::from(node.num_surfaces);
        if end > surface_count as u64 {
            return Err(WorldError::NodeSurfacesOutOfRange {
                node: i as u32,
                first: node.first_surface,
                end,
                count: surface_count,
            });
        }
        for child in node.children {
            let ok = match child {
                Child::Node(c) => c.index() > i && c.index() < asset.nodes.len(),
                Child::Leaf(l) => l.index() < leaf_count,
            };
            if !ok {
                return Err(WorldError::ChildOutOfRange { node: i as u32 });
            }
        }
    }

    for (i, leaf) in asset.leaves.iter().enumerate() {
        if let Some(bad) = leaf.mark_surfaces.iter().find(|s| s.index() >= surface_count) {
            return Err(WorldError::LeafSurfaceOutOfRange {
                leaf: i as u32,
                surface: bad.0,
                count: surface_count,
            });
        }
    }

    if !asset.vis.is_none() {
        if asset.vis.rows().len() != leaf_count {
            return Err(WorldError::VisRowCount {
                rows: asset.vis.rows().len(),
                leaves: leaf_count,
            });
        }
        for (i, row) in asset.vis.rows().iter().enumerate() {
            if row.len() < leaf_count {
                return Err(WorldError::VisRowTooShort {
                    leaf: i as u32,
                    bits: row.len(),
                    leaves: leaf_count,
                });
            }
        }
    }

    for (i, texture) in asset.textures.iter().enumerate() {
        let Some(anim) = texture.as_ref().and_then(|t| t.animation.as_ref()) else {
            continue;
        };
        let filled = |id: &TextureId| asset.textures.get(id.index()).is_some_and(Option::is_some);
        if let Some(bad) = anim.frames.iter().chain(&anim.alternate).find(|id| !filled(id)) {
            return Err(WorldError::AnimationOutOfRange {
                texture: i as u32,
                frame: bad.0,
            });
        }
    }

    for (i, sub) in asset.submodels.iter().enumerate() {
        if u64::from(sub.first_surface) + u64::from(sub.num_surfaces) > surface_count as u64 {
            return Err(WorldError::SubModelOutOfRange { submodel: i as u32 });
        }
    }

    Ok(())
}
