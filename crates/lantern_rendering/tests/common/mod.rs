//! Small hand-built maps for the integration tests.
//!
//! Every surface lies on the plane x = 0 facing +x, so a viewer at
//! `VIEW_ORIGIN` sees the front of everything unless a surface is flagged
//! `PLANE_BACK`.

#![allow(dead_code)]

use lantern_core::{
    Aabb, Child, Contents, DescriptorSet, Leaf, LeafId, Node, NodeId, SplitPlane, SubModel,
    Surface, SurfaceFlags, SurfaceId, Texture, TextureBinding, TextureId, VisData, VisMask,
    WorldAsset, WorldModel,
};
use lantern_rendering::{DynamicLightmaps, ViewState};

/// Eye position used by most tests.
pub const VIEW_ORIGIN: [f32; 3] = [64.0, 0.0, 0.0];

/// Sampler descriptor shared by every fixture texture.
pub const SAMPLER: DescriptorSet = DescriptorSet(1);

/// Image descriptor of texture slot `slot`.
pub fn image(slot: u32) -> DescriptorSet {
    DescriptorSet(10 + u64::from(slot))
}

/// Descriptor of lightmap page `page`.
pub fn lightmap_set(page: u32) -> DescriptorSet {
    DescriptorSet(100 + u64::from(page))
}

/// Plain texture for slot `slot`.
pub fn texture(slot: u32) -> Texture {
    Texture::new(
        format!("tex{slot}"),
        TextureBinding {
            sampler: SAMPLER,
            image: image(slot),
        },
    )
}

/// Map under construction.
pub struct TestMap {
    pub textures: Vec<Option<Texture>>,
    pub surfaces: Vec<Surface>,
    pub leaves: Vec<Leaf>,
    pub vis: Option<Vec<Vec<usize>>>,
    pub world_surfaces: Option<u32>,
    pub submodels: Vec<SubModel>,
    next_vertex: u32,
}

impl TestMap {
    /// Map with `textures` plain texture slots.
    pub fn new(textures: u32) -> Self {
        Self {
            textures: (0..textures).map(|i| Some(texture(i))).collect(),
            surfaces: Vec::new(),
            leaves: Vec::new(),
            vis: None,
            world_surfaces: None,
            submodels: Vec::new(),
            next_vertex: 0,
        }
    }

    /// Adds a front-facing surface.
    pub fn surface(&mut self, texture: u32, num_edges: u32, lightmap: u32) -> SurfaceId {
        self.surface_with(texture, num_edges, lightmap, SurfaceFlags::empty())
    }

    /// Adds a surface with `flags`.
    pub fn surface_with(
        &mut self,
        texture: u32,
        num_edges: u32,
        lightmap: u32,
        flags: SurfaceFlags,
    ) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len() as u32);
        self.surfaces.push(Surface {
            bounds: Aabb::new([0.0, -16.0, -16.0], [0.0, 16.0, 16.0]),
            plane: 0,
            flags,
            texture: TextureId(texture),
            num_edges,
            first_vertex: self.next_vertex,
            lightmap,
        });
        self.next_vertex += num_edges;
        id
    }

    /// Adds a leaf listing `surfaces`.
    pub fn leaf(&mut self, contents: Contents, surfaces: &[SurfaceId]) -> LeafId {
        let id = LeafId(self.leaves.len() as u32);
        self.leaves.push(Leaf::new(contents, surfaces.to_vec()));
        id
    }

    /// Validates and builds the map.
    ///
    /// Node `i` splits on x = 0 with leaf `i` in front; node 0 owns the
    /// world surface run.
    pub fn build(self) -> WorldModel {
        let leaf_count = self.leaves.len();
        let run = self
            .world_surfaces
            .unwrap_or(self.surfaces.len() as u32);

        let nodes = (0..leaf_count)
            .map(|i| {
                let back = if i + 1 < leaf_count {
                    Child::Node(NodeId(i as u32 + 1))
                } else {
                    Child::Leaf(LeafId(i as u32))
                };
                Node {
                    plane: 0,
                    children: [Child::Leaf(LeafId(i as u32)), back],
                    first_surface: 0,
                    num_surfaces: if i == 0 { run } else { 0 },
                }
            })
            .collect();

        let vis = match self.vis {
            Some(rows) => VisData::new(
                rows.iter()
                    .map(|row| {
                        let mut mask = VisMask::empty(leaf_count);
                        for &leaf in row {
                            mask.insert(leaf);
                        }
                        mask
                    })
                    .collect(),
            ),
            None => VisData::none(),
        };

        WorldModel::new(WorldAsset {
            name: "fixture".into(),
            planes: vec![SplitPlane::axial(0, 0.0)],
            textures: self.textures,
            surfaces: self.surfaces,
            nodes,
            leaves: self.leaves,
            vis,
            submodels: self.submodels,
        })
        .expect("fixture map is valid")
    }
}

/// Viewer in `leaf` at `VIEW_ORIGIN`.
pub fn view(leaf: u32) -> ViewState {
    ViewState::new(LeafId(leaf), VIEW_ORIGIN)
}

/// Clean lightmap cache with four pages.
pub fn lightmaps(world: &WorldModel) -> DynamicLightmaps {
    DynamicLightmaps::new(
        world.surfaces().len(),
        (0..4).map(lightmap_set).collect(),
    )
}
