//! Per-frame render state.
//!
//! Everything the pipeline mutates while drawing a frame lives here: the
//! visibility generation counter, per-surface tags and culled flags, the
//! texture chains, the batch accumulator and pending warp requests. It is
//! allocated once per map and reused every frame.

use lantern_core::{LeafId, SurfaceId, VisMask, WorldModel};

use crate::batch::IndexBatch;
use crate::chains::TextureChains;
use crate::culling::Frustum;
use crate::lighting::{LightmapChains, WarpRequests};

use super::RenderStats;

/// Viewer state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    /// Leaf containing the eye.
    pub leaf: LeafId,
    /// World-space eye position.
    pub origin: [f32; 3],
    /// View frustum.
    pub frustum: Frustum,
    /// False when the world must not be drawn this frame.
    pub draw_world: bool,
    /// Texture animation tick.
    pub anim_tick: u32,
}

impl ViewState {
    /// Viewer at `origin` inside `leaf`, with a frustum that culls nothing.
    #[must_use]
    pub fn new(leaf: LeafId, origin: [f32; 3]) -> Self {
        Self {
            leaf,
            origin,
            frustum: Frustum::default(),
            draw_world: true,
            anim_tick: 0,
        }
    }

    /// Replaces the frustum.
    #[must_use]
    pub fn with_frustum(mut self, frustum: Frustum) -> Self {
        self.frustum = frustum;
        self
    }
}

/// Entity being drawn with a set of chains.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntityState {
    /// Animation frame. Non-zero selects alternate texture animations.
    pub frame: u32,
    /// Translucency override. `None` keeps per-surface levels.
    pub alpha: Option<f32>,
    /// Texture animation tick.
    pub anim_tick: u32,
}

impl EntityState {
    /// The static world at `anim_tick`.
    #[must_use]
    pub const fn world(anim_tick: u32) -> Self {
        Self {
            frame: 0,
            alpha: None,
            anim_tick,
        }
    }

    /// Alpha applied to the opaque passes.
    #[must_use]
    pub fn opaque_alpha(&self) -> f32 {
        self.alpha.unwrap_or(1.0)
    }
}

/// Mutable state threaded through every pipeline stage.
pub struct FrameContext {
    /// Current visibility generation. Never decreases.
    pub(crate) vis_frame: u64,
    /// Generation each surface was last marked in.
    pub(crate) surface_vis: Vec<u64>,
    /// Culled flag per surface, valid for chained surfaces.
    pub(crate) culled: Vec<bool>,
    /// Texture chains.
    pub(crate) chains: TextureChains,
    /// Per-lightmap lists built by the refresher.
    pub(crate) lightmap_chains: LightmapChains,
    /// Batch accumulator.
    pub(crate) batch: IndexBatch,
    /// Warp images waiting for a content refresh.
    pub(crate) warp: WarpRequests,
    /// Viewer leaf the chains were last built for.
    pub(crate) old_view_leaf: Option<LeafId>,
    /// Set by external code when geometry or PVS inputs change.
    pub(crate) vis_invalidated: bool,
    /// Visibility mask of the current frame.
    pub(crate) mask: VisMask,
    /// Mask the chains were last built from.
    pub(crate) built_mask: VisMask,
    /// Frame statistics.
    pub(crate) stats: RenderStats,
    /// Texture slots of the world this state was sized for.
    pub(crate) texture_slots: usize,
    /// Leaves of the world this state was sized for.
    pub(crate) leaf_count: usize,
}

impl FrameContext {
    /// State sized for `world`.
    #[must_use]
    pub fn new(world: &WorldModel, batch_capacity: usize) -> Self {
        let surfaces = world.surfaces().len();
        let textures = world.textures().len();
        let leaves = world.leaves().len();
        Self {
            vis_frame: 0,
            surface_vis: vec![0; surfaces],
            culled: vec![false; surfaces],
            chains: TextureChains::new(textures, surfaces),
            lightmap_chains: LightmapChains::default(),
            batch: IndexBatch::new(batch_capacity),
            warp: WarpRequests::new(textures),
            old_view_leaf: None,
            vis_invalidated: true,
            mask: VisMask::empty(leaves),
            built_mask: VisMask::empty(leaves),
            stats: RenderStats::default(),
            texture_slots: textures,
            leaf_count: leaves,
        }
    }

    /// Resets per-frame statistics and queues warp refreshes deferred by
    /// the previous frame.
    pub fn begin_frame(&mut self) {
        self.stats = RenderStats::default();
        self.warp.promote_deferred();
    }

    /// Forces the next marking pass down the slow path.
    pub fn invalidate_visibility(&mut self) {
        self.vis_invalidated = true;
    }

    /// Current visibility generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.vis_frame
    }

    /// True if `surface` was marked in the current generation.
    #[must_use]
    pub fn is_marked(&self, surface: SurfaceId) -> bool {
        self.surface_vis[surface.index()] == self.vis_frame
    }

    /// Culled flag of `surface` from the last cull pass.
    #[must_use]
    pub fn is_culled(&self, surface: SurfaceId) -> bool {
        self.culled[surface.index()]
    }

    /// Overrides the culled flag, for renderers that cull brush models
    /// themselves.
    pub fn set_culled(&mut self, surface: SurfaceId, culled: bool) {
        self.culled[surface.index()] = culled;
    }

    /// Texture chains.
    #[must_use]
    pub fn chains(&self) -> &TextureChains {
        &self.chains
    }

    /// Per-lightmap lists from the last refresh.
    #[must_use]
    pub fn lightmap_chains(&self) -> &LightmapChains {
        &self.lightmap_chains
    }

    /// Pending warp refresh requests.
    #[must_use]
    pub fn warp_requests(&self) -> &WarpRequests {
        &self.warp
    }

    /// Visibility mask of the current frame.
    #[must_use]
    pub fn vis_mask(&self) -> &VisMask {
        &self.mask
    }

    /// Statistics so far this frame.
    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Batch accumulator capacity in indices.
    #[must_use]
    pub const fn batch_capacity(&self) -> usize {
        self.batch.capacity()
    }
}
