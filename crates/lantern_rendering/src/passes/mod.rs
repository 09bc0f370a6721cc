//! Chain renderers.
//!
//! Each pass is one walk over the texture chains of a chain id with its own
//! flag filter and render state. The draw mode picks which passes draw the
//! opaque world:
//!
//! | Mode         | Passes                  |
//! |--------------|-------------------------|
//! | `normal`     | no-texture, opaque      |
//! | `flat`       | flat                    |
//! | `fullbright` | texture-only, glow      |
//! | `lightmap`   | lightmap, white         |
//!
//! Render state for a texture is bound on its first surviving surface,
//! never for a texture whose chain was culled away entirely.

mod debug;
mod opaque;
mod overlay;
mod water;

pub use debug::{FlatRenderer, LightmapRenderer, WhiteRenderer};
pub use opaque::OpaqueRenderer;
pub use overlay::{GlowRenderer, NoTextureRenderer, ShowTrisRenderer, TextureOnlyRenderer};
pub use water::WaterRenderer;

use lantern_core::{
    DescriptorSet, SurfaceFlags, SurfaceId, Texture, TextureBinding, TextureId, WorldModel,
};

use crate::backend::{DescriptorSlot, PipelineKind, RenderBackend};
use crate::batch::IndexBatch;
use crate::chains::{ChainId, TextureChains};
use crate::config::{DrawMode, RendererConfig};
use crate::lighting::{LightmapCache, LightmapChains, WarpRequests};
use crate::pipeline::{EntityState, RenderStats};

/// One strategy for drawing a set of texture chains.
pub trait ChainRenderer: Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Draws every chain of `ctx.chain` this pass is responsible for.
    fn draw(&self, ctx: &mut PassContext<'_>);
}

static NORMAL: [&dyn ChainRenderer; 2] = [&NoTextureRenderer, &OpaqueRenderer];
static FLAT: [&dyn ChainRenderer; 1] = [&FlatRenderer];
static FULLBRIGHT: [&dyn ChainRenderer; 2] = [&TextureOnlyRenderer, &GlowRenderer];
static LIGHTMAP: [&dyn ChainRenderer; 2] = [&LightmapRenderer, &WhiteRenderer];

/// Passes drawing the opaque world in `mode`, in order.
#[must_use]
pub fn opaque_passes(mode: DrawMode) -> &'static [&'static dyn ChainRenderer] {
    match mode {
        DrawMode::Normal => &NORMAL,
        DrawMode::Flat => &FLAT,
        DrawMode::Fullbright => &FULLBRIGHT,
        DrawMode::Lightmap => &LIGHTMAP,
    }
}

/// Everything a pass reads and writes.
pub struct PassContext<'a> {
    /// Map being drawn.
    pub world: &'a WorldModel,
    /// Chains to walk.
    pub chains: &'a TextureChains,
    /// Chain id to walk.
    pub chain: ChainId,
    /// Culled flag per surface.
    pub culled: &'a [bool],
    /// Surfaces grouped by lightmap page.
    pub lightmap_chains: &'a LightmapChains,
    /// Entity owning the chains.
    pub entity: EntityState,
    /// True when drawing the static world rather than a brush model.
    pub is_world: bool,
    /// Renderer settings.
    pub config: &'a RendererConfig,
    /// Lightmap descriptors, absent for passes that never light.
    pub lightmaps: Option<&'a dyn LightmapCache>,
    /// Command sink.
    pub backend: &'a mut dyn RenderBackend,
    /// Batch accumulator.
    pub batch: &'a mut IndexBatch,
    /// Warp refresh requests.
    pub warp: &'a mut WarpRequests,
    /// Frame statistics.
    pub stats: &'a mut RenderStats,
    current_pipeline: Option<PipelineKind>,
}

impl<'a> PassContext<'a> {
    /// Context for one chain id.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        world: &'a WorldModel,
        chains: &'a TextureChains,
        chain: ChainId,
        culled: &'a [bool],
        lightmap_chains: &'a LightmapChains,
        entity: EntityState,
        is_world: bool,
        config: &'a RendererConfig,
        lightmaps: Option<&'a dyn LightmapCache>,
        backend: &'a mut dyn RenderBackend,
        batch: &'a mut IndexBatch,
        warp: &'a mut WarpRequests,
        stats: &'a mut RenderStats,
    ) -> Self {
        Self {
            world,
            chains,
            chain,
            culled,
            lightmap_chains,
            entity,
            is_world,
            config,
            lightmaps,
            backend,
            batch,
            warp,
            stats,
            current_pipeline: None,
        }
    }

    /// Texture slots that hold a texture and a non-empty chain, in slot
    /// order.
    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &'a Texture)> + 'a {
        let chains = self.chains;
        let chain = self.chain;
        self.world
            .textures()
            .iter()
            .enumerate()
            .filter_map(|(slot, t)| Some((TextureId(slot as u32), t.as_ref()?)))
            .filter(move |(id, _)| !chains.is_empty(chain, *id))
    }

    /// Flags of the first surface on `texture`'s chain.
    #[must_use]
    pub fn head_flags(&self, texture: TextureId) -> SurfaceFlags {
        self.chains
            .head(self.chain, texture)
            .map_or(SurfaceFlags::empty(), |id| self.world.surface(id).flags)
    }

    /// Non-culled surfaces on `texture`'s chain.
    pub fn visible_surfaces(&self, texture: TextureId) -> impl Iterator<Item = SurfaceId> + 'a {
        let chains = self.chains;
        let culled = self.culled;
        chains
            .iter(self.chain, texture)
            .filter(move |id| !culled[id.index()])
    }

    /// Animation frame of `texture` for this entity.
    #[must_use]
    pub fn animated(&self, texture: TextureId) -> (TextureId, Option<&'a Texture>) {
        let frame = self
            .world
            .animated_texture(texture, self.entity.frame, self.entity.anim_tick);
        (frame, self.world.texture(frame))
    }

    /// Binds `pipeline` unless it is already bound.
    pub fn bind_pipeline(&mut self, pipeline: PipelineKind) {
        if self.current_pipeline == Some(pipeline) {
            return;
        }
        self.backend.bind_pipeline(pipeline);
        self.current_pipeline = Some(pipeline);
        self.stats.pipeline_binds += 1;
    }

    /// Binds one descriptor set.
    pub fn bind_descriptor(&mut self, slot: DescriptorSlot, set: DescriptorSet) {
        self.backend.bind_descriptor_set(slot, set);
        self.stats.descriptor_binds += 1;
    }

    /// Binds a texture's sampler and image.
    pub fn bind_texture(&mut self, binding: TextureBinding) {
        self.bind_descriptor(DescriptorSlot::Sampler, binding.sampler);
        self.bind_descriptor(DescriptorSlot::Texture, binding.image);
    }

    /// Binds lightmap page `lightmap`.
    pub fn bind_lightmap(&mut self, lightmap: u32) {
        let set = self
            .lightmaps
            .map_or(DescriptorSet::default(), |cache| cache.descriptor(lightmap));
        self.bind_descriptor(DescriptorSlot::Lightmap, set);
    }

    /// Appends a surface to the batch.
    pub fn batch_surface(&mut self, surface: SurfaceId) {
        self.batch
            .push_surface(self.world.surface(surface), &mut *self.backend, self.stats);
        self.stats.brush_passes += 1;
    }

    /// Submits the pending batch.
    pub fn flush(&mut self) {
        self.batch.flush(&mut *self.backend, self.stats);
    }

    /// Batches every visible surface of `texture` and flushes.
    ///
    /// `bind` runs once, before the first surviving surface. Returns false
    /// if nothing survived, in which case nothing was bound.
    pub fn batch_chain(&mut self, texture: TextureId, bind: impl FnOnce(&mut Self)) -> bool {
        let mut surfaces = self.visible_surfaces(texture).peekable();
        if surfaces.peek().is_none() {
            return false;
        }
        bind(self);
        for id in surfaces {
            self.batch_surface(id);
        }
        self.flush();
        true
    }

    /// Draws one surface on its own.
    pub fn draw_single(&mut self, surface: SurfaceId) {
        self.flush();
        self.batch_surface(surface);
        self.flush();
    }
}
