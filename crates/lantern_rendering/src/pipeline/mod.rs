//! World render pipeline orchestration.
//!
//! Runs the stages in their fixed order: visibility mask, surface marking,
//! chain build, culling, lightmap refresh, then the chain renderers.

mod frame;
mod stats;

pub use frame::{EntityState, FrameContext, ViewState};
pub use stats::RenderStats;

use lantern_core::WorldModel;

use crate::backend::RenderBackend;
use crate::chains::{rebuild_submodel_chains, rebuild_world_chains, ChainId};
use crate::config::RendererConfig;
use crate::culling::cull_chained_surfaces;
use crate::error::{RenderError, RenderResult};
use crate::lighting::{refresh_lightmaps, LightmapCache, WarpRefresher};
use crate::passes::{opaque_passes, ChainRenderer, PassContext, ShowTrisRenderer, WaterRenderer};
use crate::visibility::{compute_visibility_mask, mark_visible_surfaces, FragmentRegistry, MarkOutcome};

/// Static world renderer.
///
/// Owns the configuration and the per-frame state. The map and every
/// collaborator are borrowed per call.
pub struct WorldRenderer {
    /// Renderer settings.
    config: RendererConfig,

    /// Frame state, sized for the loaded world.
    frame: FrameContext,
}

impl WorldRenderer {
    /// Creates a renderer for `world`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation.
    pub fn new(config: RendererConfig, world: &WorldModel) -> RenderResult<Self> {
        config.validate()?;
        let frame = FrameContext::new(world, config.max_batch_indices);
        tracing::debug!(
            "world renderer for '{}': {} surfaces, {} leaves",
            world.name(),
            world.surfaces().len(),
            world.leaves().len()
        );
        Ok(Self { config, frame })
    }

    /// Resizes the frame state for a newly loaded world.
    pub fn load_world(&mut self, world: &WorldModel) {
        self.frame = FrameContext::new(world, self.config.max_batch_indices);
    }

    /// Renderer settings.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Frame state.
    #[must_use]
    pub fn frame(&self) -> &FrameContext {
        &self.frame
    }

    /// Mutable frame state.
    pub fn frame_mut(&mut self) -> &mut FrameContext {
        &mut self.frame
    }

    /// Statistics so far this frame.
    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.frame.stats()
    }

    /// Starts a new frame.
    pub fn begin_frame(&mut self) {
        self.frame.begin_frame();
    }

    /// Forces the next `mark_surfaces` down the slow path.
    pub fn invalidate_visibility(&mut self) {
        self.frame.invalidate_visibility();
    }

    /// Computes the visibility mask for `view`, marks the visible surfaces
    /// and rebuilds the world chains when anything changed.
    ///
    /// # Errors
    ///
    /// Returns `ViewLeafOutOfRange` if the viewer leaf is not in `world`,
    /// or `WorldMismatch` if the renderer was sized for another world.
    pub fn mark_surfaces(
        &mut self,
        world: &WorldModel,
        view: &ViewState,
        fragments: &mut dyn FragmentRegistry,
    ) -> RenderResult<MarkOutcome> {
        self.check_world(world)?;
        let leaves = world.leaves().len();
        if view.leaf.index() >= leaves {
            return Err(RenderError::ViewLeafOutOfRange {
                leaf: view.leaf.0,
                count: leaves,
            });
        }

        let selection = compute_visibility_mask(
            world,
            view.leaf,
            view.origin,
            &self.config,
            &mut self.frame.mask,
        );
        let outcome = mark_visible_surfaces(
            &mut self.frame,
            world,
            view.leaf,
            selection,
            fragments,
            self.config.old_sky_leaf,
        );
        if outcome.needs_rebuild() {
            rebuild_world_chains(&mut self.frame, world, ChainId::World);
        }
        Ok(outcome)
    }

    /// Culls the world chains against `view`.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    pub fn cull_surfaces(&mut self, world: &WorldModel, view: &ViewState) -> RenderResult<()> {
        self.cull_chain(world, view, ChainId::World)
    }

    /// Culls an arbitrary chain against `view`.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    pub fn cull_chain(
        &mut self,
        world: &WorldModel,
        view: &ViewState,
        chain: ChainId,
    ) -> RenderResult<()> {
        self.check_world(world)?;
        cull_chained_surfaces(&mut self.frame, world, view, chain);
        Ok(())
    }

    /// Refreshes lightmaps, then draws the opaque world with the passes of
    /// the configured draw mode.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    pub fn draw_world(
        &mut self,
        world: &WorldModel,
        view: &ViewState,
        backend: &mut dyn RenderBackend,
        lightmaps: &mut dyn LightmapCache,
        warps: &mut dyn WarpRefresher,
    ) -> RenderResult<()> {
        if !view.draw_world {
            return Ok(());
        }
        let entity = EntityState::world(view.anim_tick);
        self.draw_texture_chains(world, entity, ChainId::World, true, backend, lightmaps, warps)
    }

    /// Draws the world's liquid surfaces.
    ///
    /// Skipped in the flat and lightmap debug views.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    pub fn draw_world_water(
        &mut self,
        world: &WorldModel,
        view: &ViewState,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<()> {
        if !view.draw_world {
            return Ok(());
        }
        let entity = EntityState::world(view.anim_tick);
        self.draw_water_chains(world, entity, ChainId::World, true, backend)
    }

    /// Draws the wireframe overlay of the world when `show_tris` is on.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    pub fn draw_world_show_tris(
        &mut self,
        world: &WorldModel,
        view: &ViewState,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<()> {
        if !view.draw_world || !self.config.show_tris {
            return Ok(());
        }
        self.check_world(world)?;
        let entity = EntityState::world(view.anim_tick);
        self.run_passes(world, entity, ChainId::World, true, backend, None, &[&ShowTrisRenderer]);
        Ok(())
    }

    /// Empties `chain` for a caller about to rebuild it.
    pub fn clear_texture_chains(&mut self, chain: ChainId) {
        self.frame.chains.clear(chain);
        self.frame.lightmap_chains.clear();
    }

    /// Chains every surface of submodel `index` onto `chain`.
    ///
    /// # Errors
    ///
    /// Returns `SubModelOutOfRange` if `world` has no such submodel, or
    /// `WorldMismatch` if the renderer was sized for another world.
    pub fn rebuild_submodel_chains(
        &mut self,
        world: &WorldModel,
        index: usize,
        chain: ChainId,
    ) -> RenderResult<usize> {
        self.check_world(world)?;
        let submodel = world
            .submodels()
            .get(index)
            .ok_or(RenderError::SubModelOutOfRange {
                index,
                count: world.submodels().len(),
            })?;
        Ok(rebuild_submodel_chains(&mut self.frame, world, submodel, chain))
    }

    /// Refreshes lightmaps of `chain`, then draws it opaque for `entity`.
    ///
    /// An entity alpha below one wraps the passes in a blend alpha.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_texture_chains(
        &mut self,
        world: &WorldModel,
        entity: EntityState,
        chain: ChainId,
        is_world: bool,
        backend: &mut dyn RenderBackend,
        lightmaps: &mut dyn LightmapCache,
        warps: &mut dyn WarpRefresher,
    ) -> RenderResult<()> {
        self.check_world(world)?;
        refresh_lightmaps(&mut self.frame, world, chain, lightmaps, warps);

        let alpha = entity.opaque_alpha();
        let blended = alpha < 1.0;
        if blended {
            backend.set_blend_alpha(alpha);
        }
        let passes = opaque_passes(self.config.draw_mode);
        self.run_passes(world, entity, chain, is_world, backend, Some(&*lightmaps), passes);
        if blended {
            backend.set_blend_alpha(1.0);
        }
        Ok(())
    }

    /// Draws the liquid surfaces of `chain` for `entity`.
    ///
    /// # Errors
    ///
    /// Returns `WorldMismatch` if the renderer was sized for another world.
    pub fn draw_water_chains(
        &mut self,
        world: &WorldModel,
        entity: EntityState,
        chain: ChainId,
        is_world: bool,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<()> {
        if !self.config.draw_mode.draws_liquids() {
            return Ok(());
        }
        self.check_world(world)?;
        self.run_passes(world, entity, chain, is_world, backend, None, &[&WaterRenderer]);
        Ok(())
    }

    /// Runs the whole pipeline for one frame of the static world and
    /// returns its statistics.
    ///
    /// # Errors
    ///
    /// As [`mark_surfaces`](Self::mark_surfaces), checked before anything is
    /// drawn.
    pub fn render_frame(
        &mut self,
        world: &WorldModel,
        view: &ViewState,
        fragments: &mut dyn FragmentRegistry,
        backend: &mut dyn RenderBackend,
        lightmaps: &mut dyn LightmapCache,
        warps: &mut dyn WarpRefresher,
    ) -> RenderResult<RenderStats> {
        self.begin_frame();
        self.mark_surfaces(world, view, fragments)?;
        self.cull_surfaces(world, view)?;
        self.draw_world(world, view, backend, lightmaps, warps)?;
        self.draw_world_water(world, view, backend)?;
        self.draw_world_show_tris(world, view, backend)?;

        let stats = self.frame.stats();
        tracing::debug!(
            "frame: {} polys, {} draws, {:.1} indices/draw",
            stats.brush_polys,
            stats.draw_calls,
            stats.indices_per_draw()
        );
        Ok(stats)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_passes(
        &mut self,
        world: &WorldModel,
        entity: EntityState,
        chain: ChainId,
        is_world: bool,
        backend: &mut dyn RenderBackend,
        lightmaps: Option<&dyn LightmapCache>,
        passes: &[&dyn ChainRenderer],
    ) {
        let FrameContext {
            chains,
            culled,
            lightmap_chains,
            batch,
            warp,
            stats,
            ..
        } = &mut self.frame;

        let mut ctx = PassContext::new(
            world,
            chains,
            chain,
            culled,
            lightmap_chains,
            entity,
            is_world,
            &self.config,
            lightmaps,
            backend,
            batch,
            warp,
            stats,
        );
        for pass in passes {
            tracing::trace!("{} pass over {:?} chains", pass.name(), chain);
            pass.draw(&mut ctx);
        }
    }

    fn check_world(&self, world: &WorldModel) -> RenderResult<()> {
        let tables = [
            ("surfaces", world.surfaces().len(), self.frame.surface_vis.len()),
            ("textures", world.textures().len(), self.frame.texture_slots),
            ("leaves", world.leaves().len(), self.frame.leaf_count),
        ];
        for (table, found, expected) in tables {
            if found != expected {
                return Err(RenderError::WorldMismatch {
                    table,
                    found,
                    expected,
                });
            }
        }
        Ok(())
    }
}
