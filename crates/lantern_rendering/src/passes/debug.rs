//! Debug views: flat colours, lightmaps only, white tiled surfaces.

use lantern_core::{SurfaceFlags, SurfaceId};

use crate::backend::PipelineKind;

use super::{ChainRenderer, PassContext};

/// Stable pseudo-random colour for a surface.
#[must_use]
pub fn flat_color(surface: SurfaceId) -> [f32; 3] {
    let hash = surface.0.wrapping_add(1).wrapping_mul(0x9E37_79B9);
    let channel = |shift: u32| f32::from((hash >> shift) as u8) / 255.0;
    [channel(8), channel(16), channel(24)]
}

/// Draws every visible surface in its own flat colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRenderer;

impl ChainRenderer for FlatRenderer {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, _) in ctx.textures() {
            for id in ctx.visible_surfaces(texture) {
                ctx.bind_pipeline(PipelineKind::Flat);
                ctx.backend.set_flat_color(flat_color(id));
                ctx.draw_single(id);
            }
        }
    }
}

/// Draws tiled chains (sky and liquids) in solid white.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteRenderer;

impl ChainRenderer for WhiteRenderer {
    fn name(&self) -> &'static str {
        "white"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, _) in ctx.textures() {
            if !ctx.head_flags(texture).contains(SurfaceFlags::TILED) {
                continue;
            }
            ctx.batch_chain(texture, |ctx| ctx.bind_pipeline(PipelineKind::White));
        }
    }
}

/// Draws the per-page lists built by the last lightmap refresh, lightmap
/// only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightmapRenderer;

impl ChainRenderer for LightmapRenderer {
    fn name(&self) -> &'static str {
        "lightmap"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        let pages = ctx.lightmap_chains;
        for (page, surfaces) in pages.iter() {
            ctx.bind_pipeline(PipelineKind::Lightmap);
            ctx.bind_lightmap(page);
            for &id in surfaces {
                ctx.batch_surface(id);
            }
            ctx.flush();
        }
    }
}
