//! Main textured and lightmapped pass.

use lantern_core::SurfaceFlags;

use crate::backend::{DescriptorSlot, PipelineKind};

use super::{ChainRenderer, PassContext};

/// Draws every chain except tiled and untextured ones, textured and
/// lightmapped.
///
/// Consecutive surfaces of a texture share one draw until the lightmap page
/// changes or the batch fills up.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueRenderer;

impl ChainRenderer for OpaqueRenderer {
    fn name(&self) -> &'static str {
        "opaque"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, _) in ctx.textures() {
            if ctx
                .head_flags(texture)
                .intersects(SurfaceFlags::TILED | SurfaceFlags::NO_TEXTURE)
            {
                continue;
            }
            let (_, Some(frame)) = ctx.animated(texture) else {
                continue;
            };
            let fullbright = frame.fullbright.filter(|_| ctx.config.fullbrights);

            let mut bound = false;
            let mut last_lightmap = 0;
            for id in ctx.visible_surfaces(texture) {
                let lightmap = ctx.world.surface(id).lightmap;
                if !bound {
                    if let Some(set) = fullbright {
                        ctx.bind_pipeline(PipelineKind::WorldFullbright);
                        ctx.bind_descriptor(DescriptorSlot::Fullbright, set);
                    } else {
                        ctx.bind_pipeline(PipelineKind::World);
                    }
                    ctx.bind_texture(frame.binding);
                    ctx.bind_lightmap(lightmap);
                    bound = true;
                } else if lightmap != last_lightmap {
                    ctx.flush();
                    ctx.bind_lightmap(lightmap);
                }
                last_lightmap = lightmap;
                ctx.batch_surface(id);
            }
            ctx.flush();
        }
    }
}
