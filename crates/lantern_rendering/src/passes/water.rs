//! Liquid pass.

use lantern_core::SurfaceFlags;

use crate::backend::PipelineKind;

use super::{ChainRenderer, PassContext};

/// Draws liquid chains with their warp image, one draw per surface.
///
/// Blending order matters for translucent liquids, so surfaces are never
/// batched. Brush models defer a warp refresh of every liquid texture they
/// draw to the next frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterRenderer;

impl ChainRenderer for WaterRenderer {
    fn name(&self) -> &'static str {
        "water"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, data) in ctx.textures() {
            if !ctx.head_flags(texture).contains(SurfaceFlags::LIQUID) {
                continue;
            }

            let mut alpha = None;
            for id in ctx.visible_surfaces(texture) {
                if alpha.is_none() {
                    let flags = ctx.world.surface(id).flags;
                    let level = ctx
                        .entity
                        .alpha
                        .unwrap_or_else(|| ctx.config.liquid.for_flags(flags));
                    if level < 1.0 {
                        ctx.backend.set_blend_alpha(level);
                    }
                    ctx.bind_pipeline(PipelineKind::Water);
                    ctx.bind_texture(data.warp.unwrap_or(data.binding));
                    if !ctx.is_world {
                        ctx.warp.defer(texture);
                    }
                    alpha = Some(level);
                }
                ctx.draw_single(id);
            }

            if alpha.is_some_and(|level| level < 1.0) {
                ctx.backend.set_blend_alpha(1.0);
            }
        }
    }
}
