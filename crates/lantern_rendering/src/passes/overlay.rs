//! Texture-only, glow, no-texture and wireframe passes.

use lantern_core::SurfaceFlags;

use crate::backend::{DescriptorSlot, PipelineKind};

use super::{ChainRenderer, PassContext};

/// Draws chains of surfaces without a real texture, unlit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextureRenderer;

impl ChainRenderer for NoTextureRenderer {
    fn name(&self) -> &'static str {
        "no-texture"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, data) in ctx.textures() {
            if !ctx.head_flags(texture).contains(SurfaceFlags::NO_TEXTURE) {
                continue;
            }
            ctx.batch_chain(texture, |ctx| {
                ctx.bind_pipeline(PipelineKind::TextureOnly);
                ctx.bind_texture(data.binding);
            });
        }
    }
}

/// Draws every chain except liquids and sky with its texture only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureOnlyRenderer;

impl ChainRenderer for TextureOnlyRenderer {
    fn name(&self) -> &'static str {
        "texture-only"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, _) in ctx.textures() {
            if ctx
                .head_flags(texture)
                .intersects(SurfaceFlags::LIQUID | SurfaceFlags::SKY)
            {
                continue;
            }
            let (_, Some(frame)) = ctx.animated(texture) else {
                continue;
            };
            ctx.batch_chain(texture, |ctx| {
                ctx.bind_pipeline(PipelineKind::TextureOnly);
                ctx.bind_texture(frame.binding);
            });
        }
    }
}

/// Adds the fullbright overlay of textures that have one, unless
/// fullbrights are turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlowRenderer;

impl ChainRenderer for GlowRenderer {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        if !ctx.config.fullbrights {
            return;
        }
        for (texture, _) in ctx.textures() {
            let Some(glow) = ctx.animated(texture).1.and_then(|t| t.fullbright) else {
                continue;
            };
            ctx.batch_chain(texture, |ctx| {
                ctx.bind_pipeline(PipelineKind::Glow);
                ctx.bind_descriptor(DescriptorSlot::Fullbright, glow);
            });
        }
    }
}

/// Wireframe over every visible surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShowTrisRenderer;

impl ChainRenderer for ShowTrisRenderer {
    fn name(&self) -> &'static str {
        "show-tris"
    }

    fn draw(&self, ctx: &mut PassContext<'_>) {
        for (texture, _) in ctx.textures() {
            ctx.batch_chain(texture, |ctx| ctx.bind_pipeline(PipelineKind::ShowTris));
        }
    }
}
