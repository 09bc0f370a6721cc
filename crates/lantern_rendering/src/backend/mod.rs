//! Graphics backend sink.
//!
//! The pipeline only ever binds pipelines and descriptor sets, uploads
//! index lists and issues indexed draws. Vertex data for every surface is
//! already resident in one shared vertex buffer.

mod recording;

pub use recording::{BackendCommand, RecordingBackend};

use lantern_core::DescriptorSet;

/// Graphics pipelines the world passes select between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Texture times lightmap.
    World,
    /// Texture times lightmap plus fullbright overlay.
    WorldFullbright,
    /// Texture only, no lighting.
    TextureOnly,
    /// Additive fullbright overlay.
    Glow,
    /// Flat vertex colour.
    Flat,
    /// Solid white.
    White,
    /// Lightmap only.
    Lightmap,
    /// Warped, optionally blended liquid.
    Water,
    /// Wireframe overlay.
    ShowTris,
}

/// Descriptor set slots of the world pipeline layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorSlot {
    /// Texture sampler.
    Sampler = 0,
    /// Diffuse (or warp) image.
    Texture = 1,
    /// Lightmap page.
    Lightmap = 2,
    /// Fullbright overlay.
    Fullbright = 3,
}

/// Transient handle to an uploaded index buffer region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndexBufferHandle(pub u64);

/// Command sink the batch emitter draws into.
///
/// Calls are synchronous and never fail from the pipeline's point of view;
/// submission errors belong to the backend.
pub trait RenderBackend {
    /// Binds a graphics pipeline.
    fn bind_pipeline(&mut self, pipeline: PipelineKind);

    /// Binds a descriptor set at `slot`.
    fn bind_descriptor_set(&mut self, slot: DescriptorSlot, set: DescriptorSet);

    /// Copies native-endian `u32` indices into transient storage and binds
    /// them as the current index buffer.
    fn upload_index_buffer(&mut self, bytes: &[u8]) -> IndexBufferHandle;

    /// Draws `index_count` indices from the bound index buffer.
    fn draw_indexed(&mut self, index_count: u32);

    /// Sets the constant blend alpha for following draws. `1.0` is opaque.
    fn set_blend_alpha(&mut self, _alpha: f32) {}

    /// Sets the colour used by the flat pipeline.
    fn set_flat_color(&mut self, _rgb: [f32; 3]) {}
}
