//! Backend that records commands instead of submitting them.
//!
//! Used by tests, benchmarks and offline tools that inspect what a frame
//! would submit.

use lantern_core::DescriptorSet;

use super::{DescriptorSlot, IndexBufferHandle, PipelineKind, RenderBackend};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    /// `bind_pipeline`.
    BindPipeline(PipelineKind),
    /// `bind_descriptor_set`.
    BindDescriptorSet(DescriptorSlot, DescriptorSet),
    /// `upload_index_buffer`, decoded back to indices.
    UploadIndices(Vec<u32>),
    /// `draw_indexed`.
    DrawIndexed(u32),
    /// `set_blend_alpha`.
    BlendAlpha(f32),
    /// `set_flat_color`.
    FlatColor([f32; 3]),
}

/// Records every call in order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<BackendCommand>,
    next_handle: u64,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[BackendCommand] {
        &self.commands
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Index counts of every draw call, in submission order.
    #[must_use]
    pub fn draw_counts(&self) -> Vec<u32> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                BackendCommand::DrawIndexed(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Index lists of every upload, in submission order.
    #[must_use]
    pub fn uploads(&self) -> Vec<&[u32]> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                BackendCommand::UploadIndices(indices) => Some(indices.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Pipelines bound, in order.
    #[must_use]
    pub fn pipelines(&self) -> Vec<PipelineKind> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                BackendCommand::BindPipeline(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Descriptor sets bound at `slot`, in order.
    #[must_use]
    pub fn descriptors(&self, slot: DescriptorSlot) -> Vec<DescriptorSet> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                BackendCommand::BindDescriptorSet(s, set) if *s == slot => Some(*set),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn bind_pipeline(&mut self, pipeline: PipelineKind) {
        self.commands.push(BackendCommand::BindPipeline(pipeline));
    }

    fn bind_descriptor_set(&mut self, slot: DescriptorSlot, set: DescriptorSet) {
        self.commands.push(BackendCommand::BindDescriptorSet(slot, set));
    }

    fn upload_index_buffer(&mut self, bytes: &[u8]) -> IndexBufferHandle {
        let indices = bytes
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<u32>)
            .collect();
        self.commands.push(BackendCommand::UploadIndices(indices));
        self.next_handle += 1;
        IndexBufferHandle(self.next_handle)
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.commands.push(BackendCommand::DrawIndexed(index_count));
    }

    fn set_blend_alpha(&mut self, alpha: f32) {
        self.commands.push(BackendCommand::BlendAlpha(alpha));
    }

    fn set_flat_color(&mut self, rgb: [f32; 3]) {
        self.commands.push(BackendCommand::FlatColor(rgb));
    }
}
