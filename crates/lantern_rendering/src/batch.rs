//! Index batch accumulator.
//!
//! Collects triangle-list indices of consecutive surfaces that share render
//! state, then submits them as one upload plus one indexed draw. The buffer
//! is allocated once and reused every frame.

use lantern_core::Surface;

use crate::backend::RenderBackend;
use crate::config::DEFAULT_BATCH_INDICES;
use crate::pipeline::RenderStats;

/// Bounded buffer of triangle indices.
///
/// Never holds more than `capacity` indices: appending a surface that would
/// overflow flushes first.
pub struct IndexBatch {
    /// Pending indices.
    indices: Vec<u32>,
    /// Fixed capacity in indices.
    capacity: usize,
}

impl IndexBatch {
    /// Creates a batch holding up to `capacity` indices (at least one
    /// triangle).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(3);
        Self {
            indices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Capacity in indices.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pending index count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Pending indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Drops pending indices without drawing them.
    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Appends the fan triangulation of `surface`, flushing first if it
    /// would not fit.
    ///
    /// A surface larger than the whole batch is split across several draws.
    pub fn push_surface(
        &mut self,
        surface: &Surface,
        backend: &mut dyn RenderBackend,
        stats: &mut RenderStats,
    ) {
        let count = surface.index_count() as usize;
        if count == 0 {
            return;
        }
        if self.indices.len() + count > self.capacity {
            self.flush(backend, stats);
        }
        if count <= self.capacity {
            surface.write_fan_indices(&mut self.indices);
            return;
        }

        tracing::warn!(
            "surface with {} edges exceeds batch capacity {}, splitting",
            surface.num_edges,
            self.capacity
        );
        let first = surface.first_vertex;
        for i in 2..surface.num_edges {
            if self.indices.len() + 3 > self.capacity {
                self.flush(backend, stats);
            }
            self.indices.extend_from_slice(&[first, first + i - 1, first + i]);
        }
    }

    /// Submits pending indices as one draw call. No-op when empty.
    pub fn flush(&mut self, backend: &mut dyn RenderBackend, stats: &mut RenderStats) {
        if self.indices.is_empty() {
            return;
        }
        let count = self.indices.len() as u32;
        let _handle = backend.upload_index_buffer(bytemuck::cast_slice(&self.indices));
        backend.draw_indexed(count);
        stats.draw_calls += 1;
        stats.indices_submitted += count;
        self.indices.clear();
    }
}

impl Default for IndexBatch {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_INDICES)
    }
}
