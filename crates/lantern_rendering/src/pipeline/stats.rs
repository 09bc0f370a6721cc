//! World rendering statistics.

/// Statistics from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Surfaces that survived culling.
    pub brush_polys: u32,
    /// Surface draws across all passes.
    pub brush_passes: u32,
    /// Indexed draw calls submitted.
    pub draw_calls: u32,
    /// Indices submitted across all draw calls.
    pub indices_submitted: u32,
    /// Pipeline binds.
    pub pipeline_binds: u32,
    /// Descriptor set binds.
    pub descriptor_binds: u32,
    /// Lightmap regions rebuilt before drawing.
    pub lightmaps_rebuilt: u32,
    /// Surfaces tagged by the marker this frame.
    pub surfaces_marked: u32,
    /// Surfaces threaded onto chains this frame.
    pub surfaces_chained: u32,
    /// True if the marker reused last frame's chains.
    pub marking_skipped: bool,
}

impl RenderStats {
    /// Average indices per draw call.
    #[must_use]
    pub fn indices_per_draw(&self) -> f32 {
        if self.draw_calls > 0 {
            self.indices_submitted as f32 / self.draw_calls as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_per_draw() {
        assert!(RenderStats::default().indices_per_draw().abs() < f32::EPSILON);
        let stats = RenderStats {
            draw_calls: 2,
            indices_submitted: 45,
            ..RenderStats::default()
        };
        assert!((stats.indices_per_draw() - 22.5).abs() < f32::EPSILON);
    }
}
