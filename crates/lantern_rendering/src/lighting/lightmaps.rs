//! Lightmap refresh pre-pass.
//!
//! Runs over the same chains the emitter is about to draw and rebuilds
//! every stale lightmap region first, so no surface is ever drawn with
//! last frame's lighting. Rebuilt pages reach the backend in one upload
//! after the walk.

use lantern_core::{DescriptorSet, Surface, SurfaceFlags, SurfaceId, TextureId, WorldModel};

use crate::chains::ChainId;
use crate::pipeline::FrameContext;

use super::WarpRefresher;

/// Lightmap storage owned by the lighting collaborator.
pub trait LightmapCache {
    /// True if the region of `surface` no longer matches its lighting.
    fn is_stale(&self, surface: SurfaceId) -> bool;

    /// Re-rasterizes the region of `surface` in CPU memory.
    fn rebuild(&mut self, surface: SurfaceId, data: &Surface);

    /// Sends every page touched since the last upload to the GPU.
    fn upload(&mut self);

    /// Descriptor set of lightmap page `lightmap`.
    fn descriptor(&self, lightmap: u32) -> DescriptorSet;
}

/// Dirty-tracking lightmap cache.
///
/// External lighting code calls [`invalidate`](Self::invalidate) when a
/// dynamic light touches a surface.
#[derive(Debug, Clone, Default)]
pub struct DynamicLightmaps {
    stale: Vec<bool>,
    dirty_pages: Vec<u32>,
    descriptors: Vec<DescriptorSet>,
    rebuilt: u64,
    uploads: u64,
    pages_uploaded: u64,
}

impl DynamicLightmaps {
    /// Cache for `surfaces` surfaces, with one descriptor set per page.
    #[must_use]
    pub fn new(surfaces: usize, descriptors: Vec<DescriptorSet>) -> Self {
        Self {
            stale: vec![false; surfaces],
            descriptors,
            ..Self::default()
        }
    }

    /// Marks the region of `surface` stale.
    pub fn invalidate(&mut self, surface: SurfaceId) {
        if let Some(flag) = self.stale.get_mut(surface.index()) {
            *flag = true;
        }
    }

    /// Marks every region stale.
    pub fn invalidate_all(&mut self) {
        self.stale.fill(true);
    }

    /// Regions rebuilt since creation.
    #[must_use]
    pub const fn rebuilt(&self) -> u64 {
        self.rebuilt
    }

    /// Uploads that carried at least one page.
    #[must_use]
    pub const fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Pages sent across all uploads.
    #[must_use]
    pub const fn pages_uploaded(&self) -> u64 {
        self.pages_uploaded
    }

    /// Pages waiting for the next upload.
    #[must_use]
    pub fn dirty_pages(&self) -> &[u32] {
        &self.dirty_pages
    }
}

impl LightmapCache for DynamicLightmaps {
    fn is_stale(&self, surface: SurfaceId) -> bool {
        self.stale.get(surface.index()).copied().unwrap_or(false)
    }

    fn rebuild(&mut self, surface: SurfaceId, data: &Surface) {
        if let Some(flag) = self.stale.get_mut(surface.index()) {
            *flag = false;
        }
        if !self.dirty_pages.contains(&data.lightmap) {
            self.dirty_pages.push(data.lightmap);
        }
        self.rebuilt += 1;
    }

    fn upload(&mut self) {
        if self.dirty_pages.is_empty() {
            return;
        }
        self.uploads += 1;
        self.pages_uploaded += self.dirty_pages.len() as u64;
        self.dirty_pages.clear();
    }

    fn descriptor(&self, lightmap: u32) -> DescriptorSet {
        self.descriptors
            .get(lightmap as usize)
            .copied()
            .unwrap_or_default()
    }
}

/// Visible surfaces grouped by lightmap page.
///
/// Rebuilt by every refresh. Page vectors keep their allocation between
/// frames.
#[derive(Debug, Clone, Default)]
pub struct LightmapChains {
    pages: Vec<Vec<SurfaceId>>,
}

impl LightmapChains {
    /// Empties every page.
    pub fn clear(&mut self) {
        for page in &mut self.pages {
            page.clear();
        }
    }

    /// Appends `surface` to page `lightmap`.
    pub fn push(&mut self, lightmap: u32, surface: SurfaceId) {
        let page = lightmap as usize;
        if page >= self.pages.len() {
            self.pages.resize_with(page + 1, Vec::new);
        }
        self.pages[page].push(surface);
    }

    /// Surfaces on page `lightmap`.
    #[must_use]
    pub fn page(&self, lightmap: u32) -> &[SurfaceId] {
        self.pages
            .get(lightmap as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Non-empty pages in page order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[SurfaceId])> + '_ {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.is_empty())
            .map(|(i, page)| (i as u32, page.as_slice()))
    }

    /// Total surfaces across all pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    /// True if no page holds a surface.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }
}

/// Rebuilds stale lightmaps of every non-culled surface on `chain`, uploads
/// once, then hands pending warp requests to `warps`.
///
/// Tiled surfaces carry no lightmap and are skipped. Returns the number of
/// regions rebuilt.
pub fn refresh_lightmaps(
    frame: &mut FrameContext,
    world: &WorldModel,
    chain: ChainId,
    cache: &mut dyn LightmapCache,
    warps: &mut dyn WarpRefresher,
) -> u32 {
    let FrameContext {
        chains,
        culled,
        lightmap_chains,
        warp,
        stats,
        ..
    } = frame;

    lightmap_chains.clear();
    let mut rebuilt = 0u32;
    for (slot, texture) in world.textures().iter().enumerate() {
        if texture.is_none() {
            continue;
        }
        for id in chains.iter(chain, TextureId(slot as u32)) {
            let surface = world.surface(id);
            if culled[id.index()] || surface.flags.contains(SurfaceFlags::TILED) {
                continue;
            }
            lightmap_chains.push(surface.lightmap, id);
            if cache.is_stale(id) {
                cache.rebuild(id, surface);
                rebuilt += 1;
            }
        }
    }
    cache.upload();

    stats.lightmaps_rebuilt += rebuilt;
    let warped = warp.drain(warps);
    tracing::trace!(
        "refreshed {:?} lightmaps: {} rebuilt, {} warps",
        chain,
        rebuilt,
        warped
    );
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::Aabb;

    fn surface(lightmap: u32) -> Surface {
        Surface {
            bounds: Aabb::default(),
            plane: 0,
            flags: SurfaceFlags::empty(),
            texture: TextureId(0),
            num_edges: 4,
            first_vertex: 0,
            lightmap,
        }
    }

    #[test]
    fn test_dynamic_lightmaps_track_pages() {
        let mut cache = DynamicLightmaps::new(3, vec![DescriptorSet(10), DescriptorSet(11)]);
        cache.invalidate(SurfaceId(0));
        cache.invalidate(SurfaceId(2));
        assert!(cache.is_stale(SurfaceId(0)));
        assert!(!cache.is_stale(SurfaceId(1)));

        cache.rebuild(SurfaceId(0), &surface(1));
        cache.rebuild(SurfaceId(2), &surface(1));
        assert!(!cache.is_stale(SurfaceId(0)));
        assert_eq!(cache.dirty_pages(), &[1]);

        cache.upload();
        cache.upload();
        assert_eq!(cache.uploads(), 1);
        assert_eq!(cache.pages_uploaded(), 1);
        assert_eq!(cache.rebuilt(), 2);
        assert_eq!(cache.descriptor(1), DescriptorSet(11));
        assert_eq!(cache.descriptor(7), DescriptorSet::default());
    }

    #[test]
    fn test_lightmap_chains_reuse_pages() {
        let mut chains = LightmapChains::default();
        chains.push(2, SurfaceId(5));
        chains.push(0, SurfaceId(1));
        chains.push(2, SurfaceId(6));

        let pages: Vec<_> = chains.iter().map(|(p, s)| (p, s.len())).collect();
        assert_eq!(pages, vec![(0, 1), (2, 2)]);
        assert_eq!(chains.page(2), &[SurfaceId(5), SurfaceId(6)]);
        assert_eq!(chains.page(9), &[] as &[SurfaceId]);

        chains.clear();
        assert!(chains.is_empty());
        assert_eq!(chains.len(), 0);
    }
}
