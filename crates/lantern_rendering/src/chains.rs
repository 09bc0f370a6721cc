//! Per-texture surface chains.
//!
//! Chains are singly-linked lists threaded through an index array: one
//! head per (texture, chain id) and one "next" link per (surface, chain id).
//! Separate chain ids never share links, so the world chain and a submodel
//! chain can be alive at the same time over the same surfaces.

use lantern_core::{SubModel, SurfaceId, TextureId, WorldModel};

use crate::pipeline::FrameContext;

/// Identifies one logical set of texture chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainId {
    /// Static world surfaces.
    World,
    /// Surfaces of the brush model currently being drawn.
    Model,
}

impl ChainId {
    /// Number of chain ids.
    pub const COUNT: usize = 2;

    #[inline]
    const fn slot(self) -> usize {
        match self {
            Self::World => 0,
            Self::Model => 1,
        }
    }
}

type Links = [Option<SurfaceId>; ChainId::COUNT];

/// Texture chains for every chain id.
#[derive(Debug, Clone)]
pub struct TextureChains {
    /// Chain head per texture slot.
    heads: Vec<Links>,
    /// Next link per surface.
    next: Vec<Links>,
    /// Bumped on every clear, per chain id.
    epoch: [u64; ChainId::COUNT],
    /// Epoch at which each surface was last chained, per chain id.
    member: Vec<[u64; ChainId::COUNT]>,
}

impl TextureChains {
    /// Empty chains sized for a map.
    #[must_use]
    pub fn new(textures: usize, surfaces: usize) -> Self {
        Self {
            heads: vec![[None; ChainId::COUNT]; textures],
            next: vec![[None; ChainId::COUNT]; surfaces],
            epoch: [1; ChainId::COUNT],
            member: vec![[0; ChainId::COUNT]; surfaces],
        }
    }

    /// Empties every texture's chain for `chain`.
    pub fn clear(&mut self, chain: ChainId) {
        let slot = chain.slot();
        for head in &mut self.heads {
            head[slot] = None;
        }
        self.epoch[slot] += 1;
    }

    /// Pushes `surface` onto the front of `texture`'s chain.
    ///
    /// Returns false, leaving the chains untouched, if the surface is
    /// already on a chain for `chain` since the last clear.
    pub fn push(&mut self, chain: ChainId, texture: TextureId, surface: SurfaceId) -> bool {
        let slot = chain.slot();
        let s = surface.index();
        if self.member[s][slot] == self.epoch[slot] {
            tracing::warn!("surface {} chained twice on {:?}", surface.0, chain);
            return false;
        }
        self.member[s][slot] = self.epoch[slot];
        self.next[s][slot] = self.heads[texture.index()][slot];
        self.heads[texture.index()][slot] = Some(surface);
        true
    }

    /// First surface of `texture`'s chain.
    #[must_use]
    pub fn head(&self, chain: ChainId, texture: TextureId) -> Option<SurfaceId> {
        self.heads.get(texture.index()).and_then(|h| h[chain.slot()])
    }

    /// True if `texture` has nothing chained for `chain`.
    #[must_use]
    pub fn is_empty(&self, chain: ChainId, texture: TextureId) -> bool {
        self.head(chain, texture).is_none()
    }

    /// Walks `texture`'s chain from the head.
    #[must_use]
    pub fn iter(&self, chain: ChainId, texture: TextureId) -> ChainIter<'_> {
        ChainIter {
            next: &self.next,
            slot: chain.slot(),
            current: self.head(chain, texture),
        }
    }

    /// Total surfaces chained for `chain`.
    #[must_use]
    pub fn len(&self, chain: ChainId) -> usize {
        (0..self.heads.len())
            .map(|t| self.iter(chain, TextureId(t as u32)).count())
            .sum()
    }

    /// Number of texture slots covered.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.heads.len()
    }
}

/// Iterator over one texture chain.
pub struct ChainIter<'a> {
    next: &'a [Links],
    slot: usize,
    current: Option<SurfaceId>,
}

impl Iterator for ChainIter<'_> {
    type Item = SurfaceId;

    fn next(&mut self) -> Option<SurfaceId> {
        let surface = self.current?;
        self.current = self.next[surface.index()][self.slot];
        Some(surface)
    }
}

/// Rebuilds `chain` from the surfaces tagged with the current generation.
///
/// Walks nodes in array order and each node's surface run in array order,
/// so surfaces stripped from node runs after compilation stay out even if
/// a leaf still lists them. Returns the number of surfaces chained.
pub fn rebuild_world_chains(frame: &mut FrameContext, world: &WorldModel, chain: ChainId) -> usize {
    let generation = frame.vis_frame;
    let chains = &mut frame.chains;
    chains.clear(chain);

    let mut chained = 0;
    for node in world.nodes() {
        for id in node.surfaces() {
            if frame.surface_vis[id.index()] == generation {
                let texture = world.surface(id).texture;
                if chains.push(chain, texture, id) {
                    chained += 1;
                }
            }
        }
    }
    frame.stats.surfaces_chained += chained as u32;
    tracing::debug!("rebuilt {:?} chains: {} surfaces", chain, chained);
    chained
}

/// Clears `chain` and chains every surface of `submodel`.
///
/// Brush models always rebuild; they have no visibility tags.
pub fn rebuild_submodel_chains(
    frame: &mut FrameContext,
    world: &WorldModel,
    submodel: &SubModel,
    chain: ChainId,
) -> usize {
    frame.chains.clear(chain);
    let mut chained = 0;
    for id in submodel.surfaces() {
        if frame.chains.push(chain, world.surface(id).texture, id) {
            chained += 1;
        }
    }
    frame.stats.surfaces_chained += chained as u32;
    chained
}
