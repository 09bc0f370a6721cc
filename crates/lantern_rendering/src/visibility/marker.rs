//! Surface marking.
//!
//! Tags every surface referenced by a visible leaf with the current
//! visibility generation. A surface is visible this frame iff its tag
//! equals the generation, so nothing is ever cleared.

use lantern_core::{Contents, LeafId, WorldModel};

use crate::pipeline::FrameContext;

use super::{FragmentRegistry, VisSelection};

/// What the marker did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Same leaf and mask as the last build; tags and chains reused.
    Skipped,
    /// Tags rewritten under a new generation.
    Remarked {
        /// Generation the surfaces were tagged with.
        generation: u64,
        /// Surface references tagged, counting repeats.
        surfaces: usize,
    },
}

impl MarkOutcome {
    /// True if the chains must be rebuilt.
    #[must_use]
    pub const fn needs_rebuild(self) -> bool {
        matches!(self, Self::Remarked { .. })
    }
}

/// Marks the surfaces of every leaf set in `frame.mask`.
///
/// Takes the fast path when the viewer leaf and mask match the last build,
/// nothing invalidated visibility and no liquid is adjacent. Fragments of
/// visible leaves are registered on both paths. Sky leaves are not marked
/// unless `old_sky_leaf` is set.
pub fn mark_visible_surfaces(
    frame: &mut FrameContext,
    world: &WorldModel,
    view_leaf: LeafId,
    selection: VisSelection,
    fragments: &mut dyn FragmentRegistry,
    old_sky_leaf: bool,
) -> MarkOutcome {
    let unchanged = frame.old_view_leaf == Some(view_leaf)
        && !frame.vis_invalidated
        && !selection.near_liquid
        && frame.mask == frame.built_mask;

    if unchanged {
        for leaf in frame.mask.iter().map(|i| LeafId(i as u32)) {
            if fragments.has_fragments(leaf) {
                fragments.store_fragments(leaf);
            }
        }
        frame.stats.marking_skipped = true;
        tracing::trace!("leaf {} unchanged, marking skipped", view_leaf.0);
        return MarkOutcome::Skipped;
    }

    frame.vis_frame += 1;
    let generation = frame.vis_frame;
    let FrameContext {
        mask, surface_vis, ..
    } = frame;

    let mut tagged = 0usize;
    for index in mask.iter() {
        let id = LeafId(index as u32);
        let Some(leaf) = world.leaf(id) else { break };
        if old_sky_leaf || leaf.contents != Contents::Sky {
            for surface in &leaf.mark_surfaces {
                surface_vis[surface.index()] = generation;
            }
            tagged += leaf.mark_surfaces.len();
        }
        if fragments.has_fragments(id) {
            fragments.store_fragments(id);
        }
    }

    frame.old_view_leaf = Some(view_leaf);
    frame.vis_invalidated = false;
    frame.built_mask.copy_from(&frame.mask);
    frame.stats.surfaces_marked += tagged as u32;
    tracing::debug!(
        "generation {}: {:?} mask, {} surfaces marked",
        generation,
        selection.source,
        tagged
    );

    MarkOutcome::Remarked {
        generation,
        surfaces: tagged,
    }
}
