//! Per-frame choice of visibility mask.

use lantern_core::{Contents, LeafId, SurfaceFlags, VisMask, WorldModel};

use crate::config::RendererConfig;

/// Where this frame's visibility mask came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisSource {
    /// Everything visible: culling disabled, or the eye is inside solid or
    /// sky.
    NoVis,
    /// Merged PVS around the eye, used next to liquid surfaces.
    FatPvs,
    /// Precomputed PVS of the viewer leaf.
    LeafPvs,
}

/// Result of [`compute_visibility_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisSelection {
    /// Mask source.
    pub source: VisSource,
    /// The viewer leaf references a liquid surface. Disables the marker's
    /// fast path even when the mask itself came from `NoVis`.
    pub near_liquid: bool,
}

/// True if any surface listed by `leaf` is a liquid.
#[must_use]
pub fn leaf_near_liquid(world: &WorldModel, leaf: LeafId) -> bool {
    world.leaf(leaf).is_some_and(|l| {
        l.mark_surfaces
            .iter()
            .any(|&id| world.surface(id).flags.contains(SurfaceFlags::LIQUID))
    })
}

/// Writes the visibility mask for a viewer in `view_leaf` at `origin` into
/// `out`.
///
/// Priority: culling disabled or a solid/sky viewer leaf sees everything;
/// a viewer leaf touching any liquid surface gets the fat PVS; otherwise the
/// leaf's own PVS. Depends on nothing but the map and the arguments.
pub fn compute_visibility_mask(
    world: &WorldModel,
    view_leaf: LeafId,
    origin: [f32; 3],
    config: &RendererConfig,
    out: &mut VisMask,
) -> VisSelection {
    let near_liquid = leaf_near_liquid(world, view_leaf);
    let contents = world.leaf(view_leaf).map_or(Contents::Solid, |l| l.contents);

    let source = if config.novis || matches!(contents, Contents::Solid | Contents::Sky) {
        out.copy_from(world.novis_mask());
        VisSource::NoVis
    } else if near_liquid {
        world.fat_pvs(origin, config.fat_pvs_radius, out);
        VisSource::FatPvs
    } else {
        out.copy_from(world.leaf_pvs(view_leaf));
        VisSource::LeafPvs
    };

    VisSelection {
        source,
        near_liquid,
    }
}
