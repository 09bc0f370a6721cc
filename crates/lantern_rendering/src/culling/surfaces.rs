//! Per-surface frustum and back-face culling.

use lantern_core::{SplitPlane, SurfaceFlags, TextureId, WorldModel};

use crate::chains::ChainId;
use crate::pipeline::{FrameContext, ViewState};

/// True if a surface on `plane` faces away from `origin`.
///
/// The surface is back-facing when the viewer's signed distance to the
/// plane is negative, inverted for surfaces flagged `PLANE_BACK`.
#[inline]
#[must_use]
pub fn back_face_cull(origin: [f32; 3], plane: &SplitPlane, flags: SurfaceFlags) -> bool {
    (plane.distance(origin) < 0.0) ^ flags.contains(SurfaceFlags::PLANE_BACK)
}

/// Sets the culled flag of every surface on `chain`.
///
/// No-op when the world may not be drawn this frame. Survivors bump
/// `brush_polys` and request a warp refresh for their texture.
pub fn cull_chained_surfaces(
    frame: &mut FrameContext,
    world: &WorldModel,
    view: &ViewState,
    chain: ChainId,
) {
    if !view.draw_world {
        return;
    }

    let FrameContext {
        chains,
        culled,
        warp,
        stats,
        ..
    } = frame;

    let mut survivors = 0u32;
    let mut rejected = 0u32;
    for (slot, texture) in world.textures().iter().enumerate() {
        let Some(texture) = texture else { continue };
        let id = TextureId(slot as u32);
        for surface_id in chains.iter(chain, id) {
            let surface = world.surface(surface_id);
            let hidden = view.frustum.cull_box(&surface.bounds)
                || back_face_cull(view.origin, world.surface_plane(surface), surface.flags);
            culled[surface_id.index()] = hidden;
            if hidden {
                rejected += 1;
                continue;
            }
            survivors += 1;
            if texture.warp.is_some() {
                warp.request(id);
            }
        }
    }

    stats.brush_polys += survivors;
    tracing::trace!(
        "culled {:?} chains: {} visible, {} rejected",
        chain,
        survivors,
        rejected
    );
}
