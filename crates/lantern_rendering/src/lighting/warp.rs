//! Warp image refresh requests.
//!
//! The culler and the water pass only raise flags; the refresher drains
//! them at a fixed point of the frame. Requests raised while drawing a
//! brush model are deferred to the next frame's refresh.

use lantern_core::TextureId;

/// Regenerates the warped image of a liquid texture.
pub trait WarpRefresher {
    /// Refreshes the warp image of `texture`. Called at most once per
    /// texture per drain.
    fn refresh_warp(&mut self, texture: TextureId);
}

/// Refresher that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWarp;

impl WarpRefresher for NoWarp {
    fn refresh_warp(&mut self, _texture: TextureId) {}
}

/// Pending warp refreshes, one flag per texture slot.
#[derive(Debug, Clone, Default)]
pub struct WarpRequests {
    current: Vec<bool>,
    deferred: Vec<bool>,
}

impl WarpRequests {
    /// No requests, sized for `textures` slots.
    #[must_use]
    pub fn new(textures: usize) -> Self {
        Self {
            current: vec![false; textures],
            deferred: vec![false; textures],
        }
    }

    /// Requests a refresh at the next drain.
    pub fn request(&mut self, texture: TextureId) {
        if let Some(flag) = self.current.get_mut(texture.index()) {
            *flag = true;
        }
    }

    /// Requests a refresh at the drain after next.
    pub fn defer(&mut self, texture: TextureId) {
        if let Some(flag) = self.deferred.get_mut(texture.index()) {
            *flag = true;
        }
    }

    /// Moves deferred requests into the current set.
    pub fn promote_deferred(&mut self) {
        for (current, deferred) in self.current.iter_mut().zip(&mut self.deferred) {
            *current |= std::mem::take(deferred);
        }
    }

    /// Hands every current request to `refresher` and clears it. Returns
    /// the number of textures refreshed.
    pub fn drain(&mut self, refresher: &mut dyn WarpRefresher) -> usize {
        let mut refreshed = 0;
        for (slot, flag) in self.current.iter_mut().enumerate() {
            if std::mem::take(flag) {
                refresher.refresh_warp(TextureId(slot as u32));
                refreshed += 1;
            }
        }
        refreshed
    }

    /// True if `texture` will refresh at the next drain.
    #[must_use]
    pub fn is_requested(&self, texture: TextureId) -> bool {
        self.current.get(texture.index()).copied().unwrap_or(false)
    }

    /// True if `texture` is waiting for the drain after next.
    #[must_use]
    pub fn is_deferred(&self, texture: TextureId) -> bool {
        self.deferred.get(texture.index()).copied().unwrap_or(false)
    }
}
