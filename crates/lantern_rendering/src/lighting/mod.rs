//! Lighting collaborators and the lightmap refresh pre-pass.

mod lightmaps;
mod warp;

pub use lightmaps::{refresh_lightmaps, DynamicLightmaps, LightmapCache, LightmapChains};
pub use warp::{NoWarp, WarpRefresher, WarpRequests};
