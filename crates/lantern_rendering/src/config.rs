//! Renderer configuration.
//!
//! Loaded once from TOML at startup:
//!
//! ```toml
//! novis = false
//! fullbrights = true
//! draw_mode = "normal"
//! max_batch_indices = 4096
//!
//! [liquid]
//! water_alpha = 0.6
//! ```

use std::path::Path;

use lantern_core::SurfaceFlags;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Default batch accumulator capacity, in indices.
pub const DEFAULT_BATCH_INDICES: usize = 4096;

/// Which chain-renderer strategies draw the opaque world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Textured and lightmapped.
    #[default]
    Normal,
    /// One flat colour per surface.
    Flat,
    /// Textures without lighting, plus the glow overlay.
    Fullbright,
    /// Lightmaps only, tiled surfaces in white.
    Lightmap,
}

impl DrawMode {
    /// Liquids are not drawn in the debug views that replace textures.
    #[must_use]
    pub const fn draws_liquids(self) -> bool {
        matches!(self, Self::Normal | Self::Fullbright)
    }
}

/// Per-kind liquid transparency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidAlpha {
    /// Water surfaces.
    pub water_alpha: f32,
    /// Lava surfaces.
    pub lava_alpha: f32,
    /// Slime surfaces.
    pub slime_alpha: f32,
    /// Teleporter surfaces.
    pub tele_alpha: f32,
}

impl Default for LiquidAlpha {
    fn default() -> Self {
        Self {
            water_alpha: 1.0,
            lava_alpha: 1.0,
            slime_alpha: 1.0,
            tele_alpha: 1.0,
        }
    }
}

impl LiquidAlpha {
    /// Alpha for a liquid surface with `flags`.
    #[must_use]
    pub fn for_flags(&self, flags: SurfaceFlags) -> f32 {
        if flags.contains(SurfaceFlags::LAVA) {
            self.lava_alpha
        } else if flags.contains(SurfaceFlags::SLIME) {
            self.slime_alpha
        } else if flags.contains(SurfaceFlags::TELE) {
            self.tele_alpha
        } else {
            self.water_alpha
        }
    }

    fn iter(&self) -> [(&'static str, f32); 4] {
        [
            ("water_alpha", self.water_alpha),
            ("lava_alpha", self.lava_alpha),
            ("slime_alpha", self.slime_alpha),
            ("tele_alpha", self.tele_alpha),
        ]
    }
}

/// Configuration for the world renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Disable PVS culling, every leaf is visible.
    pub novis: bool,
    /// Mark surfaces of sky leaves too.
    pub old_sky_leaf: bool,
    /// Use the fullbright pipeline for textures with glowing texels.
    pub fullbrights: bool,
    /// Opaque strategy set.
    pub draw_mode: DrawMode,
    /// Draw the triangle overlay.
    pub show_tris: bool,
    /// Batch accumulator capacity in indices. At least one triangle.
    pub max_batch_indices: usize,
    /// Half-extent of the box merged into the fat PVS near liquids.
    pub fat_pvs_radius: f32,
    /// Liquid transparency levels.
    pub liquid: LiquidAlpha,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            novis: false,
            old_sky_leaf: false,
            fullbrights: true,
            draw_mode: DrawMode::Normal,
            show_tris: false,
            max_batch_indices: DEFAULT_BATCH_INDICES,
            fat_pvs_radius: 8.0,
            liquid: LiquidAlpha::default(),
        }
    }
}

impl RendererConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML and `InvalidConfig` for values
    /// out of range.
    pub fn from_toml_str(text: &str) -> RenderResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns `Serialize` if the TOML writer rejects the value.
    pub fn to_toml_string(&self) -> RenderResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> RenderResult<()> {
        if self.max_batch_indices < 3 {
            return Err(RenderError::InvalidConfig(format!(
                "max_batch_indices must hold one triangle, got {}",
                self.max_batch_indices
            )));
        }
        if self.fat_pvs_radius.is_nan() || self.fat_pvs_radius < 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "fat_pvs_radius must be non-negative, got {}",
                self.fat_pvs_radius
            )));
        }
        for (name, alpha) in self.liquid.iter() {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(RenderError::InvalidConfig(format!(
                    "liquid.{name} must be within 0..=1, got {alpha}"
                )));
            }
        }
        Ok(())
    }
}
