//! Textures as rendering-state units.
//!
//! Image data is uploaded elsewhere; a map texture only carries the
//! descriptor sets the backend binds for it.

/// Index of a texture slot in the map's texture table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Array index of this slot.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Opaque backend descriptor set handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DescriptorSet(pub u64);

/// Sampler plus image descriptor pair bound for one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureBinding {
    /// Sampler descriptor set.
    pub sampler: DescriptorSet,
    /// Image descriptor set.
    pub image: DescriptorSet,
}

/// Animation-frame tables of a texture.
///
/// `frames` cycles over time. `alternate` is used instead when the drawing
/// entity is on a non-zero frame (switch textures and the like).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureAnimation {
    /// Primary sequence.
    pub frames: Vec<TextureId>,
    /// Alternate sequence, may be empty.
    pub alternate: Vec<TextureId>,
}

/// A named texture.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// Name from the map file.
    pub name: String,
    /// Descriptors for the diffuse image.
    pub binding: TextureBinding,
    /// Fullbright overlay descriptor, if the texture has glowing texels.
    pub fullbright: Option<DescriptorSet>,
    /// Warped image descriptors for liquids.
    pub warp: Option<TextureBinding>,
    /// Animation tables.
    pub animation: Option<TextureAnimation>,
}

impl Texture {
    /// Creates a plain, non-animated texture.
    #[must_use]
    pub fn new(name: impl Into<String>, binding: TextureBinding) -> Self {
        Self {
            name: name.into(),
            binding,
            fullbright: None,
            warp: None,
            animation: None,
        }
    }

    /// Adds a fullbright overlay.
    #[must_use]
    pub fn with_fullbright(mut self, set: DescriptorSet) -> Self {
        self.fullbright = Some(set);
        self
    }

    /// Adds a warp image.
    #[must_use]
    pub fn with_warp(mut self, warp: TextureBinding) -> Self {
        self.warp = Some(warp);
        self
    }

    /// Adds animation tables.
    #[must_use]
    pub fn with_animation(mut self, animation: TextureAnimation) -> Self {
        self.animation = Some(animation);
        self
    }
}
