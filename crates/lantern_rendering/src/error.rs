//! # Renderer Error Types
//!
//! Only setup can fail. Inside a frame, missing textures and empty chains
//! are skipped and a full batch is just a flush point.

use lantern_core::WorldError;
use thiserror::Error;

/// Errors raised while configuring or driving the world renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `RendererConfig`.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written back out.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A config value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The viewer leaf does not exist in the current world.
    #[error("viewer leaf {leaf} out of range ({count} leaves)")]
    ViewLeafOutOfRange {
        /// Requested leaf.
        leaf: u32,
        /// Leaves in the world.
        count: usize,
    },

    /// A submodel index does not exist in the current world.
    #[error("submodel {index} out of range ({count} submodels)")]
    SubModelOutOfRange {
        /// Requested submodel.
        index: usize,
        /// Submodels in the world.
        count: usize,
    },

    /// The renderer was sized for a different world.
    #[error("renderer sized for {expected} {table}, world has {found}")]
    WorldMismatch {
        /// Table whose size differs: "surfaces", "textures" or "leaves".
        table: &'static str,
        /// Entries in the world passed in.
        found: usize,
        /// Entries the frame state was built for.
        expected: usize,
    },

    /// Map data failed validation.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;
