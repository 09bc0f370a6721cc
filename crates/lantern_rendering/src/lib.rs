//! # LANTERN Rendering
//!
//! Per-frame visibility and draw batching for the static world:
//! - PVS lookup with a fat PVS next to liquids
//! - Generation-tagged surface marking, skipped while the viewer stays put
//! - Per-texture chains, frustum and back-face culling
//! - Lightmap refresh before any surface is drawn
//! - One indexed draw per texture/lightmap run
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      WORLD FRAME                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Visibility Mask → Surface Marker → Chain Builder            │
//! │        ↓                                  ↓                  │
//! │  Surface Culler → Lightmap Refresher → Chain Renderers       │
//! │                                           ↓                  │
//! │                                   RenderBackend sink         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Single-threaded: one frame, one `FrameContext`, stages in order
//! - No per-frame allocation once the world is loaded
//! - Backend state is bound only for textures with visible survivors

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod batch;
pub mod chains;
pub mod config;
pub mod culling;
pub mod error;
pub mod lighting;
pub mod passes;
pub mod pipeline;
pub mod visibility;

pub use backend::{
    BackendCommand, DescriptorSlot, IndexBufferHandle, PipelineKind, RecordingBackend,
    RenderBackend,
};
pub use batch::IndexBatch;
pub use chains::{ChainId, TextureChains};
pub use config::{DrawMode, LiquidAlpha, RendererConfig, DEFAULT_BATCH_INDICES};
pub use culling::{back_face_cull, Frustum};
pub use error::{RenderError, RenderResult};
pub use lighting::{DynamicLightmaps, LightmapCache, LightmapChains, NoWarp, WarpRefresher, WarpRequests};
pub use passes::{opaque_passes, ChainRenderer, PassContext};
pub use pipeline::{EntityState, FrameContext, RenderStats, ViewState, WorldRenderer};
pub use visibility::{
    compute_visibility_mask, FragmentId, FragmentRegistry, LeafFragments, MarkOutcome,
    NoFragments, VisSelection, VisSource,
};
