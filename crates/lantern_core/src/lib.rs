//! # LANTERN Core
//!
//! The static world map as the renderer consumes it:
//! - Binary space partition (nodes, leaves, split planes)
//! - Planar surfaces grouped by texture
//! - Precomputed potentially-visible sets, one bit per leaf
//!
//! ## Rules
//!
//! 1. **Read-only after load** - nothing in here changes per frame
//! 2. **Validated once** - `WorldModel::new` checks every index, the
//!    renderer trusts the data afterwards
//! 3. **Index handles** - surfaces, textures, leaves and nodes are referred
//!    to by small `u32` ids, never by pointer
//!
//! ## Example
//!
//! ```rust,ignore
//! use lantern_core::{WorldAsset, WorldModel};
//!
//! let world = WorldModel::new(asset)?;
//! let pvs = world.leaf_pvs(world.leaf_at([0.0, 0.0, 64.0]));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod bsp;
pub mod error;
pub mod geometry;
pub mod surface;
pub mod texture;
pub mod vis;
pub mod world;

pub use bsp::{Child, Contents, Leaf, LeafId, Node, NodeId};
pub use error::{WorldError, WorldResult};
pub use geometry::{Aabb, Plane, PlaneKind, SplitPlane};
pub use surface::{Surface, SurfaceFlags, SurfaceId};
pub use texture::{DescriptorSet, Texture, TextureAnimation, TextureBinding, TextureId};
pub use vis::{VisData, VisMask};
pub use world::{SubModel, WorldAsset, WorldModel};
