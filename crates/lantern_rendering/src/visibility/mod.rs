//! Visibility: which leaves the viewer may see, and which surfaces that
//! makes visible.

mod fragments;
mod marker;
mod source;

pub use fragments::{FragmentId, FragmentRegistry, LeafFragments, NoFragments};
pub use marker::{mark_visible_surfaces, MarkOutcome};
pub use source::{compute_visibility_mask, leaf_near_liquid, VisSelection, VisSource};
