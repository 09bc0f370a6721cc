//! Surface culling.
//!
//! Every chained surface is tested against the view frustum and against
//! the viewer's side of its plane before anything is drawn.

mod frustum;
mod surfaces;

pub use frustum::Frustum;
pub use surfaces::{back_face_cull, cull_chained_surfaces};
