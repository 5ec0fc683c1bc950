//! Mesh generation for voxel grids.
//!
//! Two generators turn a grid into quads:
//! - [`greedy`]: merges coplanar faces of equal block type and orientation into
//!   maximal rectangles, one sweep per face direction
//! - [`naive`]: one quad per visible voxel face, aware of transparent block
//!   types and, optionally, of the neighboring grids in a space
//!
//! Both emit quads with the same corner winding, so their output can be fed to
//! [`VoxelMesh`] interchangeably.

pub mod greedy;
#[allow(clippy::module_inception)]
mod mesh;
pub mod naive;
mod quad;

pub use greedy::GreedyQuad;
pub use mesh::VoxelMesh;
pub use naive::FaceQuad;
pub use quad::{Quad, Rectangle};
