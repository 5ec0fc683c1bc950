//! # Meshing
//!
//! Converts voxel grids into quads and triangle meshes.
//!
//! ## Architecture
//! - `mesh/`: the greedy and naive generators, quad primitives and [`VoxelMesh`]
//! - [`vertex`]: the plain-old-data vertex format of [`VoxelMesh`]
//! - [`mesh_cache`]: LRU cache of meshes keyed by grid coordinate and revision
//! - [`tasks`]: background meshing through the task manager
//!
//! ## Data Flow
//! 1. A caller publishes a [`GridMeshTask`](tasks::GridMeshTask) per grid
//! 2. The task copies the grid and greedy meshes the copy on a worker
//! 3. The result is stored in a shared [`MeshCache`](mesh_cache::MeshCache)
//! 4. Renderers fetch meshes by coordinate and current revision

pub mod mesh;
pub mod mesh_cache;
pub mod tasks;
pub mod vertex;

pub use mesh::*;
pub use mesh_cache::MeshCache;
pub use vertex::VoxelVertex;
