//! Background tasks that produce meshes.

mod grid_mesh_task;

pub use grid_mesh_task::{GridMeshTask, GridMeshTaskResult};
