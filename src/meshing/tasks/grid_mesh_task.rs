//! Task for greedy meshing one grid in a background thread.

use std::sync::Arc;

use log::debug;
use web_time::Instant;

use crate::{
    core::MtResource,
    meshing::{mesh::VoxelMesh, mesh_cache::MeshCache},
    task_management::task::{Task, TaskResult},
    voxels::{grid::VoxelGrid, voxel::voxel_type::VoxelTypes},
};

/// Greedy meshes a snapshot of a grid and stores the result in a [`MeshCache`].
///
/// The snapshot is taken when the task is created, on the publishing thread,
/// so the worker never reads a grid that is being written. If the live grid
/// has moved on by the time the result is handled, a fresh task is returned
/// as a follow-up.
pub struct GridMeshTask {
    /// Live grid, checked for newer revisions when the result is handled
    grid: MtResource<VoxelGrid>,
    /// Copy the worker meshes
    snapshot: VoxelGrid,
    types: Arc<VoxelTypes>,
    cache: MtResource<MeshCache>,
}

impl GridMeshTask {
    /// Creates a task for the current state of `grid`.
    ///
    /// # Arguments
    /// * `grid` - The grid to mesh; copied immediately
    /// * `types` - Block type table used for texture tiles and transparency
    /// * `cache` - Where the finished mesh is stored
    pub fn new(
        grid: MtResource<VoxelGrid>,
        types: Arc<VoxelTypes>,
        cache: MtResource<MeshCache>,
    ) -> Self {
        let snapshot = grid.snapshot();
        GridMeshTask {
            grid,
            snapshot,
            types,
            cache,
        }
    }
}

impl Task for GridMeshTask {
    fn process(self: Box<Self>) -> Box<dyn TaskResult> {
        let started = Instant::now();
        let mesh = VoxelMesh::greedy(&self.snapshot, &self.types);
        debug!(
            "Meshed grid {:?} rev {} into {} quads in {:?}",
            self.snapshot.coordinate(),
            self.snapshot.revision(),
            mesh.quad_count(),
            started.elapsed()
        );

        Box::new(GridMeshTaskResult {
            revision: self.snapshot.revision(),
            mesh: Arc::new(mesh),
            grid: self.grid,
            types: self.types,
            cache: self.cache,
        })
    }
}

/// A finished grid mesh waiting to be stored.
pub struct GridMeshTaskResult {
    grid: MtResource<VoxelGrid>,
    revision: u64,
    mesh: Arc<VoxelMesh>,
    types: Arc<VoxelTypes>,
    cache: MtResource<MeshCache>,
}

impl TaskResult for GridMeshTaskResult {
    fn handle_result(self: Box<Self>) -> Vec<Box<dyn Task>> {
        let (coordinate, live_revision) = {
            let grid = self.grid.get();
            (grid.coordinate(), grid.revision())
        };

        self.cache.get_mut().insert(coordinate, self.revision, self.mesh);

        if live_revision != self.revision {
            debug!("Grid {:?} changed while meshing, re-meshing", coordinate);
            return vec![Box::new(GridMeshTask::new(self.grid, self.types, self.cache))];
        }
        Vec::new()
    }
}
