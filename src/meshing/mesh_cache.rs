//! Least-recently-used cache of generated grid meshes.
//!
//! Entries are keyed by lattice coordinate and tagged with the grid revision
//! they were generated from. A lookup with a newer revision treats the entry
//! as stale and drops it, so edited grids are always re-meshed.

use std::{num::NonZeroUsize, sync::Arc};

use cgmath::Point3;
use log::{debug, trace};
use lru::LruCache;

use crate::voxels::{grid::VoxelGrid, space::VoxelSpace, voxel::voxel_type::VoxelTypes};

use super::mesh::VoxelMesh;

/// Capacity used when zero is requested.
const MIN_CAPACITY: NonZeroUsize = NonZeroUsize::MIN;

struct CachedMesh {
    revision: u64,
    mesh: Arc<VoxelMesh>,
}

/// Meshes of recently used grids.
pub struct MeshCache {
    meshes: LruCache<Point3<i32>, CachedMesh>,
}

impl MeshCache {
    /// Creates a cache holding at most `capacity` meshes (at least one).
    pub fn new(capacity: usize) -> Self {
        MeshCache {
            meshes: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(MIN_CAPACITY)),
        }
    }

    /// The mesh of the grid at `coordinate` if it was generated from `revision`.
    ///
    /// A hit marks the entry as most recently used. An entry from an older
    /// revision is evicted.
    pub fn get(&mut self, coordinate: Point3<i32>, revision: u64) -> Option<Arc<VoxelMesh>> {
        let cached = self.meshes.get(&coordinate)?;
        if cached.revision == revision {
            return Some(cached.mesh.clone());
        }
        if cached.revision < revision {
            trace!("Dropping stale mesh of grid {:?}", coordinate);
            self.meshes.pop(&coordinate);
        }
        None
    }

    /// Stores a mesh, unless a mesh of a newer revision is already cached.
    ///
    /// Returns whether the mesh was stored.
    pub fn insert(&mut self, coordinate: Point3<i32>, revision: u64, mesh: Arc<VoxelMesh>) -> bool {
        if self.meshes.peek(&coordinate).is_some_and(|cached| cached.revision > revision) {
            return false;
        }
        if let Some((evicted, _)) = self.meshes.push(coordinate, CachedMesh { revision, mesh }) {
            if evicted != coordinate {
                trace!("Evicted mesh of grid {:?}", evicted);
            }
        }
        true
    }

    /// Returns the cached mesh of `grid`, greedy meshing it on a miss.
    pub fn get_or_generate(&mut self, grid: &VoxelGrid, types: &VoxelTypes) -> Arc<VoxelMesh> {
        let (coordinate, revision) = (grid.coordinate(), grid.revision());
        if let Some(mesh) = self.get(coordinate, revision) {
            return mesh;
        }
        let mesh = Arc::new(VoxelMesh::greedy(grid, types));
        self.insert(coordinate, revision, mesh.clone());
        mesh
    }

    /// Drops the mesh of the grid at `coordinate`, e.g. after the grid was
    /// removed from its space.
    pub fn invalidate(&mut self, coordinate: Point3<i32>) -> bool {
        self.meshes.pop(&coordinate).is_some()
    }

    /// Drops the meshes of grids that are no longer members of `space`.
    ///
    /// # Returns
    /// The number of meshes dropped.
    pub fn retain_members(&mut self, space: &VoxelSpace) -> usize {
        let removed: Vec<Point3<i32>> = self
            .meshes
            .iter()
            .map(|(coordinate, _)| *coordinate)
            .filter(|coordinate| !space.contains_grid(*coordinate))
            .collect();
        for coordinate in &removed {
            self.meshes.pop(coordinate);
        }
        if !removed.is_empty() {
            debug!("Dropped {} meshes of removed grids", removed.len());
        }
        removed.len()
    }

    /// Drops every mesh.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }

    /// Whether a mesh for `coordinate` is cached, without touching recency.
    pub fn contains(&self, coordinate: Point3<i32>) -> bool {
        self.meshes.contains(&coordinate)
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Maximum number of cached meshes.
    pub fn capacity(&self) -> usize {
        self.meshes.cap().get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::voxel::{voxel_type::default_voxel_types, Voxel};

    fn coord(x: i32) -> Point3<i32> {
        Point3::new(x, 0, 0)
    }

    #[test]
    fn stale_revisions_miss() {
        let types = default_voxel_types();
        let mut cache = MeshCache::new(4);
        let mut grid = VoxelGrid::solid(1.0, 2, coord(0), Voxel::new(0));

        let first = cache.get_or_generate(&grid, &types);
        assert!(Arc::ptr_eq(&first, &cache.get_or_generate(&grid, &types)));

        grid.set(0, 0, 0, Voxel::EMPTY).unwrap();
        assert!(cache.get(coord(0), grid.revision()).is_none());
        assert!(!cache.contains(coord(0)));

        let second = cache.get_or_generate(&grid, &types);
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(second.quad_count() > first.quad_count());
    }

    #[test]
    fn older_results_do_not_replace_newer_ones() {
        let mut cache = MeshCache::new(4);
        assert!(cache.insert(coord(0), 5, Arc::new(VoxelMesh::new(1.0))));
        assert!(!cache.insert(coord(0), 4, Arc::new(VoxelMesh::new(1.0))));
        assert!(cache.get(coord(0), 5).is_some());
        assert!(cache.get(coord(0), 4).is_none());
        assert!(cache.contains(coord(0)));
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut cache = MeshCache::new(2);
        cache.insert(coord(0), 0, Arc::new(VoxelMesh::new(1.0)));
        cache.insert(coord(1), 0, Arc::new(VoxelMesh::new(1.0)));
        assert!(cache.get(coord(0), 0).is_some());
        cache.insert(coord(2), 0, Arc::new(VoxelMesh::new(1.0)));

        assert!(cache.contains(coord(0)));
        assert!(!cache.contains(coord(1)));
        assert!(cache.contains(coord(2)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_holds_one() {
        assert_eq!(MeshCache::new(0).capacity(), 1);
    }
}
