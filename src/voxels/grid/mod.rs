//! # Voxel Grid Module
//!
//! This module provides the `VoxelGrid` struct: a fixed-size dense cube of
//! voxels forming one chunk of a [`VoxelSpace`](crate::voxels::space::VoxelSpace).
//!
//! ## Storage
//!
//! Cells live in one boxed slice of exactly `grid_size³` voxels, x varying
//! fastest, then y, then z. The slice is allocated once and never resized.
//!
//! ## Bounds
//!
//! Checked accessors (`get`, `exists`, `set`) take signed local coordinates
//! and treat anything outside `[0, grid_size)` as "does not exist". The
//! `Index` impl is for hot loops that already stay in range and panics otherwise.
//!
//! ## Revisions
//!
//! Every new grid and every mutation draws a fresh revision from one
//! process-wide counter, so revisions only grow and are never shared between
//! two grid states. Meshes remember the revision they were built from; a mesh
//! of an older revision is stale, even if the grid at its coordinate was
//! replaced by another one.

use std::{
    fmt,
    ops::Index,
    sync::atomic::{AtomicU64, Ordering},
};

use cgmath::{Point3, Vector3};

use super::{space::SpaceId, voxel::Voxel};
use crate::error::VoxelError;

mod grid_creation;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

#[inline]
fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// A dense `grid_size³` array of voxels at one lattice coordinate.
#[derive(Clone)]
pub struct VoxelGrid {
    /// World units per cell edge.
    voxel_size: f32,
    /// Cells per axis.
    grid_size: usize,
    /// The space this grid was added to, if any.
    space: Option<SpaceId>,
    /// Position of this grid in its space's lattice (not voxel coordinates).
    coordinate: Point3<i32>,
    voxels: Box<[Voxel]>,
    revision: u64,
}

impl VoxelGrid {
    /// Creates an empty grid.
    pub fn new(voxel_size: f32, grid_size: usize, coordinate: Point3<i32>) -> Self {
        VoxelGrid {
            voxel_size,
            grid_size,
            space: None,
            coordinate,
            voxels: vec![Voxel::EMPTY; grid_size.pow(3)].into_boxed_slice(),
            revision: next_revision(),
        }
    }

    /// Wraps an existing voxel array.
    ///
    /// # Errors
    /// Returns [`VoxelError::LengthMismatch`] unless `voxels` holds exactly
    /// `grid_size³` cells.
    pub fn from_voxels(
        voxel_size: f32,
        grid_size: usize,
        coordinate: Point3<i32>,
        voxels: Vec<Voxel>,
    ) -> Result<Self, VoxelError> {
        let expected = grid_size.pow(3);
        if voxels.len() != expected {
            return Err(VoxelError::LengthMismatch {
                grid_size,
                expected,
                actual: voxels.len(),
            });
        }

        Ok(VoxelGrid {
            voxel_size,
            grid_size,
            space: None,
            coordinate,
            voxels: voxels.into_boxed_slice(),
            revision: next_revision(),
        })
    }

    /// Cells per axis.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// World units per cell edge.
    #[inline]
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Lattice coordinate of this grid within its space.
    pub fn coordinate(&self) -> Point3<i32> {
        self.coordinate
    }

    /// The owning space, once the grid has been added to one.
    pub fn space(&self) -> Option<SpaceId> {
        self.space
    }

    pub(crate) fn attach(&mut self, space: SpaceId, coordinate: Point3<i32>) {
        self.space = Some(space);
        self.coordinate = coordinate;
    }

    /// Revision drawn from the process-wide counter at creation or last mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All cells, x fastest.
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Consumes the grid, returning its cells.
    pub fn into_voxels(self) -> Vec<Voxel> {
        self.voxels.into_vec()
    }

    #[inline]
    fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.grid_size * (y + self.grid_size * z)
    }

    /// Whether a signed local coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let n = self.grid_size as i64;
        (0..n).contains(&(x as i64)) && (0..n).contains(&(y as i64)) && (0..n).contains(&(z as i64))
    }

    /// The voxel at a signed local coordinate, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Voxel> {
        if self.contains(x, y, z) {
            Some(self.voxels[self.index_of(x as usize, y as usize, z as usize)])
        } else {
            None
        }
    }

    /// Whether an existing voxel occupies the coordinate. Outside the grid is void.
    #[inline]
    pub fn exists(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some_and(|v| v.exists)
    }

    /// Replaces one voxel, returning the previous value.
    ///
    /// # Errors
    /// Returns [`VoxelError::OutOfBounds`] for coordinates outside the grid;
    /// the grid is left untouched.
    pub fn set(&mut self, x: i32, y: i32, z: i32, voxel: Voxel) -> Result<Voxel, VoxelError> {
        if !self.contains(x, y, z) {
            return Err(VoxelError::OutOfBounds {
                x,
                y,
                z,
                grid_size: self.grid_size,
            });
        }
        let index = self.index_of(x as usize, y as usize, z as usize);
        let previous = std::mem::replace(&mut self.voxels[index], voxel);
        self.revision = next_revision();
        Ok(previous)
    }

    /// Overwrites every cell.
    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
        self.revision = next_revision();
    }

    /// Number of existing voxels.
    pub fn count_existing(&self) -> usize {
        self.voxels.iter().filter(|v| v.exists).count()
    }

    /// Whether no voxel exists.
    pub fn is_void(&self) -> bool {
        !self.voxels.iter().any(|v| v.exists)
    }

    /// World-space position of the grid's local origin relative to its space.
    pub fn world_offset(&self) -> Vector3<f32> {
        let edge = self.grid_size as f32 * self.voxel_size;
        Vector3::new(
            self.coordinate.x as f32 * edge,
            self.coordinate.y as f32 * edge,
            self.coordinate.z as f32 * edge,
        )
    }
}

impl Index<(usize, usize, usize)> for VoxelGrid {
    type Output = Voxel;

    #[inline]
    fn index(&self, (x, y, z): (usize, usize, usize)) -> &Self::Output {
        assert!(
            x < self.grid_size && y < self.grid_size && z < self.grid_size,
            "local coordinate ({x}, {y}, {z}) outside grid of side {}",
            self.grid_size
        );
        &self.voxels[self.index_of(x, y, z)]
    }
}

impl PartialEq for VoxelGrid {
    fn eq(&self, other: &Self) -> bool {
        self.grid_size == other.grid_size
            && self.voxel_size == other.voxel_size
            && self.coordinate == other.coordinate
            && self.voxels == other.voxels
    }
}

impl fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("coordinate", &self.coordinate)
            .field("grid_size", &self.grid_size)
            .field("voxel_size", &self.voxel_size)
            .field("existing", &self.count_existing())
            .field("revision", &self.revision)
            .finish()
    }
}
