//! The persisted form of a voxel space.

use std::collections::HashSet;

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::{error::DecodeError, voxels::voxel::Voxel};

/// A complete copy of a voxel space, field order matching the file layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelSpaceData {
    /// Cells per grid axis.
    pub grid_size: i32,
    /// World units per cell edge.
    pub voxel_size: f32,
    /// Lattice coordinate and cells (x fastest) of every grid.
    pub grids: Vec<(Point3<i32>, Vec<Voxel>)>,
}

impl VoxelSpaceData {
    /// Checks the snapshot describes a consistent space, returning the grid size.
    ///
    /// # Errors
    /// - [`DecodeError::NegativeGridSize`] for a negative side length
    /// - [`DecodeError::GridLength`] if a record does not hold `grid_size³` voxels
    /// - [`DecodeError::DuplicateGrid`] if two records share a coordinate
    pub fn validate(&self) -> Result<usize, DecodeError> {
        let grid_size = usize::try_from(self.grid_size)
            .map_err(|_| DecodeError::NegativeGridSize(self.grid_size))?;
        let expected = grid_size.checked_pow(3);

        let mut seen = HashSet::with_capacity(self.grids.len());
        for (coordinate, voxels) in &self.grids {
            if expected != Some(voxels.len()) {
                return Err(DecodeError::GridLength {
                    coordinate: *coordinate,
                    expected: expected.unwrap_or(usize::MAX),
                    actual: voxels.len(),
                });
            }
            if !seen.insert(*coordinate) {
                return Err(DecodeError::DuplicateGrid(*coordinate));
            }
        }

        Ok(grid_size)
    }
}
