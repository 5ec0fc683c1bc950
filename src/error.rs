//! # Error Types
//!
//! Every fallible operation in the crate returns one of the enums below.
//! Meshing itself never fails; errors come from building grids and spaces,
//! decoding persisted snapshots and loading configuration.

use cgmath::Point3;
use thiserror::Error;

/// Errors raised while building or mutating grids and spaces.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// A voxel array does not hold exactly `grid_size³` cells.
    #[error("voxel array holds {actual} cells but a grid of side {grid_size} needs {expected}")]
    LengthMismatch {
        /// Side length of the grid being built.
        grid_size: usize,
        /// Required number of cells.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// A grid's side length or voxel size differs from the space it is added to.
    #[error(
        "grid (side {grid_size}, voxel size {voxel_size}) does not match space \
         (side {space_grid_size}, voxel size {space_voxel_size})"
    )]
    GridMismatch {
        /// Side length of the offending grid.
        grid_size: usize,
        /// Voxel size of the offending grid.
        voxel_size: f32,
        /// Side length shared by the space.
        space_grid_size: usize,
        /// Voxel size shared by the space.
        space_voxel_size: f32,
    },

    /// No member grid covers the requested lattice coordinate.
    #[error("no grid at lattice coordinate ({}, {}, {})", .0.x, .0.y, .0.z)]
    MissingGrid(Point3<i32>),

    /// A local coordinate lies outside `[0, grid_size)`.
    #[error("local coordinate ({x}, {y}, {z}) is outside a grid of side {grid_size}")]
    OutOfBounds {
        /// Local x.
        x: i32,
        /// Local y.
        y: i32,
        /// Local z.
        z: i32,
        /// Side length of the grid.
        grid_size: usize,
    },
}

/// Errors raised while decoding a persisted voxel space.
///
/// A decode error always fails the whole load; no partially populated space
/// is ever returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The byte stream is truncated, carries trailing bytes or holds an
    /// invalid field encoding.
    #[error("malformed voxel space data: {0}")]
    Malformed(#[from] bincode::Error),

    /// The stored grid side length is negative.
    #[error("negative grid size {0}")]
    NegativeGridSize(i32),

    /// A record's voxel array does not hold `grid_size³` cells.
    #[error(
        "grid ({}, {}, {}) holds {actual} voxels, expected {expected}",
        .coordinate.x, .coordinate.y, .coordinate.z
    )]
    GridLength {
        /// Lattice coordinate of the record.
        coordinate: Point3<i32>,
        /// Required number of cells.
        expected: usize,
        /// Number of cells in the record.
        actual: usize,
    },

    /// Two records share a lattice coordinate.
    #[error("duplicate grid at lattice coordinate ({}, {}, {})", .0.x, .0.y, .0.z)]
    DuplicateGrid(Point3<i32>),

    /// Reading the file failed.
    #[error("failed to read voxel space: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while encoding or writing a voxel space.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The grid size does not fit the `i32` field of the layout.
    #[error("grid size {0} does not fit the snapshot layout")]
    GridSizeOverflow(usize),

    /// The snapshot could not be encoded.
    #[error("failed to encode voxel space: {0}")]
    Encode(#[from] bincode::Error),

    /// Writing the file failed.
    #[error("failed to write voxel space: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading configuration or voxel type tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for the expected schema.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_coordinate() {
        let err = VoxelError::MissingGrid(Point3::new(1, -2, 3));
        assert_eq!(err.to_string(), "no grid at lattice coordinate (1, -2, 3)");

        let err = DecodeError::GridLength {
            coordinate: Point3::new(0, 0, 0),
            expected: 512,
            actual: 3,
        };
        assert_eq!(err.to_string(), "grid (0, 0, 0) holds 3 voxels, expected 512");
    }
}
