//! # Voxel Module
//!
//! The smallest unit of the world: a voxel value, the six faces of a voxel
//! cell, and the table of per-type metadata shared by every grid.

use serde::{Deserialize, Serialize};

use voxel_side::VoxelSide;

pub mod voxel_side;
pub mod voxel_type;

/// A single cell of a voxel grid.
///
/// Two voxels merge into one greedy quad only when they compare equal on
/// `block_type` and `orientation` and both exist.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    /// Whether the cell is occupied.
    pub exists: bool,
    /// Index into the [`VoxelTypes`](voxel_type::VoxelTypes) table.
    pub block_type: u16,
    /// Rotation tag; see [`VoxelSide::from_tag`].
    pub orientation: u8,
}

impl Voxel {
    /// An unoccupied cell.
    pub const EMPTY: Voxel = Voxel {
        exists: false,
        block_type: 0,
        orientation: 0,
    };

    /// An occupied cell of the given type with orientation 0.
    pub const fn new(block_type: u16) -> Self {
        Voxel {
            exists: true,
            block_type,
            orientation: 0,
        }
    }

    /// Returns a copy with the given orientation tag.
    pub const fn with_orientation(self, orientation: u8) -> Self {
        Voxel {
            orientation,
            ..self
        }
    }

    /// Returns a copy oriented towards `side`.
    pub fn facing(self, side: VoxelSide) -> Self {
        self.with_orientation(side.tag())
    }

    /// The side named by the orientation tag, if any.
    pub fn orientation_side(&self) -> Option<VoxelSide> {
        VoxelSide::from_tag(self.orientation)
    }

    /// Whether two voxels may share a greedy quad.
    #[inline]
    pub fn merges_with(&self, other: &Voxel) -> bool {
        self.exists
            && other.exists
            && self.block_type == other.block_type
            && self.orientation == other.orientation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_separates_merges() {
        let a = Voxel::new(3);
        assert!(a.merges_with(&Voxel::new(3)));
        assert!(!a.merges_with(&Voxel::new(4)));
        assert!(!a.merges_with(&a.facing(VoxelSide::EAST)));
        assert!(!a.merges_with(&Voxel::EMPTY));
        assert_eq!(a.facing(VoxelSide::EAST).orientation_side(), Some(VoxelSide::EAST));
    }
}
