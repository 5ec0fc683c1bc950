//! # Voxel Side Module
//!
//! This module defines the six faces of a voxel cell. The same numbering is
//! used for the orientation tag stored in every [`Voxel`](super::Voxel).

use cgmath::Vector3;
use num_derive::FromPrimitive;

/// One of the six axis-aligned faces of a voxel.
///
/// The discriminants are stable: they are what a voxel's orientation tag
/// holds when it names a side.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum VoxelSide {
    /// The top face (facing positive Y)
    TOP = 0,

    /// The bottom face (facing negative Y)
    BOTTOM = 1,

    /// The north face (facing negative Z)
    NORTH = 2,

    /// The south face (facing positive Z)
    SOUTH = 3,

    /// The east face (facing positive X)
    EAST = 4,

    /// The west face (facing negative X)
    WEST = 5,
}

impl VoxelSide {
    /// Returns all six sides in discriminant order.
    pub fn all() -> [VoxelSide; 6] {
        [
            VoxelSide::TOP,
            VoxelSide::BOTTOM,
            VoxelSide::NORTH,
            VoxelSide::SOUTH,
            VoxelSide::EAST,
            VoxelSide::WEST,
        ]
    }

    /// Decodes an orientation tag, returning `None` for values that name no side.
    pub fn from_tag(tag: u8) -> Option<VoxelSide> {
        num::FromPrimitive::from_u8(tag)
    }

    /// The orientation tag for this side.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Unit step from a cell to the neighbor across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            VoxelSide::TOP => Vector3::new(0, 1, 0),
            VoxelSide::BOTTOM => Vector3::new(0, -1, 0),
            VoxelSide::NORTH => Vector3::new(0, 0, -1),
            VoxelSide::SOUTH => Vector3::new(0, 0, 1),
            VoxelSide::EAST => Vector3::new(1, 0, 0),
            VoxelSide::WEST => Vector3::new(-1, 0, 0),
        }
    }

    /// Unit outward normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }

    /// The face on the opposite side of the cell.
    pub fn opposite(self) -> VoxelSide {
        match self {
            VoxelSide::TOP => VoxelSide::BOTTOM,
            VoxelSide::BOTTOM => VoxelSide::TOP,
            VoxelSide::NORTH => VoxelSide::SOUTH,
            VoxelSide::SOUTH => VoxelSide::NORTH,
            VoxelSide::EAST => VoxelSide::WEST,
            VoxelSide::WEST => VoxelSide::EAST,
        }
    }

    /// Whether the normal points along a positive axis.
    pub fn is_positive(self) -> bool {
        matches!(self, VoxelSide::TOP | VoxelSide::SOUTH | VoxelSide::EAST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for side in VoxelSide::all() {
            assert_eq!(VoxelSide::from_tag(side.tag()), Some(side));
        }
        assert_eq!(VoxelSide::from_tag(6), None);
    }

    #[test]
    fn opposite_sides_cancel() {
        for side in VoxelSide::all() {
            assert_eq!(side.offset() + side.opposite().offset(), Vector3::new(0, 0, 0));
            assert_ne!(side.is_positive(), side.opposite().is_positive());
        }
    }
}
