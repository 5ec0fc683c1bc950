//! # Voxel Space Serialization
//!
//! Converts whole voxel spaces to and from the persisted `.cvx` byte layout.
//!
//! ## Layout
//!
//! All integers and floats are little endian, with no padding and no version
//! field:
//!
//! | field          | encoding                                   |
//! |----------------|--------------------------------------------|
//! | grid size      | `i32`                                      |
//! | voxel size     | `f32`                                      |
//! | record count   | `u64`                                      |
//! | per record     | `i32 x, i32 y, i32 z`, `u64` voxel count   |
//! | per voxel      | `u8` exists (0/1), `u16` type, `u8` orientation |
//!
//! The layout is produced by `bincode` with fixed-width integers over the
//! serde form of [`VoxelSpaceData`].
//!
//! ## Failure
//!
//! Decoding is all or nothing: truncated input, trailing bytes, invalid bool
//! bytes, a negative grid size, a record whose voxel count is not
//! `grid_size³`, or a repeated lattice coordinate all fail the load.

use std::{fs, path::Path};

use bincode::Options;
use log::info;

use crate::{
    error::{DecodeError, EncodeError},
    voxels::space::VoxelSpace,
};

mod voxel_space_data;

pub use voxel_space_data::VoxelSpaceData;

/// Conventional file extension of persisted spaces. Not checked on load.
pub const VOXEL_SPACE_EXTENSION: &str = "cvx";

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Encodes a snapshot.
pub fn serialize(data: &VoxelSpaceData) -> Result<Vec<u8>, EncodeError> {
    Ok(codec().serialize(data)?)
}

/// Decodes and validates a snapshot.
pub fn deserialize(bytes: &[u8]) -> Result<VoxelSpaceData, DecodeError> {
    let data: VoxelSpaceData = codec().deserialize(bytes)?;
    data.validate()?;
    Ok(data)
}

/// Encodes a live space.
pub fn serialize_space(space: &VoxelSpace) -> Result<Vec<u8>, EncodeError> {
    serialize(&space.to_data()?)
}

/// Decodes bytes into a new space.
pub fn deserialize_space(bytes: &[u8]) -> Result<VoxelSpace, DecodeError> {
    VoxelSpace::from_data(deserialize(bytes)?)
}

/// Writes a space to disk.
pub fn save(space: &VoxelSpace, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let bytes = serialize_space(space)?;
    fs::write(path, &bytes)?;
    info!("Saved {} grids ({} bytes) to {}", space.len(), bytes.len(), path.display());
    Ok(())
}

/// Reads a space from disk.
pub fn load(path: impl AsRef<Path>) -> Result<VoxelSpace, DecodeError> {
    let path = path.as_ref();
    let space = deserialize_space(&fs::read(path)?)?;
    info!("Loaded {} grids from {}", space.len(), path.display());
    Ok(space)
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::voxels::voxel::Voxel;

    fn single_voxel_data() -> VoxelSpaceData {
        let mut voxels = vec![Voxel::EMPTY; 8];
        voxels[0] = Voxel::new(0x0102).with_orientation(3);
        VoxelSpaceData {
            grid_size: 2,
            voxel_size: 0.5,
            grids: vec![(Point3::new(-1, 0, 2), voxels)],
        }
    }

    #[test]
    fn layout_matches_documented_fields() {
        let bytes = serialize(&single_voxel_data()).unwrap();

        assert_eq!(&bytes[0..4], &2i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[8..16], &1u64.to_le_bytes());
        assert_eq!(&bytes[16..20], &(-1i32).to_le_bytes());
        assert_eq!(&bytes[20..24], &0i32.to_le_bytes());
        assert_eq!(&bytes[24..28], &2i32.to_le_bytes());
        assert_eq!(&bytes[28..36], &8u64.to_le_bytes());
        assert_eq!(&bytes[36..40], &[1, 0x02, 0x01, 3]);
        assert_eq!(&bytes[40..44], &[0, 0, 0, 0]);
        assert_eq!(bytes.len(), 36 + 8 * 4);
    }

    #[test]
    fn truncated_input_fails() {
        let bytes = serialize(&single_voxel_data()).unwrap();
        for len in [0, 3, 7, 16, bytes.len() - 1] {
            let result = deserialize(&bytes[..len]);
            assert!(matches!(result, Err(DecodeError::Malformed(_))), "len {len}");
        }
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut bytes = serialize(&single_voxel_data()).unwrap();
        bytes.push(0);
        assert!(matches!(deserialize(&bytes), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn invalid_exists_byte_fails() {
        let mut bytes = serialize(&single_voxel_data()).unwrap();
        bytes[36] = 2;
        assert!(matches!(deserialize(&bytes), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn inconsistent_snapshots_fail() {
        let mut data = single_voxel_data();
        data.grids[0].1.pop();
        let bytes = serialize(&data).unwrap();
        assert!(matches!(
            deserialize(&bytes),
            Err(DecodeError::GridLength { expected: 8, actual: 7, .. })
        ));

        let mut data = single_voxel_data();
        data.grids.push(data.grids[0].clone());
        let bytes = serialize(&data).unwrap();
        assert!(matches!(deserialize(&bytes), Err(DecodeError::DuplicateGrid(_))));

        let data = VoxelSpaceData {
            grid_size: -1,
            voxel_size: 1.0,
            grids: Vec::new(),
        };
        let bytes = serialize(&data).unwrap();
        assert!(matches!(deserialize(&bytes), Err(DecodeError::NegativeGridSize(-1))));
    }
}
