//! Vertex format of generated voxel meshes.
//!
//! Vertices are plain old data so a finished mesh can be handed to any
//! graphics API as raw bytes without conversion.

use cgmath::{Point3, Vector3};

/// A vertex of a voxel mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Texture Origin: [f32; 2] (8 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VoxelVertex {
    /// Position in grid-local world units
    pub position: [f32; 3],
    /// Outward face normal
    pub normal: [f32; 3],
    /// Atlas tile of the block type for this face
    pub texture_origin: [f32; 2],
    /// Repeat coordinates; a merged face of `w x h` voxels spans `0..w` and `0..h`
    pub tex_coords: [f32; 2],
}

impl VoxelVertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Corner position in grid-local world units
    /// * `normal` - Outward normal of the face the corner belongs to
    /// * `texture_origin` - Atlas tile of the block type
    /// * `tex_coords` - Repeat coordinates across the face
    pub fn new(
        position: Point3<f32>,
        normal: Vector3<f32>,
        texture_origin: [f32; 2],
        tex_coords: [f32; 2],
    ) -> Self {
        VoxelVertex {
            position: position.into(),
            normal: normal.into(),
            texture_origin,
            tex_coords,
        }
    }

    /// Size of one vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<VoxelVertex>();
}
