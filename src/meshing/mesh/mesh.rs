//! Triangle meshes built from generated quads.

use cgmath::MetricSpace;

use crate::{
    meshing::vertex::VoxelVertex,
    voxels::{
        grid::VoxelGrid,
        voxel::{voxel_side::VoxelSide, voxel_type::VoxelTypes},
    },
};

use super::{greedy, naive::FaceQuad, quad::Quad, GreedyQuad};

/// Vertex and index buffers for one grid.
///
/// Every quad contributes four vertices and two triangles `(0, 1, 2)` and
/// `(0, 2, 3)`, keeping the quad's corner winding. Faces of transparent block
/// types go to a separate index list so they can be drawn after the opaque
/// pass; both lists index the shared vertex buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelMesh {
    /// Shared vertex buffer
    pub vertices: Vec<VoxelVertex>,
    /// Triangles of opaque faces
    pub opaque_indices: Vec<u32>,
    /// Triangles of transparent faces
    pub transparent_indices: Vec<u32>,
    voxel_size: f32,
}

impl VoxelMesh {
    /// Creates an empty mesh for grids with the given voxel size.
    pub fn new(voxel_size: f32) -> Self {
        VoxelMesh {
            vertices: Vec::new(),
            opaque_indices: Vec::new(),
            transparent_indices: Vec::new(),
            voxel_size,
        }
    }

    /// Greedy meshes `grid`.
    pub fn greedy(grid: &VoxelGrid, types: &VoxelTypes) -> Self {
        Self::from_greedy(grid.voxel_size(), greedy::generate_mesh(grid), types)
    }

    /// Collects greedy quads into a mesh.
    pub fn from_greedy(
        voxel_size: f32,
        quads: impl IntoIterator<Item = GreedyQuad>,
        types: &VoxelTypes,
    ) -> Self {
        let mut mesh = Self::new(voxel_size);
        for q in quads {
            mesh.add_quad(&q.quad, q.side, q.block_type, types);
        }
        mesh
    }

    /// Collects per-voxel faces into a mesh.
    pub fn from_faces(
        voxel_size: f32,
        faces: impl IntoIterator<Item = FaceQuad>,
        types: &VoxelTypes,
    ) -> Self {
        let mut mesh = Self::new(voxel_size);
        for f in faces {
            mesh.add_quad(&f.quad, f.side, f.voxel.block_type, types);
        }
        mesh
    }

    /// Appends one quad.
    ///
    /// # Arguments
    /// * `quad` - Corners in winding order
    /// * `side` - Face direction, selects the top/side/bottom texture tile
    /// * `block_type` - Type of the covered voxels
    /// * `types` - Type table; unknown ids are opaque and use tile `[0, 0]`
    pub fn add_quad(&mut self, quad: &Quad, side: VoxelSide, block_type: u16, types: &VoxelTypes) {
        let (texture_origin, transparent) = match types.get(block_type) {
            Some(t) => (t.texture.for_side(side), t.transparent),
            None => ([0.0, 0.0], false),
        };

        let u = quad.a.distance(quad.d) / self.voxel_size;
        let v = quad.a.distance(quad.b) / self.voxel_size;
        let base = self.vertices.len() as u32;

        self.vertices.extend(
            [(quad.a, [0.0, 0.0]), (quad.b, [0.0, v]), (quad.c, [u, v]), (quad.d, [u, 0.0])]
                .map(|(p, uv)| VoxelVertex::new(p, quad.normal, texture_origin, uv)),
        );

        let indices = if transparent {
            &mut self.transparent_indices
        } else {
            &mut self.opaque_indices
        };
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Number of triangles in both passes.
    pub fn triangle_count(&self) -> usize {
        (self.opaque_indices.len() + self.transparent_indices.len()) / 3
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The opaque index buffer as raw bytes.
    pub fn opaque_index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.opaque_indices)
    }

    /// The transparent index buffer as raw bytes.
    pub fn transparent_index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transparent_indices)
    }
}
