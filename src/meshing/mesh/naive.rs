//! One quad per visible voxel face.
//!
//! The naive generator is the reference the greedy sweep is checked against
//! and the path used when transparency matters: a face is drawn when the
//! neighbor on that side is void, or when the neighbor is a transparent block
//! of a different type (glass next to stone shows the stone, glass next to
//! glass does not).

use cgmath::Point3;

use crate::voxels::{
    grid::VoxelGrid,
    space::VoxelSpace,
    voxel::{voxel_side::VoxelSide, voxel_type::VoxelTypes, Voxel},
};

use super::quad::Quad;

/// Face order used by the per-voxel generators.
pub const FACE_ORDER: [VoxelSide; 6] = [
    VoxelSide::BOTTOM,
    VoxelSide::EAST,
    VoxelSide::WEST,
    VoxelSide::TOP,
    VoxelSide::NORTH,
    VoxelSide::SOUTH,
];

/// A single voxel face.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceQuad {
    /// The voxel the face belongs to.
    pub voxel: Voxel,
    /// Local cell coordinate of that voxel.
    pub position: Point3<usize>,
    /// Direction the face looks towards.
    pub side: VoxelSide,
    /// Corners in grid-local world units.
    pub quad: Quad,
}

/// Read access to voxels around a grid, including just past its edges.
pub trait VoxelNeighborhood {
    /// The voxel at a grid-local coordinate, or `None` when nothing is there.
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<Voxel>;
}

/// A lone grid: everything outside it is void.
impl VoxelNeighborhood for &VoxelGrid {
    #[inline]
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<Voxel> {
        self.get(x, y, z)
    }
}

/// A grid seen from inside its space, so border faces look into the
/// neighboring grids.
#[derive(Copy, Clone)]
pub struct SpaceNeighborhood<'a> {
    space: &'a VoxelSpace,
    grid: &'a VoxelGrid,
}

impl<'a> SpaceNeighborhood<'a> {
    /// Wraps `grid`, which sits at its own coordinate in `space`.
    ///
    /// `grid` may be a snapshot; only cells outside it are read from `space`.
    pub fn new(space: &'a VoxelSpace, grid: &'a VoxelGrid) -> Self {
        SpaceNeighborhood { space, grid }
    }
}

impl VoxelNeighborhood for SpaceNeighborhood<'_> {
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<Voxel> {
        if self.grid.contains(x, y, z) {
            return self.grid.get(x, y, z);
        }
        let (neighbor, local) = self.space.resolve(self.grid.coordinate(), x, y, z)?;
        let neighbor = neighbor.get();
        Some(neighbor[(local.x, local.y, local.z)])
    }
}

/// Whether the face of `voxel` towards `side` is visible.
pub fn should_render_side(
    neighborhood: &impl VoxelNeighborhood,
    types: &VoxelTypes,
    voxel: &Voxel,
    position: Point3<usize>,
    side: VoxelSide,
) -> bool {
    let offset = side.offset();
    match neighborhood.voxel_at(
        position.x as i32 + offset.x,
        position.y as i32 + offset.y,
        position.z as i32 + offset.z,
    ) {
        Some(neighbor) if neighbor.exists => {
            types.is_transparent(neighbor.block_type) && neighbor.block_type != voxel.block_type
        }
        _ => true,
    }
}

/// The quad covering one face of the cell at `position`.
pub fn face_quad(position: Point3<usize>, side: VoxelSide, voxel_size: f32) -> Quad {
    let Point3 { x, y, z } = position;
    let (x1, y1, z1) = (x + 1, y + 1, z + 1);
    let corners = match side {
        VoxelSide::BOTTOM => [[x, y, z], [x, y, z1], [x1, y, z1], [x1, y, z]],
        VoxelSide::EAST => [[x1, y, z1], [x1, y1, z1], [x1, y1, z], [x1, y, z]],
        VoxelSide::WEST => [[x, y, z], [x, y1, z], [x, y1, z1], [x, y, z1]],
        VoxelSide::TOP => [[x, y1, z1], [x, y1, z], [x1, y1, z], [x1, y1, z1]],
        VoxelSide::NORTH => [[x1, y, z], [x1, y1, z], [x, y1, z], [x, y, z]],
        VoxelSide::SOUTH => [[x, y, z1], [x, y1, z1], [x1, y1, z1], [x1, y, z1]],
    };
    Quad::from_cell_corners(corners, side.normal(), voxel_size)
}

/// Existing voxels in x, y, z nesting order (z innermost).
fn existing_voxels(grid: &VoxelGrid) -> impl Iterator<Item = (Point3<usize>, Voxel)> + '_ {
    let n = grid.grid_size();
    (0..n)
        .flat_map(move |x| (0..n).flat_map(move |y| (0..n).map(move |z| Point3::new(x, y, z))))
        .filter_map(move |p| {
            let voxel = grid[(p.x, p.y, p.z)];
            voxel.exists.then_some((p, voxel))
        })
}

/// Visible faces of `grid` with an arbitrary view of its surroundings.
pub fn generate_mesh_with<'a, N>(
    grid: &'a VoxelGrid,
    neighborhood: N,
    types: &'a VoxelTypes,
) -> impl Iterator<Item = FaceQuad> + 'a
where
    N: VoxelNeighborhood + Copy + 'a,
{
    let voxel_size = grid.voxel_size();
    existing_voxels(grid).flat_map(move |(position, voxel)| {
        FACE_ORDER
            .into_iter()
            .filter(move |&side| should_render_side(&neighborhood, types, &voxel, position, side))
            .map(move |side| FaceQuad {
                voxel,
                position,
                side,
                quad: face_quad(position, side, voxel_size),
            })
    })
}

/// Visible faces of a lone grid; cells outside it are void.
pub fn generate_mesh<'a>(
    grid: &'a VoxelGrid,
    types: &'a VoxelTypes,
) -> impl Iterator<Item = FaceQuad> + 'a {
    generate_mesh_with(grid, grid, types)
}

/// Visible faces of `grid` where border faces consult the neighboring grids
/// of `space`.
///
/// Neighbor grids are read-locked one lookup at a time, so the caller must
/// not hold a write guard on any grid of `space` while iterating.
pub fn generate_mesh_in_space<'a>(
    space: &'a VoxelSpace,
    grid: &'a VoxelGrid,
    types: &'a VoxelTypes,
) -> impl Iterator<Item = FaceQuad> + 'a {
    generate_mesh_with(grid, SpaceNeighborhood::new(space, grid), types)
}

/// All six faces of every cell, existing or not. Useful to visualize the
/// grid bounds.
pub fn generate_grid_mesh(grid: &VoxelGrid) -> impl Iterator<Item = FaceQuad> + '_ {
    let n = grid.grid_size();
    let voxel_size = grid.voxel_size();
    (0..n)
        .flat_map(move |x| (0..n).flat_map(move |y| (0..n).map(move |z| Point3::new(x, y, z))))
        .flat_map(move |position| {
            FACE_ORDER.into_iter().map(move |side| FaceQuad {
                voxel: grid[(position.x, position.y, position.z)],
                position,
                side,
                quad: face_quad(position, side, voxel_size),
            })
        })
}
