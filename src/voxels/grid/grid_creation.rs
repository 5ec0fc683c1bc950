//! # Grid Creation Module
//!
//! Fixture constructors used by tests, benchmarks and the demo binary.

use cgmath::{MetricSpace, Point3};

use super::{next_revision, VoxelGrid};
use crate::voxels::voxel::Voxel;

impl VoxelGrid {
    /// Creates a grid with every cell set to `voxel`.
    pub fn solid(voxel_size: f32, grid_size: usize, coordinate: Point3<i32>, voxel: Voxel) -> Self {
        Self::from_fn(voxel_size, grid_size, coordinate, |_, _, _| voxel)
    }

    /// Creates a grid by evaluating `f(x, y, z)` for every cell.
    pub fn from_fn(
        voxel_size: f32,
        grid_size: usize,
        coordinate: Point3<i32>,
        mut f: impl FnMut(usize, usize, usize) -> Voxel,
    ) -> Self {
        let mut voxels = Vec::with_capacity(grid_size.pow(3));
        for z in 0..grid_size {
            for y in 0..grid_size {
                for x in 0..grid_size {
                    voxels.push(f(x, y, z));
                }
            }
        }

        VoxelGrid {
            voxel_size,
            grid_size,
            space: None,
            coordinate,
            voxels: voxels.into_boxed_slice(),
            revision: next_revision(),
        }
    }

    /// Creates a 3D checkerboard of `voxel` and empty cells, starting filled at the origin.
    pub fn checkerboard(
        voxel_size: f32,
        grid_size: usize,
        coordinate: Point3<i32>,
        voxel: Voxel,
    ) -> Self {
        Self::from_fn(voxel_size, grid_size, coordinate, |x, y, z| {
            if (x + y + z) % 2 == 0 {
                voxel
            } else {
                Voxel::EMPTY
            }
        })
    }

    /// Creates a grid of random occupancy.
    ///
    /// Each cell exists with probability `fill_ratio`, with a block type drawn
    /// from `0..type_count` and an orientation from `0..orientation_count`.
    pub fn random(
        rng: &mut fastrand::Rng,
        voxel_size: f32,
        grid_size: usize,
        coordinate: Point3<i32>,
        fill_ratio: f64,
        type_count: u16,
        orientation_count: u8,
    ) -> Self {
        Self::from_fn(voxel_size, grid_size, coordinate, |_, _, _| {
            if rng.f64() < fill_ratio {
                Voxel::new(rng.u16(0..type_count.max(1)))
                    .with_orientation(rng.u8(0..orientation_count.max(1)))
            } else {
                Voxel::EMPTY
            }
        })
    }

    /// Creates the part of a ball of `voxel` that falls inside this grid.
    ///
    /// `center` and `radius` are in global voxel coordinates, so neighboring
    /// grids built with the same ball join seamlessly.
    pub fn sphere(
        voxel_size: f32,
        grid_size: usize,
        coordinate: Point3<i32>,
        center: Point3<f32>,
        radius: f32,
        voxel: Voxel,
    ) -> Self {
        let base = coordinate.map(|c| c as f32 * grid_size as f32);
        Self::from_fn(voxel_size, grid_size, coordinate, |x, y, z| {
            let cell = Point3::new(
                base.x + x as f32 + 0.5,
                base.y + y as f32 + 0.5,
                base.z + z as f32 + 0.5,
            );
            if cell.distance(center) < radius {
                voxel
            } else {
                Voxel::EMPTY
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_has_no_touching_faces() {
        let grid = VoxelGrid::checkerboard(1.0, 4, Point3::new(0, 0, 0), Voxel::new(1));
        assert_eq!(grid.count_existing(), 32);
        assert!(grid.exists(0, 0, 0));
        assert!(!grid.exists(1, 0, 0));
        assert!(grid.exists(1, 1, 0));
    }

    #[test]
    fn random_is_reproducible() {
        let seeded = || {
            let mut rng = fastrand::Rng::with_seed(7);
            VoxelGrid::random(&mut rng, 1.0, 8, Point3::new(0, 0, 0), 0.4, 3, 2)
        };
        let (a, b) = (seeded(), seeded());
        assert_eq!(a, b);
        assert!(a.voxels().iter().all(|v| v.block_type < 3 && v.orientation < 2));
    }

    #[test]
    fn sphere_spans_grids() {
        let center = Point3::new(8.0, 8.0, 8.0);
        let low = VoxelGrid::sphere(1.0, 8, Point3::new(0, 0, 0), center, 4.0, Voxel::new(0));
        let high = VoxelGrid::sphere(1.0, 8, Point3::new(1, 1, 1), center, 4.0, Voxel::new(0));
        assert!(low.exists(7, 7, 7));
        assert!(high.exists(0, 0, 0));
        assert_eq!(low.count_existing(), high.count_existing());
    }
}
