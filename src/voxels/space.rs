//! # Voxel Space Module
//!
//! This module provides the `VoxelSpace` struct: a sparse lattice of equally
//! sized grids addressed by integer lattice coordinates.
//!
//! ## Coordinates
//!
//! - **Lattice coordinate**: which grid, e.g. `(1, 0, -2)`.
//! - **Local coordinate**: a cell inside one grid, `0..grid_size` per axis.
//! - **Global coordinate**: a cell anywhere in the space. The grid at lattice
//!   `L` covers global cells `L * grid_size .. L * grid_size + grid_size`.
//!
//! Cells not covered by any member grid are void: lookups report "does not
//! exist" instead of failing.
//!
//! ## Thread Safety
//!
//! Lookups take `&self` and only read-lock member grids, so any number may run
//! at once. Adding or removing grids takes `&mut self`; when a space is shared
//! between threads, wrap it in [`MtResource`] so structural edits exclude lookups.

use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use cgmath::Point3;
use log::debug;

use super::{
    grid::VoxelGrid,
    voxel::{voxel_side::VoxelSide, Voxel},
};
use crate::{
    core::MtResource,
    error::{DecodeError, EncodeError, VoxelError},
    serialization::VoxelSpaceData,
};

static NEXT_SPACE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the space a grid belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpaceId(u64);

/// A lattice of voxel grids sharing one side length and voxel size.
pub struct VoxelSpace {
    id: SpaceId,
    grid_size: usize,
    voxel_size: f32,
    /// Member grids keyed by lattice coordinate.
    members: HashMap<Point3<i32>, MtResource<VoxelGrid>>,
}

impl VoxelSpace {
    /// Creates a space with no member grids.
    pub fn new(grid_size: usize, voxel_size: f32) -> Self {
        VoxelSpace {
            id: SpaceId(NEXT_SPACE_ID.fetch_add(1, Ordering::Relaxed)),
            grid_size,
            voxel_size,
            members: HashMap::new(),
        }
    }

    /// This space's identity, as recorded in its member grids.
    pub fn id(&self) -> SpaceId {
        self.id
    }

    /// Cells per axis of every member grid.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// World units per cell edge of every member grid.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Number of member grids.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the space has no member grids.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds a grid at its own lattice coordinate, returning the grid it replaces.
    ///
    /// # Errors
    /// Returns [`VoxelError::GridMismatch`] if the grid's side length or voxel
    /// size differs from the space's.
    pub fn add_grid(
        &mut self,
        mut grid: VoxelGrid,
    ) -> Result<Option<MtResource<VoxelGrid>>, VoxelError> {
        if grid.grid_size() != self.grid_size || grid.voxel_size() != self.voxel_size {
            return Err(VoxelError::GridMismatch {
                grid_size: grid.grid_size(),
                voxel_size: grid.voxel_size(),
                space_grid_size: self.grid_size,
                space_voxel_size: self.voxel_size,
            });
        }

        let coordinate = grid.coordinate();
        grid.attach(self.id, coordinate);
        debug!("Adding grid at {:?} ({} voxels)", coordinate, grid.count_existing());
        Ok(self.members.insert(coordinate, MtResource::new(grid)))
    }

    /// Returns the grid at `coordinate`, creating an empty one if none exists.
    pub fn create_grid(&mut self, coordinate: Point3<i32>) -> MtResource<VoxelGrid> {
        let (id, grid_size, voxel_size) = (self.id, self.grid_size, self.voxel_size);
        self.members
            .entry(coordinate)
            .or_insert_with(|| {
                let mut grid = VoxelGrid::new(voxel_size, grid_size, coordinate);
                grid.attach(id, coordinate);
                MtResource::new(grid)
            })
            .clone()
    }

    /// Removes and returns the grid at `coordinate`.
    ///
    /// Meshes or physics state derived from the grid are owned elsewhere and
    /// become orphaned.
    pub fn remove_grid(&mut self, coordinate: Point3<i32>) -> Option<MtResource<VoxelGrid>> {
        let removed = self.members.remove(&coordinate);
        if removed.is_some() {
            debug!("Removed grid at {:?}", coordinate);
        }
        removed
    }

    /// The grid at a lattice coordinate.
    pub fn get_grid(&self, coordinate: Point3<i32>) -> Option<MtResource<VoxelGrid>> {
        self.members.get(&coordinate).cloned()
    }

    /// Whether a grid exists at a lattice coordinate.
    pub fn contains_grid(&self, coordinate: Point3<i32>) -> bool {
        self.members.contains_key(&coordinate)
    }

    /// Lattice coordinates of all member grids, in no particular order.
    pub fn coordinates(&self) -> impl Iterator<Item = Point3<i32>> + '_ {
        self.members.keys().copied()
    }

    /// All member grids, in no particular order.
    pub fn grids(&self) -> impl Iterator<Item = (Point3<i32>, &MtResource<VoxelGrid>)> {
        self.members.iter().map(|(coordinate, grid)| (*coordinate, grid))
    }

    /// Splits a global cell coordinate into lattice and local parts.
    ///
    /// Returns `None` only for a space whose grids have side length 0.
    pub fn split_global(&self, global: Point3<i32>) -> Option<(Point3<i32>, Point3<usize>)> {
        let n = i32::try_from(self.grid_size).ok().filter(|n| *n > 0)?;
        let lattice = global.map(|c| c.div_euclid(n));
        let local = global.map(|c| c.rem_euclid(n) as usize);
        Some((lattice, local))
    }

    /// Converts a local coordinate of the grid at `lattice` to a global one.
    ///
    /// The local coordinate may lie outside the grid. Returns `None` if the
    /// result does not fit in `i32`.
    pub fn to_global(&self, lattice: Point3<i32>, x: i32, y: i32, z: i32) -> Option<Point3<i32>> {
        let n = self.grid_size as i64;
        let axis = |l: i32, c: i32| i32::try_from(l as i64 * n + c as i64).ok();
        Some(Point3::new(axis(lattice.x, x)?, axis(lattice.y, y)?, axis(lattice.z, z)?))
    }

    /// Resolves a global cell to the grid that covers it and the local index.
    pub fn locate(&self, global: Point3<i32>) -> Option<(MtResource<VoxelGrid>, Point3<usize>)> {
        let (lattice, local) = self.split_global(global)?;
        self.get_grid(lattice).map(|grid| (grid, local))
    }

    /// Resolves a possibly out-of-range local coordinate of the grid at
    /// `lattice` to the grid that actually covers it.
    pub fn resolve(
        &self,
        lattice: Point3<i32>,
        x: i32,
        y: i32,
        z: i32,
    ) -> Option<(MtResource<VoxelGrid>, Point3<usize>)> {
        self.locate(self.to_global(lattice, x, y, z)?)
    }

    /// The voxel at a global cell; `None` if no grid covers it.
    pub fn get_voxel(&self, global: Point3<i32>) -> Option<Voxel> {
        let (grid, local) = self.locate(global)?;
        let voxel = grid.get()[(local.x, local.y, local.z)];
        Some(voxel)
    }

    /// Whether an existing voxel occupies a global cell. Uncovered cells are void.
    pub fn exists(&self, global: Point3<i32>) -> bool {
        self.get_voxel(global).is_some_and(|v| v.exists)
    }

    /// Like [`exists`](Self::exists) for a local coordinate of the grid at
    /// `lattice` that may lie outside that grid.
    pub fn exists_near(&self, lattice: Point3<i32>, x: i32, y: i32, z: i32) -> bool {
        self.to_global(lattice, x, y, z).is_some_and(|global| self.exists(global))
    }

    /// Replaces the voxel at a global cell, returning the previous value.
    ///
    /// # Errors
    /// Returns [`VoxelError::MissingGrid`] if no grid covers the cell.
    pub fn set_voxel(&self, global: Point3<i32>, voxel: Voxel) -> Result<Voxel, VoxelError> {
        let (grid, local) = self.locate(global).ok_or_else(|| {
            VoxelError::MissingGrid(self.split_global(global).map_or(global, |(l, _)| l))
        })?;
        let previous = grid.get_mut().set(local.x as i32, local.y as i32, local.z as i32, voxel)?;
        Ok(previous)
    }

    /// The six face-adjacent grids of the grid at `coordinate`.
    pub fn neighbors(
        &self,
        coordinate: Point3<i32>,
    ) -> [(VoxelSide, Option<MtResource<VoxelGrid>>); 6] {
        VoxelSide::all().map(|side| (side, self.get_grid(coordinate + side.offset())))
    }

    /// Copies the whole space into a snapshot, grids sorted by coordinate.
    ///
    /// # Errors
    /// [`EncodeError::GridSizeOverflow`] if the grid size exceeds `i32::MAX`.
    pub fn to_data(&self) -> Result<VoxelSpaceData, EncodeError> {
        let grid_size = i32::try_from(self.grid_size)
            .map_err(|_| EncodeError::GridSizeOverflow(self.grid_size))?;

        let mut grids: Vec<(Point3<i32>, Vec<_>)> = self
            .members
            .iter()
            .map(|(coordinate, grid)| (*coordinate, grid.get().voxels().to_vec()))
            .collect();
        grids.sort_by_key(|(c, _)| (c.x, c.y, c.z));

        Ok(VoxelSpaceData {
            grid_size,
            voxel_size: self.voxel_size,
            grids,
        })
    }

    /// Builds a space from a snapshot.
    ///
    /// # Errors
    /// Fails without building anything if the snapshot is inconsistent; see
    /// [`VoxelSpaceData::validate`].
    pub fn from_data(data: VoxelSpaceData) -> Result<Self, DecodeError> {
        let grid_size = data.validate()?;
        let mut space = VoxelSpace::new(grid_size, data.voxel_size);

        for (coordinate, voxels) in data.grids {
            let actual = voxels.len();
            let mut grid = VoxelGrid::from_voxels(data.voxel_size, grid_size, coordinate, voxels)
                .map_err(|_| DecodeError::GridLength {
                    coordinate,
                    expected: grid_size.pow(3),
                    actual,
                })?;
            grid.attach(space.id, coordinate);
            space.members.insert(coordinate, MtResource::new(grid));
        }

        Ok(space)
    }
}

impl fmt::Debug for VoxelSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoxelSpace")
            .field("id", &self.id)
            .field("grid_size", &self.grid_size)
            .field("voxel_size", &self.voxel_size)
            .field("grids", &self.members.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_with_origin_grid() -> VoxelSpace {
        let mut space = VoxelSpace::new(4, 1.0);
        let mut grid = VoxelGrid::new(1.0, 4, Point3::new(0, 0, 0));
        grid.set(3, 0, 0, Voxel::new(2)).unwrap();
        space.add_grid(grid).unwrap();
        space
    }

    #[test]
    fn split_global_handles_negatives() {
        let space = VoxelSpace::new(4, 1.0);
        assert_eq!(
            space.split_global(Point3::new(-1, 4, 7)),
            Some((Point3::new(-1, 1, 1), Point3::new(3, 0, 3)))
        );
        assert_eq!(VoxelSpace::new(0, 1.0).split_global(Point3::new(0, 0, 0)), None);
    }

    #[test]
    fn resolves_out_of_range_local_coordinates_through_neighbors() {
        let mut space = space_with_origin_grid();
        let east = space.create_grid(Point3::new(1, 0, 0));
        east.get_mut().set(0, 0, 0, Voxel::new(5)).unwrap();

        assert!(space.exists_near(Point3::new(0, 0, 0), 4, 0, 0));
        assert!(space.exists_near(Point3::new(1, 0, 0), -1, 0, 0));
        assert!(!space.exists_near(Point3::new(0, 0, 0), -1, 0, 0));

        let (grid, local) = space.resolve(Point3::new(0, 0, 0), 4, 0, 0).unwrap();
        assert!(grid.ptr_eq(&east));
        assert_eq!(local, Point3::new(0, 0, 0));
    }

    #[test]
    fn uncovered_cells_are_void() {
        let space = space_with_origin_grid();
        assert!(space.exists(Point3::new(3, 0, 0)));
        assert!(!space.exists(Point3::new(100, 0, 0)));
        assert_eq!(space.get_voxel(Point3::new(-5, 0, 0)), None);
        assert!(matches!(
            space.set_voxel(Point3::new(-5, 0, 0), Voxel::new(1)),
            Err(VoxelError::MissingGrid(c)) if c == Point3::new(-2, 0, 0)
        ));
    }

    #[test]
    fn rejects_mismatched_grids() {
        let mut space = VoxelSpace::new(4, 1.0);
        let result = space.add_grid(VoxelGrid::new(1.0, 8, Point3::new(0, 0, 0)));
        assert!(matches!(result, Err(VoxelError::GridMismatch { grid_size: 8, .. })));
        let result = space.add_grid(VoxelGrid::new(0.5, 4, Point3::new(0, 0, 0)));
        assert!(matches!(result, Err(VoxelError::GridMismatch { .. })));
        assert!(space.is_empty());
    }

    #[test]
    fn member_grids_know_their_space() {
        let mut space = space_with_origin_grid();
        let created = space.create_grid(Point3::new(0, 1, 0));
        assert_eq!(created.get().space(), Some(space.id()));
        assert_eq!(space.get_grid(Point3::new(0, 0, 0)).unwrap().get().space(), Some(space.id()));

        let neighbors = space.neighbors(Point3::new(0, 0, 0));
        let present: Vec<_> = neighbors
            .iter()
            .filter(|(_, grid)| grid.is_some())
            .map(|(side, _)| *side)
            .collect();
        assert_eq!(present, vec![VoxelSide::TOP]);

        assert!(space.remove_grid(Point3::new(0, 1, 0)).is_some());
        assert!(space.remove_grid(Point3::new(0, 1, 0)).is_none());
        assert_eq!(space.len(), 1);
    }

    #[test]
    fn set_voxel_mutates_member_grid() {
        let space = space_with_origin_grid();
        let before = space.get_grid(Point3::new(0, 0, 0)).unwrap().get().revision();
        let previous = space.set_voxel(Point3::new(1, 1, 1), Voxel::new(9)).unwrap();
        assert_eq!(previous, Voxel::EMPTY);
        assert_eq!(space.get_voxel(Point3::new(1, 1, 1)), Some(Voxel::new(9)));
        assert!(space.get_grid(Point3::new(0, 0, 0)).unwrap().get().revision() > before);
    }
}
