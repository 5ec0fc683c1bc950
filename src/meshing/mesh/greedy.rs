//! Greedy meshing for a single voxel grid.
//!
//! The grid is swept once per face direction, one slice at a time. For each
//! slice a mask marks which cells still need a face: a cell is a candidate
//! when it exists and the neighbor on the face side is void (outside the grid
//! counts as void). Candidates are then merged into maximal rectangles, first
//! extending along the slice's column axis and then downward by whole rows, so
//! a whole flat wall of one block type collapses into a single quad.
//!
//! Generation is lazy: [`GreedyMesh`] only sweeps the next slice once the quads
//! of the previous one have been consumed, so callers can stream quads into a
//! vertex buffer without materializing the full list.

use bitvec::vec::BitVec;
use cgmath::Vector2;
use log::debug;
use web_time::Instant;

use crate::voxels::{
    grid::VoxelGrid,
    voxel::{voxel_side::VoxelSide, Voxel},
};

use super::quad::{Quad, Rectangle};

/// Face directions in the order the sweep emits them.
pub const SWEEP_ORDER: [VoxelSide; 6] = [
    VoxelSide::BOTTOM,
    VoxelSide::TOP,
    VoxelSide::WEST,
    VoxelSide::EAST,
    VoxelSide::NORTH,
    VoxelSide::SOUTH,
];

/// A merged face produced by the greedy sweep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GreedyQuad {
    /// Block type shared by every merged cell.
    pub block_type: u16,
    /// Orientation tag shared by every merged cell.
    pub orientation: u8,
    /// Direction the face looks towards.
    pub side: VoxelSide,
    /// Corners in grid-local world units.
    pub quad: Quad,
    /// Merged cells along the slice's column and row axes.
    pub dimensions: Vector2<usize>,
}

/// Maps a slice-local `(column, row)` cell plus slice index to grid coordinates.
///
/// ±Z slices use `(x, y)`, ±X slices use `(z, y)` and ±Y slices use `(x, z)`.
#[inline]
fn cell_of(side: VoxelSide, slice: usize, column: usize, row: usize) -> [usize; 3] {
    match side {
        VoxelSide::NORTH | VoxelSide::SOUTH => [column, row, slice],
        VoxelSide::WEST | VoxelSide::EAST => [slice, row, column],
        VoxelSide::TOP | VoxelSide::BOTTOM => [column, slice, row],
    }
}

/// Corners of a merged rectangle lying in the face plane of `slice`.
///
/// Positive faces sit on the far side of their cells (`slice + 1`), negative
/// faces on the near side (`slice`).
fn rectangle_corners(side: VoxelSide, slice: usize, rect: &Rectangle) -> [[usize; 3]; 4] {
    let plane = if side.is_positive() { slice + 1 } else { slice };
    let (l, r, t, b) = (rect.left, rect.right(), rect.top, rect.bottom());
    match side {
        VoxelSide::SOUTH => [[l, t, plane], [l, b, plane], [r, b, plane], [r, t, plane]],
        VoxelSide::NORTH => [[r, t, plane], [r, b, plane], [l, b, plane], [l, t, plane]],
        VoxelSide::EAST => [[plane, t, r], [plane, b, r], [plane, b, l], [plane, t, l]],
        VoxelSide::WEST => [[plane, t, l], [plane, b, l], [plane, b, r], [plane, t, r]],
        VoxelSide::TOP => [[l, plane, t], [r, plane, t], [r, plane, b], [l, plane, b]],
        VoxelSide::BOTTOM => [[l, plane, t], [l, plane, b], [r, plane, b], [r, plane, t]],
    }
}

/// Lazily generated greedy mesh of one grid.
///
/// Yields every quad of the `BOTTOM` sweep first, then `TOP`, `WEST`, `EAST`,
/// `NORTH` and finally `SOUTH`; within a direction, slices run from low to
/// high and rectangles in row-major order of their top-left cell.
pub struct GreedyMesh<'a> {
    grid: &'a VoxelGrid,
    /// Voxels of the current slice, indexed `column + row * grid_size`.
    plane: Vec<Voxel>,
    /// Cells that are already covered or do not need a face.
    processed: BitVec,
    side_index: usize,
    slice: usize,
    pending: Vec<GreedyQuad>,
    started: Instant,
    emitted: usize,
    finished: bool,
}

/// Starts a greedy sweep over `grid`.
///
/// The grid is only borrowed; nothing is computed until the iterator is
/// polled. An all-void grid or a grid of side 0 yields nothing.
pub fn generate_mesh(grid: &VoxelGrid) -> GreedyMesh<'_> {
    let cells = grid.grid_size() * grid.grid_size();
    GreedyMesh {
        grid,
        plane: vec![Voxel::EMPTY; cells],
        processed: BitVec::repeat(true, cells),
        side_index: 0,
        slice: 0,
        pending: Vec::new(),
        started: Instant::now(),
        emitted: 0,
        finished: false,
    }
}

impl GreedyMesh<'_> {
    /// Fills the slice buffers, returning whether any cell needs a face.
    fn fill_plane(&mut self, side: VoxelSide, slice: usize) -> bool {
        let n = self.grid.grid_size();
        let offset = side.offset();
        let mut any_open = false;

        for row in 0..n {
            for column in 0..n {
                let [x, y, z] = cell_of(side, slice, column, row);
                let voxel = self.grid[(x, y, z)];
                let open = voxel.exists
                    && !self.grid.exists(
                        x as i32 + offset.x,
                        y as i32 + offset.y,
                        z as i32 + offset.z,
                    );

                let index = column + row * n;
                self.plane[index] = voxel;
                self.processed.set(index, !open);
                any_open |= open;
            }
        }

        any_open
    }

    #[inline]
    fn mergeable(&self, column: usize, row: usize, seed: &Voxel) -> bool {
        let index = column + row * self.grid.grid_size();
        !self.processed[index] && self.plane[index].merges_with(seed)
    }

    /// Grows the largest rectangle anchored at `(column, row)` and marks it
    /// processed.
    fn find_rectangle(&mut self, column: usize, row: usize) -> (Rectangle, Voxel) {
        let n = self.grid.grid_size();
        let seed = self.plane[column + row * n];

        let mut right = column + 1;
        while right < n && self.mergeable(right, row, &seed) {
            right += 1;
        }

        let mut bottom = row + 1;
        while bottom < n && (column..right).all(|c| self.mergeable(c, bottom, &seed)) {
            bottom += 1;
        }

        for r in row..bottom {
            let start = column + r * n;
            self.processed[start..start + (right - column)].fill(true);
        }

        (Rectangle::new(column, row, right - column, bottom - row), seed)
    }

    /// Merges the open cells of the filled slice into pending quads.
    fn merge_plane(&mut self, side: VoxelSide, slice: usize) {
        let n = self.grid.grid_size();
        let voxel_size = self.grid.voxel_size();

        for row in 0..n {
            let mut column = 0;
            while column < n {
                if self.processed[column + row * n] {
                    column += 1;
                    continue;
                }

                let (rect, seed) = self.find_rectangle(column, row);
                let corners = rectangle_corners(side, slice, &rect);
                self.pending.push(GreedyQuad {
                    block_type: seed.block_type,
                    orientation: seed.orientation,
                    side,
                    quad: Quad::from_cell_corners(corners, side.normal(), voxel_size),
                    dimensions: Vector2::new(rect.width, rect.height),
                });
                column = rect.right();
            }
        }

        // Popped from the back by `next`.
        self.pending.reverse();
    }

    /// Sweeps slices until one produces quads. Returns `false` once every
    /// direction is done.
    fn advance(&mut self) -> bool {
        let n = self.grid.grid_size();

        while let Some(&side) = SWEEP_ORDER.get(self.side_index) {
            if self.slice >= n {
                self.side_index += 1;
                self.slice = 0;
                continue;
            }

            let slice = self.slice;
            self.slice += 1;
            if self.fill_plane(side, slice) {
                self.merge_plane(side, slice);
                if !self.pending.is_empty() {
                    return true;
                }
            }
        }

        if !self.finished {
            self.finished = true;
            debug!(
                "Greedy meshed grid {:?} into {} quads in {:?}",
                self.grid.coordinate(),
                self.emitted,
                self.started.elapsed()
            );
        }
        false
    }
}

impl Iterator for GreedyMesh<'_> {
    type Item = GreedyQuad;

    fn next(&mut self) -> Option<GreedyQuad> {
        loop {
            if let Some(quad) = self.pending.pop() {
                self.emitted += 1;
                return Some(quad);
            }
            if !self.advance() {
                return None;
            }
        }
    }
}

impl std::iter::FusedIterator for GreedyMesh<'_> {}
