//! # Voxel Data Model
//!
//! This module contains the spatial data model that the mesh generators read.
//!
//! ## Architecture
//!
//! * **Voxel**: a single cell value, the six cell faces, and the block type table
//! * **Grid**: a fixed-size dense cube of voxels, one chunk of the world
//! * **Space**: a sparse lattice of grids with neighbor lookup across chunk borders
//!
//! ## Data Flow
//!
//! 1. Grids are created empty, generated by a caller, or decoded from a snapshot
//! 2. The space owns them behind [`MtResource`](crate::core::MtResource) handles
//! 3. Mutations bump the grid's revision, marking earlier meshes stale
//! 4. Mesh generators read one grid (or a grid plus its space) at a time

pub mod grid;
pub mod space;
pub mod voxel;
