#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Space
//!
//! Chunked voxel storage with greedy and naive mesh generation and a compact
//! binary snapshot format.
//!
//! ## Key Modules
//!
//! * `voxels` - Voxels, fixed-size grids and the sparse space of grids
//! * `meshing` - Greedy and naive mesh generators, meshes and the mesh cache
//! * `serialization` - The `.cvx` snapshot codec
//! * `task_management` - Background execution of meshing work
//! * `core` - Shared-ownership primitives used across threads
//! * `config` - JSON configuration
//!
//! ## Usage
//!
//! ```
//! use cgmath::Point3;
//! use voxel_space::{meshing::mesh::greedy, voxels::{grid::VoxelGrid, voxel::Voxel}};
//!
//! let grid = VoxelGrid::solid(1.0, 8, Point3::new(0, 0, 0), Voxel::new(3));
//! assert_eq!(greedy::generate_mesh(&grid).count(), 6);
//! ```

use std::{error::Error, path::PathBuf, sync::Arc};

use cgmath::Point3;
use log::info;
use web_time::Instant;

pub mod config;
pub mod core;
pub mod error;
pub mod meshing;
pub mod serialization;
pub mod task_management;
pub mod voxels;

pub use config::VoxelConfig;
pub use error::{ConfigError, DecodeError, EncodeError, VoxelError};

use crate::{
    core::MtResource,
    meshing::{mesh::naive, tasks::GridMeshTask, MeshCache},
    task_management::TaskManager,
    voxels::{grid::VoxelGrid, space::VoxelSpace, voxel::Voxel},
};

/// Stopwatch label of the demo's meshing phase.
pub const DEMO_MESHING_STOPWATCH: &str = "Demo Meshing";

/// Installs the logger, filtered by `RUST_LOG` and writing to stdout.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

/// Builds a small planet spread over several grids, meshes it in the
/// background, compares greedy and naive output and writes the space to
/// `output` (or the system temp directory).
pub fn run(output: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    init_logging();
    info!("Logger initialized");

    let config = VoxelConfig::from_env()?;
    let types = Arc::new(config.load_voxel_types()?);
    let n = config.grid_size;

    let radius = n as f32 * 0.9;
    let center = Point3::new(n as f32, n as f32, n as f32);
    let stone = Voxel::new(types.id_of("stone").unwrap_or(0));
    let mut space = VoxelSpace::new(n, config.voxel_size);
    for x in 0..2 {
        for y in 0..2 {
            for z in 0..2 {
                let coordinate = Point3::new(x, y, z);
                let grid =
                    VoxelGrid::sphere(config.voxel_size, n, coordinate, center, radius, stone);
                space.add_grid(grid)?;
            }
        }
    }
    info!("Generated {:?}", space);

    let started = Instant::now();
    let cache = MtResource::new(MeshCache::new(config.mesh_cache_capacity));
    let mut task_manager = TaskManager::new(config.worker_count)?;
    for (_, grid) in space.grids() {
        let task = GridMeshTask::new(grid.clone(), types.clone(), cache.clone());
        task_manager.publish_task(Box::new(task));
    }
    task_manager.wait_until_idle();
    info!("{}: {:?}", DEMO_MESHING_STOPWATCH, started.elapsed());

    for (coordinate, grid) in space.grids() {
        let grid = grid.get();
        let Some(mesh) = cache.get_mut().get(coordinate, grid.revision()) else {
            continue;
        };
        let faces = naive::generate_mesh_in_space(&space, &grid, &types).count();
        info!(
            "Grid {:?}: {} voxels, {} greedy quads, {} naive faces",
            coordinate,
            grid.count_existing(),
            mesh.quad_count(),
            faces
        );
    }

    let path = output.unwrap_or_else(|| {
        let file_name = format!("voxel_space_demo.{}", serialization::VOXEL_SPACE_EXTENSION);
        std::env::temp_dir().join(file_name)
    });
    serialization::save(&space, &path)?;
    let loaded = serialization::load(&path)?;
    info!("Round trip kept {} of {} grids", loaded.len(), space.len());

    Ok(())
}
