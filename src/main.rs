//! # Voxel Space Demo
//!
//! Builds a small multi-grid planet, meshes it on the task workers and writes
//! it to a `.cvx` file.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [output.cvx]
//! ```
//!
//! Settings are read from the JSON file named by `VOXEL_SPACE_CONFIG`.

use std::{path::PathBuf, process::ExitCode};

fn main() -> ExitCode {
    let output = std::env::args_os().nth(1).map(PathBuf::from);
    match voxel_space::run(output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
