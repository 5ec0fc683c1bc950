//! # Configuration
//!
//! Runtime settings, read from a JSON file. Every field is optional and falls
//! back to its default:
//!
//! ```json
//! {
//!     "grid_size": 32,
//!     "voxel_size": 1.0,
//!     "worker_count": 8,
//!     "mesh_cache_capacity": 1024,
//!     "voxel_types": "assets/voxel_types.json"
//! }
//! ```

use std::{fs, path::Path, path::PathBuf, thread};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    voxels::voxel::voxel_type::{default_voxel_types, VoxelTypes},
};

/// Environment variable naming the configuration file used by the demo.
pub const CONFIG_ENV_VAR: &str = "VOXEL_SPACE_CONFIG";

/// Default cells per grid axis.
pub const DEFAULT_GRID_SIZE: usize = 32;

/// Default world units per voxel edge.
pub const DEFAULT_VOXEL_SIZE: f32 = 1.0;

/// Default number of cached grid meshes.
pub const DEFAULT_MESH_CACHE_CAPACITY: usize = 1024;

/// Settings for building spaces and meshing them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelConfig {
    /// Cells per grid axis for new spaces
    pub grid_size: usize,
    /// World units per voxel edge for new spaces
    pub voxel_size: f32,
    /// Background meshing threads; 0 meshes on the calling thread
    pub worker_count: usize,
    /// Maximum number of cached grid meshes
    pub mesh_cache_capacity: usize,
    /// JSON block type table; the built-in table when absent
    pub voxel_types: Option<PathBuf>,
}

impl Default for VoxelConfig {
    fn default() -> Self {
        VoxelConfig {
            grid_size: DEFAULT_GRID_SIZE,
            voxel_size: DEFAULT_VOXEL_SIZE,
            worker_count: thread::available_parallelism().map_or(1, |n| n.get()),
            mesh_cache_capacity: DEFAULT_MESH_CACHE_CAPACITY,
            voxel_types: None,
        }
    }
}

impl VoxelConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reads the file named by [`CONFIG_ENV_VAR`], or returns the defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the configured block type table.
    ///
    /// A relative path is resolved against the current directory.
    pub fn load_voxel_types(&self) -> Result<VoxelTypes, ConfigError> {
        match &self.voxel_types {
            Some(path) => VoxelTypes::load(path),
            None => Ok(default_voxel_types()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = VoxelConfig::from_json(r#"{ "grid_size": 16, "worker_count": 0 }"#).unwrap();
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.worker_count, 0);
        assert_eq!(config.voxel_size, DEFAULT_VOXEL_SIZE);
        assert_eq!(config.mesh_cache_capacity, DEFAULT_MESH_CACHE_CAPACITY);
        assert_eq!(config.load_voxel_types().unwrap(), default_voxel_types());
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            VoxelConfig::from_json(r#"{ "grid_size": "big" }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            VoxelConfig::load("/nonexistent/voxel_space.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn default_has_a_worker() {
        assert!(VoxelConfig::default().worker_count >= 1);
    }
}
