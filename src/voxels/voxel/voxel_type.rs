//! # Voxel Type Module
//!
//! Per block-type metadata shared read-only by every grid: the type's name,
//! whether neighbors can be seen through it, and where its faces live in the
//! texture atlas.
//!
//! Tables are normally loaded from JSON:
//!
//! ```json
//! [
//!   { "name": "dirt", "transparent": false,
//!     "texture": { "top": [3, 0], "side": [3, 0], "bottom": [3, 0] } }
//! ]
//! ```

use std::{fs, ops::Index, path::Path};

use serde::{Deserialize, Serialize};

use super::voxel_side::VoxelSide;
use crate::error::ConfigError;

/// Atlas origins of a type's textures, in tile units.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureCoords {
    /// Texture of the +Y face.
    pub top: [f32; 2],
    /// Texture of the four vertical faces.
    pub side: [f32; 2],
    /// Texture of the -Y face.
    pub bottom: [f32; 2],
}

impl TextureCoords {
    /// The same texture on every face.
    pub fn uniform(origin: [f32; 2]) -> Self {
        TextureCoords {
            top: origin,
            side: origin,
            bottom: origin,
        }
    }

    /// Picks the texture shown on `side`.
    pub fn for_side(&self, side: VoxelSide) -> [f32; 2] {
        match side {
            VoxelSide::TOP => self.top,
            VoxelSide::BOTTOM => self.bottom,
            VoxelSide::NORTH | VoxelSide::SOUTH | VoxelSide::EAST | VoxelSide::WEST => self.side,
        }
    }
}

/// Metadata for one block type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelType {
    /// Human readable name.
    pub name: String,
    /// Whether faces behind this type stay visible.
    #[serde(default)]
    pub transparent: bool,
    /// Texture atlas origins.
    pub texture: TextureCoords,
}

impl VoxelType {
    /// Creates a type using one texture on every face.
    pub fn new(name: impl Into<String>, transparent: bool, origin: [f32; 2]) -> Self {
        VoxelType {
            name: name.into(),
            transparent,
            texture: TextureCoords::uniform(origin),
        }
    }
}

/// The standard set of block types, in id order.
pub const DEFAULT_VOXEL_TYPE_NAMES: [&str; 10] = [
    "wood",
    "brick grey",
    "brick red",
    "dirt",
    "ice",
    "stone",
    "sand",
    "cactus top",
    "glass",
    "greysand",
];

/// The block type table, indexed by `Voxel::block_type`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoxelTypes {
    types: Vec<VoxelType>,
}

impl VoxelTypes {
    /// Wraps an ordered list of types.
    pub fn new(types: Vec<VoxelType>) -> Self {
        VoxelTypes { types }
    }

    /// Parses a JSON array of types.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON array of types from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let types = Self::from_json(&fs::read_to_string(path)?)?;
        log::info!("Loaded {} voxel types from {}", types.len(), path.display());
        Ok(types)
    }

    /// Looks up a type by id.
    pub fn get(&self, block_type: u16) -> Option<&VoxelType> {
        self.types.get(block_type as usize)
    }

    /// Whether the type lets hidden faces show through.
    ///
    /// Ids without an entry are treated as opaque.
    pub fn is_transparent(&self, block_type: u16) -> bool {
        self.get(block_type).is_some_and(|t| t.transparent)
    }

    /// Finds the id of the type with the given name.
    pub fn id_of(&self, name: &str) -> Option<u16> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .and_then(|i| u16::try_from(i).ok())
    }

    /// Number of types in the table.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &VoxelType> {
        self.types.iter()
    }
}

/// The standard table: one atlas row, glass and ice transparent.
pub fn default_voxel_types() -> VoxelTypes {
    VoxelTypes::new(
        DEFAULT_VOXEL_TYPE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                VoxelType::new(*name, matches!(*name, "glass" | "ice"), [i as f32, 0.0])
            })
            .collect(),
    )
}

impl Index<u16> for VoxelTypes {
    type Output = VoxelType;

    fn index(&self, block_type: u16) -> &Self::Output {
        &self.types[block_type as usize]
    }
}
