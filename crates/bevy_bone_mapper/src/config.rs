use std::{fs, path::Path};

use bevy::{prelude::Resource, reflect::Reflect};
use serde::{Deserialize, Serialize};

use crate::errors::{AssetError, AssetResult};

/// Mapper configuration. Loadable from a `.ron` file; missing fields take their defaults.
///
/// ```ron
/// (
///     scratch_folder: "__temp_humanoid_maps",
///     scratch_suffix: "__TMP",
/// )
/// ```
#[derive(Resource, Reflect, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneMapperSettings {
    /// Folder, relative to the asset root, where model duplicates are re-imported. Shared by
    /// every extraction and left empty after each one.
    pub scratch_folder: String,
    /// Appended to the model's file stem to name its duplicate.
    pub scratch_suffix: String,
}

impl Default for BoneMapperSettings {
    fn default() -> Self {
        Self {
            scratch_folder: "__temp_humanoid_maps".into(),
            scratch_suffix: "__TMP".into(),
        }
    }
}

impl BoneMapperSettings {
    pub fn load(path: &Path) -> AssetResult<Self> {
        let display = path.to_string_lossy().into_owned();
        let text = fs::read_to_string(path).map_err(|err| AssetError::io(display.as_str(), err))?;
        ron::de::from_str(&text).map_err(|err| AssetError::ron(display.as_str(), err))
    }
}
