//! Asset-side operations the mapper needs from its host: duplicating a model, forcing it through
//! a humanoid re-import, loading the result, and cleaning up.
//!
//! Asset paths are `/`-separated and relative to the database root. The kind of an asset is
//! given by its compound extension:
//! - `*.rig.ron`: a re-importable model ([`RigSerial`]), with its import settings
//!   ([`ModelImportSettings`]) in a `*.rig.ron.meta` sidecar.
//! - `*.avatar.ron`: a standalone [`HumanDescription`](crate::rig::HumanDescription).

pub mod auto_mapper;
pub mod file;
pub mod import;
pub mod memory;
pub mod serial;

use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::{errors::AssetResult, rig::HumanDescription};

pub use file::FileAssetDatabase;
pub use import::ImportedModel;
pub use memory::MemoryAssetDatabase;
pub use serial::{BoneSerial, RigSerial};

pub const MODEL_EXTENSION: &str = ".rig.ron";
pub const AVATAR_EXTENSION: &str = ".avatar.ron";
pub const META_EXTENSION: &str = ".meta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    AvatarDescription,
    Other,
}

impl AssetKind {
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(MODEL_EXTENSION) {
            Self::Model
        } else if path.ends_with(AVATAR_EXTENSION) {
            Self::AvatarDescription
        } else {
            Self::Other
        }
    }
}

/// How a model's hierarchy is configured for animation.
#[derive(
    Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum AnimationType {
    None,
    #[default]
    Generic,
    Humanoid,
}

/// Import configuration of a model asset.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelImportSettings {
    pub animation_type: AnimationType,
    /// Generate a humanoid description from bone names on re-import when none is set.
    #[serde(default)]
    pub auto_generate_avatar_mapping: bool,
    #[serde(default)]
    pub human_description: HumanDescription,
}

/// Storage of model and avatar assets.
pub trait AssetDatabase {
    fn exists(&self, path: &str) -> bool;

    fn is_valid_folder(&self, path: &str) -> bool;

    /// Creates `path` and any missing parent folders.
    fn create_folder(&mut self, path: &str) -> AssetResult<()>;

    /// Names of the direct entries of a folder, sorted.
    fn folder_entries(&self, path: &str) -> AssetResult<Vec<String>>;

    /// Copies an asset together with its import settings.
    fn copy_asset(&mut self, from: &str, to: &str) -> AssetResult<()>;

    /// Deletes an asset together with its import settings. Returns whether anything existed.
    fn delete_asset(&mut self, path: &str) -> AssetResult<bool>;

    /// Import settings of a model. `None` for assets that are not re-importable models.
    fn import_settings(&self, path: &str) -> AssetResult<Option<ModelImportSettings>>;

    /// Marks the importer of `path` dirty with `settings`, persists them and re-imports the
    /// model.
    fn save_and_reimport(&mut self, path: &str, settings: &ModelImportSettings)
    -> AssetResult<()>;

    /// Root of the imported model at `path`, or `None` if there is no such model.
    fn load_model(&self, path: &str) -> AssetResult<Option<ImportedModel>>;

    /// Standalone avatar description at `path`, or `None` if there is none.
    fn load_human_description(&self, path: &str) -> AssetResult<Option<HumanDescription>>;

    fn asset_kind(&self, path: &str) -> AssetKind {
        AssetKind::from_path(path)
    }

    /// Returns `path` if it is free, otherwise the first free `"<stem> N<ext>"` variant.
    fn generate_unique_asset_path(&self, path: &str) -> String {
        if !self.exists(path) {
            return path.to_string();
        }
        let (stem, ext) = split_asset_extension(path);
        (1..)
            .map(|n| format!("{stem} {n}{ext}"))
            .find(|candidate| !self.exists(candidate))
            .unwrap_or_else(|| path.to_string())
    }
}

/// Splits `path` before the first `.` of its file name, so compound extensions such as
/// `.rig.ron` stay whole.
pub fn split_asset_extension(path: &str) -> (&str, &str) {
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].find('.') {
        Some(dot) => path.split_at(file_start + dot),
        None => (path, ""),
    }
}

/// File name of `path` without its (compound) extension.
pub fn file_stem(path: &str) -> &str {
    let (stem, _) = split_asset_extension(path);
    stem.rsplit('/').next().unwrap_or(stem)
}

/// Parent folder of `path`; the empty string for top-level entries.
pub fn parent_folder(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

pub fn join_path(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", folder.trim_end_matches('/'), name)
    }
}

pub(crate) fn meta_path(path: &str) -> String {
    format!("{path}{META_EXTENSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_extensions_stay_whole() {
        assert_eq!(
            split_asset_extension("models/hero.rig.ron"),
            ("models/hero", ".rig.ron")
        );
        assert_eq!(split_asset_extension("a.b/noext"), ("a.b/noext", ""));
        assert_eq!(file_stem("models/hero.rig.ron"), "hero");
        assert_eq!(parent_folder("models/hero.rig.ron"), "models");
        assert_eq!(parent_folder("hero.rig.ron"), "");
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("tmp/", "a"), "tmp/a");
    }

    #[test]
    fn asset_kinds_follow_extension() {
        assert_eq!(AssetKind::from_path("x/hero.rig.ron"), AssetKind::Model);
        assert_eq!(
            AssetKind::from_path("x/hero.avatar.ron"),
            AssetKind::AvatarDescription
        );
        assert_eq!(AssetKind::from_path("x/hero.png"), AssetKind::Other);
    }

    #[test]
    fn unique_paths_skip_taken_names() {
        let mut db = MemoryAssetDatabase::default();
        let rig = RigSerial::new(BoneSerial::new("Root"));
        db.add_model("tmp/hero__TMP.rig.ron", rig.clone(), Default::default());
        db.add_model("tmp/hero__TMP 1.rig.ron", rig, Default::default());

        assert_eq!(
            db.generate_unique_asset_path("tmp/hero__TMP.rig.ron"),
            "tmp/hero__TMP 2.rig.ron"
        );
        assert_eq!(
            db.generate_unique_asset_path("tmp/villain__TMP.rig.ron"),
            "tmp/villain__TMP.rig.ron"
        );
    }
}
