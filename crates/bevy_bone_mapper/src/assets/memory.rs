use std::collections::{BTreeMap, BTreeSet};

use super::{
    AssetDatabase, ImportedModel, ModelImportSettings, RigSerial,
    import::{import_model, reimport_settings},
    parent_folder,
};
use crate::{
    errors::{AssetError, AssetResult},
    rig::HumanDescription,
};

#[derive(Debug, Clone)]
enum MemoryAsset {
    Model {
        rig: RigSerial,
        settings: ModelImportSettings,
    },
    Description(HumanDescription),
    Other,
}

/// In-process asset database, for hosts without a file system.
///
/// Keeps count of copies and re-imports so callers can tell whether the expensive
/// duplicate-and-reimport path ran.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetDatabase {
    folders: BTreeSet<String>,
    assets: BTreeMap<String, MemoryAsset>,
    copy_count: usize,
    reimport_count: usize,
}

impl MemoryAssetDatabase {
    pub fn add_model(&mut self, path: &str, rig: RigSerial, settings: ModelImportSettings) {
        self.add_parent_folders(path);
        self.assets
            .insert(path.to_string(), MemoryAsset::Model { rig, settings });
    }

    pub fn add_description(&mut self, path: &str, description: HumanDescription) {
        self.add_parent_folders(path);
        self.assets
            .insert(path.to_string(), MemoryAsset::Description(description));
    }

    /// Adds an asset that is neither a model nor an avatar description.
    pub fn add_other(&mut self, path: &str) {
        self.add_parent_folders(path);
        self.assets.insert(path.to_string(), MemoryAsset::Other);
    }

    pub fn copy_count(&self) -> usize {
        self.copy_count
    }

    pub fn reimport_count(&self) -> usize {
        self.reimport_count
    }

    fn add_parent_folders(&mut self, path: &str) {
        let mut folder = parent_folder(path);
        while !folder.is_empty() {
            self.folders.insert(folder.to_string());
            folder = parent_folder(folder);
        }
    }
}

impl AssetDatabase for MemoryAssetDatabase {
    fn exists(&self, path: &str) -> bool {
        self.assets.contains_key(path) || self.folders.contains(path)
    }

    fn is_valid_folder(&self, path: &str) -> bool {
        path.is_empty() || self.folders.contains(path)
    }

    fn create_folder(&mut self, path: &str) -> AssetResult<()> {
        if self.assets.contains_key(path) {
            return Err(AssetError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "an asset has this path"),
            ));
        }
        self.add_parent_folders(path);
        self.folders.insert(path.to_string());
        Ok(())
    }

    fn folder_entries(&self, path: &str) -> AssetResult<Vec<String>> {
        if !self.is_valid_folder(path) {
            return Err(AssetError::Missing(path.to_string()));
        }
        let entries: BTreeSet<String> = self
            .assets
            .keys()
            .chain(self.folders.iter())
            .filter(|entry| entry.as_str() != path && parent_folder(entry) == path)
            .map(|entry| entry.rsplit('/').next().unwrap_or(entry).to_string())
            .collect();
        Ok(entries.into_iter().collect())
    }

    fn copy_asset(&mut self, from: &str, to: &str) -> AssetResult<()> {
        let asset = self
            .assets
            .get(from)
            .cloned()
            .ok_or_else(|| AssetError::Missing(from.to_string()))?;
        if !self.is_valid_folder(parent_folder(to)) {
            return Err(AssetError::Missing(parent_folder(to).to_string()));
        }
        self.assets.insert(to.to_string(), asset);
        self.copy_count += 1;
        Ok(())
    }

    fn delete_asset(&mut self, path: &str) -> AssetResult<bool> {
        Ok(self.assets.remove(path).is_some())
    }

    fn import_settings(&self, path: &str) -> AssetResult<Option<ModelImportSettings>> {
        Ok(match self.assets.get(path) {
            Some(MemoryAsset::Model { settings, .. }) => Some(settings.clone()),
            _ => None,
        })
    }

    fn save_and_reimport(
        &mut self,
        path: &str,
        new_settings: &ModelImportSettings,
    ) -> AssetResult<()> {
        match self.assets.get_mut(path) {
            Some(MemoryAsset::Model { rig, settings }) => {
                *settings = reimport_settings(rig, new_settings);
                self.reimport_count += 1;
                Ok(())
            }
            Some(_) => Err(AssetError::NotAModel(path.to_string())),
            None => Err(AssetError::Missing(path.to_string())),
        }
    }

    fn load_model(&self, path: &str) -> AssetResult<Option<ImportedModel>> {
        Ok(match self.assets.get(path) {
            Some(MemoryAsset::Model { rig, settings }) => Some(import_model(path, rig, settings)),
            _ => None,
        })
    }

    fn load_human_description(&self, path: &str) -> AssetResult<Option<HumanDescription>> {
        Ok(match self.assets.get(path) {
            Some(MemoryAsset::Description(description)) => Some(description.clone()),
            _ => None,
        })
    }
}
