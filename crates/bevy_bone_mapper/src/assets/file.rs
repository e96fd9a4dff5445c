use std::{fs, path::PathBuf};

use bevy::log::info;
use serde::{Serialize, de::DeserializeOwned};

use super::{
    AssetDatabase, AssetKind, ImportedModel, ModelImportSettings, RigSerial,
    import::{import_model, reimport_settings},
    meta_path,
};
use crate::{
    errors::{AssetError, AssetResult},
    rig::HumanDescription,
};

/// Asset database over a folder on disk.
pub struct FileAssetDatabase {
    root: PathBuf,
}

impl FileAssetDatabase {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn read_ron<T: DeserializeOwned>(&self, path: &str) -> AssetResult<T> {
        let text =
            fs::read_to_string(self.full_path(path)).map_err(|err| AssetError::io(path, err))?;
        ron::de::from_str(&text).map_err(|err| AssetError::ron(path, err))
    }

    fn write_ron<T: Serialize>(&self, path: &str, value: &T) -> AssetResult<()> {
        let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?;
        fs::write(self.full_path(path), text).map_err(|err| AssetError::io(path, err))
    }

    fn read_rig(&self, path: &str) -> AssetResult<RigSerial> {
        self.read_ron(path)
    }

    fn remove_file_if_present(&self, path: &str) -> AssetResult<bool> {
        match fs::remove_file(self.full_path(path)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(AssetError::io(path, err)),
        }
    }
}

impl AssetDatabase for FileAssetDatabase {
    fn exists(&self, path: &str) -> bool {
        self.full_path(path).exists()
    }

    fn is_valid_folder(&self, path: &str) -> bool {
        self.full_path(path).is_dir()
    }

    fn create_folder(&mut self, path: &str) -> AssetResult<()> {
        info!("Creating asset folder {:?}", path);
        fs::create_dir_all(self.full_path(path)).map_err(|err| AssetError::io(path, err))
    }

    fn folder_entries(&self, path: &str) -> AssetResult<Vec<String>> {
        let dir = fs::read_dir(self.full_path(path)).map_err(|err| AssetError::io(path, err))?;
        let mut entries = vec![];
        for entry in dir {
            let entry = entry.map_err(|err| AssetError::io(path, err))?;
            entries.push(entry.file_name().to_string_lossy().into_owned());
        }
        entries.sort();
        Ok(entries)
    }

    fn copy_asset(&mut self, from: &str, to: &str) -> AssetResult<()> {
        if !self.full_path(from).is_file() {
            return Err(AssetError::Missing(from.to_string()));
        }
        fs::copy(self.full_path(from), self.full_path(to)).map_err(|err| AssetError::io(to, err))?;

        let (from_meta, to_meta) = (meta_path(from), meta_path(to));
        if self.full_path(&from_meta).is_file() {
            fs::copy(self.full_path(&from_meta), self.full_path(&to_meta))
                .map_err(|err| AssetError::io(&to_meta, err))?;
        }
        Ok(())
    }

    fn delete_asset(&mut self, path: &str) -> AssetResult<bool> {
        let removed_meta = self.remove_file_if_present(&meta_path(path))?;
        let removed = self.remove_file_if_present(path)?;
        Ok(removed || removed_meta)
    }

    fn import_settings(&self, path: &str) -> AssetResult<Option<ModelImportSettings>> {
        if self.asset_kind(path) != AssetKind::Model || !self.full_path(path).is_file() {
            return Ok(None);
        }
        let meta = meta_path(path);
        if !self.full_path(&meta).is_file() {
            return Ok(Some(ModelImportSettings::default()));
        }
        self.read_ron(&meta).map(Some)
    }

    fn save_and_reimport(
        &mut self,
        path: &str,
        settings: &ModelImportSettings,
    ) -> AssetResult<()> {
        if self.asset_kind(path) != AssetKind::Model {
            return Err(AssetError::NotAModel(path.to_string()));
        }
        let rig = self.read_rig(path)?;
        let reimported = reimport_settings(&rig, settings);
        self.write_ron(&meta_path(path), &reimported)
    }

    fn load_model(&self, path: &str) -> AssetResult<Option<ImportedModel>> {
        let Some(settings) = self.import_settings(path)? else {
            return Ok(None);
        };
        let rig = self.read_rig(path)?;
        Ok(Some(import_model(path, &rig, &settings)))
    }

    fn load_human_description(&self, path: &str) -> AssetResult<Option<HumanDescription>> {
        if self.asset_kind(path) != AssetKind::AvatarDescription || !self.full_path(path).is_file()
        {
            return Ok(None);
        }
        self.read_ron(path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        assets::{AnimationType, BoneSerial},
        rig::HumanoidAnimator,
    };

    /// Scratch directory under the system temp dir, removed on drop
    struct TestDir(PathBuf);

    impl TestDir {
        fn new() -> Self {
            static COUNTER: AtomicUsize = AtomicUsize::new(0);
            let dir = std::env::temp_dir().join(format!(
                "bevy_bone_mapper_test_{}_{}",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::Relaxed)
            ));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn write_rig(db: &FileAssetDatabase, path: &str) {
        let rig = RigSerial::new(BoneSerial::chain(["Armature", "Hips", "Spine", "Head"]).unwrap());
        db.write_ron(path, &rig).unwrap();
    }

    #[test]
    fn copy_reimport_and_delete_roundtrip() {
        let dir = TestDir::new();
        let mut db = FileAssetDatabase::new(&dir.0);
        write_rig(&db, "hero.rig.ron");

        db.create_folder("tmp").unwrap();
        db.copy_asset("hero.rig.ron", "tmp/hero.rig.ron").unwrap();
        assert_eq!(db.folder_entries("tmp").unwrap(), vec!["hero.rig.ron"]);

        let settings = ModelImportSettings {
            animation_type: AnimationType::Humanoid,
            auto_generate_avatar_mapping: true,
            ..Default::default()
        };
        db.save_and_reimport("tmp/hero.rig.ron", &settings).unwrap();
        let stored = db.import_settings("tmp/hero.rig.ron").unwrap().unwrap();
        assert!(!stored.human_description.is_empty());

        let model = db.load_model("tmp/hero.rig.ron").unwrap().unwrap();
        assert!(model.world.get::<HumanoidAnimator>(model.root).is_some());

        assert!(db.delete_asset("tmp/hero.rig.ron").unwrap());
        assert!(db.folder_entries("tmp").unwrap().is_empty());
        assert_eq!(
            db.import_settings("hero.rig.ron").unwrap(),
            Some(ModelImportSettings::default())
        );
    }

    #[test]
    fn non_models_have_no_settings() {
        let dir = TestDir::new();
        let db = FileAssetDatabase::new(&dir.0);
        let mut description = HumanDescription::default();
        description.push(crate::bone_role::BoneRole::Hips, "Hips");
        db.write_ron("hero.avatar.ron", &description).unwrap();

        assert_eq!(db.import_settings("hero.avatar.ron").unwrap(), None);
        assert_eq!(
            db.load_human_description("hero.avatar.ron").unwrap(),
            Some(description)
        );
        assert!(db.load_model("missing.rig.ron").unwrap().is_none());
    }
}
