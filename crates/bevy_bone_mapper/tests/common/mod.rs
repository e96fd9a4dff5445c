#![allow(dead_code)]

use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use bevy::ecs::{entity::Entity, hierarchy::ChildOf, name::Name, world::World};
use bevy_bone_mapper::{
    BoneRole,
    assets::{
        AssetDatabase, BoneSerial, ImportedModel, MemoryAssetDatabase, ModelImportSettings,
        RigSerial,
    },
    errors::{AssetError, AssetResult},
    rig::{Avatar, HumanDescription, HumanoidAnimator},
};

pub const HERO_PATH: &str = "models/hero.rig.ron";

const ARM: &[&str] = &["Shoulder", "UpperArm", "LowerArm", "Hand", "IndexProximal"];
const LEG: &[&str] = &["UpperLeg", "LowerLeg", "Foot", "Toes"];

fn limb(side: &str, parts: &[&str]) -> BoneSerial {
    let names: Vec<String> = parts.iter().map(|part| format!("{side}{part}")).collect();
    BoneSerial::chain(names.iter().map(String::as_str)).expect("limb has bones")
}

/// A full humanoid skeleton whose bones are named after their roles, under a root named `root`.
pub fn humanoid_rig(root: &str) -> RigSerial {
    let arm = |side: &str| limb(side, ARM);
    let leg = |side: &str| limb(side, LEG);
    let neck = BoneSerial::chain(["Neck", "Head"]).expect("neck has bones");
    let chest = BoneSerial::new("Chest").with_children([neck, arm("Left"), arm("Right")]);
    let spine = BoneSerial::new("Spine").with_children([chest]);
    let hips = BoneSerial::new("Hips").with_children([spine, leg("Left"), leg("Right")]);
    RigSerial::new(BoneSerial::new(root).with_children([hips]))
}

/// A rig whose bone names mean nothing to the auto-mapper.
pub fn opaque_rig(root: &str) -> RigSerial {
    let bones = BoneSerial::chain([root, "Bone001", "Bone002", "Bone003"]);
    RigSerial::new(bones.expect("rig has bones"))
}

/// Loads the model at `path` and instantiates it into `world`.
pub fn instantiate(db: &impl AssetDatabase, world: &mut World, path: &str) -> Entity {
    let model: ImportedModel = db
        .load_model(path)
        .expect("model loads")
        .expect("model exists");
    model.instantiate(world, path)
}

pub fn rename(world: &mut World, entity: Entity, name: &str) {
    world.entity_mut(entity).insert(Name::new(name.to_string()));
}

/// A rig built in place, already bound to a humanoid avatar for the given roles.
pub fn bound_humanoid(world: &mut World, roles: &[BoneRole]) -> (Entity, Vec<Entity>) {
    let root = world.spawn(Name::new("Bound")).id();
    let mut animator = HumanoidAnimator::new(Avatar::humanoid(
        None,
        BoneRole::REQUIRED
            .iter()
            .map(|role| (*role, role.as_str().to_string()))
            .collect::<HumanDescription>(),
    ));
    let mut bones = vec![];
    for role in roles {
        let bone = world
            .spawn((Name::new(role.as_str().to_string()), ChildOf(root)))
            .id();
        animator = animator.with_binding(*role, bone);
        bones.push(bone);
    }
    world.entity_mut(root).insert(animator);
    (root, bones)
}

/// Scratch folder entries left behind.
pub fn scratch_entries(db: &impl AssetDatabase, folder: &str) -> Vec<String> {
    if !db.is_valid_folder(folder) {
        return vec![];
    }
    db.folder_entries(folder).expect("scratch folder is listable")
}

/// Memory database with switchable failures.
#[derive(Default)]
pub struct FlakyDatabase {
    pub inner: MemoryAssetDatabase,
    pub fail_reimport: bool,
    pub fail_load: bool,
    pub fail_settings: bool,
}

impl AssetDatabase for FlakyDatabase {
    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn is_valid_folder(&self, path: &str) -> bool {
        self.inner.is_valid_folder(path)
    }

    fn create_folder(&mut self, path: &str) -> AssetResult<()> {
        self.inner.create_folder(path)
    }

    fn folder_entries(&self, path: &str) -> AssetResult<Vec<String>> {
        self.inner.folder_entries(path)
    }

    fn copy_asset(&mut self, from: &str, to: &str) -> AssetResult<()> {
        self.inner.copy_asset(from, to)
    }

    fn delete_asset(&mut self, path: &str) -> AssetResult<bool> {
        self.inner.delete_asset(path)
    }

    fn import_settings(&self, path: &str) -> AssetResult<Option<ModelImportSettings>> {
        if self.fail_settings {
            return Err(AssetError::Missing(path.to_string()));
        }
        self.inner.import_settings(path)
    }

    fn save_and_reimport(&mut self, path: &str, settings: &ModelImportSettings) -> AssetResult<()> {
        if self.fail_reimport {
            return Err(AssetError::NotAModel(path.to_string()));
        }
        self.inner.save_and_reimport(path, settings)
    }

    fn load_model(&self, path: &str) -> AssetResult<Option<ImportedModel>> {
        if self.fail_load {
            return Err(AssetError::Missing(path.to_string()));
        }
        self.inner.load_model(path)
    }

    fn load_human_description(&self, path: &str) -> AssetResult<Option<HumanDescription>> {
        self.inner.load_human_description(path)
    }
}

/// Asset folder under the system temp dir, removed on drop.
pub struct TempAssetDir(pub PathBuf);

impl TempAssetDir {
    pub fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "bevy_bone_mapper_it_{}_{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).expect("temp dir is creatable");
        Self(dir)
    }

    /// Writes `contents` at `path` relative to the folder, creating parent folders.
    pub fn write(&self, path: &str, contents: &str) {
        let full = self.0.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("parent folder is creatable");
        }
        fs::write(full, contents).expect("file is writable");
    }

    pub fn read(&self, path: &str) -> Vec<u8> {
        fs::read(self.0.join(path)).expect("file is readable")
    }
}

impl Drop for TempAssetDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}
