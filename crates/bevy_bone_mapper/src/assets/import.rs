use bevy::{
    ecs::{entity::Entity, hierarchy::ChildOf, name::Name, world::World},
    log::info,
    math::{Quat, Vec3},
    transform::components::Transform,
};

use super::{
    AnimationType, ModelImportSettings,
    auto_mapper::HumanoidAutoMapper,
    serial::{BoneSerial, RigSerial},
};
use crate::rig::{
    avatar::{Avatar, HumanoidAnimator, RigSource},
    hierarchy::{children, entity_name},
};

/// A model as produced by the importer: its own world, holding one bone hierarchy whose root
/// carries the [`HumanoidAnimator`] (unless the model is imported without animation).
pub struct ImportedModel {
    pub world: World,
    pub root: Entity,
}

impl ImportedModel {
    /// Copies the hierarchy into `world` as a new rig instance and returns its root.
    ///
    /// The instance remembers `asset_path` as its [`RigSource`], and its animator is re-bound to
    /// the copied bones.
    pub fn instantiate(&self, world: &mut World, asset_path: &str) -> Entity {
        let root = self.copy_bone(world, self.root, None);
        world.entity_mut(root).insert(RigSource {
            asset_path: asset_path.to_string(),
        });

        if let Some(avatar) = self
            .world
            .get::<HumanoidAnimator>(self.root)
            .and_then(|animator| animator.avatar.clone())
        {
            let animator = HumanoidAnimator::bound(avatar, world, root);
            world.entity_mut(root).insert(animator);
        }

        root
    }

    fn copy_bone(&self, world: &mut World, bone: Entity, parent: Option<Entity>) -> Entity {
        let name = Name::new(entity_name(&self.world, bone).to_string());
        let transform = self
            .world
            .get::<Transform>(bone)
            .copied()
            .unwrap_or_default();

        let mut entity = world.spawn((name, transform));
        if let Some(parent) = parent {
            entity.insert(ChildOf(parent));
        }
        let copy = entity.id();

        for child in children(&self.world, bone) {
            self.copy_bone(world, child, Some(copy));
        }
        copy
    }
}

/// Settings as they stand after a re-import of `rig`.
///
/// A humanoid model without a description gets one generated from its bone names when
/// auto-generation is enabled.
pub fn reimport_settings(rig: &RigSerial, settings: &ModelImportSettings) -> ModelImportSettings {
    let mut settings = settings.clone();
    if settings.animation_type == AnimationType::Humanoid
        && settings.human_description.is_empty()
        && settings.auto_generate_avatar_mapping
    {
        settings.human_description = HumanoidAutoMapper::new().map(rig);
        info!(
            "Generated humanoid mapping with {} bones",
            settings.human_description.human.len()
        );
    }
    settings
}

/// Builds the imported form of the model at `path`.
pub fn import_model(path: &str, rig: &RigSerial, settings: &ModelImportSettings) -> ImportedModel {
    let mut world = World::new();
    let root = spawn_bone(&mut world, &rig.root, None);

    let avatar = match settings.animation_type {
        AnimationType::None => None,
        AnimationType::Generic => Some(Avatar::generic(Some(path.to_string()))),
        AnimationType::Humanoid => Some(Avatar::humanoid(
            Some(path.to_string()),
            settings.human_description.clone(),
        )),
    };
    if let Some(avatar) = avatar {
        let animator = HumanoidAnimator::bound(avatar, &world, root);
        world.entity_mut(root).insert(animator);
    }

    ImportedModel { world, root }
}

fn spawn_bone(world: &mut World, bone: &BoneSerial, parent: Option<Entity>) -> Entity {
    let transform = Transform::from_translation(Vec3::from_array(bone.translation))
        .with_rotation(Quat::from_array(bone.rotation));

    let mut entity = world.spawn((Name::new(bone.name.clone()), transform));
    if let Some(parent) = parent {
        entity.insert(ChildOf(parent));
    }
    let id = entity.id();

    for child in &bone.children {
        spawn_bone(world, child, Some(id));
    }
    id
}
