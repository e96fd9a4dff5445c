use bevy::{
    ecs::{entity::Entity, world::World},
    log::{debug, error, info, warn},
};

use crate::{
    assets::{
        AnimationType, AssetDatabase, AssetKind, ModelImportSettings, file_stem, join_path,
        split_asset_extension,
    },
    bone_role::{BoneRole, RoleMap},
    config::BoneMapperSettings,
    errors::{AssetError, MappingResult},
    matching::{find_equivalent, resolve_description},
    rig::{
        avatar::{HumanoidAnimator, RigSource, find_animator},
        hierarchy::entity_name,
    },
};

/// Extracts a humanoid mapping for a rig whose source model is not configured as humanoid.
///
/// The model is duplicated into the scratch folder, the duplicate is re-imported as humanoid
/// with automatic mapping, and its bones are projected back onto the live rig by path. The
/// original model's settings are never written, and the duplicate is deleted before
/// [`extract`](Self::extract) returns, whatever the outcome.
///
/// When the rig comes from a standalone avatar description, or its model cannot be re-imported,
/// the avatar's description is resolved against the rig by bone name instead.
pub struct TransientReimportExtractor<'a, D: AssetDatabase + ?Sized> {
    db: &'a mut D,
    settings: &'a BoneMapperSettings,
}

impl<'a, D: AssetDatabase + ?Sized> TransientReimportExtractor<'a, D> {
    pub fn new(db: &'a mut D, settings: &'a BoneMapperSettings) -> Self {
        Self { db, settings }
    }

    /// `Ok(None)` when no mapping could be produced; `Err` only for unexpected asset failures
    /// outside the scratch duplicate's lifetime.
    pub fn extract(&mut self, world: &World, scene_root: Entity) -> MappingResult<Option<RoleMap>> {
        let animator = find_animator(world, scene_root).map(|(_, animator)| animator);

        let Some(model_path) = resolve_model_asset_path(world, scene_root) else {
            warn!(
                "Rig {:?} has no source asset, cannot extract a humanoid mapping",
                entity_name(world, scene_root)
            );
            return Ok(None);
        };

        if self.db.asset_kind(&model_path) == AssetKind::AvatarDescription {
            debug!("{model_path:?} is a standalone avatar, resolving its description");
            return self.from_standalone_description(world, scene_root, animator, &model_path);
        }

        if self.db.import_settings(&model_path)?.is_none() {
            if let Some(map) = from_animator_description(world, scene_root, animator) {
                return Ok(Some(map));
            }
            warn!("{model_path:?} has no model importer, cannot extract a humanoid mapping");
            return Ok(None);
        }

        let scratch_path = self.scratch_path_for(&model_path)?;
        let mut scratch = ScratchAsset::new(self.db, scratch_path);

        if let Err(err) = scratch.db.copy_asset(&model_path, &scratch.path) {
            warn!(
                "Failed to duplicate {model_path:?} to {:?}: {err}",
                scratch.path
            );
            return Ok(None);
        }

        Ok(scratch.extract_onto(world, scene_root))
    }

    fn from_standalone_description(
        &mut self,
        world: &World,
        scene_root: Entity,
        animator: Option<&HumanoidAnimator>,
        description_path: &str,
    ) -> MappingResult<Option<RoleMap>> {
        let map = match animator.and_then(HumanoidAnimator::valid_avatar) {
            Some(avatar) => resolve_description(world, scene_root, &avatar.human_description),
            None => {
                let Some(description) = self.db.load_human_description(description_path)? else {
                    warn!("No avatar description could be read from {description_path:?}");
                    return Ok(None);
                };
                resolve_description(world, scene_root, &description)
            }
        };
        if map.is_none() {
            warn!(
                "Avatar description {description_path:?} matched no bones under {:?}",
                entity_name(world, scene_root)
            );
        }
        Ok(map)
    }

    fn scratch_path_for(&mut self, model_path: &str) -> MappingResult<String> {
        let folder = &self.settings.scratch_folder;
        if !self.db.is_valid_folder(folder) {
            self.db.create_folder(folder)?;
        }
        let (_, extension) = split_asset_extension(model_path);
        let name = format!(
            "{}{}{}",
            file_stem(model_path),
            self.settings.scratch_suffix,
            extension
        );
        Ok(self.db.generate_unique_asset_path(&join_path(folder, &name)))
    }
}

/// Asset the rig was created from: its avatar's asset if it has one, otherwise the model it
/// was instantiated from.
pub fn resolve_model_asset_path(world: &World, scene_root: Entity) -> Option<String> {
    let avatar_path = find_animator(world, scene_root)
        .and_then(|(_, animator)| animator.avatar.as_ref())
        .and_then(|avatar| avatar.source_path.clone())
        .filter(|path| !path.is_empty());

    avatar_path.or_else(|| {
        world
            .get::<RigSource>(scene_root)
            .map(|source| source.asset_path.clone())
            .filter(|path| !path.is_empty())
    })
}

fn from_animator_description(
    world: &World,
    scene_root: Entity,
    animator: Option<&HumanoidAnimator>,
) -> Option<RoleMap> {
    let avatar = animator.and_then(HumanoidAnimator::valid_avatar)?;
    resolve_description(world, scene_root, &avatar.human_description)
}

/// Duplicate of a model in the scratch folder.
///
/// Dropping it restores the import settings it had when copied (if they were changed) and
/// deletes it.
struct ScratchAsset<'a, D: AssetDatabase + ?Sized> {
    db: &'a mut D,
    path: String,
    original_settings: Option<ModelImportSettings>,
}

impl<'a, D: AssetDatabase + ?Sized> ScratchAsset<'a, D> {
    fn new(db: &'a mut D, path: String) -> Self {
        Self {
            db,
            path,
            original_settings: None,
        }
    }

    /// Forces the duplicate through a humanoid re-import and projects its bones onto the rig.
    /// Every failure here is logged and ends in `None`.
    fn extract_onto(&mut self, world: &World, scene_root: Entity) -> Option<RoleMap> {
        let original = match self.db.import_settings(&self.path) {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                warn!("Duplicate {:?} has no model importer", self.path);
                return None;
            }
            Err(err) => {
                warn!("Could not read import settings of {:?}: {err}", self.path);
                return None;
            }
        };

        let humanoid = ModelImportSettings {
            animation_type: AnimationType::Humanoid,
            auto_generate_avatar_mapping: true,
            ..original.clone()
        };
        self.original_settings = Some(original);

        if let Err(err) = self.db.save_and_reimport(&self.path, &humanoid) {
            warn!("Humanoid re-import of {:?} failed: {err}", self.path);
            return None;
        }

        let model = match self.db.load_model(&self.path) {
            Ok(Some(model)) => model,
            Ok(None) => {
                warn!("Re-imported duplicate {:?} could not be loaded", self.path);
                return None;
            }
            Err(err) => {
                warn!("Loading re-imported duplicate {:?} failed: {err}", self.path);
                return None;
            }
        };

        let Some((_, animator)) = find_animator(&model.world, model.root)
            .filter(|(_, animator)| animator.is_humanoid())
        else {
            warn!(
                "Re-imported duplicate {:?} did not produce a humanoid avatar",
                self.path
            );
            return None;
        };

        let mut map = RoleMap::default();
        for &role in BoneRole::ALL {
            let Some(model_bone) = animator.bone_entity(role) else {
                continue;
            };
            if let Some(scene_bone) = find_equivalent(world, scene_root, &model.world, model_bone) {
                map.insert(role, scene_bone);
            }
        }

        info!(
            "Extracted {} humanoid bones for {:?} from {:?}",
            map.len(),
            entity_name(world, scene_root),
            self.path
        );
        map.non_empty()
    }

    fn cleanup(&mut self) -> Result<bool, AssetError> {
        if let Some(original) = self.original_settings.take() {
            if let Err(err) = self.db.save_and_reimport(&self.path, &original) {
                debug!("Could not restore settings of {:?}: {err}", self.path);
            }
        }
        self.db.delete_asset(&self.path)
    }
}

impl<D: AssetDatabase + ?Sized> Drop for ScratchAsset<'_, D> {
    fn drop(&mut self) {
        match self.cleanup() {
            Ok(true) => debug!("Deleted scratch asset {:?}", self.path),
            Ok(false) => {}
            Err(err) => error!("Failed to delete scratch asset {:?}: {err}", self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::name::Name;

    use super::*;
    use crate::rig::Avatar;

    #[test]
    fn avatar_path_takes_precedence_over_rig_source() {
        let mut world = World::new();
        let root = world
            .spawn((
                Name::new("Hero"),
                RigSource {
                    asset_path: "models/hero.rig.ron".into(),
                },
                HumanoidAnimator::new(Avatar::generic(Some("avatars/hero.avatar.ron".into()))),
            ))
            .id();
        assert_eq!(
            resolve_model_asset_path(&world, root).as_deref(),
            Some("avatars/hero.avatar.ron")
        );

        world.entity_mut(root).remove::<HumanoidAnimator>();
        assert_eq!(
            resolve_model_asset_path(&world, root).as_deref(),
            Some("models/hero.rig.ron")
        );

        world.entity_mut(root).remove::<RigSource>();
        assert_eq!(resolve_model_asset_path(&world, root), None);
    }
}
