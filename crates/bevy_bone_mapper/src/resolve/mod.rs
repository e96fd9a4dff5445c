//! Obtaining a role to bone mapping for a whole rig.

pub mod extractor;

use bevy::{
    ecs::{entity::Entity, world::World},
    log::debug,
};

use crate::{
    assets::AssetDatabase,
    bone_role::{BoneRole, RoleMap},
    config::BoneMapperSettings,
    errors::MappingResult,
    rig::{
        find_animator,
        hierarchy::{entity_name, is_in_subtree},
    },
};

pub use extractor::{TransientReimportExtractor, resolve_model_asset_path};

/// Produces a [`RoleMap`] for a rig root.
///
/// Rigs already driven by a humanoid animator are read directly. Anything else goes through
/// the [`TransientReimportExtractor`].
pub struct HumanoidMapResolver<'a, D: AssetDatabase + ?Sized> {
    db: &'a mut D,
    settings: &'a BoneMapperSettings,
}

impl<'a, D: AssetDatabase + ?Sized> HumanoidMapResolver<'a, D> {
    pub fn new(db: &'a mut D, settings: &'a BoneMapperSettings) -> Self {
        Self { db, settings }
    }

    pub fn resolve_map(
        &mut self,
        world: &World,
        rig_root: Entity,
    ) -> MappingResult<Option<RoleMap>> {
        if let Some(map) = bound_humanoid_bones(world, rig_root) {
            debug!(
                "Read {} humanoid bones of {:?} from its animator",
                map.len(),
                entity_name(world, rig_root)
            );
            return Ok(Some(map));
        }
        TransientReimportExtractor::new(&mut *self.db, self.settings).extract(world, rig_root)
    }
}

/// Bones bound by the rig's own humanoid animator, restricted to live entities under the root.
pub fn bound_humanoid_bones(world: &World, rig_root: Entity) -> Option<RoleMap> {
    let (_, animator) = find_animator(world, rig_root)?;
    if !animator.is_humanoid() {
        return None;
    }
    BoneRole::ALL
        .iter()
        .filter_map(|&role| animator.bone_entity(role).map(|bone| (role, bone)))
        .filter(|&(_, bone)| is_in_subtree(world, rig_root, bone))
        .collect::<RoleMap>()
        .non_empty()
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{hierarchy::ChildOf, name::Name};

    use super::*;
    use crate::{
        assets::MemoryAssetDatabase,
        rig::{Avatar, HumanoidAnimator},
    };

    #[test]
    fn humanoid_animator_is_read_without_touching_assets() {
        let mut world = World::new();
        let root = world.spawn(Name::new("Hero")).id();
        let hips = world.spawn((Name::new("Hips"), ChildOf(root))).id();
        let mut avatar = Avatar::generic(None);
        avatar.is_human = true;
        world
            .entity_mut(root)
            .insert(HumanoidAnimator::new(avatar).with_binding(BoneRole::Hips, hips));

        let mut db = MemoryAssetDatabase::default();
        let settings = BoneMapperSettings::default();
        let map = HumanoidMapResolver::new(&mut db, &settings)
            .resolve_map(&world, root)
            .unwrap()
            .unwrap();

        assert_eq!(map.get(BoneRole::Hips), Some(hips));
        assert_eq!(db.copy_count(), 0);
    }

    #[test]
    fn bindings_outside_the_rig_are_dropped() {
        let mut world = World::new();
        let root = world.spawn(Name::new("Hero")).id();
        let stray = world.spawn(Name::new("Hips")).id();
        let mut avatar = Avatar::generic(None);
        avatar.is_human = true;
        world
            .entity_mut(root)
            .insert(HumanoidAnimator::new(avatar).with_binding(BoneRole::Hips, stray));

        assert!(bound_humanoid_bones(&world, root).is_none());
    }
}
