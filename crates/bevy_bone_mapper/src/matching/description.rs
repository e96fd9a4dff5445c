use bevy::{
    ecs::{entity::Entity, world::World},
    log::debug,
};

use crate::{
    bone_role::{BoneRole, RoleMap},
    rig::{HumanDescription, hierarchy::find_by_name},
};

/// Resolves every role of `description` to the first entity under `root` (self included) whose
/// name is exactly the described bone name.
///
/// Role names that do not parse are skipped. Returns `None` when no role resolves.
pub fn resolve_description(
    world: &World,
    root: Entity,
    description: &HumanDescription,
) -> Option<RoleMap> {
    let mut map = RoleMap::default();

    for bone in &description.human {
        let Ok(role) = bone.human_name.parse::<BoneRole>() else {
            debug!("Skipping unknown humanoid role {:?}", bone.human_name);
            continue;
        };
        if let Some(entity) = find_by_name(world, root, &bone.bone_name) {
            map.insert(role, entity);
        }
    }

    map.non_empty()
}
