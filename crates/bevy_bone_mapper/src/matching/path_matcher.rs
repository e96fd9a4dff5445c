use bevy::ecs::{entity::Entity, world::World};

use crate::rig::{
    bone_path::BonePath,
    hierarchy::{collect_by_name, entity_name, find_child_by_name},
};

/// Finds the bone in `other_world` under `other_root` that corresponds to `reference_bone` in
/// `reference_world`.
///
/// The two worlds may be the same.
pub fn find_equivalent(
    other_world: &World,
    other_root: Entity,
    reference_world: &World,
    reference_bone: Entity,
) -> Option<Entity> {
    let path = BonePath::of(reference_world, reference_bone);
    find_by_path(other_world, other_root, &path)
}

/// Locates `path` under `root`.
///
/// When `root` carries the path's first name, the remaining names are followed child by child
/// and any missing step fails the lookup. Otherwise every entity named like the path's leaf is
/// collected in depth-first order, and the first one that itself has a parent wins.
pub fn find_by_path(world: &World, root: Entity, path: &BonePath) -> Option<Entity> {
    let first = path.first()?;

    if first != entity_name(world, root) {
        return find_by_leaf(world, root, path);
    }

    let mut current = root;
    for part in &path.parts[1..] {
        current = find_child_by_name(world, current, part)?;
    }
    Some(current)
}

fn find_by_leaf(world: &World, root: Entity, path: &BonePath) -> Option<Entity> {
    let leaf = path.last()?;

    // NOTE: first match in traversal order; same-named leaves elsewhere in the tree are not
    // disambiguated by how much of the path they share.
    collect_by_name(world, root, leaf)
        .into_iter()
        .find(|&candidate| BonePath::of(world, candidate).ends_with_leaf(leaf))
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{hierarchy::ChildOf, name::Name};

    use super::*;

    fn spawn_chain(world: &mut World, names: &[&str]) -> Vec<Entity> {
        let mut out: Vec<Entity> = vec![];
        for name in names {
            let entity = match out.last() {
                Some(&parent) => world.spawn((Name::new(name.to_string()), ChildOf(parent))),
                None => world.spawn(Name::new(name.to_string())),
            }
            .id();
            out.push(entity);
        }
        out
    }

    #[test]
    fn matches_despite_differing_root_names() {
        let mut reference = World::new();
        let reference_chain = spawn_chain(&mut reference, &["Root", "Spine", "Chest", "Neck"]);

        let mut other = World::new();
        let other_chain = spawn_chain(&mut other, &["OtherRoot", "Spine", "Chest", "Neck"]);

        assert_eq!(
            find_equivalent(&other, other_chain[0], &reference, reference_chain[3]),
            Some(other_chain[3])
        );
    }

    #[test]
    fn follows_exact_path_when_roots_agree() {
        let mut reference = World::new();
        let reference_chain = spawn_chain(&mut reference, &["Rig", "Hips", "Spine"]);

        let mut other = World::new();
        let other_chain = spawn_chain(&mut other, &["Rig", "Hips", "Spine"]);
        // A decoy with the same leaf name elsewhere must not be chosen
        other.spawn((Name::new("Spine"), ChildOf(other_chain[0])));

        assert_eq!(
            find_equivalent(&other, other_chain[0], &reference, reference_chain[2]),
            Some(other_chain[2])
        );
    }

    #[test]
    fn missing_segment_fails_when_roots_agree() {
        let mut reference = World::new();
        let reference_chain = spawn_chain(&mut reference, &["Rig", "Hips", "Spine"]);

        let mut other = World::new();
        let other_chain = spawn_chain(&mut other, &["Rig", "Pelvis", "Spine"]);

        assert_eq!(
            find_equivalent(&other, other_chain[0], &reference, reference_chain[2]),
            None
        );
    }

    #[test]
    fn no_shared_leaf_name_is_none() {
        let mut reference = World::new();
        let reference_chain = spawn_chain(&mut reference, &["Root", "Spine", "Neck"]);

        let mut other = World::new();
        let other_chain = spawn_chain(&mut other, &["OtherRoot", "Spine", "Collar"]);

        assert_eq!(
            find_equivalent(&other, other_chain[0], &reference, reference_chain[2]),
            None
        );
    }

    #[test]
    fn takes_first_candidate_in_traversal_order() {
        let mut reference = World::new();
        let reference_chain = spawn_chain(&mut reference, &["Root", "Arm_L", "Hand"]);

        let mut other = World::new();
        let root = other.spawn(Name::new("Other")).id();
        let left = other.spawn((Name::new("Left"), ChildOf(root))).id();
        let first_hand = other.spawn((Name::new("Hand"), ChildOf(left))).id();
        let right = other.spawn((Name::new("Right"), ChildOf(root))).id();
        other.spawn((Name::new("Hand"), ChildOf(right)));

        assert_eq!(
            find_equivalent(&other, root, &reference, reference_chain[2]),
            Some(first_hand)
        );
    }
}
