//! Read-only walks over an entity hierarchy, keyed by [`Name`].
//!
//! Traversals are depth-first and visit children in their `Children` order, so every search
//! here is deterministic for a fixed hierarchy. Entities without a [`Name`] have the empty name.

use bevy::ecs::{
    entity::Entity,
    hierarchy::{ChildOf, Children},
    name::Name,
    world::World,
};

pub fn entity_name(world: &World, entity: Entity) -> &str {
    world.get::<Name>(entity).map(Name::as_str).unwrap_or("")
}

pub fn parent(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<ChildOf>(entity).map(ChildOf::parent)
}

pub fn children(world: &World, entity: Entity) -> Vec<Entity> {
    let mut out = vec![];
    if let Some(children) = world.get::<Children>(entity) {
        for &child in children {
            out.push(child);
        }
    }
    out
}

/// First direct child of `entity` named `name`.
pub fn find_child_by_name(world: &World, entity: Entity, name: &str) -> Option<Entity> {
    children(world, entity)
        .into_iter()
        .find(|&child| entity_name(world, child) == name)
}

/// First entity in the subtree of `root` (self included) named exactly `name`.
pub fn find_by_name(world: &World, root: Entity, name: &str) -> Option<Entity> {
    DepthFirst::new(world, root).find(|&entity| entity_name(world, entity) == name)
}

/// Every entity in the subtree of `root` (self included) named exactly `name`, in traversal
/// order.
pub fn collect_by_name(world: &World, root: Entity, name: &str) -> Vec<Entity> {
    DepthFirst::new(world, root)
        .filter(|&entity| entity_name(world, entity) == name)
        .collect()
}

/// Whether `entity` is alive and is `root` or one of its descendants.
pub fn is_in_subtree(world: &World, root: Entity, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        return false;
    }
    let mut current = Some(entity);
    while let Some(cur) = current {
        if cur == root {
            return true;
        }
        current = parent(world, cur);
    }
    false
}

/// Pre-order, first-child-first iterator over a subtree.
pub struct DepthFirst<'w> {
    world: &'w World,
    pending: Vec<Entity>,
}

impl<'w> DepthFirst<'w> {
    pub fn new(world: &'w World, root: Entity) -> Self {
        Self {
            world,
            pending: vec![root],
        }
    }
}

impl Iterator for DepthFirst<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.pending.pop()?;
        // Pushed in reverse so the first child is popped first
        self.pending
            .extend(children(self.world, current).into_iter().rev());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_named(world: &mut World, name: &str, parent: Option<Entity>) -> Entity {
        match parent {
            Some(parent) => world
                .spawn((Name::new(name.to_string()), ChildOf(parent)))
                .id(),
            None => world.spawn(Name::new(name.to_string())).id(),
        }
    }

    #[test]
    fn depth_first_visits_first_child_first() {
        let mut world = World::new();
        let root = spawn_named(&mut world, "root", None);
        let a = spawn_named(&mut world, "a", Some(root));
        let a1 = spawn_named(&mut world, "a1", Some(a));
        let b = spawn_named(&mut world, "b", Some(root));

        let order: Vec<Entity> = DepthFirst::new(&world, root).collect();
        assert_eq!(order, vec![root, a, a1, b]);
    }

    #[test]
    fn name_searches_include_self_and_keep_order() {
        let mut world = World::new();
        let root = spawn_named(&mut world, "Bone", None);
        let a = spawn_named(&mut world, "a", Some(root));
        let nested = spawn_named(&mut world, "Bone", Some(a));

        assert_eq!(find_by_name(&world, root, "Bone"), Some(root));
        assert_eq!(collect_by_name(&world, root, "Bone"), vec![root, nested]);
        assert_eq!(find_child_by_name(&world, root, "a"), Some(a));
        assert_eq!(find_child_by_name(&world, root, "Bone"), None);
        assert!(is_in_subtree(&world, root, nested));
        assert!(!is_in_subtree(&world, a, root));
    }
}
