//! Rotation-following bindings between mapped bones, and the Apply/Remove actions that create
//! them from a [`BoneLinkRegistry`].

use std::fmt;

use bevy::{
    ecs::{component::Component, entity::Entity, hierarchy::ChildOf, system::Query, world::World},
    log::debug,
    math::Quat,
    reflect::Reflect,
    transform::components::{GlobalTransform, Transform},
};

use crate::{
    errors::{MappingError, RigSide},
    notice::MapperNotice,
    registry::{BoneLink, BoneLinkRegistry},
};

/// Makes the entity follow the world rotation of a single source entity.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
pub struct RotationConstraint {
    pub source: Entity,
    /// Blend between the entity's rest rotation (0) and the source's (1).
    pub weight: f32,
    /// Local rotation the entity had when it was first constrained.
    pub rest_rotation: Quat,
    /// Edit lock for hosts that let users tune constraints. Apply always leaves it unlocked.
    pub locked: bool,
    pub active: bool,
}

impl RotationConstraint {
    pub fn following(source: Entity) -> Self {
        Self {
            source,
            weight: 1.0,
            rest_rotation: Quat::IDENTITY,
            locked: false,
            active: true,
        }
    }

    pub fn with_rest_rotation(mut self, rest_rotation: Quat) -> Self {
        self.rest_rotation = rest_rotation;
        self
    }

    /// Number of sources driving this constraint.
    pub fn source_count(&self) -> usize {
        1
    }
}

/// Where Apply and Remove write their bindings.
pub trait ConstraintSink {
    /// Creates or rebinds the binding on `target` so it follows `source`. Returns whether a
    /// binding was written.
    fn apply_link(&mut self, target: Entity, source: Entity) -> bool;

    /// Deletes the binding on `target`. Returns whether there was one.
    fn remove_link(&mut self, target: Entity) -> bool;
}

impl ConstraintSink for World {
    /// An existing constraint is reset to follow `source` fully but keeps its rest rotation.
    fn apply_link(&mut self, target: Entity, source: Entity) -> bool {
        if self.get_entity(source).is_err() {
            return false;
        }
        let Ok(mut entity) = self.get_entity_mut(target) else {
            return false;
        };
        let rest = match entity.get::<RotationConstraint>() {
            Some(existing) => existing.rest_rotation,
            None => entity
                .get::<Transform>()
                .map_or(Quat::IDENTITY, |transform| transform.rotation),
        };
        entity.insert(RotationConstraint::following(source).with_rest_rotation(rest));
        true
    }

    /// Puts the entity back at its rest rotation.
    fn remove_link(&mut self, target: Entity) -> bool {
        let Ok(mut entity) = self.get_entity_mut(target) else {
            return false;
        };
        let Some(constraint) = entity.take::<RotationConstraint>() else {
            return false;
        };
        if let Some(mut transform) = entity.get_mut::<Transform>() {
            transform.rotation = constraint.rest_rotation;
        }
        true
    }
}

/// Binds every enabled link that has both ends. Returns how many bindings were written.
pub fn apply_constraints<'a>(
    links: impl IntoIterator<Item = &'a BoneLink>,
    sink: &mut impl ConstraintSink,
) -> usize {
    links
        .into_iter()
        .filter(|link| link.is_applicable())
        .filter_map(|link| Some((link.target?, link.source?)))
        .filter(|&(target, source)| sink.apply_link(target, source))
        .count()
}

/// Unbinds every enabled link with a target. Returns how many bindings were removed.
pub fn remove_constraints<'a>(
    links: impl IntoIterator<Item = &'a BoneLink>,
    sink: &mut impl ConstraintSink,
) -> usize {
    links
        .into_iter()
        .filter(|link| link.enabled)
        .filter_map(|link| link.target)
        .filter(|&target| sink.remove_link(target))
        .count()
}

/// Links whose target bone is alive under `target_root`.
fn links_in_rig<'a>(
    world: &World,
    target_root: Entity,
    registry: &'a BoneLinkRegistry,
) -> Vec<&'a BoneLink> {
    registry
        .links()
        .filter(|link| link.live_target(world, target_root).is_some())
        .collect()
}

/// Apply action: requires a target rig.
pub fn apply(
    world: &mut World,
    target_root: Option<Entity>,
    registry: &BoneLinkRegistry,
) -> MapperNotice {
    let Some(target_root) = target_root else {
        return MapperNotice::failure(MappingError::MissingInput(RigSide::Target).to_string());
    };
    let links = links_in_rig(world, target_root, registry);
    match apply_constraints(links, world) {
        0 => MapperNotice::info("Nothing to apply."),
        n => MapperNotice::info(format!("Applied or updated {n} rotation constraints.")),
    }
}

/// Remove action: requires a target rig.
pub fn remove(
    world: &mut World,
    target_root: Option<Entity>,
    registry: &BoneLinkRegistry,
) -> MapperNotice {
    let Some(target_root) = target_root else {
        return MapperNotice::failure(MappingError::MissingInput(RigSide::Target).to_string());
    };
    let links = links_in_rig(world, target_root, registry);
    match remove_constraints(links, world) {
        0 => MapperNotice::info("No constraints to remove."),
        removed => MapperNotice::info(format!("Removed {removed} rotation constraints.")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// No target bone assigned.
    Unassigned,
    /// The target carries no constraint.
    Missing,
    Active { sources: usize },
    Inactive { sources: usize },
}

impl fmt::Display for ConstraintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintStatus::Unassigned => f.write_str("-"),
            ConstraintStatus::Missing => f.write_str("none"),
            ConstraintStatus::Active { sources } => write!(f, "On ({sources})"),
            ConstraintStatus::Inactive { sources } => write!(f, "Off ({sources})"),
        }
    }
}

pub fn constraint_status(world: &World, target: Option<Entity>) -> ConstraintStatus {
    let Some(target) = target.filter(|&target| world.get_entity(target).is_ok()) else {
        return ConstraintStatus::Unassigned;
    };
    match world.get::<RotationConstraint>(target) {
        None => ConstraintStatus::Missing,
        Some(constraint) if constraint.active => ConstraintStatus::Active {
            sources: constraint.source_count(),
        },
        Some(constraint) => ConstraintStatus::Inactive {
            sources: constraint.source_count(),
        },
    }
}

/// Rotates each constrained entity so its world rotation tracks its source's, blended from its
/// rest rotation by weight. Reads last frame's global transforms.
pub fn follow_rotation_constraints(
    mut constrained: Query<(Entity, &RotationConstraint, &mut Transform, Option<&ChildOf>)>,
    globals: Query<&GlobalTransform>,
) {
    for (entity, constraint, mut transform, child_of) in &mut constrained {
        if !constraint.active {
            continue;
        }
        let Ok(source) = globals.get(constraint.source) else {
            debug!("Rotation constraint on {entity} has a missing source");
            continue;
        };
        let parent_rotation = child_of
            .and_then(|child_of| globals.get(child_of.parent()).ok())
            .map(GlobalTransform::rotation)
            .unwrap_or(Quat::IDENTITY);

        let desired = parent_rotation.inverse() * source.rotation();
        transform.rotation = constraint
            .rest_rotation
            .slerp(desired, constraint.weight.clamp(0.0, 1.0));
    }
}
