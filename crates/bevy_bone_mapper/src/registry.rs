use std::fmt;

use bevy::{
    ecs::{entity::Entity, world::World},
    prelude::Resource,
};
use serde::Serialize;

use crate::{
    bone_role::{BoneRole, RoleMap},
    rig::{BonePath, hierarchy::is_in_subtree},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BoneGroup {
    Body,
    Head,
    Hand,
}

impl BoneGroup {
    pub const ALL: [BoneGroup; 3] = [BoneGroup::Body, BoneGroup::Head, BoneGroup::Hand];

    /// Tracked roles of the group, in display order, with whether each is optional.
    pub fn roster(&self) -> &'static [(BoneRole, bool)] {
        use BoneRole::*;
        match self {
            BoneGroup::Body => &[
                (Hips, false),
                (Spine, false),
                (Chest, false),
                (UpperChest, true),
                (LeftShoulder, true),
                (RightShoulder, true),
                (LeftUpperArm, false),
                (RightUpperArm, false),
                (LeftLowerArm, false),
                (RightLowerArm, false),
                (LeftUpperLeg, false),
                (RightUpperLeg, false),
                (LeftLowerLeg, false),
                (RightLowerLeg, false),
                (LeftFoot, false),
                (RightFoot, false),
                (LeftToes, true),
                (RightToes, true),
            ],
            BoneGroup::Head => &[
                (Neck, false),
                (Head, false),
                (Jaw, true),
                (LeftEye, true),
                (RightEye, true),
            ],
            BoneGroup::Hand => &[
                (LeftHand, false),
                (RightHand, false),
                (LeftThumbProximal, true),
                (LeftIndexProximal, true),
                (LeftMiddleProximal, true),
                (LeftRingProximal, true),
                (LeftLittleProximal, true),
                (RightThumbProximal, true),
                (RightIndexProximal, true),
                (RightMiddleProximal, true),
                (RightRingProximal, true),
                (RightLittleProximal, true),
            ],
        }
    }
}

impl fmt::Display for BoneGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One tracked role: the source bone that drives it and the target bone that follows.
///
/// `source` and `target` are plain lookups into their rigs. They can dangle once the bone is
/// despawned or reparented, so Apply and Remove read targets through
/// [`live_target`](Self::live_target).
#[derive(Debug, Clone, PartialEq)]
pub struct BoneLink {
    pub label: String,
    pub role: BoneRole,
    pub is_optional: bool,
    /// Whether Apply/Remove act on this link.
    pub enabled: bool,
    pub source: Option<Entity>,
    pub target: Option<Entity>,
}

impl BoneLink {
    pub fn new(role: BoneRole, is_optional: bool) -> Self {
        Self {
            label: role.as_str().to_string(),
            role,
            is_optional,
            enabled: true,
            source: None,
            target: None,
        }
    }

    pub fn display_label(&self) -> String {
        if self.is_optional {
            format!("{}  (Optional)", self.label)
        } else {
            self.label.clone()
        }
    }

    pub fn live_target(&self, world: &World, target_root: Entity) -> Option<Entity> {
        self.target
            .filter(|&bone| is_in_subtree(world, target_root, bone))
    }

    /// Enabled, with both ends assigned.
    pub fn is_applicable(&self) -> bool {
        self.enabled && self.source.is_some() && self.target.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoneLinkGroup {
    pub group: BoneGroup,
    pub links: Vec<BoneLink>,
}

impl BoneLinkGroup {
    pub fn new(group: BoneGroup) -> Self {
        Self {
            group,
            links: group
                .roster()
                .iter()
                .map(|&(role, is_optional)| BoneLink::new(role, is_optional))
                .collect(),
        }
    }

    pub fn enable_all(&mut self) {
        self.links.iter_mut().for_each(|link| link.enabled = true);
    }

    pub fn enable_required_only(&mut self) {
        self.links
            .iter_mut()
            .for_each(|link| link.enabled = !link.is_optional);
    }

    pub fn disable_all(&mut self) {
        self.links.iter_mut().for_each(|link| link.enabled = false);
    }
}

/// The bone roles tracked between a source and a target rig, in Body, Head and Hand groups.
///
/// Each editing session owns its own registry.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct BoneLinkRegistry {
    groups: Vec<BoneLinkGroup>,
}

impl Default for BoneLinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BoneLinkRegistry {
    pub fn new() -> Self {
        Self {
            groups: BoneGroup::ALL.into_iter().map(BoneLinkGroup::new).collect(),
        }
    }

    /// Rebuilds the catalog, dropping every assignment and enabled flag.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn groups(&self) -> &[BoneLinkGroup] {
        &self.groups
    }

    pub fn group(&self, group: BoneGroup) -> &BoneLinkGroup {
        &self.groups[group as usize]
    }

    pub fn group_mut(&mut self, group: BoneGroup) -> &mut BoneLinkGroup {
        &mut self.groups[group as usize]
    }

    pub fn links(&self) -> impl Iterator<Item = &BoneLink> {
        self.groups.iter().flat_map(|group| group.links.iter())
    }

    pub fn links_mut(&mut self) -> impl Iterator<Item = &mut BoneLink> {
        self.groups
            .iter_mut()
            .flat_map(|group| group.links.iter_mut())
    }

    pub fn link(&self, role: BoneRole) -> Option<&BoneLink> {
        self.links().find(|link| link.role == role)
    }

    pub fn link_mut(&mut self, role: BoneRole) -> Option<&mut BoneLink> {
        self.links_mut().find(|link| link.role == role)
    }

    pub fn enable_all(&mut self) {
        self.groups.iter_mut().for_each(BoneLinkGroup::enable_all);
    }

    pub fn enable_required_only(&mut self) {
        self.groups
            .iter_mut()
            .for_each(BoneLinkGroup::enable_required_only);
    }

    pub fn disable_all(&mut self) {
        self.groups.iter_mut().for_each(BoneLinkGroup::disable_all);
    }

    /// Overwrites each link's ends with the bones the maps have for its role. Roles a map lacks
    /// keep their current value.
    pub fn assign(&mut self, source: &RoleMap, target: &RoleMap) -> AssignCounts {
        let mut counts = AssignCounts::default();
        for link in self.links_mut() {
            if let Some(bone) = source.get(link.role) {
                link.source = Some(bone);
                counts.sources += 1;
            }
            if let Some(bone) = target.get(link.role) {
                link.target = Some(bone);
                counts.targets += 1;
            }
        }
        counts
    }

    /// Links Apply acts on.
    pub fn applicable_links(&self) -> impl Iterator<Item = &BoneLink> {
        self.links().filter(|link| link.is_applicable())
    }

    /// Serializable snapshot naming every assigned bone by its path.
    pub fn report(&self, world: &World) -> Vec<LinkReport> {
        let path_of = |bone: Option<Entity>| {
            bone.filter(|&bone| world.get_entity(bone).is_ok())
                .map(|bone| BonePath::of(world, bone).to_slashed_string())
        };
        self.groups
            .iter()
            .flat_map(|group| {
                group.links.iter().map(move |link| LinkReport {
                    group: group.group,
                    role: link.role,
                    optional: link.is_optional,
                    enabled: link.enabled,
                    source: path_of(link.source),
                    target: path_of(link.target),
                })
            })
            .collect()
    }
}

/// How many link ends an assignment filled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssignCounts {
    pub sources: usize,
    pub targets: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub group: BoneGroup,
    pub role: BoneRole,
    pub optional: bool,
    pub enabled: bool,
    pub source: Option<String>,
    pub target: Option<String>,
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{hierarchy::ChildOf, name::Name};

    use super::*;

    #[test]
    fn catalog_matches_roster() {
        let registry = BoneLinkRegistry::new();
        assert_eq!(registry.group(BoneGroup::Body).links.len(), 18);
        assert_eq!(registry.group(BoneGroup::Head).links.len(), 5);
        assert_eq!(registry.group(BoneGroup::Hand).links.len(), 12);
        assert!(registry.links().all(|link| link.enabled));
        assert!(registry.link(BoneRole::Jaw).unwrap().is_optional);
        assert!(!registry.link(BoneRole::LeftFoot).unwrap().is_optional);
        assert!(registry.link(BoneRole::LeftLowerLeg).is_some());
        assert!(registry.link(BoneRole::LeftThumbDistal).is_none());
    }

    #[test]
    fn optional_links_are_labelled() {
        let registry = BoneLinkRegistry::new();
        assert_eq!(
            registry.link(BoneRole::UpperChest).unwrap().display_label(),
            "UpperChest  (Optional)"
        );
        assert_eq!(
            registry.link(BoneRole::Hips).unwrap().display_label(),
            "Hips"
        );
    }

    #[test]
    fn group_toggles_stay_within_group() {
        let mut registry = BoneLinkRegistry::new();
        registry.group_mut(BoneGroup::Hand).disable_all();

        let hand = registry.group(BoneGroup::Hand);
        assert!(hand.links.iter().all(|l| !l.enabled));
        let body = registry.group(BoneGroup::Body);
        assert!(body.links.iter().all(|l| l.enabled));
    }

    #[test]
    fn assign_only_touches_mapped_roles() {
        let mut world = World::new();
        let hips = world.spawn(Name::new("Hips")).id();
        let manual = world.spawn(Name::new("Manual")).id();

        let mut registry = BoneLinkRegistry::new();
        registry.link_mut(BoneRole::Head).unwrap().target = Some(manual);

        let source: RoleMap = [(BoneRole::Hips, hips)].into_iter().collect();
        let counts = registry.assign(&source, &source);

        assert_eq!((counts.sources, counts.targets), (1, 1));
        assert_eq!(registry.link(BoneRole::Hips).unwrap().source, Some(hips));
        assert_eq!(registry.link(BoneRole::Head).unwrap().target, Some(manual));
        assert_eq!(registry.applicable_links().count(), 1);
    }

    #[test]
    fn dangling_ends_are_not_live() {
        let mut world = World::new();
        let root = world.spawn(Name::new("Rig")).id();
        let hips = world.spawn((Name::new("Hips"), ChildOf(root))).id();

        let mut link = BoneLink::new(BoneRole::Hips, false);
        link.target = Some(hips);
        assert_eq!(link.live_target(&world, root), Some(hips));

        world.despawn(hips);
        assert_eq!(link.live_target(&world, root), None);
    }

    #[test]
    fn report_names_bones_by_path() {
        let mut world = World::new();
        let root = world.spawn(Name::new("Rig")).id();
        let hips = world.spawn((Name::new("Hips"), ChildOf(root))).id();

        let mut registry = BoneLinkRegistry::new();
        registry.link_mut(BoneRole::Hips).unwrap().source = Some(hips);
        let report = registry.report(&world);

        assert_eq!(report.len(), 35);
        assert_eq!(report[0].source.as_deref(), Some("Rig/Hips"));
        assert_eq!(report[0].target, None);
    }
}
