use bevy::{
    ecs::{component::Component, entity::Entity, world::World},
    reflect::Reflect,
};
use serde::{Deserialize, Serialize};

use super::hierarchy::DepthFirst;
use crate::{RoleMap, bone_role::BoneRole, matching::description::resolve_description};

/// One role assignment of a canonical skeleton description.
#[derive(Reflect, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanBone {
    /// Role name, e.g. `"LeftUpperArm"`. Not guaranteed to name a known [`BoneRole`].
    pub human_name: String,
    /// Name of the bone in the asset hierarchy.
    pub bone_name: String,
}

/// Ordered role name to bone name pairs, as stored in a humanoid configuration.
#[derive(Reflect, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HumanDescription {
    pub human: Vec<HumanBone>,
}

impl HumanDescription {
    pub fn is_empty(&self) -> bool {
        self.human.is_empty()
    }

    pub fn push(&mut self, role: BoneRole, bone_name: impl Into<String>) {
        self.human.push(HumanBone {
            human_name: role.as_str().to_string(),
            bone_name: bone_name.into(),
        });
    }

    pub fn bone_name(&self, role: BoneRole) -> Option<&str> {
        self.human
            .iter()
            .find(|bone| bone.human_name == role.as_str())
            .map(|bone| bone.bone_name.as_str())
    }

    /// Whether every required humanoid role has a bone assigned.
    pub fn covers_required(&self) -> bool {
        BoneRole::REQUIRED
            .iter()
            .all(|role| self.bone_name(*role).is_some())
    }
}

impl FromIterator<(BoneRole, String)> for HumanDescription {
    fn from_iter<T: IntoIterator<Item = (BoneRole, String)>>(iter: T) -> Self {
        let mut description = Self::default();
        for (role, bone_name) in iter {
            description.push(role, bone_name);
        }
        description
    }
}

/// Canonical skeleton configuration an animator is driven by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Avatar {
    /// Asset this avatar was imported from, if it has one.
    pub source_path: Option<String>,
    pub human_description: HumanDescription,
    pub is_valid: bool,
    pub is_human: bool,
}

impl Avatar {
    pub fn generic(source_path: Option<String>) -> Self {
        Self {
            source_path,
            human_description: HumanDescription::default(),
            is_valid: true,
            is_human: false,
        }
    }

    pub fn humanoid(source_path: Option<String>, human_description: HumanDescription) -> Self {
        let is_human = human_description.covers_required();
        Self {
            source_path,
            human_description,
            is_valid: true,
            is_human,
        }
    }
}

/// Animation driver of a rig. Holds the avatar and the bones it is bound to.
#[derive(Component, Debug, Clone, Default)]
pub struct HumanoidAnimator {
    pub avatar: Option<Avatar>,
    bindings: RoleMap,
}

impl HumanoidAnimator {
    pub fn new(avatar: Avatar) -> Self {
        Self {
            avatar: Some(avatar),
            bindings: RoleMap::default(),
        }
    }

    /// Binds the avatar's described bones to entities under `root` by exact name.
    pub fn bound(avatar: Avatar, world: &World, root: Entity) -> Self {
        let bindings = if avatar.is_valid && avatar.is_human {
            resolve_description(world, root, &avatar.human_description).unwrap_or_default()
        } else {
            RoleMap::default()
        };
        Self {
            avatar: Some(avatar),
            bindings,
        }
    }

    pub fn with_binding(mut self, role: BoneRole, bone: Entity) -> Self {
        self.bindings.insert(role, bone);
        self
    }

    /// Whether the avatar is present, valid and humanoid.
    pub fn is_humanoid(&self) -> bool {
        self.avatar
            .as_ref()
            .is_some_and(|avatar| avatar.is_valid && avatar.is_human)
    }

    /// Bone bound to `role`. Always `None` for non-humanoid avatars.
    pub fn bone_entity(&self, role: BoneRole) -> Option<Entity> {
        if !self.is_humanoid() {
            return None;
        }
        self.bindings.get(role)
    }

    /// Avatar, if it is present and valid.
    pub fn valid_avatar(&self) -> Option<&Avatar> {
        self.avatar.as_ref().filter(|avatar| avatar.is_valid)
    }
}

/// Asset path a rig was instantiated from.
#[derive(Component, Reflect, Debug, Clone, PartialEq, Eq)]
pub struct RigSource {
    pub asset_path: String,
}

/// First [`HumanoidAnimator`] in the subtree of `root`, self included.
pub fn find_animator(world: &World, root: Entity) -> Option<(Entity, &HumanoidAnimator)> {
    DepthFirst::new(world, root).find_map(|entity| {
        world
            .get::<HumanoidAnimator>(entity)
            .map(|animator| (entity, animator))
    })
}
