use std::{fmt, str::FromStr};

use bevy::{platform::collections::HashMap, prelude::Entity, reflect::Reflect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! bone_roles {
    ($($role:ident),* $(,)?) => {
        /// Semantic skeletal position of a humanoid bone, independent of how any particular rig
        /// names it.
        #[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(Serialize, Deserialize)]
        pub enum BoneRole {
            $($role),*
        }

        impl BoneRole {
            /// Every role, in canonical order.
            pub const ALL: &'static [BoneRole] = &[$(BoneRole::$role),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(BoneRole::$role => stringify!($role)),*
                }
            }
        }

        impl FromStr for BoneRole {
            type Err = UnknownBoneRole;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($role) => Ok(BoneRole::$role),)*
                    other => Err(UnknownBoneRole(other.to_string())),
                }
            }
        }
    };
}

bone_roles![
    Hips,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftToes,
    RightToes,
    LeftEye,
    RightEye,
    Jaw,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
    UpperChest,
];

impl BoneRole {
    /// Roles a rig must bind for its avatar to count as humanoid.
    pub const REQUIRED: &'static [BoneRole] = &[
        BoneRole::Hips,
        BoneRole::Spine,
        BoneRole::Head,
        BoneRole::LeftUpperLeg,
        BoneRole::RightUpperLeg,
        BoneRole::LeftLowerLeg,
        BoneRole::RightLowerLeg,
        BoneRole::LeftFoot,
        BoneRole::RightFoot,
        BoneRole::LeftUpperArm,
        BoneRole::RightUpperArm,
        BoneRole::LeftLowerArm,
        BoneRole::RightLowerArm,
        BoneRole::LeftHand,
        BoneRole::RightHand,
    ];
}

impl fmt::Display for BoneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown bone role: {0:?}")]
pub struct UnknownBoneRole(pub String);

/// Bone role to live bone entity, scoped to a single rig.
///
/// Produced fresh by every resolution pass and merged into the
/// [`BoneLinkRegistry`](crate::registry::BoneLinkRegistry); never persisted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoleMap {
    bones: HashMap<BoneRole, Entity>,
}

impl RoleMap {
    pub fn insert(&mut self, role: BoneRole, bone: Entity) {
        self.bones.insert(role, bone);
    }

    pub fn get(&self, role: BoneRole) -> Option<Entity> {
        self.bones.get(&role).copied()
    }

    pub fn contains(&self, role: BoneRole) -> bool {
        self.bones.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// An empty map is never a usable result: callers treat it as "no mapping".
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

impl FromIterator<(BoneRole, Entity)> for RoleMap {
    fn from_iter<T: IntoIterator<Item = (BoneRole, Entity)>>(iter: T) -> Self {
        Self {
            bones: iter.into_iter().collect(),
        }
    }
}
