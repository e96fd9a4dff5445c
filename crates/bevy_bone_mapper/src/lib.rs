//! # Bevy Bone Mapper
//!
//! Matches the bones of two humanoid rigs by role and binds the target rig's bones to follow
//! the source rig's rotations.
//!
//! A rig is an entity hierarchy of [`Name`](bevy::ecs::name::Name)d bones. Its humanoid mapping
//! (which bone is the `Hips`, which is the `LeftHand`, ...) comes from, in order of preference:
//! - the bones bound by its own [`HumanoidAnimator`](rig::HumanoidAnimator), when the animator
//!   drives a valid humanoid [`Avatar`](rig::Avatar);
//! - a throwaway duplicate of the model asset the rig was instantiated from, re-imported as
//!   humanoid with automatic mapping and projected back onto the rig by bone path
//!   ([`TransientReimportExtractor`](resolve::TransientReimportExtractor)). The original asset is
//!   never modified and the duplicate never outlives the call;
//! - the avatar's stored [`HumanDescription`](rig::HumanDescription), resolved by bone name.
//!
//! Assets live behind the [`AssetDatabase`](assets::AssetDatabase) trait. Models are
//! `*.rig.ron` files with their import settings in a `*.rig.ron.meta` sidecar:
//! ```ron
//! (
//!     root: (
//!         name: "Armature",
//!         children: [
//!             (name: "mixamorig:Hips", translation: (0.0, 1.0, 0.0), children: []),
//!         ],
//!     ),
//! )
//! ```
//!
//! A [`MappingOrchestrator`](orchestrator::MappingOrchestrator) resolves both rigs and fills a
//! [`BoneLinkRegistry`](registry::BoneLinkRegistry), leaving it untouched unless both sides
//! resolved. Enabled links are then turned into
//! [`RotationConstraint`](constraint::RotationConstraint)s, which [`BoneMapperPlugin`] plays
//! back every frame.

pub mod assets;
pub mod bone_role;
pub mod config;
pub mod constraint;
pub mod errors;
pub mod matching;
pub mod notice;
pub mod orchestrator;
pub mod plugin;
pub mod registry;
pub mod resolve;
pub mod rig;

pub use bone_role::{BoneRole, RoleMap};
pub use plugin::BoneMapperPlugin;

pub mod prelude {
    pub use crate::{
        assets::{AssetDatabase, FileAssetDatabase, MemoryAssetDatabase},
        bone_role::{BoneRole, RoleMap},
        config::BoneMapperSettings,
        constraint::{ConstraintSink, ConstraintStatus, RotationConstraint},
        errors::{AssetError, MappingError, RigSide},
        notice::MapperNotice,
        orchestrator::MappingOrchestrator,
        plugin::BoneMapperPlugin,
        registry::{BoneGroup, BoneLink, BoneLinkRegistry},
        resolve::HumanoidMapResolver,
        rig::{Avatar, HumanDescription, HumanoidAnimator, RigSource},
    };
}
