//! The parts of a rig the mapper inspects: its animator, avatar, and named bone hierarchy.

pub mod avatar;
pub mod bone_path;
pub mod hierarchy;

pub use avatar::{Avatar, HumanBone, HumanDescription, HumanoidAnimator, RigSource, find_animator};
pub use bone_path::BonePath;
