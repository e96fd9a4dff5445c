use bevy::{
    app::{App, Plugin, PostUpdate},
    ecs::schedule::{IntoScheduleConfigs, SystemSet},
    transform::TransformSystems,
};

use crate::{
    assets::{AnimationType, ModelImportSettings},
    config::BoneMapperSettings,
    constraint::{RotationConstraint, follow_rotation_constraints},
    registry::BoneLinkRegistry,
    rig::{HumanDescription, RigSource},
};

#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct BoneMapperSet;

/// Adds bone mapping resources and rotation-constraint playback to an app
#[derive(Default)]
pub struct BoneMapperPlugin;

impl Plugin for BoneMapperPlugin {
    fn build(&self, app: &mut App) {
        self.register_types(app);

        app.init_resource::<BoneMapperSettings>()
            .init_resource::<BoneLinkRegistry>();

        app.configure_sets(
            PostUpdate,
            BoneMapperSet.before(TransformSystems::Propagate),
        );
        app.add_systems(
            PostUpdate,
            follow_rotation_constraints.in_set(BoneMapperSet),
        );
    }
}

impl BoneMapperPlugin {
    fn register_types(&self, app: &mut App) {
        app.register_type::<RotationConstraint>()
            .register_type::<RigSource>()
            .register_type::<HumanDescription>()
            .register_type::<ModelImportSettings>()
            .register_type::<AnimationType>()
            .register_type::<BoneMapperSettings>();
    }
}
