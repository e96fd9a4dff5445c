use bevy::{
    ecs::{entity::Entity, world::World},
    log::error,
};

use crate::{
    assets::AssetDatabase,
    config::BoneMapperSettings,
    errors::{MappingError, MappingResult, RigSide},
    notice::MapperNotice,
    registry::{AssignCounts, BoneLinkRegistry},
    resolve::HumanoidMapResolver,
};

/// Fills a [`BoneLinkRegistry`] from the humanoid mappings of a source and a target rig.
pub struct MappingOrchestrator<'a, D: AssetDatabase + ?Sized> {
    resolver: HumanoidMapResolver<'a, D>,
}

impl<'a, D: AssetDatabase + ?Sized> MappingOrchestrator<'a, D> {
    pub fn new(db: &'a mut D, settings: &'a BoneMapperSettings) -> Self {
        Self {
            resolver: HumanoidMapResolver::new(db, settings),
        }
    }

    /// Runs [`try_auto_assign_all`](Self::try_auto_assign_all) and reports the outcome.
    pub fn auto_assign_all(
        &mut self,
        world: &World,
        source_root: Option<Entity>,
        target_root: Option<Entity>,
        registry: &mut BoneLinkRegistry,
    ) -> MapperNotice {
        match self.try_auto_assign_all(world, source_root, target_root, registry) {
            Ok(counts) => MapperNotice::info(format!(
                "Auto-assigned {} source and {} target bones from humanoid mappings.",
                counts.sources, counts.targets
            )),
            Err(MappingError::MissingInput(_)) => {
                MapperNotice::failure("Set both the source and the target root first.")
            }
            Err(MappingError::ResolutionFailure(side)) => MapperNotice::failure(format!(
                "Could not obtain a humanoid mapping for the {side} rig. Check the log for details."
            )),
            Err(err) => {
                error!("Auto-assign failed: {err}");
                MapperNotice::failure("Auto-assign failed. Check the log for details.")
            }
        }
    }

    /// Resolves both rigs, then overwrites the registry's links with every role they map.
    ///
    /// The registry is only touched once both sides have resolved, so any error leaves it
    /// exactly as it was.
    pub fn try_auto_assign_all(
        &mut self,
        world: &World,
        source_root: Option<Entity>,
        target_root: Option<Entity>,
        registry: &mut BoneLinkRegistry,
    ) -> MappingResult<AssignCounts> {
        let source_root = source_root.ok_or(MappingError::MissingInput(RigSide::Source))?;
        let target_root = target_root.ok_or(MappingError::MissingInput(RigSide::Target))?;

        let source = self
            .resolver
            .resolve_map(world, source_root)?
            .ok_or(MappingError::ResolutionFailure(RigSide::Source))?;
        let target = self
            .resolver
            .resolve_map(world, target_root)?
            .ok_or(MappingError::ResolutionFailure(RigSide::Target))?;

        Ok(registry.assign(&source, &target))
    }
}
