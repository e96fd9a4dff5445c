use std::{error::Error, path::PathBuf, process::ExitCode};

use bevy::{
    app::App,
    ecs::{entity::Entity, world::World},
    log::{LogPlugin, error, info},
};
use bevy_bone_mapper::{
    assets::{AssetDatabase, FileAssetDatabase},
    config::BoneMapperSettings,
    constraint,
    errors::AssetError,
    orchestrator::MappingOrchestrator,
    plugin::BoneMapperPlugin,
    registry::BoneLinkRegistry,
};
use clap::Parser;

/// Maps the bones of a target rig onto a source rig and prints the resulting links as RON.
#[derive(Parser)]
struct Cli {
    /// Asset folder the model paths are relative to
    #[arg(short, long)]
    asset_source: PathBuf,
    /// Model driving the rotations (`*.rig.ron`)
    #[arg(short, long)]
    source: String,
    /// Model following the rotations (`*.rig.ron`)
    #[arg(short, long)]
    target: String,
    /// Mapper settings (`.ron`)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Create rotation constraints for every enabled link and run one frame
    #[arg(long)]
    apply: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut app = App::new();
    app.add_plugins(LogPlugin::default())
        .add_plugins(BoneMapperPlugin);

    match run(&cli, &mut app) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, app: &mut App) -> Result<bool, Box<dyn Error>> {
    if let Some(path) = &cli.settings {
        app.insert_resource(BoneMapperSettings::load(path)?);
    }
    let settings = app.world().resource::<BoneMapperSettings>().clone();
    let mut db = FileAssetDatabase::new(&cli.asset_source);

    let world = app.world_mut();
    let source_root = instantiate(&db, world, &cli.source)?;
    let target_root = instantiate(&db, world, &cli.target)?;

    let mut registry = world
        .remove_resource::<BoneLinkRegistry>()
        .unwrap_or_default();
    let notice = MappingOrchestrator::new(&mut db, &settings).auto_assign_all(
        world,
        Some(source_root),
        Some(target_root),
        &mut registry,
    );
    if notice.is_failure() {
        return Ok(false);
    }

    if cli.apply {
        constraint::apply(world, Some(target_root), &registry);
    }

    let report = ron::ser::to_string_pretty(
        &registry.report(world),
        ron::ser::PrettyConfig::default(),
    )?;
    println!("{report}");

    world.insert_resource(registry);
    if cli.apply {
        app.update();
    }
    Ok(true)
}

fn instantiate(
    db: &FileAssetDatabase,
    world: &mut World,
    path: &str,
) -> Result<Entity, AssetError> {
    let model = db
        .load_model(path)?
        .ok_or_else(|| AssetError::Missing(path.to_string()))?;
    let root = model.instantiate(world, path);
    info!("Instantiated {path:?}");
    Ok(root)
}
