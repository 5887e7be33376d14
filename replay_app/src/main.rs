//! Replay viewer shell
//!
//! Loads a recording and plays it through a headless replay scene, then
//! simulates a pointer click on the first entity of the last frame and
//! reports pool usage.
//!
//! Usage: `replay_viewer <recording.json> [--settings settings.toml|settings.ron]`

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use replay_scene::config::{Config, ConfigError, ViewerSettings};
use replay_scene::foundation::{logging, math::Vec3};
use clap::Parser;
use replay_scene::recording::{EntityId, Recording, RecordingError};
use replay_scene::render::{BackendError, HeadlessBackend, PickRay, SceneBackend};
use replay_scene::scene::ReplayScene;
use thiserror::Error;

const FRAME_TIME: f32 = 1.0 / 60.0;

/// Shell errors
#[derive(Error, Debug)]
enum ViewerError {
    #[error("Failed to load recording: {0}")]
    Recording(#[from] RecordingError),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("Scene backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Replay viewer command line
#[derive(Parser, Debug)]
#[command(name = "replay_viewer")]
#[command(about = "Play a recorded simulation through a headless replay scene", long_about = None)]
struct Arguments {
    /// Recording file (JSON)
    recording: PathBuf,

    /// Viewer settings (TOML or RON); defaults are used when the file is missing
    #[arg(short, long, default_value = "replay_viewer.toml")]
    settings: PathBuf,
}

/// Play the recording and return the entity the simulated click selected
fn run(args: &Arguments) -> Result<Option<EntityId>, ViewerError> {
    let recording = Recording::load(&args.recording)?;
    log::info!("Loaded {} frames from {}", recording.len(), args.recording.display());

    let mut settings = ViewerSettings::load_or_default(&args.settings)?;
    if settings.active_layers.is_empty() {
        settings.active_layers = recording.layers().into_iter().collect();
        log::info!("Activating recorded layers: {:?}", settings.active_layers);
    }

    let mut scene = ReplayScene::new(HeadlessBackend::new(), settings);
    scene.initialize(None)?;

    let clicked = Rc::new(Cell::new(None));
    let sink = Rc::clone(&clicked);
    scene.set_on_entity_selected(move |id| sink.set(Some(id)));

    for frame in recording.frames() {
        scene.present_frame(frame);
        scene.update(FRAME_TIME);
    }

    let target = recording
        .frames()
        .last()
        .and_then(|frame| frame.entities.values().next())
        .map(|entity| entity.position());

    if let Some(position) = target {
        let ray = PickRay::new(position - Vec3::z() * 10.0, Vec3::z());
        scene.pointer_move(&ray);
        scene.pointer_down(&ray);
    }

    let selected = clicked.get();
    if let Some(id) = selected {
        log::info!("Pointer selected entity {}", id);
        scene.select_entity(id);
        while scene.update(FRAME_TIME) {}
        let camera = scene.backend().camera();
        log::info!(
            "Camera framed at ({:.2}, {:.2}, {:.2})",
            camera.position.x,
            camera.position.y,
            camera.position.z
        );
    } else {
        log::info!("Nothing under the pointer");
    }

    for (kind, stats) in scene.binder().pools().stats() {
        log::info!(
            "{} pool: {} buckets, {} instances, peak {} in use",
            kind,
            stats.buckets,
            stats.instances,
            stats.peak_used
        );
    }
    log::info!(
        "{} meshes and {} materials alive",
        scene.backend().mesh_count(),
        scene.backend().material_count()
    );

    scene.shutdown();
    Ok(selected)
}

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {:?}", panic_info);

        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    logging::init_with_default(log::LevelFilter::Info);

    log::info!("Starting replay viewer");

    let args = Arguments::parse();
    match run(&args) {
        Ok(_) => log::info!("Replay viewer finished"),
        Err(e) => {
            log::error!("Replay viewer failed: {}", e);
            std::process::exit(1);
        }
    }
}
