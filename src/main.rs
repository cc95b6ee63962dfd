//! Lumen2D headless preview.
//!
//! Loads an animation store, plays one clip on a sprite entity and ticks a
//! `bevy_ecs` schedule with a fixed delta, logging every frame change and the
//! completion. Each tick also runs the render pass into a recording batcher,
//! so the whole pipeline is exercised without a window.
//!
//! # Running
//!
//! ```sh
//! cargo run -- --store assets/animations.json --clip walk --seconds 2
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, trace, warn};

use lumen2d::components::animation::SpriteAnimator;
use lumen2d::components::mapposition::MapPosition;
use lumen2d::components::renderable::Renderable;
use lumen2d::components::sprite::Sprite;
use lumen2d::events::animation::{AnimationCompleted, AnimationFrameChanged};
use lumen2d::events::switchdebug::{SwitchDebugEvent, switch_debug_observer};
use lumen2d::resources::animationstore::AnimationStore;
use lumen2d::resources::batcher::DrawList;
use lumen2d::resources::camera2d::Camera2D;
use lumen2d::resources::gameconfig::EngineConfig;
use lumen2d::resources::worldtime::WorldTime;
use lumen2d::systems::animation::{
    init_animation_messages, sprite_animation, update_animation_messages,
};
use lumen2d::systems::bounds::{compute_renderable_bounds, invalidate_renderable_bounds};
use lumen2d::systems::gameconfig::apply_engine_config_changes;
use lumen2d::systems::render::render_all;
use lumen2d::systems::time::update_world_time;

/// Lumen2D animation preview
#[derive(Parser)]
#[command(version, about = "Plays a sprite animation headlessly and logs its events.")]
struct Cli {
    /// Animation store JSON file.
    #[arg(long, value_name = "PATH")]
    store: PathBuf,

    /// Key of the clip to play.
    #[arg(long)]
    clip: String,

    /// Frame the clip starts on.
    #[arg(long, default_value_t = 0)]
    start_frame: usize,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 2.0)]
    seconds: f32,

    /// Fixed frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Reverse playback once this many seconds have elapsed.
    #[arg(long, value_name = "SECONDS")]
    reverse_at: Option<f32>,

    /// Engine configuration INI file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Toggle the debug render pass on top of the configured setting.
    #[arg(long)]
    toggle_debug: bool,
}

fn log_animation_messages(
    mut completed: MessageReader<AnimationCompleted<String>>,
    mut frame_changed: MessageReader<AnimationFrameChanged<String>>,
    time: Res<WorldTime>,
    sprites: Query<&Sprite>,
) {
    for msg in frame_changed.read() {
        let region = sprites
            .get(msg.entity)
            .ok()
            .and_then(Sprite::subtexture)
            .map(|s| s.source_rect);
        info!(
            "[{:>7.3}s] '{}' frame {} {:?}",
            time.elapsed, msg.key, msg.frame, region
        );
    }
    for msg in completed.read() {
        info!("[{:>7.3}s] '{}' completed", time.elapsed, msg.key);
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.dt <= 0.0 || !cli.dt.is_finite() {
        error!("--dt must be a positive number of seconds");
        return ExitCode::FAILURE;
    }

    let mut config = match &cli.config {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("Using default engine config: {}", e);
    }

    let mut store = AnimationStore::new();
    if let Err(e) = store.load_from_file(&cli.store) {
        error!("Failed to load {}: {}", cli.store.display(), e);
        return ExitCode::FAILURE;
    }

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
    let (width, height) = config.render_size();
    world.insert_resource(Camera2D::screen_space(width, height));
    world.insert_resource(config);
    init_animation_messages::<String>(&mut world);

    let mut sprite = Sprite::empty();
    let mut animator = SpriteAnimator::from_store(&store, &mut sprite);
    if let Err(e) = animator.play(cli.clip.clone(), cli.start_frame, &mut sprite) {
        error!("Cannot play '{}': {}", cli.clip, e);
        return ExitCode::FAILURE;
    }
    let entity = world
        .spawn((
            MapPosition::new(width * 0.5, height * 0.5),
            Renderable::new(),
            sprite,
            animator,
        ))
        .id();

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            apply_engine_config_changes,
            sprite_animation::<String>,
            invalidate_renderable_bounds,
            log_animation_messages,
            update_animation_messages::<String>,
        )
            .chain(),
    );

    world.add_observer(switch_debug_observer);

    // --------------- Main loop ---------------
    let ticks = (cli.seconds / cli.dt).ceil().max(0.0) as u64;
    let mut reversed = false;
    let mut draws = DrawList::new();
    info!("Previewing '{}' for {} ticks of {}s", cli.clip, ticks, cli.dt);

    for tick in 0..ticks {
        update_world_time(&mut world, cli.dt);

        let elapsed = world.resource::<WorldTime>().elapsed;
        if !reversed && cli.reverse_at.is_some_and(|at| elapsed >= at) {
            if let Some(mut animator) = world.get_mut::<SpriteAnimator<String>>(entity) {
                animator.reverse_direction();
                info!("[{:>7.3}s] reversed", elapsed);
            }
            reversed = true;
        }

        schedule.run(&mut world);
        if tick == 0 && cli.toggle_debug {
            world.trigger(SwitchDebugEvent {});
            world.flush();
        }
        compute_renderable_bounds(&mut world);

        draws.clear();
        render_all(&mut world, &mut draws);
        trace!("Recorded {} draw commands", draws.len());

        let playing = world
            .get::<SpriteAnimator<String>>(entity)
            .is_some_and(|a| a.is_playing());
        if !playing {
            info!("Playback finished");
            break;
        }
    }

    ExitCode::SUCCESS
}
