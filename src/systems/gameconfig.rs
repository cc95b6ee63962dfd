//! Engine configuration change detection system.
//!
//! Monitors [`EngineConfig`] for changes and pushes its settings to the
//! camera, renderers, clock and debug overlay.

use bevy_ecs::prelude::*;
use log::info;

use crate::resources::camera2d::Camera2D;
use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::EngineConfig;
use crate::resources::renderers::Renderers;
use crate::resources::worldtime::WorldTime;

/// Applies configuration on insertion and on every later change.
///
/// Every target resource is optional; missing ones are skipped.
pub fn apply_engine_config_changes(
    config: Option<Res<EngineConfig>>,
    camera: Option<ResMut<Camera2D>>,
    renderers: Option<ResMut<Renderers>>,
    time: Option<ResMut<WorldTime>>,
    debug_mode: Option<Res<DebugMode>>,
    mut commands: Commands,
) {
    let Some(config) = config else {
        return;
    };
    if !config.is_changed() {
        return;
    }

    let (width, height) = config.render_size();
    if let Some(mut camera) = camera {
        if camera.viewport.x != width || camera.viewport.y != height {
            camera.on_viewport_resized(width, height);
        }
    }
    if let Some(mut renderers) = renderers {
        renderers.on_back_buffer_resized(width, height);
    }
    if let Some(mut time) = time {
        if time.time_scale != config.time_scale {
            time.time_scale = config.time_scale.max(0.0);
        }
    }
    match (config.debug, debug_mode.is_some()) {
        (true, false) => commands.insert_resource(DebugMode::default()),
        (false, true) => commands.remove_resource::<DebugMode>(),
        _ => {}
    }

    info!(
        "Engine config applied: {}x{}, debug={}, time scale={}",
        config.render_width, config.render_height, config.debug, config.time_scale
    );
}
