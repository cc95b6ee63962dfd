//! Debug overlay toggle.
//!
//! Triggering [`SwitchDebugEvent`] flips the debug render pass. With an
//! [`EngineConfig`] present the flip goes through `EngineConfig::debug`, and
//! [`apply_engine_config_changes`](crate::systems::gameconfig::apply_engine_config_changes)
//! inserts or removes [`DebugMode`] on its next run. Without one the
//! resource is toggled directly.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

use crate::resources::debugmode::DebugMode;
use crate::resources::gameconfig::EngineConfig;

#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchDebugEvent {}

pub fn switch_debug_observer(
    _trigger: On<SwitchDebugEvent>,
    mut commands: Commands,
    config: Option<ResMut<EngineConfig>>,
    debug_mode: Option<Res<DebugMode>>,
) {
    let enable = debug_mode.is_none();
    if let Some(mut config) = config {
        config.debug = enable;
    } else if enable {
        commands.insert_resource(DebugMode::default());
    } else {
        commands.remove_resource::<DebugMode>();
    }
    info!("Debug overlay {}", if enable { "enabled" } else { "disabled" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::gameconfig::apply_engine_config_changes;

    #[test]
    fn test_trigger_toggles_debug_mode() {
        let mut world = World::new();
        world.add_observer(switch_debug_observer);

        world.trigger(SwitchDebugEvent {});
        world.flush();
        assert!(world.get_resource::<DebugMode>().is_some());

        world.trigger(SwitchDebugEvent {});
        world.flush();
        assert!(world.get_resource::<DebugMode>().is_none());
    }

    #[test]
    fn test_toggle_goes_through_config() {
        let mut world = World::new();
        world.insert_resource(EngineConfig::new());
        world.add_observer(switch_debug_observer);
        let mut schedule = Schedule::default();
        schedule.add_systems(apply_engine_config_changes);
        schedule.run(&mut world);
        assert!(world.get_resource::<DebugMode>().is_none());

        world.trigger(SwitchDebugEvent {});
        world.flush();
        assert!(world.resource::<EngineConfig>().debug);
        schedule.run(&mut world);
        assert!(world.get_resource::<DebugMode>().is_some());
    }
}
