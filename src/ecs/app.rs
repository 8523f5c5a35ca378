use bevy_app::App;
use bevy_ecs::message::MessageRegistry;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs};

use super::clock::SessionClock;
use super::commands::{FactionCommand, apply_faction_commands};
use super::events::FactionEvent;
use super::resources::{PlayerEntityMap, SessionConfig, SessionFactions, SessionIds, SessionLog};
use super::schedule::{SessionPhase, configure_session_schedule};

/// Build a headless session app with the faction registry, clock, message
/// types, and the command applicator wired into a `SessionTick` schedule.
///
/// Manual tick control:
/// ```no_run
/// # use basewars_core::ecs::{SessionConfig, SessionTick, build_session_app};
/// let mut app = build_session_app(SessionConfig::default());
/// for _ in 0..128 {
///     app.world_mut().run_schedule(SessionTick);
/// }
/// ```
pub fn build_session_app(config: SessionConfig) -> App {
    let mut app = App::empty();

    // Core resources
    app.insert_resource(SessionClock::new());
    app.insert_resource(SessionFactions::default());
    app.insert_resource(SessionIds::default());
    app.insert_resource(PlayerEntityMap::new());
    app.insert_resource(SessionLog::new());
    app.insert_resource(config);

    // Register message types
    MessageRegistry::register_message::<FactionCommand>(app.world_mut());
    MessageRegistry::register_message::<FactionEvent>(app.world_mut());

    // Build schedule with message rotation + applicator
    let mut schedule = configure_session_schedule(ExecutorKind::SingleThreaded);
    schedule.add_systems(bevy_ecs::message::message_update_system.in_set(SessionPhase::PreUpdate));
    schedule.add_systems(apply_faction_commands.in_set(SessionPhase::PostUpdate));
    app.add_schedule(schedule);
    app
}

/// Build a session app with default configuration (no persistence).
pub fn build_default_session_app() -> App {
    build_session_app(SessionConfig::default())
}
