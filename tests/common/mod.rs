use bevy_app::App;
use bevy_ecs::message::Messages;

use basewars_core::PlayerId;
use basewars_core::ecs::{
    FactionCommand, FactionEvent, SessionConfig, SessionFactions, SessionPlayer, build_session_app,
    spawn_player,
};
use basewars_core::model::FactionRegistry;

pub fn session() -> App {
    build_session_app(SessionConfig::default())
}

/// Spawn a player and hand back their session id.
pub fn spawn(app: &mut App, name: &str) -> PlayerId {
    let entity = spawn_player(app.world_mut(), name);
    app.world().get::<SessionPlayer>(entity).unwrap().id
}

pub fn command(app: &mut App, cmd: FactionCommand) {
    app.world_mut()
        .resource_mut::<Messages<FactionCommand>>()
        .write(cmd);
}

pub fn drain_events(app: &mut App) -> Vec<FactionEvent> {
    app.world_mut()
        .resource_mut::<Messages<FactionEvent>>()
        .drain()
        .collect()
}

pub fn registry(app: &App) -> &FactionRegistry {
    &app.world().resource::<SessionFactions>().0
}
