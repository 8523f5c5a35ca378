use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

use crate::ecs::clock::SessionClock;
use crate::ecs::components::{PlayerProgress, SessionPlayer};
use crate::ecs::resources::{
    PlayerEntityMap, SessionConfig, SessionEventKind, SessionFactions, SessionIds, SessionLog,
};
use crate::id::PlayerId;
use crate::model::PlayerSave;
use crate::save;

/// Spawn a connected player with a freshly allocated id.
pub fn spawn_player(world: &mut World, name: &str) -> Entity {
    let id = world.resource_mut::<SessionIds>().0.next_id();
    spawn_player_with_id(world, id, name)
}

/// Spawn a connected player under a caller-chosen id: register their
/// membership record, load (or create) their save when persistence is on,
/// and index the entity in the map.
///
/// Reconnects come through here with the player's previous id, so their
/// save file is found again and any surviving membership record picked up.
pub fn spawn_player_with_id(world: &mut World, id: PlayerId, name: &str) -> Entity {
    world
        .resource_mut::<SessionFactions>()
        .0
        .register_player(id, name);

    let config = world.resource::<SessionConfig>();
    let progress = match &config.save_dir {
        Some(dir) => save::load_or_create(&save::save_path(dir, id), &config.defaults),
        None => PlayerSave::fresh(&config.defaults),
    };

    let entity = world
        .spawn((
            SessionPlayer {
                id,
                name: name.to_string(),
            },
            PlayerProgress(progress),
        ))
        .id();
    world.resource_mut::<PlayerEntityMap>().insert(id, entity);

    let tick = world.resource::<SessionClock>().tick;
    world.resource_mut::<SessionLog>().record(
        tick,
        SessionEventKind::PlayerConnected,
        format!("{name} (id {id}) connected"),
    );
    entity
}

/// Tear down a departing player synchronously: run registry cleanup, stamp
/// and write their save, drop them from the map, and despawn the entity.
/// Save failures are logged, never fatal.
pub fn despawn_player(world: &mut World, entity: Entity) {
    let Some(player) = world.resource::<PlayerEntityMap>().get_player(entity) else {
        tracing::warn!("despawn_player: entity {:?} is not a mapped player", entity);
        return;
    };
    let name = world
        .get::<SessionPlayer>(entity)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| format!("player {player}"));

    world
        .resource_mut::<SessionFactions>()
        .0
        .cleanup_player(player);

    let save_dir = world.resource::<SessionConfig>().save_dir.clone();
    if let Some(dir) = save_dir {
        if let Some(mut progress) = world.get_mut::<PlayerProgress>(entity) {
            progress.0.touch();
            let save = progress.0.clone();
            let path = save::save_path(&dir, player);
            if let Err(err) = save::save_player(&path, &save) {
                tracing::error!("failed to write save {:?}: {}", path, err);
            }
        }
    }

    world.resource_mut::<PlayerEntityMap>().remove(entity);
    world.despawn(entity);

    let tick = world.resource::<SessionClock>().tick;
    world.resource_mut::<SessionLog>().record(
        tick,
        SessionEventKind::PlayerDisconnected,
        format!("{name} (id {player}) disconnected"),
    );
}
