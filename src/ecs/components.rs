use bevy_ecs::component::Component;

use crate::id::PlayerId;
use crate::model::PlayerSave;

/// Core identity component on every player entity in the session.
#[derive(Component, Debug, Clone)]
pub struct SessionPlayer {
    pub id: PlayerId,
    pub name: String,
}

/// The player's persistent progression, loaded at spawn and written back at
/// despawn.
#[derive(Component, Debug, Clone)]
pub struct PlayerProgress(pub PlayerSave);
