use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;

use crate::id::PlayerId;

/// Bidirectional mapping between player ids and Bevy entities.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerEntityMap {
    to_bevy: BTreeMap<PlayerId, Entity>,
    to_player: BTreeMap<Entity, PlayerId>,
}

impl PlayerEntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping. Panics if the player is already registered.
    pub fn insert(&mut self, player: PlayerId, entity: Entity) {
        let prev = self.to_bevy.insert(player, entity);
        assert!(
            prev.is_none(),
            "duplicate player {player} in PlayerEntityMap"
        );
        self.to_player.insert(entity, player);
    }

    /// Drop the mapping for an entity, returning the player id it carried.
    pub fn remove(&mut self, entity: Entity) -> Option<PlayerId> {
        let player = self.to_player.remove(&entity)?;
        self.to_bevy.remove(&player);
        Some(player)
    }

    /// Look up a Bevy entity by player id.
    pub fn get_entity(&self, player: PlayerId) -> Option<Entity> {
        self.to_bevy.get(&player).copied()
    }

    /// Look up a Bevy entity by player id. Panics if not found.
    pub fn entity(&self, player: PlayerId) -> Entity {
        *self
            .to_bevy
            .get(&player)
            .unwrap_or_else(|| panic!("no Bevy entity for player {player}"))
    }

    /// Look up a player id by Bevy entity.
    pub fn get_player(&self, entity: Entity) -> Option<PlayerId> {
        self.to_player.get(&entity).copied()
    }

    /// Look up a player id by Bevy entity. Panics if not found.
    pub fn player(&self, entity: Entity) -> PlayerId {
        *self
            .to_player
            .get(&entity)
            .unwrap_or_else(|| panic!("no player id for entity {entity:?}"))
    }

    pub fn len(&self) -> usize {
        self.to_bevy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_bevy.is_empty()
    }
}
