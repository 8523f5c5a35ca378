use bevy_ecs::message::Message;

use crate::id::PlayerId;
use crate::model::FactionError;

/// Notifications emitted by the command applicator after it has applied (or
/// refused) a `FactionCommand`, for downstream systems to react to.
///
/// A superseding create or join emits the implied departure too: `Left` for
/// the old faction, then `Disbanded` if the departure emptied it, then the
/// `Created`/`Joined` for the new one.
#[derive(Message, Clone, Debug)]
pub enum FactionEvent {
    Created {
        player: PlayerId,
        name: String,
    },
    Joined {
        player: PlayerId,
        name: String,
    },
    Left {
        player: PlayerId,
        name: String,
    },
    /// The member list is the roster at the moment the faction came down.
    Disbanded {
        name: String,
        members: Vec<PlayerId>,
    },
    PasswordChanged {
        player: PlayerId,
        name: String,
    },
    Rejected {
        player: PlayerId,
        error: FactionError,
    },
}
