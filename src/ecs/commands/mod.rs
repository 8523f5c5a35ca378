pub mod applicator;

use bevy_ecs::message::Message;

use crate::id::PlayerId;

pub use applicator::apply_faction_commands;

/// A faction operation requested by (or on behalf of) a player.
///
/// Gameplay systems emit these via `MessageWriter<FactionCommand>`. The
/// applicator in `SessionPhase::PostUpdate` processes them in arrival order:
/// each command calls into the registry, the outcome lands in the
/// `SessionLog`, and a `FactionEvent` is emitted either way.
#[derive(Message, Clone, Debug)]
pub struct FactionCommand {
    /// The player the operation is about.
    pub player: PlayerId,
    pub kind: FactionCommandKind,
}

impl FactionCommand {
    pub fn create(
        player: PlayerId,
        name: impl Into<String>,
        password: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            player,
            kind: FactionCommandKind::Create {
                name: name.into(),
                password: password.into(),
                color: color.into(),
            },
        }
    }

    pub fn join(player: PlayerId, name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            player,
            kind: FactionCommandKind::Join {
                name: name.into(),
                password: password.into(),
            },
        }
    }

    pub fn leave(player: PlayerId, disband_if_leader: bool) -> Self {
        Self {
            player,
            kind: FactionCommandKind::Leave { disband_if_leader },
        }
    }

    pub fn disband(player: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player,
            kind: FactionCommandKind::Disband { name: name.into() },
        }
    }

    pub fn change_password(player: PlayerId, new_password: impl Into<String>) -> Self {
        Self {
            player,
            kind: FactionCommandKind::ChangePassword {
                new_password: new_password.into(),
            },
        }
    }
}

/// All faction operations a command can request, mirroring the registry's
/// mutating API one-to-one.
///
/// The command stream is server-side and trusted: `Disband` tears down any
/// faction by name with no authorization check. A leader dissolving their
/// own faction arrives as `Leave { disband_if_leader: true }` instead, which
/// the registry does gate.
#[derive(Clone, Debug)]
pub enum FactionCommandKind {
    Create {
        name: String,
        password: String,
        color: String,
    },
    Join {
        name: String,
        password: String,
    },
    Leave {
        disband_if_leader: bool,
    },
    Disband {
        name: String,
    },
    ChangePassword {
        new_password: String,
    },
}
