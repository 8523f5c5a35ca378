pub mod app;
pub mod clock;
pub mod commands;
pub mod components;
pub mod events;
pub mod resources;
pub mod schedule;
pub mod spawn;
pub mod test_helpers;

pub use app::{build_default_session_app, build_session_app};
pub use clock::SessionClock;
pub use commands::{FactionCommand, FactionCommandKind, apply_faction_commands};
pub use components::{PlayerProgress, SessionPlayer};
pub use events::FactionEvent;
pub use resources::{
    PlayerEntityMap, SessionConfig, SessionEvent, SessionEventKind, SessionFactions, SessionIds,
    SessionLog,
};
pub use schedule::{SessionPhase, SessionTick, configure_session_schedule};
pub use spawn::{despawn_player, spawn_player, spawn_player_with_id};
