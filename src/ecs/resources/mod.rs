pub mod entity_map;
pub mod session_log;
pub mod session_resources;

pub use entity_map::PlayerEntityMap;
pub use session_log::{SessionEvent, SessionEventKind, SessionLog};
pub use session_resources::{SessionConfig, SessionFactions, SessionIds};
