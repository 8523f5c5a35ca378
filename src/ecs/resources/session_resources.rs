use std::path::PathBuf;

use bevy_ecs::resource::Resource;

use crate::id::PlayerIdAllocator;
use crate::model::{FactionRegistry, SaveDefaults};

/// Session configuration (persistence root and fresh-save defaults).
#[derive(Resource, Debug, Clone, Default)]
pub struct SessionConfig {
    /// Directory for per-player save files. `None` disables persistence.
    pub save_dir: Option<PathBuf>,
    pub defaults: SaveDefaults,
}

/// The authoritative faction state for the running session.
#[derive(Resource, Debug, Default)]
pub struct SessionFactions(pub FactionRegistry);

/// Allocates session-unique player ids.
#[derive(Resource, Debug, Default)]
pub struct SessionIds(pub PlayerIdAllocator);
