pub mod ecs;
pub mod id;
pub mod model;
pub mod save;

pub use id::{PlayerId, PlayerIdAllocator};
pub use model::{
    Faction, FactionError, FactionRegistry, FactionTag, LeaveOutcome, MemberAgent, PlayerSave,
    SaveDefaults,
};
