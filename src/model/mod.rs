pub mod agent;
pub mod faction;
pub mod progression;
pub mod registry;
pub mod savedata;

pub use agent::{FactionTag, MemberAgent};
pub use faction::Faction;
pub use registry::{FactionError, FactionRegistry, LeaveOutcome};
pub use savedata::{PlayerSave, SaveDefaults};
