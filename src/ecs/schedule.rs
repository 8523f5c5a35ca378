use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, ScheduleLabel, SystemSet};

use super::clock::advance_clock;

/// Schedule label for the session tick.
/// Run manually each tick via `app.world_mut().run_schedule(SessionTick)`.
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionTick;

/// Ordered phases within each session tick.
///
/// Systems are assigned to phases via `.in_set(SessionPhase::Update)` etc.
/// Message rotation runs in PreUpdate, gameplay systems emit `FactionCommand`s
/// in Update, the applicator runs in PostUpdate, the clock advances in Last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    PreUpdate,
    Update,
    PostUpdate,
    Last,
}

/// Build a configured `SessionTick` schedule with phase ordering.
pub fn configure_session_schedule(executor: ExecutorKind) -> Schedule {
    let mut schedule = Schedule::new(SessionTick);
    schedule.set_executor_kind(executor);
    schedule.configure_sets(
        (
            SessionPhase::PreUpdate,
            SessionPhase::Update,
            SessionPhase::PostUpdate,
            SessionPhase::Last,
        )
            .chain(),
    );
    schedule.add_systems(advance_clock.in_set(SessionPhase::Last));
    schedule
}
