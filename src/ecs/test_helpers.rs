use bevy_app::App;

use crate::ecs::clock::SessionClock;
use crate::ecs::schedule::SessionTick;

/// Run `n` ticks of the session schedule.
pub fn tick(app: &mut App, n: u32) {
    for _ in 0..n {
        app.world_mut().run_schedule(SessionTick);
    }
}

/// Return the current tick from the clock resource.
pub fn current_tick(app: &App) -> u64 {
    app.world().resource::<SessionClock>().tick
}
