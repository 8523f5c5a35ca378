use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

/// Session clock resource counting ticks since the session started.
///
/// The `advance_clock` system moves the clock forward at the end of each
/// tick (in `SessionPhase::Last`), so systems see the current tick before
/// it advances.
#[derive(Resource, Debug, Default)]
pub struct SessionClock {
    pub tick: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    /// Advance the clock by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

/// Bevy system that advances the session clock by one tick.
/// Registered in `SessionPhase::Last` so all other systems see the current
/// tick before it advances.
pub fn advance_clock(mut clock: ResMut<SessionClock>) {
    clock.advance();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_starts_at_zero() {
        let clock = SessionClock::new();
        assert_eq!(clock.tick, 0);
    }

    #[test]
    fn advance_increments_tick() {
        let mut clock = SessionClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.tick, 2);
    }
}
