use std::fmt;

/// Stable identifier for a player within a session.
/// Display names may collide or change mid-session; every table in this
/// crate keys on this id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monotonic id allocator for players joining the session.
/// Ids are session-unique; a reconnecting player gets a fresh one unless
/// the caller reuses the old id explicitly.
#[derive(Debug)]
pub struct PlayerIdAllocator {
    next: u64,
}

impl PlayerIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_from(start: u64) -> Self {
        Self { next: start }
    }

    pub fn next_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next);
        self.next += 1;
        id
    }
}

impl Default for PlayerIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
