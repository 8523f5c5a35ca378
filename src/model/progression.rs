//! Level and XP math, kept as pure functions so save handling and session
//! code share one implementation.
//!
//! The curve is linear: going from `level` to `level + 1` costs
//! `(level + 1) * 250` XP, up to a hard cap of 5000.

pub const MAX_LEVEL: u32 = 5000;
pub const XP_MULTIPLIER: u64 = 250;

/// XP required to go from `level` to `level + 1`.
pub fn xp_for_next_level(level: u32) -> u64 {
    (u64::from(level) + 1) * XP_MULTIPLIER
}

pub fn has_level(level: u32, required: u32) -> bool {
    level >= required
}

pub fn clamp_level(level: u32) -> u32 {
    level.min(MAX_LEVEL)
}

pub fn levels_until_max(level: u32) -> u32 {
    MAX_LEVEL.saturating_sub(level)
}

/// Result of folding pending level-ups into a level/XP pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGain {
    pub level: u32,
    pub xp: u64,
    pub leveled_up: bool,
}

/// Fold pending level-ups into a level/XP pair after an XP gain. Handles
/// massive grants that are worth several levels in one call. At the cap the
/// level pins to [`MAX_LEVEL`] and the leftover XP is discarded, but only
/// once it crosses the next-level cost; smaller amounts are left parked.
pub fn apply_experience(mut level: u32, mut xp: u64) -> LevelGain {
    let mut leveled_up = false;
    while xp >= xp_for_next_level(level) {
        if level >= MAX_LEVEL {
            level = MAX_LEVEL;
            xp = 0;
            leveled_up = true;
            break;
        }
        let needed = xp_for_next_level(level);
        level += 1;
        xp -= needed;
        leveled_up = true;
        tracing::debug!("level up: now {} with {} xp left", level, xp);
    }
    LevelGain {
        level,
        xp,
        leveled_up,
    }
}

/// Total XP accumulated across all completed levels plus the current XP.
pub fn total_xp_earned(level: u32, xp: u64) -> u64 {
    let mut total = xp;
    for i in 1..level {
        total += xp_for_next_level(i);
    }
    total
}

/// Progress toward the next level as a percentage. Pinned to 100 at the
/// cap; can exceed 100 for a pair with level-ups still pending.
pub fn level_progress(level: u32, xp: u64) -> f32 {
    if level >= MAX_LEVEL {
        return 100.0;
    }
    xp as f32 / xp_for_next_level(level) as f32 * 100.0
}
