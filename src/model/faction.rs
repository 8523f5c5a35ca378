use std::collections::BTreeSet;

use crate::id::PlayerId;

/// A registered faction, keyed by name in the registry table.
///
/// `leader` is `Some` from creation onward; the only way a registered
/// faction loses it is the leader departing through the join-supersede path
/// (an ordinary leave by the leader either disbands the faction or is
/// refused).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faction {
    pub name: String,
    pub leader: Option<PlayerId>,
    /// Empty string means the faction is open to anyone.
    pub password: String,
    /// Display color, set at creation and never changed.
    pub color: String,
    pub members: BTreeSet<PlayerId>,
}

impl Faction {
    pub fn new(
        name: impl Into<String>,
        leader: PlayerId,
        password: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            leader: Some(leader),
            password: password.into(),
            color: color.into(),
            members: BTreeSet::from([leader]),
        }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }

    /// Password check for joiners. Open factions accept anything, including
    /// a stale password typed out of habit.
    pub fn accepts_password(&self, supplied: &str) -> bool {
        self.is_open() || self.password == supplied
    }

    pub fn is_member(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }

    pub fn is_led_by(&self, player: PlayerId) -> bool {
        self.leader == Some(player)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
