use std::collections::BTreeMap;
use std::fmt;

use super::agent::MemberAgent;
use super::faction::Faction;
use crate::id::PlayerId;

/// Why a faction operation was refused. All of these are expected outcomes;
/// a refused operation performs no mutation at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactionError {
    AlreadyExists(String),
    NotFound(String),
    WrongPassword,
    LeaderMustDisband,
    NotLeader,
    NotInFaction,
    InvalidName,
    UnknownPlayer(PlayerId),
}

impl fmt::Display for FactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactionError::AlreadyExists(name) => write!(f, "faction {name:?} already exists"),
            FactionError::NotFound(name) => write!(f, "faction {name:?} does not exist"),
            FactionError::WrongPassword => f.write_str("wrong faction password"),
            FactionError::LeaderMustDisband => {
                f.write_str("the leader cannot leave; disband the faction instead")
            }
            FactionError::NotLeader => f.write_str("only the faction leader can do that"),
            FactionError::NotInFaction => f.write_str("not in a faction"),
            FactionError::InvalidName => f.write_str("faction name cannot be empty"),
            FactionError::UnknownPlayer(id) => write!(f, "no player with id {id} in the session"),
        }
    }
}

impl std::error::Error for FactionError {}

/// How a leave resolved: the player walked out of a still-standing faction,
/// or the faction came down with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    Disbanded,
}

/// The authoritative faction table plus the per-player membership records.
///
/// Every mutation goes through here. The agents mirror the table (they are
/// the reverse index player → faction) and are updated in the same call
/// that touches the table, so a tag names a faction iff that faction's
/// member set contains the player.
#[derive(Debug)]
pub struct FactionRegistry {
    factions: BTreeMap<String, Faction>,
    agents: BTreeMap<PlayerId, MemberAgent>,
}

impl FactionRegistry {
    pub fn new() -> Self {
        Self {
            factions: BTreeMap::new(),
            agents: BTreeMap::new(),
        }
    }

    // --- session roster ---

    /// Register a connected player, creating their membership record.
    /// Registering a known id again is a reconnect: the display name is
    /// refreshed and any membership kept.
    pub fn register_player(&mut self, id: PlayerId, display_name: &str) {
        match self.agents.get_mut(&id) {
            Some(agent) => agent.set_display_name(display_name),
            None => {
                self.agents.insert(id, MemberAgent::new(id, display_name));
                tracing::info!("{} (id {}) entered the session", display_name, id);
            }
        }
    }

    /// Teardown for a departing player, run synchronously before their
    /// session state is dropped. A leader takes the whole faction down with
    /// them (every member's tag is cleared here, not later); a plain member
    /// just leaves. Unknown ids are a no-op.
    pub fn cleanup_player(&mut self, player: PlayerId) {
        let Some(agent) = self.agents.get(&player) else {
            return;
        };
        let who = agent.display_name().to_string();
        match agent.tag().cloned() {
            Some(tag) if tag.leader => {
                self.disband_internal(&tag.name).unwrap_or_else(|| {
                    panic!("cleanup_player: tagged faction {:?} not in table", tag.name)
                });
            }
            Some(_) => self.force_leave(player),
            None => {}
        }
        self.agents.remove(&player);
        tracing::info!("{} (id {}) left the session", who, player);
    }

    // --- mutations ---

    /// Create a faction with `creator` as leader and sole member. An empty
    /// `password` leaves the faction open to anyone.
    ///
    /// The creator is pulled out of any faction they are currently in
    /// first, exactly as if they had joined an existing one.
    pub fn create_faction(
        &mut self,
        creator: PlayerId,
        name: &str,
        password: &str,
        color: &str,
    ) -> Result<&Faction, FactionError> {
        let Some(agent) = self.agents.get(&creator) else {
            return Err(FactionError::UnknownPlayer(creator));
        };
        let who = agent.display_name().to_string();
        if name.is_empty() {
            return Err(FactionError::InvalidName);
        }
        if self.factions.contains_key(name) {
            return Err(FactionError::AlreadyExists(name.to_string()));
        }
        self.force_leave(creator);
        self.factions
            .insert(name.to_string(), Faction::new(name, creator, password, color));
        self.agent_mut(creator).set_tag(name, true);
        tracing::info!("faction {:?} created by {}", name, who);
        Ok(&self.factions[name])
    }

    /// Join a faction by name. Open factions ignore the supplied password.
    ///
    /// A failed join never disturbs the player's current membership. A
    /// successful one always supersedes it, even for a leader, whose old
    /// faction is left standing but leaderless rather than disbanded.
    /// Joining the faction you are already in is a no-op success.
    pub fn join_faction(
        &mut self,
        player: PlayerId,
        name: &str,
        password: &str,
    ) -> Result<(), FactionError> {
        let Some(agent) = self.agents.get(&player) else {
            return Err(FactionError::UnknownPlayer(player));
        };
        let who = agent.display_name().to_string();
        let faction = self
            .factions
            .get(name)
            .ok_or_else(|| FactionError::NotFound(name.to_string()))?;
        if !faction.accepts_password(password) {
            return Err(FactionError::WrongPassword);
        }
        if faction.is_member(player) {
            // rejoining is harmless; without this a rejoining leader would
            // demote themselves through the supersede path
            return Ok(());
        }
        self.force_leave(player);
        let faction = self.factions.get_mut(name).unwrap_or_else(|| {
            panic!("join_faction: faction {name:?} vanished during supersede")
        });
        faction.members.insert(player);
        self.agent_mut(player).set_tag(name, false);
        tracing::info!("{} joined faction {:?}", who, name);
        Ok(())
    }

    /// Leave the current faction.
    ///
    /// A leader may only leave by taking the faction down:
    /// `disband_if_leader` turns the leave into a disband, otherwise it is
    /// refused. A plain member just leaves; if that empties the faction
    /// (its leader had already departed through a superseding join), the
    /// remnant is disbanded on the spot.
    pub fn leave_faction(
        &mut self,
        player: PlayerId,
        disband_if_leader: bool,
    ) -> Result<LeaveOutcome, FactionError> {
        let Some(agent) = self.agents.get(&player) else {
            return Err(FactionError::UnknownPlayer(player));
        };
        let Some(tag) = agent.tag() else {
            return Err(FactionError::NotInFaction);
        };
        if tag.leader && !disband_if_leader {
            return Err(FactionError::LeaderMustDisband);
        }
        let current = tag.name.clone();
        if tag.leader {
            self.disband_internal(&current).unwrap_or_else(|| {
                panic!("leave_faction: tagged faction {current:?} not in table")
            });
            return Ok(LeaveOutcome::Disbanded);
        }
        self.force_leave(player);
        if self.faction_exists(&current) {
            Ok(LeaveOutcome::Left)
        } else {
            Ok(LeaveOutcome::Disbanded)
        }
    }

    /// Disband a faction: every member's tag is cleared, then the faction
    /// is dropped from the table. No authorization happens here; callers
    /// gate it (a leader-initiated disband is `leave_faction` with
    /// `disband_if_leader`). Disbanding a name twice reports `NotFound`
    /// the second time, so repeated teardown is harmless.
    pub fn disband_faction(&mut self, name: &str) -> Result<(), FactionError> {
        match self.disband_internal(name) {
            Some(_) => Ok(()),
            None => Err(FactionError::NotFound(name.to_string())),
        }
    }

    /// Change the current faction's password. Leader only. The empty
    /// string reopens the faction.
    pub fn change_password(
        &mut self,
        player: PlayerId,
        new_password: &str,
    ) -> Result<(), FactionError> {
        let Some(agent) = self.agents.get(&player) else {
            return Err(FactionError::UnknownPlayer(player));
        };
        let who = agent.display_name().to_string();
        let Some(tag) = agent.tag() else {
            return Err(FactionError::NotInFaction);
        };
        if !tag.leader {
            return Err(FactionError::NotLeader);
        }
        let current = tag.name.clone();
        self.faction_mut(&current).password = new_password.to_string();
        tracing::info!("{} changed the password of faction {:?}", who, current);
        Ok(())
    }

    // --- queries ---

    pub fn faction(&self, name: &str) -> Option<&Faction> {
        self.factions.get(name)
    }

    /// The faction the player currently belongs to, resolved through their
    /// tag rather than a table scan.
    ///
    /// # Panics
    /// Panics if the tag names a faction missing from the table (the two
    /// are updated together; disagreement means corrupted state).
    pub fn player_faction(&self, player: PlayerId) -> Option<&Faction> {
        let tag = self.agents.get(&player)?.tag()?;
        let faction = self.factions.get(&tag.name).unwrap_or_else(|| {
            panic!("player_faction: tagged faction {:?} not in table", tag.name)
        });
        Some(faction)
    }

    /// Is the player in the named faction, or in any faction at all when
    /// `faction` is `None`.
    pub fn is_player_in_faction(&self, player: PlayerId, faction: Option<&str>) -> bool {
        let Some(agent) = self.agents.get(&player) else {
            return false;
        };
        match faction {
            Some(name) => agent.is_in(name),
            None => agent.is_in_faction(),
        }
    }

    /// Does the player lead the named faction, or their own faction,
    /// whichever it is, when `faction` is `None`.
    pub fn is_player_leader(&self, player: PlayerId, faction: Option<&str>) -> bool {
        let Some(agent) = self.agents.get(&player) else {
            return false;
        };
        match faction {
            Some(name) => agent.is_leader() && agent.is_in(name),
            None => agent.is_leader(),
        }
    }

    /// Connected members of a faction, in id order. Unknown names yield an
    /// empty list, and members whose agent is already gone are filtered
    /// out rather than handed to callers as dangling ids.
    pub fn faction_members(&self, name: &str) -> Vec<PlayerId> {
        let Some(faction) = self.factions.get(name) else {
            return Vec::new();
        };
        faction
            .members
            .iter()
            .copied()
            .filter(|m| self.agents.contains_key(m))
            .collect()
    }

    pub fn faction_exists(&self, name: &str) -> bool {
        self.factions.contains_key(name)
    }

    /// Snapshot of every registered faction, in name order. Mutating the
    /// returned factions does not touch the registry.
    pub fn all_factions(&self) -> Vec<Faction> {
        self.factions.values().cloned().collect()
    }

    pub fn faction_count(&self) -> usize {
        self.factions.len()
    }

    pub fn agent(&self, player: PlayerId) -> Option<&MemberAgent> {
        self.agents.get(&player)
    }

    pub fn player_count(&self) -> usize {
        self.agents.len()
    }

    // --- internals ---

    /// Pull a player out of whatever faction they are in, bypassing the
    /// leader lock: a superseding join or create always wins. A departing
    /// leader leaves the faction standing but leaderless; once the last
    /// member is gone the empty remnant is disbanded.
    fn force_leave(&mut self, player: PlayerId) {
        let Some(agent) = self.agents.get(&player) else {
            return;
        };
        let Some(tag) = agent.tag() else {
            return;
        };
        let who = agent.display_name().to_string();
        let current = tag.name.clone();
        let faction = self.faction_mut(&current);
        faction.members.remove(&player);
        let was_leader = faction.is_led_by(player);
        if was_leader {
            faction.leader = None;
        }
        let now_empty = faction.members.is_empty();
        self.agent_mut(player).clear_tag();
        tracing::info!("{} left faction {:?}", who, current);
        if was_leader && !now_empty {
            tracing::info!("faction {:?} is now leaderless", current);
        }
        if now_empty {
            self.disband_internal(&current).unwrap_or_else(|| {
                panic!("force_leave: faction {current:?} vanished mid-removal")
            });
        }
    }

    /// Remove a faction from the table and clear every member's tag.
    /// Returns the removed faction, or `None` if the name is unknown.
    fn disband_internal(&mut self, name: &str) -> Option<Faction> {
        let faction = self.factions.remove(name)?;
        for member in &faction.members {
            if let Some(agent) = self.agents.get_mut(member) {
                agent.clear_tag();
            }
        }
        tracing::info!("faction {:?} has been disbanded", name);
        Some(faction)
    }

    fn faction_mut(&mut self, name: &str) -> &mut Faction {
        self.factions
            .get_mut(name)
            .unwrap_or_else(|| panic!("registry: faction {name:?} not in table"))
    }

    fn agent_mut(&mut self, player: PlayerId) -> &mut MemberAgent {
        self.agents
            .get_mut(&player)
            .unwrap_or_else(|| panic!("registry: no agent for player id {player}"))
    }
}

impl Default for FactionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
