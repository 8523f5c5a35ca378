use crate::id::PlayerId;

/// Cached pointer to a player's current faction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactionTag {
    pub name: String,
    pub leader: bool,
}

/// Per-player membership record, one per connected player.
///
/// The tag mirrors the registry's faction table so callers get faction
/// lookups without touching the table. The registry is the only writer
/// (the mutators are crate-private) and updates the tag in the same call
/// that mutates the table, so the two never drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAgent {
    id: PlayerId,
    display_name: String,
    tag: Option<FactionTag>,
}

impl MemberAgent {
    pub(crate) fn new(id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            tag: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Human-readable name, for logs and chat only. Never a key.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn is_in_faction(&self) -> bool {
        self.tag.is_some()
    }

    pub fn is_in(&self, faction: &str) -> bool {
        self.tag.as_ref().is_some_and(|t| t.name == faction)
    }

    pub fn is_leader(&self) -> bool {
        self.tag.as_ref().is_some_and(|t| t.leader)
    }

    /// Name of the current faction, or `""` when factionless. The empty
    /// string doubles as the no-faction sentinel for display code.
    pub fn faction_name(&self) -> &str {
        self.tag.as_ref().map_or("", |t| t.name.as_str())
    }

    pub fn tag(&self) -> Option<&FactionTag> {
        self.tag.as_ref()
    }

    pub(crate) fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub(crate) fn set_tag(&mut self, faction: &str, leader: bool) {
        tracing::debug!(
            "{} faction tag set to {:?} (leader: {})",
            self.display_name,
            faction,
            leader
        );
        self.tag = Some(FactionTag {
            name: faction.to_string(),
            leader,
        });
    }

    pub(crate) fn clear_tag(&mut self) {
        if let Some(tag) = self.tag.take() {
            tracing::debug!("{} faction tag cleared (was {:?})", self.display_name, tag.name);
        }
    }
}
