use bevy_ecs::resource::Resource;

/// What a session log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEventKind {
    PlayerConnected,
    PlayerDisconnected,
    FactionCreated,
    FactionJoined,
    FactionLeft,
    FactionDisbanded,
    PasswordChanged,
    CommandRejected,
}

impl SessionEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEventKind::PlayerConnected => "player_connected",
            SessionEventKind::PlayerDisconnected => "player_disconnected",
            SessionEventKind::FactionCreated => "faction_created",
            SessionEventKind::FactionJoined => "faction_joined",
            SessionEventKind::FactionLeft => "faction_left",
            SessionEventKind::FactionDisbanded => "faction_disbanded",
            SessionEventKind::PasswordChanged => "password_changed",
            SessionEventKind::CommandRejected => "command_rejected",
        }
    }
}

/// One entry in the session feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub tick: u64,
    pub kind: SessionEventKind,
    pub message: String,
}

/// Accumulates session events in order: connects, disconnects, and every
/// faction change that went through the applicator.
#[derive(Resource, Debug, Clone, Default)]
pub struct SessionLog {
    pub events: Vec<SessionEvent>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: u64, kind: SessionEventKind, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("[tick {}] {}: {}", tick, kind.as_str(), message);
        self.events.push(SessionEvent {
            tick,
            kind,
            message,
        });
    }

    /// Entries of one kind, in arrival order.
    pub fn of_kind(&self, kind: SessionEventKind) -> Vec<&SessionEvent> {
        self.events.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
