use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Kill,
    Info,
    Zone,
    Danger,
    Loot,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::Kill,
        EventKind::Info,
        EventKind::Zone,
        EventKind::Danger,
        EventKind::Loot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Kill => "kill",
            EventKind::Info => "info",
            EventKind::Zone => "zone",
            EventKind::Danger => "danger",
            EventKind::Loot => "loot",
        }
    }
}

/// One line of the match narrative. `time` is a display label, not a clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub time: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
}

impl MatchEvent {
    pub fn new(time: impl Into<String>, message: impl Into<String>, kind: EventKind) -> Self {
        Self {
            time: time.into(),
            message: message.into(),
            kind,
        }
    }

    /// Stand-in narrative when the event source cannot be reached
    pub fn deployment_aborted() -> Self {
        Self::new(
            "0:00",
            "Error contacting the battle server. Deployment aborted.",
            EventKind::Danger,
        )
    }
}
