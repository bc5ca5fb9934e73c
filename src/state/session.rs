use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;
use crate::playback::event::MatchEvent;
use crate::utils::catalog::{Catalog, LootItem};

pub type SessionId = Uuid;

/// Hard cap on scavenged items per drop
pub const MAX_INVENTORY: usize = 5;

pub type Inventory = SmallVec<[InventoryItem; MAX_INVENTORY]>;

/// UI mode - exactly one is active per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Lobby,
    Vault,
    Armory,
    Scavenge,
    Battle,
    Store,
}

impl Mode {
    /// Tabs reachable by plain navigation. Scavenge and battle have gated entries.
    pub fn is_free_tab(&self) -> bool {
        matches!(self, Mode::Lobby | Mode::Vault | Mode::Armory | Mode::Store)
    }
}

/// A loot template granted from a specific supply-drop slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub instance_id: String,
    pub slot: usize,
    #[serde(flatten)]
    pub item: LootItem,
}

impl InventoryItem {
    pub fn from_slot(item: &LootItem, slot: usize) -> Self {
        Self {
            instance_id: format!("{}-{}", item.id, slot),
            slot,
            item: item.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    Idle,
    Simulating,
    Finished,
    Aborted,
}

/// Revealed part of the current match narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playback {
    pub match_id: u64,
    pub status: PlaybackStatus,
    pub revealed: Vec<MatchEvent>,
}

impl Playback {
    pub fn new() -> Self {
        Self {
            match_id: 0,
            status: PlaybackStatus::Idle,
            revealed: Vec::new(),
        }
    }

    pub fn is_simulating(&self) -> bool {
        self.status == PlaybackStatus::Simulating
    }

    /// Start a new match, clearing the previous log. Returns the match number.
    pub fn begin(&mut self) -> u64 {
        self.match_id += 1;
        self.status = PlaybackStatus::Simulating;
        self.revealed.clear();
        self.match_id
    }

    /// Append an event for `match_id`. Stale or settled matches are ignored.
    pub fn reveal(&mut self, match_id: u64, event: MatchEvent) -> bool {
        if !self.accepts(match_id) {
            return false;
        }
        self.revealed.push(event);
        true
    }

    pub fn finish(&mut self, match_id: u64) -> bool {
        self.settle(match_id, PlaybackStatus::Finished)
    }

    pub fn abort(&mut self, match_id: u64) -> bool {
        self.settle(match_id, PlaybackStatus::Aborted)
    }

    fn settle(&mut self, match_id: u64, status: PlaybackStatus) -> bool {
        if !self.accepts(match_id) {
            return false;
        }
        self.status = status;
        true
    }

    fn accepts(&self, match_id: u64) -> bool {
        self.match_id == match_id && self.status == PlaybackStatus::Simulating
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-player lobby session. Selections hold catalog ids, never copies.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: SessionId,
    pub mode: Mode,
    pub character_id: String,
    pub primary_weapon_id: String,
    pub secondary_weapon_id: String,
    pub inventory: Inventory,
    pub scavenged_count: u32,
    pub credits: u32,
    pub playback: Playback,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionState {
    pub fn new(id: SessionId, starting_credits: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            mode: Mode::Lobby,
            character_id: Catalog::default_character_id().to_string(),
            primary_weapon_id: Catalog::default_primary_id().to_string(),
            secondary_weapon_id: Catalog::default_secondary_id().to_string(),
            inventory: Inventory::new(),
            scavenged_count: 0,
            credits: starting_credits,
            playback: Playback::new(),
            created_at: now,
            last_active: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn is_slot_claimed(&self, slot: usize) -> bool {
        self.inventory.iter().any(|item| item.slot == slot)
    }
}
