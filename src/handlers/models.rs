use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::scavenge::{self, ClaimOutcome, SlotView};
use crate::playback::event::MatchEvent;
use crate::state::commands::WeaponSlot;
use crate::state::session::{InventoryItem, Mode, PlaybackStatus, SessionId, SessionState, MAX_INVENTORY};
use crate::utils::catalog::Catalog;

/// HTTP Request/Response DTOs

#[derive(Serialize, Deserialize, Debug)]
pub struct NavigateRequest {
    pub mode: Mode,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SelectCharacterRequest {
    pub character_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SelectWeaponRequest {
    pub slot: WeaponSlot,
    pub weapon_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PurchaseRequest {
    pub offer_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SessionView {
    pub id: SessionId,
    pub mode: Mode,
    pub character_id: String,
    pub primary_weapon_id: String,
    pub secondary_weapon_id: String,
    pub inventory: Vec<InventoryItem>,
    pub scavenged_count: u32,
    pub credits: u32,
    pub battle_ready: bool,
    pub playback_status: PlaybackStatus,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionView {
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            id: session.id,
            mode: session.mode,
            character_id: session.character_id.clone(),
            primary_weapon_id: session.primary_weapon_id.clone(),
            secondary_weapon_id: session.secondary_weapon_id.clone(),
            inventory: session.inventory.to_vec(),
            scavenged_count: session.scavenged_count,
            credits: session.credits,
            battle_ready: scavenge::battle_ready(session),
            playback_status: session.playback.status,
            created_at: session.created_at,
            last_active: session.last_active,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ScavengeView {
    pub scavenged_count: u32,
    pub max_items: usize,
    pub battle_ready: bool,
    pub slots: Vec<SlotView>,
    pub inventory: Vec<InventoryItem>,
}

impl ScavengeView {
    pub fn from_session(session: &SessionState, catalog: &Catalog) -> Self {
        Self {
            scavenged_count: session.scavenged_count,
            max_items: MAX_INVENTORY,
            battle_ready: scavenge::battle_ready(session),
            slots: scavenge::grid(session, catalog),
            inventory: session.inventory.to_vec(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ClaimView {
    #[serde(flatten)]
    pub outcome: ClaimOutcome,
    pub scavenged_count: u32,
    pub battle_ready: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PlaybackView {
    pub match_id: u64,
    pub status: PlaybackStatus,
    pub revealed: Vec<MatchEvent>,
    pub cadence_ms: u64,
}

impl PlaybackView {
    pub fn from_session(session: &SessionState, cadence_ms: u64) -> Self {
        Self {
            match_id: session.playback.match_id,
            status: session.playback.status,
            revealed: session.playback.revealed.clone(),
            cadence_ms,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct PurchaseView {
    pub offer_id: String,
    pub success: bool,
    pub credits: u32,
    pub message: String,
}
