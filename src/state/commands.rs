use serde::{Deserialize, Serialize};
use crate::state::session::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponSlot {
    Primary,
    Secondary,
}

/// Command sent from the HTTP handlers to a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    // Tabs
    Navigate { mode: Mode },
    ReturnToLobby,

    // Selection
    SelectCharacter { character_id: String },
    SelectWeapon { slot: WeaponSlot, weapon_id: String },

    // Match flow
    EnterScavenge,
    ClaimSlot { slot: usize },
    EnterBattle,

    // Store
    Purchase { price: u32 },
}

impl SessionCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SessionCommand::Navigate { .. } => "navigate",
            SessionCommand::ReturnToLobby => "return_to_lobby",
            SessionCommand::SelectCharacter { .. } => "select_character",
            SessionCommand::SelectWeapon { .. } => "select_weapon",
            SessionCommand::EnterScavenge => "enter_scavenge",
            SessionCommand::ClaimSlot { .. } => "claim_slot",
            SessionCommand::EnterBattle => "enter_battle",
            SessionCommand::Purchase { .. } => "purchase",
        }
    }
}
