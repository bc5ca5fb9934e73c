use serde::Serialize;
use crate::state::session::{InventoryItem, Mode, SessionState, MAX_INVENTORY};
use crate::utils::catalog::{Catalog, LootItem};

/// Supply drops on the scavenge grid
pub const SUPPLY_DROP_SLOTS: usize = 12;

/// Claims needed before battle entry unlocks
pub const MIN_CLAIMS_FOR_BATTLE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClaimOutcome {
    Claimed { item: InventoryItem },
    AlreadyClaimed,
    InventoryFull,
}

/// One cell of the scavenge grid as shown to the player
#[derive(Debug, Clone, Serialize)]
pub struct SlotView {
    pub slot: usize,
    pub claimed: bool,
    pub item: LootItem,
}

/// Enter scavenge mode with an empty bag
pub fn enter(session: &mut SessionState) {
    session.inventory.clear();
    session.scavenged_count = 0;
    session.mode = Mode::Scavenge;
}

/// Claim a supply-drop slot
pub fn claim_slot(
    session: &mut SessionState,
    catalog: &Catalog,
    slot: usize,
) -> Result<ClaimOutcome, &'static str> {
    if session.mode != Mode::Scavenge {
        return Err("Not scavenging");
    }
    if slot >= SUPPLY_DROP_SLOTS {
        return Err("Slot out of range");
    }
    if session.is_slot_claimed(slot) {
        return Ok(ClaimOutcome::AlreadyClaimed);
    }
    if session.scavenged_count as usize >= MAX_INVENTORY {
        return Ok(ClaimOutcome::InventoryFull);
    }

    let template = catalog.loot_for_slot(slot)
        .ok_or("Loot catalog is empty")?;
    let item = InventoryItem::from_slot(template, slot);

    session.inventory.push(item.clone());
    session.scavenged_count += 1;
    Ok(ClaimOutcome::Claimed { item })
}

pub fn battle_ready(session: &SessionState) -> bool {
    session.mode == Mode::Scavenge && session.scavenged_count >= MIN_CLAIMS_FOR_BATTLE
}

pub fn grid(session: &SessionState, catalog: &Catalog) -> Vec<SlotView> {
    (0..SUPPLY_DROP_SLOTS)
        .filter_map(|slot| {
            catalog.loot_for_slot(slot).map(|item| SlotView {
                slot,
                claimed: session.is_slot_claimed(slot),
                item: item.clone(),
            })
        })
        .collect()
}
