use serde::Serialize;
use crate::state::session::{InventoryItem, SessionState};
use crate::utils::catalog::{Catalog, Character, Weapon};

/// Resolved loadout, snapshotted when a match request is issued
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loadout {
    pub character: Character,
    pub primary_weapon: Weapon,
    pub secondary_weapon: Weapon,
    pub inventory: Vec<InventoryItem>,
}

impl Loadout {
    /// Build the loadout from the session's current selections
    pub fn resolve(session: &SessionState, catalog: &Catalog) -> Result<Self, &'static str> {
        let character = catalog.character(&session.character_id)
            .ok_or("Unknown character")?;
        let primary_weapon = catalog.weapon(&session.primary_weapon_id)
            .ok_or("Unknown weapon")?;
        let secondary_weapon = catalog.weapon(&session.secondary_weapon_id)
            .ok_or("Unknown weapon")?;

        Ok(Self {
            character: character.clone(),
            primary_weapon: primary_weapon.clone(),
            secondary_weapon: secondary_weapon.clone(),
            inventory: session.inventory.to_vec(),
        })
    }

    /// `"name (rarity)"` for each item, comma-joined
    pub fn inventory_summary(&self) -> String {
        self.inventory
            .iter()
            .map(|i| format!("{} ({})", i.item.name, i.item.rarity.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
