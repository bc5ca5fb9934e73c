use crate::domain::loadout::Loadout;

/// Events asked of the narrator per match
pub const EVENTS_PER_MATCH: usize = 10;

/// Narration prompt for one match
pub fn build_prompt(loadout: &Loadout) -> String {
    let inventory = loadout.inventory_summary();
    let inventory = if inventory.is_empty() { "None".to_string() } else { inventory };

    format!(
        "Narrate a high-intensity Battle Royale match for a mobile game like Free Fire.\n\
         \n\
         Player Loadout:\n\
         - Character: {character} (Ability: {ability})\n\
         - Primary: {primary} (Dmg: {damage}, Reload: {reload})\n\
         - Secondary: {secondary}\n\
         - Looted Items: {inventory}\n\
         \n\
         Context:\n\
         The player has already scavenged these items. Work them into the story.\n\
         A Medkit might be used after a close fight; an Extended Mag might win a duel without reloading.\n\
         \n\
         Create a chronological list of {count} events. The match must be exciting.\n\
         Format: JSON array of objects with 'time', 'message', 'type' (\"kill\", \"info\", \"zone\", \"danger\", \"loot\").",
        character = loadout.character.name,
        ability = loadout.character.ability,
        primary = loadout.primary_weapon.name,
        damage = loadout.primary_weapon.damage,
        reload = loadout.primary_weapon.reload_speed,
        secondary = loadout.secondary_weapon.name,
        inventory = inventory,
        count = EVENTS_PER_MATCH,
    )
}
