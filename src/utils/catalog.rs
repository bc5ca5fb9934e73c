use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeaponCategory {
    Ar,
    Smg,
    Sniper,
    Shotgun,
    Pistol,
}

/// Weapon stats on a 0-100 scale, plus magazine size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub category: WeaponCategory,
    pub damage: u32,
    pub rate_of_fire: u32,
    pub range: u32,
    pub reload_speed: u32,
    pub ammo_capacity: u32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub speed: u32,
    pub health: u32,
    pub luck: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub ability: String,
    pub ability_desc: String,
    pub image: String,
    pub stats: CharacterStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootKind {
    Health,
    Ammo,
    Armor,
    Attachment,
}

/// Declaration order is the tier order: common < rare < epic < legendary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Loot template. Granted copies get their own instance id, see `InventoryItem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LootKind,
    pub description: String,
    pub rarity: Rarity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreOffer {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub blurb: String,
}

/// Immutable game catalog - loaded once at startup
/// Zero contention, passed by Arc reference
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub characters: Vec<Character>,
    pub weapons: Vec<Weapon>,
    pub loot: Vec<LootItem>,
    pub offers: Vec<StoreOffer>,
}

impl Catalog {
    /// Load the catalog with hardcoded data
    pub fn load() -> Self {
        Self {
            characters: vec![
                character("c1", "Kratos", "War Cry",
                    "Increases damage and movement speed by 15% for 10 seconds.",
                    "https://picsum.photos/seed/char1/300/400", (80, 100, 50)),
                character("c2", "Zoe", "Healing Mist",
                    "Creates a zone that restores 5HP per second for allies.",
                    "https://picsum.photos/seed/char2/300/400", (70, 120, 60)),
                character("c3", "Cipher", "Glitch Step",
                    "Teleports a short distance and becomes invisible for 2 seconds.",
                    "https://picsum.photos/seed/char3/300/400", (95, 80, 40)),
                character("c4", "Jade", "Bounty Hunter",
                    "Receive 50% more loot and credits from kills.",
                    "https://picsum.photos/seed/char4/300/400", (75, 90, 95)),
            ],
            weapons: vec![
                weapon("w1", "SCAR - Titan", WeaponCategory::Ar, [78, 65, 70, 60, 30], "scar"),
                weapon("w2", "UMP - Cataclysm", WeaponCategory::Smg, [55, 90, 35, 85, 40], "ump"),
                weapon("w3", "M82B - Barrett", WeaponCategory::Sniper, [100, 12, 99, 20, 5], "m82b"),
                weapon("w4", "SPAS12 - Venom", WeaponCategory::Shotgun, [95, 25, 12, 40, 7], "spas"),
                weapon("w5", "G18 - Akimbo", WeaponCategory::Pistol, [45, 75, 25, 90, 20], "g18"),
            ],
            loot: vec![
                loot("l1", "Medkit", LootKind::Health, "Restores 75 HP over 5 seconds.", Rarity::Common),
                loot("l2", "Extended Mag", LootKind::Attachment, "Increases ammo capacity by 50%.", Rarity::Rare),
                loot("l3", "Level 3 Vest", LootKind::Armor, "Reduces incoming damage by 40%.", Rarity::Epic),
                loot("l4", "Adrenaline Shot", LootKind::Health, "Instant full heal and 20% speed boost.", Rarity::Legendary),
                loot("l5", "4x Scope", LootKind::Attachment, "Significantly increases accuracy at range.", Rarity::Rare),
                loot("l6", "AR Ammo Crate", LootKind::Ammo, "Refills all rifle ammunition.", Rarity::Common),
            ],
            offers: vec![
                offer("chrono", "CHRONO CRATE", 500),
                offer("venom", "VENOM CRATE", 1200),
                offer("legendary", "LEGENDARY BUNDLE", 5000),
            ],
        }
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn weapon(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.id == id)
    }

    pub fn offer(&self, id: &str) -> Option<&StoreOffer> {
        self.offers.iter().find(|o| o.id == id)
    }

    /// Template shown in a supply-drop slot: `slot mod catalog size`
    pub fn loot_for_slot(&self, slot: usize) -> Option<&LootItem> {
        if self.loot.is_empty() {
            return None;
        }
        self.loot.get(slot % self.loot.len())
    }

    pub fn default_character_id() -> &'static str {
        "c1"
    }

    pub fn default_primary_id() -> &'static str {
        "w1"
    }

    pub fn default_secondary_id() -> &'static str {
        "w5"
    }
}

fn character(
    id: &str,
    name: &str,
    ability: &str,
    ability_desc: &str,
    image: &str,
    (speed, health, luck): (u32, u32, u32),
) -> Character {
    Character {
        id: id.to_string(),
        name: name.to_string(),
        ability: ability.to_string(),
        ability_desc: ability_desc.to_string(),
        image: image.to_string(),
        stats: CharacterStats { speed, health, luck },
    }
}

// stats: damage, rate of fire, range, reload speed, ammo capacity
fn weapon(id: &str, name: &str, category: WeaponCategory, stats: [u32; 5], seed: &str) -> Weapon {
    Weapon {
        id: id.to_string(),
        name: name.to_string(),
        category,
        damage: stats[0],
        rate_of_fire: stats[1],
        range: stats[2],
        reload_speed: stats[3],
        ammo_capacity: stats[4],
        image: format!("https://picsum.photos/seed/{}/400/200", seed),
    }
}

fn loot(id: &str, name: &str, kind: LootKind, description: &str, rarity: Rarity) -> LootItem {
    LootItem {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        description: description.to_string(),
        rarity,
    }
}

fn offer(id: &str, name: &str, price: u32) -> StoreOffer {
    StoreOffer {
        id: id.to_string(),
        name: name.to_string(),
        price,
        blurb: "Guaranteed Rare or higher".to_string(),
    }
}
