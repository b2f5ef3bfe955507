//! Static item catalog.
//!
//! Item definitions are immutable for the lifetime of the process and are
//! looked up by id. Kind-specific attributes (attack, defense, heal) live
//! behind the [`ItemKind`] tag so invalid combinations are unrepresentable.

use serde::{Deserialize, Serialize};

pub type ItemId = u32;

/// Which equipment slot an equippable item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipSlot {
    Helmet,
    UpperBody,
    LowerBody,
    Gloves,
    Shoes,
    Cape,
    Weapon,
}

impl EquipSlot {
    pub fn all() -> [EquipSlot; 7] {
        [
            EquipSlot::Helmet,
            EquipSlot::UpperBody,
            EquipSlot::LowerBody,
            EquipSlot::Gloves,
            EquipSlot::Shoes,
            EquipSlot::Cape,
            EquipSlot::Weapon,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Helmet => "Helmet",
            EquipSlot::UpperBody => "Upper Body",
            EquipSlot::LowerBody => "Lower Body",
            EquipSlot::Gloves => "Gloves",
            EquipSlot::Shoes => "Shoes",
            EquipSlot::Cape => "Cape",
            EquipSlot::Weapon => "Weapon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponType {
    Melee,
    Ranged,
}

/// Item kind with kind-specific combat attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemKind {
    Weapon { attack: u32, weapon_type: WeaponType },
    Armor { defense: u32, slot: EquipSlot },
    Consumable { heal: u32 },
    Material,
    Accessory { slot: EquipSlot },
}

/// A static item definition from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemData {
    pub id: ItemId,
    pub name: &'static str,
    pub kind: ItemKind,
    pub level_req: u32,
    pub price: u64,
}

impl ItemData {
    /// Stackable kinds share a grid slot up to the stack cap; equippables
    /// occupy one slot per unit.
    pub fn is_stackable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable { .. } | ItemKind::Material)
    }

    /// The equipment slot this item fits, if it is equippable at all.
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match self.kind {
            ItemKind::Weapon { .. } => Some(EquipSlot::Weapon),
            ItemKind::Armor { slot, .. } => Some(slot),
            ItemKind::Accessory { slot } => Some(slot),
            ItemKind::Consumable { .. } | ItemKind::Material => None,
        }
    }

    pub fn heal_amount(&self) -> u32 {
        match self.kind {
            ItemKind::Consumable { heal } => heal,
            _ => 0,
        }
    }

    pub fn attack(&self) -> u32 {
        match self.kind {
            ItemKind::Weapon { attack, .. } => attack,
            _ => 0,
        }
    }

    pub fn defense(&self) -> u32 {
        match self.kind {
            ItemKind::Armor { defense, .. } => defense,
            _ => 0,
        }
    }

    pub fn weapon_type(&self) -> Option<WeaponType> {
        match self.kind {
            ItemKind::Weapon { weapon_type, .. } => Some(weapon_type),
            _ => None,
        }
    }
}

/// The full item catalog.
///
/// Ids are stable; saves reference items by id, so entries are only ever
/// appended, never renumbered.
pub static ITEMS: &[ItemData] = &[
    // Consumables
    ItemData {
        id: 1,
        name: "Small Potion",
        kind: ItemKind::Consumable { heal: 50 },
        level_req: 1,
        price: 20,
    },
    ItemData {
        id: 2,
        name: "Potion",
        kind: ItemKind::Consumable { heal: 100 },
        level_req: 5,
        price: 60,
    },
    ItemData {
        id: 3,
        name: "Great Potion",
        kind: ItemKind::Consumable { heal: 250 },
        level_req: 15,
        price: 200,
    },
    // Weapons
    ItemData {
        id: 10,
        name: "Rusty Sword",
        kind: ItemKind::Weapon {
            attack: 5,
            weapon_type: WeaponType::Melee,
        },
        level_req: 1,
        price: 50,
    },
    ItemData {
        id: 11,
        name: "Soldier's Blade",
        kind: ItemKind::Weapon {
            attack: 14,
            weapon_type: WeaponType::Melee,
        },
        level_req: 8,
        price: 480,
    },
    ItemData {
        id: 12,
        name: "Short Bow",
        kind: ItemKind::Weapon {
            attack: 4,
            weapon_type: WeaponType::Ranged,
        },
        level_req: 1,
        price: 50,
    },
    ItemData {
        id: 13,
        name: "Hunter's Bow",
        kind: ItemKind::Weapon {
            attack: 12,
            weapon_type: WeaponType::Ranged,
        },
        level_req: 8,
        price: 480,
    },
    // Armor
    ItemData {
        id: 20,
        name: "Leather Cap",
        kind: ItemKind::Armor {
            defense: 2,
            slot: EquipSlot::Helmet,
        },
        level_req: 1,
        price: 40,
    },
    ItemData {
        id: 21,
        name: "Leather Tunic",
        kind: ItemKind::Armor {
            defense: 4,
            slot: EquipSlot::UpperBody,
        },
        level_req: 1,
        price: 70,
    },
    ItemData {
        id: 22,
        name: "Leather Trousers",
        kind: ItemKind::Armor {
            defense: 3,
            slot: EquipSlot::LowerBody,
        },
        level_req: 1,
        price: 55,
    },
    ItemData {
        id: 23,
        name: "Cloth Gloves",
        kind: ItemKind::Armor {
            defense: 1,
            slot: EquipSlot::Gloves,
        },
        level_req: 1,
        price: 25,
    },
    ItemData {
        id: 24,
        name: "Worn Boots",
        kind: ItemKind::Armor {
            defense: 1,
            slot: EquipSlot::Shoes,
        },
        level_req: 1,
        price: 25,
    },
    ItemData {
        id: 25,
        name: "Traveler's Cape",
        kind: ItemKind::Armor {
            defense: 2,
            slot: EquipSlot::Cape,
        },
        level_req: 3,
        price: 120,
    },
    ItemData {
        id: 26,
        name: "Iron Helm",
        kind: ItemKind::Armor {
            defense: 5,
            slot: EquipSlot::Helmet,
        },
        level_req: 10,
        price: 520,
    },
    ItemData {
        id: 27,
        name: "Iron Plate",
        kind: ItemKind::Armor {
            defense: 9,
            slot: EquipSlot::UpperBody,
        },
        level_req: 10,
        price: 800,
    },
    // Materials
    ItemData {
        id: 40,
        name: "Wolf Pelt",
        kind: ItemKind::Material,
        level_req: 1,
        price: 8,
    },
    ItemData {
        id: 41,
        name: "Slime Jelly",
        kind: ItemKind::Material,
        level_req: 1,
        price: 5,
    },
    ItemData {
        id: 42,
        name: "Boar Tusk",
        kind: ItemKind::Material,
        level_req: 1,
        price: 12,
    },
    ItemData {
        id: 43,
        name: "Spider Silk",
        kind: ItemKind::Material,
        level_req: 1,
        price: 15,
    },
    ItemData {
        id: 44,
        name: "Golem Core",
        kind: ItemKind::Material,
        level_req: 1,
        price: 60,
    },
];

/// Looks up a static item definition by id.
pub fn get_item(id: ItemId) -> Option<&'static ItemData> {
    ITEMS.iter().find(|item| item.id == id)
}
