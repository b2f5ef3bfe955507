//! Equipped-item mapping and the equip/unequip transforms.
//!
//! An item occupies an equip slot only if its static slot affinity matches.
//! Like the inventory operations these are pure: they return new values plus
//! a success flag and leave the inputs untouched on failure.

use crate::inventory::{GridCoord, InventoryGrid, ItemRef};
use crate::items::{self, EquipSlot, ItemId, ItemKind, WeaponType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquippedItems {
    pub helmet: Option<ItemId>,
    pub upper_body: Option<ItemId>,
    pub lower_body: Option<ItemId>,
    pub gloves: Option<ItemId>,
    pub shoes: Option<ItemId>,
    pub cape: Option<ItemId>,
    pub weapon: Option<ItemId>,
}

impl EquippedItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: EquipSlot) -> Option<ItemId> {
        match slot {
            EquipSlot::Helmet => self.helmet,
            EquipSlot::UpperBody => self.upper_body,
            EquipSlot::LowerBody => self.lower_body,
            EquipSlot::Gloves => self.gloves,
            EquipSlot::Shoes => self.shoes,
            EquipSlot::Cape => self.cape,
            EquipSlot::Weapon => self.weapon,
        }
    }

    pub fn set(&mut self, slot: EquipSlot, item: Option<ItemId>) {
        match slot {
            EquipSlot::Helmet => self.helmet = item,
            EquipSlot::UpperBody => self.upper_body = item,
            EquipSlot::LowerBody => self.lower_body = item,
            EquipSlot::Gloves => self.gloves = item,
            EquipSlot::Shoes => self.shoes = item,
            EquipSlot::Cape => self.cape = item,
            EquipSlot::Weapon => self.weapon = item,
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = ItemId> + '_ {
        EquipSlot::all().into_iter().filter_map(|slot| self.get(slot))
    }

    /// Attack contributed by the equipped weapon.
    pub fn weapon_attack(&self) -> u32 {
        self.weapon
            .and_then(items::get_item)
            .map(|item| item.attack())
            .unwrap_or(0)
    }

    /// Summed defense of all equipped armor pieces.
    pub fn armor_defense(&self) -> u32 {
        self.iter_equipped()
            .filter_map(items::get_item)
            .map(|item| item.defense())
            .sum()
    }

    pub fn weapon_type(&self) -> Option<WeaponType> {
        self.weapon
            .and_then(items::get_item)
            .and_then(|item| item.weapon_type())
    }

    /// True when at least one armor piece is worn.
    pub fn has_armor(&self) -> bool {
        self.iter_equipped()
            .filter_map(items::get_item)
            .any(|item| matches!(item.kind, ItemKind::Armor { .. }))
    }
}

/// Result of an equip/unequip transform.
#[derive(Debug, Clone)]
pub struct EquipOutcome {
    pub grid: InventoryGrid,
    pub equipped: EquippedItems,
    pub success: bool,
}

fn unchanged(grid: &InventoryGrid, equipped: &EquippedItems) -> EquipOutcome {
    EquipOutcome {
        grid: grid.clone(),
        equipped: equipped.clone(),
        success: false,
    }
}

/// Moves the item at `coord` into the equip slot.
///
/// Fails (no-op) unless the slot holds an item whose affinity matches. The
/// previously equipped item, if any, lands back at `coord`, so the swap can
/// never be blocked by a full grid.
pub fn equip_item(
    grid: &InventoryGrid,
    equipped: &EquippedItems,
    slot: EquipSlot,
    coord: GridCoord,
) -> EquipOutcome {
    let stack = match grid.get(coord) {
        Some(stack) => *stack,
        None => {
            log::warn!("equip rejected: empty slot at {:?}", coord);
            return unchanged(grid, equipped);
        }
    };

    let item = match items::get_item(stack.item_id) {
        Some(item) => item,
        None => return unchanged(grid, equipped),
    };

    if item.equip_slot() != Some(slot) {
        log::warn!("equip rejected: {} does not fit {}", item.name, slot.name());
        return unchanged(grid, equipped);
    }

    let replacement = equipped.get(slot).map(|item_id| ItemRef {
        item_id,
        quantity: 1,
    });
    let (grid, _) = grid.replace(coord, replacement);

    let mut equipped = equipped.clone();
    equipped.set(slot, Some(stack.item_id));

    EquipOutcome {
        grid,
        equipped,
        success: true,
    }
}

/// Moves the equipped item for `slot` into the first empty inventory slot.
/// Fails silently when the slot is empty or the grid has no room.
pub fn unequip_item(
    grid: &InventoryGrid,
    equipped: &EquippedItems,
    slot: EquipSlot,
) -> EquipOutcome {
    let item_id = match equipped.get(slot) {
        Some(item_id) => item_id,
        None => return unchanged(grid, equipped),
    };

    let target = match grid.find_empty_slot() {
        Some(coord) => coord,
        None => {
            log::warn!("unequip rejected: inventory full");
            return unchanged(grid, equipped);
        }
    };

    let (grid, _) = grid.replace(
        target,
        Some(ItemRef {
            item_id,
            quantity: 1,
        }),
    );

    let mut equipped = equipped.clone();
    equipped.set(slot, None);

    EquipOutcome {
        grid,
        equipped,
        success: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GRID_SLOTS;

    const SWORD: ItemId = 10;
    const BLADE: ItemId = 11;
    const BOW: ItemId = 12;
    const CAP: ItemId = 20;
    const POTION: ItemId = 1;

    #[test]
    fn test_equip_moves_item_out_of_grid() {
        let grid = InventoryGrid::new().add_item_with_quantity(SWORD, 1).grid;
        let coord = GridCoord::new(0, 0);

        let outcome = equip_item(&grid, &EquippedItems::new(), EquipSlot::Weapon, coord);
        assert!(outcome.success);
        assert_eq!(outcome.equipped.weapon, Some(SWORD));
        assert!(outcome.grid.get(coord).is_none());
    }

    #[test]
    fn test_equip_swaps_previous_back_to_coord() {
        let grid = InventoryGrid::new().add_item_with_quantity(BLADE, 1).grid;
        let coord = GridCoord::new(0, 0);
        let mut equipped = EquippedItems::new();
        equipped.weapon = Some(SWORD);

        let outcome = equip_item(&grid, &equipped, EquipSlot::Weapon, coord);
        assert!(outcome.success);
        assert_eq!(outcome.equipped.weapon, Some(BLADE));
        // Old weapon is never lost: it sits where the new one came from
        assert_eq!(outcome.grid.get(coord).unwrap().item_id, SWORD);
        assert_eq!(outcome.grid.count_of(SWORD), 1);
    }

    #[test]
    fn test_equip_works_with_full_grid() {
        // Swap-in-place means a full grid cannot block the exchange
        let grid = InventoryGrid::new()
            .add_item_with_quantity(SWORD, GRID_SLOTS as u32)
            .grid;
        let mut equipped = EquippedItems::new();
        equipped.weapon = Some(BLADE);

        let outcome = equip_item(&grid, &equipped, EquipSlot::Weapon, GridCoord::new(0, 0));
        assert!(outcome.success);
        assert_eq!(outcome.equipped.weapon, Some(SWORD));
        assert_eq!(outcome.grid.count_of(BLADE), 1);
    }

    #[test]
    fn test_equip_rejects_slot_mismatch() {
        let grid = InventoryGrid::new().add_item_with_quantity(CAP, 1).grid;
        let coord = GridCoord::new(0, 0);

        // A helmet does not fit the weapon slot
        let outcome = equip_item(&grid, &EquippedItems::new(), EquipSlot::Weapon, coord);
        assert!(!outcome.success);
        assert!(outcome.equipped.weapon.is_none());
        assert_eq!(outcome.grid.get(coord).unwrap().item_id, CAP);
    }

    #[test]
    fn test_equip_rejects_consumable_and_empty() {
        let grid = InventoryGrid::new().add_item_with_quantity(POTION, 3).grid;
        let outcome = equip_item(
            &grid,
            &EquippedItems::new(),
            EquipSlot::Weapon,
            GridCoord::new(0, 0),
        );
        assert!(!outcome.success);

        let outcome = equip_item(
            &grid,
            &EquippedItems::new(),
            EquipSlot::Helmet,
            GridCoord::new(4, 7),
        );
        assert!(!outcome.success);
    }

    #[test]
    fn test_unequip_into_first_empty_slot() {
        let mut equipped = EquippedItems::new();
        equipped.helmet = Some(CAP);

        let outcome = unequip_item(&InventoryGrid::new(), &equipped, EquipSlot::Helmet);
        assert!(outcome.success);
        assert!(outcome.equipped.helmet.is_none());
        assert_eq!(outcome.grid.get(GridCoord::new(0, 0)).unwrap().item_id, CAP);
    }

    #[test]
    fn test_unequip_fails_silently_when_full() {
        let grid = InventoryGrid::new()
            .add_item_with_quantity(SWORD, GRID_SLOTS as u32)
            .grid;
        let mut equipped = EquippedItems::new();
        equipped.helmet = Some(CAP);

        let outcome = unequip_item(&grid, &equipped, EquipSlot::Helmet);
        assert!(!outcome.success);
        assert_eq!(outcome.equipped.helmet, Some(CAP));
    }

    #[test]
    fn test_stat_helpers() {
        let mut equipped = EquippedItems::new();
        assert_eq!(equipped.weapon_attack(), 0);
        assert!(!equipped.has_armor());

        equipped.weapon = Some(BOW);
        equipped.helmet = Some(CAP);
        assert_eq!(equipped.weapon_type(), Some(WeaponType::Ranged));
        assert_eq!(equipped.weapon_attack(), 4);
        assert_eq!(equipped.armor_defense(), 2);
        assert!(equipped.has_armor());
    }
}
