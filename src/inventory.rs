//! The fixed 5x8 inventory grid.
//!
//! Operations are pure transformations: they take the grid by reference and
//! return a new grid plus a result descriptor. Callers decide what to do
//! with the result (and own persistence). Out-of-range coordinates are
//! guarded defensively and leave the grid untouched.

use crate::constants::*;
use crate::items::{self, ItemId};
use serde::{Deserialize, Serialize};

/// A slot coordinate; `row < 5`, `col < 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A stack of one item kind occupying a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Result of an add operation. `success` means every requested unit fit;
/// a full grid yields `added < requested` rather than an error.
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub grid: InventoryGrid,
    pub added: u32,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryGrid {
    slots: Vec<Option<ItemRef>>,
}

impl InventoryGrid {
    pub fn new() -> Self {
        Self {
            slots: vec![None; GRID_SLOTS],
        }
    }

    fn index(coord: GridCoord) -> Option<usize> {
        if coord.row < GRID_ROWS && coord.col < GRID_COLS {
            Some(coord.row * GRID_COLS + coord.col)
        } else {
            None
        }
    }

    fn coord(index: usize) -> GridCoord {
        GridCoord::new(index / GRID_COLS, index % GRID_COLS)
    }

    pub fn get(&self, coord: GridCoord) -> Option<&ItemRef> {
        Self::index(coord).and_then(|i| self.slots[i].as_ref())
    }

    /// First empty coordinate in row-major order, if any.
    pub fn find_empty_slot(&self) -> Option<GridCoord> {
        self.slots
            .iter()
            .position(|slot| slot.is_none())
            .map(Self::coord)
    }

    pub fn occupied_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Total quantity of one item kind across all stacks.
    pub fn count_of(&self, item_id: ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|r| r.item_id == item_id)
            .map(|r| r.quantity)
            .sum()
    }

    /// Adds `quantity` units of an item.
    ///
    /// Stackables top up existing same-id stacks first (row-major) up to
    /// [`MAX_STACK_SIZE`], then claim empty slots; non-stackables claim one
    /// empty slot per unit. Unknown item ids add nothing.
    pub fn add_item_with_quantity(&self, item_id: ItemId, quantity: u32) -> AddOutcome {
        let mut grid = self.clone();
        let mut remaining = quantity;

        let item = match items::get_item(item_id) {
            Some(item) => item,
            None => {
                log::warn!("add rejected: unknown item id {}", item_id);
                return AddOutcome {
                    grid,
                    added: 0,
                    success: quantity == 0,
                };
            }
        };

        if item.is_stackable() {
            // Top up existing stacks first
            for slot in grid.slots.iter_mut() {
                if remaining == 0 {
                    break;
                }
                if let Some(stack) = slot {
                    if stack.item_id == item_id && stack.quantity < MAX_STACK_SIZE {
                        let room = MAX_STACK_SIZE - stack.quantity;
                        let take = room.min(remaining);
                        stack.quantity += take;
                        remaining -= take;
                    }
                }
            }
            // Then open new stacks in empty slots
            for slot in grid.slots.iter_mut() {
                if remaining == 0 {
                    break;
                }
                if slot.is_none() {
                    let take = MAX_STACK_SIZE.min(remaining);
                    *slot = Some(ItemRef {
                        item_id,
                        quantity: take,
                    });
                    remaining -= take;
                }
            }
        } else {
            // One slot per unit
            for slot in grid.slots.iter_mut() {
                if remaining == 0 {
                    break;
                }
                if slot.is_none() {
                    *slot = Some(ItemRef {
                        item_id,
                        quantity: 1,
                    });
                    remaining -= 1;
                }
            }
        }

        let added = quantity - remaining;
        AddOutcome {
            grid,
            added,
            success: added == quantity,
        }
    }

    /// Unconditionally swaps two slot contents; a swap with an empty slot is
    /// a move. No merge-on-swap. Invalid coordinates leave the grid as is.
    pub fn swap_items(&self, a: GridCoord, b: GridCoord) -> InventoryGrid {
        let mut grid = self.clone();
        match (Self::index(a), Self::index(b)) {
            (Some(i), Some(j)) => grid.slots.swap(i, j),
            _ => log::warn!("swap rejected: coordinate out of range"),
        }
        grid
    }

    /// Replaces the contents of one slot, returning the new grid and the
    /// previous contents. The building block for equip/unequip.
    pub fn replace(
        &self,
        coord: GridCoord,
        value: Option<ItemRef>,
    ) -> (InventoryGrid, Option<ItemRef>) {
        let mut grid = self.clone();
        match Self::index(coord) {
            Some(i) => {
                let previous = grid.slots[i].take();
                grid.slots[i] = value;
                (grid, previous)
            }
            None => (grid, None),
        }
    }

    /// Removes one unit from a stack, deleting the slot entirely at zero.
    /// Returns the item id removed, or `None` if the slot was empty or the
    /// coordinate invalid.
    pub fn remove_one(&self, coord: GridCoord) -> (InventoryGrid, Option<ItemId>) {
        let mut grid = self.clone();
        let index = match Self::index(coord) {
            Some(i) => i,
            None => return (grid, None),
        };

        match grid.slots[index] {
            Some(ref mut stack) => {
                let item_id = stack.item_id;
                if stack.quantity > 1 {
                    stack.quantity -= 1;
                } else {
                    grid.slots[index] = None;
                }
                (grid, Some(item_id))
            }
            None => (grid, None),
        }
    }
}

impl Default for InventoryGrid {
    fn default() -> Self {
        Self::new()
    }
}
