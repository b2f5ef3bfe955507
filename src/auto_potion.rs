//! Automatic potion use ("macro"), evaluated once per combat tick.
//!
//! Every failure mode — disabled, no slot assigned, the slot emptied or
//! reassigned since, non-consumable contents — is a silent no-op; the tick
//! simply proceeds without healing.

use crate::inventory::{GridCoord, InventoryGrid};
use crate::items;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroState {
    pub enabled: bool,
    pub potion_slot: Option<GridCoord>,
    pub hp_threshold: u32,
}

impl Default for MacroState {
    fn default() -> Self {
        Self {
            enabled: false,
            potion_slot: None,
            hp_threshold: 0,
        }
    }
}

/// A macro trigger that fired: the grid with one potion consumed, and the
/// HP actually restored (already clamped to max).
#[derive(Debug, Clone)]
pub struct MacroTrigger {
    pub grid: InventoryGrid,
    pub healed: u32,
}

/// Evaluates the macro against the post-damage HP for this tick.
///
/// Fires only when enabled, a slot is assigned, and `hp` is strictly below
/// `min(threshold, max_hp)`; the referenced slot must still hold a
/// heal-capable consumable.
pub fn evaluate_macro(
    state: &MacroState,
    grid: &InventoryGrid,
    hp: u32,
    max_hp: u32,
) -> Option<MacroTrigger> {
    if !state.enabled || hp >= max_hp {
        return None;
    }
    let coord = state.potion_slot?;
    if hp >= state.hp_threshold.min(max_hp) {
        return None;
    }

    let stack = grid.get(coord)?;
    let heal = items::get_item(stack.item_id)?.heal_amount();
    if heal == 0 {
        // Stale reference: the slot no longer holds a potion
        return None;
    }

    let (grid, removed) = grid.remove_one(coord);
    removed?;

    Some(MacroTrigger {
        grid,
        healed: heal.min(max_hp - hp),
    })
}
