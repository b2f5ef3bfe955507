//! The game aggregate and its command surface.
//!
//! This is the single authoritative mutation path: a host (UI, test
//! harness) issues commands, each command validates and either applies a
//! new state or returns a failure result with a user-facing message, and
//! `advance` drives the combat tick engine from the host's clock.

use crate::auto_potion::MacroState;
use crate::character::{Character, CharacterClass};
use crate::combat::{tick_encounter, Encounter, EncounterPhase, TickEvent};
use crate::equipment::{self, EquippedItems};
use crate::inventory::{GridCoord, InventoryGrid};
use crate::items::{self, EquipSlot, ItemId};
use crate::monsters::{self, MonsterId};
use crate::quests::{QuestData, QuestLog};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// User-facing outcome of a command. Failures leave the game untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Partial update for the auto-potion macro; `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default)]
pub struct MacroUpdate {
    pub enabled: Option<bool>,
    /// `Some(None)` clears the assigned slot.
    pub potion_slot: Option<Option<GridCoord>>,
    pub hp_threshold: Option<u32>,
}

/// The starter grid granted at character creation: a handful of potions
/// plus a class-appropriate weapon.
pub fn starter_grid(class: CharacterClass) -> InventoryGrid {
    let grid = InventoryGrid::new().add_item_with_quantity(1, 5).grid;
    let weapon = match class {
        CharacterClass::Archer => 12, // Short Bow
        CharacterClass::Swordsman | CharacterClass::Mage => 10, // Rusty Sword
    };
    grid.add_item_with_quantity(weapon, 1).grid
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub character: Character,
    pub inventory: InventoryGrid,
    pub equipped: EquippedItems,
    pub quest_log: QuestLog,
    pub macro_state: MacroState,
    pub continuous: bool,
    pub encounter: Option<Encounter>,
}

impl Game {
    pub fn new(name: String, class: CharacterClass) -> Self {
        Self {
            character: Character::new(name, class),
            inventory: starter_grid(class),
            equipped: EquippedItems::new(),
            quest_log: QuestLog::new(),
            macro_state: MacroState::default(),
            continuous: false,
            encounter: None,
        }
    }

    // ── Combat commands ─────────────────────────────────────────────

    /// Opens an encounter against a monster. The player must meet the
    /// monster's zone level gate, and any previous encounter is replaced
    /// (a resolved one) or rejected (a live one).
    pub fn start_encounter(&mut self, monster_id: MonsterId) -> ActionResult {
        if matches!(
            self.encounter.as_ref().map(|e| e.phase),
            Some(EncounterPhase::Engaging)
        ) {
            return ActionResult::fail("You are already in battle.");
        }

        let monster = match monsters::get_monster(monster_id) {
            Some(monster) => monster,
            None => return ActionResult::fail("No such monster."),
        };
        if let Some(zone) = monsters::zone_of_monster(monster_id) {
            if self.character.level < zone.level_req {
                return ActionResult::fail(format!(
                    "{} requires level {}.",
                    zone.name, zone.level_req
                ));
            }
        }

        self.encounter = Some(Encounter::start(
            monster,
            self.character.status.attack_speed,
        ));
        log::debug!("encounter started against {}", monster.name);
        ActionResult::ok(format!("A wild {} appears!", monster.name))
    }

    /// Flees the current battle: no reward, no penalty, timer cleared by
    /// dropping the encounter.
    pub fn flee(&mut self) -> ActionResult {
        match self.encounter.as_ref().map(|e| e.phase) {
            Some(EncounterPhase::Engaging) => {
                self.encounter = None;
                ActionResult::ok("You fled from battle.")
            }
            _ => ActionResult::fail("You are not in battle."),
        }
    }

    /// Manual "Fight Again" after victory or defeat.
    pub fn fight_again(&mut self) -> ActionResult {
        let monster_id = match self.encounter.as_ref() {
            Some(e) if e.phase != EncounterPhase::Engaging => e.monster_id,
            _ => return ActionResult::fail("There is nothing to re-fight."),
        };
        self.encounter = None;
        self.start_encounter(monster_id)
    }

    pub fn set_continuous(&mut self, enabled: bool) -> ActionResult {
        self.continuous = enabled;
        ActionResult::ok(if enabled {
            "Continuous combat enabled."
        } else {
            "Continuous combat disabled."
        })
    }

    /// Drives the engine from the host clock. At most one attack exchange
    /// fires per call; in continuous mode a victory re-engages the same
    /// monster after a short delay, carrying the character's HP over.
    pub fn advance(&mut self, delta_ms: u64, rng: &mut impl Rng) -> Vec<TickEvent> {
        let encounter = match self.encounter.as_mut() {
            Some(encounter) => encounter,
            None => return Vec::new(),
        };

        match encounter.phase {
            EncounterPhase::Engaging => {
                if !encounter.tick_due(delta_ms) {
                    return Vec::new();
                }
                tick_encounter(
                    encounter,
                    &mut self.character,
                    &self.equipped,
                    &mut self.inventory,
                    &self.macro_state,
                    &mut self.quest_log,
                    rng,
                )
            }
            EncounterPhase::Victory if self.continuous => {
                encounter.continue_timer_ms = encounter.continue_timer_ms.saturating_sub(delta_ms);
                if encounter.continue_timer_ms == 0 {
                    let monster_id = encounter.monster_id;
                    // Cadence is re-derived at each encounter start
                    if let Some(monster) = monsters::get_monster(monster_id) {
                        *encounter = Encounter::start(monster, self.character.status.attack_speed);
                    }
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // ── Inventory & equipment commands ───────────────────────────────

    pub fn equip(&mut self, slot: EquipSlot, coord: GridCoord) -> ActionResult {
        let outcome = equipment::equip_item(&self.inventory, &self.equipped, slot, coord);
        if outcome.success {
            self.inventory = outcome.grid;
            self.equipped = outcome.equipped;
            ActionResult::ok(format!("Equipped to {}.", slot.name()))
        } else {
            ActionResult::fail("That cannot be equipped there.")
        }
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> ActionResult {
        let outcome = equipment::unequip_item(&self.inventory, &self.equipped, slot);
        if outcome.success {
            self.inventory = outcome.grid;
            self.equipped = outcome.equipped;
            ActionResult::ok(format!("Removed {}.", slot.name()))
        } else {
            ActionResult::fail("No room in your bag.")
        }
    }

    pub fn swap(&mut self, a: GridCoord, b: GridCoord) -> ActionResult {
        self.inventory = self.inventory.swap_items(a, b);
        ActionResult::ok("Moved.")
    }

    /// Drinks a consumable from the grid. Valid only for heal-capable
    /// consumables, and only when below max HP.
    pub fn use_item(&mut self, coord: GridCoord) -> ActionResult {
        let stack = match self.inventory.get(coord) {
            Some(stack) => *stack,
            None => return ActionResult::fail("That slot is empty."),
        };
        let item = match items::get_item(stack.item_id) {
            Some(item) => item,
            None => return ActionResult::fail("Unknown item."),
        };
        let heal = item.heal_amount();
        if heal == 0 {
            return ActionResult::fail(format!("{} cannot be used.", item.name));
        }
        if self.character.status.hp >= self.character.status.max_hp {
            return ActionResult::fail("Your HP is already full.");
        }

        let (grid, removed) = self.inventory.remove_one(coord);
        if removed.is_none() {
            return ActionResult::fail("That slot is empty.");
        }
        self.inventory = grid;
        let healed = self.character.heal(heal);
        ActionResult::ok(format!("{} restores {} HP.", item.name, healed))
    }

    /// Buys items from the catalog: gold and level requirement checked up
    /// front, and only units that actually fit are charged.
    pub fn buy_item(&mut self, item_id: ItemId, quantity: u32) -> ActionResult {
        let item = match items::get_item(item_id) {
            Some(item) => item,
            None => return ActionResult::fail("No such item for sale."),
        };
        if self.character.level < item.level_req {
            return ActionResult::fail(format!("{} requires level {}.", item.name, item.level_req));
        }
        let cost = item.price.saturating_mul(quantity as u64);
        if self.character.gold < cost {
            return ActionResult::fail("Not enough gold.");
        }

        let outcome = self.inventory.add_item_with_quantity(item_id, quantity);
        if outcome.added == 0 {
            return ActionResult::fail("Your bag is full.");
        }
        self.inventory = outcome.grid;
        self.character.gold -= item.price.saturating_mul(outcome.added as u64);

        if outcome.success {
            ActionResult::ok(format!("Bought {} x{}.", item.name, outcome.added))
        } else {
            ActionResult::ok(format!(
                "Bought {} x{} (bag full, {} left behind).",
                item.name,
                outcome.added,
                quantity - outcome.added
            ))
        }
    }

    // ── Quest commands ──────────────────────────────────────────────

    /// The quest the board would offer right now.
    pub fn offered_quest(&self) -> Option<&'static QuestData> {
        self.quest_log.next_offer(self.character.level)
    }

    pub fn accept_quest(&mut self, quest_id: u32) -> ActionResult {
        match self.quest_log.accept(quest_id, self.character.level) {
            Ok(quest) => ActionResult::ok(format!("Quest accepted: {}.", quest.name)),
            Err(message) => ActionResult::fail(message),
        }
    }

    /// Turns in the active quest. Gold and experience always apply; the
    /// reward item is forfeited (and reported) when the bag has no room.
    pub fn complete_quest(&mut self) -> ActionResult {
        let quest = match self.quest_log.take_completed() {
            Some(quest) => quest,
            None => return ActionResult::fail("No quest is ready to turn in."),
        };

        self.character.gain_gold(quest.reward.gold);
        self.character.gain_experience(quest.reward.exp);

        let mut message = format!("{} complete! +{} gold.", quest.name, quest.reward.gold);
        if let Some((item_id, quantity)) = quest.reward.item {
            let outcome = self.inventory.add_item_with_quantity(item_id, quantity);
            self.inventory = outcome.grid;
            if outcome.added < quantity {
                let name = items::get_item(item_id).map(|i| i.name).unwrap_or("reward");
                message.push_str(&format!(" Your bag was full; {} was lost.", name));
            }
        }
        ActionResult::ok(message)
    }

    // ── Macro command ───────────────────────────────────────────────

    pub fn update_macro(&mut self, update: MacroUpdate) -> ActionResult {
        if let Some(enabled) = update.enabled {
            self.macro_state.enabled = enabled;
        }
        if let Some(slot) = update.potion_slot {
            self.macro_state.potion_slot = slot;
        }
        if let Some(threshold) = update.hp_threshold {
            self.macro_state.hp_threshold = threshold;
        }
        ActionResult::ok("Macro settings updated.")
    }
}
