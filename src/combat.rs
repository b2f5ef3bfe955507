//! The combat tick engine: one active encounter, advanced one attack
//! exchange at a time.
//!
//! Encounter states: no encounter (idle) -> `Engaging` -> `Victory` or
//! `Defeat`, plus flee straight back to idle. Victory and defeat processing
//! run at most once per encounter even if a stray tick fires after
//! resolution.

use crate::auto_potion::{self, MacroState};
use crate::character::{Character, ProficiencyTrack};
use crate::constants::*;
use crate::equipment::EquippedItems;
use crate::inventory::InventoryGrid;
use crate::items::{self, ItemId, WeaponType};
use crate::monsters::{self, MonsterData, MonsterId};
use crate::progression;
use crate::quests::QuestLog;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterPhase {
    Engaging,
    Victory,
    Defeat,
}

/// One active battle against a single monster.
///
/// Player HP is NOT tracked here: `Character.status.hp` is the single
/// source of truth during battle, so displayed and persisted HP can never
/// diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub monster_id: MonsterId,
    pub monster_hp: u32,
    pub phase: EncounterPhase,
    /// Tick cadence, fixed at encounter start.
    pub interval_ms: u64,
    elapsed_ms: u64,
    /// Countdown to auto re-engage after victory in continuous mode.
    pub continue_timer_ms: u64,
    resolved: bool,
}

/// Cadence for a player attack speed, computed once per encounter start.
pub fn tick_interval_ms(attack_speed: u32) -> u64 {
    let modifier = (attack_speed as f64 / BASE_ATTACK_SPEED as f64).max(1.0);
    ((BASE_TICK_MS as f64 / modifier) as u64).max(MIN_TICK_MS)
}

impl Encounter {
    /// Snapshots monster HP to full and fixes the tick cadence.
    pub fn start(monster: &MonsterData, attack_speed: u32) -> Self {
        Self {
            monster_id: monster.id,
            monster_hp: monster.hp,
            phase: EncounterPhase::Engaging,
            interval_ms: tick_interval_ms(attack_speed),
            elapsed_ms: 0,
            continue_timer_ms: 0,
            resolved: false,
        }
    }

    /// Accumulates elapsed time; true when one exchange is due. At most one
    /// exchange fires per call, and leftover time never banks more than one
    /// extra tick.
    pub fn tick_due(&mut self, delta_ms: u64) -> bool {
        if self.phase != EncounterPhase::Engaging {
            return false;
        }
        self.elapsed_ms = (self.elapsed_ms + delta_ms).min(self.interval_ms * 2);
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            true
        } else {
            false
        }
    }
}

/// A monster kill, consumed by the quest tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillEvent {
    pub monster_id: MonsterId,
    pub material_id: Option<ItemId>,
}

/// What happened during one tick, for the host's combat log.
#[derive(Debug, Clone)]
pub enum TickEvent {
    PlayerAttack {
        damage: u32,
        message: String,
    },
    MonsterAttack {
        damage: u32,
        message: String,
    },
    MonsterSlain {
        exp_gained: f64,
        gold_gained: u64,
        drop: Option<ItemId>,
        message: String,
    },
    /// A material dropped but the grid had no room for it.
    DropLost {
        item_id: ItemId,
        message: String,
    },
    PotionUsed {
        healed: u32,
        message: String,
    },
    LeveledUp {
        new_level: u32,
        message: String,
    },
    PlayerDefeated {
        exp_lost: f64,
        message: String,
    },
    QuestAdvanced {
        progress: u32,
        target: u32,
        message: String,
    },
}

/// One damage roll: `max(1, floor(max(1, attack - defense) * (1 ± 20%)))`.
pub fn damage_roll(attack: u32, defense: u32, rng: &mut impl Rng) -> u32 {
    let base = attack.saturating_sub(defense).max(1);
    let variance = rng.gen_range(1.0 - DAMAGE_VARIANCE..=1.0 + DAMAGE_VARIANCE);
    ((base as f64 * variance) as u32).max(1)
}

/// Runs one attack exchange. Mutates the encounter, the character, the
/// grid (macro/drops), and the quest log, and returns the events in the
/// order they happened.
pub fn tick_encounter(
    encounter: &mut Encounter,
    character: &mut Character,
    equipped: &EquippedItems,
    grid: &mut InventoryGrid,
    macro_state: &MacroState,
    quest_log: &mut QuestLog,
    rng: &mut impl Rng,
) -> Vec<TickEvent> {
    let mut events = Vec::new();

    // Idempotency guard: a queued tick arriving after resolution is a no-op
    if encounter.resolved || encounter.phase != EncounterPhase::Engaging {
        return events;
    }

    let monster = match monsters::get_monster(encounter.monster_id) {
        Some(monster) => monster,
        None => return events,
    };

    // 1. Player strikes the monster
    let player_attack = character.status.gen_attack + equipped.weapon_attack();
    let damage = damage_roll(player_attack, monster.defense, rng);
    encounter.monster_hp = encounter.monster_hp.saturating_sub(damage);
    events.push(TickEvent::PlayerAttack {
        damage,
        message: format!("You hit {} for {} damage.", monster.name, damage),
    });

    // 2. Victory: rewards, drop roll, kill event
    if encounter.monster_hp == 0 {
        encounter.phase = EncounterPhase::Victory;
        encounter.resolved = true;
        encounter.continue_timer_ms = CONTINUE_DELAY_MS;
        resolve_victory(monster, character, grid, quest_log, rng, &mut events);
        return events;
    }

    // 3. Monster strikes back; on-hit experience and proficiency trickle
    let player_defense = character.status.avg_def_pwr + equipped.armor_defense();
    let taken = damage_roll(monster.attack, player_defense, rng);
    character.take_damage(taken);
    events.push(TickEvent::MonsterAttack {
        damage: taken,
        message: format!("{} hits you for {} damage.", monster.name, taken),
    });

    let levels = character.gain_experience(monster.on_hit_exp);
    push_level_ups(character, levels, &mut events);

    let weapon_track = match equipped.weapon_type() {
        Some(WeaponType::Ranged) => ProficiencyTrack::Range,
        // Bare hands train melee
        Some(WeaponType::Melee) | None => ProficiencyTrack::Melee,
    };
    character.gain_proficiency(weapon_track, monster.level);
    if equipped.has_armor() {
        character.gain_proficiency(ProficiencyTrack::Defense, monster.level);
    }

    // 4. Macro check against post-damage HP
    if let Some(trigger) =
        auto_potion::evaluate_macro(macro_state, grid, character.status.hp, character.status.max_hp)
    {
        *grid = trigger.grid;
        let healed = character.heal(trigger.healed);
        events.push(TickEvent::PotionUsed {
            healed,
            message: format!("Auto-potion restores {} HP.", healed),
        });
    }

    // 5. Defeat: death penalty, HP restored as part of resolution
    if character.status.hp == 0 {
        encounter.phase = EncounterPhase::Defeat;
        encounter.resolved = true;
        let exp_lost = character.apply_death_penalty();
        events.push(TickEvent::PlayerDefeated {
            exp_lost,
            message: format!("{} has bested you...", monster.name),
        });
    }

    events
}

fn resolve_victory(
    monster: &MonsterData,
    character: &mut Character,
    grid: &mut InventoryGrid,
    quest_log: &mut QuestLog,
    rng: &mut impl Rng,
    events: &mut Vec<TickEvent>,
) {
    let exp_gained = monster.exp_reward * progression::experience_multiplier(character.level);
    let levels = character.gain_experience(exp_gained);

    let gold_gained = rng.gen_range(monster.gold_min..=monster.gold_max);
    character.gain_gold(gold_gained);

    let mut dropped = None;
    if let Some(drop) = monster.drop {
        if rng.gen::<f64>() < drop.rate {
            dropped = Some(drop.item_id);
        }
    }

    events.push(TickEvent::MonsterSlain {
        exp_gained,
        gold_gained,
        drop: dropped,
        message: format!("{} is slain! (+{} gold)", monster.name, gold_gained),
    });
    push_level_ups(character, levels, events);

    if let Some(item_id) = dropped {
        let outcome = grid.add_item_with_quantity(item_id, 1);
        *grid = outcome.grid;
        if !outcome.success {
            let name = items::get_item(item_id).map(|i| i.name).unwrap_or("item");
            events.push(TickEvent::DropLost {
                item_id,
                message: format!("{} dropped, but your bag is full.", name),
            });
        }
    }

    // The kill event feeds the quest tracker, drop or no drop
    let kill = KillEvent {
        monster_id: monster.id,
        material_id: dropped,
    };
    if quest_log.record_kill(kill.monster_id, kill.material_id) {
        if let Some(active) = &quest_log.active {
            if let Some(quest) = crate::quests::get_quest(active.quest_id) {
                events.push(TickEvent::QuestAdvanced {
                    progress: active.progress,
                    target: quest.goal.target_amount(),
                    message: format!(
                        "{}: {}/{}",
                        quest.name,
                        active.progress,
                        quest.goal.target_amount()
                    ),
                });
            }
        }
    }
}

fn push_level_ups(character: &Character, levels: u32, events: &mut Vec<TickEvent>) {
    if levels > 0 {
        events.push(TickEvent::LeveledUp {
            new_level: character.level,
            message: format!("You reached level {}!", character.level),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn setup() -> (Character, EquippedItems, InventoryGrid, MacroState, QuestLog) {
        (
            Character::new("Hero".to_string(), CharacterClass::Swordsman),
            EquippedItems::new(),
            InventoryGrid::new(),
            MacroState::default(),
            QuestLog::new(),
        )
    }

    #[test]
    fn test_damage_floor_is_one() {
        let mut rng = rng();
        for _ in 0..200 {
            // Defense far above attack still lands at least 1
            assert!(damage_roll(0, 0, &mut rng) >= 1);
            assert!(damage_roll(3, 100, &mut rng) >= 1);
        }
    }

    #[test]
    fn test_damage_variance_bounds() {
        let mut rng = rng();
        for _ in 0..500 {
            let dmg = damage_roll(102, 2, &mut rng);
            assert!((80..=120).contains(&dmg), "damage {} out of bounds", dmg);
        }
    }

    #[test]
    fn test_tick_interval_cadence() {
        // At or below base speed: base interval
        assert_eq!(tick_interval_ms(BASE_ATTACK_SPEED), BASE_TICK_MS);
        assert_eq!(tick_interval_ms(1), BASE_TICK_MS);
        // Double speed halves the interval
        assert_eq!(tick_interval_ms(BASE_ATTACK_SPEED * 2), BASE_TICK_MS / 2);
        // Absurd speed clamps to the floor
        assert_eq!(tick_interval_ms(10_000), MIN_TICK_MS);
    }

    #[test]
    fn test_tick_due_accumulates() {
        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, BASE_ATTACK_SPEED);

        assert!(!encounter.tick_due(BASE_TICK_MS / 2));
        assert!(encounter.tick_due(BASE_TICK_MS / 2));
        assert!(!encounter.tick_due(0));
    }

    #[test]
    fn test_exchange_until_victory_fires_once() {
        // Attack 12 vs defense 1 / hp 30 slime resolves in a bounded
        // number of ticks with exactly one victory
        let (mut character, equipped, mut grid, macro_state, mut quest_log) = setup();
        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        let mut victories = 0;
        for _ in 0..100 {
            let events = tick_encounter(
                &mut encounter,
                &mut character,
                &equipped,
                &mut grid,
                &macro_state,
                &mut quest_log,
                &mut rng,
            );
            victories += events
                .iter()
                .filter(|e| matches!(e, TickEvent::MonsterSlain { .. }))
                .count();
            if encounter.phase == EncounterPhase::Victory {
                break;
            }
        }

        assert_eq!(victories, 1);
        assert_eq!(encounter.monster_hp, 0);

        // A queued tick arriving after resolution is a no-op
        let events = tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_victory_grants_multiplied_exp_and_gold() {
        let (mut character, equipped, mut grid, macro_state, mut quest_log) = setup();
        // Strong enough to one-shot the slime
        character.status.gen_attack = 100;
        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        let events = tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );

        let slain = events
            .iter()
            .find_map(|e| match e {
                TickEvent::MonsterSlain {
                    exp_gained,
                    gold_gained,
                    ..
                } => Some((*exp_gained, *gold_gained)),
                _ => None,
            })
            .expect("victory event");

        // Level 1 earns the 4x early-game multiplier on victory exp
        assert!((slain.0 - monster.exp_reward * 4.0).abs() < 1e-9);
        assert!((monster.gold_min..=monster.gold_max).contains(&slain.1));
        assert_eq!(character.gold, slain.1);
        assert!(character.status.exp > 0.0);
    }

    #[test]
    fn test_monster_counterattack_and_trickle() {
        let (mut character, equipped, mut grid, macro_state, mut quest_log) = setup();
        character.status.gen_attack = 1; // cannot kill in one tick
        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        let hp_before = character.status.hp;
        let events = tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );

        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::MonsterAttack { .. })));
        assert!(character.status.hp < hp_before);
        // On-hit trickle landed
        assert!(character.status.exp > 0.0);
        // Bare hands train the melee track
        assert!(character.ability.melee.progress > 0.0 || character.ability.melee.points > 0);
        // No armor, no defense trickle
        assert_eq!(character.ability.defense.progress, 0.0);
    }

    #[test]
    fn test_defense_trickle_requires_armor() {
        let (mut character, mut equipped, mut grid, macro_state, mut quest_log) = setup();
        character.status.gen_attack = 1;
        equipped.helmet = Some(20);
        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );
        assert!(character.ability.defense.progress > 0.0);
    }

    #[test]
    fn test_ranged_weapon_trains_range_track() {
        let (mut character, mut equipped, mut grid, macro_state, mut quest_log) = setup();
        character.status.gen_attack = 1;
        equipped.weapon = Some(12); // Short Bow
        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );
        assert!(character.ability.range.progress > 0.0);
        assert_eq!(character.ability.melee.progress, 0.0);
    }

    #[test]
    fn test_defeat_applies_penalty_once_and_restores_hp() {
        let (mut character, equipped, mut grid, macro_state, mut quest_log) = setup();
        character.status.gen_attack = 1;
        character.status.avg_def_pwr = 0;
        character.status.hp = 1;
        character.status.exp = 0.5;
        let monster = monsters::get_monster(4).unwrap(); // hits hard
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        let events = tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );

        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::PlayerDefeated { .. })));
        assert_eq!(encounter.phase, EncounterPhase::Defeat);
        assert_eq!(character.status.hp, character.status.max_hp);
        assert!(character.status.exp < 0.5);

        // Ticking the resolved encounter again changes nothing
        let exp_after = character.status.exp;
        let events = tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );
        assert!(events.is_empty());
        assert_eq!(character.status.exp, exp_after);
    }

    #[test]
    fn test_macro_saves_from_lethal_hit() {
        let (mut character, equipped, mut grid, mut macro_state, mut quest_log) = setup();
        character.status.gen_attack = 1;
        character.status.avg_def_pwr = 0;
        character.status.hp = 5;
        grid = grid.add_item_with_quantity(2, 3).grid; // 100 HP potions
        macro_state.enabled = true;
        macro_state.potion_slot = Some(crate::inventory::GridCoord::new(0, 0));
        macro_state.hp_threshold = 50;

        let monster = monsters::get_monster(1).unwrap();
        let mut encounter = Encounter::start(monster, character.status.attack_speed);
        let mut rng = rng();

        let events = tick_encounter(
            &mut encounter,
            &mut character,
            &equipped,
            &mut grid,
            &macro_state,
            &mut quest_log,
            &mut rng,
        );

        // The macro runs against post-damage HP, before the defeat check
        assert!(events
            .iter()
            .any(|e| matches!(e, TickEvent::PotionUsed { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, TickEvent::PlayerDefeated { .. })));
        assert_eq!(encounter.phase, EncounterPhase::Engaging);
        assert!(character.is_alive());
        assert_eq!(grid.count_of(2), 2);
    }

    #[test]
    fn test_kill_event_advances_slay_quest() {
        let (mut character, equipped, mut grid, macro_state, mut quest_log) = setup();
        character.status.gen_attack = 100;
        quest_log.accept(1, 1).unwrap(); // slay 5 slimes
        let mut rng = rng();

        for _ in 0..5 {
            let monster = monsters::get_monster(1).unwrap();
            let mut encounter = Encounter::start(monster, character.status.attack_speed);
            tick_encounter(
                &mut encounter,
                &mut character,
                &equipped,
                &mut grid,
                &macro_state,
                &mut quest_log,
                &mut rng,
            );
        }

        assert!(quest_log.active.as_ref().unwrap().complete);
    }
}
