//! The character aggregate: general info, status stats, proficiency tracks,
//! and element resistances.
//!
//! All progression mutations funnel through the methods here so the level,
//! experience-fraction, and proficiency-cap invariants hold at every call
//! site.

use crate::constants::*;
use crate::progression;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Swordsman,
    Archer,
    Mage,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Swordsman => "Swordsman",
            CharacterClass::Archer => "Archer",
            CharacterClass::Mage => "Mage",
        }
    }

    /// Base status stats granted at character creation.
    fn base_status(&self) -> StatusInfo {
        match self {
            CharacterClass::Swordsman => StatusInfo {
                hp: 120,
                max_hp: 120,
                fp: 20,
                max_fp: 20,
                sp: 40,
                max_sp: 40,
                defense_gauge: 10,
                exp: 0.0,
                gen_attack: 12,
                force_attack: 4,
                avg_def_pwr: 8,
                avg_def_range: 5,
                avg_def_rate: 6,
                attack_speed: 10,
                accuracy: 12,
                dodge: 8,
            },
            CharacterClass::Archer => StatusInfo {
                hp: 95,
                max_hp: 95,
                fp: 25,
                max_fp: 25,
                sp: 50,
                max_sp: 50,
                defense_gauge: 7,
                exp: 0.0,
                gen_attack: 11,
                force_attack: 6,
                avg_def_pwr: 5,
                avg_def_range: 8,
                avg_def_rate: 5,
                attack_speed: 13,
                accuracy: 16,
                dodge: 12,
            },
            CharacterClass::Mage => StatusInfo {
                hp: 80,
                max_hp: 80,
                fp: 50,
                max_fp: 50,
                sp: 35,
                max_sp: 35,
                defense_gauge: 5,
                exp: 0.0,
                gen_attack: 7,
                force_attack: 15,
                avg_def_pwr: 4,
                avg_def_range: 4,
                avg_def_rate: 4,
                attack_speed: 9,
                accuracy: 11,
                dodge: 9,
            },
        }
    }

    /// Flat per-level stat growth.
    fn growth(&self) -> LevelGrowth {
        match self {
            CharacterClass::Swordsman => LevelGrowth {
                max_hp: 9,
                max_fp: 1,
                max_sp: 3,
                gen_attack: 2,
                force_attack: 1,
                avg_def_pwr: 1,
            },
            CharacterClass::Archer => LevelGrowth {
                max_hp: 7,
                max_fp: 2,
                max_sp: 4,
                gen_attack: 2,
                force_attack: 1,
                avg_def_pwr: 1,
            },
            CharacterClass::Mage => LevelGrowth {
                max_hp: 5,
                max_fp: 4,
                max_sp: 2,
                gen_attack: 1,
                force_attack: 3,
                avg_def_pwr: 1,
            },
        }
    }
}

struct LevelGrowth {
    max_hp: u32,
    max_fp: u32,
    max_sp: u32,
    gen_attack: u32,
    force_attack: u32,
    avg_def_pwr: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub id: String,
    pub name: String,
    pub class: CharacterClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub hp: u32,
    pub max_hp: u32,
    pub fp: u32,
    pub max_fp: u32,
    pub sp: u32,
    pub max_sp: u32,
    pub defense_gauge: u32,
    /// Experience fraction toward the next level, in `[0, 1)` at rest.
    pub exp: f64,
    pub gen_attack: u32,
    pub force_attack: u32,
    pub avg_def_pwr: u32,
    pub avg_def_range: u32,
    pub avg_def_rate: u32,
    pub attack_speed: u32,
    pub accuracy: u32,
    pub dodge: u32,
}

/// One skill track: integer points plus fractional progress toward the next.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Proficiency {
    pub points: u32,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProficiencyTrack {
    Melee,
    Range,
    Unit,
    Force,
    Shield,
    Defense,
}

impl ProficiencyTrack {
    pub fn all() -> [ProficiencyTrack; 6] {
        [
            ProficiencyTrack::Melee,
            ProficiencyTrack::Range,
            ProficiencyTrack::Unit,
            ProficiencyTrack::Force,
            ProficiencyTrack::Shield,
            ProficiencyTrack::Defense,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbilityInfo {
    pub melee: Proficiency,
    pub range: Proficiency,
    pub unit: Proficiency,
    pub force: Proficiency,
    pub shield: Proficiency,
    pub defense: Proficiency,
}

impl AbilityInfo {
    pub fn get(&self, track: ProficiencyTrack) -> &Proficiency {
        match track {
            ProficiencyTrack::Melee => &self.melee,
            ProficiencyTrack::Range => &self.range,
            ProficiencyTrack::Unit => &self.unit,
            ProficiencyTrack::Force => &self.force,
            ProficiencyTrack::Shield => &self.shield,
            ProficiencyTrack::Defense => &self.defense,
        }
    }

    fn get_mut(&mut self, track: ProficiencyTrack) -> &mut Proficiency {
        match track {
            ProficiencyTrack::Melee => &mut self.melee,
            ProficiencyTrack::Range => &mut self.range,
            ProficiencyTrack::Unit => &mut self.unit,
            ProficiencyTrack::Force => &mut self.force,
            ProficiencyTrack::Shield => &mut self.shield,
            ProficiencyTrack::Defense => &mut self.defense,
        }
    }

    pub fn total_points(&self) -> u32 {
        ProficiencyTrack::all()
            .iter()
            .map(|t| self.get(*t).points)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementResistInfo {
    pub fire: u32,
    pub water: u32,
    pub wind: u32,
    pub earth: u32,
}

/// The mutable character record read and written by combat and quests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub general: GeneralInfo,
    pub level: u32,
    pub gold: u64,
    pub status: StatusInfo,
    pub ability: AbilityInfo,
    pub resist: ElementResistInfo,
}

impl Character {
    pub fn new(name: String, class: CharacterClass) -> Self {
        Self {
            general: GeneralInfo {
                id: Uuid::new_v4().to_string(),
                name,
                class,
            },
            level: 1,
            gold: 0,
            status: class.base_status(),
            ability: AbilityInfo::default(),
            resist: ElementResistInfo::default(),
        }
    }

    /// Adds an experience fraction, resolving any level-ups and applying
    /// per-level class stat growth. Returns the number of levels gained.
    pub fn gain_experience(&mut self, gain: f64) -> u32 {
        let (new_level, new_exp) =
            progression::calculate_exp_and_level(self.level, self.status.exp, gain);
        let gained = new_level - self.level;

        if gained > 0 {
            let growth = self.general.class.growth();
            for _ in 0..gained {
                self.status.max_hp += growth.max_hp;
                self.status.max_fp += growth.max_fp;
                self.status.max_sp += growth.max_sp;
                self.status.gen_attack += growth.gen_attack;
                self.status.force_attack += growth.force_attack;
                self.status.avg_def_pwr += growth.avg_def_pwr;
            }
            // Level-up refills the vitals
            self.status.hp = self.status.max_hp;
            self.status.fp = self.status.max_fp;
            self.status.sp = self.status.max_sp;
            log::debug!("{} reached level {}", self.general.name, new_level);
        }

        self.level = new_level;
        self.status.exp = new_exp;
        gained
    }

    /// Applies the death penalty and restores HP to max. Returns the
    /// experience fraction actually lost.
    pub fn apply_death_penalty(&mut self) -> f64 {
        let (actual, new_exp) =
            progression::calculate_death_penalty(self.status.exp, DEATH_PENALTY_RATE);
        self.status.exp = new_exp;
        self.status.hp = self.status.max_hp;
        actual
    }

    /// Heals up to `amount`, clamped to max HP. Returns HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.status.hp;
        self.status.hp = (self.status.hp + amount).min(self.status.max_hp);
        self.status.hp - before
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.status.hp = self.status.hp.saturating_sub(amount);
    }

    pub fn is_alive(&self) -> bool {
        self.status.hp > 0
    }

    pub fn gain_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Accumulates proficiency on one track from a combat action against a
    /// monster of the given level. Points are capped by the level curve.
    pub fn gain_proficiency(&mut self, track: ProficiencyTrack, monster_level: u32) {
        let max_pt = progression::max_pt_for_level(self.level);
        let current = *self.ability.get(track);
        let gain = progression::calculate_pt_exp_gain(current.points, self.level, monster_level);
        let (points, progress) =
            progression::calculate_pt_and_exp(current.points, current.progress, gain, max_pt);
        let slot = self.ability.get_mut(track);
        slot.points = points;
        slot.progress = progress;
    }

    /// Display-only combat power score.
    pub fn combat_power(&self) -> u64 {
        progression::calculate_cp(&self.status, &self.ability)
    }
}
