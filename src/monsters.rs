//! Static monster and zone catalogs.

use crate::items::ItemId;

pub type MonsterId = u32;
pub type ZoneId = u32;

/// Chance-weighted material drop carried by a monster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDrop {
    pub item_id: ItemId,
    /// Drop probability in `[0, 1]`.
    pub rate: f64,
}

/// A static monster definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterData {
    pub id: MonsterId,
    pub name: &'static str,
    pub level: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Experience fraction granted on victory, before the early-game
    /// multiplier.
    pub exp_reward: f64,
    /// Experience trickle granted to the player on every hit taken.
    pub on_hit_exp: f64,
    pub gold_min: u64,
    pub gold_max: u64,
    pub drop: Option<MaterialDrop>,
}

/// A hunting zone: a level gate plus the monsters found there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneData {
    pub id: ZoneId,
    pub name: &'static str,
    pub level_req: u32,
    pub monster_ids: &'static [MonsterId],
}

pub static MONSTERS: &[MonsterData] = &[
    MonsterData {
        id: 1,
        name: "Green Slime",
        level: 1,
        hp: 30,
        attack: 6,
        defense: 1,
        exp_reward: 0.10,
        on_hit_exp: 0.004,
        gold_min: 1,
        gold_max: 6,
        drop: Some(MaterialDrop {
            item_id: 41,
            rate: 0.40,
        }),
    },
    MonsterData {
        id: 2,
        name: "Wild Wolf",
        level: 3,
        hp: 50,
        attack: 9,
        defense: 2,
        exp_reward: 0.14,
        on_hit_exp: 0.005,
        gold_min: 3,
        gold_max: 10,
        drop: Some(MaterialDrop {
            item_id: 40,
            rate: 0.35,
        }),
    },
    MonsterData {
        id: 3,
        name: "Tusked Boar",
        level: 5,
        hp: 80,
        attack: 12,
        defense: 4,
        exp_reward: 0.18,
        on_hit_exp: 0.006,
        gold_min: 5,
        gold_max: 16,
        drop: Some(MaterialDrop {
            item_id: 42,
            rate: 0.30,
        }),
    },
    MonsterData {
        id: 4,
        name: "Cave Spider",
        level: 9,
        hp: 120,
        attack: 17,
        defense: 6,
        exp_reward: 0.22,
        on_hit_exp: 0.007,
        gold_min: 8,
        gold_max: 24,
        drop: Some(MaterialDrop {
            item_id: 43,
            rate: 0.30,
        }),
    },
    MonsterData {
        id: 5,
        name: "Bandit Scout",
        level: 13,
        hp: 170,
        attack: 23,
        defense: 9,
        exp_reward: 0.26,
        on_hit_exp: 0.008,
        gold_min: 14,
        gold_max: 40,
        drop: None,
    },
    MonsterData {
        id: 6,
        name: "Stone Golem",
        level: 18,
        hp: 260,
        attack: 28,
        defense: 16,
        exp_reward: 0.32,
        on_hit_exp: 0.009,
        gold_min: 20,
        gold_max: 60,
        drop: Some(MaterialDrop {
            item_id: 44,
            rate: 0.20,
        }),
    },
    MonsterData {
        id: 7,
        name: "Dire Wolf",
        level: 24,
        hp: 360,
        attack: 36,
        defense: 20,
        exp_reward: 0.38,
        on_hit_exp: 0.010,
        gold_min: 30,
        gold_max: 90,
        drop: Some(MaterialDrop {
            item_id: 40,
            rate: 0.45,
        }),
    },
    MonsterData {
        id: 8,
        name: "Obsidian Golem",
        level: 32,
        hp: 520,
        attack: 46,
        defense: 30,
        exp_reward: 0.46,
        on_hit_exp: 0.012,
        gold_min: 50,
        gold_max: 140,
        drop: Some(MaterialDrop {
            item_id: 44,
            rate: 0.35,
        }),
    },
];

pub static ZONES: &[ZoneData] = &[
    ZoneData {
        id: 1,
        name: "Sunlit Meadow",
        level_req: 1,
        monster_ids: &[1, 2],
    },
    ZoneData {
        id: 2,
        name: "Boar Woods",
        level_req: 4,
        monster_ids: &[3, 4],
    },
    ZoneData {
        id: 3,
        name: "Bandit Pass",
        level_req: 12,
        monster_ids: &[5, 6],
    },
    ZoneData {
        id: 4,
        name: "Shattered Ridge",
        level_req: 22,
        monster_ids: &[7, 8],
    },
];

pub fn get_monster(id: MonsterId) -> Option<&'static MonsterData> {
    MONSTERS.iter().find(|m| m.id == id)
}

pub fn get_zone(id: ZoneId) -> Option<&'static ZoneData> {
    ZONES.iter().find(|z| z.id == id)
}

/// The zone a monster belongs to, used for level gating at encounter start.
pub fn zone_of_monster(id: MonsterId) -> Option<&'static ZoneData> {
    ZONES.iter().find(|z| z.monster_ids.contains(&id))
}
