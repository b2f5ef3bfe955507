//! Quest catalog and the quest lifecycle tracker.
//!
//! Lifecycle per quest: available -> active -> complete -> archived. At most
//! one quest is active at a time, and an archived id is never reoffered.

use crate::items::ItemId;
use crate::monsters::MonsterId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type QuestId = u32;

/// What a quest asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestGoal {
    /// Defeat `count` of one monster.
    Slay { monster_id: MonsterId, count: u32 },
    /// Collect `count` of one material from combat drops.
    Collect { material_id: ItemId, count: u32 },
}

impl QuestGoal {
    pub fn target_amount(&self) -> u32 {
        match self {
            QuestGoal::Slay { count, .. } => *count,
            QuestGoal::Collect { count, .. } => *count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestReward {
    pub gold: u64,
    /// Experience fraction, applied through the same overflow-aware leveling
    /// math as combat.
    pub exp: f64,
    pub item: Option<(ItemId, u32)>,
}

/// A static quest definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestData {
    pub id: QuestId,
    pub name: &'static str,
    pub level: u32,
    pub goal: QuestGoal,
    pub reward: QuestReward,
}

pub static QUESTS: &[QuestData] = &[
    QuestData {
        id: 1,
        name: "Slime Cleanup",
        level: 1,
        goal: QuestGoal::Slay {
            monster_id: 1,
            count: 5,
        },
        reward: QuestReward {
            gold: 40,
            exp: 0.30,
            item: Some((1, 3)),
        },
    },
    QuestData {
        id: 2,
        name: "Jelly for the Apothecary",
        level: 1,
        goal: QuestGoal::Collect {
            material_id: 41,
            count: 4,
        },
        reward: QuestReward {
            gold: 60,
            exp: 0.25,
            item: None,
        },
    },
    QuestData {
        id: 3,
        name: "Wolves at the Gate",
        level: 3,
        goal: QuestGoal::Slay {
            monster_id: 2,
            count: 8,
        },
        reward: QuestReward {
            gold: 120,
            exp: 0.45,
            item: Some((20, 1)),
        },
    },
    QuestData {
        id: 4,
        name: "Warm Pelts",
        level: 4,
        goal: QuestGoal::Collect {
            material_id: 40,
            count: 6,
        },
        reward: QuestReward {
            gold: 150,
            exp: 0.40,
            item: None,
        },
    },
    QuestData {
        id: 5,
        name: "Boar Hunt",
        level: 5,
        goal: QuestGoal::Slay {
            monster_id: 3,
            count: 10,
        },
        reward: QuestReward {
            gold: 220,
            exp: 0.60,
            item: Some((2, 5)),
        },
    },
    QuestData {
        id: 6,
        name: "Silk for the Weaver",
        level: 9,
        goal: QuestGoal::Collect {
            material_id: 43,
            count: 8,
        },
        reward: QuestReward {
            gold: 400,
            exp: 0.70,
            item: Some((25, 1)),
        },
    },
    QuestData {
        id: 7,
        name: "Break the Bandits",
        level: 13,
        goal: QuestGoal::Slay {
            monster_id: 5,
            count: 12,
        },
        reward: QuestReward {
            gold: 800,
            exp: 0.90,
            item: Some((11, 1)),
        },
    },
    QuestData {
        id: 8,
        name: "Heart of Stone",
        level: 18,
        goal: QuestGoal::Collect {
            material_id: 44,
            count: 5,
        },
        reward: QuestReward {
            gold: 1500,
            exp: 1.20,
            item: Some((27, 1)),
        },
    },
];

pub fn get_quest(id: QuestId) -> Option<&'static QuestData> {
    QUESTS.iter().find(|q| q.id == id)
}

/// The one in-flight quest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveQuest {
    pub quest_id: QuestId,
    pub progress: u32,
    pub complete: bool,
}

/// Tracks the active quest and the archived (completed) id set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestLog {
    pub active: Option<ActiveQuest>,
    pub completed: BTreeSet<QuestId>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a quest. Rejected when another quest is active, the id is
    /// unknown, the id was already completed, or the character is under the
    /// quest's level.
    pub fn accept(&mut self, quest_id: QuestId, char_level: u32) -> Result<&'static QuestData, String> {
        if let Some(active) = &self.active {
            log::warn!("quest {} rejected: quest {} is active", quest_id, active.quest_id);
            return Err("Another quest is already in progress.".to_string());
        }
        if self.completed.contains(&quest_id) {
            log::warn!("quest {} rejected: already completed", quest_id);
            return Err("That quest has already been completed.".to_string());
        }
        let quest = get_quest(quest_id).ok_or_else(|| "Unknown quest.".to_string())?;
        if char_level < quest.level {
            return Err(format!("Requires level {}.", quest.level));
        }

        self.active = Some(ActiveQuest {
            quest_id,
            progress: 0,
            complete: false,
        });
        log::debug!("quest {} accepted", quest_id);
        Ok(quest)
    }

    /// Feeds one kill event into the tracker. Progress advances only when
    /// the slain monster (slay) or its dropped material (collect) matches,
    /// and never exceeds the target amount. Returns true if it advanced.
    pub fn record_kill(&mut self, monster_id: MonsterId, material_id: Option<ItemId>) -> bool {
        let active = match &mut self.active {
            Some(active) if !active.complete => active,
            _ => return false,
        };
        let quest = match get_quest(active.quest_id) {
            Some(quest) => quest,
            None => return false,
        };

        let matches = match quest.goal {
            QuestGoal::Slay { monster_id: target, .. } => monster_id == target,
            QuestGoal::Collect { material_id: target, .. } => material_id == Some(target),
        };
        if !matches {
            return false;
        }

        let target = quest.goal.target_amount();
        active.progress = (active.progress + 1).min(target);
        if active.progress >= target {
            active.complete = true;
        }
        true
    }

    /// Finishes the active quest if it is complete: clears the active slot,
    /// archives the id, and hands back the definition so the caller can
    /// grant rewards. `None` when nothing is ready to turn in.
    pub fn take_completed(&mut self) -> Option<&'static QuestData> {
        let quest_id = match &self.active {
            Some(active) if active.complete => active.quest_id,
            _ => return None,
        };
        self.active = None;
        self.completed.insert(quest_id);
        get_quest(quest_id)
    }

    /// The next quest to offer: the lowest-level quest the character
    /// qualifies for that is neither archived nor active, ties broken by
    /// catalog order.
    pub fn next_offer(&self, char_level: u32) -> Option<&'static QuestData> {
        let active_id = self.active.as_ref().map(|a| a.quest_id);
        QUESTS
            .iter()
            .filter(|q| q.level <= char_level)
            .filter(|q| !self.completed.contains(&q.id))
            .filter(|q| Some(q.id) != active_id)
            // Catalog order breaks level ties, so keep the first minimum
            .fold(None, |best: Option<&'static QuestData>, q| match best {
                Some(b) if b.level <= q.level => Some(b),
                _ => Some(q),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_then_singleton() {
        let mut quest_log = QuestLog::new();
        assert!(quest_log.accept(1, 1).is_ok());

        // Second accept is rejected while one is active
        let err = quest_log.accept(2, 10).unwrap_err();
        assert!(err.contains("in progress"));
        assert_eq!(quest_log.active.as_ref().unwrap().quest_id, 1);
    }

    #[test]
    fn test_accept_rejects_archived_and_underlevel() {
        let mut quest_log = QuestLog::new();
        quest_log.completed.insert(1);
        assert!(quest_log.accept(1, 10).is_err());

        // Quest 7 requires level 13
        assert!(quest_log.accept(7, 5).is_err());
        assert!(quest_log.active.is_none());
    }

    #[test]
    fn test_slay_progress_and_cap() {
        let mut quest_log = QuestLog::new();
        quest_log.accept(1, 1).unwrap(); // slay 5 slimes

        for _ in 0..4 {
            assert!(quest_log.record_kill(1, None));
        }
        assert!(!quest_log.active.as_ref().unwrap().complete);

        // Wrong monster does not advance
        assert!(!quest_log.record_kill(2, None));

        assert!(quest_log.record_kill(1, None));
        let active = quest_log.active.as_ref().unwrap();
        assert!(active.complete);
        assert_eq!(active.progress, 5);

        // Further kills never push progress past the target
        quest_log.record_kill(1, None);
        assert_eq!(quest_log.active.as_ref().unwrap().progress, 5);
    }

    #[test]
    fn test_collect_matches_dropped_material() {
        let mut quest_log = QuestLog::new();
        quest_log.accept(2, 1).unwrap(); // collect 4 slime jelly (item 41)

        // Kill without a drop does not count
        assert!(!quest_log.record_kill(1, None));
        // Wrong material does not count
        assert!(!quest_log.record_kill(1, Some(40)));

        for _ in 0..4 {
            assert!(quest_log.record_kill(1, Some(41)));
        }
        assert!(quest_log.active.as_ref().unwrap().complete);
    }

    #[test]
    fn test_take_completed_archives_and_clears() {
        let mut quest_log = QuestLog::new();
        quest_log.accept(1, 1).unwrap();

        // Not complete yet
        assert!(quest_log.take_completed().is_none());

        for _ in 0..5 {
            quest_log.record_kill(1, None);
        }
        let quest = quest_log.take_completed().unwrap();
        assert_eq!(quest.id, 1);
        assert!(quest_log.active.is_none());
        assert!(quest_log.completed.contains(&1));

        // Archived id can never be accepted again
        assert!(quest_log.accept(1, 50).is_err());
    }

    #[test]
    fn test_next_offer_lowest_eligible() {
        let mut quest_log = QuestLog::new();
        // Two level-1 quests: catalog order breaks the tie
        assert_eq!(quest_log.next_offer(1).unwrap().id, 1);

        quest_log.completed.insert(1);
        assert_eq!(quest_log.next_offer(1).unwrap().id, 2);

        quest_log.completed.insert(2);
        assert!(quest_log.next_offer(1).is_none());
        assert_eq!(quest_log.next_offer(4).unwrap().id, 3);
    }

    #[test]
    fn test_next_offer_skips_active() {
        let mut quest_log = QuestLog::new();
        quest_log.accept(1, 1).unwrap();
        assert_eq!(quest_log.next_offer(1).unwrap().id, 2);
    }

    #[test]
    fn test_catalog_integrity() {
        for (i, a) in QUESTS.iter().enumerate() {
            for b in &QUESTS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
            assert!(a.goal.target_amount() > 0);
        }
    }
}
