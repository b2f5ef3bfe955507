//! Versioned JSON save files with forward migration.
//!
//! The save blob is self-describing; fields added in later versions carry
//! `#[serde(default)]` so an older save loads cleanly, with absent pieces
//! filled from defaults (an absent inventory becomes a freshly generated
//! starter grid). An active encounter is intentionally not persisted:
//! closing the game cancels the battle.

use crate::auto_potion::MacroState;
use crate::character::Character;
use crate::constants::SAVE_VERSION;
use crate::equipment::EquippedItems;
use crate::game::{starter_grid, Game};
use crate::inventory::InventoryGrid;
use crate::quests::QuestLog;
use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    character: Character,
    #[serde(default)]
    inventory: Option<InventoryGrid>,
    #[serde(default)]
    equipped: EquippedItems,
    #[serde(default)]
    quest_log: QuestLog,
    #[serde(default)]
    macro_state: MacroState,
    #[serde(default)]
    continuous: bool,
    #[serde(default)]
    last_save_time: i64,
}

/// Manages the save file location and the load/save contract.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "idlebound").ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        Ok(Self {
            save_path: config_dir.join("save.json"),
        })
    }

    /// A manager bound to an explicit path; used by tests and hosts that
    /// manage their own save location.
    pub fn at_path(save_path: PathBuf) -> Self {
        Self { save_path }
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    pub fn save(&self, game: &Game) -> io::Result<()> {
        let save_file = SaveFile {
            version: SAVE_VERSION,
            character: game.character.clone(),
            inventory: Some(game.inventory.clone()),
            equipped: game.equipped.clone(),
            quest_log: game.quest_log.clone(),
            macro_state: game.macro_state.clone(),
            continuous: game.continuous,
            last_save_time: Utc::now().timestamp(),
        };

        let json = serde_json::to_string_pretty(&save_file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.save_path, json)
    }

    /// Loads and migrates the save blob. Absent newer fields fall back to
    /// defaults; an absent inventory is replaced by a starter grid for the
    /// character's class.
    pub fn load(&self) -> io::Result<Game> {
        let json = fs::read_to_string(&self.save_path)?;
        let save_file: SaveFile = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let class = save_file.character.general.class;
        log::debug!(
            "loaded save version {} for {}",
            save_file.version,
            save_file.character.general.name
        );

        Ok(Game {
            inventory: save_file.inventory.unwrap_or_else(|| starter_grid(class)),
            character: save_file.character,
            equipped: save_file.equipped,
            quest_log: save_file.quest_log,
            macro_state: save_file.macro_state,
            continuous: save_file.continuous,
            encounter: None,
        })
    }
}
