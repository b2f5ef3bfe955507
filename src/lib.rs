//! Idlebound - Idle RPG Engine Library
//!
//! A tick-driven battle simulator with experience/proficiency progression,
//! a grid inventory with equipment slots, an automatic potion macro, and a
//! quest tracker fed by combat kill events. Presentation and the
//! persistence transport are left to the host; the engine exposes a
//! command surface returning state snapshots and `{success, message}`
//! results.

pub mod auto_potion;
pub mod character;
pub mod combat;
pub mod constants;
pub mod equipment;
pub mod game;
pub mod inventory;
pub mod items;
pub mod monsters;
pub mod progression;
pub mod quests;
pub mod save;
