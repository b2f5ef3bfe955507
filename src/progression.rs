//! Pure progression math: level curve, proficiency growth, death penalty,
//! and the display-only combat power score.
//!
//! All functions here are side-effect free; the character aggregate applies
//! their results.

use crate::character::{AbilityInfo, StatusInfo};
use crate::constants::*;

/// Adds an experience fraction and resolves level-ups, carrying overflow
/// across multiple levels in one call.
///
/// At [`MAX_LEVEL`] the fraction is clamped below 1.0 and no further levels
/// are gained. Negative gains are a caller contract violation and are
/// clamped to zero rather than corrupting the fraction.
pub fn calculate_exp_and_level(level: u32, exp: f64, gain: f64) -> (u32, f64) {
    let gain = if gain < 0.0 {
        log::warn!("negative experience gain {} ignored", gain);
        0.0
    } else {
        gain
    };

    let mut level = level.clamp(1, MAX_LEVEL);
    let mut exp = exp + gain;

    while exp >= 1.0 && level < MAX_LEVEL {
        exp -= 1.0;
        level += 1;
    }

    if level >= MAX_LEVEL && exp >= 1.0 {
        // Cap reached; any remaining fraction is clamped just under the bar
        exp = 1.0 - f64::EPSILON;
    }

    (level, exp)
}

/// Applies a death penalty to the experience fraction.
///
/// The actual penalty is capped at the current fraction so experience
/// never goes negative. Returns `(actual_penalty, new_exp)`.
pub fn calculate_death_penalty(exp: f64, penalty_rate: f64) -> (f64, f64) {
    let actual = penalty_rate.min(exp).max(0.0);
    (actual, exp - actual)
}

/// Maximum proficiency points attainable at a character level.
///
/// Linear from [`MIN_PT`] at level 1 to [`MAX_PT`] at [`MAX_LEVEL`],
/// floored to an integer; out-of-range levels clamp to the endpoints.
pub fn max_pt_for_level(level: u32) -> u32 {
    if level <= 1 {
        return MIN_PT;
    }
    if level >= MAX_LEVEL {
        return MAX_PT;
    }
    let span = (MAX_PT - MIN_PT) as f64;
    let steps = (MAX_LEVEL - 1) as f64;
    MIN_PT + ((level - 1) as f64 * span / steps) as u32
}

/// Fractional proficiency gain for one matching combat action.
///
/// The base gain shrinks as points accumulate (each point takes more
/// repetitions than the last) and scales with the monster/character level
/// delta: over-leveled targets grant a bonus, under-leveled targets
/// diminish. Always positive and independent of player HP.
pub fn calculate_pt_exp_gain(current_pt: u32, char_level: u32, monster_level: u32) -> f64 {
    let base = PT_EXP_BASE / (1.0 + current_pt as f64 * 0.05);
    let delta = monster_level as f64 - char_level as f64;
    let scale = (1.0 + delta * 0.1).clamp(0.25, 2.0);
    base * scale
}

/// Adds fractional proficiency progress and resolves point gains, capped
/// at `max_pt`. Gain beyond the cap is discarded, not banked.
pub fn calculate_pt_and_exp(pt: u32, pt_exp: f64, gain: f64, max_pt: u32) -> (u32, f64) {
    if pt >= max_pt {
        return (pt.min(max_pt), 0.0);
    }

    let mut pt = pt;
    let mut exp = pt_exp + gain.max(0.0);

    while exp >= 1.0 && pt < max_pt {
        exp -= 1.0;
        pt += 1;
    }

    if pt >= max_pt {
        exp = 0.0;
    }

    (pt, exp)
}

/// Derives the display-only combat power score.
///
/// A weighted sum over offensive stats, defensive stats, and total
/// proficiency points. Monotone in every input.
pub fn calculate_cp(status: &StatusInfo, ability: &AbilityInfo) -> u64 {
    let offense = status.gen_attack as u64 * 4 + status.force_attack as u64 * 3;
    let defense = status.avg_def_pwr as u64 * 3
        + status.avg_def_rate as u64 * 2
        + status.avg_def_range as u64;
    let tempo = status.attack_speed as u64 * 2
        + status.accuracy as u64 * 2
        + status.dodge as u64 * 2;
    let vitality = (status.max_hp as u64) / 10;
    let mastery = ability.total_points() as u64 * 5;

    offense + defense + tempo + vitality + mastery
}

/// Early-game experience boost applied to victory rewards only.
pub fn experience_multiplier(level: u32) -> f64 {
    match level {
        0..=10 => 4.0,
        11..=20 => 3.0,
        21..=30 => 2.0,
        31..=40 => 1.5,
        _ => 1.0,
    }
}
