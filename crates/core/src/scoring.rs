//! Scoring module - clear classification, attack and gravity curves
//!
//! Rules:
//! - T-spins use their own table instead of the line-clear table.
//! - Back-to-back applies a 3/2 multiplier (floored) to the base points and
//!   one extra attack line.
//! - The perfect clear bonus is added after the back-to-back multiplier.
//! - Combo bonus `50 * combo` is added before the level multiplier.

use crate::types::{
    B2B_DENOMINATOR, B2B_NUMERATOR, BASE_FALL_MS, COMBO_BASE, FALL_STEP_MS, LINES_PER_LEVEL,
    LINE_ATTACK, LINE_SCORES, MIN_FALL_MS, PERFECT_CLEAR_ATTACK, PERFECT_CLEAR_BONUS,
    TIME_LEVEL_MS, TSPIN_ATTACK, TSPIN_SCORES,
};

/// Score and attack for one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Base points after the B2B multiplier and perfect clear bonus.
    pub base: u32,
    pub combo_bonus: u32,
    pub attack: u32,
    pub qualifies_for_b2b: bool,
    /// Whether a B2B multiplier was applied to this clear.
    pub b2b_applied: bool,
    pub perfect_clear: bool,
}

impl ScoreResult {
    /// Points awarded at `level`.
    pub fn points(&self, level: u32) -> u64 {
        (self.base as u64 + self.combo_bonus as u64) * level as u64
    }
}

/// Base points from the line or T-spin table; out-of-table counts score 0.
pub fn base_points(lines: usize, t_spin: bool) -> u32 {
    let table: &[u32] = if t_spin { &TSPIN_SCORES } else { &LINE_SCORES };
    table.get(lines).copied().unwrap_or(0)
}

pub fn base_attack(lines: usize, t_spin: bool) -> u32 {
    let table: &[u32] = if t_spin { &TSPIN_ATTACK } else { &LINE_ATTACK };
    table.get(lines).copied().unwrap_or(0)
}

/// B2B applies to T-spins that clear lines and to 4-line clears.
pub fn qualifies_for_b2b(lines: usize, t_spin: bool) -> bool {
    (t_spin && lines > 0) || lines == 4
}

/// Apply the B2B multiplier (3/2) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points
        .saturating_mul(B2B_NUMERATOR)
        .saturating_div(B2B_DENOMINATOR)
}

/// `combo` is the counter after this lock: -1 none, 0 first clear.
pub fn calculate_combo_bonus(combo: i32) -> u32 {
    COMBO_BASE * combo.max(0) as u32
}

/// Extra attack from a running combo.
pub fn combo_attack(combo: i32) -> u32 {
    (combo - 1).max(0) as u32
}

/// Classify one lock.
///
/// `combo` must already reflect this lock and `previous_b2b` is the flag
/// before it. `board_empty` is checked after rows are removed.
pub fn calculate_score(
    lines: usize,
    t_spin: bool,
    combo: i32,
    previous_b2b: bool,
    board_empty: bool,
) -> ScoreResult {
    let qualifies = qualifies_for_b2b(lines, t_spin);
    let b2b_applied = qualifies && previous_b2b;

    let mut base = base_points(lines, t_spin);
    let mut attack = base_attack(lines, t_spin);
    if b2b_applied {
        base = apply_b2b_multiplier(base);
        attack += 1;
    }

    attack += combo_attack(combo);

    let perfect_clear = lines > 0 && board_empty;
    if perfect_clear {
        base += PERFECT_CLEAR_BONUS;
        attack += PERFECT_CLEAR_ATTACK;
    }

    ScoreResult {
        base,
        combo_bonus: calculate_combo_bonus(combo),
        attack,
        qualifies_for_b2b: qualifies,
        b2b_applied,
        perfect_clear,
    }
}

/// Level used for scoring: `1 + lines / 10`.
pub fn score_level(total_lines: u32) -> u32 {
    1 + total_lines / LINES_PER_LEVEL
}

/// Score level plus one level per full minute when the time bonus is on.
pub fn display_level(total_lines: u32, elapsed_ms: u64, time_bonus: bool) -> u32 {
    let bonus = if time_bonus {
        (elapsed_ms / TIME_LEVEL_MS).min(u32::MAX as u64) as u32
    } else {
        0
    };
    score_level(total_lines).saturating_add(bonus)
}

/// Normal fall interval: `max(80, 700 - (level - 1) * 45)`.
pub fn fall_interval_ms(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(FALL_STEP_MS);
    BASE_FALL_MS.saturating_sub(reduction).max(MIN_FALL_MS)
}

/// Divide an interval by a speed multiplier, never going below 1ms.
pub fn scale_interval_ms(interval: u32, multiplier: f64) -> u32 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return interval.max(1);
    }
    ((interval as f64 / multiplier).floor() as u32).max(1)
}
