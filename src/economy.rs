//! Coin rewards for finished runs

use crate::config::EconomyConfig;

/// Coins earned by a run that ended with `score`.
///
/// `floor(base + score * per_score + reached milestone bonuses)`, never
/// negative.
pub fn coins_for_score(score: u32, economy: &EconomyConfig) -> u64 {
    let milestones: f64 = economy
        .milestones
        .iter()
        .filter(|m| m.score <= score)
        .map(|m| m.bonus as f64)
        .sum();
    let total = economy.base_coins as f64
        + score as f64 * economy.coins_per_score as f64
        + milestones;
    if total.is_finite() && total > 0.0 {
        total.floor() as u64
    } else {
        0
    }
}
