//! Prestige: trade the current balance for permanent multiplier points.

use tracing::info;

use super::achievements::{AchievementReward, Achievements};
use super::state::EconomyState;

/// Balance needed to prestige, and the balance worth one prestige point.
pub const PRESTIGE_THRESHOLD: f64 = 1_000_000.0;
/// Multiplier gained per accumulated prestige point.
pub const MULTIPLIER_PER_POINT: f64 = 0.1;

/// Summary of a completed prestige.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrestigeResult {
    pub points_awarded: u64,
    pub prestige_points: u64,
    pub prestige_multiplier: f64,
    pub total_prestige_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrestigeOutcome {
    Prestiged(PrestigeResult),
    /// Not enough money. Nothing changed.
    Rejected { currency: f64, required: f64 },
}

impl PrestigeOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, PrestigeOutcome::Rejected { .. })
    }
}

pub fn can_prestige(state: &EconomyState) -> bool {
    state.currency >= PRESTIGE_THRESHOLD
}

/// Points a prestige would award right now.
pub fn pending_points(state: &EconomyState) -> u64 {
    if !can_prestige(state) {
        return 0;
    }
    (state.currency / PRESTIGE_THRESHOLD).floor() as u64
}

/// Multiplier for a given point total. Achievement bonuses only count if
/// the achievement was already unlocked when this is called, so the
/// `first_prestige` factor first applies on the second prestige.
pub fn multiplier_for(prestige_points: u64, achievements: &Achievements) -> f64 {
    let mut multiplier = 1.0 + prestige_points as f64 * MULTIPLIER_PER_POINT;
    for reward in achievements.active_rewards() {
        if let AchievementReward::PrestigeBonus(bonus) = *reward {
            multiplier += bonus;
        }
    }
    for reward in achievements.active_rewards() {
        if let AchievementReward::PrestigeFactor(factor) = *reward {
            multiplier *= factor;
        }
    }
    multiplier
}

/// Perform a prestige if eligible.
pub fn prestige(state: &mut EconomyState, achievements: &Achievements) -> PrestigeOutcome {
    if !can_prestige(state) {
        return PrestigeOutcome::Rejected {
            currency: state.currency,
            required: PRESTIGE_THRESHOLD,
        };
    }

    let points_awarded = pending_points(state);
    state.prestige_points = state.prestige_points.saturating_add(points_awarded);
    state.total_prestige_count = state.total_prestige_count.saturating_add(1);
    state.prestige_multiplier = multiplier_for(state.prestige_points, achievements);

    reset_for_prestige(state);

    info!(
        points_awarded,
        prestige_points = state.prestige_points,
        multiplier = state.prestige_multiplier,
        "prestiged"
    );

    PrestigeOutcome::Prestiged(PrestigeResult {
        points_awarded,
        prestige_points: state.prestige_points,
        prestige_multiplier: state.prestige_multiplier,
        total_prestige_count: state.total_prestige_count,
    })
}

/// Reset run progress. Lifetime totals, prestige data, statistics and
/// settings are kept.
pub fn reset_for_prestige(state: &mut EconomyState) {
    state.currency = 0.0;
    state.total_clicks = 0;
    state.click_power = 1.0;
    state.click_upgrade_level = 0;
    state.crit_chance_percent = 0.0;
    state.crit_upgrade_level = 0;
    for generator in &mut state.generators {
        generator.set_owned(0);
    }
}
