//! Money Tycoon economy formulas and purchases as pure functions.
//!
//! Queries never mutate. Purchases either apply completely (debit plus level
//! or unit change) or, when the balance is short, leave the state untouched
//! and return `false`.

use tracing::debug;

use super::achievements::{AchievementReward, Achievements, MultiplierCategory};
use super::state::{EconomyState, GeneratorId};

/// A manual click is worth this many times its base value on a crit.
pub const CRIT_MULTIPLIER: f64 = 10.0;
/// Crit chance gained per crit upgrade level, in percent.
pub const CRIT_CHANCE_PER_LEVEL: f64 = 5.0;
/// Crit chance ceiling, in percent.
pub const MAX_CRIT_CHANCE: f64 = 50.0;

const CLICK_UPGRADE_BASE_COST: f64 = 25.0;
const CLICK_UPGRADE_GROWTH: f64 = 1.8;
const CRIT_UPGRADE_BASE_COST: f64 = 500.0;
const CRIT_UPGRADE_GROWTH: f64 = 2.2;

/// Result of one manual click.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickOutcome {
    pub value: f64,
    pub is_critical: bool,
}

/// Product of the factors of every unlocked achievement in `category`.
/// Nothing feeds `Click` today, so it is always 1.
pub fn achievement_multiplier(achievements: &Achievements, category: MultiplierCategory) -> f64 {
    achievements
        .active_rewards()
        .filter_map(|reward| match *reward {
            AchievementReward::Multiplier(c, factor) if c == category => Some(factor),
            _ => None,
        })
        .product()
}

/// Price factor for click and crit upgrades.
pub fn upgrade_discount(achievements: &Achievements) -> f64 {
    achievements
        .active_rewards()
        .filter_map(|reward| match *reward {
            AchievementReward::UpgradeDiscount(factor) => Some(factor),
            _ => None,
        })
        .product()
}

/// Value of a manual click before any crit.
pub fn click_value(state: &EconomyState, achievements: &Achievements) -> f64 {
    state.click_power
        * state.prestige_multiplier
        * achievement_multiplier(achievements, MultiplierCategory::Click)
}

/// Passive income per second across all generators.
pub fn money_per_second(state: &EconomyState, achievements: &Achievements) -> f64 {
    let raw: f64 = state.generators.iter().map(|g| g.raw_revenue()).sum();
    raw * achievement_multiplier(achievements, MultiplierCategory::Business)
        * achievement_multiplier(achievements, MultiplierCategory::Passive)
        * state.prestige_multiplier
}

pub fn click_upgrade_cost(state: &EconomyState, achievements: &Achievements) -> f64 {
    (CLICK_UPGRADE_BASE_COST
        * CLICK_UPGRADE_GROWTH.powf(state.click_upgrade_level as f64)
        * upgrade_discount(achievements))
    .floor()
}

/// Levels past 10 cost money but the crit chance stays capped.
pub fn crit_upgrade_cost(state: &EconomyState, achievements: &Achievements) -> f64 {
    (CRIT_UPGRADE_BASE_COST
        * CRIT_UPGRADE_GROWTH.powf(state.crit_upgrade_level as f64)
        * upgrade_discount(achievements))
    .floor()
}

pub fn generator_cost(state: &EconomyState, id: GeneratorId) -> f64 {
    state.generator(id).current_cost
}

/// Try to buy a click upgrade. Returns true if successful.
pub fn buy_click_upgrade(state: &mut EconomyState, achievements: &Achievements) -> bool {
    let cost = click_upgrade_cost(state, achievements);
    if state.currency < cost {
        return false;
    }
    state.currency -= cost;
    state.click_upgrade_level = state.click_upgrade_level.saturating_add(1);
    state.click_power += (state.click_upgrade_level as f64 * 1.5).floor() + 1.0;
    debug!(
        level = state.click_upgrade_level,
        cost,
        click_power = state.click_power,
        "bought click upgrade"
    );
    true
}

/// Try to buy a crit upgrade. Returns true if successful.
pub fn buy_crit_upgrade(state: &mut EconomyState, achievements: &Achievements) -> bool {
    let cost = crit_upgrade_cost(state, achievements);
    if state.currency < cost {
        return false;
    }
    state.currency -= cost;
    state.crit_upgrade_level = state.crit_upgrade_level.saturating_add(1);
    state.crit_chance_percent =
        (state.crit_upgrade_level as f64 * CRIT_CHANCE_PER_LEVEL).min(MAX_CRIT_CHANCE);
    debug!(
        level = state.crit_upgrade_level,
        cost,
        crit_chance = state.crit_chance_percent,
        "bought crit upgrade"
    );
    true
}

/// Try to buy one unit of a generator. Returns true if successful.
pub fn buy_generator(state: &mut EconomyState, id: GeneratorId) -> bool {
    let cost = generator_cost(state, id);
    if state.currency < cost {
        return false;
    }
    state.currency -= cost;
    let generator = state.generator_mut(id);
    let owned = generator.owned.saturating_add(1);
    generator.set_owned(owned);
    debug!(generator = id.key(), owned, cost, "bought generator");
    true
}

/// Manual click. `is_critical` comes from the caller's random draw.
pub fn apply_click(
    state: &mut EconomyState,
    achievements: &Achievements,
    is_critical: bool,
) -> ClickOutcome {
    let mut value = click_value(state, achievements);
    if is_critical {
        value *= CRIT_MULTIPLIER;
    }
    if value > state.biggest_single_click {
        state.biggest_single_click = value;
    }
    state.earn(value);
    state.total_clicks = state.total_clicks.saturating_add(1);
    state.total_money_from_clicks += value;
    ClickOutcome { value, is_critical }
}

/// Credit `seconds` worth of passive income. Returns the amount credited.
pub fn accrue_passive(state: &mut EconomyState, achievements: &Achievements, seconds: f64) -> f64 {
    let income = money_per_second(state, achievements) * seconds;
    if income > 0.0 {
        state.earn(income);
        state.total_money_from_businesses += income;
    }
    income
}
