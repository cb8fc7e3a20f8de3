//! Achievement catalog and per-tick unlock evaluation.
//!
//! Each achievement is a plain data record: an unlock condition evaluated
//! against the economy state, plus a reward. Three rewards add click power
//! once at unlock time; the rest are read back by the formula functions as
//! multipliers or prestige bonuses while the achievement stays unlocked.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::formula;
use super::state::EconomyState;

/// Fixed set of achievement ids, in definition order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstClick,
    HundredClicks,
    ThousandClicks,
    FirstBusiness,
    TenBusinesses,
    Millionaire,
    Billionaire,
    FirstPrestige,
    SpeedDemon,
    BigSpender,
}

impl AchievementId {
    pub fn key(self) -> &'static str {
        match self {
            AchievementId::FirstClick => "first_click",
            AchievementId::HundredClicks => "hundred_clicks",
            AchievementId::ThousandClicks => "thousand_clicks",
            AchievementId::FirstBusiness => "first_business",
            AchievementId::TenBusinesses => "ten_businesses",
            AchievementId::Millionaire => "millionaire",
            AchievementId::Billionaire => "billionaire",
            AchievementId::FirstPrestige => "first_prestige",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::BigSpender => "big_spender",
        }
    }

    pub fn from_key(key: &str) -> Option<AchievementId> {
        CATALOG.iter().map(|def| def.id).find(|id| id.key() == key)
    }
}

/// Multiplier groups that achievements can feed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MultiplierCategory {
    /// Manual click value. No achievement currently feeds this group.
    Click,
    /// Generator revenue.
    Business,
    /// All passive income.
    Passive,
}

/// What has to be true for an achievement to unlock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementCondition {
    TotalClicks(u64),
    GeneratorsOwned(u32),
    TotalEarned(f64),
    PrestigeCount(u32),
    MoneyPerSecond(f64),
    TotalSpent(f64),
}

impl AchievementCondition {
    /// `money_per_second` is passed in so a whole evaluation pass sees one value.
    pub fn is_met(&self, state: &EconomyState, money_per_second: f64) -> bool {
        match *self {
            AchievementCondition::TotalClicks(n) => state.total_clicks >= n,
            AchievementCondition::GeneratorsOwned(n) => state.total_generators_owned() >= n,
            AchievementCondition::TotalEarned(amount) => state.total_earned >= amount,
            AchievementCondition::PrestigeCount(n) => state.total_prestige_count >= n,
            AchievementCondition::MoneyPerSecond(rate) => money_per_second >= rate,
            AchievementCondition::TotalSpent(amount) => state.total_spent() >= amount,
        }
    }
}

/// Permanent bonus granted by an achievement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AchievementReward {
    /// Added to click power once, when the achievement unlocks.
    ClickPower(f64),
    /// Factor applied to a multiplier group while unlocked.
    Multiplier(MultiplierCategory, f64),
    /// Added to the prestige multiplier on each later prestige.
    PrestigeBonus(f64),
    /// Applied to the prestige multiplier on each later prestige.
    PrestigeFactor(f64),
    /// Factor applied to click and crit upgrade prices.
    UpgradeDiscount(f64),
}

/// Immutable achievement definition.
#[derive(Debug, PartialEq)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub reward_text: &'static str,
    pub condition: AchievementCondition,
    pub reward: AchievementReward,
}

/// Every achievement, in the order they are evaluated.
pub static CATALOG: [AchievementDef; 10] = [
    AchievementDef {
        id: AchievementId::FirstClick,
        name: "First Click",
        description: "Click the money button for the first time",
        reward_text: "Click power +1",
        condition: AchievementCondition::TotalClicks(1),
        reward: AchievementReward::ClickPower(1.0),
    },
    AchievementDef {
        id: AchievementId::HundredClicks,
        name: "Century Clicker",
        description: "Click 100 times",
        reward_text: "Click power +5",
        condition: AchievementCondition::TotalClicks(100),
        reward: AchievementReward::ClickPower(5.0),
    },
    AchievementDef {
        id: AchievementId::ThousandClicks,
        name: "Click Master",
        description: "Click 1,000 times",
        reward_text: "Click power +25",
        condition: AchievementCondition::TotalClicks(1_000),
        reward: AchievementReward::ClickPower(25.0),
    },
    AchievementDef {
        id: AchievementId::FirstBusiness,
        name: "Entrepreneur",
        description: "Buy your first business",
        reward_text: "All business revenue +10%",
        condition: AchievementCondition::GeneratorsOwned(1),
        reward: AchievementReward::Multiplier(MultiplierCategory::Business, 1.1),
    },
    AchievementDef {
        id: AchievementId::TenBusinesses,
        name: "Business Empire",
        description: "Own 10 businesses total",
        reward_text: "All business revenue +25%",
        condition: AchievementCondition::GeneratorsOwned(10),
        reward: AchievementReward::Multiplier(MultiplierCategory::Business, 1.25),
    },
    AchievementDef {
        id: AchievementId::Millionaire,
        name: "Millionaire",
        description: "Earn $1,000,000",
        reward_text: "Prestige bonus +0.1x",
        condition: AchievementCondition::TotalEarned(1e6),
        reward: AchievementReward::PrestigeBonus(0.1),
    },
    AchievementDef {
        id: AchievementId::Billionaire,
        name: "Billionaire",
        description: "Earn $1,000,000,000",
        reward_text: "All income +50%",
        condition: AchievementCondition::TotalEarned(1e9),
        reward: AchievementReward::Multiplier(MultiplierCategory::Passive, 1.5),
    },
    AchievementDef {
        id: AchievementId::FirstPrestige,
        name: "Ascending",
        description: "Prestige for the first time",
        reward_text: "Prestige efficiency +10%",
        condition: AchievementCondition::PrestigeCount(1),
        reward: AchievementReward::PrestigeFactor(1.1),
    },
    AchievementDef {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Earn $1000/second",
        reward_text: "All passive income +20%",
        condition: AchievementCondition::MoneyPerSecond(1_000.0),
        reward: AchievementReward::Multiplier(MultiplierCategory::Passive, 1.2),
    },
    AchievementDef {
        id: AchievementId::BigSpender,
        name: "Big Spender",
        description: "Spend $10,000,000 total",
        reward_text: "All upgrades 5% cheaper",
        condition: AchievementCondition::TotalSpent(1e7),
        reward: AchievementReward::UpgradeDiscount(0.95),
    },
];

/// An achievement and whether it has been earned.
#[derive(Clone, Debug, PartialEq)]
pub struct Achievement {
    pub def: &'static AchievementDef,
    pub unlocked: bool,
}

/// Unlock flags for the whole catalog. Flags only ever go from false to
/// true, except on a hard reset which rebuilds the book.
#[derive(Clone, Debug, PartialEq)]
pub struct Achievements {
    entries: Vec<Achievement>,
}

impl Achievements {
    pub fn new() -> Self {
        Self {
            entries: CATALOG
                .iter()
                .map(|def| Achievement {
                    def,
                    unlocked: false,
                })
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.entries.iter()
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.entries.iter().any(|a| a.def.id == id && a.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|a| a.unlocked).count()
    }

    /// Rewards of every unlocked achievement.
    pub fn active_rewards(&self) -> impl Iterator<Item = &AchievementReward> {
        self.entries
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| &a.def.reward)
    }

    /// Mark an achievement unlocked without applying its reward. Used when
    /// restoring save data, where the reward is already baked into the state.
    pub(crate) fn restore(&mut self, id: AchievementId) {
        if let Some(entry) = self.entries.iter_mut().find(|a| a.def.id == id) {
            entry.unlocked = true;
        }
    }
}

impl Default for Achievements {
    fn default() -> Self {
        Self::new()
    }
}

/// Unlock every achievement whose condition now holds and apply its one-shot
/// reward. Returns the ids unlocked by this pass, in definition order.
pub fn evaluate(state: &mut EconomyState, achievements: &mut Achievements) -> Vec<AchievementId> {
    let money_per_second = formula::money_per_second(state, achievements);
    let mut newly_unlocked = Vec::new();

    for entry in &mut achievements.entries {
        if entry.unlocked || !entry.def.condition.is_met(state, money_per_second) {
            continue;
        }
        entry.unlocked = true;
        if let AchievementReward::ClickPower(amount) = entry.def.reward {
            state.click_power += amount;
        }
        info!(
            achievement = entry.def.id.key(),
            reward = entry.def.reward_text,
            "achievement unlocked: {}",
            entry.def.name
        );
        newly_unlocked.push(entry.def.id);
    }

    newly_unlocked
}
