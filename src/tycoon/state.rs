/// Money Tycoon economy state definitions.

use serde::{Deserialize, Serialize};

/// Growth factor applied to a generator's cost per unit owned.
pub const GENERATOR_COST_GROWTH: f64 = 1.15;

/// Kinds of generators (passive income businesses).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorId {
    Lemonade,
    Pizza,
    Arcade,
    Oil,
    Bank,
    Space,
}

impl GeneratorId {
    /// All generator kinds in display order.
    pub fn all() -> &'static [GeneratorId] {
        &[
            GeneratorId::Lemonade,
            GeneratorId::Pizza,
            GeneratorId::Arcade,
            GeneratorId::Oil,
            GeneratorId::Bank,
            GeneratorId::Space,
        ]
    }

    /// Position in `all()`, also the index into `EconomyState::generators`.
    pub fn index(self) -> usize {
        match self {
            GeneratorId::Lemonade => 0,
            GeneratorId::Pizza => 1,
            GeneratorId::Arcade => 2,
            GeneratorId::Oil => 3,
            GeneratorId::Bank => 4,
            GeneratorId::Space => 5,
        }
    }

    /// Stable identifier used in save data and commands.
    pub fn key(self) -> &'static str {
        match self {
            GeneratorId::Lemonade => "lemonade",
            GeneratorId::Pizza => "pizza",
            GeneratorId::Arcade => "arcade",
            GeneratorId::Oil => "oil",
            GeneratorId::Bank => "bank",
            GeneratorId::Space => "space",
        }
    }

    pub fn from_key(key: &str) -> Option<GeneratorId> {
        GeneratorId::all().iter().copied().find(|id| id.key() == key)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            GeneratorId::Lemonade => "Lemonade Stand",
            GeneratorId::Pizza => "Pizza Shop",
            GeneratorId::Arcade => "Arcade",
            GeneratorId::Oil => "Oil Company",
            GeneratorId::Bank => "Investment Bank",
            GeneratorId::Space => "Space Program",
        }
    }

    /// Cost of the first unit.
    pub fn base_cost(self) -> f64 {
        match self {
            GeneratorId::Lemonade => 100.0,
            GeneratorId::Pizza => 1_100.0,
            GeneratorId::Arcade => 12_000.0,
            GeneratorId::Oil => 130_000.0,
            GeneratorId::Bank => 1_400_000.0,
            GeneratorId::Space => 20_000_000.0,
        }
    }

    /// Money per second produced by one unit, before multipliers.
    pub fn base_revenue(self) -> f64 {
        match self {
            GeneratorId::Lemonade => 1.0,
            GeneratorId::Pizza => 8.0,
            GeneratorId::Arcade => 47.0,
            GeneratorId::Oil => 260.0,
            GeneratorId::Bank => 1_400.0,
            GeneratorId::Space => 7_800.0,
        }
    }
}

/// Cost of the next unit when `owned` units are held.
pub fn generator_cost_for(id: GeneratorId, owned: u32) -> f64 {
    (id.base_cost() * GENERATOR_COST_GROWTH.powf(owned as f64)).floor()
}

/// Owned units of one generator kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub id: GeneratorId,
    pub owned: u32,
    /// Price of the next unit. Always `generator_cost_for(id, owned)`.
    pub current_cost: f64,
}

impl Generator {
    pub fn new(id: GeneratorId) -> Self {
        Self {
            id,
            owned: 0,
            current_cost: id.base_cost(),
        }
    }

    pub fn base_revenue(&self) -> f64 {
        self.id.base_revenue()
    }

    pub fn base_cost(&self) -> f64 {
        self.id.base_cost()
    }

    /// Revenue before any multiplier.
    pub fn raw_revenue(&self) -> f64 {
        self.owned as f64 * self.base_revenue()
    }

    /// Set the owned count and re-derive the next-unit cost.
    pub fn set_owned(&mut self, owned: u32) {
        self.owned = owned;
        self.current_cost = generator_cost_for(self.id, owned);
    }
}

/// Full economy state of one Money Tycoon session.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Spendable balance.
    pub currency: f64,
    /// All-time earnings. Spending never decrements this.
    pub total_earned: f64,
    /// Manual clicks in the current prestige run.
    pub total_clicks: u64,
    /// Seconds since the session started. Derived from the clock, not accumulated.
    pub time_elapsed_seconds: u64,

    pub click_power: f64,
    pub click_upgrade_level: u32,
    /// Chance of a critical click, in percent (0..=50).
    pub crit_chance_percent: f64,
    pub crit_upgrade_level: u32,

    // Prestige data (survives prestige)
    pub prestige_points: u64,
    pub prestige_multiplier: f64,
    pub total_prestige_count: u32,

    /// One entry per `GeneratorId::all()`, in that order.
    pub generators: Vec<Generator>,

    // Statistics
    pub biggest_single_click: f64,
    pub total_money_from_clicks: f64,
    pub total_money_from_businesses: f64,

    // Presentation settings, persisted but unused by the engine.
    pub selected_theme: String,
    pub auto_save_enabled: bool,
}

impl EconomyState {
    /// Canonical initial state, used on first run and on hard reset.
    pub fn new() -> Self {
        let generators = GeneratorId::all()
            .iter()
            .map(|&id| Generator::new(id))
            .collect();

        Self {
            currency: 0.0,
            total_earned: 0.0,
            total_clicks: 0,
            time_elapsed_seconds: 0,
            click_power: 1.0,
            click_upgrade_level: 0,
            crit_chance_percent: 0.0,
            crit_upgrade_level: 0,
            prestige_points: 0,
            prestige_multiplier: 1.0,
            total_prestige_count: 0,
            generators,
            biggest_single_click: 0.0,
            total_money_from_clicks: 0.0,
            total_money_from_businesses: 0.0,
            selected_theme: "default".into(),
            auto_save_enabled: true,
        }
    }

    pub fn generator(&self, id: GeneratorId) -> &Generator {
        &self.generators[id.index()]
    }

    pub fn generator_mut(&mut self, id: GeneratorId) -> &mut Generator {
        &mut self.generators[id.index()]
    }

    /// Units owned across every generator kind.
    pub fn total_generators_owned(&self) -> u32 {
        self.generators
            .iter()
            .fold(0u32, |total, g| total.saturating_add(g.owned))
    }

    /// Money spent so far (earned but no longer held).
    pub fn total_spent(&self) -> f64 {
        self.total_earned - self.currency
    }

    /// Credit earnings to both the balance and the all-time total.
    pub fn earn(&mut self, amount: f64) {
        self.currency += amount;
        self.total_earned += amount;
    }
}

impl Default for EconomyState {
    fn default() -> Self {
        Self::new()
    }
}
