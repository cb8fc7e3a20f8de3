//! Money Tycoon: an incremental money clicker.
//!
//! `Engine` owns the economy state and achievement flags. Presenters read
//! them through accessors and change them only through the methods below.

pub mod achievements;
pub mod formula;
pub mod prestige;
pub mod save;
pub mod state;

#[cfg(test)]
mod simulator;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, SaveError};
use crate::rng::SimpleRng;
use crate::store::SaveStore;
use crate::time::Clock;

use achievements::{AchievementId, Achievements, MultiplierCategory};
use formula::ClickOutcome;
use prestige::PrestigeOutcome;
use state::{EconomyState, GeneratorId};

pub struct Engine {
    state: EconomyState,
    achievements: Achievements,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    store: Box<dyn SaveStore>,
    rng: SimpleRng,
    session_start_ms: f64,
    ticks_since_save: u32,
}

impl Engine {
    /// Fresh game. Call `load(None)` afterwards to pick up a stored save.
    pub fn new(config: EngineConfig, clock: Box<dyn Clock>, store: Box<dyn SaveStore>) -> Self {
        Self::from_state(
            EconomyState::new(),
            Achievements::new(),
            config,
            clock,
            store,
        )
    }

    /// Engine resuming from an existing state and achievement book.
    pub fn from_state(
        state: EconomyState,
        achievements: Achievements,
        config: EngineConfig,
        clock: Box<dyn Clock>,
        store: Box<dyn SaveStore>,
    ) -> Self {
        let now = clock.now_ms();
        let seed = config.rng_seed.unwrap_or(now.to_bits());
        Self {
            state,
            achievements,
            rng: SimpleRng::new(seed),
            config,
            clock,
            store,
            session_start_ms: now,
            ticks_since_save: 0,
        }
    }

    // ── Read access ─────────────────────────────────────────────

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn money_per_second(&self) -> f64 {
        formula::money_per_second(&self.state, &self.achievements)
    }

    pub fn click_value(&self) -> f64 {
        formula::click_value(&self.state, &self.achievements)
    }

    pub fn click_upgrade_cost(&self) -> f64 {
        formula::click_upgrade_cost(&self.state, &self.achievements)
    }

    pub fn crit_upgrade_cost(&self) -> f64 {
        formula::crit_upgrade_cost(&self.state, &self.achievements)
    }

    pub fn generator_cost(&self, id: GeneratorId) -> f64 {
        formula::generator_cost(&self.state, id)
    }

    pub fn achievement_multiplier(&self, category: MultiplierCategory) -> f64 {
        formula::achievement_multiplier(&self.achievements, category)
    }

    pub fn can_afford_click_upgrade(&self) -> bool {
        self.state.currency >= self.click_upgrade_cost()
    }

    pub fn can_afford_crit_upgrade(&self) -> bool {
        self.state.currency >= self.crit_upgrade_cost()
    }

    pub fn can_afford_generator(&self, id: GeneratorId) -> bool {
        self.state.currency >= self.generator_cost(id)
    }

    pub fn can_prestige(&self) -> bool {
        prestige::can_prestige(&self.state)
    }

    pub fn pending_prestige_points(&self) -> u64 {
        prestige::pending_points(&self.state)
    }

    // ── Time ────────────────────────────────────────────────────

    /// One fixed tick: refresh elapsed time, accrue passive income, check
    /// achievements and autosave when due.
    pub fn tick(&mut self) {
        let elapsed_ms = (self.clock.now_ms() - self.session_start_ms).max(0.0);
        self.state.time_elapsed_seconds = (elapsed_ms / 1000.0).floor() as u64;

        let seconds = self.config.seconds_per_tick();
        formula::accrue_passive(&mut self.state, &self.achievements, seconds);
        self.check_achievements();

        self.ticks_since_save = self.ticks_since_save.saturating_add(1);
        if self.state.auto_save_enabled
            && self.config.autosave_interval_ticks > 0
            && self.ticks_since_save >= self.config.autosave_interval_ticks
        {
            match self.save() {
                Ok(_) => debug!("autosaved"),
                Err(e) => {
                    // Retry on the next interval, not every tick.
                    self.ticks_since_save = 0;
                    warn!(error = %e, "autosave failed");
                }
            }
        }
    }

    /// Run `delta_ticks` ticks back to back.
    pub fn advance(&mut self, delta_ticks: u32) {
        for _ in 0..delta_ticks {
            self.tick();
        }
    }

    /// Unlock any achievements whose conditions now hold.
    pub fn check_achievements(&mut self) -> Vec<AchievementId> {
        achievements::evaluate(&mut self.state, &mut self.achievements)
    }

    // ── Player actions ──────────────────────────────────────────

    pub fn perform_click(&mut self) -> ClickOutcome {
        let is_critical = self.rng.roll_percent(self.state.crit_chance_percent);
        let outcome = formula::apply_click(&mut self.state, &self.achievements, is_critical);
        self.check_achievements();
        outcome
    }

    /// No-op returning false when unaffordable.
    pub fn buy_click_upgrade(&mut self) -> bool {
        let bought = formula::buy_click_upgrade(&mut self.state, &self.achievements);
        if bought {
            self.check_achievements();
        }
        bought
    }

    /// No-op returning false when unaffordable.
    pub fn buy_crit_upgrade(&mut self) -> bool {
        let bought = formula::buy_crit_upgrade(&mut self.state, &self.achievements);
        if bought {
            self.check_achievements();
        }
        bought
    }

    /// No-op returning false when unaffordable.
    pub fn buy_generator(&mut self, id: GeneratorId) -> bool {
        let bought = formula::buy_generator(&mut self.state, id);
        if bought {
            self.check_achievements();
        }
        bought
    }

    pub fn prestige(&mut self) -> PrestigeOutcome {
        let outcome = prestige::prestige(&mut self.state, &self.achievements);
        if !outcome.is_rejected() {
            self.check_achievements();
        }
        outcome
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.state.selected_theme = theme.into();
    }

    pub fn set_auto_save(&mut self, enabled: bool) {
        self.state.auto_save_enabled = enabled;
    }

    // ── Persistence ─────────────────────────────────────────────

    /// Encode the game without touching the save slot.
    pub fn export_blob(&self) -> Result<String> {
        save::encode(&self.state, &self.achievements)
    }

    /// Write the game to the save slot and return the blob written.
    pub fn save(&mut self) -> Result<String> {
        let blob = self.export_blob()?;
        self.store.write(&blob)?;
        self.ticks_since_save = 0;
        Ok(blob)
    }

    /// Load `blob`, or the save slot when `blob` is `None`.
    ///
    /// Returns `Ok(false)` when there was nothing to load. A corrupt save in
    /// the slot is deleted. On any error the current game is left untouched.
    pub fn load(&mut self, blob: Option<&str>) -> Result<bool> {
        let from_slot = blob.is_none();
        let text = match blob {
            Some(b) => b.to_string(),
            None => match self.store.read()? {
                Some(stored) => stored,
                None => return Ok(false),
            },
        };

        match save::decode(&text) {
            Ok((state, achievements)) => {
                self.replace_game(state, achievements);
                info!(
                    currency = self.state.currency,
                    prestige_points = self.state.prestige_points,
                    "game loaded"
                );
                Ok(true)
            }
            Err(e) => {
                if from_slot {
                    warn!(error = %e, "stored save is corrupt, discarding it");
                    if let Err(clear_err) = self.store.clear() {
                        warn!(error = %clear_err, "could not remove corrupt save");
                    }
                }
                Err(e)
            }
        }
    }

    /// Replace the game with an imported save. Invalid input leaves the game
    /// exactly as it was.
    pub fn import_blob(&mut self, blob: &str) -> Result<()> {
        match save::decode(blob) {
            Ok((state, achievements)) => {
                self.replace_game(state, achievements);
                info!(currency = self.state.currency, "save imported");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "rejected imported save");
                Err(e)
            }
        }
    }

    /// Wipe everything, achievements included, and delete the stored save.
    pub fn hard_reset(&mut self) -> Result<()> {
        self.replace_game(EconomyState::new(), Achievements::new());
        info!("hard reset");
        self.store.clear().map_err(|e: SaveError| {
            warn!(error = %e, "could not delete stored save");
            e
        })
    }

    fn replace_game(&mut self, state: EconomyState, achievements: Achievements) {
        self.state = state;
        self.achievements = achievements;
        self.session_start_ms = self.clock.now_ms();
        self.state.time_elapsed_seconds = 0;
        self.ticks_since_save = 0;
    }
}
