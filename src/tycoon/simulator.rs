//! Balance simulator for Money Tycoon.
//! Run with: cargo test simulate_greedy -- --nocapture

use super::achievements::AchievementId;
use super::state::GeneratorId;
use super::Engine;
use crate::config::EngineConfig;
use crate::format::{format_duration, format_money};
use crate::store::MemoryStore;
use crate::time::ManualClock;

const CLICKS_PER_SECOND: u32 = 5;
/// Stop investing once income alone reaches the goal within this many seconds.
const INVEST_HORIZON_SECS: f64 = 600.0;
const GOAL: f64 = 1_000_000.0;

/// What to purchase next.
enum Purchase {
    Generator(GeneratorId),
    ClickUpgrade,
}

/// Purchase with the shortest payback time, ignoring affordability.
fn find_best_purchase(engine: &Engine) -> (Purchase, f64) {
    let state = engine.state();
    let per_unit_factor = if state.total_generators_owned() > 0 {
        // Current multiplier stack, read back from what one unit already earns.
        let raw: f64 = state.generators.iter().map(|g| g.raw_revenue()).sum();
        engine.money_per_second() / raw
    } else {
        state.prestige_multiplier
    };

    let mut best: Option<(f64, Purchase, f64)> = None; // (payback_seconds, purchase, cost)
    for &id in GeneratorId::all() {
        let cost = engine.generator_cost(id);
        let payback = cost / (id.base_revenue() * per_unit_factor);
        let dominated = best.as_ref().map_or(false, |(bp, _, _)| *bp <= payback);
        if !dominated {
            best = Some((payback, Purchase::Generator(id), cost));
        }
    }

    // Click upgrades pay back through clicking alone.
    let next_level = state.click_upgrade_level + 1;
    let power_gain = (next_level as f64 * 1.5).floor() + 1.0;
    let cost = engine.click_upgrade_cost();
    let payback = cost / (power_gain * state.prestige_multiplier * CLICKS_PER_SECOND as f64);
    let dominated = best.as_ref().map_or(false, |(bp, _, _)| *bp <= payback);
    if !dominated {
        best = Some((payback, Purchase::ClickUpgrade, cost));
    }

    let (_, purchase, cost) = best.unwrap_or((payback, Purchase::ClickUpgrade, cost));
    (purchase, cost)
}

fn report_stats(engine: &Engine, seconds: u32, purchases_made: u32) {
    let state = engine.state();
    eprintln!("┌─── {} ─────────────────────────", format_duration(seconds as u64));
    eprintln!(
        "│ Money: {}  MPS: {}  Clicks: {}",
        format_money(state.currency),
        format_money(engine.money_per_second()),
        state.total_clicks
    );
    eprintln!(
        "│ Earned: {}  Purchases: {}  Click lv: {}",
        format_money(state.total_earned),
        purchases_made,
        state.click_upgrade_level
    );
    let counts: Vec<String> = state
        .generators
        .iter()
        .map(|g| format!("{}:{}", g.id.key(), g.owned))
        .collect();
    eprintln!("│ Businesses: {}", counts.join("  "));
    eprintln!(
        "│ Achievements: {}/10",
        engine.achievements().unlocked_count()
    );
    eprintln!("└────────────────────────────────────");
}

/// Greedy play from a fresh game. Returns the engine and the simulated
/// second at which prestige first became available, if it did.
fn simulate(max_seconds: u32) -> (Engine, Option<u32>) {
    let clock = ManualClock::new(0.0);
    let config = EngineConfig {
        rng_seed: Some(7),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config, Box::new(clock.clone()), Box::new(MemoryStore::new()));
    let ticks_per_second = engine.config().ticks_per_second;

    let mut total_purchases: u32 = 0;
    let report_times = [60, 300, 600, 1200, 1800, 3600];
    let mut next_report_idx = 0;

    for second in 1..=max_seconds {
        for _ in 0..CLICKS_PER_SECOND {
            engine.perform_click();
        }

        clock.advance_ms(1_000.0);
        engine.advance(ticks_per_second);
        assert!(engine.state().currency >= 0.0, "negative balance at {}s", second);

        if engine.can_prestige() {
            report_stats(&engine, second, total_purchases);
            return (engine, Some(second));
        }

        // Safety limit
        for _ in 0..50 {
            if engine.money_per_second() * INVEST_HORIZON_SECS >= GOAL {
                break;
            }
            let (purchase, cost) = find_best_purchase(&engine);
            if engine.state().currency < cost {
                break;
            }
            let bought = match purchase {
                Purchase::Generator(id) => engine.buy_generator(id),
                Purchase::ClickUpgrade => engine.buy_click_upgrade(),
            };
            if !bought {
                break;
            }
            total_purchases += 1;
        }

        if next_report_idx < report_times.len() && second >= report_times[next_report_idx] {
            report_stats(&engine, second, total_purchases);
            next_report_idx += 1;
        }
    }

    (engine, None)
}

#[test]
fn simulate_greedy_reaches_prestige_within_an_hour() {
    let (engine, reached_at) = simulate(3_600);
    let second = reached_at.expect("prestige not reachable within an hour of greedy play");
    assert!(second > 60, "prestige came suspiciously early: {}s", second);
    assert_eq!(engine.state().time_elapsed_seconds, second as u64);

    // Early click and business achievements come long before the goal.
    let book = engine.achievements();
    assert!(book.is_unlocked(AchievementId::HundredClicks));
    assert!(book.is_unlocked(AchievementId::TenBusinesses));
}

#[test]
fn simulate_greedy_prestige_loop() {
    let (mut engine, reached_at) = simulate(3_600);
    assert!(reached_at.is_some());
    let outcome = engine.prestige();
    assert!(!outcome.is_rejected());
    assert_eq!(engine.state().total_prestige_count, 1);
    assert!(engine.state().prestige_multiplier > 1.0);
    assert_eq!(engine.state().total_generators_owned(), 0);
    assert!((engine.state().currency - 0.0).abs() < 0.001);
}
