//! Terminal driver: reads one command per line and prints the economy.
//!
//! Wall-clock time between commands is turned into engine ticks before each
//! command runs, so income keeps accruing while the prompt is idle.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::info;

use money_tycoon::config::{self, EngineConfig};
use money_tycoon::format::{format_duration, format_money};
use money_tycoon::input::{self, Command};
use money_tycoon::store::FileStore;
use money_tycoon::time::{Clock, GameTime, SystemClock};
use money_tycoon::tycoon::formula::ClickOutcome;
use money_tycoon::{Engine, GeneratorId, MultiplierCategory, PrestigeOutcome};

/// Catch up at most a day of idle time per command.
const MAX_CATCH_UP_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("money_tycoon=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = EngineConfig::load().context("failed to load engine config")?;
    let save_path = config::save_path_from_env();
    info!(path = %save_path.display(), "using save file");

    let mut engine = Engine::new(
        config.clone(),
        Box::new(SystemClock),
        Box::new(FileStore::new(&save_path)),
    );
    match engine.load(None) {
        Ok(true) => println!("Welcome back! Balance: ${}", format_money(engine.state().currency)),
        Ok(false) => println!("A new empire begins."),
        Err(e) if e.is_invalid_data() => println!("Save file was unreadable and has been removed."),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read save file {}", save_path.display()))
        }
    }
    println!("Type `help` for commands.");

    let clock = SystemClock;
    let mut game_time = GameTime::new(config.ticks_per_second).with_max_delta_ms(MAX_CATCH_UP_MS);
    game_time.update(clock.now_ms());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read command")?;

        engine.advance(game_time.update(clock.now_ms()));

        let command = match input::parse(&line) {
            Ok(command) => command,
            Err(input::CommandError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        run_command(&mut engine, command);
    }

    if engine.state().auto_save_enabled {
        engine
            .save()
            .with_context(|| format!("failed to write save file {}", save_path.display()))?;
        println!("Saved. Bye!");
    }
    Ok(())
}

fn run_command(engine: &mut Engine, command: Command) {
    match command {
        Command::Click(n) => {
            let mut earned = 0.0;
            let mut crits = 0;
            for _ in 0..n {
                let ClickOutcome { value, is_critical } = engine.perform_click();
                earned += value;
                if is_critical {
                    crits += 1;
                }
            }
            println!(
                "+${} from {} click(s), {} critical. Balance: ${}",
                format_money(earned),
                n,
                crits,
                format_money(engine.state().currency)
            );
        }
        Command::BuyClickUpgrade => {
            let cost = engine.click_upgrade_cost();
            let bought = engine.buy_click_upgrade();
            report_purchase(engine, bought, "click upgrade", cost);
        }
        Command::BuyCritUpgrade => {
            let cost = engine.crit_upgrade_cost();
            let bought = engine.buy_crit_upgrade();
            report_purchase(engine, bought, "crit upgrade", cost);
        }
        Command::BuyGenerator(id) => {
            let cost = engine.generator_cost(id);
            let bought = engine.buy_generator(id);
            report_purchase(engine, bought, id.name(), cost);
        }
        Command::Prestige => match engine.prestige() {
            PrestigeOutcome::Prestiged(result) => println!(
                "Prestiged! +{} point(s), multiplier now x{:.2}",
                result.points_awarded, result.prestige_multiplier
            ),
            PrestigeOutcome::Rejected { currency, required } => println!(
                "Need ${} to prestige (you have ${})",
                format_money(required),
                format_money(currency)
            ),
        },
        Command::Save => match engine.save() {
            Ok(_) => println!("Saved."),
            Err(e) => println!("Save failed: {}", e),
        },
        Command::Load => match engine.load(None) {
            Ok(true) => println!("Loaded."),
            Ok(false) => println!("No save file yet."),
            Err(e) => println!("Load failed: {}", e),
        },
        Command::Export => match engine.export_blob() {
            Ok(blob) => println!("{}", blob),
            Err(e) => println!("Export failed: {}", e),
        },
        Command::Import(blob) => match engine.import_blob(&blob) {
            Ok(()) => println!("Imported."),
            Err(e) => println!("Invalid save data: {}", e),
        },
        Command::HardReset => match engine.hard_reset() {
            Ok(()) => println!("Everything has been reset."),
            Err(e) => println!("Reset done, but the save file could not be removed: {}", e),
        },
        Command::Theme(name) => {
            println!("Theme set to {}.", name);
            engine.set_theme(name);
        }
        Command::AutoSave(enabled) => {
            engine.set_auto_save(enabled);
            println!("Autosave {}.", if enabled { "on" } else { "off" });
        }
        Command::Wait(secs) => {
            let before = engine.state().currency;
            let ticks = secs.saturating_mul(engine.config().ticks_per_second);
            engine.advance(ticks);
            println!(
                "+${} while waiting. Balance: ${}",
                format_money(engine.state().currency - before),
                format_money(engine.state().currency)
            );
        }
        Command::Status => print_status(engine),
        Command::Achievements => print_achievements(engine),
        Command::Help => println!("{}", input::HELP),
        Command::Quit => {}
    }
}

fn report_purchase(engine: &Engine, bought: bool, what: &str, cost: f64) {
    if bought {
        println!(
            "Bought {} for ${}. Balance: ${}",
            what,
            format_money(cost),
            format_money(engine.state().currency)
        );
    } else {
        println!(
            "Can't afford {} (${}, you have ${})",
            what,
            format_money(cost),
            format_money(engine.state().currency)
        );
    }
}

fn print_status(engine: &Engine) {
    let state = engine.state();
    println!("Balance:    ${}", format_money(state.currency));
    println!("Per second: ${}", format_money(engine.money_per_second()));
    println!(
        "Per click:  ${} ({:.0}% crit)",
        format_money(engine.click_value()),
        state.crit_chance_percent
    );
    println!(
        "Upgrades:   click lv{} (${})  crit lv{} (${})",
        state.click_upgrade_level,
        format_money(engine.click_upgrade_cost()),
        state.crit_upgrade_level,
        format_money(engine.crit_upgrade_cost())
    );
    println!("Businesses:");
    for &id in GeneratorId::all() {
        let generator = state.generator(id);
        let marker = if engine.can_afford_generator(id) { "*" } else { " " };
        println!(
            " {} {:<16} x{:<4} next ${}",
            marker,
            id.name(),
            generator.owned,
            format_money(generator.current_cost)
        );
    }
    println!(
        "Bonuses:    business x{:.2}  passive x{:.2}",
        engine.achievement_multiplier(MultiplierCategory::Business),
        engine.achievement_multiplier(MultiplierCategory::Passive)
    );
    println!(
        "Prestige:   {} point(s), x{:.2}{}",
        state.prestige_points,
        state.prestige_multiplier,
        if engine.can_prestige() {
            format!(" (ready: +{})", engine.pending_prestige_points())
        } else {
            String::new()
        }
    );
    println!(
        "Stats:      earned ${}  clicks {}  best click ${}  played {}",
        format_money(state.total_earned),
        state.total_clicks,
        format_money(state.biggest_single_click),
        format_duration(state.time_elapsed_seconds)
    );
}

fn print_achievements(engine: &Engine) {
    let book = engine.achievements();
    println!("Achievements {}/10", book.unlocked_count());
    for entry in book.iter() {
        println!(
            " [{}] {:<16} {} ({})",
            if entry.unlocked { "x" } else { " " },
            entry.def.name,
            entry.def.description,
            entry.def.reward_text
        );
    }
}
