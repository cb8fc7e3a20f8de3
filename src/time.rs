//! Wall-clock sources and the fixed-timestep tick accumulator.
//!
//! The engine never counts seconds itself. Elapsed session time is read from
//! a `Clock`, and `GameTime` turns irregular wall-clock updates into a whole
//! number of fixed ticks.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Real time since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// Hand-driven clock for tests and simulations. Clones share one time value.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set_ms(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Default cap on a single update's delta (tab backgrounded, laptop asleep).
pub const DEFAULT_MAX_DELTA_MS: f64 = 500.0;

pub struct GameTime {
    /// Milliseconds per tick (e.g. 100ms = 10 ticks/sec)
    ms_per_tick: f64,
    /// Largest delta accepted from one update
    max_delta_ms: f64,
    /// Milliseconds not yet consumed as ticks
    accumulator: f64,
    /// Total ticks handed out since creation
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl GameTime {
    /// `ticks_per_sec`: game ticks per real-time second (e.g. 10).
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            max_delta_ms: DEFAULT_MAX_DELTA_MS,
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Raise or lower the per-update cap. A line-oriented driver that only
    /// updates between commands wants a much larger cap than a render loop.
    pub fn with_max_delta_ms(mut self, max_delta_ms: f64) -> Self {
        self.max_delta_ms = max_delta_ms.max(0.0);
        self
    }

    /// Feed a wall-clock timestamp. Returns how many ticks to run now.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}
