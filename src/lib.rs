//! Money Tycoon engine: an idle clicker economy with generators, upgrades,
//! achievements, prestige and portable save strings.
//!
//! Presentation lives outside this crate. A front end owns an [`Engine`],
//! drives it with [`Engine::tick`] from a [`time::GameTime`] loop, forwards
//! player input to the action methods and renders from the read accessors.

pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod rng;
pub mod store;
pub mod time;
pub mod tycoon;

pub use config::EngineConfig;
pub use error::SaveError;
pub use tycoon::achievements::{AchievementId, MultiplierCategory};
pub use tycoon::prestige::PrestigeOutcome;
pub use tycoon::state::{EconomyState, GeneratorId};
pub use tycoon::Engine;
