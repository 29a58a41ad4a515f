#![deny(warnings)]

//! Simulation engine for the warehouse pest-control game.
//!
//! [`Game`] owns the warehouse and advances it one day per call to
//! [`Game::advance_day`]; the player commands in [`commands`] are the only
//! other way state changes. Everything runs synchronously on the caller's
//! thread and every roll goes through an injectable random source.

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod snapshot;

pub use commands::{Command, CommandOutcome, RepairQuote, RepairReceipt};
pub use config::{SimConfig, StartState};
pub use engine::{DaySummary, Game, GameStatus, WIN_AFTER_DAY};
pub use error::{CommandError, ConfigError};
pub use events::{EventOutcome, FiredEvent};
pub use snapshot::GameSnapshot;

/// Run up to `days` days, stopping early on a terminal outcome.
pub fn run_days<R: warehouse_core::RandomSource>(
    game: &mut Game<R>,
    days: u32,
) -> Result<Vec<DaySummary>, CommandError> {
    let mut out = Vec::with_capacity(days as usize);
    for _ in 0..days {
        if game.status().is_terminal() {
            break;
        }
        out.push(game.advance_day()?);
    }
    Ok(out)
}
