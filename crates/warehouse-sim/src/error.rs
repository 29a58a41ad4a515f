use crate::engine::GameStatus;
use rust_decimal::Decimal;
use thiserror::Error;
use warehouse_core::ValidationError;
use warehouse_econ::EconError;

/// Expected, recoverable outcomes of a rejected player command.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// The action costs more than the cash on hand; nothing was charged.
    #[error("insufficient funds: need {needed}₽, have {available}₽")]
    InsufficientFunds { needed: Decimal, available: Decimal },
    /// Security is already at level 3.
    #[error("security is already at the maximum level")]
    MaxLevelReached,
    #[error("there are no active pests")]
    NoActivePests,
    /// The named countermeasure is out of stock.
    #[error("no units of this countermeasure are owned")]
    NoOwnedCountermeasures,
    #[error("there are no damaged resources")]
    NoDamagedResources,
    /// No countermeasure with this name in the catalog.
    #[error("unknown countermeasure: {0}")]
    UnknownPoison(String),
    /// The game already ended; nothing more is processed.
    #[error("the game is over: {0}")]
    GameOver(GameStatus),
    /// Rule-table rejection, e.g. a corrupt security level.
    #[error(transparent)]
    Rules(#[from] EconError),
}

/// Errors building a game from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
