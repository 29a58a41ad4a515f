use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use warehouse_core::{validate_state, WarehouseState};

/// Opening conditions. Every field falls back to the standard opening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartState {
    pub money: Decimal,
    pub humidity: i32,
    pub security_level: u8,
}

impl Default for StartState {
    fn default() -> Self {
        let s = WarehouseState::default();
        Self {
            money: s.money,
            humidity: s.humidity,
            security_level: s.security_level,
        }
    }
}

impl StartState {
    /// Day-zero state, validated.
    pub fn to_state(&self) -> Result<WarehouseState, ConfigError> {
        let state = WarehouseState {
            day: 0,
            money: self.money,
            humidity: self.humidity,
            security_level: self.security_level,
        };
        validate_state(&state)?;
        Ok(state)
    }
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for deterministic RNG.
    pub rng_seed: u64,
    #[serde(default)]
    pub start: StartState,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl SimConfig {
    pub fn with_seed(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            start: StartState::default(),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_yaml::from_str(text)?;
        cfg.start.to_state()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(text)?;
        cfg.start.to_state()?;
        Ok(cfg)
    }
}
