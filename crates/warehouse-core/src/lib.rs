#![deny(warnings)]

//! Core domain models and invariants for the warehouse pest-control game.
//!
//! This crate defines the serializable goods, pests, countermeasures and
//! event tables, the random-source abstraction every roll goes through, and
//! validation helpers that guard the basic invariants.

pub mod catalog;
pub mod event;
pub mod pest;
pub mod poison;
pub mod resource;
pub mod rng;

pub use catalog::Catalog;
pub use event::{EventEffect, RandomEvent};
pub use pest::{Pest, SpawnConditions};
pub use poison::Poison;
pub use resource::{Category, Resource};
pub use rng::{RandomSource, ScriptedSource, SeededSource};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Lowest humidity the warehouse can reach.
pub const HUMIDITY_FLOOR: i32 = 10;
/// Daily drift never leaves humidity above this.
pub const HUMIDITY_DAILY_CEILING: i32 = 90;
/// Hard cap; floods may push humidity up to here.
pub const HUMIDITY_CEILING: i32 = 100;
pub const SECURITY_MIN: u8 = 1;
pub const SECURITY_MAX: u8 = 3;

/// Scalar warehouse conditions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WarehouseState {
    /// Completed days; 0 before the first advance.
    pub day: u32,
    /// Cash on hand; may go negative, which loses the game.
    pub money: Decimal,
    /// Percent, within [10, 100].
    pub humidity: i32,
    /// Guard level in 1..=3.
    pub security_level: u8,
}

impl Default for WarehouseState {
    fn default() -> Self {
        Self {
            day: 0,
            money: Decimal::new(1000, 0),
            humidity: 30,
            security_level: 2,
        }
    }
}

impl WarehouseState {
    pub fn info(&self) -> String {
        format!(
            "День: {} | Деньги: {}₽ | Влажность: {}% | Безопасность: {}",
            self.day,
            self.money,
            self.humidity,
            "★".repeat(usize::from(self.security_level))
        )
    }
}

/// All mutable game data: conditions plus the goods, pests and inventory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub state: WarehouseState,
    pub resources: Vec<Resource>,
    pub pests: Vec<Pest>,
    pub poisons: Vec<Poison>,
}

impl Warehouse {
    pub fn new(state: WarehouseState, catalog: &Catalog) -> Self {
        Self {
            state,
            resources: catalog.resources.clone(),
            pests: catalog.pests.clone(),
            poisons: catalog.poisons.clone(),
        }
    }

    pub fn damaged_count(&self) -> usize {
        self.resources.iter().filter(|r| r.damaged).count()
    }

    pub fn active_pests(&self) -> impl Iterator<Item = &Pest> {
        self.pests.iter().filter(|p| p.active)
    }

    pub fn owned_poisons(&self) -> impl Iterator<Item = &Poison> {
        self.poisons.iter().filter(|p| p.owned > 0)
    }

    /// Sum of values of goods that are not damaged.
    pub fn intact_value(&self) -> Decimal {
        self.resources
            .iter()
            .filter(|r| !r.damaged)
            .map(|r| r.value)
            .sum()
    }
}

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Probability outside [0, 1] or not finite.
    #[error("probability for {what} must be within [0,1], got {value}")]
    InvalidProbability { what: String, value: f64 },
    /// Price, value or cost must be non-negative.
    #[error("negative monetary value for {0}")]
    NegativeMoney(String),
    /// Names identify entities and must be present.
    #[error("empty name")]
    EmptyName,
    /// Two entities of the same kind share a name.
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    /// A poison lists a pest that is not in the catalog.
    #[error("poison {poison} references unknown pest {pest}")]
    UnknownPest { poison: String, pest: String },
    /// Lower bound above upper bound.
    #[error("invalid range [{min}, {max}] for {what}")]
    InvalidRange { what: String, min: i64, max: i64 },
    #[error("humidity {0} is out of range [10, 100]")]
    HumidityOutOfRange(i32),
    #[error("security level {0} is out of range [1, 3]")]
    SecurityLevelOutOfRange(u8),
}

fn check_probability(what: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidProbability {
            what: what.to_string(),
            value,
        });
    }
    Ok(())
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for n in names {
        if n.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !seen.insert(n) {
            return Err(ValidationError::DuplicateName(n.to_string()));
        }
    }
    Ok(())
}

/// Validate scalar warehouse conditions.
pub fn validate_state(s: &WarehouseState) -> Result<(), ValidationError> {
    if !(HUMIDITY_FLOOR..=HUMIDITY_CEILING).contains(&s.humidity) {
        return Err(ValidationError::HumidityOutOfRange(s.humidity));
    }
    if !(SECURITY_MIN..=SECURITY_MAX).contains(&s.security_level) {
        return Err(ValidationError::SecurityLevelOutOfRange(s.security_level));
    }
    Ok(())
}

/// Validate a pest definition.
pub fn validate_pest(p: &Pest) -> Result<(), ValidationError> {
    check_probability(&p.name, p.damage_chance)?;
    if let Some(h) = p.spawn.min_humidity {
        if !(HUMIDITY_FLOOR..=HUMIDITY_CEILING).contains(&h) {
            return Err(ValidationError::HumidityOutOfRange(h));
        }
    }
    Ok(())
}

/// Validate an event's probability and effect parameters.
pub fn validate_event(e: &RandomEvent) -> Result<(), ValidationError> {
    check_probability(&e.name, e.probability)?;
    match &e.effect {
        EventEffect::Theft {
            max_items,
            base_success,
            penalty_share,
        } => {
            check_probability(&e.name, *base_success)?;
            if *max_items == 0 {
                return Err(ValidationError::InvalidRange {
                    what: e.name.clone(),
                    min: 1,
                    max: 0,
                });
            }
            if *penalty_share < Decimal::ZERO {
                return Err(ValidationError::NegativeMoney(e.name.clone()));
            }
        }
        EventEffect::Fire {
            resource_damage_chance,
            pest_kill_chance,
        } => {
            check_probability(&e.name, *resource_damage_chance)?;
            check_probability(&e.name, *pest_kill_chance)?;
        }
        EventEffect::Flood {
            damage_chance,
            wake_chance,
            ..
        } => {
            check_probability(&e.name, *damage_chance)?;
            check_probability(&e.name, *wake_chance)?;
        }
        EventEffect::Windfall { min, max } | EventEffect::Fine { min, max } => {
            if *min < 0 || min > max {
                return Err(ValidationError::InvalidRange {
                    what: e.name.clone(),
                    min: *min,
                    max: *max,
                });
            }
        }
    }
    Ok(())
}

/// Validate the catalog, including cross-references from poisons to pests.
pub fn validate_catalog(c: &Catalog) -> Result<(), ValidationError> {
    check_unique(c.resources.iter().map(|r| r.name.as_str()))?;
    check_unique(c.pests.iter().map(|p| p.name.as_str()))?;
    check_unique(c.poisons.iter().map(|p| p.name.as_str()))?;
    check_unique(c.events.iter().map(|e| e.name.as_str()))?;

    for r in &c.resources {
        if r.value < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney(r.name.clone()));
        }
    }
    for p in &c.pests {
        validate_pest(p)?;
    }
    let pest_names: BTreeSet<&str> = c.pests.iter().map(|p| p.name.as_str()).collect();
    for poison in &c.poisons {
        if poison.cost < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney(poison.name.clone()));
        }
        for (pest, chance) in &poison.effectiveness {
            if !pest_names.contains(pest.as_str()) {
                return Err(ValidationError::UnknownPest {
                    poison: poison.name.clone(),
                    pest: pest.clone(),
                });
            }
            check_probability(&poison.name, *chance)?;
        }
    }
    for e in &c.events {
        validate_event(e)?;
    }
    Ok(())
}
