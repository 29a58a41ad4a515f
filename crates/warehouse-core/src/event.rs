//! Random event definitions. Effects are plain data; the engine owns the
//! single handler that interprets them.

use crate::rng::RandomSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a fired event does to the warehouse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventEffect {
    /// Thieves target `1..=max_items` intact goods. Succeeds with probability
    /// `base_success / security_level`; the owner pays `penalty_share` of the
    /// stolen value.
    Theft {
        max_items: u32,
        base_success: f64,
        penalty_share: Decimal,
    },
    /// Damages each good with `resource_damage_chance`, extinguishes each
    /// active pest with `pest_kill_chance`.
    Fire {
        resource_damage_chance: f64,
        pest_kill_chance: f64,
    },
    /// Raises humidity, spoils humidity-sensitive goods, and wakes pests that
    /// thrive in damp air.
    Flood {
        humidity_rise: i32,
        damage_chance: f64,
        wake_chance: f64,
    },
    /// Gain a uniform amount in `[min, max]`.
    Windfall { min: i64, max: i64 },
    /// Lose a uniform amount in `[min, max]`.
    Fine { min: i64, max: i64 },
}

/// A named daily event and the effect it applies when it fires.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub name: String,
    /// Player-facing text shown in the day report.
    pub description: String,
    /// Daily firing probability in [0,1].
    pub probability: f64,
    pub effect: EventEffect,
}

impl RandomEvent {
    pub fn new(name: &str, description: &str, probability: f64, effect: EventEffect) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            probability,
            effect,
        }
    }

    /// Independent daily Bernoulli draw.
    pub fn fires<R: RandomSource + ?Sized>(&self, rng: &mut R) -> bool {
        rng.chance(self.probability)
    }
}
