//! Pests: spawn predicates and per-day damage rolls.

use crate::resource::{Category, Resource};
use crate::rng::RandomSource;
use crate::WarehouseState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Conjunction of optional spawn requirements. Unset fields always hold.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnConditions {
    /// At least one held resource must belong to one of these categories.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required_categories: BTreeSet<Category>,
    /// Damaged goods needed, counted across the whole warehouse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_damaged: Option<usize>,
    /// Earliest day the pest may appear.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_day: Option<u32>,
    /// Humidity percent needed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_humidity: Option<i32>,
}

impl SpawnConditions {
    pub fn is_met(&self, state: &WarehouseState, resources: &[Resource]) -> bool {
        if !self.required_categories.is_empty()
            && !resources
                .iter()
                .any(|r| self.required_categories.contains(&r.category))
        {
            return false;
        }
        if let Some(min) = self.min_damaged {
            if resources.iter().filter(|r| r.damaged).count() < min {
                return false;
            }
        }
        if let Some(min) = self.min_day {
            if state.day < min {
                return false;
            }
        }
        if let Some(min) = self.min_humidity {
            if state.humidity < min {
                return false;
            }
        }
        true
    }
}

/// A pest species. Inactive until its spawn roll succeeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pest {
    /// Unique; poisons refer to pests by name.
    pub name: String,
    /// Per-resource, per-day damage probability in [0,1].
    pub damage_chance: f64,
    pub spawn: SpawnConditions,
    /// Categories this pest can damage.
    pub affected: BTreeSet<Category>,
    /// Present in the warehouse and rolling damage each day.
    pub active: bool,
}

impl Pest {
    pub fn new(
        name: &str,
        damage_chance: f64,
        spawn: SpawnConditions,
        affected: impl IntoIterator<Item = Category>,
    ) -> Self {
        Self {
            name: name.to_string(),
            damage_chance,
            spawn,
            affected: affected.into_iter().collect(),
            active: false,
        }
    }

    pub fn can_spawn(&self, state: &WarehouseState, resources: &[Resource]) -> bool {
        self.spawn.is_met(state, resources)
    }

    /// Pests that need damp air to appear; floods can wake them.
    pub fn thrives_in_damp(&self) -> bool {
        self.spawn.min_humidity.is_some()
    }

    /// Whether `resource` is a valid damage target right now.
    pub fn can_damage(&self, resource: &Resource) -> bool {
        self.active && !resource.damaged && self.affected.contains(&resource.category)
    }

    /// Rolls damage against one resource. Ineligible targets consume no draw.
    pub fn attempt_damage<R: RandomSource + ?Sized>(
        &self,
        resource: &mut Resource,
        rng: &mut R,
    ) -> bool {
        if !self.can_damage(resource) {
            return false;
        }
        if rng.chance(self.damage_chance) {
            resource.damaged = true;
            return true;
        }
        false
    }

    pub fn info(&self) -> String {
        format!(
            "{} (шанс повреждения: {}%)",
            self.name,
            (self.damage_chance * 100.0).round() as i64
        )
    }
}
