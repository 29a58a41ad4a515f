//! Player commands: shopping, poisoning, repairs and warehouse upgrades.

use crate::engine::{DaySummary, Game};
use crate::error::CommandError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use warehouse_core::{RandomSource, Warehouse, HUMIDITY_FLOOR, SECURITY_MAX};
use warehouse_econ::{
    affordable_repairs, can_afford, repair_cost, security_upgrade_cost, HUMIDITY_REDUCTION,
    HUMIDITY_REDUCTION_COST,
};

/// Goods repaired by one command and what it cost.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairReceipt {
    pub repaired: Vec<String>,
    pub cost: Decimal,
}

/// Price check before repairing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepairQuote {
    pub damaged: usize,
    pub total_cost: Decimal,
    /// How many repairs current funds cover.
    pub affordable: usize,
}

/// A single player action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "arg", rename_all = "snake_case")]
pub enum Command {
    AdvanceDay,
    PurchasePoison(String),
    ApplyPoison(String),
    RepairAll,
    RepairPartial(usize),
    ReduceHumidity,
    UpgradeSecurity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Day(DaySummary),
    Purchased(String),
    Killed(Vec<String>),
    Repaired(RepairReceipt),
    /// New humidity.
    HumidityReduced(i32),
    /// New security level.
    SecurityUpgraded(u8),
}

fn charge(wh: &mut Warehouse, cost: Decimal) -> Result<(), CommandError> {
    if !can_afford(wh.state.money, cost) {
        return Err(CommandError::InsufficientFunds {
            needed: cost,
            available: wh.state.money,
        });
    }
    wh.state.money -= cost;
    Ok(())
}

impl<R: RandomSource> Game<R> {
    pub fn execute(&mut self, cmd: Command) -> Result<CommandOutcome, CommandError> {
        match cmd {
            Command::AdvanceDay => self.advance_day().map(CommandOutcome::Day),
            Command::PurchasePoison(name) => {
                self.purchase_poison(&name)?;
                Ok(CommandOutcome::Purchased(name))
            }
            Command::ApplyPoison(name) => self.apply_poison(&name).map(CommandOutcome::Killed),
            Command::RepairAll => self.repair_all().map(CommandOutcome::Repaired),
            Command::RepairPartial(n) => self.repair_partial(n).map(CommandOutcome::Repaired),
            Command::ReduceHumidity => self.reduce_humidity().map(CommandOutcome::HumidityReduced),
            Command::UpgradeSecurity => {
                self.upgrade_security().map(CommandOutcome::SecurityUpgraded)
            }
        }
    }

    fn poison_index(&self, name: &str) -> Result<usize, CommandError> {
        self.warehouse
            .poisons
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| CommandError::UnknownPoison(name.to_string()))
    }

    /// Buy one unit of a countermeasure.
    pub fn purchase_poison(&mut self, name: &str) -> Result<(), CommandError> {
        self.ensure_running()?;
        let idx = self.poison_index(name)?;
        let cost = self.warehouse.poisons[idx].cost;
        charge(&mut self.warehouse, cost)?;
        let poison = &mut self.warehouse.poisons[idx];
        poison.owned += 1;
        debug!(poison = %poison.name, owned = poison.owned, %cost, "poison purchased");
        Ok(())
    }

    /// Use a countermeasure against every active pest. Returns killed pests.
    ///
    /// Each success consumes a unit; once stock runs out the remaining pests
    /// are left untouched.
    pub fn apply_poison(&mut self, name: &str) -> Result<Vec<String>, CommandError> {
        self.ensure_running()?;
        let idx = self.poison_index(name)?;
        if self.warehouse.active_pests().next().is_none() {
            return Err(CommandError::NoActivePests);
        }
        let Warehouse { pests, poisons, .. } = &mut self.warehouse;
        let poison = &mut poisons[idx];
        if poison.owned == 0 {
            return Err(CommandError::NoOwnedCountermeasures);
        }
        let mut killed = Vec::new();
        for pest in pests.iter_mut().filter(|p| p.active) {
            if poison.try_kill(pest, &mut self.rng) {
                pest.active = false;
                killed.push(pest.name.clone());
            }
        }
        debug!(poison = %poison.name, ?killed, left = poison.owned, "poison applied");
        Ok(killed)
    }

    pub fn repair_quote(&self) -> RepairQuote {
        let damaged = self.warehouse.damaged_count();
        RepairQuote {
            damaged,
            total_cost: repair_cost(damaged),
            affordable: affordable_repairs(self.warehouse.state.money, damaged),
        }
    }

    /// Repair every damaged good, or nothing if funds fall short.
    pub fn repair_all(&mut self) -> Result<RepairReceipt, CommandError> {
        self.ensure_running()?;
        let damaged: Vec<usize> = self.damaged_indices();
        if damaged.is_empty() {
            return Err(CommandError::NoDamagedResources);
        }
        let cost = repair_cost(damaged.len());
        charge(&mut self.warehouse, cost)?;
        Ok(self.mark_repaired(&damaged, cost))
    }

    /// Repair up to `count` damaged goods picked uniformly at random.
    pub fn repair_partial(&mut self, count: usize) -> Result<RepairReceipt, CommandError> {
        self.ensure_running()?;
        let damaged = self.damaged_indices();
        if damaged.is_empty() {
            return Err(CommandError::NoDamagedResources);
        }
        let count = count.min(damaged.len());
        if count == 0 {
            return Ok(RepairReceipt::default());
        }
        let cost = repair_cost(count);
        charge(&mut self.warehouse, cost)?;
        let picked: Vec<usize> = self
            .rng
            .sample_indices(damaged.len(), count)
            .into_iter()
            .map(|i| damaged[i])
            .collect();
        Ok(self.mark_repaired(&picked, cost))
    }

    fn damaged_indices(&self) -> Vec<usize> {
        self.warehouse
            .resources
            .iter()
            .enumerate()
            .filter(|(_, r)| r.damaged)
            .map(|(i, _)| i)
            .collect()
    }

    fn mark_repaired(&mut self, indices: &[usize], cost: Decimal) -> RepairReceipt {
        let mut repaired = Vec::with_capacity(indices.len());
        for &i in indices {
            let r = &mut self.warehouse.resources[i];
            r.damaged = false;
            repaired.push(r.name.clone());
        }
        debug!(?repaired, %cost, "resources repaired");
        RepairReceipt { repaired, cost }
    }

    /// Run the dehumidifier. Returns the new humidity.
    pub fn reduce_humidity(&mut self) -> Result<i32, CommandError> {
        self.ensure_running()?;
        charge(&mut self.warehouse, HUMIDITY_REDUCTION_COST)?;
        let h = &mut self.warehouse.state.humidity;
        *h = (*h - HUMIDITY_REDUCTION).max(HUMIDITY_FLOOR);
        debug!(humidity = *h, "humidity reduced");
        Ok(*h)
    }

    /// Cost of the next security level, `None` at the top level.
    pub fn security_upgrade_cost(&self) -> Option<Decimal> {
        security_upgrade_cost(self.warehouse.state.security_level).ok()
    }

    /// Hire more guards. Returns the new level.
    pub fn upgrade_security(&mut self) -> Result<u8, CommandError> {
        self.ensure_running()?;
        let level = self.warehouse.state.security_level;
        if level >= SECURITY_MAX {
            return Err(CommandError::MaxLevelReached);
        }
        let cost = security_upgrade_cost(level)?;
        charge(&mut self.warehouse, cost)?;
        self.warehouse.state.security_level += 1;
        debug!(level = level + 1, %cost, "security upgraded");
        Ok(level + 1)
    }
}
