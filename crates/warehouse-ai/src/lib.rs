#![deny(warnings)]

//! Heuristic autopilot: picks the day's player commands from a snapshot.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;
use warehouse_core::{Pest, Poison, RandomSource, SECURITY_MAX};
use warehouse_econ::{
    affordable_repairs, repair_cost, security_upgrade_cost, HUMIDITY_REDUCTION_COST,
};
use warehouse_sim::{Command, CommandError, DaySummary, Game, GameSnapshot};

/// Expected kills from one application against `active`.
pub fn coverage(poison: &Poison, active: &[&Pest]) -> f64 {
    active
        .iter()
        .map(|p| poison.effectiveness_against(&p.name))
        .sum()
}

/// Expected kills per unit of money: higher is better.
pub fn utility(poison: &Poison, active: &[&Pest]) -> f64 {
    let cost = poison.cost.to_f64().unwrap_or(f64::MAX);
    if cost <= 0.0 {
        return coverage(poison, active);
    }
    coverage(poison, active) / cost
}

/// Tunables for the autopilot.
#[derive(Clone, Debug)]
pub struct Autopilot {
    /// Cash never spent on anything but rent buffers.
    pub cash_reserve: Decimal,
    /// Run the dehumidifier at or above this humidity.
    pub humidity_ceiling: i32,
    /// Cash that must remain after a security upgrade.
    pub upgrade_reserve: Decimal,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            cash_reserve: Decimal::new(150, 0),
            humidity_ceiling: 45,
            upgrade_reserve: Decimal::new(600, 0),
        }
    }
}

impl Autopilot {
    /// Commands for today, in execution order. Never includes `AdvanceDay`.
    pub fn plan(&self, snap: &GameSnapshot) -> Vec<Command> {
        let mut plan = Vec::new();
        if snap.status.is_terminal() {
            return plan;
        }
        let wh = &snap.warehouse;
        let mut budget = wh.state.money;
        let active = snap.active_pests();

        if !active.is_empty() {
            let owned_best = snap
                .owned_poisons()
                .into_iter()
                .filter(|p| coverage(p, &active) > 0.0)
                .max_by(|a, b| coverage(a, &active).total_cmp(&coverage(b, &active)));
            if let Some(p) = owned_best {
                plan.push(Command::ApplyPoison(p.name.clone()));
            } else if let Some(p) = wh
                .poisons
                .iter()
                .filter(|p| coverage(p, &active) > 0.0 && budget - p.cost >= self.cash_reserve)
                .max_by(|a, b| utility(a, &active).total_cmp(&utility(b, &active)))
            {
                budget -= p.cost;
                plan.push(Command::PurchasePoison(p.name.clone()));
                plan.push(Command::ApplyPoison(p.name.clone()));
            }
        }

        let damaged = wh.damaged_count();
        if damaged > 0 {
            let total = repair_cost(damaged);
            if budget - total >= self.cash_reserve {
                budget -= total;
                plan.push(Command::RepairAll);
            } else {
                let k = affordable_repairs(budget - self.cash_reserve, damaged);
                if k > 0 {
                    budget -= repair_cost(k);
                    plan.push(Command::RepairPartial(k));
                }
            }
        }

        if wh.state.humidity >= self.humidity_ceiling
            && budget - HUMIDITY_REDUCTION_COST >= self.cash_reserve
        {
            budget -= HUMIDITY_REDUCTION_COST;
            plan.push(Command::ReduceHumidity);
        }

        if wh.state.security_level < SECURITY_MAX {
            if let Ok(cost) = security_upgrade_cost(wh.state.security_level) {
                if budget - cost >= self.upgrade_reserve {
                    plan.push(Command::UpgradeSecurity);
                }
            }
        }
        plan
    }

    /// Execute today's plan, then advance the day. Rejected commands are
    /// skipped; only a finished game aborts.
    pub fn play_day<R: RandomSource>(&self, game: &mut Game<R>) -> Result<DaySummary, CommandError> {
        for cmd in self.plan(&game.snapshot()) {
            match game.execute(cmd.clone()) {
                Ok(outcome) => debug!(?cmd, ?outcome, "autopilot command"),
                Err(e @ CommandError::GameOver(_)) => return Err(e),
                Err(e) => debug!(?cmd, error = %e, "autopilot command skipped"),
            }
        }
        game.advance_day()
    }
}
