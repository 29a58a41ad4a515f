#![deny(warnings)]

//! Economic rules: the fixed money and probability tables of the game.
//!
//! This module provides validated helpers for:
//! - Daily rent on intact goods
//! - Security-scaled pest spawn and theft chances
//! - Repair, dehumidifier and security upgrade pricing

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;
use warehouse_core::{Resource, SECURITY_MAX, SECURITY_MIN};

/// Share of intact stock value collected as rent every day.
pub const RENT_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Spawn chance before security scaling.
pub const BASE_SPAWN_CHANCE: f64 = 0.5;
/// Price of repairing one damaged resource.
pub const REPAIR_COST_PER_ITEM: Decimal = Decimal::from_parts(25, 0, 0, false, 0);
/// Price of one dehumidifier run.
pub const HUMIDITY_REDUCTION_COST: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
/// Humidity points removed by one dehumidifier run.
pub const HUMIDITY_REDUCTION: i32 = 15;
/// Upgrade from level N costs N times this.
pub const SECURITY_UPGRADE_UNIT: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Security level outside 1..=3.
    #[error("invalid security level: {0}")]
    InvalidSecurityLevel(u8),
    /// Already at the top security level.
    #[error("security level {0} is already the maximum")]
    MaxLevel(u8),
}

fn check_level(level: u8) -> Result<(), EconError> {
    if !(SECURITY_MIN..=SECURITY_MAX).contains(&level) {
        return Err(EconError::InvalidSecurityLevel(level));
    }
    Ok(())
}

/// Daily rent: 10% of the summed value of undamaged goods.
///
/// Example:
/// let goods = warehouse_core::catalog::standard_resources();
/// assert_eq!(rent(&goods), Decimal::new(455, 1)); // 45.5
pub fn rent(resources: &[Resource]) -> Decimal {
    let intact: Decimal = resources
        .iter()
        .filter(|r| !r.damaged)
        .map(|r| r.value)
        .sum();
    intact * RENT_RATE
}

/// Chance that an eligible pest appears today.
///
/// Base 0.5, divided by the security level above level 1.
pub fn spawn_chance(security_level: u8) -> Result<f64, EconError> {
    check_level(security_level)?;
    if security_level > 1 {
        Ok(BASE_SPAWN_CHANCE / f64::from(security_level))
    } else {
        Ok(BASE_SPAWN_CHANCE)
    }
}

/// Chance that thieves get away with their haul.
pub fn theft_success_chance(base: f64, security_level: u8) -> Result<f64, EconError> {
    check_level(security_level)?;
    Ok(base / f64::from(security_level))
}

/// Fine owed for stolen goods worth `stolen_value`.
pub fn theft_penalty(stolen_value: Decimal, penalty_share: Decimal) -> Decimal {
    stolen_value * penalty_share
}

pub fn repair_cost(count: usize) -> Decimal {
    REPAIR_COST_PER_ITEM * Decimal::from(count)
}

/// How many of `damaged` repairs `money` covers. Zero when broke.
pub fn affordable_repairs(money: Decimal, damaged: usize) -> usize {
    if money <= Decimal::ZERO {
        return 0;
    }
    let n = (money / REPAIR_COST_PER_ITEM)
        .floor()
        .to_usize()
        .unwrap_or(usize::MAX);
    n.min(damaged)
}

/// Cost to go from `level` to `level + 1`.
///
/// Example:
/// assert_eq!(security_upgrade_cost(2).unwrap(), Decimal::new(600, 0));
pub fn security_upgrade_cost(level: u8) -> Result<Decimal, EconError> {
    check_level(level)?;
    if level >= SECURITY_MAX {
        return Err(EconError::MaxLevel(level));
    }
    Ok(SECURITY_UPGRADE_UNIT * Decimal::from(level))
}

pub fn can_afford(money: Decimal, cost: Decimal) -> bool {
    money >= cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use warehouse_core::catalog::standard_resources;

    #[test]
    fn constants_have_expected_values() {
        assert_eq!(RENT_RATE, Decimal::new(1, 1));
        assert_eq!(REPAIR_COST_PER_ITEM, Decimal::new(25, 0));
        assert_eq!(HUMIDITY_REDUCTION_COST, Decimal::new(50, 0));
        assert_eq!(SECURITY_UPGRADE_UNIT, Decimal::new(300, 0));
    }

    #[test]
    fn opening_rent_is_45_5() {
        assert_eq!(rent(&standard_resources()), Decimal::new(455, 1));
    }

    #[test]
    fn damaged_goods_pay_no_rent() {
        let mut goods = standard_resources();
        goods[4].damaged = true; // paint, 120
        assert_eq!(rent(&goods), Decimal::new(335, 1));
        for g in &mut goods {
            g.damaged = true;
        }
        assert_eq!(rent(&goods), Decimal::ZERO);
    }

    #[test]
    fn spawn_chance_scales_with_security() {
        assert_eq!(spawn_chance(1).unwrap(), 0.5);
        assert_eq!(spawn_chance(2).unwrap(), 0.25);
        assert!((spawn_chance(3).unwrap() - 0.5 / 3.0).abs() < 1e-12);
        assert_eq!(spawn_chance(0), Err(EconError::InvalidSecurityLevel(0)));
    }

    #[test]
    fn theft_chance_and_penalty() {
        assert!((theft_success_chance(0.7, 2).unwrap() - 0.35).abs() < 1e-12);
        assert_eq!(
            theft_penalty(Decimal::new(170, 0), Decimal::new(5, 1)),
            Decimal::new(85, 0)
        );
    }

    #[test]
    fn upgrade_cost_per_level() {
        assert_eq!(security_upgrade_cost(1).unwrap(), Decimal::new(300, 0));
        assert_eq!(security_upgrade_cost(2).unwrap(), Decimal::new(600, 0));
        assert_eq!(security_upgrade_cost(3), Err(EconError::MaxLevel(3)));
    }

    #[test]
    fn affordable_repairs_floor_and_cap() {
        assert_eq!(affordable_repairs(Decimal::new(74, 0), 5), 2);
        assert_eq!(affordable_repairs(Decimal::new(1000, 0), 3), 3);
        assert_eq!(affordable_repairs(Decimal::new(-10, 0), 3), 0);
        assert_eq!(affordable_repairs(Decimal::new(249, 1), 3), 0);
    }

    proptest! {
        #[test]
        fn rent_is_tenth_of_intact_value(mask in proptest::collection::vec(any::<bool>(), 8)) {
            let mut goods = standard_resources();
            for (g, d) in goods.iter_mut().zip(&mask) {
                g.damaged = *d;
            }
            let intact: Decimal = goods.iter().filter(|g| !g.damaged).map(|g| g.value).sum();
            prop_assert_eq!(rent(&goods) * Decimal::new(10, 0), intact);
        }

        #[test]
        fn affordable_repairs_never_overspend(cents in -100_000i64..1_000_000, damaged in 0usize..20) {
            let money = Decimal::new(cents, 2);
            let n = affordable_repairs(money, damaged);
            prop_assert!(n <= damaged);
            if n > 0 {
                prop_assert!(repair_cost(n) <= money);
            }
            if n < damaged && money > Decimal::ZERO {
                prop_assert!(repair_cost(n + 1) > money);
            }
        }
    }
}
