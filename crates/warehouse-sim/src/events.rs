//! Resolution of fired random events.
//!
//! Every [`EventEffect`] variant is interpreted here and nowhere else. The
//! handler mutates the warehouse in place and reports what happened so the
//! caller can show it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use warehouse_core::{EventEffect, RandomEvent, RandomSource, Warehouse, HUMIDITY_CEILING};
use warehouse_econ::{theft_penalty, theft_success_chance, EconError};

/// What a fired event did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventOutcome {
    /// Goods removed and the owner fined.
    Stolen {
        items: Vec<String>,
        total_value: Decimal,
        penalty: Decimal,
    },
    /// A guard caught the thief; nothing changed.
    TheftThwarted { targeted: Vec<String> },
    /// No intact goods were left to steal.
    NothingToSteal,
    Fire {
        damaged: Vec<String>,
        extinguished: Vec<String>,
    },
    Flood {
        humidity: i32,
        damaged: Vec<String>,
        woken: Vec<String>,
    },
    Windfall { amount: Decimal },
    Fine { amount: Decimal },
}

impl EventOutcome {
    /// Follow-up notice shown after the event description.
    pub fn note(&self) -> Option<String> {
        match self {
            EventOutcome::Stolen {
                total_value,
                penalty,
                ..
            } => Some(format!(
                "Украдено товаров на сумму {total_value}₽! Штраф: {penalty}₽"
            )),
            EventOutcome::TheftThwarted { .. } => Some("Охранник поймал вора!".to_string()),
            EventOutcome::NothingToSteal => None,
            EventOutcome::Fire { damaged, .. } | EventOutcome::Flood { damaged, .. } => {
                if damaged.is_empty() {
                    None
                } else {
                    Some(format!("Испорчено: {}", damaged.join(", ")))
                }
            }
            EventOutcome::Windfall { amount } => Some(format!("Вы получили {amount}₽")),
            EventOutcome::Fine { amount } => Some(format!("Вы потеряли {amount}₽")),
        }
    }
}

/// An event that fired on a given day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub name: String,
    pub description: String,
    pub outcome: EventOutcome,
}

/// Apply a fired event to the warehouse.
pub fn resolve<R: RandomSource + ?Sized>(
    event: &RandomEvent,
    wh: &mut Warehouse,
    rng: &mut R,
) -> Result<FiredEvent, EconError> {
    let outcome = match &event.effect {
        EventEffect::Theft {
            max_items,
            base_success,
            penalty_share,
        } => theft(wh, rng, *max_items, *base_success, *penalty_share)?,
        EventEffect::Fire {
            resource_damage_chance,
            pest_kill_chance,
        } => fire(wh, rng, *resource_damage_chance, *pest_kill_chance),
        EventEffect::Flood {
            humidity_rise,
            damage_chance,
            wake_chance,
        } => flood(wh, rng, *humidity_rise, *damage_chance, *wake_chance),
        EventEffect::Windfall { min, max } => {
            let amount = Decimal::from(rng.int_inclusive(*min, *max));
            wh.state.money += amount;
            EventOutcome::Windfall { amount }
        }
        EventEffect::Fine { min, max } => {
            let amount = Decimal::from(rng.int_inclusive(*min, *max));
            wh.state.money -= amount;
            EventOutcome::Fine { amount }
        }
    };
    debug!(event = %event.name, ?outcome, "event resolved");
    Ok(FiredEvent {
        name: event.name.clone(),
        description: event.description.clone(),
        outcome,
    })
}

fn theft<R: RandomSource + ?Sized>(
    wh: &mut Warehouse,
    rng: &mut R,
    max_items: u32,
    base_success: f64,
    penalty_share: Decimal,
) -> Result<EventOutcome, EconError> {
    let wanted = rng.int_inclusive(1, i64::from(max_items.max(1)));
    let eligible: Vec<usize> = wh
        .resources
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.damaged)
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return Ok(EventOutcome::NothingToSteal);
    }
    let amount = usize::try_from(wanted).unwrap_or(1).min(eligible.len());
    let mut targets: Vec<usize> = rng
        .sample_indices(eligible.len(), amount)
        .into_iter()
        .map(|i| eligible[i])
        .collect();
    let items: Vec<String> = targets
        .iter()
        .map(|&i| wh.resources[i].name.clone())
        .collect();

    let success = theft_success_chance(base_success, wh.state.security_level)?;
    if !rng.chance(success) {
        return Ok(EventOutcome::TheftThwarted { targeted: items });
    }

    let total_value: Decimal = targets.iter().map(|&i| wh.resources[i].value).sum();
    // Remove from the back so earlier indices stay valid.
    targets.sort_unstable_by(|a, b| b.cmp(a));
    for i in targets {
        wh.resources.remove(i);
    }
    let penalty = theft_penalty(total_value, penalty_share);
    wh.state.money -= penalty;
    Ok(EventOutcome::Stolen {
        items,
        total_value,
        penalty,
    })
}

fn fire<R: RandomSource + ?Sized>(
    wh: &mut Warehouse,
    rng: &mut R,
    resource_damage_chance: f64,
    pest_kill_chance: f64,
) -> EventOutcome {
    let mut damaged = Vec::new();
    for r in &mut wh.resources {
        if rng.chance(resource_damage_chance) && !r.damaged {
            r.damaged = true;
            damaged.push(r.name.clone());
        }
    }
    let mut extinguished = Vec::new();
    for p in wh.pests.iter_mut().filter(|p| p.active) {
        if rng.chance(pest_kill_chance) {
            p.active = false;
            extinguished.push(p.name.clone());
        }
    }
    EventOutcome::Fire {
        damaged,
        extinguished,
    }
}

fn flood<R: RandomSource + ?Sized>(
    wh: &mut Warehouse,
    rng: &mut R,
    humidity_rise: i32,
    damage_chance: f64,
    wake_chance: f64,
) -> EventOutcome {
    wh.state.humidity = (wh.state.humidity + humidity_rise).min(HUMIDITY_CEILING);
    let mut damaged = Vec::new();
    for r in wh.resources.iter_mut().filter(|r| r.humidity_sensitive) {
        if rng.chance(damage_chance) && !r.damaged {
            r.damaged = true;
            damaged.push(r.name.clone());
        }
    }
    let mut woken = Vec::new();
    for p in wh
        .pests
        .iter_mut()
        .filter(|p| !p.active && p.thrives_in_damp())
    {
        if rng.chance(wake_chance) {
            p.active = true;
            woken.push(p.name.clone());
        }
    }
    EventOutcome::Flood {
        humidity: wh.state.humidity,
        damaged,
        woken,
    }
}
