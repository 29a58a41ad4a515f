//! The fixed rule tables the game starts from.

use crate::event::{EventEffect, RandomEvent};
use crate::pest::{Pest, SpawnConditions};
use crate::poison::Poison;
use crate::resource::{Category, Resource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything created once at game start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub resources: Vec<Resource>,
    pub pests: Vec<Pest>,
    pub poisons: Vec<Poison>,
    /// Evaluated and applied in this order every day.
    pub events: Vec<RandomEvent>,
}

impl Catalog {
    pub fn standard() -> Self {
        Self {
            resources: standard_resources(),
            pests: standard_pests(),
            poisons: standard_poisons(),
            events: standard_events(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

pub fn standard_resources() -> Vec<Resource> {
    use Category::*;
    vec![
        Resource::new("Мука", Food, 50, true, true),
        Resource::new("Сахар", Food, 40, true, true),
        Resource::new("Мыло", HouseholdChemicals, 30, false, false),
        Resource::new("Доски", BuildingMaterials, 80, true, false),
        Resource::new("Краска", BuildingMaterials, 120, false, false),
        Resource::new("Консервы", Food, 60, false, true),
        Resource::new("Гвозди", BuildingMaterials, 30, false, false),
        Resource::new("Крупа", Food, 45, true, true),
    ]
}

pub fn standard_pests() -> Vec<Pest> {
    use Category::*;
    vec![
        Pest::new(
            "Крысы",
            0.3,
            SpawnConditions {
                required_categories: [Food].into(),
                min_damaged: Some(1),
                min_day: Some(0),
                min_humidity: None,
            },
            [Food, HouseholdChemicals],
        ),
        Pest::new(
            "Тараканы",
            0.2,
            SpawnConditions {
                required_categories: [Food].into(),
                min_day: Some(2),
                ..SpawnConditions::default()
            },
            [Food],
        ),
        Pest::new(
            "Плесень",
            0.4,
            SpawnConditions {
                required_categories: [BuildingMaterials].into(),
                min_day: Some(3),
                min_humidity: Some(50),
                ..SpawnConditions::default()
            },
            [BuildingMaterials],
        ),
        Pest::new(
            "Мыши",
            0.25,
            SpawnConditions {
                min_damaged: Some(2),
                min_day: Some(5),
                ..SpawnConditions::default()
            },
            [Food],
        ),
    ]
}

pub fn standard_poisons() -> Vec<Poison> {
    vec![
        Poison::new("Яд для грызунов", [("Крысы", 0.8), ("Мыши", 0.7)], 100),
        Poison::new("Инсектицид", [("Тараканы", 0.9)], 80),
        Poison::new("Антисептик", [("Плесень", 0.85)], 120),
        Poison::new(
            "Универсальное средство",
            [
                ("Крысы", 0.5),
                ("Тараканы", 0.6),
                ("Плесень", 0.4),
                ("Мыши", 0.5),
            ],
            150,
        ),
    ]
}

pub fn standard_events() -> Vec<RandomEvent> {
    vec![
        RandomEvent::new(
            "Кража",
            "Воры проникли на склад и украли часть товаров!",
            0.1,
            EventEffect::Theft {
                max_items: 3,
                base_success: 0.7,
                penalty_share: Decimal::new(5, 1),
            },
        ),
        RandomEvent::new(
            "Пожар",
            "На складе случился пожар! Часть товаров повреждена.",
            0.05,
            EventEffect::Fire {
                resource_damage_chance: 0.3,
                pest_kill_chance: 0.6,
            },
        ),
        RandomEvent::new(
            "Наводнение",
            "Из-за протечки повысилась влажность и часть товаров испорчена.",
            0.07,
            EventEffect::Flood {
                humidity_rise: 20,
                damage_chance: 0.5,
                wake_chance: 0.7,
            },
        ),
        RandomEvent::new(
            "Удачный день",
            "Сегодня хорошие продажи!",
            0.1,
            EventEffect::Windfall { min: 50, max: 200 },
        ),
        RandomEvent::new(
            "Проверка",
            "Проверка выявила недостачу. Штраф!",
            0.08,
            EventEffect::Fine { min: 50, max: 150 },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_goods_are_worth_455() {
        let total: Decimal = standard_resources().iter().map(|r| r.value).sum();
        assert_eq!(total, Decimal::new(455, 0));
    }

    #[test]
    fn everything_starts_clean() {
        let c = Catalog::standard();
        assert!(c.resources.iter().all(|r| !r.damaged));
        assert!(c.pests.iter().all(|p| !p.active));
        assert!(c.poisons.iter().all(|p| p.owned == 0));
    }

    #[test]
    fn every_category_is_stocked_and_attacked() {
        let c = Catalog::standard();
        for cat in Category::ALL {
            assert!(c.resources.iter().any(|r| r.category == cat), "{cat} not stocked");
            assert!(c.pests.iter().any(|p| p.affected.contains(&cat)), "{cat} never attacked");
        }
    }

    #[test]
    fn only_mold_needs_damp_air() {
        let damp: Vec<String> = standard_pests()
            .into_iter()
            .filter(|p| p.thrives_in_damp())
            .map(|p| p.name)
            .collect();
        assert_eq!(damp, vec!["Плесень".to_string()]);
    }

    #[test]
    fn catalog_snapshot_roundtrip() {
        let c = Catalog::standard();
        let s = serde_json::to_string_pretty(&c).unwrap();
        let back: Catalog = serde_json::from_str(&s).unwrap();
        assert_eq!(back.resources, c.resources);
        assert_eq!(back.events.len(), 5);
        assert_eq!(back.poisons[0].cost, Decimal::new(100, 0));
        assert_eq!(back.pests[2].spawn.min_humidity, Some(50));
    }
}
