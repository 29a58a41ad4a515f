use crate::pest::Pest;
use crate::rng::RandomSource;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A purchasable countermeasure with per-pest kill probabilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poison {
    /// Shop name, also the purchase key.
    pub name: String,
    /// Pest name -> kill probability. Unlisted pests are immune.
    pub effectiveness: BTreeMap<String, f64>,
    /// Price of one unit.
    pub cost: Decimal,
    /// Units in stock.
    #[serde(default)]
    pub owned: u32,
}

impl Poison {
    pub fn new<'a>(
        name: &str,
        effectiveness: impl IntoIterator<Item = (&'a str, f64)>,
        cost: i64,
    ) -> Self {
        Self {
            name: name.to_string(),
            effectiveness: effectiveness
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            cost: Decimal::from(cost),
            owned: 0,
        }
    }

    pub fn effectiveness_against(&self, pest_name: &str) -> f64 {
        self.effectiveness.get(pest_name).copied().unwrap_or(0.0)
    }

    /// One kill attempt. Consumes a unit only on success; with nothing owned
    /// it fails without drawing.
    pub fn try_kill<R: RandomSource + ?Sized>(&mut self, pest: &Pest, rng: &mut R) -> bool {
        if self.owned == 0 {
            return false;
        }
        if rng.chance(self.effectiveness_against(&pest.name)) {
            self.owned -= 1;
            return true;
        }
        false
    }

    /// Shop label: name, cost and effectiveness list.
    pub fn offer_info(&self) -> String {
        let eff: Vec<String> = self
            .effectiveness
            .iter()
            .map(|(k, v)| format!("{k} {}%", (v * 100.0).round() as i64))
            .collect();
        format!("{} - {}₽, эффективность: {}", self.name, self.cost, eff.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pest::SpawnConditions;
    use crate::resource::Category;
    use crate::rng::ScriptedSource;

    fn rat() -> Pest {
        let mut p = Pest::new(
            "Крысы",
            0.3,
            SpawnConditions::default(),
            [Category::Food],
        );
        p.active = true;
        p
    }

    fn rodenticide() -> Poison {
        Poison::new("Яд для грызунов", [("Крысы", 0.8), ("Мыши", 0.7)], 100)
    }

    #[test]
    fn empty_inventory_fails_without_drawing() {
        let mut p = rodenticide();
        let mut rng = ScriptedSource::new().with_units([0.0]);
        assert!(!p.try_kill(&rat(), &mut rng));
        assert_eq!(rng.pending_units(), 1);
        assert_eq!(p.owned, 0);
    }

    #[test]
    fn success_consumes_one_unit() {
        let mut p = rodenticide();
        p.owned = 2;
        let mut rng = ScriptedSource::new().with_units([0.79]);
        assert!(p.try_kill(&rat(), &mut rng));
        assert_eq!(p.owned, 1);
    }

    #[test]
    fn failure_keeps_inventory() {
        let mut p = rodenticide();
        p.owned = 1;
        let mut rng = ScriptedSource::new().with_units([0.8]);
        assert!(!p.try_kill(&rat(), &mut rng));
        assert_eq!(p.owned, 1);
    }

    #[test]
    fn unlisted_pest_is_immune() {
        let mut p = Poison::new("Инсектицид", [("Тараканы", 0.9)], 80);
        p.owned = 1;
        let mut rng = ScriptedSource::constant(0.0);
        assert_eq!(p.effectiveness_against("Крысы"), 0.0);
        assert!(!p.try_kill(&rat(), &mut rng));
        assert_eq!(p.owned, 1);
    }

    #[test]
    fn offer_lists_effectiveness() {
        assert_eq!(
            rodenticide().offer_info(),
            "Яд для грызунов - 100₽, эффективность: Крысы 80%, Мыши 70%"
        );
    }
}
