use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of material categories goods are sorted into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Foodstuffs ("продукты").
    Food,
    /// Household chemicals ("бытовая химия").
    HouseholdChemicals,
    /// Building materials ("стройматериалы").
    BuildingMaterials,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Food,
        Category::HouseholdChemicals,
        Category::BuildingMaterials,
    ];

    /// Display label shown to players.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "продукты",
            Category::HouseholdChemicals => "бытовая химия",
            Category::BuildingMaterials => "стройматериалы",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stored good. Owned by the warehouse; only theft removes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Display name, unique within the catalog.
    pub name: String,
    pub category: Category,
    /// Monetary value (>= 0).
    pub value: Decimal,
    /// Damaged goods pay no rent until repaired.
    pub damaged: bool,
    /// Floods can spoil this good.
    pub humidity_sensitive: bool,
    /// Edible goods; informational only.
    pub is_food: bool,
}

impl Resource {
    pub fn new(
        name: &str,
        category: Category,
        value: i64,
        humidity_sensitive: bool,
        is_food: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            category,
            value: Decimal::from(value),
            damaged: false,
            humidity_sensitive,
            is_food,
        }
    }

    /// One-line listing, `+` for intact goods and `-` for damaged ones.
    pub fn info(&self) -> String {
        let status = if self.damaged { '-' } else { '+' };
        format!("{status} {} ({}) - {}₽", self.name, self.category, self.value)
    }
}
