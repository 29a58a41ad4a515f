use crate::engine::GameStatus;
use serde::{Deserialize, Serialize};
use warehouse_core::{Pest, Poison, Warehouse};

/// Read-only copy of everything a front end renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub warehouse: Warehouse,
    pub status: GameStatus,
}

impl GameSnapshot {
    pub fn active_pests(&self) -> Vec<&Pest> {
        self.warehouse.active_pests().collect()
    }

    pub fn owned_poisons(&self) -> Vec<&Poison> {
        self.warehouse.owned_poisons().collect()
    }

    pub fn resource_lines(&self) -> Vec<String> {
        self.warehouse.resources.iter().map(|r| r.info()).collect()
    }

    pub fn pest_lines(&self) -> Vec<String> {
        let active = self.active_pests();
        if active.is_empty() {
            return vec!["Нет активных вредителей".to_string()];
        }
        active.iter().map(|p| p.info()).collect()
    }

    pub fn inventory_lines(&self) -> Vec<String> {
        let owned = self.owned_poisons();
        if owned.is_empty() {
            return vec!["Нет средств для борьбы".to_string()];
        }
        owned
            .iter()
            .map(|p| format!("{}: {} шт.", p.name, p.owned))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
