use serde::{Deserialize, Serialize};

/// Beds of one kind in a room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BedConfig {
    pub bed_type: String,
    pub count: u32,
}

/// A named price point, e.g. "Base" or "Festival season"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceTier {
    pub label: String,
    pub price: f64,
}

/// Room definition as stored on the property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub room_type: String,
    pub room_count: u32,
    pub beds: Vec<BedConfig>,
    pub max_adults: u32,
    pub max_children: u32,
    pub pricing: Vec<PriceTier>,
}

impl Room {
    pub fn max_occupancy(&self) -> u32 {
        self.max_adults.saturating_add(self.max_children)
    }

    pub fn bed_count(&self) -> u32 {
        self.beds
            .iter()
            .fold(0u32, |total, b| total.saturating_add(b.count))
    }

    /// Cheapest tier, used for listing cards
    pub fn starting_price(&self) -> Option<f64> {
        self.pricing
            .iter()
            .map(|t| t.price)
            .fold(None, |acc, p| match acc {
                Some(min) if min <= p => Some(min),
                _ => Some(p),
            })
    }
}
