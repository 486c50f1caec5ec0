use serde::{Deserialize, Deserializer, Serialize};

/// A grocery line as extracted from one meal-plan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub item: String,
    #[serde(deserialize_with = "number_or_string")]
    pub total_quantity: f64,
    pub unit: String,
    pub category: String,
    pub meal_time: String,
}

/// A merged grocery line with a canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedItem {
    pub item: String,
    pub total_quantity: f64,
    pub unit: String,
    pub category: String,
    pub meal_time: String,
}

/// `{"items": [...]}` envelope used on both sides of aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroceryList {
    pub items: Vec<AggregatedItem>,
}

/// Models emit quantities both as numbers and as numeric strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid quantity: {s}"))),
    }
}
