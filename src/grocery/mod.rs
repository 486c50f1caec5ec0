//! Grocery list aggregation over model-extracted shopping data.
//!
//! Documents arrive as `{"items": [...]}`, possibly wrapped in model prose.
//! Lines are merged per ingredient, category and meal time using the same
//! unit normalizer as the meal-plan reconciler.

pub mod aggregate;
pub mod batch;
pub mod output;

pub use aggregate::{aggregate, display_round, normalize_ingredient_name};
pub use batch::{DocumentReport, load_documents, process_documents};
pub use output::{reports_json, write_csv, write_json};

use serde_json::Value;

use crate::error::{PlanError, Result};
use crate::models::{GroceryList, RawItem};

/// Validate, merge and sort one grocery document.
pub fn process_grocery_data(data: &Value) -> Result<GroceryList> {
    let items = data
        .as_object()
        .and_then(|obj| obj.get("items"))
        .ok_or_else(|| PlanError::InvalidGroceryStructure("missing `items` list".to_string()))?;

    let raw: Vec<RawItem> = serde_json::from_value(items.clone())
        .map_err(|e| PlanError::InvalidGroceryStructure(e.to_string()))?;

    let mut items = aggregate(&raw);
    items.sort_by(|a, b| (&a.category, &a.item).cmp(&(&b.category, &b.item)));

    Ok(GroceryList { items })
}

/// Pull the JSON object out of a model response and process it.
///
/// The object spans from the first `{` to the last `}`.
pub fn extract_json(response_text: &str) -> Result<GroceryList> {
    let span = response_text
        .find('{')
        .zip(response_text.rfind('}'))
        .filter(|(start, end)| start < end)
        .map(|(start, end)| &response_text[start..=end])
        .ok_or_else(|| {
            PlanError::InvalidGroceryStructure("no JSON object in response".to_string())
        })?;

    let value: Value = serde_json::from_str(span)?;
    process_grocery_data(&value)
}
