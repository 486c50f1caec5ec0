use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AggregatedItem, RawItem};
use crate::planner::units::normalize;

/// Preparation words that do not change what has to be bought.
static PREPARATION_WORDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(?:fresh|raw|frozen|canned|dried|whole|chopped|diced|sliced|minced) ").ok()
});

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

/// Names folded onto one shopping entry.
const SYNONYMS: &[(&str, &str)] = &[
    ("chicken breast", "chicken"),
    ("chicken breasts", "chicken"),
    ("red onion", "onion"),
    ("white onion", "onion"),
    ("yellow onion", "onion"),
    ("greek yogurt", "yogurt"),
    ("plain yogurt", "yogurt"),
];

/// Canonical shopping name for an ingredient.
pub fn normalize_ingredient_name(name: &str) -> String {
    let mut name = name.trim().to_lowercase();

    if let Some(re) = WHITESPACE.as_ref() {
        name = re.replace_all(&name, " ").into_owned();
    }
    if let Some(re) = PREPARATION_WORDS.as_ref() {
        name = re.replace_all(&name, "").into_owned();
    }

    SYNONYMS
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| to.to_string())
        .unwrap_or(name)
}

/// Round a summed quantity to something a shopper can read.
pub fn display_round(quantity: f64) -> f64 {
    if quantity >= 100.0 {
        (quantity / 10.0).round() * 10.0
    } else if quantity >= 10.0 {
        quantity.round()
    } else {
        (quantity * 10.0).round() / 10.0
    }
}

struct Group {
    item: String,
    category: String,
    meal_time: String,
    quantity: f64,
    unit: String,
}

/// Merge raw lines by (name, category, meal time), summing quantities in
/// canonical units. Groups come back in first-seen order.
///
/// When a group mixes canonical units the last one seen is reported.
pub fn aggregate(items: &[RawItem]) -> Vec<AggregatedItem> {
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for raw in items {
        let name = normalize_ingredient_name(&raw.item);
        let normalized = normalize(raw.total_quantity, &raw.unit, &name);
        let key = (name, raw.category.clone(), raw.meal_time.clone());

        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.quantity += normalized.value;
                group.unit = normalized.unit;
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    item: key.0,
                    category: key.1,
                    meal_time: key.2,
                    quantity: normalized.value,
                    unit: normalized.unit,
                });
            }
        }
    }

    tracing::debug!(raw = items.len(), merged = groups.len(), "aggregated grocery items");

    groups
        .into_iter()
        .map(|g| AggregatedItem {
            item: g.item,
            total_quantity: display_round(g.quantity),
            unit: g.unit,
            category: g.category,
            meal_time: g.meal_time,
        })
        .collect()
}
