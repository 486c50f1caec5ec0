use std::collections::HashMap;
use std::sync::LazyLock;

/// Daily calorie target used when the caller supplies none.
pub const DEFAULT_TARGET_DAILY_KCAL: i64 = 2000;

/// Meal kcal deviation (either direction) left uncorrected.
pub const DEFAULT_TOLERANCE_KCAL: i64 = 25;

/// Smallest quantity an item may be scaled down to.
pub const DEFAULT_MIN_QTY: f64 = 5.0;

/// Grid every emitted quantity and kcal value snaps to.
pub const DEFAULT_ROUND_TO: u32 = 5;

/// Largest kcal or quantity figure accepted from a plan line. Blocks with
/// larger figures are passed through unreconciled.
pub const MAX_PLAN_FIGURE: i64 = 1_000_000;

/// Days reconciled per stream; later day blocks pass through verbatim.
pub const MAX_PLAN_DAYS: usize = 7;

/// Literal separating the structured plan from the closing free text.
pub const END_OF_PLAN_MARKER: &str = "END-OF-PLAN SUGGESTION";

/// Fallback gram weight for one piece of an unlisted item.
pub const DEFAULT_PIECE_GRAMS: f64 = 100.0;

/// Separator between the fields of an item line.
pub const ITEM_SEPARATOR: &str = "—";

/// Default unit when an item quantity carries none.
pub const DEFAULT_ITEM_UNIT: &str = "g";

/// Default share of the daily target assigned to each meal slot.
pub const DEFAULT_MEAL_FRACTIONS: [(&str, f64); 4] = [
    ("Breakfast", 0.25),
    ("Lunch", 0.35),
    ("Snack", 0.10),
    ("Dinner", 0.30),
];

// ─────────────────────────────────────────────────────────────────────────────
// Unit tables
// ─────────────────────────────────────────────────────────────────────────────

/// Units that denote a countable piece rather than a measure.
pub const PIECE_UNITS: &[&str] = &["piece", "pc", "pcs", "unit", "units"];

/// Units whose canonical form is millilitres.
pub const VOLUMETRIC_UNITS: &[&str] = &["l", "ml", "cl", "dl", "cup", "tbsp", "tsp"];

/// Multiplier from each known unit to grams or millilitres.
pub static UNIT_CONVERSIONS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("kg", 1000.0);
    m.insert("g", 1.0);
    m.insert("mg", 0.001);
    m.insert("l", 1000.0);
    m.insert("ml", 1.0);
    m.insert("cl", 10.0);
    m.insert("dl", 100.0);
    m.insert("oz", 28.35);
    m.insert("lb", 453.592);
    m.insert("cup", 240.0);
    m.insert("tbsp", 15.0);
    m.insert("tsp", 5.0);
    m
});

/// Gram weight of one piece of common countable items.
pub static PIECE_WEIGHTS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("banana", 120.0);
    m.insert("apple", 180.0);
    m.insert("orange", 150.0);
    m.insert("egg", 50.0);
    m
});

/// Conversion factor for a canonical unit, if known.
pub fn unit_factor(unit: &str) -> Option<f64> {
    UNIT_CONVERSIONS.get(unit).copied()
}

/// Gram weight of one piece of an item, if listed.
pub fn piece_weight(item: &str) -> Option<f64> {
    PIECE_WEIGHTS.get(item).copied()
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile targeting
// ─────────────────────────────────────────────────────────────────────────────

/// Energy in one kilogram of body-weight change.
pub const KCAL_PER_KG_BODY_WEIGHT: f64 = 7700.0;

/// Largest daily surplus or deficit applied when targeting a weight goal.
pub const MAX_DAILY_OFFSET_KCAL: f64 = 1000.0;

/// Activity factor applied when the level is unrecognised.
pub const DEFAULT_ACTIVITY_FACTOR: f64 = 1.55;

/// TDEE multipliers keyed by activity level.
pub static ACTIVITY_FACTORS: LazyLock<HashMap<&'static str, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("sedentary", 1.2);
    m.insert("light", 1.375);
    m.insert("moderate", 1.55);
    m.insert("active", 1.725);
    m.insert("very active", 1.9);
    m
});

/// Get the activity factor for a level, defaulting to moderate.
pub fn activity_factor(level: &str) -> f64 {
    *ACTIVITY_FACTORS
        .get(level.trim().to_lowercase().as_str())
        .unwrap_or(&DEFAULT_ACTIVITY_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fractions_sum_to_one() {
        let sum: f64 = DEFAULT_MEAL_FRACTIONS.iter().map(|(_, f)| f).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_activity_factor_lookup() {
        assert!((activity_factor("Very Active") - 1.9).abs() < 1e-9);
        assert!((activity_factor("couch") - DEFAULT_ACTIVITY_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn test_volumetric_units_have_factors() {
        for unit in VOLUMETRIC_UNITS {
            assert!(unit_factor(unit).is_some(), "{unit} missing factor");
        }
    }
}
