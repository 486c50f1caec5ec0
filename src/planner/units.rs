use crate::planner::constants::{
    DEFAULT_PIECE_GRAMS, PIECE_UNITS, VOLUMETRIC_UNITS, piece_weight, unit_factor,
};

/// A quantity expressed in a canonical unit.
///
/// `unit` is `g` or `ml` when the input unit was recognised; otherwise it is
/// the cleaned-up input unit and `value` is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: f64,
    pub unit: String,
}

impl Normalized {
    fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Whether the unit is one of the canonical outputs.
    pub fn is_canonical(&self) -> bool {
        self.unit == "g" || self.unit == "ml"
    }
}

/// Reduce a free-text unit to the short form used by the conversion table.
///
/// Lower-cases, trims, drops one trailing plural `s`, then folds the long
/// spellings (`gram`, `liter`, `milli`).
pub fn canonical_unit(unit: &str) -> String {
    let unit = unit.trim().to_lowercase();
    let unit = unit.strip_suffix('s').unwrap_or(&unit);
    unit.replace("gram", "g")
        .replace("liter", "l")
        .replace("milli", "m")
}

/// Convert `value` in `unit` to grams or millilitres.
///
/// Piece units use the per-item weight for `item_type` (100 g when unlisted);
/// a unit that itself names a listed item (`2 bananas`) counts as pieces of
/// that item. Unknown units fall through unchanged.
pub fn normalize(value: f64, unit: &str, item_type: &str) -> Normalized {
    let unit = canonical_unit(unit);

    if PIECE_UNITS.contains(&unit.as_str()) {
        let grams = item_piece_weight(item_type).unwrap_or(DEFAULT_PIECE_GRAMS);
        return Normalized::new(value * grams, "g");
    }

    if let Some(grams) = piece_weight(&unit) {
        return Normalized::new(value * grams, "g");
    }

    if let Some(factor) = unit_factor(&unit) {
        let canonical = if VOLUMETRIC_UNITS.contains(&unit.as_str()) {
            "ml"
        } else {
            "g"
        };
        return Normalized::new(value * factor, canonical);
    }

    tracing::warn!(unit = %unit, item = item_type, "unrecognised unit, passing through");
    Normalized::new(value, unit)
}

fn item_piece_weight(item_type: &str) -> Option<f64> {
    let key = item_type.trim().to_lowercase();
    piece_weight(&key).or_else(|| key.strip_suffix('s').and_then(piece_weight))
}
