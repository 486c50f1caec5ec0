use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{DayBlock, Item, MealBlock, MealBody, Quantity};
use crate::planner::constants::*;

/// Targets and tolerances for calorie reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub target_daily_kcal: i64,
    pub meal_fractions: HashMap<String, f64>,
    pub tolerance: i64,
    pub min_qty: f64,
    pub round_to: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            target_daily_kcal: DEFAULT_TARGET_DAILY_KCAL,
            meal_fractions: DEFAULT_MEAL_FRACTIONS
                .iter()
                .map(|(name, fraction)| (name.to_string(), *fraction))
                .collect(),
            tolerance: DEFAULT_TOLERANCE_KCAL,
            min_qty: DEFAULT_MIN_QTY,
            round_to: DEFAULT_ROUND_TO,
        }
    }
}

impl ReconcileConfig {
    pub fn with_target(target_daily_kcal: i64) -> Self {
        Self {
            target_daily_kcal,
            ..Default::default()
        }
    }

    /// Calorie target for a meal slot, matched case-insensitively.
    pub fn meal_target(&self, meal: &str) -> Option<f64> {
        let meal = meal.trim();
        self.meal_fractions
            .get(meal)
            .or_else(|| {
                self.meal_fractions
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(meal))
                    .map(|(_, fraction)| fraction)
            })
            .map(|fraction| (self.target_daily_kcal as f64 * fraction + 1e-9).floor())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PLAN_FIGURE).contains(&self.target_daily_kcal) {
            return Err(invalid(
                "target_daily_kcal",
                &format!("must be between 1 and {MAX_PLAN_FIGURE}"),
            ));
        }
        if self.round_to == 0 {
            return Err(invalid("round_to", "must be at least 1"));
        }
        if self.tolerance < 0 {
            return Err(invalid("tolerance", "cannot be negative"));
        }
        if !(0.0..=MAX_PLAN_FIGURE as f64).contains(&self.min_qty) {
            return Err(invalid(
                "min_qty",
                &format!("must be between 0 and {MAX_PLAN_FIGURE}"),
            ));
        }
        for (meal, fraction) in &self.meal_fractions {
            if !(0.0..=1.0).contains(fraction) {
                return Err(invalid(
                    &format!("meal_fractions.{meal}"),
                    "must be between 0 and 1",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> PlanError {
    PlanError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Nearest multiple of `grid`.
fn snap(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

/// Smallest multiple of `grid` not below `value`.
fn snap_up(value: f64, grid: f64) -> f64 {
    (value / grid).ceil() * grid
}

/// Rebalance one meal toward its target.
///
/// Meals within tolerance keep their calories; quantities still snap to the
/// grid. Otherwise the gap is spread over items by calorie density and each
/// quantity is clamped to `min_qty`. Drift left by clamping is not corrected.
pub fn reconcile_meal(meal: &MealBlock, config: &ReconcileConfig) -> MealBlock {
    let MealBody::Items(items) = &meal.body else {
        return meal.clone();
    };

    let grid = config.round_to.max(1) as f64;
    let floor = snap_up(config.min_qty, grid);

    let target = config
        .meal_target(&meal.name)
        .unwrap_or(meal.stated_kcal as f64);
    let current = meal.item_kcal();
    let delta = target - current as f64;
    let adjust = delta.abs() > config.tolerance as f64;

    let total_density: f64 = items.iter().map(Item::density).sum();
    let total_density = if total_density > 0.0 { total_density } else { 1.0 };

    let reconciled: Vec<Item> = items
        .iter()
        .map(|item| {
            let density = item.density();
            let (value, kcal) = if adjust && density > 0.0 {
                let delta_kcal = delta * (density / total_density);
                let raw = (item.quantity.value + delta_kcal / density).max(config.min_qty);
                let value = snap(raw, grid).max(floor);
                (value, snap(value * density, grid))
            } else {
                let value = snap(item.quantity.value, grid).max(floor);
                (value, snap(item.kcal as f64, grid))
            };
            Item::new(
                item.name.clone(),
                Quantity::new(value, item.quantity.unit.clone()),
                kcal as i64,
            )
        })
        .collect();

    let stated_kcal = reconciled.iter().map(|i| i.kcal).fold(0, i64::saturating_add);
    if adjust {
        tracing::debug!(
            meal = %meal.name,
            target,
            current,
            delta,
            reconciled = stated_kcal,
            "rebalanced meal"
        );
    }

    MealBlock {
        name: meal.name.clone(),
        stated_kcal,
        body: MealBody::Items(reconciled),
        notes: meal.notes.clone(),
    }
}

/// Reconcile every meal and restate the day total as the sum of meals.
pub fn reconcile_day(block: &DayBlock, config: &ReconcileConfig) -> DayBlock {
    let meals: Vec<MealBlock> = block
        .meals
        .iter()
        .map(|meal| reconcile_meal(meal, config))
        .collect();
    let total = day_total(&meals);

    DayBlock {
        day_number: block.day_number,
        heading: block.heading.clone(),
        meals,
        stated_total_kcal: Some(total),
        trailer: block.trailer.clone(),
    }
}

fn day_total(meals: &[MealBlock]) -> i64 {
    meals.iter().map(|m| m.stated_kcal).fold(0, i64::saturating_add)
}

/// Reconcile a parsed day and render it back into the plan template.
pub fn reconcile(block: &DayBlock, config: &ReconcileConfig) -> String {
    let day = reconcile_day(block, config);
    tracing::debug!(
        day = day.day_number,
        was_balanced = block.is_balanced(),
        stated = ?block.stated_total_kcal,
        reconciled = ?day.stated_total_kcal,
        "reconciled day"
    );
    render_day(&day)
}

/// Serialize a day in the model's template.
///
/// The day total is the sum of the meal headers actually printed.
pub fn render_day(day: &DayBlock) -> String {
    let mut out = String::new();
    let _ = write!(out, "Day {}:{}", day.day_number, day.heading);
    if !out.ends_with('\n') {
        out.push('\n');
    }

    for meal in &day.meals {
        match &meal.body {
            MealBody::Items(items) => {
                let _ = writeln!(out, "- {} ({} kcal):", meal.name, meal.stated_kcal);
                for (i, item) in items.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "  {}. {} {ITEM_SEPARATOR} {}{} {ITEM_SEPARATOR} {} kcal",
                        i + 1,
                        item.name,
                        format_quantity(item.quantity.value),
                        item.quantity.unit,
                        item.kcal
                    );
                }
                for note in &meal.notes {
                    let _ = writeln!(out, "{note}");
                }
            }
            MealBody::Verbatim(raw) => {
                out.push_str(raw);
                if !raw.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    let _ = write!(out, "Total Daily Calories: {} kcal", day_total(&day.meals));
    out.push_str(&day.trailer);
    out
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
