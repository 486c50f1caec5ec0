use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PlanError, Result};
use crate::models::{CalorieTarget, GoalCategory, UserProfile};
use crate::planner::constants::{KCAL_PER_KG_BODY_WEIGHT, MAX_DAILY_OFFSET_KCAL, activity_factor};

/// Goal phrasings, checked in order; the first family that matches wins.
static GOAL_PATTERNS: LazyLock<Vec<(GoalCategory, Regex)>> = LazyLock::new(|| {
    [
        (
            GoalCategory::WeightLoss,
            r"(lose|shed|drop)\s+(weight|fat)|fat\s+loss|weight\s+loss|slim\s+down",
        ),
        (
            GoalCategory::MuscleGain,
            r"(gain|build|increase)\s+(muscle|mass)|muscle\s+gain|bulk",
        ),
        (
            GoalCategory::GetStronger,
            r"(get|become|feel)\s+(stronger|strong)|increase\s+strength|lift\s+heavier",
        ),
        (
            GoalCategory::GetFlexible,
            r"(become|get|improve)\s+(flexible|mobility)|yoga|stretching|mobility\s+training",
        ),
        (
            GoalCategory::GetFit,
            r"get\s+fit|(stay|keep)\s+(active|healthy)|overall\s+fitness|improve\s+fitness",
        ),
    ]
    .into_iter()
    .filter_map(|(goal, pattern)| Regex::new(pattern).ok().map(|re| (goal, re)))
    .collect()
});

/// Body-mass index, rounded to two decimals.
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    (value * 100.0).round() / 100.0
}

/// Basal metabolic rate (Mifflin-St Jeor).
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: &str) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    if gender.trim().eq_ignore_ascii_case("male") {
        base + 5.0
    } else {
        base - 161.0
    }
}

/// Total daily energy expenditure, truncated to whole kcal.
pub fn tdee(weight_kg: f64, height_cm: f64, age: u32, gender: &str, activity_level: &str) -> i64 {
    (bmr(weight_kg, height_cm, age, gender) * activity_factor(activity_level)) as i64
}

/// Classify a free-text goal. Unrecognised text means general fitness.
pub fn classify_goal(goal_text: &str) -> GoalCategory {
    let text = goal_text.to_lowercase();
    GOAL_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&text))
        .map(|(goal, _)| *goal)
        .unwrap_or(GoalCategory::GetFit)
}

/// Daily calorie target that reaches `target_weight` over the timeline.
///
/// The daily surplus or deficit is capped at `MAX_DAILY_OFFSET_KCAL`.
pub fn target_calories(profile: &UserProfile) -> Result<CalorieTarget> {
    if profile.timeline_weeks == 0 {
        return Err(PlanError::InvalidInput(
            "timeline must be at least one week".to_string(),
        ));
    }
    if profile.weight <= 0.0 || profile.height <= 0.0 {
        return Err(PlanError::InvalidInput(
            "weight and height must be positive".to_string(),
        ));
    }

    let goal_category = classify_goal(&profile.goal);
    let tdee = tdee(
        profile.weight,
        profile.height,
        profile.age,
        &profile.gender,
        &profile.activity_level,
    );

    let total_change = (profile.target_weight - profile.weight) * KCAL_PER_KG_BODY_WEIGHT;
    let daily_offset = (total_change / (profile.timeline_weeks as f64 * 7.0))
        .clamp(-MAX_DAILY_OFFSET_KCAL, MAX_DAILY_OFFSET_KCAL);
    let target = (tdee as f64 + daily_offset).round() as i64;

    tracing::debug!(
        goal = %goal_category,
        tdee,
        daily_offset,
        target,
        "derived calorie target"
    );

    Ok(CalorieTarget {
        goal_category,
        bmi: bmi(profile.weight, profile.height),
        tdee,
        daily_offset,
        target_calories: target,
        workout_focus: goal_category.workout_focus().to_string(),
    })
}
