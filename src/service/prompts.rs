use std::fmt::Write as _;

use crate::models::UserProfile;
use crate::planner::constants::{DEFAULT_MEAL_FRACTIONS, ITEM_SEPARATOR, MAX_PLAN_DAYS};
use crate::service::ModelRequest;
use crate::service::workout::SuggestionRequest;

/// Items the model is asked to list per meal.
pub const ITEMS_PER_MEAL: usize = 3;

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

/// System prompt that pins the model to the day-block template the
/// reconciler understands.
pub fn meal_plan_system_prompt(
    target_calories: i64,
    dietary: &[String],
    allergies: &[String],
    end_marker: &str,
) -> String {
    let days: Vec<String> = (1..=MAX_PLAN_DAYS).map(|d| format!("Day {d}")).collect();
    let days = days.join(", ");
    let meals: Vec<&str> = DEFAULT_MEAL_FRACTIONS.iter().map(|(name, _)| *name).collect();
    let sep = ITEM_SEPARATOR;

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a fitness and nutrition assistant. Generate a personalized meal plan.\n"
    );
    let _ = writeln!(prompt, "CORE CONSTRAINTS:");
    let _ = writeln!(
        prompt,
        "- MEAL_PLAN: exactly {MAX_PLAN_DAYS} days ({days}). Each item must include name, grams and exact kcal."
    );
    let _ = writeln!(prompt, "- Never omit, repeat, summarize or abbreviate any day.");
    let _ = writeln!(
        prompt,
        "- If the user asks for a shorter plan, explain why in the end-of-plan suggestion instead."
    );
    let _ = writeln!(prompt, "- Do not use * or bold text.\n");

    let _ = writeln!(prompt, "MEAL_PLAN SPECIFICATIONS:");
    let _ = writeln!(prompt, "1. Each day lists, in order: {}.", meals.join(", "));
    let _ = writeln!(prompt, "2. Each meal lists exactly {ITEMS_PER_MEAL} items.");
    let _ = writeln!(prompt, "3. Item format: Item Name {sep} XXg {sep} YYY kcal.");
    let _ = writeln!(
        prompt,
        "4. After the last meal of a day write: Total Daily Calories: ZZZ kcal."
    );
    let _ = writeln!(prompt, "5. The sum of item calories must equal the total.");
    let _ = writeln!(
        prompt,
        "6. Daily totals must be around {target_calories} kcal."
    );
    let _ = writeln!(
        prompt,
        "7. Respect dietary restrictions ({}) and allergies ({}).\n",
        join_or_none(dietary),
        join_or_none(allergies)
    );

    let _ = writeln!(prompt, "MEAL_PLAN FORMAT:");
    let _ = writeln!(prompt, "Day 1:");
    for meal in &meals {
        let _ = writeln!(prompt, "- {meal} (XXX kcal):");
        for i in 1..=ITEMS_PER_MEAL {
            let _ = writeln!(prompt, "  {i}. Item {sep} XXg {sep} XXX kcal");
        }
    }
    let _ = writeln!(prompt, "Total Daily Calories: ZZZ kcal\n");
    let _ = writeln!(
        prompt,
        "Repeat the full structure for every day through Day {MAX_PLAN_DAYS}.\n"
    );

    let _ = writeln!(prompt, "{end_marker}:");
    let _ = write!(
        prompt,
        "Close with a recommendation tailored to the user's goal, e.g. how long to follow the plan."
    );
    prompt
}

/// User turn: the free-text request plus the profile, when known.
pub fn user_message(prompt: &str, profile: Option<&UserProfile>) -> String {
    let mut message = prompt.trim().to_string();
    if let Some(profile) = profile {
        if let Ok(json) = serde_json::to_string_pretty(profile) {
            let _ = write!(message, "\n\nUSER_PROFILE:\n{json}");
        }
    }
    message
}

/// Exercises per active day.
const EXERCISES_PER_DAY: &str = "6-8";

/// System prompt for a workout week.
///
/// With `active_days` the schedule is fixed and the remaining days are rest
/// days; without it the model reads the frequency from the user's text and
/// defaults to training every day.
pub fn workout_plan_system_prompt(
    workout_focus: &str,
    active_days: Option<u32>,
    user_prompt: &str,
    end_marker: &str,
) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a fitness and nutrition assistant. Generate a personalized workout plan.\n"
    );
    let _ = writeln!(prompt, "CORE CONSTRAINTS:");
    let _ = writeln!(prompt, "- WORKOUT_PLAN: exactly {MAX_PLAN_DAYS} days total.");
    let _ = writeln!(prompt, "- Never omit, repeat, summarize or abbreviate any day.");

    match active_days {
        Some(days) => {
            let _ = writeln!(prompt, "- Non-active days are labeled \"Rest Day\".\n");
            let _ = writeln!(prompt, "WORKOUT_PLAN SPECIFICATIONS:");
            let _ = writeln!(prompt, "1. Days: Day 1 to Day {MAX_PLAN_DAYS}.");
            let _ = writeln!(
                prompt,
                "2. EXACTLY {days} active workout days; the remaining days are Rest Days with no exercises."
            );
            let _ = writeln!(prompt, "3. Weekly schedule as requested: {}", user_prompt.trim());
        }
        None => {
            let _ = writeln!(
                prompt,
                "- DEFAULT TO {MAX_PLAN_DAYS} ACTIVE WORKOUT DAYS (NO REST DAYS) UNLESS THE USER SPECIFIES FEWER.\n"
            );
            let _ = writeln!(prompt, "WORKOUT_PLAN SPECIFICATIONS:");
            let _ = writeln!(prompt, "1. Days: Day 1 to Day {MAX_PLAN_DAYS}.");
            let _ = writeln!(
                prompt,
                "2. Use fewer active days only when the user names a number (\"3 days per week\", \"4-day plan\"); only then add Rest Days."
            );
            let _ = writeln!(prompt, "3. Follow the user's specific requirements from their message.");
        }
    }

    let _ = writeln!(
        prompt,
        "4. Active days (~1 hr): {EXERCISES_PER_DAY} specific exercises, each with sets × reps, excluding warm-up and cool-down."
    );
    let _ = writeln!(
        prompt,
        "   - With 3 or fewer active days, target 2 muscle groups per session; otherwise 1."
    );
    let _ = writeln!(prompt, "5. Workout focus: {workout_focus}.\n");

    let _ = writeln!(prompt, "WORKOUT_PLAN FORMAT:");
    let _ = writeln!(prompt, "Day 1 – [Muscle Focus or Rest Day]:");
    let _ = writeln!(prompt, "1. Exercise {ITEM_SEPARATOR} sets × reps");
    let _ = writeln!(prompt, "...");
    let _ = writeln!(prompt, "Repeat through Day {MAX_PLAN_DAYS}.\n");

    let _ = writeln!(prompt, "{end_marker}:");
    let _ = write!(
        prompt,
        "Close with a recommendation tailored to the user's goal, e.g. how many months to follow the plan."
    );
    prompt
}

/// User turn for a workout request.
pub fn workout_user_message(goal: &str, active_days: Option<u32>, user_prompt: &str) -> String {
    match active_days {
        Some(days) => format!(
            "Generate a workout plan for goal: {}. Need exactly {days} workout days and {} rest days. User prompt: {}",
            goal.trim(),
            (MAX_PLAN_DAYS as u32).saturating_sub(days),
            user_prompt.trim()
        ),
        None => format!(
            "Generate a workout plan based on this user input: {}. If no workout frequency is mentioned, create {MAX_PLAN_DAYS} active workout days with no rest days.",
            user_prompt.trim()
        ),
    }
}

/// Suggestions explaining both plans, followed by personal tips.
pub fn suggestions_prompt(request: &SuggestionRequest) -> ModelRequest {
    let mut system_prompt = String::new();
    let _ = writeln!(
        system_prompt,
        "You are a fitness and nutrition expert. Based on the user's original request and their generated meal and workout plans:"
    );
    let _ = writeln!(system_prompt, "1. Briefly explain what the meal plan focuses on and why.");
    let _ = writeln!(system_prompt, "2. Briefly explain what the workout plan focuses on and why.");
    let _ = writeln!(
        system_prompt,
        "3. Give 5-6 specific, actionable, personalized suggestions.\n"
    );
    let _ = writeln!(system_prompt, "Format:");
    let _ = writeln!(system_prompt, "MEAL PLAN EXPLANATION: ...\n");
    let _ = writeln!(system_prompt, "WORKOUT PLAN EXPLANATION: ...\n");
    let _ = write!(system_prompt, "PERSONALIZED SUGGESTIONS:\n• ...");

    let user_prompt = format!(
        "Original user request: {}\n\nGenerated meal plan summary: {}\n\nGenerated workout plan summary: {}\n\nPlease provide 5-6 personalized suggestions to help this user reach their goals.",
        request.prompt.trim(),
        request.meal_plan_summary.trim(),
        request.workout_plan_summary.trim()
    );

    ModelRequest {
        system_prompt,
        user_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::constants::END_OF_PLAN_MARKER;

    #[test]
    fn test_system_prompt_mentions_template() {
        let prompt = meal_plan_system_prompt(1800, &["vegetarian".to_string()], &[], END_OF_PLAN_MARKER);
        assert!(prompt.contains("exactly 7 days"));
        assert!(prompt.contains("around 1800 kcal"));
        assert!(prompt.contains("(vegetarian) and allergies (none)"));
        assert!(prompt.contains("- Snack (XXX kcal):\n  1. Item — XXg — XXX kcal"));
        assert!(prompt.contains("END-OF-PLAN SUGGESTION:\n"));
    }

    #[test]
    fn test_user_message_appends_profile() {
        let profile = UserProfile {
            age: 30,
            weight: 80.0,
            height: 180.0,
            gender: "female".to_string(),
            activity_level: "light".to_string(),
            goal: String::new(),
            target_weight: 75.0,
            timeline_weeks: 8,
        };
        let message = user_message("  high protein please ", Some(&profile));
        assert!(message.starts_with("high protein please\n\nUSER_PROFILE:\n{"));
        assert!(message.contains("\"activityLevel\": \"light\""));
        assert_eq!(user_message("hi", None), "hi");
    }

    #[test]
    fn test_suggestions_prompt_carries_summaries() {
        let request = SuggestionRequest {
            prompt: "lose 5kg".to_string(),
            meal_plan_summary: "high protein".to_string(),
            workout_plan_summary: "4 strength days".to_string(),
        };
        let prompt = suggestions_prompt(&request);
        assert!(prompt.system_prompt.contains("PERSONALIZED SUGGESTIONS:"));
        assert!(prompt.user_prompt.starts_with("Original user request: lose 5kg\n"));
        assert!(prompt.user_prompt.contains("workout plan summary: 4 strength days"));
    }

    #[test]
    fn test_workout_prompt_keeps_end_marker() {
        let prompt = workout_plan_system_prompt("Core", Some(5), "mornings", END_OF_PLAN_MARKER);
        assert!(prompt.contains("EXACTLY 5 active workout days"));
        assert!(prompt.contains("Workout focus: Core."));
        assert!(prompt.ends_with(&format!("{END_OF_PLAN_MARKER}:\nClose with a recommendation tailored to the user's goal, e.g. how many months to follow the plan.")));
        assert_eq!(
            workout_user_message("get fit", Some(5), "mornings"),
            "Generate a workout plan for goal: get fit. Need exactly 5 workout days and 2 rest days. User prompt: mornings"
        );
    }
}
