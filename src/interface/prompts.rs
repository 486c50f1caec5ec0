use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};

use crate::error::{PlanError, Result};
use crate::models::UserProfile;

const GENDERS: [&str; 2] = ["male", "female"];

const ACTIVITY_LEVELS: [&str; 5] = ["sedentary", "light", "moderate", "active", "very active"];

/// Prompt for a number, re-using `default` on empty input.
fn prompt_number<T>(prompt: &str, default: &str) -> Result<T>
where
    T: FromStr,
{
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidInput(format!("Invalid number: {input}")))
}

pub fn prompt_age() -> Result<u32> {
    prompt_number("Age", "30")
}

/// Body weight in kilograms.
pub fn prompt_weight() -> Result<f64> {
    let weight: f64 = prompt_number("Weight (kg)", "70")?;
    if weight <= 0.0 {
        return Err(PlanError::InvalidInput("Weight must be positive".to_string()));
    }
    Ok(weight)
}

/// Height in centimetres.
pub fn prompt_height() -> Result<f64> {
    let height: f64 = prompt_number("Height (cm)", "175")?;
    if height <= 0.0 {
        return Err(PlanError::InvalidInput("Height must be positive".to_string()));
    }
    Ok(height)
}

pub fn prompt_gender() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Gender")
        .items(&GENDERS[..])
        .default(0)
        .interact()?;
    Ok(GENDERS[selection].to_string())
}

pub fn prompt_activity_level() -> Result<String> {
    let selection = Select::new()
        .with_prompt("Activity level")
        .items(&ACTIVITY_LEVELS[..])
        .default(2) // moderate
        .interact()?;
    Ok(ACTIVITY_LEVELS[selection].to_string())
}

/// Free-text goal, e.g. "lose fat before summer".
pub fn prompt_goal() -> Result<String> {
    let goal: String = Input::new()
        .with_prompt("What is your fitness goal?")
        .allow_empty(true)
        .interact_text()?;
    Ok(goal.trim().to_string())
}

pub fn prompt_timeline(current_weight: f64) -> Result<(f64, u32)> {
    let target: f64 = prompt_number("Target weight (kg)", &format!("{current_weight}"))?;
    let weeks: u32 = prompt_number("Timeline (weeks)", "12")?;
    if weeks == 0 {
        return Err(PlanError::InvalidInput(
            "Timeline must be at least one week".to_string(),
        ));
    }
    Ok((target, weeks))
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Collect a full profile interactively.
pub fn collect_profile() -> Result<UserProfile> {
    let age = prompt_age()?;
    let weight = prompt_weight()?;
    let height = prompt_height()?;
    let gender = prompt_gender()?;
    let activity_level = prompt_activity_level()?;
    let goal = prompt_goal()?;
    let (target_weight, timeline_weeks) = prompt_timeline(weight)?;

    Ok(UserProfile {
        age,
        weight,
        height,
        gender,
        activity_level,
        goal,
        target_weight,
        timeline_weeks,
    })
}
