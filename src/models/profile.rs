use serde::{Deserialize, Serialize};

/// Body metrics and goal a user supplies before requesting a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: u32,

    /// Body weight in kilograms.
    pub weight: f64,

    /// Height in centimetres.
    pub height: f64,

    pub gender: String,

    pub activity_level: String,

    /// Free-text goal ("lose fat before summer").
    #[serde(default)]
    pub goal: String,

    pub target_weight: f64,

    pub timeline_weeks: u32,
}

/// Goal family a free-text goal is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    WeightLoss,
    MuscleGain,
    GetFit,
    GetStronger,
    GetFlexible,
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::WeightLoss => "weight_loss",
            GoalCategory::MuscleGain => "muscle_gain",
            GoalCategory::GetFit => "get_fit",
            GoalCategory::GetStronger => "get_stronger",
            GoalCategory::GetFlexible => "get_flexible",
        }
    }

    pub fn workout_focus(&self) -> &'static str {
        match self {
            GoalCategory::WeightLoss => "Fat Burn & Cardio",
            GoalCategory::MuscleGain => "Strength & Hypertrophy",
            GoalCategory::GetFit => "Mixed Cardio and Strength",
            GoalCategory::GetStronger => "Progressive Overload & Compound Lifts",
            GoalCategory::GetFlexible => "Mobility, Yoga, and Stretching",
        }
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived targets for a profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieTarget {
    pub goal_category: GoalCategory,
    pub bmi: f64,
    pub tdee: i64,
    pub daily_offset: f64,
    pub target_calories: i64,
    pub workout_focus: String,
}
