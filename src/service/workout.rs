//! Workout plans and closing suggestions.
//!
//! Workout output has no calorie arithmetic to repair, so the model stream is
//! forwarded as-is after the same moderation guard meal plans go through.

use futures_util::{StreamExt, stream};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::planner::constants::MAX_PLAN_DAYS;
use crate::profile::classify_goal;
use crate::service::prompts::{suggestions_prompt, workout_plan_system_prompt, workout_user_message};
use crate::service::{MealPlanService, ModelRequest, PlanModel, TokenStream};

/// Phrases that mark a free-form request carrying its own personal details.
const NATURAL_LANGUAGE_CUES: [&str; 8] = [
    "i am",
    "my height",
    "my weight",
    "i usually work out",
    "days per week",
    "target weight",
    "achieve this goal",
    "activity level",
];

/// What a client asks for when requesting a workout plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRequest {
    #[serde(default)]
    pub goal: String,

    /// Explicit focus; derived from `goal` when empty.
    #[serde(default)]
    pub workout_focus: String,

    #[serde(default)]
    pub prompt: String,

    /// Requested active days. Unreadable values leave the choice to the model.
    #[serde(default, deserialize_with = "lenient_days")]
    pub workout_days: Option<i64>,
}

impl WorkoutRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Requested active days clamped to a week, or `None` when the model
    /// decides.
    pub fn active_days(&self) -> Option<u32> {
        self.workout_days
            .map(|days| days.clamp(1, MAX_PLAN_DAYS as i64) as u32)
    }

    /// Whether the prompt should be read as free text rather than a fixed
    /// schedule.
    pub fn is_natural_language(&self) -> bool {
        let prompt = self.prompt.to_lowercase();
        self.active_days().is_none() || NATURAL_LANGUAGE_CUES.iter().any(|cue| prompt.contains(cue))
    }

    pub fn focus(&self) -> String {
        match self.workout_focus.trim() {
            "" => classify_goal(&self.goal).workout_focus().to_string(),
            focus => focus.to_string(),
        }
    }

    /// Prompt pair for this request; free-text requests get no day count.
    pub fn model_request(&self, end_marker: &str) -> ModelRequest {
        let days = if self.is_natural_language() {
            None
        } else {
            self.active_days()
        };
        ModelRequest {
            system_prompt: workout_plan_system_prompt(&self.focus(), days, &self.prompt, end_marker),
            user_prompt: workout_user_message(&self.goal, days, &self.prompt),
        }
    }

    fn guarded_fields(&self) -> [(&'static str, String); 2] {
        [("goal", self.goal.clone()), ("prompt", self.prompt.clone())]
    }
}

/// Clients send day counts as numbers, numeric strings or `null`.
fn lenient_days<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Inputs for the closing suggestions that follow both plans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub meal_plan_summary: String,
    #[serde(default)]
    pub workout_plan_summary: String,
}

/// Forward `upstream` until its first error, which is yielded and ends it.
fn stop_after_error(upstream: TokenStream) -> TokenStream {
    Box::pin(stream::unfold(Some(upstream), |state| async move {
        let mut upstream = state?;
        match upstream.next().await? {
            Ok(text) => Some((Ok(text), Some(upstream))),
            Err(e) => Some((Err(e), None)),
        }
    }))
}

impl<M: PlanModel> MealPlanService<M> {
    /// Stream a workout plan for `request`, unmodified.
    pub async fn stream_workout_plan(&self, request: &WorkoutRequest) -> Result<TokenStream> {
        self.moderate_fields(request.guarded_fields()).await?;

        let model_request = request.model_request(&self.stream.end_marker);
        let upstream = self.model.stream_plan(&model_request).await?;
        tracing::info!(
            days = ?request.active_days(),
            natural_language = request.is_natural_language(),
            "streaming workout plan"
        );
        Ok(stop_after_error(upstream))
    }

    /// Collect the model's suggestions for a finished pair of plans.
    pub async fn suggestions(&self, request: &SuggestionRequest) -> Result<String> {
        self.moderate_fields([("prompt", request.prompt.clone())]).await?;

        let mut upstream = self.model.stream_plan(&suggestions_prompt(request)).await?;
        let mut text = String::new();
        while let Some(piece) = upstream.next().await {
            text.push_str(&piece?);
        }
        Ok(text)
    }
}
