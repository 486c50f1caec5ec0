//! Plan generation service.
//!
//! The generative model is an external collaborator behind [`PlanModel`]:
//! it turns a prompt into a token stream and answers moderation checks. The
//! service vets user-supplied text, builds the prompt, and wraps meal-plan
//! streams in a [`Segmenter`] so callers only ever see reconciled text.
//! Workout plans and suggestions are forwarded unmodified (see [`workout`]).

pub mod prompts;
pub mod recorded;
pub mod workout;

pub use prompts::{
    meal_plan_system_prompt, suggestions_prompt, user_message, workout_plan_system_prompt,
    workout_user_message,
};
pub use recorded::{RecordedModel, split_fragments};
pub use workout::{SuggestionRequest, WorkoutRequest};

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::UserProfile;
use crate::planner::parser::DayBlockParser;
use crate::planner::reconcile::ReconcileConfig;
use crate::planner::segmenter::{Segmenter, StreamConfig, reconcile_stream};

/// Text deltas as produced by a model, or by the reconciling wrapper.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationVerdict {
    Allowed,
    Flagged,
}

/// Prompt pair handed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// A source of meal-plan text.
#[async_trait]
pub trait PlanModel: Send + Sync {
    /// Open a token stream for the request. Transport failures during the
    /// stream surface as `PlanError::Upstream` items.
    async fn stream_plan(&self, request: &ModelRequest) -> Result<TokenStream>;

    /// Vet a user-supplied string.
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict>;
}

/// What a client asks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub target_calories: i64,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

impl PlanRequest {
    pub fn new(target_calories: i64) -> Self {
        Self {
            target_calories,
            ..Default::default()
        }
    }

    /// User-supplied fields subject to moderation, by field name.
    fn guarded_fields(&self) -> [(&'static str, String); 3] {
        [
            ("dietary", self.dietary_restrictions.join(" ")),
            ("allergy", self.allergies.join(" ")),
            ("prompt", self.prompt.clone()),
        ]
    }
}

pub struct MealPlanService<M> {
    model: Arc<M>,
    parser: Arc<DayBlockParser>,
    reconcile: ReconcileConfig,
    stream: StreamConfig,
}

impl<M: PlanModel> MealPlanService<M> {
    pub fn new(model: Arc<M>, reconcile: ReconcileConfig, stream: StreamConfig) -> Result<Self> {
        let parser = DayBlockParser::new(stream.end_marker.clone())?;
        Ok(Self {
            model,
            parser: Arc::new(parser),
            reconcile,
            stream,
        })
    }

    /// Run every non-empty user field of a meal-plan request past the
    /// model's moderation check.
    pub async fn moderate_request(&self, request: &PlanRequest) -> Result<()> {
        self.moderate_fields(request.guarded_fields()).await
    }

    async fn moderate_fields<I>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        for (field, value) in fields {
            if value.trim().is_empty() {
                continue;
            }
            let reason = match self.model.moderate(&value).await {
                Ok(ModerationVerdict::Allowed) => continue,
                Ok(ModerationVerdict::Flagged) => format!("{field} failed moderation"),
                Err(e) => e.to_string(),
            };
            tracing::warn!(field, %reason, "request rejected by moderation");
            return Err(PlanError::ModerationRejected {
                field: field.to_string(),
                reason,
            });
        }
        Ok(())
    }

    /// Stream a reconciled meal plan for `request`.
    ///
    /// Moderation runs before the model is contacted. The returned stream
    /// ends after the first upstream error.
    pub async fn stream_meal_plan(&self, request: &PlanRequest) -> Result<TokenStream> {
        if request.target_calories <= 0 {
            return Err(PlanError::InvalidInput(
                "target calories must be positive".to_string(),
            ));
        }
        self.moderate_request(request).await?;

        let model_request = ModelRequest {
            system_prompt: meal_plan_system_prompt(
                request.target_calories,
                &request.dietary_restrictions,
                &request.allergies,
                &self.stream.end_marker,
            ),
            user_prompt: user_message(&request.prompt, request.profile.as_ref()),
        };
        let upstream = self.model.stream_plan(&model_request).await?;

        let config = ReconcileConfig {
            target_daily_kcal: request.target_calories,
            ..self.reconcile.clone()
        };
        config.validate()?;
        tracing::info!(target = config.target_daily_kcal, "streaming meal plan");

        let segmenter = Segmenter::new(self.parser.clone(), Arc::new(config), self.stream.max_days);
        Ok(Box::pin(reconcile_stream(upstream, segmenter)))
    }
}
