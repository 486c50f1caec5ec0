use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Malformed day block {preview:?}: {reason}")]
    MalformedDayBlock { reason: String, preview: String },

    #[error("Meal section for {meal} could not be isolated")]
    UnmatchedMealSection { meal: String },

    #[error("Invalid grocery structure: {0}")]
    InvalidGroceryStructure(String),

    #[error("{field} failed moderation: {reason}")]
    ModerationRejected { field: String, reason: String },

    #[error("Upstream model stream failed: {0}")]
    Upstream(String),

    #[error("Invalid config value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PlanError {
    /// Build a `MalformedDayBlock` carrying a short preview of the offending text.
    pub fn malformed(text: &str, reason: impl Into<String>) -> Self {
        let preview: String = text.chars().take(40).collect();
        PlanError::MalformedDayBlock {
            reason: reason.into(),
            preview,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
