use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::planner::reconcile::ReconcileConfig;
use crate::planner::segmenter::StreamConfig;

/// Process-wide settings, loaded once and shared read-only.
///
/// ```toml
/// [reconcile]
/// target_daily_kcal = 1800
/// tolerance = 25
///
/// [reconcile.meal_fractions]
/// Breakfast = 0.3
/// Lunch = 0.3
/// Snack = 0.1
/// Dinner = 0.3
///
/// [stream]
/// max_days = 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reconcile: ReconcileConfig,
    pub stream: StreamConfig,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::from_file(path)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.reconcile.validate()?;

        if self.stream.end_marker.trim().is_empty() {
            return Err(PlanError::InvalidConfig {
                field: "stream.end_marker".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        if self.stream.max_days == 0 {
            return Err(PlanError::InvalidConfig {
                field: "stream.max_days".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_toml_str("[reconcile]\ntarget_daily_kcal = 1800\n").unwrap();
        assert_eq!(config.reconcile.target_daily_kcal, 1800);
        assert_eq!(config.reconcile.tolerance, 25);
        assert_eq!(config.stream.max_days, 7);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            AppConfig::from_toml_str("[stream]\nmax_days = 0\n"),
            Err(PlanError::InvalidConfig { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("[reconcile]\nround_to = 0\n"),
            Err(PlanError::InvalidConfig { .. })
        ));
        assert!(matches!(
            AppConfig::from_toml_str("reconcile = 3"),
            Err(PlanError::Toml(_))
        ));
    }
}
