pub mod cli;
pub mod config;
pub mod error;
pub mod grocery;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod profile;
pub mod service;

pub use config::AppConfig;
pub use error::{PlanError, Result};
pub use models::{DayBlock, GroceryList, Item, MealBlock, UserProfile};
pub use planner::{DayBlockParser, ReconcileConfig, Segmenter, StreamConfig};
pub use service::{MealPlanService, PlanModel, PlanRequest};
