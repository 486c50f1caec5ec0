pub mod grocery;
pub mod plan;
pub mod profile;

pub use grocery::{AggregatedItem, GroceryList, RawItem};
pub use plan::{DayBlock, Item, MealBlock, MealBody, Quantity};
pub use profile::{CalorieTarget, GoalCategory, UserProfile};
