pub mod calculations;

pub use calculations::{bmi, bmr, classify_goal, target_calories, tdee};
