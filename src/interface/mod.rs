pub mod prompts;
pub mod render;

pub use prompts::{
    collect_profile, prompt_activity_level, prompt_age, prompt_gender, prompt_goal,
    prompt_height, prompt_timeline, prompt_weight, prompt_yes_no,
};
pub use render::{display_calorie_target, display_grocery_list, grocery_table};
