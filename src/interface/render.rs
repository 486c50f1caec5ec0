use std::fmt::Write as _;

use crate::models::{CalorieTarget, GroceryList, UserProfile};

/// Format a grocery list as an aligned table.
pub fn grocery_table(list: &GroceryList) -> String {
    let mut out = String::new();
    if list.items.is_empty() {
        out.push_str("(no grocery items)\n");
        return out;
    }

    let name_width = list.items.iter().map(|i| i.item.len()).max().unwrap_or(4).max(4);
    let category_width = list
        .items
        .iter()
        .map(|i| i.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    let _ = writeln!(
        out,
        "{:<cw$}  {:<nw$}  {:>10}  {}",
        "Category",
        "Item",
        "Quantity",
        "Meal",
        cw = category_width,
        nw = name_width
    );

    let mut last_category: Option<&str> = None;
    for item in &list.items {
        // Print each category once.
        let category = if last_category == Some(item.category.as_str()) {
            ""
        } else {
            item.category.as_str()
        };
        last_category = Some(item.category.as_str());

        let quantity = format!("{}{}", item.total_quantity, item.unit);
        let _ = writeln!(
            out,
            "{:<cw$}  {:<nw$}  {:>10}  {}",
            category,
            item.item,
            quantity,
            item.meal_time,
            cw = category_width,
            nw = name_width
        );
    }
    out
}

/// Display a grocery list.
pub fn display_grocery_list(list: &GroceryList, title: &str) {
    println!();
    println!("=== {} ({} items) ===", title, list.items.len());
    println!();
    print!("{}", grocery_table(list));
    println!();
}

/// Display the targets derived for a profile.
pub fn display_calorie_target(profile: &UserProfile, target: &CalorieTarget) {
    println!();
    println!("=== Calorie Target ===");
    println!();
    println!(
        "Profile: {} y, {:.1} kg, {:.0} cm, {}, {}",
        profile.age, profile.weight, profile.height, profile.gender, profile.activity_level
    );
    println!("Goal: {} ({})", target.goal_category, target.workout_focus);
    println!("BMI: {:.2}", target.bmi);
    println!("TDEE: {} kcal", target.tdee);

    let sign = if target.daily_offset >= 0.0 { "+" } else { "" };
    println!("Daily offset: {}{:.0} kcal", sign, target.daily_offset);
    println!("Target: {} kcal/day", target.target_calories);
    println!();
}
