use std::fs;

use serde_json::json;

use fit_plan_rs::error::PlanError;
use fit_plan_rs::grocery::{extract_json, load_documents, process_grocery_data};
use fit_plan_rs::planner::normalize;

#[test]
fn test_chicken_piece_fallback() {
    let data = json!({"items": [
        {"item": "chicken breast", "total_quantity": 200, "unit": "g", "category": "Proteins", "meal_time": "Lunch"},
        {"item": "chicken", "total_quantity": 1, "unit": "piece", "category": "Proteins", "meal_time": "Lunch"}
    ]});
    let list = process_grocery_data(&data).unwrap();
    assert_eq!(list.items.len(), 1);
    let chicken = &list.items[0];
    assert_eq!(chicken.item, "chicken");
    assert_eq!(chicken.total_quantity, 300.0);
    assert_eq!(chicken.category, "Proteins");
    assert_eq!(chicken.meal_time, "Lunch");
}

#[test]
fn test_chicken_mixed_units() {
    let data = json!({"items": [
        {"item": "chicken breast", "total_quantity": 200, "unit": "g", "category": "Protein", "meal_time": "Lunch"},
        {"item": "Chicken breasts", "total_quantity": "0.1", "unit": "kg", "category": "Protein", "meal_time": "Lunch"}
    ]});
    let list = process_grocery_data(&data).unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].item, "chicken");
    assert_eq!(list.items[0].total_quantity, 300.0);
    assert_eq!(list.items[0].unit, "g");
}

#[test]
fn test_normalizer_examples() {
    let oil = normalize(2.0, "tbsp", "oil");
    assert_eq!((oil.value, oil.unit.as_str()), (30.0, "ml"));

    let banana = normalize(1.0, "banana", "banana");
    assert_eq!((banana.value, banana.unit.as_str()), (120.0, "g"));
}

#[test]
fn test_volumes_and_pieces_in_one_list() {
    let response = r#"Sure! Here is the grocery list:
{"items": [
  {"item": "Milk", "total_quantity": 2, "unit": "cups", "category": "Dairy", "meal_time": "Breakfast"},
  {"item": "milk", "total_quantity": 0.5, "unit": "liters", "category": "Dairy", "meal_time": "Breakfast"},
  {"item": "Banana", "total_quantity": 3, "unit": "pieces", "category": "Fruit", "meal_time": "Snack"},
  {"item": "Fresh spinach", "total_quantity": 1, "unit": "handful", "category": "Vegetables", "meal_time": "Dinner"}
]}
Let me know if you need anything else."#;

    let list = extract_json(response).unwrap();
    let names: Vec<_> = list.items.iter().map(|i| i.item.as_str()).collect();
    assert_eq!(names, ["milk", "banana", "spinach"]);

    // 480 ml + 500 ml
    assert_eq!(list.items[0].total_quantity, 980.0);
    assert_eq!(list.items[0].unit, "ml");
    assert_eq!(list.items[1].total_quantity, 360.0);
    assert_eq!(list.items[2].unit, "handful");
}

#[test]
fn test_batch_isolates_bad_documents() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("week1.json");
    let bad = dir.path().join("week2.txt");
    let missing = dir.path().join("week3.json");

    fs::write(
        &good,
        r#"{"items": [{"item": "Rice", "total_quantity": 1, "unit": "kg", "category": "Grains", "meal_time": "Dinner"}]}"#,
    )
    .unwrap();
    fs::write(&bad, r#"{"shopping": ["rice"]}"#).unwrap();

    let reports = load_documents(&[good, bad, missing]);
    assert_eq!(reports.len(), 3);

    let list = reports[0].outcome.as_ref().unwrap();
    assert_eq!(list.items[0].total_quantity, 1000.0);
    assert!(matches!(
        reports[1].outcome,
        Err(PlanError::InvalidGroceryStructure(_))
    ));
    assert!(matches!(reports[2].outcome, Err(PlanError::Io(_))));
}
