use std::sync::Arc;

use futures_util::StreamExt;

use fit_plan_rs::planner::{END_OF_PLAN_MARKER, ReconcileConfig, StreamConfig};
use fit_plan_rs::service::{MealPlanService, RecordedModel, SuggestionRequest, WorkoutRequest};

const WORKOUT: &str = "Day 1 – Chest & Triceps:
1. Bench press — 4 × 8
2. Dips — 3 × 12
Day 2 – Rest Day:
- Snack (999 kcal):
Day 3 – Legs:
1. Back squat — 5 × 5
";

fn service(response: &str) -> MealPlanService<RecordedModel> {
    let model = Arc::new(RecordedModel::new(response, 7, 5));
    MealPlanService::new(model, ReconcileConfig::default(), StreamConfig::default()).unwrap()
}

#[tokio::test]
async fn test_workout_plan_streams_verbatim() {
    let response = format!("{WORKOUT}{END_OF_PLAN_MARKER}:\nStay consistent for 3 months.\n");
    let request: WorkoutRequest = serde_json::from_str(
        r#"{"goal": "build muscle", "prompt": "gym access", "workout_days": "9"}"#,
    )
    .unwrap();
    assert_eq!(request.active_days(), Some(7));

    let out: Vec<String> = service(&response)
        .stream_workout_plan(&request)
        .await
        .unwrap()
        .map(|piece| piece.unwrap())
        .collect()
        .await;

    assert_eq!(out.concat(), response);
}

#[tokio::test]
async fn test_suggestions_collected_whole() {
    let reply = "MEAL PLAN EXPLANATION: protein first.\n\nPERSONALIZED SUGGESTIONS:\n• Drink 2.5L of water daily\n";
    let request = SuggestionRequest {
        prompt: "lose fat".to_string(),
        meal_plan_summary: "1800 kcal".to_string(),
        workout_plan_summary: "4 days".to_string(),
    };
    assert_eq!(service(reply).suggestions(&request).await.unwrap(), reply);
}
