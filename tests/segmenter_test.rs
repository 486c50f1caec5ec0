use std::sync::Arc;

use futures_util::{StreamExt, stream};

use fit_plan_rs::error::PlanError;
use fit_plan_rs::planner::{
    END_OF_PLAN_MARKER, ReconcileConfig, Segmenter, SegmenterState, StreamConfig,
    reconcile_stream,
};
use fit_plan_rs::service::{MealPlanService, PlanRequest, RecordedModel, split_fragments};

/// A day whose snack is far off its 200 kcal share of a 2000 kcal target.
fn unbalanced_day(n: usize) -> String {
    format!(
        "Day {n}:\n- Snack (999 kcal):\n  1. Nuts — 30g — 100 kcal\nTotal Daily Calories: 999 kcal\n\n"
    )
}

fn plan(days: usize) -> String {
    let mut text = String::from("Here is your 7-day meal plan.\n\n");
    for n in 1..=days {
        text.push_str(&unbalanced_day(n));
    }
    text.push_str(&format!(
        "{END_OF_PLAN_MARKER}:\nFollow this plan for 3 months. Day 9: rest.\n"
    ));
    text
}

fn segmenter() -> Segmenter {
    Segmenter::from_config(ReconcileConfig::with_target(2000), &StreamConfig::default()).unwrap()
}

#[test]
fn test_output_independent_of_fragmentation() {
    let text = plan(3);
    let whole = segmenter().process([text.as_str()]);

    let by_char: Vec<String> = text.chars().map(String::from).collect();
    assert_eq!(segmenter().process(&by_char), whole);

    for seed in 0..25 {
        let max = 1 + (seed as usize * 7) % 40;
        let fragments = split_fragments(&text, max, seed);
        assert_eq!(segmenter().process(&fragments), whole, "seed {seed}, max {max}");
    }
}

#[test]
fn test_days_reconciled_and_suggestion_verbatim() {
    let out = segmenter().process([plan(3)]);

    assert!(out.starts_with("Here is your 7-day meal plan.\n\nDay 1:\n- Snack (200 kcal):"));
    assert_eq!(out.matches("- Snack (200 kcal):").count(), 3);
    assert_eq!(out.matches("Total Daily Calories: 200 kcal").count(), 3);
    assert!(out.ends_with(&format!(
        "{END_OF_PLAN_MARKER}:\nFollow this plan for 3 months. Day 9: rest.\n"
    )));
}

#[test]
fn test_eighth_day_passes_through() {
    let mut text = String::new();
    for n in 1..=8 {
        text.push_str(&unbalanced_day(n));
    }

    let mut seg = segmenter();
    let mut out = String::new();
    for fragment in split_fragments(&text, 11, 7) {
        out.push_str(&seg.feed(&fragment));
    }
    out.push_str(&seg.finish());

    assert_eq!(seg.days_reconciled(), 7);
    assert_eq!(seg.state(), SegmenterState::Drained);
    assert_eq!(out.matches("- Snack (200 kcal):").count(), 7);
    assert!(out.ends_with(&unbalanced_day(8)));
}

#[test]
fn test_cap_applies_before_marker() {
    let text = plan(8);
    let out = segmenter().process([text.as_str()]);
    assert_eq!(out.matches("- Snack (200 kcal):").count(), 7);
    assert!(out.contains(&unbalanced_day(8)));
}

#[test]
fn test_non_plan_response_is_verbatim() {
    let text = "I can't create a plan for that request.";
    assert_eq!(segmenter().process(text.split_inclusive(' ')), text);
}

#[tokio::test]
async fn test_adapter_matches_sync_output() {
    let text = plan(4);
    let expected = segmenter().process([text.as_str()]);

    let fragments = split_fragments(&text, 9, 3);
    let upstream = stream::iter(fragments.into_iter().map(Ok::<_, PlanError>));
    let items: Vec<String> = reconcile_stream(upstream, segmenter())
        .map(|item| item.unwrap())
        .collect()
        .await;

    assert!(items.iter().all(|piece| piece.chars().count() == 1));
    assert_eq!(items.concat(), expected);
}

#[tokio::test]
async fn test_adapter_stops_after_upstream_error() {
    let upstream = stream::iter(vec![
        Ok(unbalanced_day(1)),
        Ok("Day 2:\n- Snack (999 kcal):\n".to_string()),
        Err(PlanError::Upstream("socket closed".to_string())),
        Ok("  1. Nuts — 30g — 100 kcal\n".to_string()),
    ]);
    let items: Vec<Result<String, PlanError>> =
        reconcile_stream(upstream, segmenter()).collect().await;

    let (errors, text): (Vec<_>, Vec<_>) = items.into_iter().partition(|i| i.is_err());
    assert_eq!(errors.len(), 1);

    let text: String = text.into_iter().map(|i| i.unwrap()).collect();
    assert!(text.starts_with("Day 1:\n- Snack (200 kcal):"));
    assert!(!text.contains("Day 2"));
}

#[tokio::test]
async fn test_service_replays_recorded_plan() {
    let text = plan(2);
    let model = Arc::new(RecordedModel::new(text.clone(), 5, 11));
    let service =
        MealPlanService::new(model, ReconcileConfig::default(), StreamConfig::default()).unwrap();

    let mut request = PlanRequest::new(1000);
    request.prompt = "vegetarian, high protein".to_string();
    let out: Vec<String> = service
        .stream_meal_plan(&request)
        .await
        .unwrap()
        .map(|item| item.unwrap())
        .collect()
        .await;

    // Snack share of 1000 kcal is 100.
    let out = out.concat();
    assert_eq!(out.matches("- Snack (100 kcal):").count(), 2);
    assert!(out.ends_with("Day 9: rest.\n"));
}

#[test]
fn test_unrecognized_day_passes_through_verbatim() {
    let odd_day = "Day 2:\nBreakfast (450 kcal):\n  1. Oats — 80g — 300 kcal\n  2. Milk — 200ml — 150 kcal\nTotal Daily Calories: 450 kcal\n";
    let text = format!("{}{odd_day}{}", unbalanced_day(1), unbalanced_day(3));

    let out = segmenter().process(&split_fragments(&text, 6, 2));
    assert!(out.contains(odd_day));
    assert_eq!(out.matches("- Snack (200 kcal):").count(), 2);
}

#[test]
fn test_extreme_figures_do_not_abort_stream() {
    let huge = "Day 2:\n- Snack (200 kcal):\n  1. Nuts — 30g — 9000000000000000000 kcal\n  2. Seeds — 30g — 9000000000000000000 kcal\nTotal Daily Calories: 200 kcal\n\n";
    let text = format!("{}{huge}{}", unbalanced_day(1), unbalanced_day(3));

    let out = segmenter().process([text.as_str()]);
    assert!(out.contains(huge));
    assert_eq!(out.matches("- Snack (200 kcal):\n  1. Nuts — 60g").count(), 2);
}
