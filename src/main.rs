use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use fit_plan_rs::cli::{Cli, Command};
use fit_plan_rs::config::AppConfig;
use fit_plan_rs::error::Result;
use fit_plan_rs::interface::{collect_profile, display_calorie_target, prompt_yes_no};
use fit_plan_rs::logging::init_logger;
use fit_plan_rs::planner::{DayBlockParser, normalize, reconcile};
use fit_plan_rs::profile::target_calories;
use fit_plan_rs::service::{
    MealPlanService, PlanRequest, RecordedModel, SuggestionRequest, TokenStream, WorkoutRequest,
    meal_plan_system_prompt,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Stream {
            file,
            seed,
            max_fragment,
            target_kcal,
            prompt,
        } => {
            if let Some(target) = target_kcal {
                config.reconcile.target_daily_kcal = target;
            }
            cmd_stream(&config, &file, seed, max_fragment, prompt).await
        }
        Command::Workout {
            file,
            seed,
            max_fragment,
            goal,
            focus,
            days,
            prompt,
            show_prompt,
        } => {
            let request = WorkoutRequest {
                goal,
                workout_focus: focus,
                prompt,
                workout_days: days,
            };
            if show_prompt {
                let prompts = request.model_request(&config.stream.end_marker);
                println!("{}\n\n{}", prompts.system_prompt, prompts.user_prompt);
                return Ok(());
            }
            cmd_workout(&config, &file, seed, max_fragment, &request).await
        }
        Command::Suggest {
            file,
            prompt,
            meal_summary,
            workout_summary,
        } => {
            let request = SuggestionRequest {
                prompt,
                meal_plan_summary: meal_summary,
                workout_plan_summary: workout_summary,
            };
            cmd_suggest(&config, &file, &request).await
        }
        Command::Reconcile { file, target_kcal } => {
            if let Some(target) = target_kcal {
                config.reconcile.target_daily_kcal = target;
            }
            cmd_reconcile(&config, &file)
        }
        Command::Normalize { value, unit, item } => {
            cmd_normalize(value, &unit, &item);
            Ok(())
        }
        Command::Profile => cmd_profile(),
        Command::Prompt {
            target_kcal,
            dietary,
            allergies,
        } => {
            let target = target_kcal.unwrap_or(config.reconcile.target_daily_kcal);
            println!(
                "{}",
                meal_plan_system_prompt(target, &dietary, &allergies, &config.stream.end_marker)
            );
            Ok(())
        }
    }
}

/// Stream a recorded response through the service as a live client would
/// see it.
async fn cmd_stream(
    config: &AppConfig,
    file: &Path,
    seed: u64,
    max_fragment: usize,
    prompt: String,
) -> Result<()> {
    let model = Arc::new(RecordedModel::from_file(file, max_fragment, seed)?);
    let service = MealPlanService::new(model, config.reconcile.clone(), config.stream.clone())?;

    let mut request = PlanRequest::new(config.reconcile.target_daily_kcal);
    request.prompt = prompt;

    let stream = service.stream_meal_plan(&request).await?;
    write_stream(stream).await
}

/// Stream a recorded workout plan.
async fn cmd_workout(
    config: &AppConfig,
    file: &Path,
    seed: u64,
    max_fragment: usize,
    request: &WorkoutRequest,
) -> Result<()> {
    let model = Arc::new(RecordedModel::from_file(file, max_fragment, seed)?);
    let service = MealPlanService::new(model, config.reconcile.clone(), config.stream.clone())?;
    let stream = service.stream_workout_plan(request).await?;
    write_stream(stream).await
}

async fn cmd_suggest(config: &AppConfig, file: &Path, request: &SuggestionRequest) -> Result<()> {
    let model = Arc::new(RecordedModel::from_file(file, usize::MAX, 0)?);
    let service = MealPlanService::new(model, config.reconcile.clone(), config.stream.clone())?;
    println!("{}", service.suggestions(request).await?);
    Ok(())
}

async fn write_stream(mut stream: TokenStream) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    while let Some(piece) = stream.next().await {
        stdout.write_all(piece?.as_bytes()).await?;
    }
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

/// Reconcile one day block and print it.
fn cmd_reconcile(config: &AppConfig, file: &Path) -> Result<()> {
    config.reconcile.validate()?;
    let text = std::fs::read_to_string(file)?;
    let parser = DayBlockParser::new(config.stream.end_marker.clone())?;
    let day = parser.parse(&text)?;

    print!("{}", reconcile(&day, &config.reconcile));
    println!();
    Ok(())
}

fn cmd_normalize(value: f64, unit: &str, item: &str) {
    let normalized = normalize(value, unit, item);
    if normalized.is_canonical() {
        println!("{} {}", normalized.value, normalized.unit);
    } else {
        println!(
            "{} {} (unrecognised unit, unchanged)",
            normalized.value, normalized.unit
        );
    }
}

/// Collect a profile and show its calorie target.
fn cmd_profile() -> Result<()> {
    let profile = collect_profile()?;
    let target = target_calories(&profile)?;
    display_calorie_target(&profile, &target);

    if prompt_yes_no("Print as JSON?", false)? {
        let json = serde_json::json!({ "profile": profile, "target": target });
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}
