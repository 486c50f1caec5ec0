use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// fit_plan: keeps the calorie arithmetic of generated meal plans consistent.
#[derive(Parser, Debug)]
#[command(name = "fit_plan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with reconciliation and stream settings.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a recorded model response through the streaming reconciler.
    Stream {
        /// File holding the raw model output.
        file: PathBuf,

        /// Seed for fragment sizes.
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Largest fragment, in characters.
        #[arg(long, default_value = "16")]
        max_fragment: usize,

        /// Daily calorie target (overrides the config file).
        #[arg(long)]
        target_kcal: Option<i64>,

        /// Free-text request, checked by moderation like a live request.
        #[arg(long, default_value = "")]
        prompt: String,
    },

    /// Replay a recorded workout plan; workout text is forwarded unmodified.
    Workout {
        /// File holding the raw model output.
        file: PathBuf,

        /// Seed for fragment sizes.
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Largest fragment, in characters.
        #[arg(long, default_value = "16")]
        max_fragment: usize,

        /// Free-text goal, used for the focus when `--focus` is absent.
        #[arg(long, default_value = "")]
        goal: String,

        #[arg(long, default_value = "")]
        focus: String,

        /// Active days per week, clamped to 1..=7. Omit to let the model decide.
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,

        #[arg(long, default_value = "")]
        prompt: String,

        /// Print the prompts instead of replaying the file.
        #[arg(long)]
        show_prompt: bool,
    },

    /// Replay recorded suggestions for a finished meal and workout plan.
    Suggest {
        /// File holding the raw model output.
        file: PathBuf,

        #[arg(long, default_value = "")]
        prompt: String,

        #[arg(long, default_value = "")]
        meal_summary: String,

        #[arg(long, default_value = "")]
        workout_summary: String,
    },

    /// Reconcile a single day block read from a file.
    Reconcile {
        file: PathBuf,

        /// Daily calorie target (overrides the config file).
        #[arg(long)]
        target_kcal: Option<i64>,
    },

    /// Convert a quantity to grams or millilitres.
    Normalize {
        value: f64,

        unit: String,

        /// Item the quantity belongs to (used for piece weights).
        #[arg(long, default_value = "")]
        item: String,
    },

    /// Derive a calorie target from an interactively entered profile.
    Profile,

    /// Print the system prompt sent to the model.
    Prompt {
        /// Daily calorie target.
        #[arg(long)]
        target_kcal: Option<i64>,

        /// Dietary restriction (repeatable).
        #[arg(long = "dietary")]
        dietary: Vec<String>,

        /// Allergy (repeatable).
        #[arg(long = "allergy")]
        allergies: Vec<String>,
    },
}
