use std::path::PathBuf;

use clap::Parser;

use fit_plan_rs::grocery::{load_documents, reports_json, write_csv, write_json};
use fit_plan_rs::interface::display_grocery_list;
use fit_plan_rs::logging::init_logger;

#[derive(Parser, Debug)]
#[command(name = "grocery")]
#[command(about = "Aggregate grocery lists extracted from meal-plan documents")]
struct Args {
    /// Grocery JSON documents or raw model responses containing one.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write all aggregated lines to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the batch result as JSON to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the batch result as JSON instead of tables.
    #[arg(long)]
    print_json: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let reports = load_documents(&args.files);

    if args.print_json {
        match serde_json::to_string_pretty(&reports_json(&reports)) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing results: {}", e),
        }
    } else {
        for report in &reports {
            match &report.outcome {
                Ok(list) => display_grocery_list(list, &report.source),
                Err(e) => eprintln!("Skipping {}: {}", report.source, e),
            }
        }
    }

    if let Some(path) = &args.csv {
        match write_csv(&reports, path) {
            Ok(()) => println!("CSV written to {:?}", path),
            Err(e) => eprintln!("Error writing CSV: {}", e),
        }
    }

    if let Some(path) = &args.json {
        match write_json(&reports, path) {
            Ok(()) => println!("JSON written to {:?}", path),
            Err(e) => eprintln!("Error writing JSON: {}", e),
        }
    }

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        eprintln!("{} of {} documents failed", failed, reports.len());
    }
    if failed == reports.len() {
        std::process::exit(1);
    }
}
