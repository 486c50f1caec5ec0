use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::grocery::batch::DocumentReport;

/// Write every successfully aggregated line to a CSV file, tagged with its
/// source document.
pub fn write_csv(reports: &[DocumentReport], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "source",
        "category",
        "item",
        "total_quantity",
        "unit",
        "meal_time",
    ])?;

    for report in reports {
        let Ok(list) = &report.outcome else {
            continue;
        };
        for item in &list.items {
            wtr.write_record([
                report.source.as_str(),
                item.category.as_str(),
                item.item.as_str(),
                item.total_quantity.to_string().as_str(),
                item.unit.as_str(),
                item.meal_time.as_str(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Batch results as JSON: one entry per document with either `items` or
/// `error`.
pub fn reports_json(reports: &[DocumentReport]) -> serde_json::Value {
    let documents: Vec<_> = reports
        .iter()
        .map(|report| match &report.outcome {
            Ok(list) => serde_json::json!({
                "source": report.source,
                "items": list.items,
            }),
            Err(e) => serde_json::json!({
                "source": report.source,
                "error": e.to_string(),
            }),
        })
        .collect();
    serde_json::json!({ "documents": documents })
}

pub fn write_json(reports: &[DocumentReport], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&reports_json(reports))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
