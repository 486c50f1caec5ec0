use std::path::{Path, PathBuf};

use crate::error::{PlanError, Result};
use crate::grocery::extract_json;
use crate::models::GroceryList;

/// Outcome of one document in a batch.
#[derive(Debug)]
pub struct DocumentReport {
    pub source: String,
    pub outcome: Result<GroceryList>,
}

impl DocumentReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Process `(source, text)` pairs. A failing document never affects the
/// others.
pub fn process_documents<I, S, T>(documents: I) -> Vec<DocumentReport>
where
    I: IntoIterator<Item = (S, T)>,
    S: Into<String>,
    T: AsRef<str>,
{
    documents
        .into_iter()
        .map(|(source, text)| {
            let source = source.into();
            let outcome = extract_json(text.as_ref());
            if let Err(e) = &outcome {
                tracing::warn!(source = %source, error = %e, "grocery document rejected");
            }
            DocumentReport { source, outcome }
        })
        .collect()
}

fn load_document(path: &Path) -> DocumentReport {
    let source = path.display().to_string();
    let outcome = std::fs::read_to_string(path)
        .map_err(PlanError::from)
        .and_then(|text| extract_json(&text));
    if let Err(e) = &outcome {
        tracing::warn!(source = %source, error = %e, "grocery document rejected");
    }
    DocumentReport { source, outcome }
}

/// Read and process each file; unreadable files are reported like bad JSON.
pub fn load_documents(paths: &[PathBuf]) -> Vec<DocumentReport> {
    paths.iter().map(|p| load_document(p)).collect()
}
