// Document extraction wizard: a three-step upload -> extract -> results
// flow over the remote gateway, plus the prompt-driven summary and the CSV
// export of the extracted rows.
//
// Failures never escape as errors. A failed extraction produces a single
// marker row carrying an `error` field, and the wizard still advances to
// the results step so the marker is visible.

use std::path::Path;

use serde_json::{json, Value};
use tracing::warn;

use crate::api::{ApiError, RemoteApi};

pub const OBJ_UPLOADED: &str = "uploaded_document";
pub const OBJ_EXTRACTED: &str = "extracted_data";
pub const OBJ_SUMMARY: &str = "document_summary";

/// Where `ExportCsv` writes, relative to the working directory.
pub const CSV_FILENAME: &str = "extracted_data.csv";

const EXTRACTION_PROMPT: &str = "Extract key business data from this document {uploaded_document} and format as structured JSON with fields like name, type, description, pricing, etc.";

const PROCESS_ERROR: &str = "Failed to process file";
const PARSE_ERROR: &str = "Failed to parse extracted data";

// ---------------------------------------------------------------------------
// Wizard state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Upload,
    Processing,
    Results,
}

impl WizardStep {
    /// 1-based position for the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Upload => 1,
            WizardStep::Processing => 2,
            WizardStep::Results => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size_bytes: u64,
}

/// The wizard's whole client-side state. Cloned into the TUI mirror on
/// every change.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    pub step: WizardStep,
    pub file: Option<FileMeta>,
    pub extracted: Vec<Value>,
    pub summary: Option<String>,
    pub processing: bool,
}

impl Wizard {
    pub fn new() -> Self {
        Wizard::default()
    }

    /// A file was accepted; move to the processing step.
    pub fn begin(&mut self, file: FileMeta) {
        self.file = Some(file);
        self.step = WizardStep::Processing;
        self.processing = true;
    }

    /// Extraction finished (rows may be error markers); show results.
    pub fn finish_extraction(&mut self, rows: Vec<Value>) {
        self.extracted = rows;
        self.step = WizardStep::Results;
        self.processing = false;
    }

    pub fn begin_summary(&mut self) {
        self.processing = true;
    }

    pub fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
        self.processing = false;
    }

    /// Clears the processing flag only. Any in-flight remote request keeps
    /// running and its result is still applied when it lands.
    pub fn cancel(&mut self) {
        self.processing = false;
    }

    pub fn reset(&mut self) {
        *self = Wizard::default();
    }
}

/// Outcome of one document run, handed back to the orchestrator.
#[derive(Debug)]
pub struct DocumentResult {
    pub file: FileMeta,
    pub rows: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Extraction pipeline
// ---------------------------------------------------------------------------

/// Read a local file and run the upload/extract/fetch sequence. Any failure
/// along the chain collapses into a single `Failed to process file` marker
/// row.
pub async fn process_document<A: RemoteApi + ?Sized>(api: &A, path: &Path) -> DocumentResult {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(file = name.as_str(), error = %e, "failed to read document");
            return DocumentResult {
                file: FileMeta { name, size_bytes: 0 },
                rows: vec![error_row(PROCESS_ERROR)],
            };
        }
    };
    let file = FileMeta {
        name,
        size_bytes: content.len() as u64,
    };

    let rows = match extract(api, &content).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(file = file.name.as_str(), error = %e, "document extraction failed");
            vec![error_row(PROCESS_ERROR)]
        }
    };

    DocumentResult { file, rows }
}

async fn extract<A: RemoteApi + ?Sized>(api: &A, content: &str) -> Result<Vec<Value>, ApiError> {
    api.input_data(OBJ_UPLOADED, vec![content.to_string()]).await?;
    api.apply_prompt(OBJ_EXTRACTED, EXTRACTION_PROMPT, OBJ_UPLOADED)
        .await?;
    let result = api.return_data(OBJ_EXTRACTED, "json").await?;

    Ok(match result.get("value") {
        // No value means nothing extracted; not an error.
        None | Some(Value::Null) => Vec::new(),
        Some(value) => parse_extracted(value),
    })
}

/// Normalize the service's extraction payload into rows. A JSON string is
/// parsed, a lone object is wrapped into a one-row array, and unparseable
/// text becomes a parse-error marker row.
pub fn parse_extracted(value: &Value) -> Vec<Value> {
    let parsed = match value {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "extracted data is not valid JSON");
                return vec![error_row(PARSE_ERROR)];
            }
        },
        other => other.clone(),
    };

    match parsed {
        Value::Array(rows) => rows,
        single => vec![single],
    }
}

fn error_row(message: &str) -> Value {
    json!({ "error": message })
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Run the user's analysis prompt over the extracted data. Never fails;
/// errors surface as the `Error generating summary` text.
pub async fn summarize<A: RemoteApi + ?Sized>(api: &A, prompt: &str) -> String {
    match run_summary(api, prompt).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "summary generation failed");
            "Error generating summary".to_string()
        }
    }
}

async fn run_summary<A: RemoteApi + ?Sized>(api: &A, prompt: &str) -> Result<String, ApiError> {
    let full_prompt = format!("{prompt} Based on this data: {{extracted_data}}");
    api.apply_prompt(OBJ_SUMMARY, &full_prompt, OBJ_EXTRACTED)
        .await?;
    let result = api.return_data(OBJ_SUMMARY, "pretty_text").await?;

    Ok(match result.get("value") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Null) | Some(Value::String(_)) | None => "No summary generated".to_string(),
        Some(other) => other.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Render the extracted rows as CSV. Headers come from the first row's keys
/// and are written bare; every data field is wrapped in double quotes with
/// no escaping of embedded quotes. Missing, null, false, and zero fields
/// export as empty strings. Returns `None` when there is nothing to export.
pub fn export_csv(rows: &[Value]) -> Option<String> {
    let first = rows.first()?.as_object()?;
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();

    let mut out = headers.join(",");
    for row in rows {
        out.push('\n');
        let line = headers
            .iter()
            .map(|h| format!("\"{}\"", csv_field(row.get(h))))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
    }
    Some(out)
}

fn csv_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                String::new()
            } else {
                n.to_string()
            }
        }
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_are_one_based() {
        assert_eq!(WizardStep::Upload.number(), 1);
        assert_eq!(WizardStep::Processing.number(), 2);
        assert_eq!(WizardStep::Results.number(), 3);
    }

    #[test]
    fn wizard_flow_upload_to_results() {
        let mut wizard = Wizard::new();
        assert_eq!(wizard.step, WizardStep::Upload);

        wizard.begin(FileMeta {
            name: "report.txt".into(),
            size_bytes: 42,
        });
        assert_eq!(wizard.step, WizardStep::Processing);
        assert!(wizard.processing);

        wizard.finish_extraction(vec![json!({ "name": "x" })]);
        assert_eq!(wizard.step, WizardStep::Results);
        assert!(!wizard.processing);
        assert_eq!(wizard.extracted.len(), 1);

        wizard.reset();
        assert_eq!(wizard.step, WizardStep::Upload);
        assert!(wizard.file.is_none());
        assert!(wizard.extracted.is_empty());
    }

    #[test]
    fn cancel_clears_flag_but_keeps_step() {
        let mut wizard = Wizard::new();
        wizard.begin(FileMeta {
            name: "f".into(),
            size_bytes: 1,
        });
        wizard.cancel();
        assert!(!wizard.processing);
        assert_eq!(wizard.step, WizardStep::Processing);
    }

    #[test]
    fn parse_extracted_handles_string_payloads() {
        let rows = parse_extracted(&json!("[{\"name\":\"A\"},{\"name\":\"B\"}]"));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], "B");
    }

    #[test]
    fn parse_extracted_wraps_single_object() {
        let rows = parse_extracted(&json!({ "name": "solo" }));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "solo");
    }

    #[test]
    fn parse_extracted_marks_unparseable_strings() {
        let rows = parse_extracted(&json!("not json at all"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["error"], "Failed to parse extracted data");
    }

    #[test]
    fn csv_quotes_every_field_and_joins_headers_bare() {
        let rows = vec![json!({ "a": "x,y", "b": 1 })];
        assert_eq!(export_csv(&rows).unwrap(), "a,b\n\"x,y\",\"1\"");
    }

    #[test]
    fn csv_empty_and_missing_fields_export_as_empty() {
        let rows = vec![
            json!({ "a": "v", "b": Value::Null }),
            json!({ "a": 0 }),
        ];
        assert_eq!(export_csv(&rows).unwrap(), "a,b\n\"v\",\"\"\n\"\",\"\"");
    }

    #[test]
    fn csv_export_requires_rows() {
        assert!(export_csv(&[]).is_none());
    }
}
