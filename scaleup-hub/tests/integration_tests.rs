// Integration tests for ScaleUp Hub.
//
// These tests exercise the orchestration layers end-to-end through the
// library crate's public API, with a scripted in-memory gateway standing in
// for the remote service: the seed/research pipeline, the document
// extraction wizard, summary generation, teardown, and listing parsing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use scaleup_hub::api::{ApiError, RemoteApi};
use scaleup_hub::protocol::AppEvent;
use scaleup_hub::seed;
use scaleup_hub::wizard;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Scripted gateway: responses are consumed per endpoint in order, every
/// call is recorded, and deletes can be told to fail for specific objects.
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<(String, Option<Value>)>>,
    responses: Mutex<HashMap<String, Vec<Result<Value, ()>>>>,
    deletes: Mutex<Vec<String>>,
    failing_deletes: Vec<String>,
}

impl FakeApi {
    fn new() -> Self {
        FakeApi::default()
    }

    /// Queue the next response for an endpoint. `Err(())` scripts a failure.
    fn script(&self, endpoint: &str, response: Result<Value, ()>) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push(response);
    }

    fn recorded_calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn endpoints(&self) -> Vec<String> {
        self.recorded_calls().into_iter().map(|(e, _)| e).collect()
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn call(
        &self,
        endpoint: &str,
        _method: Method,
        payload: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), payload));

        let scripted = {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(endpoint) {
                Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                _ => None,
            }
        };
        match scripted {
            Some(Ok(value)) => Ok(value),
            Some(Err(())) => Err(ApiError::NotConfigured),
            None => Ok(json!({ "status": "ok" })),
        }
    }

    async fn delete_object(&self, name: &str) -> Result<(), ApiError> {
        if self.failing_deletes.iter().any(|n| n == name) {
            return Err(ApiError::NotConfigured);
        }
        self.deletes.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

fn event_channel() -> (mpsc::Sender<AppEvent>, mpsc::Receiver<AppEvent>) {
    mpsc::channel(64)
}

fn drain(rx: &mut mpsc::Receiver<AppEvent>) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn created_names(events: &[AppEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ObjectCreated(name) => Some(name.as_str()),
            _ => None,
        })
        .collect()
}

// ===========================================================================
// Seed pipeline
// ===========================================================================

#[tokio::test]
async fn initialize_runs_full_pipeline_in_order() {
    let api = FakeApi::new();
    let listings_payload = json!([
        { "id": "listing_0", "name": "Tally Clone", "type": "software", "rating": 4.2 },
        { "name": "Ads Course", "type": "course", "approved": false },
    ]);
    api.script(
        "/return_data",
        Ok(json!({ "value": listings_payload.to_string() })),
    );

    let (tx, mut rx) = event_channel();
    let categories = vec![
        "Accounting software for small business India".to_string(),
        "Digital marketing courses for SMB".to_string(),
    ];
    let outcome = seed::initialize(&api, &categories, &tx).await;

    // Two seed uploads, then research + structuring per category, then the
    // final load.
    assert_eq!(
        api.endpoints(),
        vec![
            "/input_data",
            "/input_data",
            "/rapid_research",
            "/apply_prompt",
            "/rapid_research",
            "/apply_prompt",
            "/return_data",
        ]
    );

    let listings = outcome.listings.expect("final load succeeded");
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].id, "listing_0");
    assert!(listings[0].approved);
    // Missing id is filled from the array position.
    assert_eq!(listings[1].id, "listing_1");
    assert!(!listings[1].approved);

    assert_eq!(outcome.reviews.len(), 3);

    let events = drain(&mut rx);
    assert_eq!(
        created_names(&events),
        vec![
            "search_suggestions",
            "success_stories",
            "raw_research",
            "structured_listings",
            "raw_research",
            "structured_listings",
        ]
    );
    let statuses: Vec<&AppEvent> = events
        .iter()
        .filter(|e| matches!(e, AppEvent::InitStatus(_)))
        .collect();
    assert_eq!(statuses.len(), 2);
}

#[tokio::test]
async fn initialize_aborts_when_seed_upload_fails() {
    let api = FakeApi::new();
    api.script("/input_data", Err(()));

    let (tx, mut rx) = event_channel();
    let categories = vec!["Finance software".to_string()];
    let outcome = seed::initialize(&api, &categories, &tx).await;

    assert!(outcome.listings.is_none());
    assert!(outcome.reviews.is_empty());
    // Nothing past the first failed upload.
    assert_eq!(api.endpoints(), vec!["/input_data"]);
    assert!(created_names(&drain(&mut rx)).is_empty());
}

#[tokio::test]
async fn initialize_skips_failed_category_and_continues() {
    let api = FakeApi::new();
    api.script("/rapid_research", Err(()));
    api.script(
        "/return_data",
        Ok(json!({ "value": json!([{ "name": "Solo", "type": "expert" }]).to_string() })),
    );

    let (tx, mut rx) = event_channel();
    let categories = vec![
        "Broken category".to_string(),
        "Working category".to_string(),
    ];
    let outcome = seed::initialize(&api, &categories, &tx).await;

    // First category's research fails; its apply_prompt never runs.
    assert_eq!(
        api.endpoints(),
        vec![
            "/input_data",
            "/input_data",
            "/rapid_research",
            "/rapid_research",
            "/apply_prompt",
            "/return_data",
        ]
    );
    assert_eq!(outcome.listings.expect("load succeeded").len(), 1);

    let events = drain(&mut rx);
    assert_eq!(
        created_names(&events),
        vec![
            "search_suggestions",
            "success_stories",
            "raw_research",
            "structured_listings",
        ]
    );
}

#[tokio::test]
async fn initialize_keeps_reviews_when_final_load_fails() {
    let api = FakeApi::new();
    api.script("/return_data", Err(()));

    let (tx, _rx) = event_channel();
    let categories = vec!["Finance software".to_string()];
    let outcome = seed::initialize(&api, &categories, &tx).await;

    assert!(outcome.listings.is_none());
    assert_eq!(outcome.reviews.len(), 3);
}

#[tokio::test]
async fn load_listings_flattens_accumulated_rounds() {
    let api = FakeApi::new();
    // Combine-events accumulation: one inner array per research round.
    api.script(
        "/return_data",
        Ok(json!({
            "value": [
                [{ "name": "A", "type": "software" }],
                [{ "name": "B", "type": "course" }, { "name": "C", "type": "expert" }],
            ]
        })),
    );

    let listings = seed::load_listings(&api).await.unwrap();
    assert_eq!(listings.len(), 3);
    assert_eq!(listings[2].id, "listing_2");
}

#[tokio::test]
async fn delete_all_counts_successes_and_skips_failures() {
    let mut api = FakeApi::new();
    api.failing_deletes = vec!["raw_research".to_string()];

    let names = vec![
        "search_suggestions".to_string(),
        "raw_research".to_string(),
        "structured_listings".to_string(),
    ];
    let deleted = seed::delete_all(&api, &names).await;

    assert_eq!(deleted, 2);
    assert_eq!(
        *api.deletes.lock().unwrap(),
        vec!["search_suggestions", "structured_listings"]
    );
}

// ===========================================================================
// Document wizard
// ===========================================================================

fn temp_document(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("scaleup-hub-test-{name}"));
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn process_document_extracts_rows_from_string_payload() {
    let api = FakeApi::new();
    let rows = json!([
        { "name": "Vendor A", "pricing": "₹999/month" },
        { "name": "Vendor B", "pricing": "Free" },
    ]);
    api.script("/return_data", Ok(json!({ "value": rows.to_string() })));

    let path = temp_document("invoice.txt", "invoice data here");
    let result = wizard::process_document(&api, &path).await;
    std::fs::remove_file(&path).ok();

    assert_eq!(result.file.name, "scaleup-hub-test-invoice.txt");
    assert_eq!(result.file.size_bytes, "invoice data here".len() as u64);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0]["name"], "Vendor A");
    assert_eq!(
        api.endpoints(),
        vec!["/input_data", "/apply_prompt", "/return_data"]
    );

    // The staged upload carries the file content verbatim.
    let calls = api.recorded_calls();
    let upload = calls[0].1.as_ref().unwrap();
    assert_eq!(upload["input_data"], json!(["invoice data here"]));
}

#[tokio::test]
async fn process_document_collapses_remote_failure_into_marker_row() {
    let api = FakeApi::new();
    api.script("/apply_prompt", Err(()));

    let path = temp_document("broken.txt", "content");
    let result = wizard::process_document(&api, &path).await;
    std::fs::remove_file(&path).ok();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["error"], "Failed to process file");
}

#[tokio::test]
async fn process_document_handles_missing_file() {
    let api = FakeApi::new();
    let result =
        wizard::process_document(&api, std::path::Path::new("/no/such/file.txt")).await;

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0]["error"], "Failed to process file");
    // No remote call is made for an unreadable file.
    assert!(api.endpoints().is_empty());
}

#[tokio::test]
async fn summarize_appends_data_placeholder_to_prompt() {
    let api = FakeApi::new();
    api.script("/return_data", Ok(json!({ "value": "Revenue is trending up." })));

    let summary = wizard::summarize(&api, "Summarize the key trends.").await;
    assert_eq!(summary, "Revenue is trending up.");

    let calls = api.recorded_calls();
    let prompt = calls[0].1.as_ref().unwrap()["prompt_string"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        prompt,
        "Summarize the key trends. Based on this data: {extracted_data}"
    );
}

#[tokio::test]
async fn summarize_falls_back_on_empty_and_failed_responses() {
    let api = FakeApi::new();
    api.script("/return_data", Ok(json!({ "value": "" })));
    assert_eq!(wizard::summarize(&api, "p").await, "No summary generated");

    api.script("/return_data", Ok(json!({ "value": Value::Null })));
    assert_eq!(wizard::summarize(&api, "p").await, "No summary generated");

    api.script("/apply_prompt", Err(()));
    assert_eq!(wizard::summarize(&api, "p").await, "Error generating summary");
}
