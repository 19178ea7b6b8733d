// Seed/research pipeline: populates the remote object store by researching
// each configured category, then structuring the accumulated research into
// listings.
//
// The pipeline is strictly sequential and best-effort: a failed category is
// logged and skipped, a failed final load leaves local listings unchanged.
// There is no idempotence guarantee; running it twice appends duplicate
// research rounds to the combine-events objects.

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::{ApiError, RemoteApi};
use crate::model::{Listing, Review};
use crate::protocol::AppEvent;
use crate::store::listings::parse_listings;
use crate::store::ReviewStore;

// ---------------------------------------------------------------------------
// Remote object names
// ---------------------------------------------------------------------------

pub const OBJ_SUGGESTIONS: &str = "search_suggestions";
pub const OBJ_STORIES: &str = "success_stories";
pub const OBJ_RAW_RESEARCH: &str = "raw_research";
pub const OBJ_LISTINGS: &str = "structured_listings";

// ---------------------------------------------------------------------------
// Static seed content
// ---------------------------------------------------------------------------

/// Search suggestions staged remotely and offered on the home page.
pub const SEARCH_SUGGESTIONS: [&str; 12] = [
    "Improve Cash Flow",
    "Automate Invoicing",
    "Manage Inventory",
    "Digital Marketing",
    "Customer Management",
    "Payroll Processing",
    "Tax Compliance",
    "Sales Tracking",
    "Employee Management",
    "Financial Planning",
    "Business Analytics",
    "Online Presence",
];

/// Suggestions matching the typed input, case-insensitive, capped at four.
pub fn suggestions_for(input: &str) -> Vec<&'static str> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    SEARCH_SUGGESTIONS
        .iter()
        .filter(|s| s.to_lowercase().contains(&needle))
        .take(4)
        .copied()
        .collect()
}

fn success_story() -> serde_json::Value {
    json!({
        "company": "Mumbai Textiles Ltd",
        "challenge": "Manual inventory tracking causing 20% stock wastage",
        "solution": "Implemented AI-powered inventory management system",
        "result": "Reduced wastage by 85% and increased profits by ₹2.5 lakhs monthly",
        "quote": "ScaleUp Hub connected us with the perfect solution. Our business transformed in just 3 months.",
        "image": "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=400",
    })
}

/// Prompt that structures one research round into listing JSON. The
/// `{raw_research}` placeholder is resolved remotely against the named
/// input object.
const LISTING_SCHEMA_PROMPT: &str = r#"Convert this research data {raw_research} into JSON format with these fields for each solution:
{
  "name": "Solution Name",
  "type": "software/course/expert",
  "problem_categories": ["category1", "category2"],
  "description": "Brief description",
  "detailed_overview": "Detailed explanation",
  "pricing": "Pricing info",
  "features": ["feature1", "feature2", "feature3"],
  "ideal_customer": "Target customer description",
  "logo": "https://via.placeholder.com/100x100",
  "rating": 4.2,
  "approved": true,
  "id": "unique_id"
}
Return as a JSON array."#;

// ---------------------------------------------------------------------------
// ObjectRegistry
// ---------------------------------------------------------------------------

/// Remote object names created this session, in creation order, used only
/// to enumerate what the Delete All action should remove.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    names: Vec<String>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        ObjectRegistry::default()
    }

    /// Track a name; repeated inserts of the same name are collapsed.
    pub fn insert(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Result of one initialize run.
#[derive(Debug)]
pub struct InitOutcome {
    /// `None` when the final load failed; the caller leaves listings as-is.
    pub listings: Option<Vec<Listing>>,
    pub reviews: Vec<Review>,
}

/// Run the full seed/research pipeline.
///
/// Created object names are reported through `events` as soon as each
/// creating call succeeds, so a failure later in the pipeline still leaves
/// earlier names registered for teardown.
pub async fn initialize<A: RemoteApi + ?Sized>(
    api: &A,
    categories: &[String],
    events: &mpsc::Sender<AppEvent>,
) -> InitOutcome {
    if let Err(e) = create_seed_objects(api, events).await {
        warn!(error = %e, "seed object creation failed, aborting initialize");
        return InitOutcome {
            listings: None,
            reviews: Vec::new(),
        };
    }

    for category in categories {
        let _ = events
            .send(AppEvent::InitStatus(format!("Researching {category}...")))
            .await;
        research_category(api, category, events).await;
    }

    let listings = match load_listings(api).await {
        Ok(listings) => {
            info!(count = listings.len(), "loaded structured listings");
            Some(listings)
        }
        Err(e) => {
            warn!(error = %e, "failed to load structured listings");
            None
        }
    };

    InitOutcome {
        listings,
        reviews: ReviewStore::sample_reviews(),
    }
}

/// Stage the static seed objects (search suggestions, success story).
/// A failure here aborts the whole pipeline.
async fn create_seed_objects<A: RemoteApi + ?Sized>(
    api: &A,
    events: &mpsc::Sender<AppEvent>,
) -> Result<(), ApiError> {
    let suggestions = SEARCH_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    api.input_data(OBJ_SUGGESTIONS, suggestions).await?;
    let _ = events
        .send(AppEvent::ObjectCreated(OBJ_SUGGESTIONS.into()))
        .await;

    let story = success_story().to_string();
    api.input_data(OBJ_STORIES, vec![story]).await?;
    let _ = events.send(AppEvent::ObjectCreated(OBJ_STORIES.into())).await;

    Ok(())
}

/// One category round: research, then structure into `structured_listings`.
/// Failures are logged and swallowed so the loop proceeds to the next
/// category.
async fn research_category<A: RemoteApi + ?Sized>(
    api: &A,
    category: &str,
    events: &mpsc::Sender<AppEvent>,
) {
    let goal = format!(
        "Find 5-7 specific {category} with names, descriptions, pricing, and key features"
    );
    match api.rapid_research(OBJ_RAW_RESEARCH, &goal).await {
        Ok(_) => {
            let _ = events
                .send(AppEvent::ObjectCreated(OBJ_RAW_RESEARCH.into()))
                .await;
        }
        Err(e) => {
            warn!(category, error = %e, "category research failed");
            return;
        }
    }

    match api
        .apply_prompt(OBJ_LISTINGS, LISTING_SCHEMA_PROMPT, OBJ_RAW_RESEARCH)
        .await
    {
        Ok(_) => {
            let _ = events
                .send(AppEvent::ObjectCreated(OBJ_LISTINGS.into()))
                .await;
        }
        Err(e) => {
            warn!(category, error = %e, "research structuring failed");
        }
    }
}

/// Fetch and parse the accumulated `structured_listings` object.
pub async fn load_listings<A: RemoteApi + ?Sized>(api: &A) -> anyhow::Result<Vec<Listing>> {
    let data = api.return_data(OBJ_LISTINGS, "json").await?;
    let value = data
        .get("value")
        .ok_or_else(|| anyhow::anyhow!("return_data response has no `value` field"))?;
    Ok(parse_listings(value)?)
}

/// Delete every tracked remote object, best-effort. Returns how many
/// deletes succeeded; per-object failures are logged and skipped.
pub async fn delete_all<A: RemoteApi + ?Sized>(api: &A, names: &[String]) -> usize {
    let mut deleted = 0;
    for name in names {
        match api.delete_object(name).await {
            Ok(()) => deleted += 1,
            Err(e) => warn!(object = name.as_str(), error = %e, "failed to delete remote object"),
        }
    }
    deleted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_match_case_insensitively_capped_at_four() {
        assert!(suggestions_for("").is_empty());

        let hits = suggestions_for("MANAGE");
        assert!(hits.len() <= 4);
        assert!(hits.contains(&"Manage Inventory"));
        assert!(hits.contains(&"Customer Management"));

        assert_eq!(suggestions_for("cash"), vec!["Improve Cash Flow"]);
        assert!(suggestions_for("zzz").is_empty());
    }

    #[test]
    fn registry_dedups_and_preserves_order() {
        let mut registry = ObjectRegistry::new();
        registry.insert(OBJ_RAW_RESEARCH.into());
        registry.insert(OBJ_LISTINGS.into());
        registry.insert(OBJ_RAW_RESEARCH.into());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names()[0], OBJ_RAW_RESEARCH);
        assert_eq!(registry.names()[1], OBJ_LISTINGS);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn listing_prompt_references_the_research_object() {
        assert!(LISTING_SCHEMA_PROMPT.contains("{raw_research}"));
        assert!(LISTING_SCHEMA_PROMPT.contains("Return as a JSON array."));
    }

    #[test]
    fn success_story_is_valid_json_with_quote() {
        let story = success_story();
        assert_eq!(story["company"], "Mumbai Textiles Ltd");
        assert!(story["quote"].as_str().unwrap().contains("ScaleUp Hub"));
    }
}
