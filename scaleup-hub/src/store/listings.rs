// Listing repository: parsing, search, filtering, and moderation over the
// in-memory listing array.
//
// The remote `structured_listings` object accumulates one write per
// research round (combine-events mode), so the payload arrives either as a
// JSON string or as an array of arrays that needs one level of flattening.
// All mutations are local only; nothing is written back to the remote
// store, so moderation state is lost when the process exits.

use serde_json::Value;
use thiserror::Error;

use crate::model::{Listing, SolutionType};
use crate::protocol::SortOrder;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("listings payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("listings payload has unexpected shape: {0}")]
    UnexpectedShape(String),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the `value` field of a `return_data` response into listings.
///
/// Accepts a JSON string (parsed) or an array (flattened one level, since
/// combine-events accumulation yields an array of per-round arrays). After
/// parsing, every listing gets a non-empty id (`listing_<index>` when the
/// payload carried none); `approved` is already normalized to "true unless
/// explicitly false" by the model's deserializer.
pub fn parse_listings(value: &Value) -> Result<Vec<Listing>, StoreError> {
    let elements: Vec<Value> = match value {
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text)?;
            match parsed {
                Value::Array(items) => items,
                other => {
                    return Err(StoreError::UnexpectedShape(format!(
                        "expected a JSON array, got {}",
                        type_name(&other)
                    )))
                }
            }
        }
        Value::Array(items) => {
            // One level of flattening, like Array.prototype.flat().
            let mut flat = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Array(inner) => flat.extend(inner.iter().cloned()),
                    other => flat.push(other.clone()),
                }
            }
            flat
        }
        other => {
            return Err(StoreError::UnexpectedShape(format!(
                "expected a JSON array or string, got {}",
                type_name(other)
            )))
        }
    };

    let mut listings = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let mut listing: Listing = serde_json::from_value(element)?;
        if listing.id.is_empty() {
            listing.id = format!("listing_{index}");
        }
        listings.push(listing);
    }
    Ok(listings)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Search / filtering
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over name, description, and category
/// strings. An empty query returns the full input set unchanged in order.
pub fn search<'a>(listings: &'a [Listing], query: &str) -> Vec<&'a Listing> {
    if query.is_empty() {
        return listings.iter().collect();
    }
    let needle = query.to_lowercase();
    listings
        .iter()
        .filter(|listing| {
            listing.name.to_lowercase().contains(&needle)
                || listing.description.to_lowercase().contains(&needle)
                || listing
                    .problem_categories
                    .iter()
                    .any(|cat| cat.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Build the solutions-page view: approved listings by default, but a
/// non-empty query searches the whole set and replaces the approved-only
/// baseline; then the optional category and type filters apply, then the
/// sort.
pub fn filter_and_sort(
    listings: &[Listing],
    query: &str,
    category: Option<&str>,
    type_filter: Option<SolutionType>,
    sort: SortOrder,
) -> Vec<Listing> {
    let mut results: Vec<Listing> = if query.is_empty() {
        listings.iter().filter(|l| l.approved).cloned().collect()
    } else {
        search(listings, query).into_iter().cloned().collect()
    };

    if let Some(category) = category {
        let needle = category.to_lowercase();
        results.retain(|listing| {
            listing
                .problem_categories
                .iter()
                .any(|cat| cat.to_lowercase().contains(&needle))
        });
    }

    if let Some(kind) = type_filter {
        results.retain(|listing| listing.kind == kind);
    }

    match sort {
        SortOrder::Rating => results.sort_by(|a, b| {
            let ra = a.rating.unwrap_or(0.0);
            let rb = b.rating.unwrap_or(0.0);
            rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortOrder::Name => results.sort_by(|a, b| a.name.cmp(&b.name)),
    }

    results
}

/// Per-type counts and percentages for the admin analytics tab, over the
/// three concrete solution types.
pub fn type_breakdown(listings: &[Listing]) -> Vec<(SolutionType, usize, f64)> {
    let total = listings.len();
    SolutionType::KNOWN
        .iter()
        .map(|&kind| {
            let count = listings.iter().filter(|l| l.kind == kind).count();
            let percentage = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            (kind, count, percentage)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ListingStore
// ---------------------------------------------------------------------------

/// In-memory listing array with local-only mutation.
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    pub fn new() -> Self {
        ListingStore::default()
    }

    /// Replace the store's contents from a `return_data` payload. On parse
    /// failure the error is returned and existing state is left unchanged.
    pub fn load_value(&mut self, value: &Value) -> Result<usize, StoreError> {
        let listings = parse_listings(value)?;
        let count = listings.len();
        self.listings = listings;
        Ok(count)
    }

    pub fn replace(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
    }

    pub fn clear(&mut self) {
        self.listings.clear();
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Flip a listing's approval flag. O(n) scan; a no-op when the id is
    /// unknown. Returns whether a listing was updated.
    pub fn set_approval(&mut self, id: &str, approved: bool) -> bool {
        match self.listings.iter_mut().find(|l| l.id == id) {
            Some(listing) => {
                listing.approved = approved;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
