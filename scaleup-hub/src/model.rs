// Domain records: listings, reviews, and API log entries.
//
// These types are the typed face of the remote service's loosely-shaped
// JSON. Every listing field the remote side might omit is optional or
// defaulted; shapes that cannot be mapped at all surface as a parse error
// in the repository layer rather than being coerced here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// SolutionType
// ---------------------------------------------------------------------------

/// What kind of solution a listing is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolutionType {
    Software,
    Course,
    Expert,
    /// Anything the remote side labels with a type we don't know.
    #[serde(other)]
    Other,
}

impl Default for SolutionType {
    fn default() -> Self {
        SolutionType::Other
    }
}

impl SolutionType {
    /// Display label (matches the lowercase wire form, capitalized).
    pub fn label(&self) -> &'static str {
        match self {
            SolutionType::Software => "Software",
            SolutionType::Course => "Course",
            SolutionType::Expert => "Expert",
            SolutionType::Other => "Other",
        }
    }

    /// The three concrete types shown in filters and analytics.
    pub const KNOWN: [SolutionType; 3] = [
        SolutionType::Software,
        SolutionType::Course,
        SolutionType::Expert,
    ];
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// A single business solution shown in the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Unique among current listings. Assigned as `listing_<index>` by the
    /// repository when the remote payload carries no id.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: SolutionType,
    #[serde(default)]
    pub problem_categories: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detailed_overview: Option<String>,
    #[serde(default)]
    pub pricing: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub ideal_customer: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// True unless the payload says `false` explicitly. Flipped only by the
    /// moderation action, in local memory; never written back remotely.
    #[serde(default = "default_true", deserialize_with = "approved_unless_false")]
    pub approved: bool,
}

fn default_true() -> bool {
    true
}

/// `approved` on the wire may be a bool or null; anything that is not
/// literally `false` counts as approved.
fn approved_unless_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<bool>::deserialize(deserializer)?;
    Ok(value != Some(false))
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

/// A user review attached to a listing by id.
///
/// `listing_id` is not validated against the listing set; orphaned reviews
/// are tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(rename = "listingId")]
    pub listing_id: String,
    /// 1-5 stars. Range is enforced by the review form, not here.
    pub rating: u8,
    pub comment: String,
    pub user: String,
}

// ---------------------------------------------------------------------------
// ApiLogEntry
// ---------------------------------------------------------------------------

/// One recorded gateway invocation, success or failure.
#[derive(Debug, Clone, Serialize)]
pub struct ApiLogEntry {
    /// Millisecond timestamp doubling as an id.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub method: String,
    pub payload: Option<Value>,
    pub response: Value,
}
