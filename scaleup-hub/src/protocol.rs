// Message types exchanged between the TUI and the app orchestrator.
//
// `UserCommand` flows TUI -> orchestrator, `UiUpdate` flows orchestrator ->
// TUI, and `AppEvent` flows from spawned background tasks (initialize,
// wizard, chat delay) back into the orchestrator loop.

use std::path::PathBuf;

use crate::chat::ChatMessage;
use crate::model::{ApiLogEntry, Listing, Review};
use crate::wizard::{DocumentResult, Wizard};

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// The page the TUI is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Solutions,
    /// Index into the full listings array, not the filtered view.
    ListingDetail(usize),
    Upload,
    Admin,
}

/// Sort order for the solutions page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Highest rating first.
    Rating,
    /// Name A-Z.
    Name,
}

/// Active tab on the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Listings,
    Reviews,
    Analytics,
}

// ---------------------------------------------------------------------------
// UserCommand (TUI -> orchestrator)
// ---------------------------------------------------------------------------

/// Commands the user issues that mutate shared state or start remote work.
/// Pure view concerns (navigation, filters, scrolling) stay inside the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Run the seed/research pipeline.
    Initialize,
    /// Delete every remote object created this session, then clear local
    /// listings and the API log.
    DeleteAll,
    SubmitReview {
        listing_id: String,
        rating: u8,
        comment: String,
        user: String,
    },
    SetApproval {
        id: String,
        approved: bool,
    },
    /// Feed a document into the upload/extraction wizard.
    UploadFile(PathBuf),
    /// Run a prompt-driven summarization over the extracted data.
    Summarize(String),
    /// Clear the wizard's local processing flag. Does not abort any
    /// in-flight remote request.
    CancelProcessing,
    ResetWizard,
    /// Write the extracted rows to extracted_data.csv in the working dir.
    ExportCsv,
    ChatSend(String),
    ToggleAdmin,
    Quit,
}

// ---------------------------------------------------------------------------
// AppEvent (background tasks -> orchestrator)
// ---------------------------------------------------------------------------

/// Results and progress reported by spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// A remote object was created and should be tracked for teardown.
    /// Sent as soon as the creating call succeeds so a later crash still
    /// leaves the name registered.
    ObjectCreated(String),
    /// Human-readable progress line from the initialize pipeline.
    InitStatus(String),
    /// The initialize pipeline finished. `listings` is `None` when the
    /// final load failed; local state is then left unchanged.
    InitFinished {
        listings: Option<Vec<Listing>>,
        reviews: Vec<Review>,
    },
    /// The wizard's upload/extract/fetch sequence finished (success or
    /// error-marker rows).
    WizardExtracted(DocumentResult),
    SummaryReady(String),
    /// Canned chat reply, delivered after the simulated typing delay.
    ChatReply(String),
    DeleteAllFinished {
        deleted: usize,
    },
}

// ---------------------------------------------------------------------------
// UiUpdate (orchestrator -> TUI)
// ---------------------------------------------------------------------------

/// Incremental state pushed to the TUI's render mirror.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Listings(Vec<Listing>),
    Reviews(Vec<Review>),
    ApiLog(Vec<ApiLogEntry>),
    /// Whether the initialize pipeline is running (full-screen loading).
    Loading(bool),
    AdminMode(bool),
    Wizard(Box<Wizard>),
    ChatMessage(ChatMessage),
    ChatTyping(bool),
    /// One-line status message for the status bar.
    Status(String),
}
