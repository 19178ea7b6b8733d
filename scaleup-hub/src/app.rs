// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI with
// results from spawned background tasks (seed pipeline, document extraction,
// chat replies). Maintains the complete application state and pushes UI
// updates to the TUI render loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::chat::{self, ChatState};
use crate::config::Config;
use crate::protocol::{AppEvent, UiUpdate, UserCommand};
use crate::seed::{self, ObjectRegistry};
use crate::store::{ListingStore, ReviewStore};
use crate::wizard::{self, FileMeta, Wizard, CSV_FILENAME};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state. Owned by the event loop; the TUI only
/// ever sees it through `UiUpdate` messages.
pub struct AppState {
    pub config: Config,
    /// Remote gateway, shared with spawned tasks.
    pub api: Arc<ApiClient>,
    pub listings: ListingStore,
    pub reviews: ReviewStore,
    /// Remote objects created this session, for Delete All.
    pub registry: ObjectRegistry,
    pub wizard: Wizard,
    pub chat: ChatState,
    pub is_admin: bool,
    /// Whether the seed pipeline is running.
    pub loading: bool,
    /// Sender for background task events; spawned tasks use a clone of this
    /// sender to report back into the main loop.
    pub events_tx: mpsc::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient, events_tx: mpsc::Sender<AppEvent>) -> Self {
        AppState {
            config,
            api: Arc::new(api),
            listings: ListingStore::new(),
            reviews: ReviewStore::new(),
            registry: ObjectRegistry::new(),
            wizard: Wizard::new(),
            chat: ChatState::new(),
            is_admin: false,
            loading: false,
            events_tx,
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`: user commands from the
/// TUI and events from spawned background tasks. After every handled
/// message the current API log snapshot is pushed so the log panel always
/// reflects the latest remote traffic.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut event_rx: mpsc::Receiver<AppEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                        push_api_log(&state, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_app_event(&mut state, event, &ui_tx).await;
                        push_api_log(&state, &ui_tx).await;
                    }
                    None => {
                        info!("Event channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn push_api_log(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::ApiLog(state.api.log_snapshot())).await;
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Initialize => {
            if state.loading {
                info!("Initialize requested while already running, ignoring");
                return;
            }
            state.loading = true;
            let _ = ui_tx.send(UiUpdate::Loading(true)).await;
            let _ = ui_tx
                .send(UiUpdate::Status("Initializing directory...".into()))
                .await;

            let api = Arc::clone(&state.api);
            let categories = state.config.research.categories.clone();
            let events = state.events_tx.clone();
            tokio::spawn(async move {
                let outcome = seed::initialize(api.as_ref(), &categories, &events).await;
                let _ = events
                    .send(AppEvent::InitFinished {
                        listings: outcome.listings,
                        reviews: outcome.reviews,
                    })
                    .await;
            });
        }

        UserCommand::DeleteAll => {
            if state.registry.is_empty() {
                let _ = ui_tx
                    .send(UiUpdate::Status("No remote objects to delete".into()))
                    .await;
                return;
            }
            let _ = ui_tx
                .send(UiUpdate::Status("Deleting remote objects...".into()))
                .await;

            let api = Arc::clone(&state.api);
            let names = state.registry.names().to_vec();
            let events = state.events_tx.clone();
            tokio::spawn(async move {
                let deleted = seed::delete_all(api.as_ref(), &names).await;
                let _ = events.send(AppEvent::DeleteAllFinished { deleted }).await;
            });
        }

        UserCommand::SubmitReview {
            listing_id,
            rating,
            comment,
            user,
        } => {
            info!(listing_id = listing_id.as_str(), rating, "review submitted");
            state.reviews.add(&listing_id, rating, &comment, &user);
            let _ = ui_tx
                .send(UiUpdate::Reviews(state.reviews.all().to_vec()))
                .await;
            let _ = ui_tx.send(UiUpdate::Status("Review submitted".into())).await;
        }

        UserCommand::SetApproval { id, approved } => {
            if state.listings.set_approval(&id, approved) {
                let verdict = if approved { "approved" } else { "rejected" };
                info!(listing = id.as_str(), verdict, "moderation applied");
                let _ = ui_tx
                    .send(UiUpdate::Listings(state.listings.all().to_vec()))
                    .await;
                let _ = ui_tx
                    .send(UiUpdate::Status(format!("Listing {id} {verdict}")))
                    .await;
            } else {
                warn!(listing = id.as_str(), "moderation target not found");
            }
        }

        UserCommand::UploadFile(path) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            info!(file = name.as_str(), "document upload started");

            // Size is filled in once the file has been read.
            state.wizard.begin(FileMeta { name, size_bytes: 0 });
            let _ = ui_tx
                .send(UiUpdate::Wizard(Box::new(state.wizard.clone())))
                .await;

            let api = Arc::clone(&state.api);
            let events = state.events_tx.clone();
            tokio::spawn(async move {
                let result = wizard::process_document(api.as_ref(), &path).await;
                let _ = events.send(AppEvent::WizardExtracted(result)).await;
            });
        }

        UserCommand::Summarize(prompt) => {
            if prompt.trim().is_empty() || state.wizard.extracted.is_empty() {
                return;
            }
            state.wizard.begin_summary();
            let _ = ui_tx
                .send(UiUpdate::Wizard(Box::new(state.wizard.clone())))
                .await;

            let api = Arc::clone(&state.api);
            let events = state.events_tx.clone();
            tokio::spawn(async move {
                let summary = wizard::summarize(api.as_ref(), &prompt).await;
                let _ = events.send(AppEvent::SummaryReady(summary)).await;
            });
        }

        UserCommand::CancelProcessing => {
            state.wizard.cancel();
            let _ = ui_tx
                .send(UiUpdate::Wizard(Box::new(state.wizard.clone())))
                .await;
        }

        UserCommand::ResetWizard => {
            state.wizard.reset();
            let _ = ui_tx
                .send(UiUpdate::Wizard(Box::new(state.wizard.clone())))
                .await;
        }

        UserCommand::ExportCsv => match wizard::export_csv(&state.wizard.extracted) {
            Some(csv) => match std::fs::write(CSV_FILENAME, csv) {
                Ok(()) => {
                    info!(file = CSV_FILENAME, "extracted data exported");
                    let _ = ui_tx
                        .send(UiUpdate::Status(format!("Exported {CSV_FILENAME}")))
                        .await;
                }
                Err(e) => {
                    warn!(error = %e, "CSV export failed");
                    let _ = ui_tx.send(UiUpdate::Status("CSV export failed".into())).await;
                }
            },
            None => {
                let _ = ui_tx.send(UiUpdate::Status("Nothing to export".into())).await;
            }
        },

        UserCommand::ChatSend(text) => {
            if text.trim().is_empty() {
                return;
            }
            let message = state.chat.push_user(text.clone());
            let _ = ui_tx.send(UiUpdate::ChatMessage(message)).await;
            let _ = ui_tx.send(UiUpdate::ChatTyping(true)).await;

            let events = state.events_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(chat::TYPING_DELAY).await;
                let reply = chat::respond(&text);
                let _ = events.send(AppEvent::ChatReply(reply.to_string())).await;
            });
        }

        UserCommand::ToggleAdmin => {
            state.is_admin = !state.is_admin;
            info!(admin = state.is_admin, "admin mode toggled");
            let _ = ui_tx.send(UiUpdate::AdminMode(state.is_admin)).await;
        }

        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

/// Handle an event reported by a spawned background task.
async fn handle_app_event(state: &mut AppState, event: AppEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    match event {
        AppEvent::ObjectCreated(name) => {
            state.registry.insert(name);
        }

        AppEvent::InitStatus(message) => {
            let _ = ui_tx.send(UiUpdate::Status(message)).await;
        }

        AppEvent::InitFinished { listings, reviews } => {
            state.loading = false;
            let _ = ui_tx.send(UiUpdate::Loading(false)).await;

            match listings {
                Some(listings) => {
                    let count = listings.len();
                    state.listings.replace(listings);
                    let _ = ui_tx
                        .send(UiUpdate::Listings(state.listings.all().to_vec()))
                        .await;
                    let _ = ui_tx
                        .send(UiUpdate::Status(format!("Directory ready: {count} listings")))
                        .await;
                }
                None => {
                    // Listing load failed; keep whatever was shown before.
                    let _ = ui_tx
                        .send(UiUpdate::Status(
                            "Initialization finished with errors".into(),
                        ))
                        .await;
                }
            }

            if !reviews.is_empty() {
                state.reviews.replace(reviews);
                let _ = ui_tx
                    .send(UiUpdate::Reviews(state.reviews.all().to_vec()))
                    .await;
            }
        }

        AppEvent::WizardExtracted(result) => {
            info!(
                file = result.file.name.as_str(),
                rows = result.rows.len(),
                "document extraction finished"
            );
            state.wizard.file = Some(result.file);
            state.wizard.finish_extraction(result.rows);
            let _ = ui_tx
                .send(UiUpdate::Wizard(Box::new(state.wizard.clone())))
                .await;
        }

        AppEvent::SummaryReady(summary) => {
            state.wizard.set_summary(summary);
            let _ = ui_tx
                .send(UiUpdate::Wizard(Box::new(state.wizard.clone())))
                .await;
        }

        AppEvent::ChatReply(text) => {
            let message = state.chat.push_bot(text);
            let _ = ui_tx.send(UiUpdate::ChatMessage(message)).await;
            let _ = ui_tx.send(UiUpdate::ChatTyping(false)).await;
        }

        AppEvent::DeleteAllFinished { deleted } => {
            info!(deleted, "remote objects deleted");
            state.registry.clear();
            state.listings.clear();
            state.api.clear_log();
            let _ = ui_tx.send(UiUpdate::Listings(Vec::new())).await;
            let _ = ui_tx
                .send(UiUpdate::Status(format!("Deleted {deleted} remote objects")))
                .await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
