// TUI browser: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them to `ViewState` and re-renders at ~30 fps. Navigation,
// search text, filters, and selection are purely view concerns and never
// leave this module.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyModifiers};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::chat::{ChatMessage, ChatState};
use crate::config::UiConfig;
use crate::model::{ApiLogEntry, Listing, Review, SolutionType};
use crate::protocol::{AdminTab, Route, SortOrder, UiUpdate, UserCommand};
use crate::store::listings as listing_ops;
use crate::wizard::Wizard;

use layout::build_layout;

// ---------------------------------------------------------------------------
// Input modes
// ---------------------------------------------------------------------------

/// Which text input, if any, currently captures keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Search box on the home/solutions pages.
    Search,
    /// Chat panel input line.
    Chat,
    /// Analysis prompt on the upload page.
    Prompt,
    /// Path of the document to upload.
    FilePath,
    /// Review form on the listing detail page.
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewField {
    #[default]
    Comment,
    User,
    Rating,
}

/// In-progress review form state.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
    pub user: String,
    pub field: ReviewField,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        ReviewDraft {
            rating: 5,
            comment: String::new(),
            user: String::new(),
            field: ReviewField::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the active page.
pub struct ViewState {
    pub route: Route,
    pub listings: Vec<Listing>,
    pub reviews: Vec<Review>,
    pub api_log: Vec<ApiLogEntry>,
    /// Whether the seed pipeline is running (full-screen loading page).
    pub loading: bool,
    pub is_admin: bool,
    pub wizard: Wizard,
    pub chat_open: bool,
    pub chat_messages: Vec<ChatMessage>,
    pub chat_typing: bool,
    /// One-line status message shown in the status bar.
    pub status: String,
    pub search_text: String,
    pub type_filter: Option<SolutionType>,
    pub sort: SortOrder,
    /// Selection index into the visible (filtered/sorted) solutions list.
    pub selected: usize,
    pub admin_tab: AdminTab,
    pub admin_selected: usize,
    /// Raw-data debug modal (first few listings as JSON).
    pub show_raw: bool,
    pub dark_mode: bool,
    pub input_mode: InputMode,
    /// Buffer shared by the single-line input modes.
    pub input_text: String,
    pub review_draft: ReviewDraft,
    /// How many API log rows the log panel shows.
    pub log_panel_entries: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            route: Route::Home,
            listings: Vec::new(),
            reviews: Vec::new(),
            api_log: Vec::new(),
            loading: false,
            is_admin: false,
            wizard: Wizard::new(),
            chat_open: false,
            chat_messages: ChatState::new().messages,
            chat_typing: false,
            status: "Press i to initialize the directory".to_string(),
            search_text: String::new(),
            type_filter: None,
            sort: SortOrder::Rating,
            selected: 0,
            admin_tab: AdminTab::Listings,
            admin_selected: 0,
            show_raw: false,
            dark_mode: false,
            input_mode: InputMode::Normal,
            input_text: String::new(),
            review_draft: ReviewDraft::default(),
            log_panel_entries: UiConfig::default().log_panel_entries,
        }
    }
}

impl ViewState {
    /// Indices into the full listing array for the rows the solutions page
    /// currently shows, in display order. The detail route stores one of
    /// these full-array indices.
    pub fn visible_indices(&self) -> Vec<usize> {
        listing_ops::filter_and_sort(
            &self.listings,
            &self.search_text,
            None,
            self.type_filter,
            self.sort,
        )
        .iter()
        .filter_map(|shown| self.listings.iter().position(|l| l.id == shown.id))
        .collect()
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_indices().len();
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
        if self.admin_selected >= self.listings.len() && !self.listings.is_empty() {
            self.admin_selected = self.listings.len() - 1;
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Listings(listings) => {
            state.listings = listings;
            state.clamp_selection();
            // A detail page for a listing that no longer exists falls back
            // to the solutions page.
            if let Route::ListingDetail(index) = state.route {
                if index >= state.listings.len() {
                    state.route = Route::Solutions;
                }
            }
        }
        UiUpdate::Reviews(reviews) => {
            state.reviews = reviews;
        }
        UiUpdate::ApiLog(entries) => {
            state.api_log = entries;
        }
        UiUpdate::Loading(loading) => {
            state.loading = loading;
        }
        UiUpdate::AdminMode(is_admin) => {
            state.is_admin = is_admin;
            if !is_admin && state.route == Route::Admin {
                state.route = Route::Solutions;
            }
        }
        UiUpdate::Wizard(wizard) => {
            state.wizard = *wizard;
        }
        UiUpdate::ChatMessage(message) => {
            state.chat_messages.push(message);
        }
        UiUpdate::ChatTyping(typing) => {
            state.chat_typing = typing;
        }
        UiUpdate::Status(status) => {
            state.status = status;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame: status bar, the active page, the API log
/// panel, the help bar, and any floating overlays.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);

    match &state.route {
        Route::Home => widgets::home::render(frame, layout.body, state),
        Route::Solutions => widgets::solutions::render(frame, layout.body, state),
        Route::ListingDetail(index) => widgets::detail::render(frame, layout.body, state, *index),
        Route::Upload => widgets::upload::render(frame, layout.body, state),
        Route::Admin => widgets::admin::render(frame, layout.body, state),
    }

    widgets::api_log::render(frame, layout.api_log, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.show_raw {
        widgets::raw_data::render(frame, frame.area(), state);
    }
    if state.chat_open {
        widgets::chat_panel::render(frame, frame.area(), state);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// Initializes the terminal, installs a panic hook that restores it on
/// crash, then runs an async select loop over UI updates, keyboard input,
/// and render ticks. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_config: UiConfig,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Chain our restore hook before the original panic hook.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState {
        log_panel_entries: ui_config.log_panel_entries,
        ..ViewState::default()
    };

    let mut event_stream = EventStream::new();

    // ~30fps render interval
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        // Ctrl+C always quits regardless of mode
                        if key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL)
                        {
                            let _ = cmd_tx.send(UserCommand::Quit).await;
                            break;
                        }
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quitting = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events need no handling
                    }
                    Some(Err(_)) | None => {
                        break;
                    }
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
