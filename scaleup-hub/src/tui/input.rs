// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (navigation, search
// text, filters, selection). Text entry runs through small modal input
// states so printable keys don't trigger shortcuts mid-typing.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::{InputMode, ReviewField, ViewState};
use crate::model::SolutionType;
use crate::protocol::{AdminTab, Route, SortOrder, UserCommand};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator. Returns `None` when the key press was handled
/// locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // On Windows, crossterm emits both Press and Release events for each
    // physical keypress; ignoring non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // The raw-data modal swallows the next key press.
    if view_state.show_raw {
        view_state.show_raw = false;
        return None;
    }

    match view_state.input_mode {
        InputMode::Normal => handle_normal_mode(key_event, view_state),
        InputMode::Search => handle_search_mode(key_event, view_state),
        InputMode::Chat => handle_chat_mode(key_event, view_state),
        InputMode::Prompt => handle_prompt_mode(key_event, view_state),
        InputMode::FilePath => handle_file_path_mode(key_event, view_state),
        InputMode::Review => handle_review_mode(key_event, view_state),
    }
}

fn handle_normal_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('q') => return Some(UserCommand::Quit),

        // Page navigation
        KeyCode::Char('h') => view_state.route = Route::Home,
        KeyCode::Char('s') => view_state.route = Route::Solutions,
        KeyCode::Char('u') => view_state.route = Route::Upload,
        KeyCode::Char('a') => {
            if view_state.is_admin {
                view_state.route = Route::Admin;
            } else {
                view_state.status = "Admin mode required (press m)".to_string();
            }
        }

        KeyCode::Char('m') => return Some(UserCommand::ToggleAdmin),
        KeyCode::Char('i') => return Some(UserCommand::Initialize),
        KeyCode::Char('x') => {
            if view_state.is_admin && view_state.route == Route::Admin {
                return Some(UserCommand::DeleteAll);
            }
        }

        KeyCode::Char('c') => {
            view_state.chat_open = true;
            view_state.input_mode = InputMode::Chat;
            view_state.input_text.clear();
        }
        KeyCode::Char('r') => view_state.show_raw = true,
        KeyCode::Char('d') => view_state.dark_mode = !view_state.dark_mode,

        KeyCode::Char('/') => {
            if matches!(view_state.route, Route::Home | Route::Solutions) {
                view_state.input_mode = InputMode::Search;
            }
        }

        // Solutions page filters
        KeyCode::Char('t') => {
            if view_state.route == Route::Solutions {
                view_state.type_filter = cycle_type(view_state.type_filter);
                view_state.selected = 0;
            }
        }
        KeyCode::Char('o') => {
            if view_state.route == Route::Solutions {
                view_state.sort = match view_state.sort {
                    SortOrder::Rating => SortOrder::Name,
                    SortOrder::Name => SortOrder::Rating,
                };
            }
        }

        // Selection movement
        KeyCode::Up | KeyCode::Char('k') => move_selection(view_state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(view_state, 1),

        KeyCode::Enter => match view_state.route {
            Route::Solutions => {
                let visible = view_state.visible_indices();
                if let Some(&full_index) = visible.get(view_state.selected) {
                    view_state.route = Route::ListingDetail(full_index);
                }
            }
            _ => {}
        },

        // Listing detail: open the review form
        KeyCode::Char('w') => {
            if matches!(view_state.route, Route::ListingDetail(_)) {
                view_state.review_draft = Default::default();
                view_state.input_mode = InputMode::Review;
            }
        }

        // Admin panel
        KeyCode::Tab => {
            if view_state.route == Route::Admin {
                view_state.admin_tab = match view_state.admin_tab {
                    AdminTab::Listings => AdminTab::Reviews,
                    AdminTab::Reviews => AdminTab::Analytics,
                    AdminTab::Analytics => AdminTab::Listings,
                };
                view_state.admin_selected = 0;
            }
        }
        KeyCode::Char('y') | KeyCode::Char('n') => {
            if view_state.route == Route::Admin && view_state.admin_tab == AdminTab::Listings {
                if let Some(listing) = view_state.listings.get(view_state.admin_selected) {
                    return Some(UserCommand::SetApproval {
                        id: listing.id.clone(),
                        approved: key_event.code == KeyCode::Char('y'),
                    });
                }
            } else if view_state.route == Route::Upload && key_event.code == KeyCode::Char('n') {
                return Some(UserCommand::ResetWizard);
            }
        }

        // Upload page
        KeyCode::Char('f') => {
            if view_state.route == Route::Upload {
                view_state.input_mode = InputMode::FilePath;
                view_state.input_text.clear();
            }
        }
        KeyCode::Char('p') => {
            if view_state.route == Route::Upload {
                view_state.input_mode = InputMode::Prompt;
                view_state.input_text.clear();
            }
        }
        KeyCode::Char('e') => {
            if view_state.route == Route::Upload {
                return Some(UserCommand::ExportCsv);
            }
        }

        KeyCode::Esc => match view_state.route {
            Route::ListingDetail(_) => view_state.route = Route::Solutions,
            Route::Upload if view_state.wizard.processing => {
                return Some(UserCommand::CancelProcessing);
            }
            _ => {
                view_state.search_text.clear();
                view_state.type_filter = None;
                view_state.selected = 0;
            }
        },

        _ => {}
    }

    None
}

/// None -> Software -> Course -> Expert -> None
fn cycle_type(current: Option<SolutionType>) -> Option<SolutionType> {
    match current {
        None => Some(SolutionType::Software),
        Some(SolutionType::Software) => Some(SolutionType::Course),
        Some(SolutionType::Course) => Some(SolutionType::Expert),
        Some(SolutionType::Expert) | Some(SolutionType::Other) => None,
    }
}

fn move_selection(view_state: &mut ViewState, delta: i64) {
    match view_state.route {
        Route::Solutions => {
            let len = view_state.visible_indices().len();
            view_state.selected = step(view_state.selected, delta, len);
        }
        Route::Admin => {
            let len = match view_state.admin_tab {
                AdminTab::Listings => view_state.listings.len(),
                AdminTab::Reviews => view_state.reviews.len(),
                AdminTab::Analytics => 0,
            };
            view_state.admin_selected = step(view_state.admin_selected, delta, len);
        }
        _ => {}
    }
}

fn step(current: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as i64 + delta;
    next.clamp(0, len as i64 - 1) as usize
}

// ---------------------------------------------------------------------------
// Input modes
// ---------------------------------------------------------------------------

/// Search edits `search_text` live so the list narrows while typing.
fn handle_search_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.search_text.clear();
            view_state.selected = 0;
        }
        KeyCode::Enter => {
            view_state.input_mode = InputMode::Normal;
            view_state.route = Route::Solutions;
            view_state.selected = 0;
        }
        KeyCode::Backspace => {
            view_state.search_text.pop();
            view_state.selected = 0;
        }
        KeyCode::Char(c) => {
            view_state.search_text.push(c);
            view_state.selected = 0;
        }
        _ => {}
    }
    None
}

fn handle_chat_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.chat_open = false;
            view_state.input_mode = InputMode::Normal;
            view_state.input_text.clear();
        }
        KeyCode::Enter => {
            let text = std::mem::take(&mut view_state.input_text);
            if !text.trim().is_empty() {
                return Some(UserCommand::ChatSend(text));
            }
        }
        KeyCode::Backspace => {
            view_state.input_text.pop();
        }
        KeyCode::Char(c) => view_state.input_text.push(c),
        _ => {}
    }
    None
}

fn handle_prompt_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.input_text.clear();
        }
        KeyCode::Enter => {
            view_state.input_mode = InputMode::Normal;
            let prompt = std::mem::take(&mut view_state.input_text);
            if !prompt.trim().is_empty() {
                return Some(UserCommand::Summarize(prompt));
            }
        }
        KeyCode::Backspace => {
            view_state.input_text.pop();
        }
        KeyCode::Char(c) => view_state.input_text.push(c),
        _ => {}
    }
    None
}

fn handle_file_path_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.input_text.clear();
        }
        KeyCode::Enter => {
            view_state.input_mode = InputMode::Normal;
            let path = std::mem::take(&mut view_state.input_text);
            if !path.trim().is_empty() {
                return Some(UserCommand::UploadFile(PathBuf::from(path.trim())));
            }
        }
        KeyCode::Backspace => {
            view_state.input_text.pop();
        }
        KeyCode::Char(c) => view_state.input_text.push(c),
        _ => {}
    }
    None
}

/// Review form: Tab cycles fields, digits set the star rating, Enter
/// submits once both comment and name are filled in.
fn handle_review_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.review_draft = Default::default();
        }
        KeyCode::Tab => {
            view_state.review_draft.field = match view_state.review_draft.field {
                ReviewField::Comment => ReviewField::User,
                ReviewField::User => ReviewField::Rating,
                ReviewField::Rating => ReviewField::Comment,
            };
        }
        KeyCode::Enter => {
            let draft = &view_state.review_draft;
            if draft.comment.trim().is_empty() || draft.user.trim().is_empty() {
                return None;
            }
            let Route::ListingDetail(index) = view_state.route else {
                return None;
            };
            let listing_id = view_state.listings.get(index)?.id.clone();

            let draft = std::mem::take(&mut view_state.review_draft);
            view_state.input_mode = InputMode::Normal;
            return Some(UserCommand::SubmitReview {
                listing_id,
                rating: draft.rating,
                comment: draft.comment,
                user: draft.user,
            });
        }
        KeyCode::Backspace => match view_state.review_draft.field {
            ReviewField::Comment => {
                view_state.review_draft.comment.pop();
            }
            ReviewField::User => {
                view_state.review_draft.user.pop();
            }
            ReviewField::Rating => {}
        },
        KeyCode::Char(c) => match view_state.review_draft.field {
            ReviewField::Comment => view_state.review_draft.comment.push(c),
            ReviewField::User => view_state.review_draft.user.push(c),
            ReviewField::Rating => {
                if let Some(d) = c.to_digit(10) {
                    if (1..=5).contains(&d) {
                        view_state.review_draft.rating = d as u8;
                    }
                }
            }
        },
        _ => {}
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with_listings() -> ViewState {
        let mut state = ViewState::default();
        state.listings = vec![
            serde_json::from_value(json!({
                "id": "listing_0", "name": "Tally Clone", "type": "software",
                "rating": 4.2, "approved": true,
            }))
            .unwrap(),
            serde_json::from_value(json!({
                "id": "listing_1", "name": "Ads Course", "type": "course",
                "rating": 4.8, "approved": true,
            }))
            .unwrap(),
        ];
        state
    }

    #[test]
    fn navigation_keys_switch_routes() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('s')), &mut state).is_none());
        assert_eq!(state.route, Route::Solutions);

        handle_key(key(KeyCode::Char('u')), &mut state);
        assert_eq!(state.route, Route::Upload);

        handle_key(key(KeyCode::Char('h')), &mut state);
        assert_eq!(state.route, Route::Home);
    }

    #[test]
    fn admin_route_requires_admin_mode() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert_eq!(state.route, Route::Home);

        state.is_admin = true;
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert_eq!(state.route, Route::Admin);
    }

    #[test]
    fn q_quits_and_m_toggles_admin() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('m')), &mut state),
            Some(UserCommand::ToggleAdmin)
        );
    }

    #[test]
    fn enter_on_solutions_opens_full_array_index() {
        let mut state = state_with_listings();
        state.route = Route::Solutions;

        // Rating sort puts listing_1 (4.8) first; selecting it must open
        // detail with its index in the full array, not its display row.
        state.selected = 0;
        handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(state.route, Route::ListingDetail(1));
    }

    #[test]
    fn search_mode_edits_live_and_enter_lands_on_solutions() {
        let mut state = state_with_listings();
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert_eq!(state.input_mode, InputMode::Search);

        for c in "tally".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(state.search_text, "tally");

        handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.route, Route::Solutions);
        assert_eq!(state.visible_indices(), vec![0]);
    }

    #[test]
    fn type_filter_cycles_and_sort_toggles() {
        let mut state = ViewState::default();
        state.route = Route::Solutions;

        handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.type_filter, Some(SolutionType::Software));
        handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.type_filter, Some(SolutionType::Course));
        handle_key(key(KeyCode::Char('t')), &mut state);
        handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.type_filter, None);

        handle_key(key(KeyCode::Char('o')), &mut state);
        assert_eq!(state.sort, SortOrder::Name);
    }

    #[test]
    fn review_form_submits_with_listing_id() {
        let mut state = state_with_listings();
        state.route = Route::ListingDetail(0);

        handle_key(key(KeyCode::Char('w')), &mut state);
        assert_eq!(state.input_mode, InputMode::Review);

        for c in "great".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        handle_key(key(KeyCode::Tab), &mut state);
        for c in "Asha".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        handle_key(key(KeyCode::Tab), &mut state);
        handle_key(key(KeyCode::Char('4')), &mut state);

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::SubmitReview {
                listing_id: "listing_0".into(),
                rating: 4,
                comment: "great".into(),
                user: "Asha".into(),
            })
        );
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn review_form_requires_comment_and_name() {
        let mut state = state_with_listings();
        state.route = Route::ListingDetail(0);
        handle_key(key(KeyCode::Char('w')), &mut state);

        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert_eq!(state.input_mode, InputMode::Review);
    }

    #[test]
    fn admin_moderation_keys_emit_set_approval() {
        let mut state = state_with_listings();
        state.is_admin = true;
        state.route = Route::Admin;
        state.admin_selected = 1;

        assert_eq!(
            handle_key(key(KeyCode::Char('n')), &mut state),
            Some(UserCommand::SetApproval {
                id: "listing_1".into(),
                approved: false,
            })
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::SetApproval {
                id: "listing_1".into(),
                approved: true,
            })
        );
    }

    #[test]
    fn delete_all_only_from_admin_page() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());

        state.is_admin = true;
        state.route = Route::Admin;
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut state),
            Some(UserCommand::DeleteAll)
        );
    }

    #[test]
    fn chat_mode_sends_on_enter() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('c')), &mut state);
        assert!(state.chat_open);

        for c in "hi".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ChatSend("hi".into()))
        );

        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.chat_open);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn upload_page_file_path_and_export() {
        let mut state = ViewState::default();
        state.route = Route::Upload;

        handle_key(key(KeyCode::Char('f')), &mut state);
        assert_eq!(state.input_mode, InputMode::FilePath);
        for c in "notes.txt".chars() {
            handle_key(key(KeyCode::Char(c)), &mut state);
        }
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::UploadFile(PathBuf::from("notes.txt")))
        );

        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::ExportCsv)
        );
    }

    #[test]
    fn esc_cancels_processing_on_upload_page() {
        let mut state = ViewState::default();
        state.route = Route::Upload;
        state.wizard.begin(crate::wizard::FileMeta {
            name: "f".into(),
            size_bytes: 1,
        });

        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::CancelProcessing)
        );
    }

    #[test]
    fn raw_modal_swallows_next_key() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('r')), &mut state);
        assert!(state.show_raw);

        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(!state.show_raw);
    }
}
