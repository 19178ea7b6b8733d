// Listing detail page: full listing record, its reviews with a live
// average, and the review form.
//
// The route stores an index into the full listing array; a stale index
// (listing set replaced underneath the page) renders a fallback message
// rather than panicking.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::{Listing, Review};
use crate::tui::{InputMode, ReviewField, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, index: usize) {
    let Some(listing) = state.listings.get(index) else {
        let paragraph = Paragraph::new("Listing not found (Esc to go back)")
            .block(Block::default().borders(Borders::ALL).title("Listing"));
        frame.render_widget(paragraph, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Percentage(40)])
        .split(area);

    render_overview(frame, sections[0], listing);
    if state.input_mode == InputMode::Review {
        render_review_form(frame, sections[1], state);
    } else {
        render_reviews(frame, sections[1], listing, &state.reviews);
    }
}

fn render_overview(frame: &mut Frame, area: Rect, listing: &Listing) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                listing.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  ({})", listing.kind.label())),
        ]),
        Line::from(listing.description.clone()),
    ];
    if let Some(overview) = &listing.detailed_overview {
        lines.push(Line::from(overview.clone()));
    }
    if let Some(pricing) = &listing.pricing {
        lines.push(Line::from(format!("Pricing: {pricing}")));
    }
    if !listing.features.is_empty() {
        lines.push(Line::from(format!("Features: {}", listing.features.join(", "))));
    }
    if let Some(customer) = &listing.ideal_customer {
        lines.push(Line::from(format!("Ideal for: {customer}")));
    }
    if !listing.problem_categories.is_empty() {
        lines.push(Line::from(format!(
            "Categories: {}",
            listing.problem_categories.join(", ")
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Listing"));
    frame.render_widget(paragraph, area);
}

fn render_reviews(frame: &mut Frame, area: Rect, listing: &Listing, reviews: &[Review]) {
    let own: Vec<&Review> = reviews
        .iter()
        .filter(|r| r.listing_id == listing.id)
        .collect();
    let average = display_rating(listing, &own);

    let mut lines = vec![Line::from(Span::styled(
        format!("{:.1} stars ({} reviews)", average, own.len()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for review in &own {
        lines.push(Line::from(format!(
            "{} {} - {}",
            stars(review.rating),
            review.user,
            review.comment
        )));
    }
    if own.is_empty() {
        lines.push(Line::from(Span::styled(
            "No reviews yet (press w to write one)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Reviews"));
    frame.render_widget(paragraph, area);
}

fn render_review_form(frame: &mut Frame, area: Rect, state: &ViewState) {
    let draft = &state.review_draft;
    let active = |field: ReviewField| {
        if draft.field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("Comment: {}", draft.comment),
            active(ReviewField::Comment),
        )),
        Line::from(Span::styled(
            format!("Name: {}", draft.user),
            active(ReviewField::User),
        )),
        Line::from(Span::styled(
            format!("Rating: {}", stars(draft.rating)),
            active(ReviewField::Rating),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Write a Review"));
    frame.render_widget(paragraph, area);
}

/// Mean of the listing's review ratings; falls back to the static rating
/// when there are no reviews (0.0 when that is absent too).
fn display_rating(listing: &Listing, reviews: &[&Review]) -> f64 {
    if reviews.is_empty() {
        return listing.rating.unwrap_or(0.0);
    }
    let sum: f64 = reviews.iter().map(|r| r.rating as f64).sum();
    sum / reviews.len() as f64
}

fn stars(rating: u8) -> String {
    "*".repeat(rating as usize)
}
