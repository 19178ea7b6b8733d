// Review repository: append-only in-memory review array.
//
// Reviews are never edited or deleted by the UI logic (the admin panel's
// "Remove" affordance is not wired to a mutation). `listing_id` is not
// checked against the listing set; orphaned reviews are tolerated.

use chrono::Utc;

use crate::model::{Listing, Review};

/// In-memory review array, seeded with static samples by the initialize
/// pipeline.
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: Vec<Review>,
}

impl ReviewStore {
    pub fn new() -> Self {
        ReviewStore::default()
    }

    /// The static sample set loaded after initialization.
    pub fn sample_reviews() -> Vec<Review> {
        vec![
            Review {
                id: "review_1".into(),
                listing_id: "listing_0".into(),
                rating: 5,
                comment: "Excellent solution, transformed our business!".into(),
                user: "Rajesh Kumar".into(),
            },
            Review {
                id: "review_2".into(),
                listing_id: "listing_0".into(),
                rating: 4,
                comment: "Good value for money, easy to use.".into(),
                user: "Priya Sharma".into(),
            },
            Review {
                id: "review_3".into(),
                listing_id: "listing_1".into(),
                rating: 5,
                comment: "Best investment we made for our company.".into(),
                user: "Amit Patel".into(),
            },
        ]
    }

    pub fn replace(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
    }

    pub fn all(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// Append a review with a timestamp-derived id. Rating range and
    /// non-empty comment are the form's responsibility, not enforced here.
    pub fn add(&mut self, listing_id: &str, rating: u8, comment: &str, user: &str) -> &Review {
        let review = Review {
            id: format!("review_{}", Utc::now().timestamp_millis()),
            listing_id: listing_id.to_string(),
            rating,
            comment: comment.to_string(),
            user: user.to_string(),
        };
        self.reviews.push(review);
        self.reviews.last().expect("just pushed")
    }

    pub fn for_listing<'a>(&'a self, listing_id: &str) -> Vec<&'a Review> {
        self.reviews
            .iter()
            .filter(|r| r.listing_id == listing_id)
            .collect()
    }

    /// Arithmetic mean of the listing's review ratings; a listing with no
    /// reviews falls back to its own static rating (0.0 when absent).
    pub fn average_for(&self, listing: &Listing) -> f64 {
        let reviews = self.for_listing(&listing.id);
        if reviews.is_empty() {
            return listing.rating.unwrap_or(0.0);
        }
        let sum: f64 = reviews.iter().map(|r| r.rating as f64).sum();
        sum / reviews.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SolutionType;

    fn listing_with_rating(id: &str, rating: Option<f64>) -> Listing {
        Listing {
            id: id.into(),
            name: "Test".into(),
            kind: SolutionType::Software,
            problem_categories: vec![],
            description: String::new(),
            detailed_overview: None,
            pricing: None,
            features: vec![],
            ideal_customer: None,
            logo: None,
            rating,
            approved: true,
        }
    }

    #[test]
    fn average_is_mean_of_review_ratings() {
        let mut store = ReviewStore::new();
        store.add("listing_0", 5, "great", "A");
        store.add("listing_0", 4, "good", "B");
        store.add("listing_1", 1, "other listing", "C");

        let listing = listing_with_rating("listing_0", Some(3.0));
        assert!((store.average_for(&listing) - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn average_falls_back_to_static_rating() {
        let store = ReviewStore::new();
        let listing = listing_with_rating("listing_0", Some(4.2));
        assert!((store.average_for(&listing) - 4.2).abs() < f64::EPSILON);

        let unrated = listing_with_rating("listing_1", None);
        assert_eq!(store.average_for(&unrated), 0.0);
    }

    #[test]
    fn add_appends_with_unique_listing_scope() {
        let mut store = ReviewStore::new();
        store.add("listing_0", 5, "first", "A");
        store.add("listing_1", 3, "second", "B");

        assert_eq!(store.len(), 2);
        assert_eq!(store.for_listing("listing_0").len(), 1);
        assert_eq!(store.for_listing("listing_0")[0].comment, "first");
        // Orphans are tolerated: nothing validates the listing id.
        store.add("listing_404", 2, "orphan", "C");
        assert_eq!(store.for_listing("listing_404").len(), 1);
    }

    #[test]
    fn sample_reviews_reference_first_two_listings() {
        let samples = ReviewStore::sample_reviews();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|r| (1..=5).contains(&r.rating)));
        assert_eq!(samples[0].listing_id, "listing_0");
        assert_eq!(samples[2].listing_id, "listing_1");
    }
}
