// Client-side repositories over in-memory listing and review arrays.

pub mod listings;
pub mod reviews;

pub use listings::{ListingStore, StoreError};
pub use reviews::ReviewStore;
