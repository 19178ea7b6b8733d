// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod model;
pub mod protocol;
pub mod seed;
pub mod store;
pub mod tui;
pub mod wizard;
