// TUI widget modules for each page and panel.

pub mod admin;
pub mod api_log;
pub mod chat_panel;
pub mod detail;
pub mod help_bar;
pub mod home;
pub mod raw_data;
pub mod solutions;
pub mod status_bar;
pub mod upload;
