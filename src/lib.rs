//! VerseLens library exports, used by the binary and the integration tests.

pub mod app;
pub mod bible;
pub mod bookmarks;
pub mod client;
pub mod config;
pub mod dictionary;
pub mod handler;
pub mod navigation;
pub mod search;
pub mod store;
pub mod tui;
pub mod ui;
