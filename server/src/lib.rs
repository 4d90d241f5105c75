//! Grocery list server.
//!
//! Serves the built UI, persists the list the UI posts, keeps a file-backed
//! item collection and proxies suggestion requests to a chat-completion API
//! so the API key never reaches the browser.

pub mod config;
pub mod error;
pub mod file_store;
pub mod logging;
pub mod routes;
pub mod suggest;

pub use routes::{router, AppState};
