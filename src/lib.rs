//! # Appdex
//!
//! A catalog server for mobile app metadata, usable both as a
//! standalone binary and as a library. One SQLite-backed store holds
//! categories, developers, and app listings; a filter-composition layer
//! turns optional query parameters into composed predicates for the
//! listing and aggregation endpoints a dashboard consumes.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! appdex = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use appdex::server::{AppState, create_router};
//! use appdex::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/appdex.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState { store: Arc::new(store) });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the binary entrypoint and the blocking
//!   API client. Disable with `default-features = false`.

#[cfg(feature = "cli")]
pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod types;
