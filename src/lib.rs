//! # Spades
//!
//! Membership server for the Spades car club: invite codes, the join-request
//! queue, member sessions, the admin console API and member garages.
//! Usable both as a standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! spades = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::path::PathBuf;
//! use spades::auth::AdminGate;
//! use spades::server::{AppState, create_router};
//! use spades::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new(&PathBuf::from("./data/spades.db")).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     AdminGate::new("change-me").unwrap(),
//!     "https://spades.example.com",
//!     true,
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `spades` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod garage;
pub mod membership;
pub mod posts;
pub mod server;
pub mod store;
pub mod types;
