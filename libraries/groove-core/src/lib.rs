//! Groove Core
//!
//! Domain types, the catalog contract and error handling shared by the
//! Groove playback crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackRef`, `TrackId`, `CatalogContext`, etc.
//! - **Core Traits**: `CatalogProvider`, the narrow interface to the hosted
//!   database
//! - **Error Handling**: Unified `GrooveError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use groove_core::{CatalogContext, CatalogProvider, MemoryCatalog, TrackRef};
//! use chrono::Utc;
//!
//! # tokio_test_block(async {
//! let mut catalog = MemoryCatalog::new();
//! let track = TrackRef::new("1", "Song", "Artist", "song-1").unwrap();
//! catalog.insert(track, Utc::now());
//!
//! let tracks = catalog.fetch_tracks(&CatalogContext::All).await.unwrap();
//! assert_eq!(tracks.len(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use catalog::MemoryCatalog;
pub use error::{GrooveError, Result};
pub use traits::CatalogProvider;

pub use types::{
    AlbumId, AudioLocator, CatalogContext, PlaylistId, TrackId, TrackRef, TrackRow, UserId,
    UNKNOWN_AUTHOR,
};
