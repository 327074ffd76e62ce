//! Groove - Playback Queue and Transport
//!
//! Platform-agnostic playback state for the Groove front-end.
//!
//! This crate provides:
//! - A shared queue store (ordered ids, active id, shuffle and loop flags)
//! - Transport decisions for next, previous and end of track
//! - Shuffle (independent random pick or a non-destructive overlay)
//! - Contextual loaders binding album, playlist and library views to the queue
//! - A player that drives an audio engine through the `PlaybackSession` trait
//!   (play/pause, seek, progress)
//!
//! # Architecture
//!
//! `groove-playback` never touches audio or the network:
//! - Audio is started and stopped through [`PlaybackSession`]
//! - Track lists come from a [`groove_core::CatalogProvider`]
//! - Views read [`QueueStore`] and drain [`PlaybackEvent`]s
//!
//! # Example: Next with wraparound
//!
//! ```rust
//! use groove_core::TrackId;
//! use groove_playback::{AdvanceTrigger, QueueStore, ShuffleStrategy, TransportController, Transition};
//!
//! let store = QueueStore::new();
//! store.set_queue(vec![TrackId::new("s1"), TrackId::new("s2"), TrackId::new("s3")]);
//! store.set_active(TrackId::new("s2"));
//!
//! let mut transport = TransportController::new(ShuffleStrategy::Independent);
//!
//! assert_eq!(
//!     transport.advance(&store, AdvanceTrigger::Skip),
//!     Transition::Activated(TrackId::new("s3"))
//! );
//! assert_eq!(
//!     transport.advance(&store, AdvanceTrigger::Skip),
//!     Transition::Activated(TrackId::new("s1"))
//! );
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use groove_core::AudioLocator;
//! use groove_playback::{PlaybackSession, Player, QueueStore, Result, TrackCache, TransportController};
//! use std::time::Duration;
//!
//! // Implement PlaybackSession for your audio engine
//! struct MyEngine;
//!
//! impl PlaybackSession for MyEngine {
//!     fn play(&mut self, locator: &AudioLocator) -> Result<()> {
//!         // Open and start the stream
//!         Ok(())
//!     }
//!
//!     fn restart(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn pause(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn resume(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn seek(&mut self, position: Duration) -> Result<()> {
//!         Ok(())
//!     }
//!
//!     fn stop(&mut self) {}
//! }
//!
//! let store = QueueStore::new();
//! let mut player = Player::new(
//!     store.clone(),
//!     TrackCache::new(256),
//!     TransportController::default(),
//!     MyEngine,
//! );
//!
//! // Any view selects a track through the store, the player picks it up
//! player.sync();
//! ```

mod cache;
mod config;
mod error;
mod events;
mod loader;
mod player;
mod queue;
mod session;
mod shuffle;
mod transport;
pub mod types;

// Public exports
pub use cache::TrackCache;
pub use config::PlaybackConfig;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use loader::ContextLoader;
pub use player::Player;
pub use queue::{PlaybackQueue, QueueSnapshot, QueueStore};
pub use session::{PlaybackSession, Progress, SessionEvent};
pub use shuffle::ShuffleOverlay;
pub use transport::TransportController;
pub use types::{AdvanceTrigger, RemovalPolicy, ShuffleStrategy, Transition};
