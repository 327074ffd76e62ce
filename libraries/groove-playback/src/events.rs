//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued on the
//! shared [`QueueStore`](crate::QueueStore) as mutations happen and drained by
//! the view layer:
//! - Queue changes (bound, reset)
//! - Active track changes and restarts
//! - Play/pause
//! - Modifier toggles (shuffle/loop)
//! - Progress updates (periodic, from the audio engine)
//! - Non-fatal errors

use groove_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Active track changed
    ActiveChanged {
        /// ID of the new active track
        track_id: TrackId,
        /// ID of the previously active track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Active track started again from the beginning (loop)
    Restarted {
        /// ID of the restarted track
        track_id: TrackId,
    },

    /// Paused or resumed
    PlayingChanged {
        /// Whether audio is now running
        playing: bool,
    },

    /// Queue replaced wholesale
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Queue, active track and modifiers cleared
    QueueReset,

    /// Shuffle toggled
    ShuffleChanged {
        /// New state
        enabled: bool,
    },

    /// Loop toggled
    LoopChanged {
        /// New state
        enabled: bool,
    },

    /// Position update from the audio engine
    PositionUpdate {
        /// Elapsed whole seconds
        elapsed_secs: u64,
        /// Total whole seconds
        total_secs: u64,
    },

    /// Something failed; playback degraded rather than stopped the app
    Error {
        /// Error message
        message: String,
    },
}
