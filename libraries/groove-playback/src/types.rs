//! Core types for playback management

use groove_core::TrackId;
use serde::{Deserialize, Serialize};

/// Outcome of a transport decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// This track became active (may equal the previous one under shuffle)
    Activated(TrackId),

    /// The active track stays and starts again from the top
    Restarted(TrackId),

    /// Nothing is playable; the queue is empty
    Idle,
}

impl Transition {
    /// Track the player should be on after this transition
    pub fn track_id(&self) -> Option<&TrackId> {
        match self {
            Transition::Activated(id) | Transition::Restarted(id) => Some(id),
            Transition::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Transition::Idle)
    }
}

/// What asked the transport to move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceTrigger {
    /// User pressed "next"
    Skip,

    /// The audio engine reported the track finished
    TrackEnded,
}

/// How "next" behaves while shuffle is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleStrategy {
    /// Independent uniform pick on every request; repeats are possible
    #[default]
    Independent,

    /// Walk the shuffle overlay; every track plays once per pass
    Overlay,
}

/// What a loader does to the shared queue when a track is removed locally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Rebind the queue to the remaining tracks; reset it when none remain
    #[default]
    Resync,

    /// Only update the loader's own list; the queue stays stale until the
    /// next play from this loader
    LocalOnly,

    /// Reset the queue (clearing active track and modifiers), then rebind
    ResetAndRebind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_no_track() {
        assert!(Transition::Idle.track_id().is_none());
        assert!(Transition::Idle.is_idle());
    }

    #[test]
    fn restart_carries_track() {
        let t = Transition::Restarted(TrackId::new("a"));
        assert_eq!(t.track_id().map(|id| id.as_str()), Some("a"));
        assert!(!t.is_idle());
    }
}
