//! Playback queue and its shared store
//!
//! `PlaybackQueue` is the plain state: the ordered ids the current context
//! can play, the active id and the two transport modifiers. `QueueStore` is
//! the handle every view and the player share. Each store call takes the
//! lock once and runs to completion, so readers never observe half of an
//! update.

use crate::events::PlaybackEvent;
use groove_core::TrackId;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Queue state
///
/// The active id does not have to be in `ids`. It goes stale when its track
/// is removed or the queue is rebound, and transport treats that as
/// "not found" rather than an error.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    ids: Vec<TrackId>,
    active: Option<TrackId>,
    shuffle: bool,
    looping: bool,

    /// Bumped whenever `ids` is replaced or reset
    generation: u64,

    /// Bumped every time shuffle is switched on
    shuffle_epoch: u64,

    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn active_id(&self) -> Option<&TrackId> {
        self.active.as_ref()
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_loop(&self) -> bool {
        self.looping
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn shuffle_epoch(&self) -> u64 {
        self.shuffle_epoch
    }

    /// Position of the first occurrence of `id`
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Position of the active id, `None` when nothing is active or it is stale
    pub fn position_of_active(&self) -> Option<usize> {
        self.active.as_ref().and_then(|id| self.position_of(id))
    }

    /// Set the active id, whether or not it is in the queue
    pub fn set_active(&mut self, id: TrackId) {
        if self.active.as_ref() == Some(&id) {
            return;
        }

        debug!(track_id = %id, in_queue = self.position_of(&id).is_some(), "Active track set");
        let previous_track_id = self.active.replace(id.clone());
        self.pending_events.push(PlaybackEvent::ActiveChanged {
            track_id: id,
            previous_track_id,
        });
    }

    /// Replace the ids wholesale; the active id is left alone
    pub fn set_queue(&mut self, ids: Vec<TrackId>) {
        debug!(length = ids.len(), "Queue replaced");
        self.ids = ids;
        self.generation += 1;
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.ids.len(),
        });
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        if self.shuffle {
            self.shuffle_epoch += 1;
        }
        debug!(enabled = self.shuffle, "Shuffle toggled");
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
    }

    pub fn toggle_loop(&mut self) {
        self.looping = !self.looping;
        debug!(enabled = self.looping, "Loop toggled");
        self.pending_events.push(PlaybackEvent::LoopChanged {
            enabled: self.looping,
        });
    }

    /// Clear ids, active id and both modifiers
    pub fn reset(&mut self) {
        debug!("Queue reset");
        self.ids.clear();
        self.active = None;
        self.shuffle = false;
        self.looping = false;
        self.generation += 1;
        self.pending_events.push(PlaybackEvent::QueueReset);
    }

    /// Queue an event; a position update replaces any undrained one
    pub(crate) fn push_event(&mut self, event: PlaybackEvent) {
        if matches!(event, PlaybackEvent::PositionUpdate { .. }) {
            self.pending_events
                .retain(|pending| !matches!(pending, PlaybackEvent::PositionUpdate { .. }));
        }
        self.pending_events.push(event);
    }

    fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            ids: self.ids.clone(),
            active_id: self.active.clone(),
            shuffle: self.shuffle,
            looping: self.looping,
        }
    }
}

/// Read-only copy of the queue for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub ids: Vec<TrackId>,
    pub active_id: Option<TrackId>,
    pub shuffle: bool,
    pub looping: bool,
}

/// Shared handle to the playback queue
///
/// Cloning is cheap; all clones see the same queue. Created once per
/// application session and handed to every view that can start playback.
#[derive(Debug, Clone, Default)]
pub struct QueueStore {
    inner: Arc<Mutex<PlaybackQueue>>,
}

impl QueueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackQueue> {
        // Mutations never panic halfway, so a poisoned queue is still consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the queue as one step
    pub fn update<R>(&self, f: impl FnOnce(&mut PlaybackQueue) -> R) -> R {
        f(&mut *self.lock())
    }

    /// Read the queue without copying it
    pub fn read<R>(&self, f: impl FnOnce(&PlaybackQueue) -> R) -> R {
        f(&*self.lock())
    }

    pub fn set_active(&self, id: TrackId) {
        self.lock().set_active(id);
    }

    pub fn set_queue(&self, ids: Vec<TrackId>) {
        self.lock().set_queue(ids);
    }

    pub fn toggle_shuffle(&self) {
        self.lock().toggle_shuffle();
    }

    pub fn toggle_loop(&self) {
        self.lock().toggle_loop();
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.lock().snapshot()
    }

    pub fn ids(&self) -> Vec<TrackId> {
        self.lock().ids.clone()
    }

    pub fn active_id(&self) -> Option<TrackId> {
        self.lock().active.clone()
    }

    pub fn is_shuffle(&self) -> bool {
        self.lock().shuffle
    }

    pub fn is_loop(&self) -> bool {
        self.lock().looping
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.lock().position_of(id).is_some()
    }

    pub fn position_of_active(&self) -> Option<usize> {
        self.lock().position_of_active()
    }

    /// Queue an event that did not come from a queue mutation
    pub(crate) fn emit(&self, event: PlaybackEvent) {
        self.lock().push_event(event);
    }

    /// Take all events queued since the last drain, oldest first
    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        self.lock().take_events()
    }
}
