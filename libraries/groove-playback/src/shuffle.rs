//! Shuffle algorithms
//!
//! Two pieces, both used only by the transport controller:
//! - `random_pick`: uniform independent pick (repeats allowed)
//! - `ShuffleOverlay`: a Fisher-Yates permutation laid over the queue
//!
//! The overlay never replaces the queue's own order. It remembers which
//! queue generation and shuffle epoch it was built from so the controller can
//! tell when it has to be regenerated.

use crate::queue::PlaybackQueue;
use groove_core::TrackId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick one id uniformly at random
///
/// Every call is independent; the same id can come up twice in a row.
pub fn random_pick<'a, R: Rng + ?Sized>(ids: &'a [TrackId], rng: &mut R) -> Option<&'a TrackId> {
    if ids.is_empty() {
        return None;
    }
    ids.get(rng.gen_range(0..ids.len()))
}

/// Randomized ordering of the queue
#[derive(Debug, Clone)]
pub struct ShuffleOverlay {
    order: Vec<TrackId>,
    generation: u64,
    epoch: u64,
}

impl ShuffleOverlay {
    /// Build a fresh permutation of the queue's ids
    pub fn generate<R: Rng + ?Sized>(queue: &PlaybackQueue, rng: &mut R) -> Self {
        let mut order = queue.ids().to_vec();
        order.shuffle(rng);
        Self {
            order,
            generation: queue.generation(),
            epoch: queue.shuffle_epoch(),
        }
    }

    /// Whether this overlay still describes the queue
    ///
    /// Stale once the ids are rebound or shuffle was switched off and on.
    pub fn is_current(&self, queue: &PlaybackQueue) -> bool {
        self.generation == queue.generation() && self.epoch == queue.shuffle_epoch()
    }

    pub fn order(&self) -> &[TrackId] {
        &self.order
    }

    pub fn first(&self) -> Option<&TrackId> {
        self.order.first()
    }

    /// Entry after `current`, wrapping; first entry when `current` is absent
    pub fn next_after(&self, current: Option<&TrackId>) -> Option<&TrackId> {
        let position = current.and_then(|id| self.order.iter().position(|t| t == id));
        match position {
            Some(pos) => self.order.get((pos + 1) % self.order.len()),
            None => self.order.first(),
        }
    }

    /// Entry before `current`, wrapping; last entry when `current` is absent
    pub fn previous_before(&self, current: Option<&TrackId>) -> Option<&TrackId> {
        let position = current.and_then(|id| self.order.iter().position(|t| t == id));
        match position {
            Some(0) => self.order.last(),
            Some(pos) => self.order.get(pos - 1),
            None => self.order.last(),
        }
    }
}
