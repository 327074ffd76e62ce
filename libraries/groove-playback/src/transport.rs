//! Transport decisions
//!
//! `TransportController` answers "what plays after next / previous / end of
//! track" against the shared queue. Each decision and the write it causes
//! happen under one store lock.

use crate::config::PlaybackConfig;
use crate::events::PlaybackEvent;
use crate::queue::{PlaybackQueue, QueueStore};
use crate::shuffle::{random_pick, ShuffleOverlay};
use crate::types::{AdvanceTrigger, ShuffleStrategy, Transition};
use groove_core::TrackId;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

/// Next / previous / end-of-track state machine
///
/// Holds no queue state of its own apart from the cached shuffle overlay,
/// which is regenerated whenever the queue is rebound or shuffle is switched
/// back on.
#[derive(Debug)]
pub struct TransportController {
    strategy: ShuffleStrategy,
    rng: StdRng,
    overlay: Option<ShuffleOverlay>,
}

impl Default for TransportController {
    fn default() -> Self {
        Self::new(ShuffleStrategy::default())
    }
}

impl TransportController {
    /// Create a controller with an entropy-seeded RNG
    pub fn new(strategy: ShuffleStrategy) -> Self {
        Self::with_rng(strategy, StdRng::from_entropy())
    }

    /// Create a controller with a caller-supplied RNG (seeded in tests)
    pub fn with_rng(strategy: ShuffleStrategy, rng: StdRng) -> Self {
        Self {
            strategy,
            rng,
            overlay: None,
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.shuffle_strategy)
    }

    pub fn strategy(&self) -> ShuffleStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: ShuffleStrategy) {
        self.strategy = strategy;
    }

    /// Move forward
    ///
    /// # Returns
    /// - `Transition::Idle` when the queue is empty (store untouched)
    /// - `Transition::Restarted` at the end of a looping queue on natural end
    /// - `Transition::Activated` otherwise
    pub fn advance(&mut self, store: &QueueStore, trigger: AdvanceTrigger) -> Transition {
        store.update(|queue| self.advance_in(queue, trigger))
    }

    /// Move backward; explicit "previous" always wraps at the start
    pub fn retreat(&mut self, store: &QueueStore) -> Transition {
        store.update(|queue| self.retreat_in(queue))
    }

    /// Natural end of the active track
    ///
    /// Loop is checked before anything else: with loop on the active track
    /// restarts even when it is no longer in the queue.
    pub fn on_track_end(&mut self, store: &QueueStore) -> Transition {
        store.update(|queue| {
            if queue.is_loop() {
                if let Some(id) = queue.active_id().cloned() {
                    return restart(queue, id);
                }
            }
            self.advance_in(queue, AdvanceTrigger::TrackEnded)
        })
    }

    /// Current shuffle overlay, for "up next" lists and shuffle-play
    pub fn shuffle_order(&mut self, store: &QueueStore) -> Vec<TrackId> {
        store.read(|queue| self.overlay_for(queue).order().to_vec())
    }

    fn advance_in(&mut self, queue: &mut PlaybackQueue, trigger: AdvanceTrigger) -> Transition {
        if queue.is_empty() {
            debug!(?trigger, "Advance on empty queue");
            return Transition::Idle;
        }

        if queue.is_shuffle() {
            let picked = match self.strategy {
                ShuffleStrategy::Independent => random_pick(queue.ids(), &mut self.rng).cloned(),
                ShuffleStrategy::Overlay => self
                    .overlay_for(queue)
                    .next_after(queue.active_id())
                    .cloned(),
            };
            return activate(queue, picked);
        }

        let next = match queue.position_of_active() {
            Some(pos) if pos + 1 < queue.len() => queue.ids().get(pos + 1).cloned(),
            Some(_) if queue.is_loop() && trigger == AdvanceTrigger::TrackEnded => {
                if let Some(id) = queue.active_id().cloned() {
                    return restart(queue, id);
                }
                queue.ids().first().cloned()
            }
            Some(_) => {
                trace!("End of queue, wrapping to first track");
                queue.ids().first().cloned()
            }
            None => {
                debug!(active = ?queue.active_id(), "Active track not in queue, starting from first");
                queue.ids().first().cloned()
            }
        };
        activate(queue, next)
    }

    fn retreat_in(&mut self, queue: &mut PlaybackQueue) -> Transition {
        if queue.is_empty() {
            debug!("Retreat on empty queue");
            return Transition::Idle;
        }

        if queue.is_shuffle() {
            let picked = match self.strategy {
                ShuffleStrategy::Independent => random_pick(queue.ids(), &mut self.rng).cloned(),
                ShuffleStrategy::Overlay => self
                    .overlay_for(queue)
                    .previous_before(queue.active_id())
                    .cloned(),
            };
            return activate(queue, picked);
        }

        let previous = match queue.position_of_active() {
            Some(0) => {
                trace!("Start of queue, wrapping to last track");
                queue.ids().last().cloned()
            }
            Some(pos) => queue.ids().get(pos - 1).cloned(),
            None => {
                debug!(active = ?queue.active_id(), "Active track not in queue, starting from last");
                queue.ids().last().cloned()
            }
        };
        activate(queue, previous)
    }

    fn overlay_for(&mut self, queue: &PlaybackQueue) -> &ShuffleOverlay {
        if !self
            .overlay
            .as_ref()
            .is_some_and(|overlay| overlay.is_current(queue))
        {
            self.overlay = None;
        }

        let rng = &mut self.rng;
        self.overlay.get_or_insert_with(|| {
            debug!(
                length = queue.len(),
                epoch = queue.shuffle_epoch(),
                "Generating shuffle overlay"
            );
            ShuffleOverlay::generate(queue, rng)
        })
    }
}

fn activate(queue: &mut PlaybackQueue, id: Option<TrackId>) -> Transition {
    match id {
        Some(id) => {
            queue.set_active(id.clone());
            Transition::Activated(id)
        }
        None => Transition::Idle,
    }
}

fn restart(queue: &mut PlaybackQueue, id: TrackId) -> Transition {
    debug!(track_id = %id, "Restarting track (loop)");
    queue.push_event(PlaybackEvent::Restarted {
        track_id: id.clone(),
    });
    Transition::Restarted(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<TrackId> {
        raw.iter().map(|id| TrackId::new(*id)).collect()
    }

    fn seeded(strategy: ShuffleStrategy) -> TransportController {
        TransportController::with_rng(strategy, StdRng::seed_from_u64(42))
    }

    fn store_with(raw: &[&str], active: Option<&str>) -> QueueStore {
        let store = QueueStore::new();
        store.set_queue(ids(raw));
        if let Some(id) = active {
            store.set_active(TrackId::new(id));
        }
        store
    }

    #[test]
    fn advance_moves_to_next() {
        let store = store_with(&["a", "b", "c"], Some("a"));
        let mut transport = seeded(ShuffleStrategy::Independent);

        let t = transport.advance(&store, AdvanceTrigger::Skip);

        assert_eq!(t, Transition::Activated(TrackId::new("b")));
        assert_eq!(store.active_id(), Some(TrackId::new("b")));
    }

    #[test]
    fn advance_wraps_at_end_without_loop() {
        let store = store_with(&["a", "b", "c"], Some("c"));
        let mut transport = seeded(ShuffleStrategy::Independent);

        let t = transport.advance(&store, AdvanceTrigger::TrackEnded);
        assert_eq!(t, Transition::Activated(TrackId::new("a")));
    }

    #[test]
    fn advance_restarts_at_end_with_loop_on_natural_end() {
        let store = store_with(&["a", "b"], Some("b"));
        store.toggle_loop();
        let mut transport = seeded(ShuffleStrategy::Independent);

        let t = transport.advance(&store, AdvanceTrigger::TrackEnded);

        assert_eq!(t, Transition::Restarted(TrackId::new("b")));
        assert_eq!(store.active_id(), Some(TrackId::new("b")));
    }

    #[test]
    fn skip_wraps_even_with_loop() {
        let store = store_with(&["a", "b"], Some("b"));
        store.toggle_loop();
        let mut transport = seeded(ShuffleStrategy::Independent);

        let t = transport.advance(&store, AdvanceTrigger::Skip);
        assert_eq!(t, Transition::Activated(TrackId::new("a")));
    }

    #[test]
    fn stale_active_starts_from_first() {
        let store = store_with(&["a", "b"], Some("gone"));
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(
            transport.advance(&store, AdvanceTrigger::Skip),
            Transition::Activated(TrackId::new("a"))
        );
    }

    #[test]
    fn no_active_starts_from_first() {
        let store = store_with(&["a", "b"], None);
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(
            transport.advance(&store, AdvanceTrigger::Skip),
            Transition::Activated(TrackId::new("a"))
        );
    }

    #[test]
    fn empty_queue_is_idle_and_untouched() {
        let store = QueueStore::new();
        store.set_active(TrackId::new("a"));
        store.drain_events();
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(transport.advance(&store, AdvanceTrigger::Skip), Transition::Idle);
        assert_eq!(transport.retreat(&store), Transition::Idle);
        assert_eq!(store.active_id(), Some(TrackId::new("a")));
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn retreat_moves_back_and_wraps() {
        let store = store_with(&["a", "b", "c"], Some("b"));
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(transport.retreat(&store), Transition::Activated(TrackId::new("a")));
        assert_eq!(transport.retreat(&store), Transition::Activated(TrackId::new("c")));
    }

    #[test]
    fn retreat_from_stale_goes_to_last() {
        let store = store_with(&["a", "b", "c"], Some("zzz"));
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(transport.retreat(&store), Transition::Activated(TrackId::new("c")));
    }

    #[test]
    fn independent_shuffle_stays_in_queue() {
        let store = store_with(&["a", "b", "c", "d"], Some("a"));
        store.toggle_shuffle();
        let mut transport = seeded(ShuffleStrategy::Independent);

        for _ in 0..50 {
            let t = transport.advance(&store, AdvanceTrigger::Skip);
            let id = t.track_id().cloned().unwrap();
            assert!(store.contains(&id));
            assert_eq!(store.active_id(), Some(id));
        }
        assert_eq!(store.ids(), ids(&["a", "b", "c", "d"]));
    }

    #[test]
    fn overlay_shuffle_visits_each_track_once_per_pass() {
        let store = store_with(&["a", "b", "c", "d", "e"], None);
        store.toggle_shuffle();
        let mut transport = seeded(ShuffleStrategy::Overlay);

        let mut seen = Vec::new();
        for _ in 0..5 {
            let t = transport.advance(&store, AdvanceTrigger::Skip);
            seen.push(t.track_id().cloned().unwrap());
        }

        assert_eq!(seen, transport.shuffle_order(&store));
        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(sorted, ids(&["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn overlay_retreat_undoes_advance() {
        let store = store_with(&["a", "b", "c", "d"], Some("a"));
        store.toggle_shuffle();
        let mut transport = seeded(ShuffleStrategy::Overlay);

        let forward = transport.advance(&store, AdvanceTrigger::Skip);
        transport.advance(&store, AdvanceTrigger::Skip);
        let back = transport.retreat(&store);

        assert_eq!(back, forward);
    }

    #[test]
    fn overlay_regenerates_on_rebind() {
        let store = store_with(&["a", "b", "c"], None);
        store.toggle_shuffle();
        let mut transport = seeded(ShuffleStrategy::Overlay);
        transport.shuffle_order(&store);

        store.set_queue(ids(&["x", "y"]));
        let mut order = transport.shuffle_order(&store);
        order.sort();

        assert_eq!(order, ids(&["x", "y"]));
    }

    #[test]
    fn on_track_end_restarts_when_looping() {
        let store = store_with(&["a", "b", "c"], Some("a"));
        store.toggle_loop();
        store.drain_events();
        let mut transport = seeded(ShuffleStrategy::Independent);

        let t = transport.on_track_end(&store);

        assert_eq!(t, Transition::Restarted(TrackId::new("a")));
        assert_eq!(
            store.drain_events(),
            vec![PlaybackEvent::Restarted {
                track_id: TrackId::new("a")
            }]
        );
    }

    #[test]
    fn on_track_end_loop_wins_over_shuffle() {
        let store = store_with(&["a", "b", "c"], Some("b"));
        store.toggle_loop();
        store.toggle_shuffle();
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(
            transport.on_track_end(&store),
            Transition::Restarted(TrackId::new("b"))
        );
    }

    #[test]
    fn on_track_end_advances_without_loop() {
        let store = store_with(&["a", "b"], Some("a"));
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(
            transport.on_track_end(&store),
            Transition::Activated(TrackId::new("b"))
        );
    }

    #[test]
    fn on_track_end_with_loop_but_nothing_active_starts_first() {
        let store = store_with(&["a", "b"], None);
        store.toggle_loop();
        let mut transport = seeded(ShuffleStrategy::Independent);

        assert_eq!(
            transport.on_track_end(&store),
            Transition::Activated(TrackId::new("a"))
        );
    }
}
