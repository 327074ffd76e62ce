//! Track reference cache
//!
//! The queue only holds ids. Loaders put the references they fetch here and
//! the player resolves the active id back to an audio locator through it.
//!
//! References of the context currently bound to the queue are pinned and
//! never evicted, however long the list. Everything else (tracks of views
//! the user has left) lives in a bounded LRU.

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use groove_core::{TrackId, TrackRef};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

#[derive(Debug)]
struct CacheState {
    /// Tracks of the context bound to the queue
    bound: HashMap<TrackId, TrackRef>,

    /// Previously bound or loose references, oldest evicted first
    recent: LruCache<TrackId, TrackRef>,
}

/// Track references shared by loaders and the player
#[derive(Debug, Clone)]
pub struct TrackCache {
    inner: Arc<Mutex<CacheState>>,
}

impl TrackCache {
    /// Create a cache keeping at most `capacity` unbound references
    /// (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(CacheState {
                bound: HashMap::new(),
                recent: LruCache::new(capacity),
            })),
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.track_cache_capacity)
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pin the tracks of the context now bound to the queue
    ///
    /// The previously pinned tracks drop into the LRU part.
    pub fn bind(&self, tracks: impl IntoIterator<Item = TrackRef>) {
        let mut state = self.lock();
        let bound: HashMap<TrackId, TrackRef> = tracks
            .into_iter()
            .map(|track| (track.id().clone(), track))
            .collect();

        let previous = std::mem::replace(&mut state.bound, bound);
        for (id, track) in previous {
            if !state.bound.contains_key(&id) {
                state.recent.put(id, track);
            }
        }
        let CacheState { bound, recent } = &mut *state;
        for id in bound.keys() {
            recent.pop(id);
        }
        debug!(bound = state.bound.len(), recent = state.recent.len(), "Track cache rebound");
    }

    /// Number of pinned references
    pub fn bound_len(&self) -> usize {
        self.lock().bound.len()
    }

    pub fn insert(&self, track: TrackRef) {
        self.lock().put(track);
    }

    pub fn extend(&self, tracks: impl IntoIterator<Item = TrackRef>) {
        let mut state = self.lock();
        for track in tracks {
            state.put(track);
        }
    }

    /// Look up a reference, marking unpinned ones recently used
    pub fn get(&self, id: &TrackId) -> Option<TrackRef> {
        let mut state = self.lock();
        if let Some(track) = state.bound.get(id) {
            return Some(track.clone());
        }
        state.recent.get(id).cloned()
    }

    /// Look up a reference or fail with `TrackNotCached`
    pub fn resolve(&self, id: &TrackId) -> Result<TrackRef> {
        let found = self.get(id);
        if found.is_none() {
            trace!(track_id = %id, "Track cache miss");
        }
        found.ok_or_else(|| PlaybackError::TrackNotCached(id.clone()))
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        let state = self.lock();
        state.bound.contains_key(id) || state.recent.contains(id)
    }

    pub fn remove(&self, id: &TrackId) -> Option<TrackRef> {
        let mut state = self.lock();
        let pinned = state.bound.remove(id);
        let recent = state.recent.pop(id);
        pinned.or(recent)
    }

    pub fn len(&self) -> usize {
        let state = self.lock();
        state.bound.len() + state.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.bound.clear();
        state.recent.clear();
    }
}

impl CacheState {
    fn put(&mut self, track: TrackRef) {
        match self.bound.get_mut(track.id()) {
            Some(pinned) => *pinned = track,
            None => {
                self.recent.put(track.id().clone(), track);
            }
        }
    }
}

impl Default for TrackCache {
    fn default() -> Self {
        Self::from_config(&PlaybackConfig::default())
    }
}
