//! Contextual queue loader
//!
//! One loader per list view (album, playlist, liked songs, uploads, the
//! library). It owns the visible track list for its context and binds it to
//! the shared queue whenever the user starts playback from that view.

use crate::cache::TrackCache;
use crate::queue::QueueStore;
use crate::transport::TransportController;
use crate::types::RemovalPolicy;
use groove_core::{CatalogContext, CatalogProvider, TrackId, TrackRef};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Visible list of one catalog context, bound to the shared queue
#[derive(Debug)]
pub struct ContextLoader {
    store: QueueStore,
    cache: TrackCache,
    context: CatalogContext,
    policy: RemovalPolicy,
    tracks: Vec<TrackRef>,

    /// Ids removed from this view; hidden until the loader is reopened
    removed: HashSet<TrackId>,
}

impl ContextLoader {
    /// Fetch the context's tracks and bind them to the queue
    ///
    /// A failed fetch is logged and treated as an empty list, so the queue
    /// ends up bound to nothing rather than left pointing at another view.
    pub async fn open<P>(
        store: QueueStore,
        cache: TrackCache,
        provider: &P,
        context: CatalogContext,
        policy: RemovalPolicy,
    ) -> Self
    where
        P: CatalogProvider + ?Sized,
    {
        let tracks = fetch(provider, &context).await;
        info!(%context, tracks = tracks.len(), ?policy, "Opened context");

        let loader = Self {
            store,
            cache,
            context,
            policy,
            tracks,
            removed: HashSet::new(),
        };
        loader.bind_queue();
        loader
    }

    /// Re-fetch the context and rebind the queue
    ///
    /// Tracks removed locally stay hidden.
    pub async fn refresh<P>(&mut self, provider: &P)
    where
        P: CatalogProvider + ?Sized,
    {
        let mut tracks = fetch(provider, &self.context).await;
        tracks.retain(|track| !self.removed.contains(track.id()));
        debug!(context = %self.context, tracks = tracks.len(), "Refreshed context");

        self.tracks = tracks;
        self.bind_queue();
    }

    /// Point the queue at the visible list and pin its tracks in the cache
    fn bind_queue(&self) {
        self.cache.bind(self.tracks.iter().cloned());
        self.store.set_queue(self.track_ids());
    }

    pub fn context(&self) -> &CatalogContext {
        &self.context
    }

    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// Visible tracks, in display order
    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    pub fn track_ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|track| track.id().clone()).collect()
    }

    pub fn is_removed(&self, id: &TrackId) -> bool {
        self.removed.contains(id)
    }

    /// Start `id` from this view
    ///
    /// Rebinds the queue to the visible list and makes `id` active. Returns
    /// `false` (queue untouched) when `id` is not visible here.
    pub fn play(&self, id: &TrackId) -> bool {
        if self.removed.contains(id) {
            debug!(track_id = %id, "Ignoring play of removed track");
            return false;
        }
        if !self.tracks.iter().any(|track| track.id() == id) {
            debug!(track_id = %id, context = %self.context, "Track not in context");
            return false;
        }

        let ids = self.track_ids();
        self.cache.bind(self.tracks.iter().cloned());
        self.store.update(|queue| {
            queue.set_queue(ids);
            queue.set_active(id.clone());
        });
        true
    }

    /// Start the first visible track
    pub fn play_all(&self) -> Option<TrackId> {
        let first = self.tracks.first()?.id().clone();
        self.play(&first).then_some(first)
    }

    /// Switch shuffle on and start from the head of the shuffle order
    pub fn play_shuffled(&self, transport: &mut TransportController) -> Option<TrackId> {
        if self.tracks.is_empty() {
            return None;
        }

        let ids = self.track_ids();
        self.cache.bind(self.tracks.iter().cloned());
        self.store.update(|queue| {
            queue.set_queue(ids);
            if !queue.is_shuffle() {
                queue.toggle_shuffle();
            }
        });

        let first = transport.shuffle_order(&self.store).into_iter().next()?;
        self.store.set_active(first.clone());
        Some(first)
    }

    /// Remove a track from this view and apply the removal policy
    ///
    /// Returns `false` if the track was not visible.
    pub fn remove_track(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|track| track.id() != id);
        if self.tracks.len() == before {
            return false;
        }
        self.removed.insert(id.clone());
        debug!(track_id = %id, policy = ?self.policy, remaining = self.tracks.len(), "Track removed from view");

        match self.policy {
            RemovalPolicy::Resync if self.tracks.is_empty() => {
                self.cache.bind(std::iter::empty());
                self.store.reset();
            }
            RemovalPolicy::Resync => self.bind_queue(),
            RemovalPolicy::LocalOnly => {}
            RemovalPolicy::ResetAndRebind => {
                let ids = self.track_ids();
                self.cache.bind(self.tracks.iter().cloned());
                self.store.update(|queue| {
                    queue.reset();
                    queue.set_queue(ids);
                });
            }
        }
        true
    }
}

async fn fetch<P>(provider: &P, context: &CatalogContext) -> Vec<TrackRef>
where
    P: CatalogProvider + ?Sized,
{
    match provider.fetch_tracks(context).await {
        Ok(tracks) => tracks,
        Err(e) => {
            warn!(%context, error = %e, "Catalog fetch failed, showing empty list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_core::{GrooveError, Result as CoreResult};

    struct FixedCatalog(Vec<TrackRef>);

    #[async_trait::async_trait]
    impl CatalogProvider for FixedCatalog {
        async fn fetch_tracks(&self, _context: &CatalogContext) -> CoreResult<Vec<TrackRef>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCatalog;

    #[async_trait::async_trait]
    impl CatalogProvider for BrokenCatalog {
        async fn fetch_tracks(&self, _context: &CatalogContext) -> CoreResult<Vec<TrackRef>> {
            Err(GrooveError::catalog("connection refused"))
        }
    }

    fn track(id: &str) -> TrackRef {
        TrackRef::new(id, id, "Artist", format!("songs/{id}.mp3")).unwrap()
    }

    async fn open(policy: RemovalPolicy) -> (QueueStore, ContextLoader) {
        let store = QueueStore::new();
        let catalog = FixedCatalog(vec![track("a"), track("b"), track("c")]);
        let loader = ContextLoader::open(
            store.clone(),
            TrackCache::new(16),
            &catalog,
            CatalogContext::All,
            policy,
        )
        .await;
        (store, loader)
    }

    #[tokio::test]
    async fn open_binds_queue_and_fills_cache() {
        let store = QueueStore::new();
        let cache = TrackCache::new(16);
        let catalog = FixedCatalog(vec![track("a"), track("b")]);

        let loader = ContextLoader::open(
            store.clone(),
            cache.clone(),
            &catalog,
            CatalogContext::All,
            RemovalPolicy::Resync,
        )
        .await;

        assert_eq!(store.ids(), loader.track_ids());
        assert!(cache.contains(&TrackId::new("a")));
        assert!(store.active_id().is_none());
    }

    #[tokio::test]
    async fn failed_fetch_binds_empty_queue() {
        let store = QueueStore::new();
        store.set_queue(vec![TrackId::new("old")]);

        let loader = ContextLoader::open(
            store.clone(),
            TrackCache::new(16),
            &BrokenCatalog,
            CatalogContext::All,
            RemovalPolicy::Resync,
        )
        .await;

        assert!(loader.tracks().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn play_sets_active() {
        let (store, loader) = open(RemovalPolicy::Resync).await;
        assert!(loader.play(&TrackId::new("b")));
        assert_eq!(store.active_id(), Some(TrackId::new("b")));
    }

    #[tokio::test]
    async fn play_unknown_is_ignored() {
        let (store, loader) = open(RemovalPolicy::Resync).await;
        assert!(!loader.play(&TrackId::new("zzz")));
        assert!(store.active_id().is_none());
    }

    #[tokio::test]
    async fn play_all_starts_first() {
        let (store, loader) = open(RemovalPolicy::Resync).await;
        assert_eq!(loader.play_all(), Some(TrackId::new("a")));
        assert_eq!(store.active_id(), Some(TrackId::new("a")));
    }

    #[tokio::test]
    async fn resync_removal_rebinds() {
        let (store, mut loader) = open(RemovalPolicy::Resync).await;
        assert!(loader.remove_track(&TrackId::new("b")));
        assert_eq!(store.ids(), vec![TrackId::new("a"), TrackId::new("c")]);
        assert!(loader.is_removed(&TrackId::new("b")));
        assert!(!loader.remove_track(&TrackId::new("b")));
    }

    #[tokio::test]
    async fn local_only_removal_leaves_queue_stale() {
        let (store, mut loader) = open(RemovalPolicy::LocalOnly).await;
        loader.remove_track(&TrackId::new("b"));
        assert_eq!(store.len(), 3);
        assert!(!loader.play(&TrackId::new("b")));
    }
}
