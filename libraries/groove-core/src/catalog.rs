//! In-memory catalog
//!
//! Mirrors the hosted tables the front-end reads (`songs`, `album_songs`,
//! `playlist_songs`, `liked_songs`) closely enough to drive the playback
//! core without a network. Ordering follows the data-fetch actions: songs
//! newest first by `created_at`, liked songs newest first by like time.

use crate::error::{GrooveError, Result};
use crate::traits::CatalogProvider;
use crate::types::{AlbumId, CatalogContext, PlaylistId, TrackId, TrackRef, TrackRow, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct StoredTrack {
    track: TrackRef,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct Like {
    track_id: TrackId,
    liked_at: DateTime<Utc>,
}

/// Catalog backed by plain collections
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tracks: Vec<StoredTrack>,
    albums: HashMap<AlbumId, Vec<TrackId>>,
    playlists: HashMap<PlaylistId, Vec<TrackId>>,
    likes: HashMap<UserId, Vec<Like>>,
    offline: bool,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validated track
    pub fn insert(&mut self, track: TrackRef, created_at: DateTime<Utc>) {
        self.tracks.retain(|t| t.track.id() != track.id());
        self.tracks.push(StoredTrack { track, created_at });
    }

    /// Ingest raw rows, skipping the ones that fail validation
    ///
    /// Returns the number of rows accepted.
    pub fn insert_rows(&mut self, rows: Vec<TrackRow>) -> usize {
        let mut accepted = 0;
        for row in rows {
            let created_at = row.created_at.unwrap_or_else(Utc::now);
            match TrackRef::try_from(row) {
                Ok(track) => {
                    self.insert(track, created_at);
                    accepted += 1;
                }
                Err(e) => warn!(error = %e, "Skipping invalid song row"),
            }
        }
        accepted
    }

    /// Link a track to an album
    pub fn add_to_album(&mut self, album: &AlbumId, track: &TrackId) {
        self.albums
            .entry(album.clone())
            .or_default()
            .push(track.clone());
    }

    /// Link a track to a playlist
    pub fn add_to_playlist(&mut self, playlist: &PlaylistId, track: &TrackId) {
        self.playlists
            .entry(playlist.clone())
            .or_default()
            .push(track.clone());
    }

    /// Record that a user liked a track
    pub fn like(&mut self, user: &UserId, track: &TrackId, liked_at: DateTime<Utc>) {
        let likes = self.likes.entry(user.clone()).or_default();
        likes.retain(|l| &l.track_id != track);
        likes.push(Like {
            track_id: track.clone(),
            liked_at,
        });
    }

    /// Remove a track everywhere (the `songs` row was deleted)
    pub fn delete(&mut self, track: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.track.id() != track);
        for members in self.albums.values_mut().chain(self.playlists.values_mut()) {
            members.retain(|id| id != track);
        }
        for likes in self.likes.values_mut() {
            likes.retain(|l| &l.track_id != track);
        }
        self.tracks.len() != before
    }

    /// Unlink a track from an album
    pub fn remove_from_album(&mut self, album: &AlbumId, track: &TrackId) {
        if let Some(members) = self.albums.get_mut(album) {
            members.retain(|id| id != track);
        }
    }

    /// Unlink a track from a playlist
    pub fn remove_from_playlist(&mut self, playlist: &PlaylistId, track: &TrackId) {
        if let Some(members) = self.playlists.get_mut(playlist) {
            members.retain(|id| id != track);
        }
    }

    /// Make every fetch fail, as if the backend were unreachable
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Tracks whose ids are in `members`, newest first
    fn newest_first(&self, members: &[TrackId]) -> Vec<TrackRef> {
        let mut found: Vec<&StoredTrack> = self
            .tracks
            .iter()
            .filter(|t| members.contains(t.track.id()))
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        found.into_iter().map(|t| t.track.clone()).collect()
    }

    fn all_newest_first(&self) -> Vec<TrackRef> {
        let mut all: Vec<&StoredTrack> = self.tracks.iter().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.into_iter().map(|t| t.track.clone()).collect()
    }

    fn liked_by(&self, user: &UserId) -> Vec<TrackRef> {
        let Some(likes) = self.likes.get(user) else {
            return Vec::new();
        };

        let mut likes: Vec<&Like> = likes.iter().collect();
        likes.sort_by(|a, b| b.liked_at.cmp(&a.liked_at));

        likes
            .into_iter()
            .filter_map(|like| {
                self.tracks
                    .iter()
                    .find(|t| t.track.id() == &like.track_id)
                    .map(|t| t.track.clone())
            })
            .collect()
    }
}

#[async_trait]
impl CatalogProvider for MemoryCatalog {
    async fn fetch_tracks(&self, context: &CatalogContext) -> Result<Vec<TrackRef>> {
        if self.offline {
            return Err(GrooveError::catalog("catalog is offline"));
        }

        let tracks = match context {
            CatalogContext::All => self.all_newest_first(),
            CatalogContext::Album(id) => self
                .albums
                .get(id)
                .map(|members| self.newest_first(members))
                .ok_or_else(|| GrooveError::not_found("Album", id.as_str()))?,
            CatalogContext::Playlist(id) => self
                .playlists
                .get(id)
                .map(|members| self.newest_first(members))
                .ok_or_else(|| GrooveError::not_found("Playlist", id.as_str()))?,
            CatalogContext::Liked(user) => self.liked_by(user),
            CatalogContext::Uploaded(user) => {
                let mut owned: Vec<&StoredTrack> = self
                    .tracks
                    .iter()
                    .filter(|t| t.track.owner() == Some(user))
                    .collect();
                owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                owned.into_iter().map(|t| t.track.clone()).collect()
            }
        };

        debug!(context = %context, count = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap()
    }

    fn track(id: &str) -> TrackRef {
        TrackRef::new(id, format!("Song {}", id), "Artist", format!("song-{}", id)).unwrap()
    }

    fn ids(tracks: &[TrackRef]) -> Vec<&str> {
        tracks.iter().map(|t| t.id().as_str()).collect()
    }

    #[tokio::test]
    async fn all_songs_are_newest_first() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(track("old"), at(0));
        catalog.insert(track("new"), at(30));
        catalog.insert(track("mid"), at(10));

        let tracks = catalog.fetch_tracks(&CatalogContext::All).await.unwrap();
        assert_eq!(ids(&tracks), vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn album_only_lists_members() {
        let mut catalog = MemoryCatalog::new();
        let album = AlbumId::new("a1");
        catalog.insert(track("1"), at(1));
        catalog.insert(track("2"), at(2));
        catalog.insert(track("3"), at(3));
        catalog.add_to_album(&album, &TrackId::new("1"));
        catalog.add_to_album(&album, &TrackId::new("3"));

        let tracks = catalog
            .fetch_tracks(&CatalogContext::Album(album))
            .await
            .unwrap();
        assert_eq!(ids(&tracks), vec!["3", "1"]);
    }

    #[tokio::test]
    async fn liked_songs_follow_like_time() {
        let mut catalog = MemoryCatalog::new();
        let user = UserId::new("u1");
        catalog.insert(track("1"), at(1));
        catalog.insert(track("2"), at(2));
        catalog.like(&user, &TrackId::new("2"), at(5));
        catalog.like(&user, &TrackId::new("1"), at(9));

        let tracks = catalog
            .fetch_tracks(&CatalogContext::Liked(user))
            .await
            .unwrap();
        assert_eq!(ids(&tracks), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn uploaded_filters_by_owner() {
        let mut catalog = MemoryCatalog::new();
        let user = UserId::new("u1");
        catalog.insert(track("mine").with_owner(user.clone()), at(1));
        catalog.insert(track("theirs").with_owner(UserId::new("u2")), at(2));

        let tracks = catalog
            .fetch_tracks(&CatalogContext::Uploaded(user))
            .await
            .unwrap();
        assert_eq!(ids(&tracks), vec!["mine"]);
    }

    #[tokio::test]
    async fn unknown_album_is_not_found() {
        let catalog = MemoryCatalog::new();
        let err = catalog
            .fetch_tracks(&CatalogContext::Album(AlbumId::new("nope")))
            .await
            .unwrap_err();
        assert!(matches!(err, GrooveError::NotFound { .. }));
    }

    #[tokio::test]
    async fn offline_catalog_fails() {
        let mut catalog = MemoryCatalog::new();
        catalog.insert(track("1"), at(1));
        catalog.set_offline(true);
        assert!(catalog.fetch_tracks(&CatalogContext::All).await.is_err());
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let mut catalog = MemoryCatalog::new();
        let rows = vec![
            TrackRow {
                id: Some("ok".to_string()),
                title: Some("Fine".to_string()),
                song_path: Some("song-ok".to_string()),
                ..Default::default()
            },
            TrackRow {
                id: Some("bad".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(catalog.insert_rows(rows), 1);
    }

    #[tokio::test]
    async fn delete_unlinks_everywhere() {
        let mut catalog = MemoryCatalog::new();
        let album = AlbumId::new("a");
        catalog.insert(track("1"), at(1));
        catalog.add_to_album(&album, &TrackId::new("1"));

        assert!(catalog.delete(&TrackId::new("1")));
        let tracks = catalog
            .fetch_tracks(&CatalogContext::Album(album))
            .await
            .unwrap();
        assert!(tracks.is_empty());
    }
}
