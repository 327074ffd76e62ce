//! Catalog context selector

use super::{AlbumId, PlaylistId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which slice of the catalog a view is showing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum CatalogContext {
    /// Every song (home grid)
    All,
    /// Songs of one album
    Album(AlbumId),
    /// Songs of one playlist
    Playlist(PlaylistId),
    /// Songs liked by a user
    Liked(UserId),
    /// Songs uploaded by a user (library sidebar)
    Uploaded(UserId),
}

impl fmt::Display for CatalogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogContext::All => write!(f, "all"),
            CatalogContext::Album(id) => write!(f, "album:{}", id),
            CatalogContext::Playlist(id) => write!(f, "playlist:{}", id),
            CatalogContext::Liked(user) => write!(f, "liked:{}", user),
            CatalogContext::Uploaded(user) => write!(f, "uploaded:{}", user),
        }
    }
}
