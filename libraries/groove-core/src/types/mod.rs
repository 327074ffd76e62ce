mod context;
mod ids;
mod track;

pub use context::CatalogContext;
pub use ids::{AlbumId, PlaylistId, TrackId, UserId};
pub use track::{AudioLocator, TrackRef, TrackRow, UNKNOWN_AUTHOR};
