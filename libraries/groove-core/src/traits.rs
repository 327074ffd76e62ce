/// Core traits for Groove
use crate::error::Result;
use crate::types::{CatalogContext, TrackRef};
use async_trait::async_trait;

/// Catalog provider trait
///
/// Implementers answer "which tracks belong to this context" against the
/// hosted database. The returned list is already in display order (newest
/// first); callers never re-sort it.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the ordered tracks of a context
    ///
    /// # Errors
    /// Returns an error if the backend cannot be queried. Rows that fail
    /// validation are skipped by implementations rather than failing the
    /// whole list.
    async fn fetch_tracks(&self, context: &CatalogContext) -> Result<Vec<TrackRef>>;
}
